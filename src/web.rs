use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue, prelude::wasm_bindgen};
use web_sys::{Document, Event, HtmlCanvasElement, PointerEvent, Window};

use crate::config::ViewerConfig;
use crate::controller::input::{wasm, InputEvent};
use crate::controller::FrameLoop;
use crate::logging;
use crate::utils::{create_phone_mesh, PHONE_SIZE};
use crate::view::{GpuContext, MockupRenderer};

const CANVAS_ID: &str = "mockup-canvas";
const CONFIG_ATTRIBUTE: &str = "data-config";

type SharedLoop = Rc<RefCell<FrameLoop<MockupRenderer>>>;

#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    logging::init();

    let window = web_sys::window().ok_or_else(|| js_error("no global `window`"))?;
    let document = window.document().ok_or_else(|| js_error("no document on window"))?;
    let canvas = find_or_create_canvas(&document)?;
    let config = read_config(&canvas);
    setup_app(&window, &document, &canvas, &config).await
}

async fn setup_app(
    window: &Window,
    document: &Document,
    canvas: &HtmlCanvasElement,
    config: &ViewerConfig,
) -> Result<(), JsValue> {
    // One-finger drags orbit instead of scrolling the page
    canvas.style().set_property("touch-action", "none")?;
    let display = fit_canvas(window, canvas);

    let gpu = GpuContext::new(canvas, canvas.width(), canvas.height())
        .await
        .map_err(|e| js_error(format!("GPU init failed: {e}")))?;

    let [w, h, d] = PHONE_SIZE;
    let mesh = create_phone_mesh(w, h, d);
    let renderer = MockupRenderer::new(gpu, &mesh);
    let frame_loop = FrameLoop::new(config, renderer, display.width, display.height)
        .with_display(display.viewport_width, display.pixel_ratio);
    let frame_loop: SharedLoop = Rc::new(RefCell::new(frame_loop));

    match mesh.bounds() {
        Some(bounds) => frame_loop.borrow_mut().model_ready(bounds),
        None => tracing::warn!("model has no geometry, camera motion stays idle"),
    }

    setup_input_listeners(window, document, canvas, frame_loop.clone())?;

    let performance = window.performance().ok_or_else(|| js_error("no performance on window"))?;
    let animate = RcCellCallback::new(window.clone(), move || {
        let time = performance.now() / 1000.0;
        if let Err(e) = frame_loop.borrow_mut().tick(time) {
            tracing::error!("frame failed: {e}");
        }
    });
    animate.start()
}

/// Wire canvas/document events into the frame loop. Pointer events cover
/// mouse, pen and touch alike.
fn setup_input_listeners(
    window: &Window,
    document: &Document,
    canvas: &HtmlCanvasElement,
    frame_loop: SharedLoop,
) -> Result<(), JsValue> {
    // A press starts a drag only on the canvas; capture keeps the drag alive
    // when the pointer leaves it
    {
        let frame_loop = frame_loop.clone();
        let target = canvas.clone();
        let pointerdown = Closure::wrap(Box::new(move |e: PointerEvent| {
            if !e.is_primary() {
                return;
            }
            let Some(input) = wasm::pointer_down_to_input(&e) else { return };
            if let Err(err) = target.set_pointer_capture(e.pointer_id()) {
                tracing::debug!(?err, "pointer capture refused");
            }
            frame_loop.borrow_mut().handle_input(&input);
            e.prevent_default();
        }) as Box<dyn FnMut(PointerEvent)>);
        canvas.add_event_listener_with_callback("pointerdown", pointerdown.as_ref().unchecked_ref())?;
        pointerdown.forget();
    }

    {
        let frame_loop = frame_loop.clone();
        let pointermove = Closure::wrap(Box::new(move |e: PointerEvent| {
            if e.is_primary() {
                frame_loop.borrow_mut().handle_input(&wasm::pointer_move_to_input(&e));
            }
        }) as Box<dyn FnMut(PointerEvent)>);
        document.add_event_listener_with_callback("pointermove", pointermove.as_ref().unchecked_ref())?;
        pointermove.forget();
    }

    {
        let frame_loop = frame_loop.clone();
        let pointerup = Closure::wrap(Box::new(move |e: PointerEvent| {
            if !e.is_primary() {
                return;
            }
            if let Some(input) = wasm::pointer_up_to_input(&e) {
                frame_loop.borrow_mut().handle_input(&input);
            }
        }) as Box<dyn FnMut(PointerEvent)>);
        document.add_event_listener_with_callback("pointerup", pointerup.as_ref().unchecked_ref())?;
        pointerup.forget();
    }

    // The browser took the pointer over (scroll, gesture, lost capture)
    {
        let frame_loop = frame_loop.clone();
        let pointercancel = Closure::wrap(Box::new(move |e: PointerEvent| {
            if e.is_primary() {
                frame_loop.borrow_mut().handle_input(&InputEvent::FocusLost);
            }
        }) as Box<dyn FnMut(PointerEvent)>);
        document.add_event_listener_with_callback("pointercancel", pointercancel.as_ref().unchecked_ref())?;
        pointercancel.forget();
    }

    // Focus loss ends any drag in progress
    {
        let frame_loop = frame_loop.clone();
        let blur = Closure::wrap(Box::new(move |_e: Event| {
            frame_loop.borrow_mut().handle_input(&InputEvent::FocusLost);
        }) as Box<dyn FnMut(Event)>);
        window.add_event_listener_with_callback("blur", blur.as_ref().unchecked_ref())?;
        blur.forget();
    }

    // Resize follows the canvas container; the window width picks the model fit
    {
        let window_for_resize = window.clone();
        let canvas = canvas.clone();
        let resize = Closure::wrap(Box::new(move |_e: Event| {
            let display = fit_canvas(&window_for_resize, &canvas);
            frame_loop.borrow_mut().handle_input(&InputEvent::Resized {
                width: display.width,
                height: display.height,
                viewport_width: display.viewport_width,
                pixel_ratio: display.pixel_ratio,
            });
        }) as Box<dyn FnMut(Event)>);
        window.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())?;
        resize.forget();
    }

    Ok(())
}

fn find_or_create_canvas(document: &Document) -> Result<HtmlCanvasElement, JsValue> {
    if let Some(el) = document.get_element_by_id(CANVAS_ID) {
        return el
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| js_error(format!("#{CANVAS_ID} is not a canvas")));
    }

    let body = document.body().ok_or_else(|| js_error("no body on document"))?;
    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| js_error("failed to create canvas"))?;
    canvas.set_id(CANVAS_ID);
    body.append_child(&canvas)?;
    Ok(canvas)
}

/// Config comes from a JSON `data-config` attribute; bad or missing config
/// falls back to defaults.
fn read_config(canvas: &HtmlCanvasElement) -> ViewerConfig {
    let Some(raw) = canvas.get_attribute(CONFIG_ATTRIBUTE) else {
        return ViewerConfig::default();
    };
    ViewerConfig::from_json_str(&raw).unwrap_or_else(|e| {
        tracing::warn!("ignoring {CONFIG_ATTRIBUTE}: {e}");
        ViewerConfig::default()
    })
}

/// Canvas size in CSS pixels plus what the renderer and model fit need.
struct DisplaySize {
    width: u32,
    height: u32,
    viewport_width: u32,
    pixel_ratio: f32,
}

/// Size the canvas to its container, falling back to the window when the
/// canvas is detached. The drawing buffer is scaled by devicePixelRatio while
/// the CSS size stays logical.
fn fit_canvas(window: &Window, canvas: &HtmlCanvasElement) -> DisplaySize {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as u32;
    let viewport_width = dim(window.inner_width()).max(1);

    let (width, height) = match canvas.parent_element() {
        Some(parent) if parent.client_width() > 0 && parent.client_height() > 0 => {
            (parent.client_width() as u32, parent.client_height() as u32)
        }
        _ => (viewport_width, dim(window.inner_height()).max(1)),
    };

    let ratio = window.device_pixel_ratio();
    let pixel_ratio = if ratio.is_finite() && ratio > 0.0 { ratio as f32 } else { 1.0 };
    canvas.set_width(((width as f32 * pixel_ratio).round() as u32).max(1));
    canvas.set_height(((height as f32 * pixel_ratio).round() as u32).max(1));

    let style = canvas.style();
    if let Err(err) = style
        .set_property("width", &format!("{width}px"))
        .and_then(|_| style.set_property("height", &format!("{height}px")))
    {
        tracing::warn!(?err, "failed to set canvas CSS size");
    }

    DisplaySize { width, height, viewport_width, pixel_ratio }
}

fn js_error<E: Into<String>>(msg: E) -> JsValue {
    js_sys::Error::new(&msg.into()).into()
}

/// Self-rescheduling requestAnimationFrame loop
struct RcCellCallback {
    inner: Rc<RefCell<Box<dyn FnMut()>>>,
    window: Window,
}

impl RcCellCallback {
    fn new(window: Window, f: impl FnMut() + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Box::new(f))),
            window,
        }
    }

    fn start(self) -> Result<(), JsValue> {
        let inner = self.inner.clone();
        let window = self.window.clone();

        let callback = Rc::new(RefCell::new(None::<Closure<dyn FnMut()>>));
        let callback_clone = callback.clone();

        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            inner.borrow_mut().as_mut()();

            if let Some(cb) = callback_clone.borrow().as_ref() {
                if let Err(e) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    tracing::error!(?e, "requestAnimationFrame failed, animation stopped");
                }
            }
        }) as Box<dyn FnMut()>));

        if let Some(cb) = callback.borrow().as_ref() {
            self.window.request_animation_frame(cb.as_ref().unchecked_ref())?;
        }

        // The closure reschedules itself for the page's lifetime
        std::mem::forget(callback);
        Ok(())
    }
}
