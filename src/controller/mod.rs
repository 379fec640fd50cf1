// CONTROLLER: Input, camera motion and the update loop
pub mod input;
pub mod motion;
pub mod orbit_controls;
pub mod frame_loop;

pub use input::{InputEvent, MouseButton};
pub use motion::{InteractionEvent, Mode, MotionController, MotionEvent};
pub use orbit_controls::OrbitControls;
pub use frame_loop::{FrameLoop, SceneRenderer};
