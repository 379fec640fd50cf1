// MODEL: camera, orbit geometry and model placement
pub mod camera;
pub mod orbit;
pub mod placement;

pub use camera::Camera;
pub use orbit::{OrbitState, wrap_angle};
pub use placement::{ModelBounds, ModelPlacement};
