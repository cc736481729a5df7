pub mod constants;
pub mod endpoints;
pub mod face_box;
pub mod frame;
pub mod model_resolver;
pub mod timestamp;
