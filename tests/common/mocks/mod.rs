pub mod camera;
pub mod sink;
pub mod source;
