pub mod bounce;
pub mod input;
pub mod motion;
pub mod palette;
pub mod scene;
pub mod surface;
pub mod time;
