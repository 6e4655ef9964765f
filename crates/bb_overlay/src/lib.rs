pub mod canvas_overlay;

pub use canvas_overlay::{CanvasOverlay, OverlayFrame, OverlayStats};
