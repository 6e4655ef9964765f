//! Drawing seam between the bounce loop and whatever displays it.

use crate::palette::Rgb;

/// A fixed-size canvas holding one image object, one text label and a pause
/// overlay. Coordinates are canvas pixels with the origin at the top-left;
/// both objects are center-anchored. Calls take effect immediately.
pub trait RenderSurface {
    fn place_image(&mut self, x: i32, y: i32);
    fn place_label(&mut self, x: i32, y: i32);
    fn set_background(&mut self, color: Rgb);
    fn set_label_color(&mut self, color: Rgb);
    fn set_overlay_visible(&mut self, visible: bool);
}

#[cfg(test)]
pub(crate) mod recording {
    use super::RenderSurface;
    use crate::palette::Rgb;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum SurfaceCall {
        Image(i32, i32),
        Label(i32, i32),
        Background(Rgb),
        LabelColor(Rgb),
        Overlay(bool),
    }

    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub calls: Vec<SurfaceCall>,
    }

    impl RecordingSurface {
        pub fn backgrounds(&self) -> Vec<Rgb> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    SurfaceCall::Background(color) => Some(*color),
                    _ => None,
                })
                .collect()
        }

        pub fn overlay_visible(&self) -> Option<bool> {
            self.calls.iter().rev().find_map(|call| match call {
                SurfaceCall::Overlay(visible) => Some(*visible),
                _ => None,
            })
        }

        pub fn clear(&mut self) {
            self.calls.clear();
        }
    }

    impl RenderSurface for RecordingSurface {
        fn place_image(&mut self, x: i32, y: i32) {
            self.calls.push(SurfaceCall::Image(x, y));
        }

        fn place_label(&mut self, x: i32, y: i32) {
            self.calls.push(SurfaceCall::Label(x, y));
        }

        fn set_background(&mut self, color: Rgb) {
            self.calls.push(SurfaceCall::Background(color));
        }

        fn set_label_color(&mut self, color: Rgb) {
            self.calls.push(SurfaceCall::LabelColor(color));
        }

        fn set_overlay_visible(&mut self, visible: bool) {
            self.calls.push(SurfaceCall::Overlay(visible));
        }
    }
}
