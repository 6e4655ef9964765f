//! Retained canvas state the bounce loop writes into and the frame renderer
//! reads from.

use bb_core::palette::Rgb;
use bb_core::surface::RenderSurface;

#[derive(Debug, Clone)]
pub struct CanvasSurface {
    image_pos: Option<(i32, i32)>,
    label_pos: Option<(i32, i32)>,
    background: Rgb,
    label_color: Rgb,
    overlay_visible: bool,
    closed: bool,
}

impl Default for CanvasSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasSurface {
    pub fn new() -> Self {
        Self {
            image_pos: None,
            label_pos: None,
            background: Rgb::WHITE,
            label_color: Rgb::BLACK,
            overlay_visible: false,
            closed: false,
        }
    }

    /// Enters the terminal state: every later surface call is ignored.
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn image_pos(&self) -> Option<(i32, i32)> {
        self.image_pos
    }

    pub fn label_pos(&self) -> Option<(i32, i32)> {
        self.label_pos
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn label_color(&self) -> Rgb {
        self.label_color
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }
}

impl RenderSurface for CanvasSurface {
    fn place_image(&mut self, x: i32, y: i32) {
        if !self.closed {
            self.image_pos = Some((x, y));
        }
    }

    fn place_label(&mut self, x: i32, y: i32) {
        if !self.closed {
            self.label_pos = Some((x, y));
        }
    }

    fn set_background(&mut self, color: Rgb) {
        if !self.closed {
            self.background = color;
        }
    }

    fn set_label_color(&mut self, color: Rgb) {
        if !self.closed {
            self.label_color = color;
        }
    }

    fn set_overlay_visible(&mut self, visible: bool) {
        if !self.closed {
            self.overlay_visible = visible;
        }
    }
}

fn srgb_to_linear(c: f32) -> f64 {
    let c = c as f64;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Clear color for an sRGB surface. wgpu expects linear values there.
pub fn clear_color(background: Rgb, srgb_target: bool) -> wgpu::Color {
    let [r, g, b] = background.to_unit();
    if srgb_target {
        wgpu::Color {
            r: srgb_to_linear(r),
            g: srgb_to_linear(g),
            b: srgb_to_linear(b),
            a: 1.0,
        }
    } else {
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        }
    }
}
