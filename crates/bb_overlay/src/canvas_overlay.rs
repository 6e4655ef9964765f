//! Text drawn over the sprite pass via egui: the name label, the pause
//! screen, and an F3 stats window.
//!
//! egui needs a three-phase render split because
//! `egui_wgpu::Renderer::render()` wants a `RenderPass<'static>` while
//! `begin_render_pass` borrows the encoder:
//!
//!   1. `prepare()` -- run egui, produce tessellated primitives
//!   2. `upload()`  -- upload textures and update GPU buffers (borrows encoder mutably)
//!   3. `paint()`   -- render into a new render pass with `forget_lifetime()`
//!   4. `cleanup()` -- free textures egui no longer references
//!
//! Canvas coordinates are logical pixels, which egui calls points.

use bb_core::palette::Rgb;
use bb_core::time::TimeState;
use egui::{Align2, Color32, FontId, Id, LayerId, Order, Pos2};
use winit::window::Window;

pub const PAUSED_TEXT: &str = "PAUSED";
pub const PAUSED_FONT_SIZE: f32 = 48.0;
/// Alpha of the black scrim behind the pause text.
pub const SCRIM_ALPHA: u8 = 128;

#[derive(Debug, Clone, Default)]
pub struct OverlayStats {
    pub position: (i32, i32),
    pub velocity: (i32, i32),
    pub ticks: u64,
    pub wall_hits: u64,
    pub dropped_ticks: u64,
    pub background: String,
    pub run_state: &'static str,
}

/// Everything the overlay draws this frame.
pub struct OverlayFrame<'a> {
    pub label_text: &'a str,
    pub label_size: f32,
    /// `None` until the label has been placed once.
    pub label_pos: Option<(i32, i32)>,
    pub label_color: Rgb,
    pub paused: bool,
    pub stats: OverlayStats,
}

pub struct CanvasOverlay {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    pub debug_visible: bool,
}

impl CanvasOverlay {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
    ) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            debug_visible: false,
        }
    }

    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_winit_state.on_window_event(window, event);
        response.consumed
    }

    pub fn toggle_debug(&mut self) {
        self.debug_visible = !self.debug_visible;
        log::info!(
            "Debug window: {}",
            if self.debug_visible { "ON" } else { "OFF" }
        );
    }

    pub fn prepare(
        &mut self,
        window: &Window,
        time: &TimeState,
        frame: &OverlayFrame<'_>,
    ) -> (Vec<egui::ClippedPrimitive>, egui::TexturesDelta) {
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let debug_visible = self.debug_visible;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            if let Some((x, y)) = frame.label_pos {
                ctx.layer_painter(LayerId::background()).text(
                    Pos2::new(x as f32, y as f32),
                    Align2::CENTER_CENTER,
                    frame.label_text,
                    FontId::proportional(frame.label_size),
                    color32(frame.label_color),
                );
            }

            if debug_visible {
                egui::Window::new("Debug")
                    .default_pos([10.0, 10.0])
                    .show(ctx, |ui| {
                        ui.label(format!("FPS: {:.1}", time.smoothed_fps));
                        ui.label(format!("Frame time: {:.2} ms", time.smoothed_frame_time_ms));
                        ui.label(format!("Ticks this frame: {}", time.steps_this_frame));
                        ui.label(format!("Coalesced ticks: {}", frame.stats.dropped_ticks));
                        ui.separator();
                        let stats = &frame.stats;
                        ui.label(format!("State: {}", stats.run_state));
                        ui.label(format!("Position: {:?}", stats.position));
                        ui.label(format!("Velocity: {:?}", stats.velocity));
                        ui.label(format!("Ticks: {}", stats.ticks));
                        ui.label(format!("Wall hits: {}", stats.wall_hits));
                        ui.label(format!("Background: {}", stats.background));
                    });
            }

            if frame.paused {
                let painter =
                    ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("pause_overlay")));
                let screen = ctx.screen_rect();
                painter.rect_filled(screen, 0.0, scrim_color());
                painter.text(
                    screen.center(),
                    Align2::CENTER_CENTER,
                    PAUSED_TEXT,
                    FontId::proportional(PAUSED_FONT_SIZE),
                    Color32::WHITE,
                );
            }
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (primitives, full_output.textures_delta)
    }

    /// Upload textures and update buffers. Call before creating the egui render pass.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor);
    }

    /// Render into an existing render pass. Call after `upload()`.
    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    pub fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

pub fn color32(color: Rgb) -> Color32 {
    Color32::from_rgb(color.r, color.g, color.b)
}

pub fn scrim_color() -> Color32 {
    Color32::from_black_alpha(SCRIM_ALPHA)
}
