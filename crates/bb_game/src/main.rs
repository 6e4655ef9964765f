//! Burger Bounce -- event loop and application entry point.
//!
//! winit drives everything through `ApplicationHandler`:
//!
//!   1. Startup composes the sprite from the two halves (fatal on failure),
//!      then places it on the canvas before any window exists.
//!   2. `RedrawRequested` feeds the fixed-rate scheduler and runs at most one
//!      bounce tick per frame, then draws the canvas: clear to the background
//!      color, one textured quad for the sprite, egui for the label and the
//!      pause screen.
//!   3. Key presses are dispatched immediately from `KeyboardInput`.
//!
//! The bounce loop only ever talks to `CanvasSurface`; the GPU side reads that
//! canvas when it renders.

mod config;
mod error;

use std::path::Path;
use std::sync::Arc;

use rand::rngs::ThreadRng;
use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use bb_compositor::{compose_from_paths, Composite};
use bb_core::bounce::Bouncer;
use bb_core::input::{Action, Key, KeyBindings};
use bb_core::scene::SpriteMetrics;
use bb_core::time::TimeState;
use bb_overlay::{CanvasOverlay, OverlayFrame, OverlayStats};
use bb_render::{
    clear_color, sprite_quad, Camera2D, CanvasSurface, GpuContext, GpuInitError, SpritePipeline,
    SpriteVertex, Texture, QUAD_INDICES,
};
use config::{load_config, BounceConfig};
use error::AppError;

const CONFIG_PATH: &str = "bounce.json";

/// GPU-side state. Exists only while a window is open.
struct Graphics {
    window: Arc<Window>,
    gpu: GpuContext,
    sprite_pipeline: SpritePipeline,
    overlay: CanvasOverlay,
    // Kept alive for the bind group below.
    _sprite_texture: Texture,
    sprite_bind_group: wgpu::BindGroup,
    sprite_size: (u32, u32),
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
}

impl Graphics {
    fn new(
        window: Arc<Window>,
        composite: &Composite,
        canvas_size: (u32, u32),
    ) -> Result<Self, GpuInitError> {
        let gpu = GpuContext::new(window.clone())?;
        let sprite_pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);
        let overlay = CanvasOverlay::new(&gpu.device, gpu.surface_format, &window);

        // The composite is uploaded once and reused every frame.
        let sprite_texture =
            Texture::from_image(&gpu.device, &gpu.queue, &composite.image, "composite_sprite");
        let sprite_bind_group =
            sprite_pipeline.create_texture_bind_group(&gpu.device, &sprite_texture);

        let camera = Camera2D::for_canvas(canvas_size.0, canvas_size.1);
        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera.build_uniform()]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group =
            sprite_pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);

        let vertex_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Sprite Vertex Buffer"),
            size: std::mem::size_of::<[SpriteVertex; 4]>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Sprite Index Buffer"),
                contents: bytemuck::cast_slice(&QUAD_INDICES),
                usage: wgpu::BufferUsages::INDEX,
            });

        Ok(Self {
            window,
            gpu,
            sprite_pipeline,
            overlay,
            _sprite_texture: sprite_texture,
            sprite_bind_group,
            sprite_size: (composite.width(), composite.height()),
            vertex_buffer,
            index_buffer,
            camera_bind_group,
        })
    }

    fn render(&mut self, canvas: &CanvasSurface, time: &TimeState, frame: &OverlayFrame<'_>) {
        let Some((output, view)) = self.gpu.begin_frame() else {
            return;
        };

        let sprite_pos = canvas.image_pos();
        if let Some((x, y)) = sprite_pos {
            let quad = sprite_quad((x, y), self.sprite_size);
            self.gpu
                .queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&quad));
        }

        let (egui_primitives, egui_textures_delta) =
            self.overlay.prepare(&self.window, time, frame);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.size.0, self.gpu.size.1],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let background =
                clear_color(canvas.background(), self.gpu.surface_format.is_srgb());
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Canvas Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(background),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            if sprite_pos.is_some() {
                render_pass.set_pipeline(&self.sprite_pipeline.render_pipeline);
                render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
                render_pass.set_bind_group(1, &self.sprite_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                render_pass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
            }
        }

        self.overlay.upload(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &egui_primitives,
            &egui_textures_delta,
            &screen_descriptor,
        );

        {
            let mut egui_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();

            self.overlay
                .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
        }

        self.overlay.cleanup(&egui_textures_delta);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

/// Ownership is split three ways: the immutable sprite (`composite`), the
/// mutable motion record (inside `bouncer`), and the canvas it draws to.
struct App {
    config: BounceConfig,
    composite: Composite,
    bouncer: Bouncer,
    canvas: CanvasSurface,
    time: TimeState,
    bindings: KeyBindings,
    rng: ThreadRng,
    gfx: Option<Graphics>,
    fatal: Option<AppError>,
}

impl App {
    fn new(config: BounceConfig, composite: Composite) -> Self {
        let sprite = SpriteMetrics {
            width: composite.width() as i32,
            height: composite.height() as i32,
            text_offset_y: composite.text_offset_y(),
        };
        let bouncer = Bouncer::new(config.initial_scene(), sprite, config.bounds());
        let mut canvas = CanvasSurface::new();
        bouncer.place(&mut canvas);

        Self {
            time: TimeState::new(config.tick_interval()),
            config,
            composite,
            bouncer,
            canvas,
            bindings: KeyBindings::default(),
            rng: rand::thread_rng(),
            gfx: None,
            fatal: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        log::error!("{err}");
        self.fatal = Some(err);
        event_loop.exit();
    }
}

fn overlay_frame<'a>(
    config: &'a BounceConfig,
    bouncer: &Bouncer,
    canvas: &CanvasSurface,
    time: &TimeState,
) -> OverlayFrame<'a> {
    let scene = bouncer.scene();
    let stats = bouncer.stats();
    OverlayFrame {
        label_text: &config.label.text,
        label_size: config.label.size,
        label_pos: canvas.label_pos(),
        label_color: canvas.label_color(),
        paused: canvas.overlay_visible(),
        stats: OverlayStats {
            position: (scene.x, scene.y),
            velocity: (scene.dx, scene.dy),
            ticks: stats.ticks,
            wall_hits: stats.wall_hits,
            dropped_ticks: time.dropped_steps,
            background: canvas.background().to_string(),
            run_state: scene.run_state.label(),
        },
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gfx.is_some() {
            return;
        }
        let platform = self.config.platform();
        let window = match bb_platform::window::create_window(event_loop, &platform) {
            Ok(window) => window,
            Err(err) => return self.fail(event_loop, err.into()),
        };
        log::info!("Window created: {}x{}", platform.width, platform.height);

        match Graphics::new(window, &self.composite, (platform.width, platform.height)) {
            Ok(gfx) => self.gfx = Some(gfx),
            Err(err) => self.fail(event_loop, err.into()),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gfx) = &self.gfx {
            gfx.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gfx) = self.gfx.as_mut() else {
            return;
        };

        let egui_consumed = gfx.overlay.handle_window_event(&gfx.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                self.canvas.close();
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    gfx.gpu.resize(w, h);
                    log::debug!("Surface resized to {}x{}", w, h);
                }
            }

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if event.state != ElementState::Pressed {
                    return;
                }
                let PhysicalKey::Code(key_code) = event.physical_key else {
                    return;
                };
                match map_key(key_code).and_then(|key| self.bindings.action_for(key)) {
                    Some(Action::TogglePause) => {
                        self.bouncer.toggle_pause(&mut self.canvas);
                    }
                    Some(Action::ToggleDebug) if !event.repeat => gfx.overlay.toggle_debug(),
                    _ => {}
                }
            }

            WindowEvent::RedrawRequested => {
                if gfx.gpu.size.0 == 0 || gfx.gpu.size.1 == 0 {
                    return;
                }

                self.time.begin_frame();
                while self.time.should_step() {
                    self.bouncer.tick(&mut self.canvas, &mut self.rng);
                }
                self.time.end_frame();

                let frame = overlay_frame(&self.config, &self.bouncer, &self.canvas, &self.time);
                gfx.render(&self.canvas, &self.time, &frame);
            }

            _ => {}
        }
    }
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::Space => Some(Key::Space),
        KeyCode::F3 => Some(Key::F3),
        _ => None,
    }
}

fn run() -> Result<(), AppError> {
    let config = load_config(Path::new(CONFIG_PATH))?;
    let composite = compose_from_paths(&config.assets.top, &config.assets.bottom)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, composite);
    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn main() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Burger Bounce starting...");

    let result = run();
    if let Err(err) = &result {
        log::error!("Fatal: {err}");
    }
    result
}
