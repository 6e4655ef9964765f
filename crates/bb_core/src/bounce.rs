//! The bounce loop: one [`Bouncer::tick`] per scheduler step, plus the pause
//! toggle driven by key presses. Both run on the event-loop thread.

use rand::Rng;

use crate::motion::{self, WallHit};
use crate::palette::{self, Rgb};
use crate::scene::{Bounds, SceneState, SpriteMetrics};
use crate::surface::RenderSurface;

pub const INITIAL_BACKGROUND: Rgb = Rgb::WHITE;
pub const INITIAL_LABEL_COLOR: Rgb = Rgb::BLACK;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Scene is paused; nothing moved.
    Paused,
    Moved {
        hit: WallHit,
        /// `(background, label)` applied on a wall hit.
        recolor: Option<(Rgb, Rgb)>,
    },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BounceStats {
    pub ticks: u64,
    pub wall_hits: u64,
}

pub struct Bouncer {
    scene: SceneState,
    sprite: SpriteMetrics,
    bounds: Bounds,
    stats: BounceStats,
}

impl Bouncer {
    pub fn new(scene: SceneState, sprite: SpriteMetrics, bounds: Bounds) -> Self {
        Self {
            scene,
            sprite,
            bounds,
            stats: BounceStats::default(),
        }
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn stats(&self) -> BounceStats {
        self.stats
    }

    /// Creates the initial picture: white canvas, black label, overlay hidden.
    pub fn place<S: RenderSurface + ?Sized>(&self, surface: &mut S) {
        surface.set_background(INITIAL_BACKGROUND);
        surface.set_label_color(INITIAL_LABEL_COLOR);
        surface.set_overlay_visible(self.scene.is_paused());
        self.push_positions(surface);
    }

    /// Runs one tick. Draws from `rng` only when a wall was hit.
    pub fn tick<S, R>(&mut self, surface: &mut S, rng: &mut R) -> TickOutcome
    where
        S: RenderSurface + ?Sized,
        R: Rng + ?Sized,
    {
        if self.scene.is_paused() {
            return TickOutcome::Paused;
        }
        self.stats.ticks += 1;

        let hit = motion::step(&mut self.scene, &self.sprite, self.bounds);
        let recolor = if hit.any() {
            self.stats.wall_hits += 1;
            let (background, label) = palette::wall_hit_colors(rng.gen_range(0..=0xFF_FFFF));
            log::debug!(
                "Wall hit at ({}, {}): background {background}, label {label}",
                self.scene.x,
                self.scene.y
            );
            surface.set_background(background);
            surface.set_label_color(label);
            Some((background, label))
        } else {
            None
        };

        self.push_positions(surface);
        TickOutcome::Moved { hit, recolor }
    }

    /// Flips pause and shows or hides the overlay to match. Returns whether
    /// the scene is now paused.
    pub fn toggle_pause<S: RenderSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        let paused = self.scene.toggle_pause();
        surface.set_overlay_visible(paused);
        log::info!("Animation {}", self.scene.run_state.label());
        paused
    }

    fn push_positions<S: RenderSurface + ?Sized>(&self, surface: &mut S) {
        surface.place_image(self.scene.x, self.scene.y);
        let (label_x, label_y) = self.scene.label_position(&self.sprite);
        surface.place_label(label_x, label_y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::recording::{RecordingSurface, SurfaceCall};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn demo_bouncer() -> Bouncer {
        Bouncer::new(
            SceneState::new(200, 200, 5, 4),
            SpriteMetrics {
                width: 100,
                height: 100,
                text_offset_y: -3,
            },
            Bounds::new(800, 600),
        )
    }

    #[test]
    fn place_draws_initial_frame() {
        let bouncer = demo_bouncer();
        let mut surface = RecordingSurface::default();
        bouncer.place(&mut surface);
        assert_eq!(
            surface.calls,
            vec![
                SurfaceCall::Background(Rgb::WHITE),
                SurfaceCall::LabelColor(Rgb::BLACK),
                SurfaceCall::Overlay(false),
                SurfaceCall::Image(200, 200),
                SurfaceCall::Label(200, 197),
            ]
        );
    }

    #[test]
    fn plain_tick_only_moves_objects() {
        let mut bouncer = demo_bouncer();
        let mut surface = RecordingSurface::default();
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = bouncer.tick(&mut surface, &mut rng);
        assert_eq!(
            outcome,
            TickOutcome::Moved {
                hit: WallHit::default(),
                recolor: None
            }
        );
        assert_eq!(
            surface.calls,
            vec![SurfaceCall::Image(205, 204), SurfaceCall::Label(205, 201)]
        );
    }

    #[test]
    fn reaching_right_wall_recolors_exactly_once() {
        let mut bouncer = demo_bouncer();
        let mut surface = RecordingSurface::default();
        let mut rng = StdRng::seed_from_u64(7);

        // The floor is reached on tick 88; clear its recolor before tick 110.
        for _ in 0..109 {
            bouncer.tick(&mut surface, &mut rng);
        }
        assert_eq!(bouncer.scene().x, 745);
        surface.clear();

        let outcome = bouncer.tick(&mut surface, &mut rng);
        assert_eq!(bouncer.scene().x, 750);
        assert_eq!(bouncer.scene().dx, -5);
        match outcome {
            TickOutcome::Moved {
                hit,
                recolor: Some((background, label)),
            } => {
                assert!(hit.horizontal);
                assert!(!hit.vertical);
                assert_eq!(label, palette::contrast_label_color(background));
            }
            other => panic!("expected a recolor, got {other:?}"),
        }
        assert_eq!(surface.backgrounds().len(), 1);
        assert_eq!(bouncer.stats().wall_hits, 2);
        assert_eq!(bouncer.stats().ticks, 110);
    }

    #[test]
    fn corner_hit_recolors_once() {
        let mut bouncer = Bouncer::new(
            SceneState::new(748, 548, 5, 4),
            SpriteMetrics {
                width: 100,
                height: 100,
                text_offset_y: 0,
            },
            Bounds::new(800, 600),
        );
        let mut surface = RecordingSurface::default();
        let mut rng = StdRng::seed_from_u64(3);
        bouncer.tick(&mut surface, &mut rng);
        assert_eq!(surface.backgrounds().len(), 1);
        assert_eq!(bouncer.stats().wall_hits, 1);
        assert_eq!((bouncer.scene().dx, bouncer.scene().dy), (-5, -4));
    }

    #[test]
    fn paused_tick_is_inert() {
        let mut bouncer = demo_bouncer();
        let mut surface = RecordingSurface::default();
        let mut rng = StdRng::seed_from_u64(1);
        bouncer.toggle_pause(&mut surface);
        surface.clear();

        let before = *bouncer.scene();
        assert_eq!(bouncer.tick(&mut surface, &mut rng), TickOutcome::Paused);
        assert_eq!(*bouncer.scene(), before);
        assert!(surface.calls.is_empty());
        assert_eq!(bouncer.stats().ticks, 0);
    }

    #[test]
    fn toggle_pause_drives_overlay() {
        let mut bouncer = demo_bouncer();
        let mut surface = RecordingSurface::default();
        assert!(bouncer.toggle_pause(&mut surface));
        assert_eq!(surface.overlay_visible(), Some(true));
        assert!(!bouncer.toggle_pause(&mut surface));
        assert_eq!(surface.overlay_visible(), Some(false));
    }

    #[test]
    fn even_number_of_toggles_restores_state() {
        let mut bouncer = demo_bouncer();
        let mut surface = RecordingSurface::default();
        bouncer.place(&mut surface);
        let initial_paused = bouncer.scene().is_paused();
        let initial_overlay = surface.overlay_visible();

        for _ in 0..6 {
            bouncer.toggle_pause(&mut surface);
        }
        assert_eq!(bouncer.scene().is_paused(), initial_paused);
        assert_eq!(surface.overlay_visible(), initial_overlay);
    }

    #[test]
    fn resume_continues_from_paused_position() {
        let mut bouncer = demo_bouncer();
        let mut surface = RecordingSurface::default();
        let mut rng = StdRng::seed_from_u64(5);
        bouncer.tick(&mut surface, &mut rng);
        bouncer.toggle_pause(&mut surface);
        for _ in 0..10 {
            bouncer.tick(&mut surface, &mut rng);
        }
        bouncer.toggle_pause(&mut surface);
        bouncer.tick(&mut surface, &mut rng);
        assert_eq!((bouncer.scene().x, bouncer.scene().y), (210, 208));
    }

    #[test]
    fn same_seed_gives_same_colors() {
        let run = |seed| {
            let mut bouncer = demo_bouncer();
            let mut surface = RecordingSurface::default();
            let mut rng = StdRng::seed_from_u64(seed);
            for _ in 0..500 {
                bouncer.tick(&mut surface, &mut rng);
            }
            surface.backgrounds()
        };
        let first = run(42);
        assert!(!first.is_empty());
        assert_eq!(first, run(42));
    }
}
