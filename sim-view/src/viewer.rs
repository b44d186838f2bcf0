//! Interactive 2D particle fluid viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the [`Simulation`] and the
//! pool size policies and implements [`eframe::App`] to drive, draw and
//! tweak the fluid through an egui UI.

use eframe::App;
use glam::Vec2;
use rand::rng;
use sim_core::{
    bound::Bound,
    config::{Config, PairResolution},
    forcing::{Gravity, PointerAttractor},
    phases::FrameStats,
    policy::{FrameRateController, PoolAdjustment, RatioController, apply_adjustment},
    simulation::Simulation,
};

const INITIAL_PARTICLES: usize = 500;
const INITIAL_AREA: Bound = Bound::from_size(800.0, 600.0);
const FLUID_COLOR: egui::Color32 = egui::Color32::from_rgb(0x1c, 0x79, 0xff);

/// How the particle count is chosen each frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PoolMode {
    Fixed,
    FrameRate,
    Ratio,
}

/// Main application state for the interactive viewer.
///
/// The typical per-frame update is:
/// 1. Handle UI interactions / input.
/// 2. Resize the simulation to the canvas.
/// 3. If `running`, apply the pool policy and call [`Viewer::step_once`].
/// 4. Render particles and, optionally, the quadtree partition.
///
/// ### Fields
/// - `sim` - The fluid: particle pool, quadtree and physics config.
/// - `gravity_dir` - Orientation vector scaled by `Config::gravity`.
/// - `steer_strength` - Pull toward the pointer while the canvas is held.
///
/// - `pool_mode` - Which policy sizes the pool.
/// - `fps_ctl` / `ratio_ctl` - The two pool policies.
///
/// - `stats` - Counters from the last frame (for display only).
/// - `fps` - Latest frame rate measured by egui.
pub struct Viewer {
    sim: Simulation,
    rng: rand::rngs::ThreadRng,

    running: bool,
    show_tree: bool,
    gravity_dir: Vec2,
    steer_strength: f32,

    pool_mode: PoolMode,
    fps_ctl: FrameRateController,
    ratio_ctl: RatioController,

    stats: FrameStats,
    fps: f32,
}

impl Viewer {
    /// Creates a viewer with [`INITIAL_PARTICLES`] particles scattered over
    /// a default-sized area. The area follows the canvas from the first
    /// frame on.
    ///
    /// ### Errors
    /// Fails if `cfg` does not pass [`Config::validate`].
    pub fn new(cfg: Config) -> sim_core::Result<Self> {
        let mut rng = rng();
        let sim = Simulation::with_random_particles(INITIAL_AREA, cfg, INITIAL_PARTICLES, &mut rng)?;

        Ok(Self {
            sim,
            rng,
            running: true,
            show_tree: false,
            gravity_dir: Vec2::Y,
            steer_strength: 0.3,
            pool_mode: PoolMode::FrameRate,
            fps_ctl: FrameRateController::default(),
            ratio_ctl: RatioController::new(0.5, 2000),
            stats: FrameStats::default(),
            fps: 0.0,
        })
    }

    /// Replaces every particle with a fresh random scatter of
    /// [`INITIAL_PARTICLES`], keeping the config and area.
    fn reset(&mut self) {
        let bound = self.sim.bound();
        let pool = self.sim.particles_mut();
        pool.clear();
        pool.spawn_random(INITIAL_PARTICLES, &bound, &mut self.rng);
        self.fps_ctl.reset();
        self.stats = FrameStats::default();
    }

    /// Removes every particle.
    fn clear(&mut self) {
        self.sim.particles_mut().clear();
        self.stats = FrameStats::default();
    }

    /// Advances the fluid by a single frame.
    ///
    /// With `pointer` set, particles are also pulled toward it.
    fn step_once(&mut self, pointer: Option<Vec2>) {
        let gravity = Gravity {
            direction: self.gravity_dir,
            strength: self.sim.config().gravity,
        };
        self.stats = match pointer {
            Some(target) => self.sim.step(&PointerAttractor {
                gravity,
                target,
                strength: self.steer_strength,
            }),
            None => self.sim.step(&gravity),
        };
    }

    /// Grows or shrinks the pool according to the selected policy.
    fn apply_pool_policy(&mut self) {
        let adjustment = match self.pool_mode {
            PoolMode::Fixed => PoolAdjustment::Hold,
            PoolMode::FrameRate => self.fps_ctl.observe(self.fps),
            PoolMode::Ratio => self.ratio_ctl.adjust(self.sim.particles().len()),
        };
        let bound = self.sim.bound();
        apply_adjustment(self.sim.particles_mut(), adjustment, &bound, &mut self.rng);
    }

    /// Converts a simulation position to screen-space.
    ///
    /// The simulation area is anchored at the canvas' top-left corner with
    /// `y` growing downward, so this is a plain offset.
    fn world_to_screen(p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        egui::pos2(rect.min.x + p.x, rect.min.y + p.y)
    }

    /// Inverse of [`Viewer::world_to_screen`].
    fn screen_to_world(p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        Vec2::new(p.x - rect.min.x, p.y - rect.min.y)
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    ///
    /// ### Returns
    /// `true` if the value was edited this frame.
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) -> bool {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed))
                .changed()
        })
        .inner
    }

    /// Helper to draw a labeled `usize` [`egui::DragValue`].
    fn labeled_drag_usize(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut usize,
        range: std::ops::RangeInclusive<usize>,
        speed: f64,
    ) -> bool {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed))
                .changed()
        })
        .inner
    }

    /// Builds the top panel UI (run controls, stepping, overlays).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                if ui.button("Step").clicked() {
                    self.step_once(None);
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                if ui.button("Clear").clicked() {
                    self.clear();
                }

                ui.separator();
                ui.checkbox(&mut self.show_tree, "Quadtree");
            });
        });
    }

    /// Builds the bottom status bar (frame rate, counts, index stats).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let mean = self.fps_ctl.mean().unwrap_or(self.fps);
                ui.label(format!("fps = {mean:.1}"));
                ui.separator();
                ui.label(format!("particles = {}", self.sim.particles().len()));
                ui.label(format!("dropped = {}", self.stats.dropped));
                ui.label(format!("pairs = {}", self.stats.pairs));
                ui.separator();
                let index = self.sim.index();
                ui.label(format!("nodes = {}", index.node_count()));
                ui.label(format!("depth = {}", index.depth()));
                ui.label(format!("frame = {}", self.sim.frame()));
            });
        });
    }

    /// Builds the right-hand panel for physics parameters and pool policy.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");
                let mut cfg = *self.sim.config();
                let mut changed = false;

                ui.separator();
                ui.label("Particles");
                changed |= Self::labeled_drag_f32(ui, "radius:", &mut cfg.radius, 1.0..=30.0, 0.1);
                changed |= Self::labeled_drag_f32(ui, "bounce:", &mut cfg.bounce, 0.0..=2.0, 0.01);

                ui.separator();
                ui.label("Motion");
                changed |=
                    Self::labeled_drag_f32(ui, "friction:", &mut cfg.friction, 0.0..=1.0, 0.001);
                changed |=
                    Self::labeled_drag_f32(ui, "max_speed:", &mut cfg.max_speed, 0.1..=50.0, 0.1);

                ui.separator();
                ui.label("Gravity");
                changed |= Self::labeled_drag_f32(ui, "gravity:", &mut cfg.gravity, 0.0..=1.0, 0.005);
                Self::labeled_drag_f32(ui, "dir.x:", &mut self.gravity_dir.x, -1.0..=1.0, 0.05);
                Self::labeled_drag_f32(ui, "dir.y:", &mut self.gravity_dir.y, -1.0..=1.0, 0.05);
                Self::labeled_drag_f32(ui, "steer:", &mut self.steer_strength, 0.0..=2.0, 0.01);

                ui.separator();
                ui.label("Index");
                changed |= Self::labeled_drag_usize(ui, "capacity:", &mut cfg.capacity, 1..=200, 1.0);
                ui.horizontal(|ui| {
                    ui.label("max_depth:");
                    changed |= ui
                        .add(egui::DragValue::new(&mut cfg.max_depth).range(1..=24))
                        .changed();
                });

                ui.separator();
                ui.label("Pair resolution");
                ui.horizontal(|ui| {
                    changed |= ui
                        .selectable_value(&mut cfg.resolution, PairResolution::Deferred, "Deferred")
                        .changed();
                    changed |= ui
                        .selectable_value(&mut cfg.resolution, PairResolution::Immediate, "Immediate")
                        .changed();
                });

                if changed && let Err(e) = self.sim.set_config(cfg) {
                    log::warn!("rejected config edit: {e}");
                }

                ui.separator();
                ui.label("Pool size");
                ui.radio_value(&mut self.pool_mode, PoolMode::Fixed, "Fixed");
                ui.radio_value(&mut self.pool_mode, PoolMode::FrameRate, "Follow frame rate");
                ui.radio_value(&mut self.pool_mode, PoolMode::Ratio, "Ratio");
                if self.pool_mode == PoolMode::Ratio {
                    ui.add(egui::Slider::new(&mut self.ratio_ctl.ratio, 0.0..=1.0).text("ratio"));
                    Self::labeled_drag_usize(
                        ui,
                        "max:",
                        &mut self.ratio_ctl.max_particles,
                        0..=10_000,
                        10.0,
                    );
                }

                ui.separator();
                if ui.button("Reset cfg to default").clicked() {
                    if let Err(e) = self.sim.set_config(Config::default()) {
                        log::warn!("default config rejected: {e}");
                    }
                    self.gravity_dir = Vec2::Y;
                }
            });
    }

    /// Draws the quadtree partition from the last frame.
    fn ui_tree_overlay(&self, painter: &egui::Painter, rect: egui::Rect) {
        let stroke = egui::Stroke::new(0.5, egui::Color32::from_gray(90));
        for b in self.sim.index().bounds() {
            let min = Self::world_to_screen(Vec2::new(b.x, b.y), rect);
            let cell = egui::Rect::from_min_size(min, egui::vec2(b.width, b.height));
            painter.rect_stroke(cell, 0.0, stroke, egui::StrokeKind::Inside);
        }
    }

    /// Builds the central panel where the fluid is simulated and drawn.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // The canvas is the container.
            let area = Bound::from_size(rect.width(), rect.height());
            let sized = match self.sim.resize(area) {
                Ok(()) => true,
                Err(e) => {
                    log::debug!("skipping frame: {e}");
                    false
                }
            };

            // Steer toward the pointer while the canvas is held.
            let pointer = if response.is_pointer_button_down_on() {
                response
                    .interact_pointer_pos()
                    .map(|p| Self::screen_to_world(p, rect))
            } else {
                None
            };

            if self.running && sized {
                self.apply_pool_policy();
                self.step_once(pointer);
                ctx.request_repaint();
            }

            if self.show_tree {
                self.ui_tree_overlay(&painter, rect);
            }

            let r = self.sim.config().radius;
            for p in self.sim.particles().positions() {
                painter.circle_filled(Self::world_to_screen(p, rect), r, FLUID_COLOR);
            }
        });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let dt = ctx.input(|i| i.stable_dt);
        if dt > 0.0 {
            self.fps = 1.0 / dt;
        }

        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::new(40.0, 25.0), egui::vec2(800.0, 600.0))
    }

    fn viewer() -> Viewer {
        match Viewer::new(Config::default()) {
            Ok(v) => v,
            Err(e) => panic!("default config rejected: {e}"),
        }
    }

    #[test]
    fn world_to_screen_and_back_is_roundtrip() {
        let rect = test_rect();
        let world_points = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 500.0),
            Vec2::new(799.5, 3.25),
        ];

        for p in world_points {
            let screen = Viewer::world_to_screen(p, rect);
            let back = Viewer::screen_to_world(screen, rect);
            assert!(
                (back - p).length() < 1e-4,
                "roundtrip mismatch: p={p:?}, back={back:?}"
            );
        }
        assert_eq!(
            Viewer::world_to_screen(Vec2::ZERO, rect),
            egui::pos2(40.0, 25.0)
        );
    }

    #[test]
    fn reset_restores_initial_particles() {
        let mut viewer = viewer();
        viewer.sim.particles_mut().remove_particles(100);
        viewer.stats.pairs = 7;

        viewer.reset();

        assert_eq!(viewer.sim.particles().len(), INITIAL_PARTICLES);
        assert!(
            viewer
                .sim
                .particles()
                .iter()
                .all(|p| p.previous.is_none())
        );
        assert_eq!(viewer.stats, FrameStats::default());
    }

    #[test]
    fn clear_removes_all_particles() {
        let mut viewer = viewer();
        assert!(!viewer.sim.particles().is_empty());

        viewer.clear();

        assert!(viewer.sim.particles().is_empty());
        viewer.step_once(None);
        assert_eq!(viewer.stats, FrameStats::default());
    }

    #[test]
    fn step_once_moves_a_lone_particle_with_gravity() {
        let mut viewer = viewer();
        viewer.clear();
        viewer
            .sim
            .particles_mut()
            .add_particle(Vec2::new(400.0, 300.0));

        viewer.step_once(None);

        let p = viewer.sim.particles()[0].position;
        let g = viewer.sim.config().gravity;
        assert!((p - Vec2::new(400.0, 300.0 + g)).length() < 1e-4);
        assert_eq!(viewer.stats.indexed, 1);
    }

    #[test]
    fn step_once_steers_toward_pointer() {
        let mut viewer = viewer();
        viewer.clear();
        viewer.gravity_dir = Vec2::ZERO;
        viewer
            .sim
            .particles_mut()
            .add_particle(Vec2::new(400.0, 300.0));

        viewer.step_once(Some(Vec2::new(500.0, 300.0)));

        let p = viewer.sim.particles()[0].position;
        assert!((p - Vec2::new(400.0 + viewer.steer_strength, 300.0)).length() < 1e-4);
    }

    #[test]
    fn ratio_policy_grows_toward_target() {
        let mut viewer = viewer();
        viewer.clear();
        viewer.pool_mode = PoolMode::Ratio;
        viewer.ratio_ctl = RatioController::new(0.5, 20);

        for _ in 0..10 {
            viewer.apply_pool_policy();
        }

        assert_eq!(viewer.sim.particles().len(), 10);
    }

    #[test]
    fn starts_sizing_pool_by_frame_rate() {
        let mut viewer = viewer();
        assert_eq!(viewer.pool_mode, PoolMode::FrameRate);

        viewer.fps = 60.0;
        viewer.apply_pool_policy();
        assert_eq!(viewer.sim.particles().len(), INITIAL_PARTICLES + 3);

        viewer.fps_ctl.reset();
        viewer.fps = 20.0;
        viewer.apply_pool_policy();
        assert_eq!(viewer.sim.particles().len(), INITIAL_PARTICLES);
    }
}
