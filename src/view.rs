//! Scene host
//!
//! Presents one scene at a time and drives it with a fixed timestep. Frame
//! times go into an accumulator that is drained in `fixed_dt` steps, capped at
//! `max_substeps` per advance.

use crate::settings::{Settings, SettingsError};
use crate::sim::{FrameInfo, Scene, simulate_physics};

#[derive(Debug)]
pub struct SceneView<S: Scene> {
    scene: Option<S>,
    fixed_dt: f32,
    max_substeps: u32,
    max_frame_dt: f32,
    accumulator: f32,
    current_time: f64,
    frames: u64,
    paused: bool,
}

impl<S: Scene> SceneView<S> {
    /// Build a view with the timing from `settings`, rejecting settings that
    /// would stall or run away the step loop.
    pub fn new(settings: &Settings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            scene: None,
            fixed_dt: settings.fixed_dt,
            max_substeps: settings.max_substeps,
            max_frame_dt: settings.max_frame_dt,
            accumulator: 0.0,
            current_time: 0.0,
            frames: 0,
            paused: false,
        })
    }

    /// Present `scene`, returning the scene it replaces.
    ///
    /// Timing restarts from zero for the new scene.
    pub fn present_scene(&mut self, mut scene: S) -> Option<S> {
        let previous = self.take_scene();

        self.accumulator = 0.0;
        self.current_time = 0.0;
        self.frames = 0;

        scene.did_move_to_view(&self.frame_info());
        self.scene = Some(scene);
        previous
    }

    /// Stop presenting the current scene and hand it back
    pub fn take_scene(&mut self) -> Option<S> {
        let mut scene = self.scene.take()?;
        scene.will_move_from_view();
        Some(scene)
    }

    pub fn scene(&self) -> Option<&S> {
        self.scene.as_ref()
    }

    pub fn scene_mut(&mut self) -> Option<&mut S> {
        self.scene.as_mut()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        if paused != self.paused {
            log::info!("{}", if paused { "Paused" } else { "Resumed" });
        }
        self.paused = paused;
        self.accumulator = 0.0;
    }

    /// Steps run since the current scene was presented
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Simulated seconds since the current scene was presented
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Feed one frame's elapsed time and run the steps it pays for.
    ///
    /// Returns the number of steps run.
    pub fn advance(&mut self, dt: f32) -> u32 {
        if self.paused || self.scene.is_none() {
            return 0;
        }

        // NaN fails every comparison, so it lands on 0
        let dt = if dt > 0.0 { dt.min(self.max_frame_dt) } else { 0.0 };
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= self.fixed_dt && substeps < self.max_substeps {
            self.step();
            self.accumulator -= self.fixed_dt;
            substeps += 1;
        }

        // Drop what the cap left behind instead of carrying it forward
        if substeps == self.max_substeps && self.accumulator >= self.fixed_dt {
            log::warn!(
                "Dropped {:.3}s of frame time after {} substeps",
                self.accumulator,
                substeps
            );
            self.accumulator = 0.0;
        }

        substeps
    }

    /// Run exactly one fixed step, ignoring pause. Returns false with no scene.
    pub fn step(&mut self) -> bool {
        let frame = self.frame_info();
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };

        scene.update(&frame);
        simulate_physics(scene);
        scene.did_simulate_physics(&frame);
        scene.did_finish_update(&frame);

        self.frames += 1;
        self.current_time += self.fixed_dt as f64;
        true
    }

    fn frame_info(&self) -> FrameInfo {
        FrameInfo {
            current_time: self.current_time,
            dt: self.fixed_dt,
            frame: self.frames,
        }
    }
}
