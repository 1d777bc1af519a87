//! Scene lifecycle
//!
//! A scene is one screen of gameplay. The host ([`SceneView`](crate::view::SceneView))
//! presents it, then calls the hooks below once per fixed step in this order:
//! `update`, contact delivery, `did_simulate_physics`, `did_finish_update`.

use glam::Vec2;

use super::contact::{ContactListener, dispatch};
use super::world::PhysicsWorld;

/// Timing for the step being run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInfo {
    /// Seconds since the scene was presented
    pub current_time: f64,
    /// Fixed step length in seconds
    pub dt: f32,
    /// Steps run since the scene was presented
    pub frame: u64,
}

pub trait Scene: ContactListener {
    /// Scene size in points
    fn size(&self) -> Vec2;

    fn physics_world(&self) -> &PhysicsWorld;

    fn physics_world_mut(&mut self) -> &mut PhysicsWorld;

    /// Called once when a view starts presenting the scene
    fn did_move_to_view(&mut self, _frame: &FrameInfo) {}

    /// Called once per step before contacts are delivered
    fn update(&mut self, _frame: &FrameInfo) {}

    /// Called after this step's contacts were delivered
    fn did_simulate_physics(&mut self, _frame: &FrameInfo) {}

    /// Last hook of every step
    fn did_finish_update(&mut self, _frame: &FrameInfo) {}

    /// Called once when the view stops presenting the scene
    fn will_move_from_view(&mut self) {}
}

/// Drain the scene's physics world and deliver the notices to the scene itself
pub fn simulate_physics<S: Scene + ?Sized>(scene: &mut S) -> usize {
    let notices = scene.physics_world_mut().drain_contacts();
    dispatch(scene, notices)
}
