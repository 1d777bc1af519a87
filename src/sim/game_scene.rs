//! The Space Cannon gameplay scene
//!
//! Tracks the player's ammo and score and listens for physics contacts.
//! The scene itself applies no rules: what a contact does to the counters is
//! decided by handlers installed with [`GameScene::on_begin_contact`] and
//! [`GameScene::on_end_contact`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::contact::{ContactEvent, ContactListener};
use super::scene::{FrameInfo, Scene};
use super::world::PhysicsWorld;
use crate::consts;
use crate::settings::{Settings, SettingsError};

/// The scene's integer counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub ammo: i32,
    pub score: i32,
}

impl Counters {
    pub fn new(ammo: i32, score: i32) -> Self {
        Self { ammo, score }
    }

    pub fn ammo(&self) -> i32 {
        self.ammo
    }

    pub fn set_ammo(&mut self, ammo: i32) {
        self.ammo = ammo;
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn set_score(&mut self, score: i32) {
        self.score = score;
    }

    /// Saturating add, returns the new ammo
    pub fn add_ammo(&mut self, delta: i32) -> i32 {
        self.ammo = self.ammo.saturating_add(delta);
        self.ammo
    }

    /// Saturating add, returns the new score
    pub fn add_score(&mut self, delta: i32) -> i32 {
        self.score = self.score.saturating_add(delta);
        self.score
    }
}

/// Contact notifications seen by a scene
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactStats {
    pub begun: u64,
    pub ended: u64,
}

type ContactHandler = Box<dyn FnMut(&mut Counters, &ContactEvent)>;

pub struct GameScene {
    size: Vec2,
    counters: Counters,
    world: PhysicsWorld,
    stats: ContactStats,
    on_begin: Option<ContactHandler>,
    on_end: Option<ContactHandler>,
    presented: bool,
    last_frame: FrameInfo,
}

impl std::fmt::Debug for GameScene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameScene")
            .field("size", &self.size)
            .field("counters", &self.counters)
            .field("bodies", &self.world.len())
            .field("stats", &self.stats)
            .field("presented", &self.presented)
            .finish_non_exhaustive()
    }
}

impl Default for GameScene {
    fn default() -> Self {
        Self::new(Vec2::new(consts::SCENE_WIDTH, consts::SCENE_HEIGHT))
    }
}

impl GameScene {
    /// New scene of the given size with both counters at zero
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            counters: Counters::default(),
            world: PhysicsWorld::new(),
            stats: ContactStats::default(),
            on_begin: None,
            on_end: None,
            presented: false,
            last_frame: FrameInfo::default(),
        }
    }

    /// Scene sized and seeded from validated settings
    pub fn from_settings(settings: &Settings) -> Result<Self, SettingsError> {
        settings.validate()?;
        let mut scene = Self::new(Vec2::new(settings.scene_width, settings.scene_height));
        scene.counters = Counters::new(settings.initial_ammo, settings.initial_score);
        Ok(scene)
    }

    pub fn ammo(&self) -> i32 {
        self.counters.ammo
    }

    pub fn set_ammo(&mut self, ammo: i32) {
        self.counters.set_ammo(ammo);
    }

    pub fn score(&self) -> i32 {
        self.counters.score
    }

    pub fn set_score(&mut self, score: i32) {
        self.counters.set_score(score);
    }

    pub fn add_ammo(&mut self, delta: i32) -> i32 {
        self.counters.add_ammo(delta)
    }

    pub fn add_score(&mut self, delta: i32) -> i32 {
        self.counters.add_score(delta)
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn contact_stats(&self) -> ContactStats {
        self.stats
    }

    /// Whether a view is currently presenting this scene
    pub fn is_presented(&self) -> bool {
        self.presented
    }

    /// Timing of the most recent step
    pub fn last_frame(&self) -> FrameInfo {
        self.last_frame
    }

    /// Install the handler run for every delivered begin contact, replacing any previous one
    pub fn on_begin_contact<F>(&mut self, handler: F)
    where
        F: FnMut(&mut Counters, &ContactEvent) + 'static,
    {
        self.on_begin = Some(Box::new(handler));
    }

    /// Install the handler run for every delivered end contact, replacing any previous one
    pub fn on_end_contact<F>(&mut self, handler: F)
    where
        F: FnMut(&mut Counters, &ContactEvent) + 'static,
    {
        self.on_end = Some(Box::new(handler));
    }

    pub fn clear_contact_handlers(&mut self) {
        self.on_begin = None;
        self.on_end = None;
    }
}

impl ContactListener for GameScene {
    fn did_begin_contact(&mut self, contact: &ContactEvent) {
        self.stats.begun += 1;
        log::debug!(
            "contact began: {} <-> {} at ({:.1}, {:.1}) impulse {:.2}",
            contact.body_a.label(),
            contact.body_b.label(),
            contact.point.x,
            contact.point.y,
            contact.impulse
        );
        if let Some(handler) = self.on_begin.as_mut() {
            handler(&mut self.counters, contact);
        }
    }

    fn did_end_contact(&mut self, contact: &ContactEvent) {
        self.stats.ended += 1;
        log::debug!(
            "contact ended: {} <-> {}",
            contact.body_a.label(),
            contact.body_b.label()
        );
        if let Some(handler) = self.on_end.as_mut() {
            handler(&mut self.counters, contact);
        }
    }
}

impl Scene for GameScene {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn physics_world(&self) -> &PhysicsWorld {
        &self.world
    }

    fn physics_world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    fn did_move_to_view(&mut self, frame: &FrameInfo) {
        self.presented = true;
        self.last_frame = *frame;
        log::info!(
            "GameScene presented ({}x{}, ammo {}, score {})",
            self.size.x,
            self.size.y,
            self.counters.ammo,
            self.counters.score
        );
    }

    fn update(&mut self, frame: &FrameInfo) {
        self.last_frame = *frame;
    }

    fn will_move_from_view(&mut self) {
        self.presented = false;
        log::info!(
            "GameScene leaving view after {} frames (ammo {}, score {})",
            self.last_frame.frame,
            self.counters.ammo,
            self.counters.score
        );
    }
}
