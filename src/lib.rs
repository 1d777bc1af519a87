//! Space Cannon - scene core for a 2D arcade game
//!
//! Core modules:
//! - `sim`: Scene, counters and physics-contact notification
//! - `view`: Fixed-timestep host that presents and drives a scene
//! - `settings`: JSON configuration with environment overrides

pub mod settings;
pub mod sim;
pub mod view;

pub use settings::{Settings, SettingsError};
pub use sim::{ContactEvent, ContactListener, Counters, GameScene, PhysicsWorld, Scene};
pub use view::SceneView;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one step per display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame time fed to the host in one go (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default scene size in points (portrait phone screen)
    pub const SCENE_WIDTH: f32 = 320.0;
    pub const SCENE_HEIGHT: f32 = 568.0;
}
