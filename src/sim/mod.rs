//! Scene simulation core
//!
//! Everything a host needs to drive a scene lives here. It must stay
//! deterministic and free of rendering or platform dependencies:
//! - Contacts are reported by an external engine, never detected here
//! - Stable ordering (bodies and pairs by id, notices by report order)
//! - Counters only change through accessors or installed handlers

pub mod body;
pub mod contact;
pub mod game_scene;
pub mod scene;
pub mod world;

pub use body::{ALL_CATEGORIES, BodyId, BodyRef, PhysicsBody};
pub use contact::{ContactEvent, ContactListener, ContactNotice, ContactPhase, dispatch};
pub use game_scene::{ContactStats, Counters, GameScene};
pub use scene::{FrameInfo, Scene, simulate_physics};
pub use world::{PhysicsError, PhysicsWorld};
