//! Physics body descriptors
//!
//! A body here is only an identity plus the bitmasks the contact filter reads.
//! Positions and velocities belong to the external engine that detects contacts.

use serde::{Deserialize, Serialize};

/// Bitmask with every category bit set
pub const ALL_CATEGORIES: u32 = u32::MAX;

/// Handle for a body registered in a [`PhysicsWorld`](super::PhysicsWorld)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl std::fmt::Display for BodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "body#{}", self.0)
    }
}

/// A physics-enabled body as seen by the contact filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicsBody {
    /// Optional label, only used for logs and reports
    #[serde(default)]
    pub name: Option<String>,
    /// Categories this body belongs to
    #[serde(default = "all_categories")]
    pub category_mask: u32,
    /// Categories this body bounces off (kept for the host engine)
    #[serde(default = "all_categories")]
    pub collision_mask: u32,
    /// Categories that trigger contact notifications with this body
    #[serde(default)]
    pub contact_test_mask: u32,
}

fn all_categories() -> u32 {
    ALL_CATEGORIES
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self {
            name: None,
            category_mask: ALL_CATEGORIES,
            collision_mask: ALL_CATEGORIES,
            contact_test_mask: 0,
        }
    }
}

impl PhysicsBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_category(mut self, mask: u32) -> Self {
        self.category_mask = mask;
        self
    }

    pub fn with_collision(mut self, mask: u32) -> Self {
        self.collision_mask = mask;
        self
    }

    pub fn with_contact_test(mut self, mask: u32) -> Self {
        self.contact_test_mask = mask;
        self
    }

    /// Whether a contact between `self` and `other` should be reported.
    ///
    /// Symmetric: either body's contact-test mask may select the other's category.
    pub fn notifies_with(&self, other: &PhysicsBody) -> bool {
        (self.contact_test_mask & other.category_mask) != 0
            || (other.contact_test_mask & self.category_mask) != 0
    }

    /// Whether the host engine should resolve a collision between the two.
    /// Unlike contacts this is one-sided.
    pub fn collides_with(&self, other: &PhysicsBody) -> bool {
        (self.collision_mask & other.category_mask) != 0
    }
}

/// Snapshot of a body carried inside a contact event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyRef {
    pub id: BodyId,
    pub name: Option<String>,
    pub category_mask: u32,
}

impl BodyRef {
    pub fn new(id: BodyId, body: &PhysicsBody) -> Self {
        Self {
            id,
            name: body.name.clone(),
            category_mask: body.category_mask,
        }
    }

    /// Label for logs: the name if present, otherwise the id
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("{}({})", name, self.id),
            None => self.id.to_string(),
        }
    }
}
