//! Contact events and the listener capability
//!
//! The physics engine never calls game code directly. It reports contacts to a
//! [`PhysicsWorld`](super::PhysicsWorld), which queues [`ContactNotice`]s; the scene
//! drains the queue once per step and feeds it to a [`ContactListener`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{BodyId, BodyRef};

/// Whether two bodies started or stopped touching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactPhase {
    Begin,
    End,
}

/// A contact between two bodies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactEvent {
    pub body_a: BodyRef,
    pub body_b: BodyRef,
    /// Contact point in scene coordinates
    pub point: Vec2,
    /// Contact normal, pointing from `body_a` toward `body_b`
    pub normal: Vec2,
    /// Impulse applied at the contact (0 for end events)
    pub impulse: f32,
}

impl ContactEvent {
    /// True if either body belongs to any of the given categories
    pub fn involves(&self, category: u32) -> bool {
        (self.body_a.category_mask & category) != 0 || (self.body_b.category_mask & category) != 0
    }

    /// The body on the other side of the contact from `id`
    pub fn other(&self, id: BodyId) -> Option<&BodyRef> {
        if self.body_a.id == id {
            Some(&self.body_b)
        } else if self.body_b.id == id {
            Some(&self.body_a)
        } else {
            None
        }
    }

    /// Reorder so `body_a` has the lower category mask.
    ///
    /// Handlers can then match on `(first, second)` without checking both
    /// permutations. The normal is flipped when the bodies swap.
    pub fn sorted_by_category(&self) -> ContactEvent {
        if self.body_a.category_mask <= self.body_b.category_mask {
            self.clone()
        } else {
            ContactEvent {
                body_a: self.body_b.clone(),
                body_b: self.body_a.clone(),
                point: self.point,
                normal: -self.normal,
                impulse: self.impulse,
            }
        }
    }
}

/// A queued contact waiting for delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactNotice {
    pub phase: ContactPhase,
    pub contact: ContactEvent,
}

/// Receives contact notifications from the physics world.
///
/// Both callbacks default to doing nothing, so a listener only implements the
/// phases it cares about.
pub trait ContactListener {
    fn did_begin_contact(&mut self, _contact: &ContactEvent) {}

    fn did_end_contact(&mut self, _contact: &ContactEvent) {}
}

/// Deliver notices in order, returning how many were delivered
pub fn dispatch<L, I>(listener: &mut L, notices: I) -> usize
where
    L: ContactListener + ?Sized,
    I: IntoIterator<Item = ContactNotice>,
{
    let mut delivered = 0;
    for notice in notices {
        match notice.phase {
            ContactPhase::Begin => listener.did_begin_contact(&notice.contact),
            ContactPhase::End => listener.did_end_contact(&notice.contact),
        }
        delivered += 1;
    }
    delivered
}
