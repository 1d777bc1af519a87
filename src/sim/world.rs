//! Body registry and contact bookkeeping
//!
//! The world does not move anything. An external engine reports when two
//! bodies touch or separate; the world filters those reports through the
//! bodies' masks, keeps begin/end edge-triggered per pair, and queues the
//! resulting notices until the scene drains them.

use std::collections::BTreeMap;

use glam::Vec2;
use thiserror::Error;

use super::body::{BodyId, BodyRef, PhysicsBody};
use super::contact::{ContactEvent, ContactNotice, ContactPhase};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhysicsError {
    #[error("unknown {0}")]
    UnknownBody(BodyId),
    #[error("{0} cannot contact itself")]
    SelfContact(BodyId),
    #[error("body ids exhausted")]
    IdsExhausted,
}

/// Unordered pair key, smaller id first
type PairKey = (BodyId, BodyId);

fn pair_key(a: BodyId, b: BodyId) -> PairKey {
    if a <= b { (a, b) } else { (b, a) }
}

#[derive(Debug, Default)]
pub struct PhysicsWorld {
    /// Registered bodies, ordered by id
    bodies: BTreeMap<BodyId, PhysicsBody>,
    /// Pairs currently touching, with the event that began the contact
    active: BTreeMap<PairKey, ContactEvent>,
    /// Notices waiting for the next drain, in report order
    pending: Vec<ContactNotice>,
    next_id: u32,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a body. Ids are never reused within a world, so a world
    /// accepts at most `u32::MAX` bodies over its lifetime.
    pub fn add_body(&mut self, body: PhysicsBody) -> Result<BodyId, PhysicsError> {
        let id = BodyId(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or(PhysicsError::IdsExhausted)?;
        self.bodies.insert(id, body);
        Ok(id)
    }

    pub fn body(&self, id: BodyId) -> Option<&PhysicsBody> {
        self.bodies.get(&id)
    }

    /// Mutable access to a body's masks. Contacts already active are kept.
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut PhysicsBody> {
        self.bodies.get_mut(&id)
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &PhysicsBody)> {
        self.bodies.iter().map(|(id, body)| (*id, body))
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Remove a body, ending every contact it is part of
    pub fn remove_body(&mut self, id: BodyId) -> Result<PhysicsBody, PhysicsError> {
        if !self.bodies.contains_key(&id) {
            return Err(PhysicsError::UnknownBody(id));
        }

        let touching: Vec<PairKey> = self
            .active
            .keys()
            .filter(|(a, b)| *a == id || *b == id)
            .copied()
            .collect();
        for key in touching {
            if let Some(begun) = self.active.remove(&key) {
                self.pending.push(end_notice(begun));
            }
        }

        self.bodies.remove(&id).ok_or(PhysicsError::UnknownBody(id))
    }

    /// Report that two bodies started touching.
    ///
    /// Returns `Ok(true)` if a begin notice was queued, `Ok(false)` if the masks
    /// filter the pair out or the pair is already touching.
    pub fn report_contact(
        &mut self,
        a: BodyId,
        b: BodyId,
        point: Vec2,
        normal: Vec2,
        impulse: f32,
    ) -> Result<bool, PhysicsError> {
        let (body_a, body_b) = self.pair(a, b)?;

        if !body_a.notifies_with(body_b) {
            return Ok(false);
        }

        let key = pair_key(a, b);
        if self.active.contains_key(&key) {
            return Ok(false);
        }

        let contact = ContactEvent {
            body_a: BodyRef::new(a, body_a),
            body_b: BodyRef::new(b, body_b),
            point,
            normal,
            impulse,
        };
        self.active.insert(key, contact.clone());
        self.pending.push(ContactNotice {
            phase: ContactPhase::Begin,
            contact,
        });
        Ok(true)
    }

    /// Report that two bodies stopped touching.
    ///
    /// Returns `Ok(true)` if an end notice was queued, `Ok(false)` if the pair
    /// was not touching.
    pub fn report_separation(&mut self, a: BodyId, b: BodyId) -> Result<bool, PhysicsError> {
        self.pair(a, b)?;

        match self.active.remove(&pair_key(a, b)) {
            Some(begun) => {
                self.pending.push(end_notice(begun));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn is_touching(&self, a: BodyId, b: BodyId) -> bool {
        self.active.contains_key(&pair_key(a, b))
    }

    /// Active contacts, ordered by pair
    pub fn active_contacts(&self) -> impl Iterator<Item = &ContactEvent> {
        self.active.values()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Take every queued notice, in report order
    pub fn drain_contacts(&mut self) -> Vec<ContactNotice> {
        std::mem::take(&mut self.pending)
    }

    fn pair(&self, a: BodyId, b: BodyId) -> Result<(&PhysicsBody, &PhysicsBody), PhysicsError> {
        if a == b {
            return Err(PhysicsError::SelfContact(a));
        }
        let body_a = self.bodies.get(&a).ok_or(PhysicsError::UnknownBody(a))?;
        let body_b = self.bodies.get(&b).ok_or(PhysicsError::UnknownBody(b))?;
        Ok((body_a, body_b))
    }
}

/// End notice for a contact that began earlier; impulse is zero on separation
fn end_notice(begun: ContactEvent) -> ContactNotice {
    ContactNotice {
        phase: ContactPhase::End,
        contact: ContactEvent {
            impulse: 0.0,
            ..begun
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BALL: u32 = 0x1;
    const HALO: u32 = 0x2;
    const EDGE: u32 = 0x4;

    /// World with a ball, a halo that listens for balls, and a silent edge
    fn setup() -> (PhysicsWorld, BodyId, BodyId, BodyId) {
        let mut world = PhysicsWorld::new();
        let ball = world
            .add_body(PhysicsBody::new().with_name("ball").with_category(BALL))
            .unwrap();
        let halo = world
            .add_body(
                PhysicsBody::new()
                    .with_name("halo")
                    .with_category(HALO)
                    .with_contact_test(BALL),
            )
            .unwrap();
        let edge = world
            .add_body(PhysicsBody::new().with_name("edge").with_category(EDGE))
            .unwrap();
        (world, ball, halo, edge)
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut world = PhysicsWorld::new();
        let a = world.add_body(PhysicsBody::new()).unwrap();
        world.remove_body(a).unwrap();
        let b = world.add_body(PhysicsBody::new()).unwrap();
        assert_ne!(a, b);
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn test_add_body_when_ids_run_out() {
        let mut world = PhysicsWorld::new();
        world.next_id = u32::MAX - 1;
        let last = world.add_body(PhysicsBody::new()).unwrap();
        assert_eq!(last, BodyId(u32::MAX - 1));
        assert_eq!(
            world.add_body(PhysicsBody::new()),
            Err(PhysicsError::IdsExhausted)
        );
        // The failed call registers nothing
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn test_begin_is_queued() {
        let (mut world, ball, halo, _) = setup();
        let queued = world
            .report_contact(ball, halo, Vec2::new(5.0, 5.0), Vec2::Y, 2.0)
            .unwrap();
        assert!(queued);
        assert!(world.is_touching(halo, ball));

        let notices = world.drain_contacts();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].phase, ContactPhase::Begin);
        assert_eq!(notices[0].contact.body_a.id, ball);
        assert_eq!(notices[0].contact.body_b.id, halo);
        assert_eq!(notices[0].contact.body_b.name.as_deref(), Some("halo"));
        assert_eq!(notices[0].contact.impulse, 2.0);
        assert!(world.drain_contacts().is_empty());
    }

    #[test]
    fn test_filtered_pair_is_not_queued() {
        let (mut world, ball, _, edge) = setup();
        let queued = world
            .report_contact(ball, edge, Vec2::ZERO, Vec2::X, 1.0)
            .unwrap();
        assert!(!queued);
        assert!(!world.is_touching(ball, edge));
        assert_eq!(world.pending_len(), 0);
    }

    #[test]
    fn test_begin_is_edge_triggered() {
        let (mut world, ball, halo, _) = setup();
        assert!(world.report_contact(ball, halo, Vec2::ZERO, Vec2::X, 1.0).unwrap());
        assert!(!world.report_contact(halo, ball, Vec2::ZERO, Vec2::X, 1.0).unwrap());
        assert_eq!(world.drain_contacts().len(), 1);
    }

    #[test]
    fn test_separation_carries_begin_geometry() {
        let (mut world, ball, halo, _) = setup();
        world
            .report_contact(ball, halo, Vec2::new(1.0, 2.0), Vec2::Y, 4.0)
            .unwrap();
        assert!(world.report_separation(halo, ball).unwrap());
        assert!(!world.is_touching(ball, halo));

        let notices = world.drain_contacts();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[1].phase, ContactPhase::End);
        assert_eq!(notices[1].contact.point, Vec2::new(1.0, 2.0));
        assert_eq!(notices[1].contact.normal, Vec2::Y);
        assert_eq!(notices[1].contact.impulse, 0.0);
    }

    #[test]
    fn test_separation_without_contact() {
        let (mut world, ball, halo, _) = setup();
        assert!(!world.report_separation(ball, halo).unwrap());
        assert_eq!(world.pending_len(), 0);
    }

    #[test]
    fn test_errors() {
        let (mut world, ball, _, _) = setup();
        let ghost = BodyId(99);
        assert_eq!(
            world.report_contact(ball, ghost, Vec2::ZERO, Vec2::X, 0.0),
            Err(PhysicsError::UnknownBody(ghost))
        );
        assert_eq!(
            world.report_contact(ball, ball, Vec2::ZERO, Vec2::X, 0.0),
            Err(PhysicsError::SelfContact(ball))
        );
        assert_eq!(
            world.report_separation(ghost, ball),
            Err(PhysicsError::UnknownBody(ghost))
        );
        assert_eq!(world.remove_body(ghost), Err(PhysicsError::UnknownBody(ghost)));
    }

    #[test]
    fn test_remove_body_ends_its_contacts() {
        let mut world = PhysicsWorld::new();
        let halo = world
            .add_body(PhysicsBody::new().with_category(HALO).with_contact_test(BALL))
            .unwrap();
        let ball_1 = world.add_body(PhysicsBody::new().with_category(BALL)).unwrap();
        let ball_2 = world.add_body(PhysicsBody::new().with_category(BALL)).unwrap();
        world.report_contact(ball_1, halo, Vec2::ZERO, Vec2::X, 1.0).unwrap();
        world.report_contact(ball_2, halo, Vec2::ZERO, Vec2::X, 1.0).unwrap();
        world.drain_contacts();

        let removed = world.remove_body(halo).unwrap();
        assert_eq!(removed.category_mask, HALO);
        assert!(world.body(halo).is_none());
        assert_eq!(world.active_contacts().count(), 0);

        let notices = world.drain_contacts();
        assert_eq!(notices.len(), 2);
        assert!(notices.iter().all(|n| n.phase == ContactPhase::End));
    }

    #[test]
    fn test_body_mut_changes_future_filtering() {
        let (mut world, ball, _, edge) = setup();
        world.body_mut(edge).unwrap().contact_test_mask = BALL;
        assert!(world.report_contact(edge, ball, Vec2::ZERO, Vec2::X, 1.0).unwrap());
    }

    proptest! {
        #[test]
        fn prop_touching_is_symmetric(swap_begin: bool, swap_end: bool) {
            let (mut world, ball, halo, _) = setup();
            let (a, b) = if swap_begin { (halo, ball) } else { (ball, halo) };
            prop_assert!(world.report_contact(a, b, Vec2::ZERO, Vec2::X, 1.0).unwrap());
            prop_assert!(world.is_touching(ball, halo));
            prop_assert!(world.is_touching(halo, ball));

            let (a, b) = if swap_end { (halo, ball) } else { (ball, halo) };
            prop_assert!(world.report_separation(a, b).unwrap());
            prop_assert!(!world.is_touching(ball, halo));
            prop_assert_eq!(world.drain_contacts().len(), 2);
        }

        #[test]
        fn prop_begin_end_alternate(reports in proptest::collection::vec(any::<bool>(), 0..32)) {
            let (mut world, ball, halo, _) = setup();
            for touching in reports {
                if touching {
                    world.report_contact(ball, halo, Vec2::ZERO, Vec2::X, 1.0).unwrap();
                } else {
                    world.report_separation(ball, halo).unwrap();
                }
            }
            let notices = world.drain_contacts();
            for (i, notice) in notices.iter().enumerate() {
                let expected = if i % 2 == 0 { ContactPhase::Begin } else { ContactPhase::End };
                prop_assert_eq!(notice.phase, expected);
            }
        }
    }
}
