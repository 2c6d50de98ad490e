//! Deferred work items.
//!
//! Everything the scheduler holds is one of three concrete things: take the
//! attacker snapshot for a queued attack, land a snapshotted attack, or run
//! an ability continuation. Continuations own every input they need; they
//! receive the engine mutably when they run and never borrow it in between.

use std::fmt;
use std::rc::Rc;

use super::Engine;
use crate::combat::{AttackInfo, AttackPattern, AttackerSnapshot, Element, HitEvent};
use crate::error::SimError;
use crate::stats::StatusKey;
use crate::types::CharIndex;

/// Callback invoked once per target hit.
pub type OnHit = Rc<dyn Fn(&mut Engine, &HitEvent) -> Result<(), SimError>>;

/// One-shot ability continuation.
pub type Continuation = Box<dyn FnOnce(&mut Engine) -> Result<(), SimError>>;

/// An attack handed to the resolver, plus how and when to land it.
#[derive(Clone)]
pub struct AttackRequest {
    pub attack: AttackInfo,
    pub pattern: AttackPattern,
    /// Frames until the attacker's stats are captured.
    pub delay: i64,
    /// Frames from the snapshot until the hit lands.
    pub travel: i64,
    /// Status that must still be active when the hit lands.
    pub guard: Option<StatusKey>,
    pub on_hit: Option<OnHit>,
    /// Energy particles dropped once the attack hits something.
    pub particles: Option<Particles>,
}

/// Elemental particles generated by a hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particles {
    pub element: Element,
    pub count: f64,
    /// Frames from the hit until the party picks them up.
    pub delay: i64,
}

impl AttackRequest {
    pub fn new(attack: AttackInfo, pattern: AttackPattern) -> Self {
        Self {
            attack,
            pattern,
            delay: 0,
            travel: 0,
            guard: None,
            on_hit: None,
            particles: None,
        }
    }

    #[must_use]
    pub fn with_delay(mut self, delay: i64) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub fn with_travel(mut self, travel: i64) -> Self {
        self.travel = travel;
        self
    }

    #[must_use]
    pub fn with_guard(mut self, guard: StatusKey) -> Self {
        self.guard = Some(guard);
        self
    }

    #[must_use]
    pub fn with_callback(mut self, on_hit: OnHit) -> Self {
        self.on_hit = Some(on_hit);
        self
    }

    #[must_use]
    pub fn with_particles(mut self, element: Element, count: f64, delay: i64) -> Self {
        self.particles = Some(Particles { element, count, delay });
        self
    }

    pub fn with_optional_callback(self, on_hit: Option<OnHit>) -> Self {
        match on_hit {
            Some(cb) => self.with_callback(cb),
            None => self,
        }
    }
}

impl fmt::Debug for AttackRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttackRequest")
            .field("label", &self.attack.label)
            .field("delay", &self.delay)
            .field("travel", &self.travel)
            .field("guard", &self.guard)
            .field("on_hit", &self.on_hit.is_some())
            .field("particles", &self.particles)
            .finish()
    }
}

/// An attack whose snapshot has been taken.
pub struct LandingAttack {
    pub request: AttackRequest,
    pub snapshot: AttackerSnapshot,
}

pub enum Task {
    Snapshot(Box<AttackRequest>),
    Land(Box<LandingAttack>),
    Continuation {
        actor: Option<CharIndex>,
        label: &'static str,
        run: Continuation,
    },
}

impl Task {
    pub fn label(&self) -> &str {
        match self {
            Task::Snapshot(request) => &request.attack.label,
            Task::Land(landing) => &landing.request.attack.label,
            Task::Continuation { label, .. } => label,
        }
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Task::Snapshot(request) => f.debug_tuple("Snapshot").field(request).finish(),
            Task::Land(landing) => f.debug_tuple("Land").field(&landing.request).finish(),
            Task::Continuation { actor, label, .. } => f
                .debug_struct("Continuation")
                .field("actor", actor)
                .field("label", label)
                .finish(),
        }
    }
}
