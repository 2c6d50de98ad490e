//! The per-run engine.
//!
//! One [`Engine`] owns every piece of mutable state of a run: the clock and
//! task queue, the party, the target roster, ICD and damage bookkeeping, and
//! the modifier and status registries. Independent runs build independent
//! engines and share nothing.
//!
//! # Resolution pipeline
//!
//! ```text
//! resolve(request)
//!   └─ delay ─▶ Snapshot  (attacker stats frozen)
//!                 └─ travel ─▶ Land
//!                               ├─ guard status still active?
//!                               ├─ pattern → targets
//!                               ├─ per target: ICD, damage, event, on_hit
//!                               ├─ first qualifying hit: hit-lag
//!                               └─ particles, once per landing
//! ```
//!
//! A zero delay snapshots in the caller's frame, and a zero travel lands in
//! the snapshot's frame, so `delay == travel == 0` resolves immediately.

mod scheduler;
mod task;

pub use scheduler::{ScheduleError, Scheduler};
pub use task::{AttackRequest, Continuation, LandingAttack, OnHit, Particles, Task};

use arrayvec::ArrayVec;

use crate::action::{ActionError, ActionInfo, ActionKind, AnimationState, FrameTable, Params};
use crate::character::{CharacterProfile, CharacterState, ParticleReceiver};
use crate::combat::{
    AttackFlags, AttackInfo, AttackerSnapshot, CombatRoster, DamageLog, Element, HitEvent,
    HitlagController, IcdTracker, Point, Target, damage,
};
use crate::config::SimConfig;
use crate::error::{EngineError, SimError};
use crate::stats::{
    ClockView, Duration, Expiry, ModContext, ModifierRegistry, Stat, StatMod, StatVector, StatusKey, StatusRegistry,
};
use crate::types::{CharIndex, EntityId, Frame, TargetKey};

/// Targets, ICD windows and the damage trace.
#[derive(Debug, Default)]
pub struct CombatState {
    pub roster: CombatRoster,
    pub icd: IcdTracker,
    pub log: DamageLog,
}

#[derive(Debug)]
pub struct Engine {
    config: SimConfig,
    scheduler: Scheduler<Task>,
    hitlag: HitlagController,
    party: ArrayVec<CharacterState, { SimConfig::MAX_PARTY }>,
    active: Option<CharIndex>,
    swap_ready_at: Frame,
    combat: CombatState,
    modifiers: ModifierRegistry,
    statuses: StatusRegistry,
}

impl Engine {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            scheduler: Scheduler::new(),
            hitlag: HitlagController::new(),
            party: ArrayVec::new(),
            active: None,
            swap_ready_at: Frame::ZERO,
            combat: CombatState {
                roster: CombatRoster::new(Point::ORIGIN),
                ..CombatState::default()
            },
            modifiers: ModifierRegistry::new(),
            statuses: StatusRegistry::new(),
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    // ========================================================================
    // Clock
    // ========================================================================

    pub fn now(&self) -> Frame {
        self.scheduler.now()
    }

    /// Wall frame minus accumulated hit-lag.
    pub fn logical_now(&self) -> i64 {
        self.scheduler.logical_now()
    }

    fn clock(&self) -> ClockView {
        ClockView {
            now: self.now(),
            logical: self.logical_now(),
        }
    }

    /// Advances one frame and runs every task due on it.
    ///
    /// A failing task aborts the run: the scheduler is torn down and the
    /// error is returned. Every later call fails with
    /// [`ScheduleError::TornDown`].
    pub fn advance(&mut self) -> Result<Frame, SimError> {
        if self.scheduler.is_torn_down() {
            return Err(ScheduleError::TornDown { at: self.now() }.into());
        }

        let batch = self.scheduler.advance();
        let now = self.now();
        self.statuses.remove_expired(self.clock());

        if !batch.is_empty() {
            tracing::trace!(frame = now.0, tasks = batch.len(), "draining frame");
        }
        for task in batch {
            if let Err(err) = self.run_task(task) {
                tracing::error!(
                    frame = now.0,
                    code = err.error_code(),
                    severity = err.severity().as_str(),
                    "task failed, aborting run: {err}"
                );
                self.scheduler.tear_down();
                return Err(err);
            }
        }
        Ok(now)
    }

    pub fn advance_by(&mut self, frames: u64) -> Result<Frame, SimError> {
        let target = self.now() + frames;
        self.run_until(target)?;
        Ok(self.now())
    }

    /// Advances until `now == frame`. No-op if already there or past it.
    pub fn run_until(&mut self, frame: Frame) -> Result<(), SimError> {
        while self.now() < frame {
            self.advance()?;
        }
        Ok(())
    }

    pub fn pending(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn next_due(&self) -> Option<Frame> {
        self.scheduler.next_due()
    }

    /// Ends the run: drops pending work and rejects further scheduling.
    pub fn tear_down(&mut self) {
        self.scheduler.tear_down();
    }

    pub fn is_torn_down(&self) -> bool {
        self.scheduler.is_torn_down()
    }

    fn run_task(&mut self, task: Task) -> Result<(), SimError> {
        match task {
            Task::Snapshot(request) => self.launch(*request),
            Task::Land(landing) => self.land(*landing),
            Task::Continuation { actor, label, run } => {
                tracing::trace!(frame = self.now().0, ?actor, label, "continuation");
                run(self)
            }
        }
    }

    // ========================================================================
    // Scheduling
    // ========================================================================

    /// Runs `run` `delay` frames from now. A zero delay runs next frame.
    pub fn schedule<F>(&mut self, delay: i64, label: &'static str, run: F) -> Result<Frame, SimError>
    where
        F: FnOnce(&mut Engine) -> Result<(), SimError> + 'static,
    {
        self.push_continuation(None, delay, label, Box::new(run))
    }

    /// Like [`Engine::schedule`], tagged with the owning character.
    pub fn schedule_for<F>(
        &mut self,
        actor: CharIndex,
        delay: i64,
        label: &'static str,
        run: F,
    ) -> Result<Frame, SimError>
    where
        F: FnOnce(&mut Engine) -> Result<(), SimError> + 'static,
    {
        self.push_continuation(Some(actor), delay, label, Box::new(run))
    }

    fn push_continuation(
        &mut self,
        actor: Option<CharIndex>,
        delay: i64,
        label: &'static str,
        run: Continuation,
    ) -> Result<Frame, SimError> {
        let at = self
            .scheduler
            .schedule(delay, Task::Continuation { actor, label, run })?;
        tracing::debug!(frame = self.now().0, at = at.0, ?actor, label, "scheduled");
        Ok(at)
    }

    // ========================================================================
    // Combat resolution
    // ========================================================================

    /// Queues an attack. See the module docs for timing.
    pub fn resolve(&mut self, request: AttackRequest) -> Result<(), SimError> {
        if request.delay == 0 {
            return self.launch(request);
        }
        let delay = request.delay;
        let at = self.scheduler.schedule(delay, Task::Snapshot(Box::new(request)))?;
        tracing::debug!(frame = self.now().0, snapshot_at = at.0, "attack queued");
        Ok(())
    }

    fn launch(&mut self, request: AttackRequest) -> Result<(), SimError> {
        let snapshot = self.snapshot_of(request.attack.actor)?;
        let landing = LandingAttack { request, snapshot };
        if landing.request.travel == 0 {
            return self.land(landing);
        }
        let travel = landing.request.travel;
        self.scheduler.schedule(travel, Task::Land(Box::new(landing)))?;
        Ok(())
    }

    fn land(&mut self, landing: LandingAttack) -> Result<(), SimError> {
        let LandingAttack { request, snapshot } = landing;
        let now = self.now();
        let attack = &request.attack;

        if let Some(guard) = &request.guard {
            if !self.statuses.is_active(guard, self.clock()) {
                tracing::debug!(frame = now.0, label = %attack.label, %guard, "guard lapsed, attack dropped");
                return Ok(());
            }
        }

        let hits = request.pattern.select(&self.combat.roster);
        if hits.is_empty() {
            tracing::warn!(frame = now.0, actor = %attack.actor, label = %attack.label, "attack matched no targets");
            return Ok(());
        }

        let rule = self.config.icd_rule(attack.icd_group);
        let mut froze = false;
        for key in hits {
            let shred = self.target_stats(key)?;
            let applies = self
                .combat
                .icd
                .check(key, attack.actor, attack.icd_tag, &rule, now);

            let target = self.combat.roster.get_mut(key)?;
            let roll = damage::compute(attack, &snapshot, target, &shred);
            let durability = if applies { attack.durability } else { 0.0 };
            let weak_point = attack.has(AttackFlags::HIT_WEAK_POINT) && target.weak_point;
            target.damage_taken += roll.amount;
            target.hits_taken += 1;
            target.applied_durability += durability;

            let event = HitEvent {
                frame: now,
                actor: attack.actor,
                target: key,
                label: attack.label.clone(),
                tag: attack.tag,
                element: attack.element,
                amount: roll.amount,
                durability,
                weak_point,
                crit_rate: roll.crit_rate,
            };
            tracing::debug!(
                frame = now.0,
                actor = %attack.actor,
                target = %key,
                label = %attack.label,
                amount = roll.amount,
                applied = applies,
                "hit"
            );
            self.combat.log.push(event.clone());

            if !froze && Self::hitlag_qualifies(attack, weak_point) {
                self.apply_hitlag(attack.hitlag.halt_frames, attack.hitlag.factor);
                froze = true;
            }
            if let Some(on_hit) = &request.on_hit {
                on_hit(self, &event)?;
            }
        }

        if let Some(particles) = request.particles {
            self.queue_particles(particles)?;
        }
        Ok(())
    }

    fn queue_particles(&mut self, particles: Particles) -> Result<(), SimError> {
        let Particles { element, count, delay } = particles;
        if delay == 0 {
            return self.distribute_particles(element, count);
        }
        self.schedule(delay, "particles", move |e| e.distribute_particles(element, count))?;
        Ok(())
    }

    fn hitlag_qualifies(attack: &AttackInfo, weak_point: bool) -> bool {
        !attack.hitlag.is_none() && (!attack.has(AttackFlags::HITLAG_HEADSHOT_ONLY) || weak_point)
    }

    /// Freezes pending work. Returns the whole frames applied.
    pub fn apply_hitlag(&mut self, halt_frames: f64, factor: f64) -> u64 {
        if !self.config.hitlag_enabled {
            return 0;
        }
        let frames = self.hitlag.apply(halt_frames, factor);
        if frames > 0 {
            self.scheduler.delay_all(frames);
            tracing::debug!(frame = self.now().0, frames, total = self.scheduler.lag(), "hitlag");
        }
        frames
    }

    pub fn hitlag(&self) -> &HitlagController {
        &self.hitlag
    }

    pub fn damage_log(&self) -> &DamageLog {
        &self.combat.log
    }

    // ========================================================================
    // Targets
    // ========================================================================

    pub fn add_target(&mut self, target: Target) {
        self.modifiers.register(EntityId::Target(target.key));
        self.combat.roster.add(target);
    }

    pub fn roster(&self) -> &CombatRoster {
        &self.combat.roster
    }

    pub fn roster_mut(&mut self) -> &mut CombatRoster {
        &mut self.combat.roster
    }

    /// Modifier totals on a target (shred and similar debuffs).
    pub fn target_stats(&mut self, key: TargetKey) -> Result<StatVector, SimError> {
        let clock = self.clock();
        let ctx = ModContext {
            clock,
            owner: EntityId::Target(key),
            base: None,
            tags: None,
            statuses: &self.statuses,
        };
        Ok(self.modifiers.query_all(&ctx)?)
    }

    // ========================================================================
    // Party
    // ========================================================================

    /// Adds a party member. The first member starts on field.
    pub fn add_character(&mut self, profile: CharacterProfile) -> Result<CharIndex, SimError> {
        if self.party.is_full() {
            return Err(ActionError::PartyFull {
                capacity: SimConfig::MAX_PARTY,
            }
            .into());
        }
        let index = CharIndex(self.party.len());
        tracing::debug!(%index, name = %profile.name, "character joined");
        self.party.push(CharacterState::new(profile));
        self.modifiers.register(index.into());
        self.active.get_or_insert(index);
        Ok(index)
    }

    pub fn character(&self, index: CharIndex) -> Result<&CharacterState, ActionError> {
        self.party
            .get(index.0)
            .ok_or(ActionError::UnknownCharacter { index })
    }

    pub fn character_mut(&mut self, index: CharIndex) -> Result<&mut CharacterState, ActionError> {
        self.party
            .get_mut(index.0)
            .ok_or(ActionError::UnknownCharacter { index })
    }

    pub fn party(&self) -> &[CharacterState] {
        &self.party
    }

    pub fn party_indices(&self) -> impl Iterator<Item = CharIndex> + use<> {
        (0..self.party.len()).map(CharIndex)
    }

    pub fn active(&self) -> Option<CharIndex> {
        self.active
    }

    pub fn is_active(&self, index: CharIndex) -> bool {
        self.active == Some(index)
    }

    pub fn tag(&self, actor: CharIndex, key: &str) -> Result<i64, SimError> {
        Ok(self.character(actor)?.tag(key))
    }

    pub fn set_tag(&mut self, actor: CharIndex, key: &str, value: i64) -> Result<(), SimError> {
        self.character_mut(actor)?.set_tag(key, value);
        Ok(())
    }

    // ========================================================================
    // Energy
    // ========================================================================

    pub fn energy(&self, actor: CharIndex) -> Result<f64, SimError> {
        Ok(self.character(actor)?.energy.current())
    }

    pub fn add_energy(&mut self, actor: CharIndex, amount: f64) -> Result<f64, SimError> {
        Ok(self.character_mut(actor)?.energy.add(amount))
    }

    /// Removes exactly `amount` or fails with a recoverable error.
    pub fn consume_energy(&mut self, actor: CharIndex, amount: f64) -> Result<(), SimError> {
        let state = self.character_mut(actor)?;
        state
            .energy
            .consume(amount)
            .map_err(|have| ActionError::InsufficientEnergy {
                actor,
                have,
                need: amount,
            })?;
        Ok(())
    }

    /// Removes up to `amount`; returns what was taken.
    pub fn consume_energy_up_to(&mut self, actor: CharIndex, amount: f64) -> Result<f64, SimError> {
        Ok(self.character_mut(actor)?.energy.consume_up_to(amount))
    }

    pub fn drain_energy(&mut self, actor: CharIndex) -> Result<f64, SimError> {
        let drained = self.character_mut(actor)?.energy.drain();
        tracing::debug!(frame = self.now().0, %actor, drained, "energy drained");
        Ok(drained)
    }

    /// Hands `count` particles of `source` to the whole party.
    pub fn distribute_particles(&mut self, source: Element, count: f64) -> Result<(), SimError> {
        for index in self.party_indices() {
            let er = self.stat(index, Stat::EnergyRecharge)?;
            let on_field = self.is_active(index);
            let energy = self.config.energy.clone();
            let state = self.character_mut(index)?;
            let receiver = ParticleReceiver {
                element: state.profile.element,
                on_field,
            };
            let gained = state
                .energy
                .receive_particles(source, count, receiver, er, &energy);
            tracing::trace!(frame = self.now().0, %index, gained, "particles");
        }
        Ok(())
    }

    // ========================================================================
    // Stats and modifiers
    // ========================================================================

    pub fn add_modifier(&mut self, owner: impl Into<EntityId>, modifier: StatMod) -> Result<(), SimError> {
        let owner = owner.into();
        let clock = self.clock();
        tracing::debug!(frame = clock.now.0, %owner, key = modifier.key(), "modifier added");
        self.modifiers.add(owner, modifier, clock)?;
        Ok(())
    }

    /// Drops a modifier before it expires. Returns true if it was present.
    pub fn remove_modifier(&mut self, owner: impl Into<EntityId>, key: &str) -> Result<bool, SimError> {
        let owner = owner.into();
        let removed = self.modifiers.remove(owner, key)?;
        tracing::debug!(frame = self.now().0, %owner, key, removed, "modifier removed");
        Ok(removed)
    }

    pub fn modifier_active(&self, owner: impl Into<EntityId>, key: &str) -> Result<bool, SimError> {
        Ok(self.modifiers.is_active(owner.into(), key, self.clock())?)
    }

    pub fn modifier_remaining(
        &self,
        owner: impl Into<EntityId>,
        key: &str,
    ) -> Result<Option<Duration>, SimError> {
        Ok(self.modifiers.remaining(owner.into(), key, self.clock())?)
    }

    /// Profile stats plus every active modifier.
    pub fn stats(&mut self, actor: CharIndex) -> Result<StatVector, SimError> {
        let clock = self.clock();
        let state = self
            .party
            .get(actor.0)
            .ok_or(ActionError::UnknownCharacter { index: actor })?;
        let ctx = ModContext {
            clock,
            owner: actor.into(),
            base: Some(&state.profile.stats),
            tags: Some(&state.tags),
            statuses: &self.statuses,
        };
        let mods = self.modifiers.query_all(&ctx)?;
        Ok(state.profile.stats + mods)
    }

    pub fn stat(&mut self, actor: CharIndex, stat: Stat) -> Result<f64, SimError> {
        Ok(self.stats(actor)?[stat])
    }

    /// Value of `stat` on any registered entity.
    pub fn query_stat(&mut self, owner: impl Into<EntityId>, stat: Stat) -> Result<f64, SimError> {
        match owner.into() {
            EntityId::Character(index) => self.stat(index, stat),
            EntityId::Target(key) => Ok(self.target_stats(key)?[stat]),
        }
    }

    /// Frozen attacker stats, as used by queued attacks.
    pub fn snapshot_of(&mut self, actor: CharIndex) -> Result<AttackerSnapshot, SimError> {
        let stats = self.stats(actor)?;
        let profile = &self.character(actor)?.profile;
        Ok(AttackerSnapshot {
            level: profile.level,
            base: profile.base,
            stats,
        })
    }

    // ========================================================================
    // Statuses
    // ========================================================================

    /// Sets a status for `duration` wall frames.
    pub fn add_status(&mut self, key: StatusKey, duration: u64) -> Frame {
        let expires_at = self.now() + duration;
        self.add_status_for(key, Duration::Frames(duration));
        expires_at
    }

    /// Sets a status with any [`Duration`]. `FramesWithHitlag` statuses are
    /// pushed back by hit-lag together with pending tasks.
    pub fn add_status_for(&mut self, key: StatusKey, duration: Duration) -> Expiry {
        let clock = self.clock();
        let expiry = self.statuses.add(key.clone(), clock, duration);
        tracing::debug!(frame = clock.now.0, status = %key, ?expiry, "status added");
        expiry
    }

    pub fn status_active(&self, key: &StatusKey) -> bool {
        self.statuses.is_active(key, self.clock())
    }

    /// Frames left on a status; `None` when it is permanent.
    pub fn status_remaining(&self, key: &StatusKey) -> Option<u64> {
        self.statuses.remaining(key, self.clock())
    }

    pub fn statuses(&self) -> &StatusRegistry {
        &self.statuses
    }

    // ========================================================================
    // Action gating
    // ========================================================================

    /// Validates that `actor` may start `kind` now (animation, cooldown,
    /// field presence). Kit-specific checks are separate.
    pub fn check_action(&self, actor: CharIndex, kind: ActionKind) -> Result<(), SimError> {
        let state = self.character(actor)?;
        if kind == ActionKind::Swap {
            return self.check_swap(actor);
        }
        if !self.is_active(actor) {
            return Err(ActionError::NotOnField { actor }.into());
        }
        state.actions.check(kind, self.now())?;
        Ok(())
    }

    fn check_swap(&self, to: CharIndex) -> Result<(), SimError> {
        let now = self.now();
        let Some(from) = self.active else {
            return Ok(());
        };
        if from == to {
            return Err(ActionError::AlreadyOnField { actor: to }.into());
        }
        if now < self.swap_ready_at {
            return Err(ActionError::OnCooldown {
                action: ActionKind::Swap,
                ready_at: self.swap_ready_at,
            }
            .into());
        }
        self.character(from)?.actions.check(ActionKind::Swap, now)?;
        Ok(())
    }

    /// Earliest frame `kind` could start for `actor`, given animation and
    /// cooldown state only.
    pub fn action_ready_at(&self, actor: CharIndex, kind: ActionKind) -> Result<Frame, SimError> {
        if kind == ActionKind::Swap {
            let from = self.active.unwrap_or(actor);
            let animation = self.character(from)?.actions.ready_at(ActionKind::Swap);
            return Ok(animation.max(self.swap_ready_at));
        }
        Ok(self.character(actor)?.actions.ready_at(kind))
    }

    /// Records that `actor` started `kind` now.
    pub fn begin_action(&mut self, actor: CharIndex, kind: ActionKind, info: ActionInfo) -> Result<(), SimError> {
        let now = self.now();
        let state = self.character_mut(actor)?;
        if kind != ActionKind::Attack {
            state.reset_normal();
        }
        state.actions.begin(kind, info, now);
        Ok(())
    }

    pub fn set_cooldown(&mut self, actor: CharIndex, kind: ActionKind, frames: u64) -> Result<(), SimError> {
        let now = self.now();
        self.character_mut(actor)?.actions.set_cooldown(kind, now, frames);
        Ok(())
    }

    /// Brings `to` on field.
    pub fn swap_to(&mut self, to: CharIndex) -> Result<ActionInfo, SimError> {
        self.check_swap(to)?;
        let now = self.now();
        if let Some(from) = self.active {
            self.character_mut(from)?.actions.interrupt();
        }
        self.active = Some(to);
        self.swap_ready_at = now + u64::from(self.config.swap_cooldown_frames);

        let frames = self.config.movement.swap;
        let info = ActionInfo::new(FrameTable::uniform(frames), frames, AnimationState::Swap);
        self.begin_action(to, ActionKind::Swap, info)?;
        tracing::info!(frame = now.0, %to, "swap");
        Ok(info)
    }

    /// Frame data for dash, jump and walk.
    pub fn movement_info(&self, kind: ActionKind, params: &Params) -> Result<ActionInfo, SimError> {
        let frames = match kind {
            ActionKind::Dash => self.config.movement.dash,
            ActionKind::Jump => self.config.movement.jump,
            ActionKind::Walk => {
                params.expect_only(kind, &["f"])?;
                let f = params.get_or("f", 1);
                u32::try_from(f)
                    .ok()
                    .filter(|f| *f > 0)
                    .ok_or_else(|| ActionError::InvalidParam {
                        action: kind,
                        key: "f".to_string(),
                        value: f,
                    })?
            }
            _ => {
                let actor = self.active.unwrap_or_default();
                return Err(ActionError::Unsupported { actor, action: kind }.into());
            }
        };
        Ok(ActionInfo::new(
            FrameTable::uniform(frames),
            frames,
            kind.default_state(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::combat::{AttackPattern, AttackTag, IcdTag, IcdGroup};
    use crate::error::ErrorSeverity;
    use crate::stats::BaseStats;

    fn engine(config: SimConfig) -> Engine {
        let mut engine = Engine::new(config);
        engine
            .add_character(CharacterProfile::new(
                "tester",
                Element::Cryo,
                BaseStats::new(10_000.0, 1000.0, 700.0),
                60.0,
            ))
            .unwrap();
        engine.add_target(Target::new(TargetKey(1), Point::new(0.0, 2.0)));
        engine
    }

    fn hit(label: &str) -> AttackInfo {
        AttackInfo::new(CharIndex(0), label, AttackTag::Normal).multiplier(1.0)
    }

    fn near() -> AttackPattern {
        AttackPattern::circle_on_player(0.5, 3.0)
    }

    #[test]
    fn zero_delay_resolves_in_callers_frame() {
        let mut engine = engine(SimConfig::without_hitlag());
        engine.run_until(Frame(10)).unwrap();
        engine.resolve(AttackRequest::new(hit("now"), near())).unwrap();

        assert_eq!(engine.damage_log().frames_of("now"), vec![10]);
    }

    #[test]
    fn delay_then_travel_lands_after_both() {
        let mut engine = engine(SimConfig::without_hitlag());
        engine
            .resolve(AttackRequest::new(hit("arrow"), near()).with_delay(5).with_travel(10))
            .unwrap();
        engine.run_until(Frame(30)).unwrap();

        assert_eq!(engine.damage_log().frames_of("arrow"), vec![15]);
    }

    #[test]
    fn snapshot_is_taken_before_travel() {
        let mut engine = engine(SimConfig::without_hitlag());
        engine
            .resolve(AttackRequest::new(hit("slow"), near()).with_travel(20))
            .unwrap();
        engine
            .add_modifier(CharIndex(0), StatMod::snapshot("late-buff", Stat::Atk, 1000.0, Duration::Permanent))
            .unwrap();
        engine
            .resolve(AttackRequest::new(hit("fast"), near()).with_travel(20))
            .unwrap();
        engine.run_until(Frame(30)).unwrap();

        let totals = engine.damage_log().totals_by_label();
        assert!((totals["fast"] - 2.0 * totals["slow"]).abs() < 1e-9);
    }

    #[test]
    fn zero_targets_emit_nothing_and_no_hitlag() {
        let mut engine = engine(SimConfig::new());
        let far = AttackPattern::circle_on_player(50.0, 1.0);
        engine
            .resolve(AttackRequest::new(hit("miss").hitlag(6.0, 0.01), far))
            .unwrap();

        assert!(engine.damage_log().is_empty());
        assert_eq!(engine.hitlag().events(), 0);
    }

    #[test]
    fn hitlag_applies_once_per_resolution_and_shifts_pending() {
        let mut engine = engine(SimConfig::new());
        engine.add_target(Target::new(TargetKey(2), Point::new(1.0, 2.0)));
        let fired = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&fired);
        engine
            .schedule(20, "later", move |e| {
                sink.borrow_mut().push(e.now().0);
                Ok(())
            })
            .unwrap();

        engine
            .resolve(AttackRequest::new(hit("slam").hitlag(3.6, 0.01), near()))
            .unwrap();
        assert_eq!(engine.damage_log().len(), 2);
        assert_eq!(engine.hitlag().total_frames(), 3);

        engine.run_until(Frame(40)).unwrap();
        assert_eq!(*fired.borrow(), vec![23]);
    }

    #[test]
    fn headshot_only_hitlag_needs_weak_point() {
        let mut engine = engine(SimConfig::new());
        let body = hit("body").hitlag(7.2, 0.01).flags(AttackFlags::HITLAG_HEADSHOT_ONLY);
        let head = body.clone().labeled("head").flags(AttackFlags::HIT_WEAK_POINT);

        engine.resolve(AttackRequest::new(body, near())).unwrap();
        assert_eq!(engine.hitlag().events(), 0);
        engine.resolve(AttackRequest::new(head, near())).unwrap();
        assert_eq!(engine.hitlag().total_frames(), 7);
    }

    #[test]
    fn disabled_hitlag_never_freezes() {
        let mut engine = engine(SimConfig::without_hitlag());
        engine
            .resolve(AttackRequest::new(hit("slam").hitlag(6.0, 0.01), near()))
            .unwrap();
        assert_eq!(engine.logical_now(), 0);
        assert_eq!(engine.hitlag().events(), 0);
    }

    #[test]
    fn icd_suppresses_application_not_damage() {
        let mut engine = engine(SimConfig::without_hitlag());
        let tagged = hit("na").icd(IcdTag::NormalAttack, IcdGroup::Default).element(Element::Cryo, 25.0);
        for delay in [1, 2] {
            engine
                .resolve(AttackRequest::new(tagged.clone(), near()).with_delay(delay))
                .unwrap();
        }
        engine.run_until(Frame(5)).unwrap();

        let events = engine.damage_log().events();
        assert_eq!(events.len(), 2);
        assert!(events[0].applied_element());
        assert!(!events[1].applied_element());
        assert_eq!(events[0].amount, events[1].amount);
    }

    #[test]
    fn target_accumulates_damage_and_applied_durability() {
        let mut engine = engine(SimConfig::without_hitlag());
        let tagged = hit("na").icd(IcdTag::NormalAttack, IcdGroup::Default).element(Element::Cryo, 25.0);
        for delay in [1, 2, 3] {
            engine
                .resolve(AttackRequest::new(tagged.clone(), near()).with_delay(delay))
                .unwrap();
        }
        engine.run_until(Frame(5)).unwrap();

        let target = engine.roster().get(TargetKey(1)).unwrap();
        assert_eq!(target.hits_taken, 3);
        assert!((target.damage_taken - engine.damage_log().total()).abs() < 1e-9);
        // Only the first hit of the window carries its gauge.
        assert_eq!(target.applied_durability, 25.0);
    }

    #[test]
    fn hitlag_status_is_pushed_back_with_pending_work() {
        let mut engine = engine(SimConfig::new());
        let wall = StatusKey::global("wall");
        let lagged = StatusKey::global("lagged");
        engine.add_status(wall.clone(), 10);
        let expiry = engine.add_status_for(lagged.clone(), Duration::FramesWithHitlag(10));
        assert_eq!(expiry, Expiry::Hitlag(10));

        engine.apply_hitlag(3.6, 0.01);
        engine.run_until(Frame(10)).unwrap();
        assert!(!engine.status_active(&wall));
        assert!(engine.status_active(&lagged));
        assert_eq!(engine.status_remaining(&lagged), Some(3));
        engine.run_until(Frame(13)).unwrap();
        assert!(!engine.status_active(&lagged));
    }

    #[test]
    fn removed_modifier_stops_counting() {
        let mut engine = engine(SimConfig::without_hitlag());
        engine
            .add_modifier(CharIndex(0), StatMod::snapshot("banner", Stat::CritRate, 0.3, Duration::Frames(100)))
            .unwrap();
        engine.advance_by(40).unwrap();
        assert_eq!(
            engine.modifier_remaining(CharIndex(0), "banner").unwrap(),
            Some(Duration::Frames(60))
        );

        assert!(engine.remove_modifier(CharIndex(0), "banner").unwrap());
        assert!(!engine.modifier_active(CharIndex(0), "banner").unwrap());
        assert_eq!(engine.stat(CharIndex(0), Stat::CritRate).unwrap(), 0.0);
        assert!(!engine.remove_modifier(CharIndex(0), "banner").unwrap());
    }

    #[test]
    fn guard_drops_attack_once_status_lapses() {
        let mut engine = engine(SimConfig::without_hitlag());
        let field = StatusKey::global("field");
        engine.add_status(field.clone(), 10);
        for travel in [5, 15] {
            engine
                .resolve(
                    AttackRequest::new(hit("tick"), near())
                        .with_travel(travel)
                        .with_guard(field.clone()),
                )
                .unwrap();
        }
        engine.run_until(Frame(20)).unwrap();

        assert_eq!(engine.damage_log().frames_of("tick"), vec![5]);
    }

    #[test]
    fn on_hit_runs_once_per_target() {
        let mut engine = engine(SimConfig::without_hitlag());
        engine.add_target(Target::new(TargetKey(2), Point::new(-1.0, 2.0)));
        let on_hit: OnHit = Rc::new(|e: &mut Engine, event: &HitEvent| {
            e.add_modifier(event.target, StatMod::snapshot("shred", Stat::PhysicalResShred, 0.2, Duration::Frames(60)))?;
            let count = e.tag(event.actor, "procs")?;
            e.set_tag(event.actor, "procs", count + 1)
        });
        engine
            .resolve(AttackRequest::new(hit("c6"), near()).with_callback(on_hit))
            .unwrap();

        assert_eq!(engine.tag(CharIndex(0), "procs").unwrap(), 2);
        assert_eq!(engine.query_stat(TargetKey(2), Stat::PhysicalResShred).unwrap(), 0.2);
    }

    #[test]
    fn failing_task_tears_down_the_run() {
        let mut engine = engine(SimConfig::without_hitlag());
        engine
            .schedule(3, "bad", |e| {
                e.schedule(-1, "past", |_| Ok(()))?;
                Ok(())
            })
            .unwrap();
        engine.schedule(10, "never", |_| Ok(())).unwrap();

        let err = engine.run_until(Frame(20)).unwrap_err();
        assert_eq!(err.severity(), ErrorSeverity::Fatal);
        assert!(engine.is_torn_down());
        assert_eq!(engine.pending(), 0);
        assert!(matches!(engine.advance(), Err(SimError::Schedule(ScheduleError::TornDown { .. }))));
    }

    #[test]
    fn unknown_entity_is_fatal() {
        let mut engine = engine(SimConfig::new());
        let err = engine.stat(CharIndex(3), Stat::Atk).unwrap_err();
        assert_eq!(err.severity(), ErrorSeverity::Fatal);
        let err = engine.query_stat(TargetKey(9), Stat::ResShred).unwrap_err();
        assert_eq!(err.severity(), ErrorSeverity::Fatal);
    }

    #[test]
    fn particles_favor_on_field_same_element() {
        let mut engine = engine(SimConfig::new());
        engine
            .add_character(CharacterProfile::new(
                "bench",
                Element::Geo,
                BaseStats::new(1.0, 1.0, 1.0),
                60.0,
            ))
            .unwrap();
        for index in engine.party_indices() {
            engine.drain_energy(index).unwrap();
        }
        engine.distribute_particles(Element::Cryo, 3.0).unwrap();

        assert_eq!(engine.energy(CharIndex(0)).unwrap(), 9.0);
        assert!((engine.energy(CharIndex(1)).unwrap() - 1.8).abs() < 1e-9);
    }

    #[test]
    fn insufficient_energy_is_recoverable() {
        let mut engine = engine(SimConfig::new());
        engine.drain_energy(CharIndex(0)).unwrap();
        let err = engine.consume_energy(CharIndex(0), 10.0).unwrap_err();
        assert_eq!(err.severity(), ErrorSeverity::Recoverable);
    }

    #[test]
    fn party_is_bounded() {
        let mut engine = engine(SimConfig::new());
        for _ in 1..SimConfig::MAX_PARTY {
            engine
                .add_character(CharacterProfile::new("x", Element::Pyro, BaseStats::default(), 40.0))
                .unwrap();
        }
        let err = engine
            .add_character(CharacterProfile::new("x", Element::Pyro, BaseStats::default(), 40.0))
            .unwrap_err();
        assert_eq!(err, SimError::Action(ActionError::PartyFull { capacity: 4 }));
    }
}
