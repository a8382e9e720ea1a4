use crate::rules::calculator::DamageResult;
use crate::rules::{EntityId, EntityStats, StatusKind, StatusLedger};
use tracing::debug;

/// Outcome of one damage application.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct DamageTaken {
    pub blocked: i32,
    pub health_lost: i32,
    pub is_critical: bool,
    /// Set only by the call that first brought the entity to zero health.
    pub defeated: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct TurnStartReport {
    pub dot_damage: i32,
    pub hot_healed: i32,
    pub defeated: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CombatEntity {
    id: EntityId,
    pub(crate) current_health: i32,
    pub(crate) max_health: i32,
    pub(crate) block: i32,
    pub(crate) energy: i32,
    pub(crate) max_energy: i32,
    pub(crate) base_crit_chance: f64,
    pub(crate) statuses: StatusLedger,
    defeat_signalled: bool,
}

impl CombatEntity {
    pub fn new(id: EntityId, stats: EntityStats) -> Self {
        let max_health = stats.max_health.max(1);
        let max_energy = stats.max_energy.max(0);
        Self {
            id,
            current_health: max_health,
            max_health,
            block: 0,
            energy: max_energy,
            max_energy,
            base_crit_chance: sanitize_percent(stats.base_crit_chance),
            statuses: StatusLedger::default(),
            defeat_signalled: false,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn current_health(&self) -> i32 {
        self.current_health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn block(&self) -> i32 {
        self.block
    }

    pub fn energy(&self) -> i32 {
        self.energy
    }

    pub fn max_energy(&self) -> i32 {
        self.max_energy
    }

    pub fn statuses(&self) -> &StatusLedger {
        &self.statuses
    }

    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    /// Effective crit chance in percent, including active crit buffs.
    pub fn crit_chance(&self) -> f64 {
        sanitize_percent(self.base_crit_chance + self.statuses.crit_bonus())
    }

    /// Block absorbs first, the rest goes to health.
    pub fn take_damage(&mut self, amount: i32, is_critical: bool) -> DamageTaken {
        let amount = amount.max(0);
        let blocked = amount.min(self.block);
        self.block -= blocked;

        let health_lost = self.lose_health(amount - blocked);
        DamageTaken {
            blocked,
            health_lost,
            is_critical,
            defeated: self.signal_defeat_if_dead(),
        }
    }

    /// Applies a calculator result: the block share it consumed and the damage left after block.
    pub fn apply_damage_result(&mut self, result: &DamageResult) -> DamageTaken {
        let blocked = result.block_consumed.clamp(0, self.block);
        self.block -= blocked;

        let health_lost = self.lose_health(result.damage_after_block);
        DamageTaken {
            blocked,
            health_lost,
            is_critical: result.is_critical,
            defeated: self.signal_defeat_if_dead(),
        }
    }

    /// Returns true exactly once, on the first call after health reached zero.
    pub fn signal_defeat_if_dead(&mut self) -> bool {
        if self.current_health > 0 || self.defeat_signalled {
            return false;
        }
        self.defeat_signalled = true;
        debug!(entity = ?self.id, "entity reached zero health");
        true
    }

    fn lose_health(&mut self, amount: i32) -> i32 {
        let lost = amount.clamp(0, self.current_health);
        self.current_health -= lost;
        lost
    }

    pub fn add_block(&mut self, amount: i32) {
        self.block = self.block.saturating_add(amount.max(0));
    }

    pub fn reset_block(&mut self) {
        self.block = 0;
    }

    /// Returns the health actually restored. A defeated entity stays defeated.
    pub fn heal(&mut self, amount: i32) -> i32 {
        if !self.is_alive() {
            return 0;
        }
        let healed = amount.clamp(0, self.max_health - self.current_health);
        self.current_health += healed;
        healed
    }

    pub fn apply_status_effect(&mut self, kind: StatusKind, value: i32) {
        self.statuses.apply(kind, value);
    }

    pub fn apply_dot(&mut self, damage: i32, duration: u32) {
        self.statuses.apply_dot(damage, duration);
    }

    pub fn apply_hot(&mut self, amount: i32, duration: u32) {
        self.statuses.apply_hot(amount, duration);
    }

    pub fn apply_crit_buff(&mut self, amount: f64, duration: u32) {
        self.statuses.apply_crit_buff(amount, duration);
    }

    pub fn consume_energy(&mut self, amount: i32) {
        self.energy = (self.energy - amount.max(0)).max(0);
    }

    pub fn gain_energy(&mut self, amount: i32) {
        self.energy = self.energy.saturating_add(amount.max(0));
    }

    pub fn reset_energy(&mut self) {
        self.energy = self.max_energy;
    }

    pub fn set_energy(&mut self, value: i32) {
        self.energy = value.max(0);
    }

    /// DoT, HoT, then weak/break durations.
    pub fn tick_over_time_effects(&mut self) -> TurnStartReport {
        let mut report = TurnStartReport::default();

        let dot = self.statuses.tick_dot();
        if dot > 0 {
            let taken = self.take_damage(dot, false);
            report.dot_damage = taken.blocked + taken.health_lost;
            report.defeated = taken.defeated;
        }

        let hot = self.statuses.tick_hot();
        if hot > 0 {
            report.hot_healed = self.heal(hot);
        }

        self.statuses.decrement_durations();
        report
    }

    /// Strength decay, then crit buff durations.
    pub fn decay_end_of_turn(&mut self) {
        self.statuses.decay_strength();
        self.statuses.decrement_crit_buffs();
    }

    pub fn process_turn_start_effects(&mut self) -> TurnStartReport {
        let report = self.tick_over_time_effects();
        self.decay_end_of_turn();
        report
    }

    /// Combat-end cleanup of everything that only lives for one combat.
    pub fn clear_combat_state(&mut self) {
        self.block = 0;
        self.statuses.clear();
    }
}

fn sanitize_percent(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}
