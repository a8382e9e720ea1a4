use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StatusKind {
    /// Duration. Halves outgoing damage.
    Weak,
    /// Duration. Adds half of the post-block damage taken.
    Break,
    /// Stack. Persists until a card removes it.
    Thorns,
    /// Stack. Added to outgoing damage, decays by one per turn.
    Strength,
}

/// An amount applied once per turn-start for a number of turns.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct OverTime {
    pub amount: i32,
    pub turns: u32,
}

impl OverTime {
    fn stack(&mut self, amount: i32, turns: u32) {
        if amount <= 0 || turns == 0 {
            return;
        }
        self.amount += amount;
        self.turns = self.turns.max(turns);
    }

    /// Returns the amount to apply this turn and counts one turn down.
    fn tick(&mut self) -> i32 {
        if self.turns == 0 {
            self.amount = 0;
            return 0;
        }

        let amount = self.amount;
        self.turns -= 1;
        if self.turns == 0 {
            self.amount = 0;
        }
        amount
    }
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct CritBuff {
    /// Percent points added to the crit chance.
    pub amount: f64,
    pub turns_remaining: u32,
}

/// Status counters of one combatant.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct StatusLedger {
    pub weak_turns: u32,
    pub break_turns: u32,
    pub thorns: i32,
    pub strength: i32,
    pub dot: OverTime,
    pub hot: OverTime,
    pub crit_buffs: Vec<CritBuff>,
}

impl StatusLedger {
    /// Strength is signed and floored at zero. Non-positive values of the other kinds are ignored.
    pub fn apply(&mut self, kind: StatusKind, value: i32) {
        if kind == StatusKind::Strength {
            self.strength = self.strength.saturating_add(value).max(0);
            return;
        }
        if value <= 0 {
            return;
        }

        match kind {
            StatusKind::Weak => self.weak_turns = self.weak_turns.saturating_add(value as u32),
            StatusKind::Break => self.break_turns = self.break_turns.saturating_add(value as u32),
            StatusKind::Thorns => self.thorns = self.thorns.saturating_add(value),
            StatusKind::Strength => {}
        }
    }

    pub fn get(&self, kind: StatusKind) -> i32 {
        match kind {
            StatusKind::Weak => self.weak_turns as i32,
            StatusKind::Break => self.break_turns as i32,
            StatusKind::Thorns => self.thorns,
            StatusKind::Strength => self.strength,
        }
    }

    pub fn is_weak(&self) -> bool {
        self.weak_turns > 0
    }

    pub fn is_broken(&self) -> bool {
        self.break_turns > 0
    }

    pub fn apply_dot(&mut self, damage: i32, duration: u32) {
        self.dot.stack(damage, duration);
    }

    pub fn apply_hot(&mut self, amount: i32, duration: u32) {
        self.hot.stack(amount, duration);
    }

    pub fn apply_crit_buff(&mut self, amount: f64, duration: u32) {
        if !amount.is_finite() || duration == 0 {
            return;
        }
        self.crit_buffs.push(CritBuff {
            amount,
            turns_remaining: duration,
        });
    }

    pub fn crit_bonus(&self) -> f64 {
        self.crit_buffs.iter().map(|buff| buff.amount).sum()
    }

    pub(crate) fn tick_dot(&mut self) -> i32 {
        self.dot.tick()
    }

    pub(crate) fn tick_hot(&mut self) -> i32 {
        self.hot.tick()
    }

    pub(crate) fn decrement_durations(&mut self) {
        self.weak_turns = self.weak_turns.saturating_sub(1);
        self.break_turns = self.break_turns.saturating_sub(1);
    }

    pub(crate) fn decay_strength(&mut self) {
        self.strength = (self.strength - 1).max(0);
    }

    pub(crate) fn decrement_crit_buffs(&mut self) {
        for buff in &mut self.crit_buffs {
            buff.turns_remaining = buff.turns_remaining.saturating_sub(1);
        }
        self.crit_buffs.retain(|buff| buff.turns_remaining > 0);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
