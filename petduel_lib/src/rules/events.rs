use crate::rules::cards::CardId;
use crate::rules::{Actor, CombatOutcome, CombatPhase, EntityId};
use serde::{Deserialize, Serialize};

/// Refresh notifications for whatever renders the combat.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub enum UiEvent {
    EntityChanged(EntityId),
    HandChanged(Actor),
    CardResolved { actor: Actor, card: CardId },
    ComboFired { actor: Actor, count: u32 },
    PhaseChanged(CombatPhase),
    TurnStarted { turn: u32 },
    CombatEnded(CombatOutcome),
}
