use crate::rules::cards::CardId;
use crate::rules::StatusKind;
use serde::{Deserialize, Serialize};

/// A status change the shadow of a pet received, replayed by the pet's owner.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub enum StatusApplication {
    Status { kind: StatusKind, value: i32 },
    DamageOverTime { amount: i32, duration: u32 },
    HealOverTime { amount: i32, duration: u32 },
    CritBuff { amount: f64, duration: u32 },
}

/// Point-to-point action events. Fire-and-forget.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub enum PeerMessage {
    /// The fighting peer reset the receiver's pet energy for a new turn.
    ResetOpponentPetEnergy { value: i32 },
    ApplyStatusToMyPet { status: StatusApplication },
    /// Sent to the human defending against the pet that played `card_id`.
    ApplyOpponentPetCardEffect { card_id: CardId },
    /// The receiver's pet spent energy on the fighting peer.
    OpponentPlayedCard { cost: i32 },
    ApplyHandCostModifier { amount: i32, duration: u32, count: u32 },
}
