use crate::rules::{Actor, EntityId};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One value for each side that acts inside the local simulation.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ActorData<TData> {
    pub player_data: TData,
    pub pet_data: TData,
}

impl<T> ActorData<T> {
    pub fn new(player_data: T, pet_data: T) -> Self {
        Self {
            player_data,
            pet_data,
        }
    }
}

impl<T> Index<Actor> for ActorData<T> {
    type Output = T;

    fn index(&self, index: Actor) -> &Self::Output {
        match index {
            Actor::Player => &self.player_data,
            Actor::Pet => &self.pet_data,
        }
    }
}

impl<T> IndexMut<Actor> for ActorData<T> {
    fn index_mut(&mut self, index: Actor) -> &mut Self::Output {
        match index {
            Actor::Player => &mut self.player_data,
            Actor::Pet => &mut self.pet_data,
        }
    }
}

/// One value for every combatant this peer knows about.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EntitiesData<TData> {
    pub local_player: TData,
    pub local_pet: TData,
    pub opponent_pet: TData,
}

impl<T> EntitiesData<T> {
    pub fn new(local_player: T, local_pet: T, opponent_pet: T) -> Self {
        Self {
            local_player,
            local_pet,
            opponent_pet,
        }
    }
}

impl<T> Index<EntityId> for EntitiesData<T> {
    type Output = T;

    fn index(&self, index: EntityId) -> &Self::Output {
        match index {
            EntityId::LocalPlayer => &self.local_player,
            EntityId::LocalPet => &self.local_pet,
            EntityId::OpponentPet => &self.opponent_pet,
        }
    }
}

impl<T> IndexMut<EntityId> for EntitiesData<T> {
    fn index_mut(&mut self, index: EntityId) -> &mut Self::Output {
        match index {
            EntityId::LocalPlayer => &mut self.local_player,
            EntityId::LocalPet => &mut self.local_pet,
            EntityId::OpponentPet => &mut self.opponent_pet,
        }
    }
}
