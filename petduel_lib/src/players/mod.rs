mod greedy_player;
mod idle_player;
mod player;

pub use {
    greedy_player::GreedyPlayer, idle_player::IdlePlayer, player::PlayerAction,
    player::PlayerAgent,
};
