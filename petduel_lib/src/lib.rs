pub mod net;
pub mod players;
pub mod replication;
pub mod rules;
