use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgentKind {
    /// Ends every turn without playing.
    Idle,
    /// Plays the leftmost affordable card until nothing is affordable.
    Greedy,
}

#[derive(Parser, Debug)]
#[command(
    name = "petduel_peer",
    about = "Runs one side of a pet duel against a remote peer",
    version
)]
pub struct Args {
    /// Identity of this peer on the link.
    #[arg(long, default_value_t = 1)]
    pub peer_id: u32,

    /// Waits for the opponent on this address.
    #[arg(long, value_name = "ADDR", conflicts_with = "connect")]
    pub listen: Option<String>,

    /// Connects to an opponent listening on this address.
    #[arg(long, value_name = "ADDR")]
    pub connect: Option<String>,

    /// Combat config as JSON. Defaults are used for missing fields.
    #[arg(long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Overrides the seed of the config.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pause between two plays of the opponent's pet.
    #[arg(long, value_name = "MILLIS", default_value_t = 400)]
    pub delay_ms: u64,

    #[arg(long, value_enum, default_value_t = AgentKind::Greedy)]
    pub agent: AgentKind,
}

pub fn parse_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listen_and_connect_conflict() {
        let result = Args::try_parse_from([
            "petduel_peer",
            "--listen",
            "127.0.0.1:4255",
            "--connect",
            "127.0.0.1:4255",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn defaults_apply() {
        let args = Args::try_parse_from(["petduel_peer", "--connect", "127.0.0.1:4255"]).unwrap();
        assert_eq!(args.peer_id, 1);
        assert_eq!(args.agent, AgentKind::Greedy);
        assert_eq!(args.delay_ms, 400);
        assert!(args.listen.is_none());
    }
}
