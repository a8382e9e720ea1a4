extern crate petduel_lib;

use crate::cli::{AgentKind, Args};
use crate::networking::{post_office, PeerConnectionReader, PeerConnectionWriter};
use crate::session::Session;
use crate::transport::ChannelTransport;
use petduel_lib::net::connection;
use petduel_lib::net::frames::PeerFrame;
use petduel_lib::net::with_send_callback::WithCallback;
use petduel_lib::net::MessageReceiver;
use petduel_lib::players::{GreedyPlayer, IdlePlayer, PlayerAgent};
use petduel_lib::replication::{Inbound, Replicator};
use petduel_lib::rules::cards::starter;
use petduel_lib::rules::{CombatConfig, CombatContext, ConfigError, PeerId, TurnFlow};
use std::time::Duration;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod cli;
mod networking;
mod session;
mod transport;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Error, Debug)]
enum PeerError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("Connection failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Either --listen or --connect is required.")]
    NoAddress,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run(cli::parse_args()).await {
        error!(%err, "peer stopped");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), PeerError> {
    let mut config = match &args.config {
        Some(path) => CombatConfig::load(path)?,
        None => CombatConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let stream = open_stream(&args).await?;
    let (frame_tx, inbound_rx, post_office_task) = spawn_post_office(stream);

    let local = PeerId(args.peer_id);
    let ctx = CombatContext::new(config, starter::library(), Replicator::new(local, None));
    let agent: Box<dyn PlayerAgent + Send> = match args.agent {
        AgentKind::Idle => Box::new(IdlePlayer {}),
        AgentKind::Greedy => Box::new(GreedyPlayer {}),
    };

    let session = Session::new(
        TurnFlow::new(ctx),
        agent,
        ChannelTransport::new(local, frame_tx),
        inbound_rx,
        Duration::from_millis(args.delay_ms),
    );
    let outcome = session.run().await;
    info!(?outcome, "combat ended");

    post_office_task.abort();
    Ok(())
}

async fn open_stream(args: &Args) -> Result<TcpStream, PeerError> {
    match (&args.listen, &args.connect) {
        (Some(addr), _) => {
            let listener = TcpListener::bind(addr).await?;
            info!(%addr, "waiting for the opponent");
            let (socket, remote) = listener.accept().await?;
            info!(%remote, "opponent connected");
            Ok(socket)
        }
        (None, Some(addr)) => {
            let socket = TcpStream::connect(addr).await?;
            info!(%addr, "connected to the opponent");
            Ok(socket)
        }
        (None, None) => Err(PeerError::NoAddress),
    }
}

fn spawn_post_office(
    stream: TcpStream,
) -> (
    mpsc::Sender<WithCallback<PeerFrame, connection::WriteError>>,
    MessageReceiver<Inbound>,
    JoinHandle<()>,
) {
    let (read_half, write_half) = stream.into_split();

    let reader = PeerConnectionReader::new(read_half);
    let writer = PeerConnectionWriter::new(write_half);

    let (inbound_tx, inbound_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (frame_tx, frame_rx) = mpsc::channel(CHANNEL_CAPACITY);

    let post_office_joinhandle = tokio::spawn(async move {
        let (received, _) = tokio::join!(
            post_office::receive_posts(reader, inbound_tx),
            post_office::handle_send_requests(frame_rx, writer),
        );
        if let Err(err) = received {
            error!(%err, "receiving from the opponent failed");
        }
    });

    (frame_tx, MessageReceiver::new(inbound_rx), post_office_joinhandle)
}
