pub mod post_office;

use petduel_lib::net::connection::{ConnectionReader, ConnectionWriter};
use petduel_lib::net::frames::PeerFrame;

pub type PeerConnectionReader<TRead> = ConnectionReader<TRead, PeerFrame>;
pub type PeerConnectionWriter<TWrite> = ConnectionWriter<TWrite, PeerFrame>;
