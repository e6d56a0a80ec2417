
pub mod block;
pub mod config;
pub mod network;
pub mod summary;

pub use block::{BlockConfig, ConvKind, ResBlock, Squeeze};
pub use network::Network;
