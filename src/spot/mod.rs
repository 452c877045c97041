//! Spot market (`api/v3/*`) — client and wire types.

pub mod client;
pub mod wire;

pub use client::{SpotClient, SpotClientBuilder};
