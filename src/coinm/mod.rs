//! Coin-margined futures (`dapi/*`) — client and wire types.

pub mod client;
pub mod wire;

pub use client::{CoinmClient, CoinmClientBuilder};
