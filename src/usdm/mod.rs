//! USD-margined futures (`fapi/*`) — client and wire types.

pub mod client;
pub mod wire;

pub use client::{UsdmClient, UsdmClientBuilder};
