//! HTTP transport layer — [`BinanceHttp`].

pub mod client;

pub use client::BinanceHttp;
