//! Pricewatch - Binance price threshold monitor with audible alerts

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod notify;
pub mod ui;
pub mod watch;
