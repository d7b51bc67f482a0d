pub mod connection;
pub mod core;
pub mod export;
pub mod fetcher;
pub mod refresher;
