// Library root: re-exports all modules so integration tests and external
// consumers can access the crate's public API.

pub mod app;
pub mod config;
pub mod gateway;
pub mod models;
pub mod protocol;
pub mod proxy;
pub mod standings;
pub mod tui;
pub mod upstream;
