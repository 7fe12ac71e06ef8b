pub mod backend;
pub mod cli;
pub mod config;
pub mod core;
pub mod logging;
pub mod tui;
pub mod ui;
