pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod resources;
pub mod sentiment;
pub mod translate;
pub mod tui;
pub mod ui;
