pub mod api;
pub mod capabilities;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod readme;
pub mod ui;
