pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod fetch;
pub mod infra;
pub mod output;
pub mod scores;
pub mod services;
