// ABOUTME: Library root for fabdeploy - exposes the publish orchestrator for testing.
// ABOUTME: The main binary is in main.rs.

pub mod auth;
pub mod config;
pub mod error;
pub mod fabric;
pub mod output;
pub mod publish;
pub mod types;
