//! TaskLift: a multi-user task, project and note manager.
//!
//! Exports the core components for testing and integration.

pub mod auth;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod types;
pub mod web;
