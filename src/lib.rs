//! The Oura Ring CLI client library.
//!
//! This crate provides the core functionality for the `oura` command line
//! client: OAuth2 authorization, token persistence and refresh, access to
//! the Oura v2 cloud API, and the command handlers that render its data.
//!
//! # Modules
//!
//! - `actions`: Command routing and handlers
//! - `args`: Permissive command-line parsing and subcommand flag parsing
//! - `auth`: Token endpoint client (code exchange and refresh)
//! - `browser`: Best-effort system browser launcher
//! - `client`: Request dispatcher for user-collection and webhook endpoints
//! - `commands`: Clap command tree for subcommand flags and shell completions
//! - `configuration`: App credentials and the configuration directory
//! - `error`: Top-level error type
//! - `format`: Text formatting helpers
//! - `login`: Interactive authorization flow with a loopback listener
//! - `model`: Wire models for the Oura API
//! - `token`: Persisted OAuth token

pub mod actions;
pub mod args;
pub mod auth;
pub mod browser;
pub mod client;
pub mod commands;
pub mod configuration;
pub mod error;
pub mod format;
pub mod login;
pub mod model;
pub mod token;
