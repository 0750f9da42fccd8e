//! Postboard: a small blogging board.
//!
//! The library half of the root package holds the REST backend (`server`,
//! `db`) and the client configuration shared by the binaries.

pub mod config;
pub mod db;
pub mod server;

pub use postboard_core as core;
