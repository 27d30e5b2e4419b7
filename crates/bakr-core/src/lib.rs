//! Core domain + application logic for the BAKR LANDING admin bot.
//!
//! This crate is framework-agnostic. Telegram and the HTTP docs server live in
//! adapter crates; the controller only talks to the ports defined here.

pub mod config;
pub mod conversation;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod input;
pub mod logging;
pub mod menu;
pub mod messaging;
pub mod refresh;
pub mod security;
pub mod session;
pub mod store;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

pub use errors::{Error, Result};
