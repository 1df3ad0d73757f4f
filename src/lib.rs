//! ionosctl - IONOS Cloud command line client
//!
//! The binary is a thin wrapper: parse an [`cli::Invocation`], build a
//! [`core::Context`] and hand both to [`cli::run`].

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod output;
pub mod util;
