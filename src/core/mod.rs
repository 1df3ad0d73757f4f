//! Command scaffolding shared by every resource

pub mod command;
pub mod confirm;
pub mod flags;
pub mod functional;

pub use command::{execute, CommandConfig, Context, Verb};
