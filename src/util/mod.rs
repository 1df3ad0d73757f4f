//! Small self-contained helpers

pub mod units;
pub mod uuidgen;
