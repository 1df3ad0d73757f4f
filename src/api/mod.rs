//! API client module

pub mod client;
pub mod clients;
pub mod completer;
pub mod location;
pub mod product;
pub mod query;
pub mod response;
pub mod waiter;

pub use client::IonosClient;
pub use clients::Clients;
pub use product::Product;
pub use query::{ListFilter, ListRequest};
