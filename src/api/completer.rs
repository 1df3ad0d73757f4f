//! Resource listings for shell completion
//!
//! Failures are logged at debug level and yield an empty listing.

use serde_json::Value;
use tracing::debug;

use crate::api::client::IonosClient;
use crate::api::query::{ListFilter, ListRequest};

/// `ID\tName` style projection of an item
pub fn id_and(name_path: &'static str) -> impl Fn(&Value) -> Option<String> {
    move |item| {
        let id = item.get("id")?.as_str()?;
        match crate::output::table::lookup(item, name_path).and_then(Value::as_str) {
            Some(name) => Some(format!("{}\t{}", id, name)),
            None => Some(id.to_string()),
        }
    }
}

/// List a collection and project each item; empty on any failure
pub async fn list_projection<F>(
    client: &IonosClient,
    request: ListRequest,
    filters: Vec<ListFilter>,
    mapper: F,
) -> Vec<String>
where
    F: Fn(&Value) -> Option<String>,
{
    let request = request.apply(filters);
    let path = request.path.clone();

    match client.list(request).await {
        Ok(response) => response.body["items"]
            .as_array()
            .map(|items| items.iter().filter_map(&mapper).collect())
            .unwrap_or_default(),
        Err(e) => {
            debug!("completion listing of {} failed: {:#}", path, e);
            Vec::new()
        }
    }
}
