//! Flag groups and helpers shared by resource commands

use anyhow::{Context as _, Result};
use clap::Args;
use serde_json::Value;
use std::collections::HashSet;
use std::future::Future;
use tracing::debug;

use crate::api::client::IonosClient;
use crate::api::query::{self, ListFilter, ListRequest};
use crate::api::response::ApiResponse;
use crate::api::{waiter, Product};
use crate::core::functional::apply_and_aggregate_errors_async;
use crate::core::CommandConfig;
use crate::output::table::TableSpec;

/// `--offset` / `--limit`
#[derive(Args, Debug, Clone, Default)]
pub struct PageArgs {
    /// Skip this many items
    #[arg(long)]
    pub offset: Option<u32>,

    /// Return at most this many items
    #[arg(long)]
    pub limit: Option<u32>,
}

impl PageArgs {
    pub fn filters(&self) -> impl Iterator<Item = ListFilter> {
        [query::offset(self.offset), query::limit(self.limit)]
            .into_iter()
            .flatten()
    }
}

/// `--wait-for-request` / `--timeout` for asynchronous compute calls
#[derive(Args, Debug, Clone)]
pub struct WaitArgs {
    /// Wait for the request to be executed
    #[arg(short = 'w', long)]
    pub wait_for_request: bool,

    /// Timeout in seconds for --wait-for-request
    #[arg(short = 't', long, default_value_t = 60)]
    pub timeout: u64,
}

impl WaitArgs {
    /// Block until the request behind `response` finished, if asked to
    pub async fn settle(
        &self,
        c: &CommandConfig<'_>,
        client: &IonosClient,
        response: &ApiResponse,
    ) -> Result<()> {
        if !self.wait_for_request {
            return Ok(());
        }

        match &response.meta.location {
            Some(status_url) => {
                c.printer().info("Waiting for request to finish...");
                waiter::wait_for_request(client, status_url, self.timeout, c.ctx.poll_interval)
                    .await
            }
            None => {
                c.printer()
                    .warning("No request status returned, not waiting for completion");
                Ok(())
            }
        }
    }
}

/// IDs of the `items` of a list response that pass `keep`
pub fn ids_of(body: &Value, keep: impl Fn(&Value) -> bool) -> Vec<String> {
    body["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter(|item| keep(*item))
                .filter_map(|item| item["id"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Href of the next page of a list response
fn next_page(body: &Value) -> Option<&str> {
    ["_links", "links"]
        .iter()
        .find_map(|key| body[*key]["next"].as_str())
        .filter(|href| !href.is_empty())
}

/// Request for the page at `href`, keeping the original parameters the
/// link does not set itself
fn follow(href: &str, original: &[(String, String)]) -> ListRequest {
    let linked: HashSet<&str> = href
        .split_once('?')
        .map(|(_, q)| q.split('&').map(|pair| pair.split('=').next().unwrap_or(pair)).collect())
        .unwrap_or_default();

    original
        .iter()
        .filter(|(key, _)| !linked.contains(key.as_str()))
        .fold(ListRequest::new(href), |req, (key, value)| req.param(key.as_str(), value))
}

/// IDs that pass `keep` across every page of `request`.
///
/// Follows `_links.next` (or `links.next`) until a page has none; an href
/// already visited ends the walk.
pub async fn all_ids(
    client: &IonosClient,
    request: ListRequest,
    keep: impl Fn(&Value) -> bool,
) -> Result<Vec<String>> {
    let original = request.query.clone();
    let mut ids = Vec::new();
    let mut visited = HashSet::new();
    let mut next = Some(request);

    while let Some(request) = next.take() {
        let body = client.list(request).await?.body;
        ids.extend(ids_of(&body, &keep));

        next = next_page(&body)
            .filter(|href| visited.insert(href.to_string()))
            .map(|href| {
                debug!("following next page {}", href);
                follow(href, &original)
            });
    }
    Ok(ids)
}

/// Pre-run for `delete`: a specific id, or `--all`
pub fn require_id_or_all(c: &CommandConfig<'_>, id_flag: &str) -> Result<()> {
    c.check_required_flags_sets(&[&[id_flag], &["all"]])
}

/// Confirm once, then delete every id in order, reporting all failures together
pub async fn delete_each<F, Fut>(
    c: &CommandConfig<'_>,
    noun: &str,
    ids: Vec<String>,
    mut delete_one: F,
) -> Result<()>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    match ids.as_slice() {
        [] => {
            c.printer().info(&format!("No {} to delete", noun));
            return Ok(());
        }
        [id] => c.confirm(&format!("Delete {} {}?", noun, id), "deletion")?,
        many => c.confirm(&format!("Delete all {} {}?", many.len(), noun), "deletion")?,
    }

    let count = ids.len();
    apply_and_aggregate_errors_async(ids, |id| {
        let fut = delete_one(id.clone());
        async move { fut.await.with_context(|| format!("{} {}", noun, id)) }
    })
    .await?;

    c.printer().success(&format!("Deleted {} {}", count, noun));
    Ok(())
}

/// GET `<collection>/<id>` and print it as a single row
pub async fn get_one(
    c: &CommandConfig<'_>,
    product: Product,
    collection: &str,
    id: &str,
    noun: &str,
    table: &TableSpec,
) -> Result<()> {
    let response = c
        .client(product)?
        .get(&format!("{}/{}", collection, id))
        .await
        .with_context(|| format!("{} {} not found", noun, id))?;
    c.printer().print(&response.body, &table.at(""))
}

/// Delete one item of `collection`, or every item when no id is given
pub async fn delete_id_or_all(
    c: &CommandConfig<'_>,
    product: Product,
    collection: &str,
    noun: &str,
    id: Option<&str>,
) -> Result<()> {
    let client = c.client(product)?;
    let ids = match id {
        Some(id) => vec![id.to_string()],
        None => all_ids(&client, ListRequest::new(collection), |_| true).await?,
    };

    delete_each(c, noun, ids, |id| {
        let client = &client;
        async move {
            client.delete(&format!("{}/{}", collection, id)).await?;
            Ok(())
        }
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ids_of_filters_items() {
        let body = json!({"items": [
            {"id": "a", "properties": {"public": true}},
            {"id": "b", "properties": {"public": false}},
            {"properties": {"public": false}}
        ]});
        assert_eq!(ids_of(&body, |_| true), vec!["a", "b"]);
        assert_eq!(
            ids_of(&body, |i| i["properties"]["public"] == json!(false)),
            vec!["b"]
        );
        assert!(ids_of(&json!({}), |_| true).is_empty());
    }

    #[test]
    fn test_next_page_link() {
        assert_eq!(
            next_page(&json!({"_links": {"next": "/zones?offset=2"}})),
            Some("/zones?offset=2")
        );
        assert_eq!(
            next_page(&json!({"links": {"next": "https://api.example.test/groups?offset=5"}})),
            Some("https://api.example.test/groups?offset=5")
        );
        assert_eq!(next_page(&json!({"_links": {"next": ""}})), None);
        assert_eq!(next_page(&json!({"_links": {"self": "/zones"}})), None);
        assert_eq!(next_page(&json!({"items": []})), None);
    }

    #[test]
    fn test_follow_keeps_unlinked_params() {
        let original = vec![
            ("depth".to_string(), "1".to_string()),
            ("limit".to_string(), "10".to_string()),
        ];
        let next = follow("/images?offset=10&limit=10", &original);
        assert_eq!(next.path, "/images?offset=10&limit=10");
        assert_eq!(next.query, vec![("depth".to_string(), "1".to_string())]);

        assert_eq!(follow("/images", &original).query, original);
    }

    #[test]
    fn test_page_filters() {
        let page = PageArgs {
            offset: Some(2),
            limit: None,
        };
        assert_eq!(page.filters().count(), 1);
    }
}
