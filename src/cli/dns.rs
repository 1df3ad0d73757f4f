//! Cloud DNS zones and records

use anyhow::{anyhow, Context as _, Result};
use clap::{Args, Subcommand};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::api::client::IonosClient;
use crate::api::query::{self, ListRequest};
use crate::api::Product;
use crate::cli::common::{self, PageArgs};
use crate::cli::completion::{complete, Resource};
use crate::core::{execute, CommandConfig, Verb};
use crate::output::table::{col, TableSpec};

pub const ZONES: TableSpec = TableSpec {
    root: "items",
    columns: &[
        col("Id", "id"),
        col("Name", "properties.zoneName"),
        col("Description", "properties.description"),
        col("Enabled", "properties.enabled"),
        col("NameServers", "metadata.nameservers"),
        col("State", "metadata.state"),
    ],
    defaults: &["Id", "Name", "Enabled", "State"],
};

pub const RECORDS: TableSpec = TableSpec {
    root: "items",
    columns: &[
        col("Id", "id"),
        col("Name", "properties.name"),
        col("Type", "properties.type"),
        col("Content", "properties.content"),
        col("TTL", "properties.ttl"),
        col("Priority", "properties.priority"),
        col("Enabled", "properties.enabled"),
        col("FQDN", "metadata.fqdn"),
        col("ZoneId", "metadata.zoneId"),
        col("State", "metadata.state"),
    ],
    defaults: &["Id", "Name", "Type", "Content", "TTL", "Enabled", "FQDN", "State"],
};

#[derive(Args, Debug)]
pub struct DnsArgs {
    #[command(subcommand)]
    pub command: DnsCommand,
}

#[derive(Subcommand, Debug)]
pub enum DnsCommand {
    /// Manage DNS zones
    #[command(visible_alias = "z")]
    Zone {
        #[command(subcommand)]
        command: ZoneCommand,
    },

    /// Manage DNS records
    #[command(visible_alias = "r")]
    Record {
        #[command(subcommand)]
        command: RecordCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ZoneCommand {
    /// List zones
    #[command(visible_alias = "ls")]
    List(ZoneListArgs),
    /// Get a zone
    #[command(visible_alias = "g")]
    Get(ZoneGetArgs),
    /// Create a zone
    #[command(visible_alias = "c")]
    Create(ZoneCreateArgs),
    /// Delete a zone, or all of them
    #[command(visible_alias = "d")]
    Delete(ZoneDeleteArgs),
}

#[derive(Subcommand, Debug)]
pub enum RecordCommand {
    /// List records, of one zone or of all zones
    #[command(visible_alias = "ls")]
    List(RecordListArgs),
    /// Create a record in a zone
    #[command(visible_alias = "c")]
    Create(RecordCreateArgs),
    /// Delete a record, or all records of a zone
    #[command(visible_alias = "d")]
    Delete(RecordDeleteArgs),
}

#[derive(Args, Debug)]
pub struct ZoneListArgs {
    /// Only zones whose name contains this value
    #[arg(long = "filter.zone-name")]
    pub filter_zone_name: Option<String>,

    /// Only zones in this state
    #[arg(long = "filter.state")]
    pub filter_state: Option<String>,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Args, Debug)]
pub struct ZoneGetArgs {
    /// Zone ID or name
    #[arg(short = 'z', long, add = complete(Resource::Zones))]
    pub zone: Option<String>,
}

#[derive(Args, Debug)]
pub struct ZoneCreateArgs {
    /// Zone name, e.g. example.com
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Serve the zone
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub enabled: bool,
}

#[derive(Args, Debug)]
pub struct ZoneDeleteArgs {
    /// Zone ID or name
    #[arg(short = 'z', long, add = complete(Resource::Zones))]
    pub zone: Option<String>,

    /// Delete all zones
    #[arg(short = 'a', long)]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct RecordListArgs {
    /// Zone ID or name; all zones when omitted
    #[arg(short = 'z', long, add = complete(Resource::Zones))]
    pub zone: Option<String>,

    /// Only records whose name contains this value
    #[arg(long = "filter.name")]
    pub filter_name: Option<String>,

    /// Only records in this state
    #[arg(long = "filter.state")]
    pub filter_state: Option<String>,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Args, Debug)]
pub struct RecordCreateArgs {
    /// Zone ID or name
    #[arg(short = 'z', long, add = complete(Resource::Zones))]
    pub zone: Option<String>,

    /// Record name relative to the zone, e.g. "www" or "@"
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Record type (A, AAAA, CNAME, TXT, MX, etc.)
    #[arg(short = 't', long = "type", default_value = "A")]
    pub record_type: String,

    /// Record content (IP address, hostname, etc.)
    #[arg(long)]
    pub content: Option<String>,

    /// TTL in seconds
    #[arg(long, default_value_t = 3600)]
    pub ttl: u32,

    /// Priority (for MX/SRV records)
    #[arg(long)]
    pub priority: Option<u16>,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub enabled: bool,
}

#[derive(Args, Debug)]
pub struct RecordDeleteArgs {
    /// Zone ID or name
    #[arg(short = 'z', long, add = complete(Resource::Zones))]
    pub zone: Option<String>,

    /// Record ID
    #[arg(short = 'i', long)]
    pub record_id: Option<String>,

    /// Delete every record of the zone
    #[arg(short = 'a', long)]
    pub all: bool,
}

pub async fn execute_dns(c: &CommandConfig<'_>, args: DnsArgs) -> Result<()> {
    match args.command {
        DnsCommand::Zone { command } => match command {
            ZoneCommand::List(a) => execute(&a, c).await,
            ZoneCommand::Get(a) => execute(&a, c).await,
            ZoneCommand::Create(a) => execute(&a, c).await,
            ZoneCommand::Delete(a) => execute(&a, c).await,
        },
        DnsCommand::Record { command } => match command {
            RecordCommand::List(a) => execute(&a, c).await,
            RecordCommand::Create(a) => execute(&a, c).await,
            RecordCommand::Delete(a) => execute(&a, c).await,
        },
    }
}

/// Turn a zone ID or zone name into a zone ID
pub async fn resolve_zone_id(client: &IonosClient, zone: &str) -> Result<String> {
    if Uuid::parse_str(zone).is_ok() {
        return Ok(zone.to_string());
    }

    debug!("looking up zone id of {}", zone);
    let request = ListRequest::new("/zones").filter("zoneName", zone);
    let response = client.list(request).await?;

    // the filter matches substrings, so insist on the exact name
    response.body["items"]
        .as_array()
        .into_iter()
        .flatten()
        .find(|item| item["properties"]["zoneName"].as_str() == Some(zone))
        .and_then(|item| item["id"].as_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("zone {} not found", zone))
}

fn zone_arg(zone: &Option<String>) -> &str {
    zone.as_deref().unwrap_or_default()
}

impl Verb for ZoneListArgs {
    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let filters = [
            query::filter_by("zoneName", self.filter_zone_name.clone()),
            query::filter_by("state", self.filter_state.clone()),
        ]
        .into_iter()
        .flatten()
        .chain(self.page.filters());

        let response = c
            .client(Product::Dns)?
            .list(ListRequest::new("/zones").apply(filters))
            .await?;
        c.printer().print(&response.body, &ZONES)
    }
}

impl Verb for ZoneGetArgs {
    fn pre_run(&self, c: &CommandConfig<'_>) -> Result<()> {
        c.check_required_flags(&["zone"])
    }

    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let client = c.client(Product::Dns)?;
        let zone_id = resolve_zone_id(&client, zone_arg(&self.zone)).await?;
        common::get_one(c, Product::Dns, "/zones", &zone_id, "zone", &ZONES).await
    }
}

impl Verb for ZoneCreateArgs {
    fn pre_run(&self, c: &CommandConfig<'_>) -> Result<()> {
        c.check_required_flags(&["name"])
    }

    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let mut properties = json!({
            "zoneName": self.name,
            "enabled": self.enabled,
        });
        if let Some(ref description) = self.description {
            properties["description"] = json!(description);
        }

        let response = c
            .client(Product::Dns)?
            .post("/zones", json!({ "properties": properties }))
            .await?;
        c.printer().success(&format!(
            "Created zone {}",
            self.name.as_deref().unwrap_or_default()
        ));
        c.printer().print(&response.body, &ZONES.at(""))
    }
}

impl Verb for ZoneDeleteArgs {
    fn pre_run(&self, c: &CommandConfig<'_>) -> Result<()> {
        common::require_id_or_all(c, "zone")
    }

    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let zone_id = match (&self.zone, self.all) {
            (Some(zone), false) => {
                let client = c.client(Product::Dns)?;
                Some(resolve_zone_id(&client, zone).await?)
            }
            _ => None,
        };
        common::delete_id_or_all(c, Product::Dns, "/zones", "zone(s)", zone_id.as_deref()).await
    }
}

impl Verb for RecordListArgs {
    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let client = c.client(Product::Dns)?;

        let path = match &self.zone {
            Some(zone) => format!("/zones/{}/records", resolve_zone_id(&client, zone).await?),
            None => "/records".to_string(),
        };
        let filters = [
            query::filter_by("name", self.filter_name.clone()),
            query::filter_by("state", self.filter_state.clone()),
        ]
        .into_iter()
        .flatten()
        .chain(self.page.filters());

        let response = client.list(ListRequest::new(path).apply(filters)).await?;
        c.printer().print(&response.body, &RECORDS)
    }
}

impl Verb for RecordCreateArgs {
    fn pre_run(&self, c: &CommandConfig<'_>) -> Result<()> {
        c.check_required_flags(&["zone", "name", "content"])
    }

    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let client = c.client(Product::Dns)?;
        let zone_id = resolve_zone_id(&client, zone_arg(&self.zone)).await?;

        let record_type = self.record_type.to_uppercase();
        let mut properties = json!({
            "name": self.name,
            "type": record_type,
            "content": self.content,
            "ttl": self.ttl,
            "enabled": self.enabled,
        });
        if let Some(p) = self.priority {
            properties["priority"] = json!(p);
        }

        let response = client
            .post(
                &format!("/zones/{}/records", zone_id),
                json!({ "properties": properties }),
            )
            .await
            .with_context(|| format!("creating {} record in zone {}", record_type, zone_id))?;

        c.printer().success(&format!(
            "Created {} record: {}",
            record_type,
            response.body["metadata"]["fqdn"]
                .as_str()
                .or(self.name.as_deref())
                .unwrap_or_default()
        ));
        c.printer().print(&response.body, &RECORDS.at(""))
    }
}

impl Verb for RecordDeleteArgs {
    fn pre_run(&self, c: &CommandConfig<'_>) -> Result<()> {
        c.check_required_flags(&["zone"])?;
        common::require_id_or_all(c, "record-id")
    }

    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let client = c.client(Product::Dns)?;
        let zone_id = resolve_zone_id(&client, zone_arg(&self.zone)).await?;

        let records = format!("/zones/{}/records", zone_id);
        let record = self.record_id.as_deref().filter(|_| !self.all);
        common::delete_id_or_all(c, Product::Dns, &records, "record(s)", record).await
    }
}
