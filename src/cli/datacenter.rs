//! Compute datacenters

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::json;

use crate::api::query::{self, ListRequest};
use crate::api::Product;
use crate::cli::common::{self, PageArgs, WaitArgs};
use crate::cli::completion::{complete, Resource};
use crate::core::{execute, CommandConfig, Verb};
use crate::output::table::{col, TableSpec};

pub const DATACENTERS: TableSpec = TableSpec {
    root: "items",
    columns: &[
        col("Id", "id"),
        col("Name", "properties.name"),
        col("Location", "properties.location"),
        col("Description", "properties.description"),
        col("Version", "properties.version"),
        col("CpuArchitecture", "properties.cpuArchitecture"),
        col("SecAuthProtection", "properties.secAuthProtection"),
        col("State", "metadata.state"),
    ],
    defaults: &["Id", "Name", "Location", "Version", "State"],
};

#[derive(Args, Debug)]
pub struct DatacenterArgs {
    #[command(subcommand)]
    pub command: DatacenterCommand,
}

#[derive(Subcommand, Debug)]
pub enum DatacenterCommand {
    /// List datacenters
    #[command(visible_alias = "ls")]
    List(ListArgs),
    /// Get a datacenter
    #[command(visible_alias = "g")]
    Get(GetArgs),
    /// Create a datacenter
    #[command(visible_alias = "c")]
    Create(CreateArgs),
    /// Delete a datacenter, or all of them
    #[command(visible_alias = "d")]
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only datacenters whose name contains this value
    #[arg(long = "filter.name")]
    pub filter_name: Option<String>,

    /// Only datacenters in this location, e.g. de/fra
    #[arg(long = "filter.location")]
    pub filter_location: Option<String>,

    /// Sort by this property
    #[arg(long)]
    pub order_by: Option<String>,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Datacenter ID
    #[arg(short = 'i', long, add = complete(Resource::Datacenters))]
    pub datacenter_id: Option<String>,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Physical location, e.g. de/fra
    #[arg(long)]
    pub location: Option<String>,

    #[command(flatten)]
    pub wait: WaitArgs,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Datacenter ID
    #[arg(short = 'i', long, add = complete(Resource::Datacenters))]
    pub datacenter_id: Option<String>,

    /// Delete all datacenters
    #[arg(short = 'a', long)]
    pub all: bool,

    #[command(flatten)]
    pub wait: WaitArgs,
}

pub async fn execute_datacenter(c: &CommandConfig<'_>, args: DatacenterArgs) -> Result<()> {
    match args.command {
        DatacenterCommand::List(a) => execute(&a, c).await,
        DatacenterCommand::Get(a) => execute(&a, c).await,
        DatacenterCommand::Create(a) => execute(&a, c).await,
        DatacenterCommand::Delete(a) => execute(&a, c).await,
    }
}

fn datacenter_path(id: &str) -> String {
    format!("/datacenters/{}", id)
}

impl Verb for ListArgs {
    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let filters = [
            query::filter_by("name", self.filter_name.clone()),
            query::filter_by("location", self.filter_location.clone()),
            query::order_by(self.order_by.clone()),
        ]
        .into_iter()
        .flatten()
        .chain(self.page.filters())
        .chain([query::depth(1)]);

        let response = c
            .client(Product::Compute)?
            .list(ListRequest::new("/datacenters").apply(filters))
            .await?;
        c.printer().print(&response.body, &DATACENTERS)
    }
}

impl Verb for GetArgs {
    fn pre_run(&self, c: &CommandConfig<'_>) -> Result<()> {
        c.check_required_flags(&["datacenter-id"])
    }

    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let id = self.datacenter_id.as_deref().unwrap_or_default();
        common::get_one(c, Product::Compute, "/datacenters", id, "datacenter", &DATACENTERS).await
    }
}

impl Verb for CreateArgs {
    fn pre_run(&self, c: &CommandConfig<'_>) -> Result<()> {
        c.check_required_flags(&["location"])
    }

    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let mut properties = json!({ "location": self.location });
        if let Some(ref name) = self.name {
            properties["name"] = json!(name);
        }
        if let Some(ref description) = self.description {
            properties["description"] = json!(description);
        }

        let client = c.client(Product::Compute)?;
        let response = client
            .post("/datacenters", json!({ "properties": properties }))
            .await?;
        self.wait.settle(c, &client, &response).await?;

        c.printer().print(&response.body, &DATACENTERS.at(""))
    }
}

impl Verb for DeleteArgs {
    fn pre_run(&self, c: &CommandConfig<'_>) -> Result<()> {
        common::require_id_or_all(c, "datacenter-id")
    }

    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let client = c.client(Product::Compute)?;
        let ids = match (&self.datacenter_id, self.all) {
            (Some(id), false) => vec![id.clone()],
            _ => common::all_ids(&client, ListRequest::new("/datacenters"), |_| true).await?,
        };

        common::delete_each(c, "datacenter(s)", ids, |id| {
            let client = &client;
            async move {
                let response = client.delete(&datacenter_path(&id)).await?;
                self.wait.settle(c, client, &response).await
            }
        })
        .await
    }
}
