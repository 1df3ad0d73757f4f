//! Compute servers inside a datacenter

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::query::{self, ListRequest};
use crate::api::Product;
use crate::cli::common::{self, PageArgs, WaitArgs};
use crate::cli::completion::{complete, Resource};
use crate::core::{execute, CommandConfig, Verb};
use crate::output::table::{col, size_col, TableSpec};
use crate::util::units::Unit;

pub const SERVERS: TableSpec = TableSpec {
    root: "items",
    columns: &[
        col("Id", "id"),
        col("Name", "properties.name"),
        col("Type", "properties.type"),
        col("AvailabilityZone", "properties.availabilityZone"),
        col("Cores", "properties.cores"),
        size_col("RAM", "properties.ram", Unit::MB),
        col("CpuFamily", "properties.cpuFamily"),
        col("VmState", "properties.vmState"),
        col("State", "metadata.state"),
    ],
    defaults: &["Id", "Name", "Type", "Cores", "RAM", "VmState", "State"],
};

#[derive(Args, Debug)]
pub struct ServerArgs {
    #[command(subcommand)]
    pub command: ServerCommand,
}

#[derive(Subcommand, Debug)]
pub enum ServerCommand {
    /// List servers of a datacenter
    #[command(visible_alias = "ls")]
    List(ListArgs),
    /// Get a server
    #[command(visible_alias = "g")]
    Get(GetArgs),
    /// Delete a server, or every server of a datacenter
    #[command(visible_alias = "d")]
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Datacenter ID
    #[arg(long, add = complete(Resource::Datacenters))]
    pub datacenter_id: Option<String>,

    /// Only servers whose name contains this value
    #[arg(long = "filter.name")]
    pub filter_name: Option<String>,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Datacenter ID
    #[arg(long, add = complete(Resource::Datacenters))]
    pub datacenter_id: Option<String>,

    /// Server ID
    #[arg(short = 'i', long, add = complete(Resource::Servers))]
    pub server_id: Option<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Datacenter ID
    #[arg(long, add = complete(Resource::Datacenters))]
    pub datacenter_id: Option<String>,

    /// Server ID
    #[arg(short = 'i', long, add = complete(Resource::Servers))]
    pub server_id: Option<String>,

    /// Delete every server in the datacenter
    #[arg(short = 'a', long)]
    pub all: bool,

    #[command(flatten)]
    pub wait: WaitArgs,
}

pub async fn execute_server(c: &CommandConfig<'_>, args: ServerArgs) -> Result<()> {
    match args.command {
        ServerCommand::List(a) => execute(&a, c).await,
        ServerCommand::Get(a) => execute(&a, c).await,
        ServerCommand::Delete(a) => execute(&a, c).await,
    }
}

fn servers_path(datacenter_id: &Option<String>) -> String {
    format!(
        "/datacenters/{}/servers",
        datacenter_id.as_deref().unwrap_or_default()
    )
}

impl Verb for ListArgs {
    fn pre_run(&self, c: &CommandConfig<'_>) -> Result<()> {
        c.check_required_flags(&["datacenter-id"])
    }

    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let filters = query::filter_by("name", self.filter_name.clone())
            .into_iter()
            .chain(self.page.filters())
            .chain([query::depth(1)]);

        let response = c
            .client(Product::Compute)?
            .list(ListRequest::new(servers_path(&self.datacenter_id)).apply(filters))
            .await?;
        c.printer().print(&response.body, &SERVERS)
    }
}

impl Verb for GetArgs {
    fn pre_run(&self, c: &CommandConfig<'_>) -> Result<()> {
        c.check_required_flags(&["datacenter-id", "server-id"])
    }

    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let id = self.server_id.as_deref().unwrap_or_default();
        let servers = servers_path(&self.datacenter_id);
        common::get_one(c, Product::Compute, &servers, id, "server", &SERVERS).await
    }
}

impl Verb for DeleteArgs {
    fn pre_run(&self, c: &CommandConfig<'_>) -> Result<()> {
        c.check_required_flags(&["datacenter-id"])?;
        common::require_id_or_all(c, "server-id")
    }

    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let client = c.client(Product::Compute)?;
        let servers = servers_path(&self.datacenter_id);

        let ids = match (&self.server_id, self.all) {
            (Some(id), false) => vec![id.clone()],
            _ => common::all_ids(&client, ListRequest::new(servers.as_str()), |_| true).await?,
        };

        common::delete_each(c, "server(s)", ids, |id| {
            let client = &client;
            let path = format!("{}/{}", servers, id);
            async move {
                let response = client.delete(&path).await?;
                self.wait.settle(c, client, &response).await
            }
        })
        .await
    }
}
