//! Container registries

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::query::{self, ListRequest};
use crate::api::Product;
use crate::cli::common::{self, PageArgs};
use crate::cli::completion::{complete, Resource};
use crate::core::{execute, CommandConfig, Verb};
use crate::output::table::{col, TableSpec};

pub const REGISTRIES: TableSpec = TableSpec {
    root: "items",
    columns: &[
        col("Id", "id"),
        col("Name", "properties.name"),
        col("Location", "properties.location"),
        col("Hostname", "properties.hostname"),
        col("GarbageCollectionDays", "properties.garbageCollectionSchedule.days"),
        col("GarbageCollectionTime", "properties.garbageCollectionSchedule.time"),
        col("StorageBytes", "properties.storageUsage.bytes"),
        col("State", "metadata.state"),
    ],
    defaults: &["Id", "Name", "Location", "Hostname", "State"],
};

#[derive(Args, Debug)]
pub struct RegistryArgs {
    #[command(subcommand)]
    pub command: RegistryGroup,
}

#[derive(Subcommand, Debug)]
pub enum RegistryGroup {
    /// Manage registries
    #[command(visible_alias = "reg")]
    Registry {
        #[command(subcommand)]
        command: RegistryCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum RegistryCommand {
    /// List registries
    #[command(visible_alias = "ls")]
    List(ListArgs),
    /// Get a registry
    #[command(visible_alias = "g")]
    Get(GetArgs),
    /// Delete a registry, or all of them
    #[command(visible_alias = "d")]
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only registries whose name contains this value
    #[arg(long = "filter.name")]
    pub filter_name: Option<String>,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Registry ID
    #[arg(short = 'i', long, add = complete(Resource::Registries))]
    pub registry_id: Option<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Registry ID
    #[arg(short = 'i', long, add = complete(Resource::Registries))]
    pub registry_id: Option<String>,

    /// Delete all registries
    #[arg(short = 'a', long)]
    pub all: bool,
}

pub async fn execute_registry(c: &CommandConfig<'_>, args: RegistryArgs) -> Result<()> {
    let RegistryGroup::Registry { command } = args.command;
    match command {
        RegistryCommand::List(a) => execute(&a, c).await,
        RegistryCommand::Get(a) => execute(&a, c).await,
        RegistryCommand::Delete(a) => execute(&a, c).await,
    }
}

impl Verb for ListArgs {
    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let filters = query::filter_by("name", self.filter_name.clone())
            .into_iter()
            .chain(self.page.filters());

        let response = c
            .client(Product::ContainerRegistry)?
            .list(ListRequest::new("/registries").apply(filters))
            .await?;
        c.printer().print(&response.body, &REGISTRIES)
    }
}

impl Verb for GetArgs {
    fn pre_run(&self, c: &CommandConfig<'_>) -> Result<()> {
        c.check_required_flags(&["registry-id"])
    }

    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let id = self.registry_id.as_deref().unwrap_or_default();
        common::get_one(c, Product::ContainerRegistry, "/registries", id, "registry", &REGISTRIES)
            .await
    }
}

impl Verb for DeleteArgs {
    fn pre_run(&self, c: &CommandConfig<'_>) -> Result<()> {
        common::require_id_or_all(c, "registry-id")
    }

    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let id = self.registry_id.as_deref().filter(|_| !self.all);
        common::delete_id_or_all(c, Product::ContainerRegistry, "/registries", "registry(s)", id)
            .await
    }
}
