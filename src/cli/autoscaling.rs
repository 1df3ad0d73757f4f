//! VM Auto Scaling groups

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::query::ListRequest;
use crate::api::Product;
use crate::cli::common::{self, PageArgs};
use crate::cli::completion::{complete, Resource};
use crate::core::{execute, CommandConfig, Verb};
use crate::output::table::{col, TableSpec};

pub const GROUPS: TableSpec = TableSpec {
    root: "items",
    columns: &[
        col("Id", "id"),
        col("Name", "properties.name"),
        col("Location", "properties.location"),
        col("DatacenterId", "properties.datacenter.id"),
        col("MinReplicaCount", "properties.minReplicaCount"),
        col("MaxReplicaCount", "properties.maxReplicaCount"),
        col("State", "metadata.state"),
    ],
    defaults: &["Id", "Name", "Location", "MinReplicaCount", "MaxReplicaCount", "State"],
};

#[derive(Args, Debug)]
pub struct AutoscalingArgs {
    #[command(subcommand)]
    pub command: AutoscalingGroup,
}

#[derive(Subcommand, Debug)]
pub enum AutoscalingGroup {
    /// Manage scaling groups
    #[command(visible_alias = "g")]
    Group {
        #[command(subcommand)]
        command: GroupCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum GroupCommand {
    /// List groups
    #[command(visible_alias = "ls")]
    List(ListArgs),
    /// Get a group
    #[command(visible_alias = "g")]
    Get(GetArgs),
    /// Delete a group, or all of them
    #[command(visible_alias = "d")]
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Group ID
    #[arg(short = 'i', long, add = complete(Resource::AutoscalingGroups))]
    pub group_id: Option<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Group ID
    #[arg(short = 'i', long, add = complete(Resource::AutoscalingGroups))]
    pub group_id: Option<String>,

    /// Delete all groups
    #[arg(short = 'a', long)]
    pub all: bool,
}

pub async fn execute_autoscaling(c: &CommandConfig<'_>, args: AutoscalingArgs) -> Result<()> {
    let AutoscalingGroup::Group { command } = args.command;
    match command {
        GroupCommand::List(a) => execute(&a, c).await,
        GroupCommand::Get(a) => execute(&a, c).await,
        GroupCommand::Delete(a) => execute(&a, c).await,
    }
}

impl Verb for ListArgs {
    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let request = ListRequest::new("/groups")
            .param("depth", 1)
            .apply(self.page.filters());

        let response = c.client(Product::VmAutoscaling)?.list(request).await?;
        c.printer().print(&response.body, &GROUPS)
    }
}

impl Verb for GetArgs {
    fn pre_run(&self, c: &CommandConfig<'_>) -> Result<()> {
        c.check_required_flags(&["group-id"])
    }

    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let id = self.group_id.as_deref().unwrap_or_default();
        common::get_one(c, Product::VmAutoscaling, "/groups", id, "group", &GROUPS).await
    }
}

impl Verb for DeleteArgs {
    fn pre_run(&self, c: &CommandConfig<'_>) -> Result<()> {
        common::require_id_or_all(c, "group-id")
    }

    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let id = self.group_id.as_deref().filter(|_| !self.all);
        common::delete_id_or_all(c, Product::VmAutoscaling, "/groups", "group(s)", id).await
    }
}
