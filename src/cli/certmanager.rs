//! Certificate Manager certificates

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::query::{self, ListRequest};
use crate::api::Product;
use crate::cli::common::{self, PageArgs};
use crate::cli::completion::{complete, Resource};
use crate::core::{execute, CommandConfig, Verb};
use crate::output::table::{col, TableSpec};

pub const CERTIFICATES: TableSpec = TableSpec {
    root: "items",
    columns: &[
        col("Id", "id"),
        col("Name", "properties.name"),
        col("Certificate", "properties.certificate"),
        col("CertificateChain", "properties.certificateChain"),
        col("State", "metadata.state"),
    ],
    defaults: &["Id", "Name", "State"],
};

#[derive(Args, Debug)]
pub struct CertManagerArgs {
    #[command(subcommand)]
    pub command: CertManagerGroup,
}

#[derive(Subcommand, Debug)]
pub enum CertManagerGroup {
    /// Manage certificates
    #[command(visible_alias = "cert")]
    Certificate {
        #[command(subcommand)]
        command: CertificateCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum CertificateCommand {
    /// List certificates
    #[command(visible_alias = "ls")]
    List(ListArgs),
    /// Get a certificate
    #[command(visible_alias = "g")]
    Get(GetArgs),
    /// Delete a certificate, or all of them
    #[command(visible_alias = "d")]
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only certificates whose name contains this value
    #[arg(long = "filter.name")]
    pub filter_name: Option<String>,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Certificate ID
    #[arg(short = 'i', long, add = complete(Resource::Certificates))]
    pub certificate_id: Option<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Certificate ID
    #[arg(short = 'i', long, add = complete(Resource::Certificates))]
    pub certificate_id: Option<String>,

    /// Delete all certificates
    #[arg(short = 'a', long)]
    pub all: bool,
}

pub async fn execute_certmanager(c: &CommandConfig<'_>, args: CertManagerArgs) -> Result<()> {
    let CertManagerGroup::Certificate { command } = args.command;
    match command {
        CertificateCommand::List(a) => execute(&a, c).await,
        CertificateCommand::Get(a) => execute(&a, c).await,
        CertificateCommand::Delete(a) => execute(&a, c).await,
    }
}

impl Verb for ListArgs {
    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let filters = query::filter_by("name", self.filter_name.clone())
            .into_iter()
            .chain(self.page.filters());

        let response = c
            .client(Product::CertManager)?
            .list(ListRequest::new("/certificates").apply(filters))
            .await?;
        c.printer().print(&response.body, &CERTIFICATES)
    }
}

impl Verb for GetArgs {
    fn pre_run(&self, c: &CommandConfig<'_>) -> Result<()> {
        c.check_required_flags(&["certificate-id"])
    }

    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let id = self.certificate_id.as_deref().unwrap_or_default();
        common::get_one(c, Product::CertManager, "/certificates", id, "certificate", &CERTIFICATES)
            .await
    }
}

impl Verb for DeleteArgs {
    fn pre_run(&self, c: &CommandConfig<'_>) -> Result<()> {
        common::require_id_or_all(c, "certificate-id")
    }

    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let id = self.certificate_id.as_deref().filter(|_| !self.all);
        common::delete_id_or_all(c, Product::CertManager, "/certificates", "certificate(s)", id)
            .await
    }
}
