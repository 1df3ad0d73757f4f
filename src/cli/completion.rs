//! completion command - shell scripts and resource IDs for completion
//!
//! Resource ID flags also complete dynamically: with `COMPLETE=<shell>` set,
//! the binary answers the shell through [`complete`] instead of running.

use anyhow::Result;
use clap::{Args, CommandFactory, Subcommand, ValueEnum};
use clap_complete::engine::{ArgValueCandidates, CompletionCandidate};
use clap_complete::{generate, Shell};
use std::path::PathBuf;
use tracing::debug;

use crate::api::clients::Clients;
use crate::api::completer::{self, id_and};
use crate::api::query::{self, ListRequest};
use crate::api::Product;
use crate::cli::{Cli, ENV_CONFIG_FILE};
use crate::config::{Config, Overrides};
use crate::core::{execute, CommandConfig, Verb};

#[derive(Args, Debug)]
pub struct CompletionArgs {
    #[command(subcommand)]
    pub command: CompletionCommand,
}

#[derive(Subcommand, Debug)]
pub enum CompletionCommand {
    /// Print a completion script for a shell
    Script(ScriptArgs),

    /// Print `ID<TAB>Name` lines for a resource; prints nothing on failure
    Ids(IdsArgs),
}

#[derive(Args, Debug)]
pub struct ScriptArgs {
    pub shell: Shell,
}

#[derive(Args, Debug)]
pub struct IdsArgs {
    pub resource: Resource,

    /// Datacenter of the servers
    #[arg(long)]
    pub datacenter_id: Option<String>,

    /// Location of regional products
    #[arg(short = 'l', long)]
    pub location: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Datacenters,
    Servers,
    Images,
    Distributions,
    KafkaClusters,
    Replicasets,
    MongoClusters,
    PostgresClusters,
    Registries,
    Certificates,
    Zones,
    AutoscalingGroups,
}

impl Resource {
    /// Product, collection path and the item field shown next to the ID
    fn listing(self, datacenter_id: Option<&str>) -> (Product, String, &'static str) {
        match self {
            Resource::Datacenters => (Product::Compute, "/datacenters".into(), "properties.name"),
            Resource::Servers => (
                Product::Compute,
                format!("/datacenters/{}/servers", datacenter_id.unwrap_or_default()),
                "properties.name",
            ),
            Resource::Images => (Product::Compute, "/images".into(), "properties.name"),
            Resource::Distributions => (Product::Cdn, "/distributions".into(), "properties.domain"),
            Resource::KafkaClusters => (Product::Kafka, "/clusters".into(), "properties.name"),
            Resource::Replicasets => (
                Product::InMemoryDb,
                "/replicasets".into(),
                "properties.displayName",
            ),
            Resource::MongoClusters => {
                (Product::MongoDb, "/clusters".into(), "properties.displayName")
            }
            Resource::PostgresClusters => {
                (Product::PostgreSql, "/clusters".into(), "properties.displayName")
            }
            Resource::Registries => (
                Product::ContainerRegistry,
                "/registries".into(),
                "properties.name",
            ),
            Resource::Certificates => {
                (Product::CertManager, "/certificates".into(), "properties.name")
            }
            Resource::Zones => (Product::Dns, "/zones".into(), "properties.zoneName"),
            Resource::AutoscalingGroups => {
                (Product::VmAutoscaling, "/groups".into(), "properties.name")
            }
        }
    }
}

/// Flags of a partial command line that decide where completions come from
#[derive(Debug, Default, PartialEq)]
pub struct Scope {
    pub config: Option<PathBuf>,
    pub api_url: Option<String>,
    pub location: Option<String>,
    pub datacenter_id: Option<String>,
}

impl Scope {
    /// Pick `--config`, `--api-url`, `--location` and `--datacenter-id` out
    /// of `args`, in either `--flag value` or `--flag=value` form
    pub fn from_args(args: &[String]) -> Self {
        let mut scope = Self::default();
        let mut config = None;
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) if flag.starts_with('-') => (flag, Some(value.to_string())),
                _ => (arg.as_str(), None),
            };
            let slot = match flag {
                "-c" | "--config" => &mut config,
                "-u" | "--api-url" => &mut scope.api_url,
                "-l" | "--location" => &mut scope.location,
                "--datacenter-id" => &mut scope.datacenter_id,
                _ => continue,
            };
            *slot = inline.or_else(|| iter.next().cloned()).filter(|v| !v.is_empty());
        }

        scope.config = config
            .or_else(|| std::env::var(ENV_CONFIG_FILE).ok())
            .map(PathBuf::from);
        scope
    }

    fn overrides(&self) -> Overrides {
        Overrides {
            config_path: self.config.clone(),
            api_url: self.api_url.clone(),
        }
    }
}

/// `ID<TAB>Name` lines for `resource`; empty on any failure
async fn resource_ids(
    clients: &Clients,
    resource: Resource,
    location: Option<&str>,
    datacenter_id: Option<&str>,
) -> Vec<String> {
    let (product, path, name_path) = resource.listing(datacenter_id);

    // compute collections only carry properties at depth 1
    let filters = match product {
        Product::Compute => vec![query::depth(1)],
        _ => Vec::new(),
    };

    match clients.get(product, location) {
        Ok(client) => {
            completer::list_projection(&client, ListRequest::new(path), filters, id_and(name_path))
                .await
        }
        Err(e) => {
            debug!("no client for completion: {:#}", e);
            Vec::new()
        }
    }
}

/// Completion candidates for `resource`, the name as help text
pub async fn candidates(resource: Resource, scope: &Scope) -> Vec<CompletionCandidate> {
    let config = match Config::load(&scope.overrides()) {
        Ok(config) => config,
        Err(e) => {
            debug!("no config for completion: {:#}", e);
            return Vec::new();
        }
    };
    let clients = Clients::new(config);

    resource_ids(
        &clients,
        resource,
        scope.location.as_deref(),
        scope.datacenter_id.as_deref(),
    )
    .await
    .into_iter()
    .map(|line| match line.split_once('\t') {
        Some((id, name)) => CompletionCandidate::new(id).help(Some(name.to_string().into())),
        None => CompletionCandidate::new(line),
    })
    .collect()
}

/// Dynamic completer for a flag that takes the ID of `resource`
pub fn complete(resource: Resource) -> ArgValueCandidates {
    ArgValueCandidates::new(move || {
        let args: Vec<String> = std::env::args().collect();
        let scope = Scope::from_args(&args);

        match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt.block_on(candidates(resource, &scope)),
            Err(e) => {
                debug!("no runtime for completion: {}", e);
                Vec::new()
            }
        }
    })
}

pub async fn execute_completion(c: &CommandConfig<'_>, args: CompletionArgs) -> Result<()> {
    match args.command {
        CompletionCommand::Script(a) => execute(&a, c).await,
        CompletionCommand::Ids(a) => {
            let c = &c.with_location(a.location.clone());
            execute(&a, c).await
        }
    }
}

impl Verb for ScriptArgs {
    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();

        let mut script = Vec::new();
        generate(self.shell, &mut cmd, name, &mut script);
        c.printer().write_raw(&String::from_utf8_lossy(&script))
    }
}

impl Verb for IdsArgs {
    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let lines = resource_ids(
            &c.ctx.clients,
            self.resource,
            c.location.as_deref(),
            self.datacenter_id.as_deref(),
        )
        .await;

        if lines.is_empty() {
            return Ok(());
        }
        c.printer().write_raw(&format!("{}\n", lines.join("\n")))
    }
}
