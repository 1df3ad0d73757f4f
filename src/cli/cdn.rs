//! CDN distributions

use anyhow::{anyhow, Context as _, Result};
use clap::{Args, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;

use crate::api::query::{self, ListRequest};
use crate::api::Product;
use crate::cli::common::{self, PageArgs};
use crate::cli::completion::{complete, Resource};
use crate::core::{execute, CommandConfig, Verb};
use crate::output::table::{col, Column, TableSpec};
use crate::util::uuidgen;

const COLUMNS: &[Column] = &[
    col("Id", "id"),
    col("Domain", "properties.domain"),
    col("CertificateId", "properties.certificateId"),
    col("State", "metadata.state"),
    col("PublicEndpointIpv4", "metadata.publicEndpointIpv4"),
    col("PublicEndpointIpv6", "metadata.publicEndpointIpv6"),
];

pub const DISTRIBUTIONS: TableSpec = TableSpec {
    root: "items",
    columns: COLUMNS,
    defaults: &["Id", "Domain", "State"],
};

const ROUTING_RULES: TableSpec = TableSpec {
    root: "properties.routingRules",
    columns: &[
        col("Scheme", "scheme"),
        col("Prefix", "prefix"),
        col("Host", "upstream.host"),
        col("Caching", "upstream.caching"),
        col("Waf", "upstream.waf"),
        col("RateLimitClass", "upstream.rateLimitClass"),
    ],
    defaults: &["Scheme", "Prefix", "Host", "Caching", "Waf"],
};

#[derive(Args, Debug)]
pub struct CdnArgs {
    #[command(subcommand)]
    pub command: CdnCommand,
}

#[derive(Subcommand, Debug)]
pub enum CdnCommand {
    /// Manage CDN distributions
    #[command(visible_alias = "ds")]
    Distribution {
        #[command(subcommand)]
        command: DistributionCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum DistributionCommand {
    /// List distributions
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Get a distribution
    #[command(visible_alias = "g")]
    Get(GetArgs),

    /// Create a distribution
    #[command(visible_alias = "c")]
    Create(CreateArgs),

    /// Update a distribution
    #[command(visible_alias = "u")]
    Update(UpdateArgs),

    /// Delete a distribution, or all of them
    #[command(visible_alias = "d")]
    Delete(DeleteArgs),

    /// Inspect a distribution's routing rules
    #[command(name = "routingrules", visible_alias = "rr")]
    RoutingRules {
        #[command(subcommand)]
        command: RoutingRulesCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum RoutingRulesCommand {
    /// List the routing rules of a distribution
    #[command(visible_alias = "ls")]
    List(GetArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only distributions whose domain contains this value
    #[arg(long = "filter.domain")]
    pub filter_domain: Option<String>,

    /// Only distributions in this state (e.g. AVAILABLE)
    #[arg(long = "filter.state")]
    pub filter_state: Option<String>,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Distribution ID
    #[arg(short = 'i', long, add = complete(Resource::Distributions))]
    pub distribution_id: Option<String>,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Domain served by the distribution
    #[arg(long)]
    pub domain: Option<String>,

    /// ID of the certificate for the domain
    #[arg(long, add = complete(Resource::Certificates))]
    pub certificate_id: Option<String>,

    /// JSON file with the routing rules array
    #[arg(long)]
    pub routing_rules: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Distribution ID
    #[arg(short = 'i', long, add = complete(Resource::Distributions))]
    pub distribution_id: Option<String>,

    /// New domain
    #[arg(long)]
    pub domain: Option<String>,

    /// New certificate ID
    #[arg(long, add = complete(Resource::Certificates))]
    pub certificate_id: Option<String>,

    /// JSON file with the new routing rules array
    #[arg(long)]
    pub routing_rules: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Distribution ID
    #[arg(short = 'i', long, add = complete(Resource::Distributions))]
    pub distribution_id: Option<String>,

    /// Delete all distributions
    #[arg(short = 'a', long)]
    pub all: bool,
}

pub async fn execute_cdn(c: &CommandConfig<'_>, args: CdnArgs) -> Result<()> {
    match args.command {
        CdnCommand::Distribution { command } => match command {
            DistributionCommand::List(a) => execute(&a, c).await,
            DistributionCommand::Get(a) => execute(&a, c).await,
            DistributionCommand::Create(a) => execute(&a, c).await,
            DistributionCommand::Update(a) => execute(&a, c).await,
            DistributionCommand::Delete(a) => execute(&a, c).await,
            DistributionCommand::RoutingRules {
                command: RoutingRulesCommand::List(a),
            } => execute(&RoutingRulesList(a), c).await,
        },
    }
}

/// Read a routing rules file: a JSON array of rules
fn read_routing_rules(path: &PathBuf) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading routing rules from {}", path.display()))?;
    let rules: Value = serde_json::from_str(&content)
        .with_context(|| format!("parsing routing rules in {}", path.display()))?;

    if !rules.is_array() {
        return Err(anyhow!(
            "{}: routing rules must be a JSON array",
            path.display()
        ));
    }
    Ok(rules)
}

fn distribution_path(id: &str) -> String {
    format!("/distributions/{}", id)
}

impl Verb for ListArgs {
    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let client = c.client(Product::Cdn)?;

        let filters = [
            query::filter_by("domain", self.filter_domain.clone()),
            query::filter_by("state", self.filter_state.clone()),
        ]
        .into_iter()
        .flatten()
        .chain(self.page.filters());

        let response = client
            .list(ListRequest::new("/distributions").apply(filters))
            .await?;
        c.printer().print(&response.body, &DISTRIBUTIONS)
    }
}

impl Verb for GetArgs {
    fn pre_run(&self, c: &CommandConfig<'_>) -> Result<()> {
        c.check_required_flags(&["distribution-id"])
    }

    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let id = self.distribution_id.as_deref().unwrap_or_default();
        common::get_one(c, Product::Cdn, "/distributions", id, "distribution", &DISTRIBUTIONS).await
    }
}

struct RoutingRulesList(GetArgs);

impl Verb for RoutingRulesList {
    fn pre_run(&self, c: &CommandConfig<'_>) -> Result<()> {
        self.0.pre_run(c)
    }

    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let id = self.0.distribution_id.as_deref().unwrap_or_default();
        let client = c.client(Product::Cdn)?;

        let response = client
            .get(&distribution_path(id))
            .await
            .with_context(|| format!("distribution {} not found", id))?;
        c.printer().print(&response.body, &ROUTING_RULES)
    }
}

impl Verb for CreateArgs {
    fn pre_run(&self, c: &CommandConfig<'_>) -> Result<()> {
        c.check_required_flags(&["domain", "routing-rules"])
    }

    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let rules = match &self.routing_rules {
            Some(path) => read_routing_rules(path)?,
            None => json!([]),
        };

        let mut properties = json!({
            "domain": self.domain,
            "routingRules": rules,
        });
        if let Some(ref cert) = self.certificate_id {
            properties["certificateId"] = json!(cert);
        }

        let client = c.client(Product::Cdn)?;
        let id = uuidgen::must::<&str>(&[]);
        let response = client
            .put(
                &distribution_path(&id.to_string()),
                json!({ "properties": properties }),
            )
            .await?;

        c.printer().success(&format!("Created distribution {}", id));
        c.printer().print(&response.body, &DISTRIBUTIONS.at(""))
    }
}

impl Verb for UpdateArgs {
    fn pre_run(&self, c: &CommandConfig<'_>) -> Result<()> {
        c.check_required_flags(&["distribution-id"])
    }

    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let id = self.distribution_id.as_deref().unwrap_or_default();
        let client = c.client(Product::Cdn)?;

        // PUT replaces the whole resource, so start from the current one
        let current = client
            .get(&distribution_path(id))
            .await
            .with_context(|| format!("distribution {} not found", id))?;
        let mut properties = current.body["properties"].clone();
        if !properties.is_object() {
            return Err(anyhow!("distribution {} has no properties", id));
        }

        if let Some(ref domain) = self.domain {
            properties["domain"] = json!(domain);
        }
        if let Some(ref cert) = self.certificate_id {
            properties["certificateId"] = json!(cert);
        }
        if let Some(ref path) = self.routing_rules {
            properties["routingRules"] = read_routing_rules(path)?;
        }

        let response = client
            .put(&distribution_path(id), json!({ "properties": properties }))
            .await?;

        c.printer().success(&format!("Updated distribution {}", id));
        c.printer().print(&response.body, &DISTRIBUTIONS.at(""))
    }
}

impl Verb for DeleteArgs {
    fn pre_run(&self, c: &CommandConfig<'_>) -> Result<()> {
        common::require_id_or_all(c, "distribution-id")
    }

    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let id = self.distribution_id.as_deref().filter(|_| !self.all);
        common::delete_id_or_all(c, Product::Cdn, "/distributions", "distribution(s)", id).await
    }
}
