//! Database as a Service: In-Memory DB replica sets, MongoDB and PostgreSQL clusters

use anyhow::{anyhow, Context as _, Result};
use clap::{Args, Subcommand};
use serde_json::json;
use uuid::Uuid;

use crate::api::query::{self, ListRequest};
use crate::api::Product;
use crate::cli::common::{self, PageArgs};
use crate::cli::completion::{complete, Resource};
use crate::core::{execute, CommandConfig, Verb};
use crate::output::table::{col, size_col, TableSpec};
use crate::util::units::{self, Unit};
use crate::util::uuidgen;

const REPLICA_SETS: TableSpec = TableSpec {
    root: "items",
    columns: &[
        col("Id", "id"),
        col("Name", "properties.displayName"),
        col("Version", "properties.version"),
        col("DNSName", "metadata.dnsName"),
        col("Replicas", "properties.replicas"),
        col("Cores", "properties.resources.cores"),
        size_col("RAM", "properties.resources.ram", Unit::GB),
        col("PersistenceMode", "properties.persistenceMode"),
        col("EvictionPolicy", "properties.evictionPolicy"),
        col("DatacenterId", "properties.connections.0.datacenterId"),
        col("LanId", "properties.connections.0.lanId"),
        col("State", "metadata.state"),
    ],
    defaults: &["Id", "Name", "Version", "DNSName", "Replicas", "RAM", "State"],
};

const MONGO_CLUSTERS: TableSpec = TableSpec {
    root: "items",
    columns: &[
        col("Id", "id"),
        col("Name", "properties.displayName"),
        col("Edition", "properties.edition"),
        col("Version", "properties.mongoDBVersion"),
        col("Instances", "properties.instances"),
        col("Cores", "properties.cores"),
        size_col("RAM", "properties.ram", Unit::MB),
        size_col("Storage", "properties.storageSize", Unit::MB),
        col("Location", "properties.location"),
        col("State", "metadata.state"),
    ],
    defaults: &["Id", "Name", "Version", "Instances", "Location", "State"],
};

const POSTGRES_CLUSTERS: TableSpec = TableSpec {
    root: "items",
    columns: &[
        col("Id", "id"),
        col("Name", "properties.displayName"),
        col("Version", "properties.postgresVersion"),
        col("Instances", "properties.instances"),
        col("Cores", "properties.cores"),
        size_col("RAM", "properties.ram", Unit::MB),
        size_col("Storage", "properties.storageSize", Unit::MB),
        col("StorageType", "properties.storageType"),
        col("Location", "properties.location"),
        col("State", "metadata.state"),
    ],
    defaults: &["Id", "Name", "Version", "Instances", "RAM", "Storage", "Location", "State"],
};

/// A cluster-based database engine
pub struct Engine {
    pub product: Product,
    pub table: TableSpec,
}

pub const MONGO: Engine = Engine {
    product: Product::MongoDb,
    table: MONGO_CLUSTERS,
};

pub const POSTGRES: Engine = Engine {
    product: Product::PostgreSql,
    table: POSTGRES_CLUSTERS,
};

#[derive(Args, Debug)]
pub struct DbaasArgs {
    #[command(subcommand)]
    pub command: DbaasCommand,
}

#[derive(Subcommand, Debug)]
pub enum DbaasCommand {
    /// In-Memory DB (Redis compatible)
    #[command(name = "in-memory-db", visible_alias = "inmemorydb")]
    InMemoryDb(InMemoryDbArgs),

    /// MongoDB
    #[command(visible_alias = "mongodb")]
    Mongo {
        #[command(subcommand)]
        command: EngineCommand,
    },

    /// PostgreSQL
    #[command(visible_alias = "pg")]
    Postgres {
        #[command(subcommand)]
        command: EngineCommand,
    },
}

#[derive(Args, Debug)]
pub struct InMemoryDbArgs {
    /// Location of the In-Memory DB endpoint, e.g. de/txl
    #[arg(short = 'l', long, global = true)]
    pub location: Option<String>,

    #[command(subcommand)]
    pub command: InMemoryDbCommand,
}

#[derive(Subcommand, Debug)]
pub enum InMemoryDbCommand {
    /// Manage replica sets
    #[command(name = "replicaset", visible_alias = "rs")]
    ReplicaSet {
        #[command(subcommand)]
        command: ReplicaSetCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ReplicaSetCommand {
    /// List replica sets
    #[command(visible_alias = "ls")]
    List(ReplicaSetListArgs),
    /// Get a replica set
    #[command(visible_alias = "g")]
    Get(ReplicaSetIdArgs),
    /// Create a replica set
    #[command(visible_alias = "c")]
    Create(ReplicaSetCreateArgs),
    /// Delete a replica set, or all of them
    #[command(visible_alias = "d")]
    Delete(ReplicaSetDeleteArgs),
}

#[derive(Subcommand, Debug)]
pub enum EngineCommand {
    /// Manage clusters
    #[command(visible_alias = "c")]
    Cluster {
        #[command(subcommand)]
        command: ClusterCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ClusterCommand {
    /// List clusters
    #[command(visible_alias = "ls")]
    List(ClusterListArgs),
    /// Get a cluster
    #[command(visible_alias = "g")]
    Get(ClusterIdArgs),
    /// Delete a cluster, or all of them
    #[command(visible_alias = "d")]
    Delete(ClusterDeleteArgs),
}

#[derive(Args, Debug)]
pub struct ReplicaSetListArgs {
    /// Only replica sets whose name contains this value
    #[arg(long = "filter.name")]
    pub filter_name: Option<String>,
}

#[derive(Args, Debug)]
pub struct ReplicaSetIdArgs {
    /// Replica set ID
    #[arg(short = 'i', long, add = complete(Resource::Replicasets))]
    pub replica_set_id: Option<String>,
}

#[derive(Args, Debug)]
pub struct ReplicaSetCreateArgs {
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    #[arg(long, default_value = "7.2")]
    pub version: String,

    #[arg(long, default_value_t = 1)]
    pub replicas: u32,

    #[arg(long, default_value_t = 1)]
    pub cores: u32,

    /// Memory per replica, e.g. 4GB or 4096MB; a bare number is in GB
    #[arg(long, default_value = "4GB")]
    pub ram: String,

    /// None, AOF, RDB or RDB_AOF
    #[arg(long, default_value = "RDB")]
    pub persistence_mode: String,

    #[arg(long, default_value = "allkeys-lru")]
    pub eviction_policy: String,

    #[arg(long, add = complete(Resource::Datacenters))]
    pub datacenter_id: Option<String>,

    #[arg(long)]
    pub lan_id: Option<String>,

    /// Private IP of the replica set in CIDR notation
    #[arg(long)]
    pub cidr: Option<String>,

    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Args, Debug)]
pub struct ReplicaSetDeleteArgs {
    /// Replica set ID
    #[arg(short = 'i', long, add = complete(Resource::Replicasets))]
    pub replica_set_id: Option<String>,

    /// Delete all replica sets
    #[arg(short = 'a', long)]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct ClusterListArgs {
    /// Only clusters whose name contains this value
    #[arg(long = "filter.name")]
    pub filter_name: Option<String>,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Args, Debug)]
pub struct ClusterIdArgs {
    /// Cluster ID
    #[arg(short = 'i', long)]
    pub cluster_id: Option<String>,
}

#[derive(Args, Debug)]
pub struct ClusterDeleteArgs {
    /// Cluster ID
    #[arg(short = 'i', long)]
    pub cluster_id: Option<String>,

    /// Delete all clusters
    #[arg(short = 'a', long)]
    pub all: bool,
}

pub async fn execute_dbaas(c: &CommandConfig<'_>, args: DbaasArgs) -> Result<()> {
    match args.command {
        DbaasCommand::InMemoryDb(args) => {
            let c = &c.with_location(args.location);
            match args.command {
                InMemoryDbCommand::ReplicaSet { command } => match command {
                    ReplicaSetCommand::List(a) => execute(&a, c).await,
                    ReplicaSetCommand::Get(a) => execute(&a, c).await,
                    ReplicaSetCommand::Create(a) => execute(&a, c).await,
                    ReplicaSetCommand::Delete(a) => execute(&a, c).await,
                },
            }
        }
        DbaasCommand::Mongo { command } => execute_engine(c, &MONGO, command).await,
        DbaasCommand::Postgres { command } => execute_engine(c, &POSTGRES, command).await,
    }
}

async fn execute_engine(
    c: &CommandConfig<'_>,
    engine: &'static Engine,
    command: EngineCommand,
) -> Result<()> {
    let EngineCommand::Cluster { command } = command;
    match command {
        ClusterCommand::List(args) => execute(&OnEngine { engine, args }, c).await,
        ClusterCommand::Get(args) => execute(&OnEngine { engine, args }, c).await,
        ClusterCommand::Delete(args) => execute(&OnEngine { engine, args }, c).await,
    }
}

fn replica_set_path(id: &str) -> String {
    format!("/replicasets/{}", id)
}

/// Same effective location and name always map to the same replica set
fn replica_set_id(location: Option<&str>, name: &str) -> Result<Uuid> {
    let location = Product::InMemoryDb
        .effective_location(location)?
        .map(|l| l.to_string())
        .unwrap_or_default();
    Ok(uuidgen::must(&[location.as_str(), name]))
}

/// Memory for a replica set in whole GB
fn parse_ram_gb(input: &str) -> Result<i64> {
    let gb = units::parse_in(input, Unit::GB).context("invalid --ram value")?;
    if gb == 0 {
        return Err(anyhow!("invalid --ram value '{}': at least 1GB is required", input));
    }
    Ok(gb)
}

impl Verb for ReplicaSetListArgs {
    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let request = ListRequest::new("/replicasets")
            .apply(query::filter_by("name", self.filter_name.clone()));
        let response = c.client(Product::InMemoryDb)?.list(request).await?;
        c.printer().print(&response.body, &REPLICA_SETS)
    }
}

impl Verb for ReplicaSetIdArgs {
    fn pre_run(&self, c: &CommandConfig<'_>) -> Result<()> {
        c.check_required_flags(&["replica-set-id"])
    }

    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let id = self.replica_set_id.as_deref().unwrap_or_default();
        common::get_one(c, Product::InMemoryDb, "/replicasets", id, "replica set", &REPLICA_SETS)
            .await
    }
}

impl Verb for ReplicaSetCreateArgs {
    fn pre_run(&self, c: &CommandConfig<'_>) -> Result<()> {
        c.check_required_flags(&[
            "name",
            "datacenter-id",
            "lan-id",
            "cidr",
            "username",
            "password",
        ])?;
        parse_ram_gb(&self.ram).map(|_| ())
    }

    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let name = self.name.as_deref().unwrap_or_default();
        let ram = parse_ram_gb(&self.ram)?;

        let body = json!({
            "properties": {
                "displayName": name,
                "version": self.version,
                "replicas": self.replicas,
                "resources": {
                    "cores": self.cores,
                    "ram": ram,
                },
                "persistenceMode": self.persistence_mode,
                "evictionPolicy": self.eviction_policy,
                "connections": [{
                    "datacenterId": self.datacenter_id,
                    "lanId": self.lan_id,
                    "cidr": self.cidr,
                }],
                "credentials": {
                    "username": self.username,
                    "plainTextPassword": self.password,
                },
            }
        });

        let id = replica_set_id(c.location.as_deref(), name)?;

        let response = c
            .client(Product::InMemoryDb)?
            .put(&replica_set_path(&id.to_string()), body)
            .await?;
        c.printer().success(&format!("Creating replica set {}", id));
        c.printer().print(&response.body, &REPLICA_SETS.at(""))
    }
}

impl Verb for ReplicaSetDeleteArgs {
    fn pre_run(&self, c: &CommandConfig<'_>) -> Result<()> {
        common::require_id_or_all(c, "replica-set-id")
    }

    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let id = self.replica_set_id.as_deref().filter(|_| !self.all);
        common::delete_id_or_all(c, Product::InMemoryDb, "/replicasets", "replica set(s)", id).await
    }
}

/// Cluster verbs bound to a database engine
struct OnEngine<A> {
    engine: &'static Engine,
    args: A,
}

impl Verb for OnEngine<ClusterListArgs> {
    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let filters = query::filter_by("name", self.args.filter_name.clone())
            .into_iter()
            .chain(self.args.page.filters());
        let request = ListRequest::new("/clusters").apply(filters);

        let response = c.client(self.engine.product)?.list(request).await?;
        c.printer().print(&response.body, &self.engine.table)
    }
}

impl Verb for OnEngine<ClusterIdArgs> {
    fn pre_run(&self, c: &CommandConfig<'_>) -> Result<()> {
        c.check_required_flags(&["cluster-id"])
    }

    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let id = self.args.cluster_id.as_deref().unwrap_or_default();
        common::get_one(c, self.engine.product, "/clusters", id, "cluster", &self.engine.table).await
    }
}

impl Verb for OnEngine<ClusterDeleteArgs> {
    fn pre_run(&self, c: &CommandConfig<'_>) -> Result<()> {
        common::require_id_or_all(c, "cluster-id")
    }

    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let id = self.args.cluster_id.as_deref().filter(|_| !self.args.all);
        common::delete_id_or_all(c, self.engine.product, "/clusters", "cluster(s)", id).await
    }
}
