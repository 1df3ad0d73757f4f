//! CLI commands module

pub mod autoscaling;
pub mod cdn;
pub mod certmanager;
pub mod common;
pub mod completion;
pub mod config_cmd;
pub mod datacenter;
pub mod dbaas;
pub mod dns;
pub mod image;
pub mod kafka;
pub mod registry;
pub mod server;

use anyhow::Result;
use clap::{ArgMatches, Args, CommandFactory, FromArgMatches, Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::config::{OutputFormat, Overrides, ENV_API_URL};
use crate::core::flags::FlagStore;
use crate::core::{CommandConfig, Context};
use crate::output::PrintOptions;

pub const ENV_CONFIG_FILE: &str = "IONOS_CONFIG_FILE";

/// ionosctl - IONOS Cloud command line client
#[derive(Parser, Debug)]
#[command(name = "ionosctl")]
#[command(version)]
#[command(about = "Manage IONOS Cloud resources from the command line", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags accepted by every command
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Columns to print, comma separated; "all" for every column
    #[arg(long, global = true, value_delimiter = ',')]
    pub cols: Vec<String>,

    /// Omit the header row of tables
    #[arg(long, global = true)]
    pub no_headers: bool,

    /// Skip confirmation prompts
    #[arg(short, long, global = true)]
    pub force: bool,

    /// Only print command results
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file to use
    #[arg(short, long, global = true, env = ENV_CONFIG_FILE)]
    pub config: Option<PathBuf>,

    /// Override the API base URL of every product
    #[arg(short = 'u', long, global = true, env = ENV_API_URL)]
    pub api_url: Option<String>,
}

impl GlobalArgs {
    pub fn print_options(&self) -> PrintOptions {
        PrintOptions {
            format: self.output,
            cols: self.cols.clone(),
            no_headers: self.no_headers,
            quiet: self.quiet,
        }
    }

    pub fn overrides(&self) -> Overrides {
        Overrides {
            config_path: self.config.clone(),
            api_url: self.api_url.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// CDN distributions
    Cdn(cdn::CdnArgs),

    /// Event Streams for Apache Kafka
    Kafka(kafka::KafkaArgs),

    /// Managed databases
    Dbaas(dbaas::DbaasArgs),

    /// Compute datacenters
    #[command(visible_alias = "dc")]
    Datacenter(datacenter::DatacenterArgs),

    /// Compute servers
    #[command(visible_alias = "svr")]
    Server(server::ServerArgs),

    /// Compute images
    #[command(visible_alias = "img")]
    Image(image::ImageArgs),

    /// Container registries
    #[command(name = "container-registry", visible_alias = "cr")]
    ContainerRegistry(registry::RegistryArgs),

    /// Certificate Manager
    #[command(name = "certmanager", visible_alias = "cert")]
    CertManager(certmanager::CertManagerArgs),

    /// Cloud DNS
    Dns(dns::DnsArgs),

    /// VM Auto Scaling
    #[command(name = "vm-autoscaling", visible_alias = "vmas")]
    VmAutoscaling(autoscaling::AutoscalingArgs),

    /// Configuration management
    Config(config_cmd::ConfigArgs),

    /// Shell completion
    Completion(completion::CompletionArgs),
}

/// A parsed command line: typed arguments plus the flags the user set
#[derive(Debug)]
pub struct Invocation {
    pub cli: Cli,
    /// Dotted path of the command that runs, e.g. `cdn.distribution.list`
    pub namespace: String,
    pub flags: FlagStore,
}

impl Invocation {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, clap::Error> {
        let cli = Cli::from_arg_matches(matches)?;
        let (namespace, flags) = FlagStore::from_matches(&Cli::command(), matches);
        Ok(Self {
            cli,
            namespace,
            flags,
        })
    }

    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Cli::command().try_get_matches_from(args)?;
        Self::from_matches(&matches)
    }
}

/// Run the command of an invocation
pub async fn run(invocation: Invocation, ctx: &Context) -> Result<()> {
    let c = CommandConfig::new(invocation.namespace, &invocation.flags, ctx);

    match invocation.cli.command {
        Commands::Cdn(args) => cdn::execute_cdn(&c, args).await,
        Commands::Kafka(args) => kafka::execute_kafka(&c, args).await,
        Commands::Dbaas(args) => dbaas::execute_dbaas(&c, args).await,
        Commands::Datacenter(args) => datacenter::execute_datacenter(&c, args).await,
        Commands::Server(args) => server::execute_server(&c, args).await,
        Commands::Image(args) => image::execute_image(&c, args).await,
        Commands::ContainerRegistry(args) => registry::execute_registry(&c, args).await,
        Commands::CertManager(args) => certmanager::execute_certmanager(&c, args).await,
        Commands::Dns(args) => dns::execute_dns(&c, args).await,
        Commands::VmAutoscaling(args) => autoscaling::execute_autoscaling(&c, args).await,
        Commands::Config(args) => config_cmd::execute_config(&c, args).await,
        Commands::Completion(args) => completion::execute_completion(&c, args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_namespace_and_flags() {
        let inv = Invocation::try_parse_from([
            "ionosctl",
            "cdn",
            "distribution",
            "delete",
            "--distribution-id",
            "abc",
            "--force",
        ])
        .unwrap();

        assert_eq!(inv.namespace, "cdn.distribution.delete");
        assert!(inv.flags.is_set(&inv.namespace, "distribution-id"));
        assert!(inv.flags.is_set(&inv.namespace, "force"));
        assert!(!inv.flags.is_set(&inv.namespace, "all"));
    }

    #[test]
    fn test_version_flag_on_create_commands_is_a_value() {
        let inv = Invocation::try_parse_from([
            "ionosctl",
            "kafka",
            "cluster",
            "create",
            "--name",
            "events",
            "--version",
            "3.6.0",
        ])
        .unwrap();
        assert_eq!(inv.namespace, "kafka.cluster.create");
        assert_eq!(
            inv.flags.get(&inv.namespace, "version"),
            Some(&["3.6.0".to_string()][..])
        );

        let inv = Invocation::try_parse_from([
            "ionosctl",
            "dbaas",
            "in-memory-db",
            "replicaset",
            "create",
            "--name",
            "cache",
            "--version",
            "7.0",
        ])
        .unwrap();
        assert_eq!(inv.namespace, "dbaas.in-memory-db.replicaset.create");
        assert_eq!(
            inv.flags.get(&inv.namespace, "version"),
            Some(&["7.0".to_string()][..])
        );
    }

    #[test]
    fn test_aliases_resolve_to_canonical_namespace() {
        let inv = Invocation::try_parse_from(["ionosctl", "dc", "ls"]).unwrap();
        assert_eq!(inv.namespace, "datacenter.list");
    }

    #[test]
    fn test_global_print_options() {
        let inv = Invocation::try_parse_from([
            "ionosctl",
            "image",
            "list",
            "-o",
            "json",
            "--cols",
            "Id,Name",
            "--no-headers",
        ])
        .unwrap();

        let options = inv.cli.global.print_options();
        assert_eq!(options.format, OutputFormat::Json);
        assert_eq!(options.cols, vec!["Id", "Name"]);
        assert!(options.no_headers);
    }
}
