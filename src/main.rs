//! ionosctl - IONOS Cloud command line client

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::CompleteEnv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ionosctl::cli::{self, Cli, Invocation};
use ionosctl::config::Config;
use ionosctl::core::Context;
use ionosctl::output::{self, Printer};

fn init_tracing(verbose: bool) {
    let default = if verbose { "ionosctl=debug" } else { "warn" };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

async fn run(invocation: Invocation) -> Result<()> {
    let config = Config::load(&invocation.cli.global.overrides())?;
    let printer = Printer::stdio(invocation.cli.global.print_options());
    let ctx = Context::new(config, printer);

    cli::run(invocation, &ctx).await
}

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // answers the shell and exits when COMPLETE is set; completers run their
    // own runtime, so this happens before ours exists
    CompleteEnv::with_factory(Cli::command).complete();

    let matches = Cli::command().get_matches();
    let invocation = Invocation::from_matches(&matches).unwrap_or_else(|e| e.exit());

    init_tracing(invocation.cli.global.verbose);

    let rt = tokio::runtime::Runtime::new()?;
    if let Err(e) = rt.block_on(run(invocation)) {
        output::error(&format!("{:#}", e));
        std::process::exit(1);
    }
    Ok(())
}
