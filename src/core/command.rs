//! Command lifecycle: pre-run validation, then the request/response cycle

use anyhow::Result;
use std::io::{self, BufRead, BufReader};
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

use crate::api::{Clients, IonosClient, Product};
use crate::config::Config;
use crate::core::confirm::fask;
use crate::core::flags::{self, FlagStore};
use crate::error::CliError;
use crate::output::Printer;

/// Process-wide state shared by every command
pub struct Context {
    pub config: Config,
    pub clients: Clients,
    pub printer: Printer,
    /// Pause between request-status polls
    pub poll_interval: Duration,
    stdin: Mutex<Box<dyn BufRead + Send>>,
}

impl Context {
    pub fn new(config: Config, printer: Printer) -> Self {
        Self {
            clients: Clients::new(config.clone()),
            config,
            printer,
            poll_interval: crate::api::waiter::DEFAULT_INTERVAL,
            stdin: Mutex::new(Box::new(BufReader::new(io::stdin()))),
        }
    }

    /// Read confirmation answers from `input` instead of stdin
    pub fn with_stdin(mut self, input: Box<dyn BufRead + Send>) -> Self {
        self.stdin = Mutex::new(input);
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Everything one invocation of a verb gets to see
pub struct CommandConfig<'a> {
    /// Command path, e.g. `cdn.distribution.delete`
    pub namespace: String,
    pub flags: &'a FlagStore,
    pub ctx: &'a Context,
    /// Region for regional products, from the group's `--location`
    pub location: Option<String>,
}

impl<'a> CommandConfig<'a> {
    pub fn new(namespace: impl Into<String>, flags: &'a FlagStore, ctx: &'a Context) -> Self {
        Self {
            namespace: namespace.into(),
            flags,
            ctx,
            location: None,
        }
    }

    pub fn with_location(&self, location: Option<String>) -> CommandConfig<'a> {
        CommandConfig {
            namespace: self.namespace.clone(),
            flags: self.flags,
            ctx: self.ctx,
            location,
        }
    }

    pub fn is_set(&self, flag: &str) -> bool {
        self.flags.is_set(&self.namespace, flag)
    }

    pub fn check_required_flags(&self, required: &[&str]) -> Result<()> {
        Ok(flags::check_required_flags(self.flags, &self.namespace, required)?)
    }

    pub fn check_required_flags_sets(&self, sets: &[&[&str]]) -> Result<()> {
        Ok(flags::check_required_flags_sets(self.flags, &self.namespace, sets)?)
    }

    pub fn printer(&self) -> &Printer {
        &self.ctx.printer
    }

    /// API client for `product` at this command's location
    pub fn client(&self, product: Product) -> Result<IonosClient> {
        self.ctx.clients.get(product, self.location.as_deref())
    }

    pub fn force(&self) -> bool {
        self.is_set("force")
    }

    /// Ask before a destructive call; a "no" becomes [`CliError::Cancelled`]
    pub fn confirm(&self, prompt: &str, action: &str) -> Result<()> {
        let mut stdin = self
            .ctx
            .stdin
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut err = self.ctx.printer.err_writer();

        if fask(&mut **stdin, &mut **err, prompt, self.force()) {
            Ok(())
        } else {
            Err(CliError::Cancelled(action.to_string()).into())
        }
    }
}

/// A leaf command.
///
/// `pre_run` validates flags and must not touch the network; `run` performs
/// the request and prints the result.
#[allow(async_fn_in_trait)]
pub trait Verb {
    fn pre_run(&self, _c: &CommandConfig<'_>) -> Result<()> {
        Ok(())
    }

    async fn run(&self, c: &CommandConfig<'_>) -> Result<()>;
}

/// Run a verb: validation first, then the request only if validation passed
pub async fn execute<V: Verb>(verb: &V, c: &CommandConfig<'_>) -> Result<()> {
    debug!(namespace = %c.namespace, "pre-run");
    verb.pre_run(c)?;
    debug!(namespace = %c.namespace, "run");
    verb.run(c).await
}
