//! Config command

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use serde_json::{json, Value};

use crate::api::{location, Clients, Product};
use crate::config::{Config, ConfigFile, Credentials};
use crate::core::{execute, CommandConfig, Verb};
use crate::output::table::{col, TableSpec};

const SETTINGS: TableSpec = TableSpec {
    root: "",
    columns: &[
        col("Path", "path"),
        col("Auth", "auth"),
        col("Username", "username"),
        col("ApiUrl", "apiUrl"),
    ],
    defaults: &["Path", "Auth", "Username", "ApiUrl"],
};

const LOCATIONS: TableSpec = TableSpec {
    root: "items",
    columns: &[
        col("Location", "location"),
        col("Region", "region"),
        col("Country", "country"),
        col("Code", "code"),
    ],
    defaults: &["Location", "Region"],
};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show(ShowArgs),

    /// Print the config file path
    Path(PathArgs),

    /// Store credentials in the config file
    Login(LoginArgs),

    /// List known locations, or normalize one
    Location(LocationArgs),
}

#[derive(Args, Debug)]
pub struct ShowArgs {}

#[derive(Args, Debug)]
pub struct PathArgs {}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Username (email) for basic authentication
    #[arg(long)]
    pub user: Option<String>,

    #[arg(long)]
    pub password: Option<String>,

    /// API token, used instead of username and password
    #[arg(long)]
    pub token: Option<String>,

    /// Store the credentials without checking them against the API
    #[arg(long)]
    pub skip_verify: bool,
}

#[derive(Args, Debug)]
pub struct LocationArgs {
    /// Location to normalize, e.g. "fra" or "DE-TXL"
    pub location: Option<String>,
}

pub async fn execute_config(c: &CommandConfig<'_>, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommand::Show(a) => execute(&a, c).await,
        ConfigCommand::Path(a) => execute(&a, c).await,
        ConfigCommand::Login(a) => execute(&a, c).await,
        ConfigCommand::Location(a) => execute(&a, c).await,
    }
}

fn describe(config: &Config) -> Value {
    let auth = match config.credentials() {
        Ok(Credentials::Token(_)) => "token",
        Ok(Credentials::Basic { .. }) => "username/password",
        Err(_) => "not configured",
    };

    json!({
        "path": config.path.display().to_string(),
        "auth": auth,
        "username": config.username,
        "apiUrl": config.api_url,
    })
}

impl Verb for ShowArgs {
    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let config = &c.ctx.config;
        if config.credentials().is_err() {
            c.printer()
                .warning("No credentials configured, run `ionosctl config login`");
        }
        c.printer().print(&describe(config), &SETTINGS)
    }
}

impl Verb for PathArgs {
    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        c.printer()
            .write_raw(&format!("{}\n", c.ctx.config.path.display()))
    }
}

impl Verb for LoginArgs {
    fn pre_run(&self, c: &CommandConfig<'_>) -> Result<()> {
        c.check_required_flags_sets(&[&["token"], &["user", "password"]])
    }

    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let current = &c.ctx.config;
        let mut file = ConfigFile::read(&current.path)?;

        if let Some(ref token) = self.token {
            file.token = Some(token.clone());
            file.username = None;
            file.password = None;
        } else {
            file.token = None;
            file.username = self.user.clone();
            file.password = self.password.clone();
        }

        if !self.skip_verify {
            let candidate = Config {
                username: file.username.clone(),
                password: file.password.clone(),
                token: file.token.clone(),
                ..current.clone()
            };
            Clients::new(candidate)
                .get(Product::Compute, None)?
                .get("/")
                .await
                .context("verifying credentials")?;
        }

        file.write(&current.path)?;
        c.printer().success(&format!(
            "Credentials saved to {}",
            current.path.display()
        ));
        Ok(())
    }
}

impl Verb for LocationArgs {
    async fn run(&self, c: &CommandConfig<'_>) -> Result<()> {
        let locations = match &self.location {
            Some(input) => {
                let loc = location::normalize(input)?;
                if !loc.is_known() {
                    c.printer()
                        .warning(&format!("{} is not a known location", loc));
                }
                vec![loc]
            }
            None => location::known(),
        };

        let items: Vec<Value> = locations
            .iter()
            .map(|loc| {
                json!({
                    "location": loc.to_string(),
                    "region": loc.region(),
                    "country": loc.country,
                    "code": loc.code,
                })
            })
            .collect();
        c.printer().print(&json!({ "items": items }), &LOCATIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_describe_reports_auth_kind() {
        let config = Config {
            token: Some("t".into()),
            path: PathBuf::from("/tmp/config.json"),
            ..Config::default()
        };
        let shown = describe(&config);
        assert_eq!(shown["auth"], "token");
        assert_eq!(shown["path"], "/tmp/config.json");
        assert!(shown["username"].is_null());

        assert_eq!(describe(&Config::default())["auth"], "not configured");
    }
}
