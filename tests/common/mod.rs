//! Shared helpers for command integration tests.
//!
//! Commands run in-process against a `wiremock` server: the config points
//! `api_url` at the mock, stdout/stderr are captured and stdin is scripted.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use wiremock::MockServer;

use ionosctl::cli::{self, Invocation};
use ionosctl::config::Config;
use ionosctl::core::Context;
use ionosctl::output::Printer;

/// Clonable in-memory writer
#[derive(Clone, Default)]
pub struct Buffer(Arc<Mutex<Vec<u8>>>);

impl Buffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Outcome of one command
pub struct Outcome {
    pub result: anyhow::Result<()>,
    pub stdout: String,
    pub stderr: String,
}

impl Outcome {
    pub fn error(&self) -> String {
        match &self.result {
            Ok(()) => panic!("command succeeded, stdout:\n{}", self.stdout),
            Err(e) => format!("{:#}", e),
        }
    }

    pub fn lines(&self) -> Vec<&str> {
        self.stdout.lines().collect()
    }
}

/// Token-authenticated config pointing every product at `api_url`
pub fn config_for(api_url: &str) -> Config {
    Config {
        token: Some("test-token".into()),
        api_url: Some(api_url.to_string()),
        path: PathBuf::from("/nonexistent/ionosctl/config.json"),
        ..Config::default()
    }
}

/// Run `ionosctl <args>` with the given config and stdin
pub async fn run_with(config: Config, args: &[&str], stdin: &str) -> Outcome {
    let argv = std::iter::once("ionosctl").chain(args.iter().copied());
    let invocation = Invocation::try_parse_from(argv).expect("valid command line");

    let out = Buffer::default();
    let err = Buffer::default();
    let printer = Printer::with_writers(
        invocation.cli.global.print_options(),
        Box::new(out.clone()),
        Box::new(err.clone()),
    );
    let ctx = Context::new(config, printer)
        .with_stdin(Box::new(Cursor::new(stdin.as_bytes().to_vec())))
        .with_poll_interval(Duration::from_millis(10));

    let result = cli::run(invocation, &ctx).await;
    Outcome {
        result,
        stdout: out.contents(),
        stderr: err.contents(),
    }
}

/// Run against a mock server, answering prompts with `stdin`
pub async fn run(server: &MockServer, args: &[&str], stdin: &str) -> Outcome {
    run_with(config_for(&server.uri()), args, stdin).await
}

pub fn list_of(items: Vec<Value>) -> Value {
    json!({ "items": items })
}

pub fn distribution(id: &str, domain: &str, state: &str) -> Value {
    json!({
        "id": id,
        "type": "distribution",
        "properties": {
            "domain": domain,
            "certificateId": "cert-1",
            "routingRules": [{
                "scheme": "https",
                "prefix": "/",
                "upstream": {
                    "host": "origin.example.com",
                    "caching": true,
                    "waf": false,
                    "rateLimitClass": "R100"
                }
            }]
        },
        "metadata": {
            "state": state,
            "publicEndpointIpv4": "192.0.2.1",
            "publicEndpointIpv6": "2001:db8::1"
        }
    })
}

/// IONOS error envelope
pub fn api_error(status: u16, code: &str, message: &str) -> Value {
    json!({
        "httpStatus": status,
        "messages": [{"errorCode": code, "message": message}]
    })
}
