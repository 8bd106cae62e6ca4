//! Request commands: get, post, put, delete
//!
//! Each command sends one signed request to `<api-url>/<resource>` with the
//! given query parameters and prints the decoded JSON response.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use rgw_core::{AdminClient, ClientConfig, HttpTransport, Verb};
use rgw_http::ReqwestTransport;
use serde_json::Value;
use tracing::debug;

use super::Cli;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Arguments shared by all request commands
#[derive(clap::Args, Debug)]
pub struct RequestArgs {
    /// Admin API resource, e.g. `user`, `bucket`, `usage`
    pub resource: String,

    /// Query parameter as KEY=VALUE (repeatable)
    #[arg(short = 'p', long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    pub params: Vec<(String, String)>,
}

impl RequestArgs {
    fn param_pairs(&self) -> Vec<(&str, &str)> {
        self.params
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect()
    }
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("missing parameter name in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Execute a request command
pub async fn execute(cli: &Cli, verb: Verb, args: &RequestArgs, formatter: &Formatter) -> ExitCode {
    if cli.insecure {
        formatter.warning("TLS certificate verification is disabled");
    }

    match send(cli, verb, args).await {
        Ok(value) => {
            formatter.response(&value);
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("{e:#}"));
            e.downcast_ref::<rgw_core::Error>()
                .map(ExitCode::from_error)
                .unwrap_or(ExitCode::GeneralError)
        }
    }
}

async fn send(cli: &Cli, verb: Verb, args: &RequestArgs) -> anyhow::Result<Value> {
    let config = cli
        .client_config()
        .context("Failed to load configuration")?;
    let client = build_client(cli, config).context("Failed to create admin client")?;

    debug!(%verb, resource = %args.resource, "Sending admin request");
    let params = args.param_pairs();
    let value = client
        .execute(verb, &args.resource, Some(params.as_slice()))
        .await
        .with_context(|| format!("{verb} {} failed", args.resource))?;

    Ok(value)
}

/// Create a client whose reqwest transport is built on first request
fn build_client(cli: &Cli, config: ClientConfig) -> rgw_core::Result<AdminClient> {
    let mut transport = ReqwestTransport::builder().insecure(cli.insecure);
    if let Some(secs) = cli.timeout {
        transport = transport.timeout(Duration::from_secs(secs));
    }

    AdminClient::builder()
        .config(config)
        .transport_factory(move || {
            let transport: Arc<dyn HttpTransport> = Arc::new(transport.clone().build()?);
            Ok(transport)
        })
        .build()
}
