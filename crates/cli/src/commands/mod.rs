//! CLI command definitions and execution
//!
//! Every request command shares the global connection flags. Settings are
//! resolved in this order: command-line flag, environment variable, then the
//! selected profile in the config file.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rgw_core::{ClientConfig, ConfigFile, Result, Verb};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

mod completions;
mod request;

/// Profile used when `--profile` is not given
pub const DEFAULT_PROFILE: &str = "default";

/// rgw-admin - RADOS Gateway admin API client
///
/// Sends signed requests to the Ceph RADOS Gateway admin API and prints the
/// JSON response.
#[derive(Parser, Debug)]
#[command(name = "rgw-admin")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file with connection profiles
    #[arg(long, global = true, env = "RGW_ADMIN_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Profile to read from the config file
    #[arg(long, global = true, env = "RGW_PROFILE")]
    pub profile: Option<String>,

    /// Admin API base URL, e.g. http://rgw.local:8080/admin
    #[arg(long, global = true, env = "RGW_API_URL")]
    pub api_url: Option<String>,

    /// Access key of the admin user
    #[arg(long, global = true, env = "RGW_API_KEY")]
    pub api_key: Option<String>,

    /// Secret key of the admin user
    #[arg(long, global = true, env = "RGW_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Accept invalid TLS certificates
    #[arg(long, global = true, default_value = "false")]
    pub insecure: bool,

    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a GET request, e.g. `get user -p uid=johndoe`
    Get(request::RequestArgs),

    /// Send a POST request
    Post(request::RequestArgs),

    /// Send a PUT request, e.g. `put user -p uid=johndoe -p display-name=John`
    Put(request::RequestArgs),

    /// Send a DELETE request
    Delete(request::RequestArgs),

    /// Generate shell completion scripts
    Completions(completions::CompletionsArgs),
}

impl Cli {
    /// Connection settings from flags and environment, completed from the
    /// config file profile
    ///
    /// A profile named explicitly must exist. The default profile is optional.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let from_flags = ClientConfig {
            api_url: self.api_url.clone(),
            api_key: self.api_key.clone(),
            secret_key: self.secret_key.clone(),
        };

        let path = match &self.config {
            Some(path) => path.clone(),
            None => match ConfigFile::default_path() {
                Ok(path) => path,
                Err(_) if self.profile.is_none() => return Ok(from_flags),
                Err(e) => return Err(e),
            },
        };
        let file = ConfigFile::load(&path)?;

        let from_profile = match &self.profile {
            Some(name) => file.profile(name)?,
            None => file.profile(DEFAULT_PROFILE).unwrap_or_default(),
        };

        Ok(from_flags.or(from_profile))
    }

    fn output_config(&self) -> OutputConfig {
        OutputConfig {
            json: self.json,
            no_color: self.no_color,
            quiet: self.quiet,
        }
    }
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let formatter = Formatter::new(cli.output_config());

    match &cli.command {
        Commands::Get(args) => request::execute(&cli, Verb::Get, args, &formatter).await,
        Commands::Post(args) => request::execute(&cli, Verb::Post, args, &formatter).await,
        Commands::Put(args) => request::execute(&cli, Verb::Put, args, &formatter).await,
        Commands::Delete(args) => request::execute(&cli, Verb::Delete, args, &formatter).await,
        Commands::Completions(args) => completions::execute(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const PROFILES: &str = r#"
[profiles.default]
apiUrl = "http://default.local/admin"
apiKey = "default-key"
secretKey = "default-secret"

[profiles.staging]
apiUrl = "http://staging.local/admin"
apiKey = "staging-key"
"#;

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::parse_from([
            "rgw-admin",
            "--json",
            "--quiet",
            "--api-url",
            "http://rgw.local/admin",
            "get",
            "user",
        ]);
        assert!(cli.json);
        assert!(cli.quiet);
        assert!(!cli.debug);
        assert_eq!(cli.api_url.as_deref(), Some("http://rgw.local/admin"));
        assert!(matches!(cli.command, Commands::Get(_)));
    }

    #[test]
    fn test_parse_global_flag_after_subcommand() {
        let cli = Cli::parse_from(["rgw-admin", "delete", "bucket", "--debug", "--no-color"]);
        assert!(cli.debug);
        assert!(cli.no_color);
        assert!(matches!(cli.command, Commands::Delete(_)));
    }

    #[test]
    fn test_flags_override_profile() {
        let file = config_file(PROFILES);
        let cli = Cli::parse_from([
            "rgw-admin",
            "--config",
            file.path().to_str().unwrap(),
            "--api-key",
            "flag-key",
            "get",
            "info",
        ]);

        let config = cli.client_config().unwrap();
        assert_eq!(config.api_url.as_deref(), Some("http://default.local/admin"));
        assert_eq!(config.api_key.as_deref(), Some("flag-key"));
        assert_eq!(config.secret_key.as_deref(), Some("default-secret"));
    }

    #[test]
    fn test_named_profile_may_be_incomplete() {
        let file = config_file(PROFILES);
        let cli = Cli::parse_from([
            "rgw-admin",
            "--config",
            file.path().to_str().unwrap(),
            "--profile",
            "staging",
            "get",
            "info",
        ]);

        let config = cli.client_config().unwrap();
        assert_eq!(config.api_url.as_deref(), Some("http://staging.local/admin"));
        assert_eq!(config.missing_options(), vec!["secretKey"]);
    }

    #[test]
    fn test_unknown_profile_is_error() {
        let file = config_file(PROFILES);
        let cli = Cli::parse_from([
            "rgw-admin",
            "--config",
            file.path().to_str().unwrap(),
            "--profile",
            "prod",
            "get",
            "info",
        ]);

        let err = cli.client_config().unwrap_err();
        assert_eq!(ExitCode::from_error(&err), ExitCode::UsageError);
    }

    #[test]
    fn test_missing_config_file_uses_flags_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let cli = Cli::parse_from([
            "rgw-admin",
            "--config",
            path.to_str().unwrap(),
            "--api-url",
            "http://rgw.local/admin",
            "get",
            "info",
        ]);

        let config = cli.client_config().unwrap();
        assert_eq!(config.api_url.as_deref(), Some("http://rgw.local/admin"));
        assert_eq!(config.missing_options(), vec!["apiKey", "secretKey"]);
    }
}
