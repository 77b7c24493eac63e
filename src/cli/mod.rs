//! Command-line parsing.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! pipeline and the HTTP layer. Every option can also be supplied through the
//! environment (or a `.env` file).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::ServerConfig;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "placement-forecast",
    version,
    about = "Per-department placement forecasting service (ARIMA)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP server (the default when no subcommand is given).
    Serve(ServeArgs),
    /// Run one forecast without the server and print the JSON body.
    Forecast(ForecastArgs),
}

/// Options shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct ServeArgs {
    /// Interface to bind.
    #[arg(long, env = "PF_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind.
    #[arg(long, env = "PF_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Placement CSV with `Year`, `Department`, `Placed_Students` columns.
    #[arg(long, env = "PF_DATA_FILE", default_value = "./campus_placement_by_department.csv")]
    pub data_file: PathBuf,

    /// Directory for forecast CSV files.
    #[arg(long, env = "PF_CSV_DIR", default_value = "./forecasted_csv")]
    pub csv_dir: PathBuf,

    /// Directory for plot images.
    #[arg(long, env = "PF_PLOT_DIR", default_value = "./plots")]
    pub plot_dir: PathBuf,

    /// Base URL used in responses (defaults to `http://<host>:<port>`).
    #[arg(long, env = "PF_PUBLIC_URL")]
    pub public_url: Option<String>,
}

/// Options for the offline `forecast` command.
#[derive(Debug, Args, Clone)]
pub struct ForecastArgs {
    /// Department to forecast (exact match against the `Department` column).
    pub department: String,

    #[command(flatten)]
    pub common: ServeArgs,
}

impl ServeArgs {
    pub fn to_config(&self) -> ServerConfig {
        let public_url = self
            .public_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}", self.host, self.port));

        ServerConfig {
            host: self.host.clone(),
            port: self.port,
            data_file: self.data_file.clone(),
            csv_dir: self.csv_dir.clone(),
            plot_dir: self.plot_dir.clone(),
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }
}

/// Rewrite argv so a bare invocation means `serve`.
///
/// Rules:
/// - `placement-forecast`                 -> `placement-forecast serve`
/// - `placement-forecast --port 8080 ...` -> `placement-forecast serve --port 8080 ...`
/// - `--help/--version/-h`                -> unchanged (show top-level help/version)
pub fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("serve".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "serve".to_string());
    }
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_serves() {
        assert_eq!(rewrite_args(argv(&["pf"])), argv(&["pf", "serve"]));
        assert_eq!(
            rewrite_args(argv(&["pf", "--port", "8080"])),
            argv(&["pf", "serve", "--port", "8080"])
        );
        assert_eq!(rewrite_args(argv(&["pf", "--help"])), argv(&["pf", "--help"]));
        assert_eq!(
            rewrite_args(argv(&["pf", "forecast", "Civil Engineering"])),
            argv(&["pf", "forecast", "Civil Engineering"])
        );
    }

    #[test]
    fn public_url_defaults_to_bind_address() {
        let cli = Cli::parse_from(["pf", "serve", "--host", "0.0.0.0", "--port", "8080"]);
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        let config = args.to_config();
        assert_eq!(config.public_url, "http://0.0.0.0:8080");
    }

    #[test]
    fn public_url_trailing_slash_is_trimmed() {
        let cli = Cli::parse_from([
            "pf",
            "forecast",
            "Computer Science",
            "--public-url",
            "https://example.org/",
        ]);
        let Command::Forecast(args) = cli.command else {
            panic!("expected forecast");
        };
        assert_eq!(args.department, "Computer Science");
        assert_eq!(args.common.to_config().public_url, "https://example.org");
    }
}
