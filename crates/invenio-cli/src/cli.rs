//! Argument parsing, process-wide setup, and command dispatch.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use invenio_app::{Application, bind_addr};
use invenio_telemetry::{
    DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, WarningAction, configure_warnings, init_logging,
};
use serde_json::Value;
use tracing::info;

use crate::commands::assets::{handle_assets_build, handle_assets_list};
use crate::commands::config::{handle_config_get, handle_config_show};
use crate::commands::instance::{handle_commands, handle_instance};
use crate::context::{AppOptions, CliError, CliResult, parse_override};
use crate::output::OutputFormat;

const BUILD_SHA: &str = match option_env!("INVENIO_BUILD_SHA") {
    Some(sha) => sha,
    None => "dev",
};

/// Parses CLI arguments, configures warnings and logging, builds the
/// application, and executes the requested command. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    match execute(cli).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn execute(cli: Cli) -> CliResult<()> {
    let warnings = configure_warnings(cli.warnings);
    init_logging(&LoggingConfig {
        level: DEFAULT_LOG_LEVEL,
        format: cli.log_format.unwrap_or_else(LogFormat::infer),
        build_sha: BUILD_SHA,
    })
    .map_err(CliError::failure)?;
    info!(
        command = command_label(&cli.command),
        warnings = warnings.as_str(),
        "invenio starting"
    );

    let app = cli.options().build()?;
    dispatch(&app, cli.command).await
}

async fn dispatch(app: &Application, command: Command) -> CliResult<()> {
    let text = match command {
        Command::Run(args) => {
            let addr = match args.bind {
                Some(addr) => addr,
                None => bind_addr(app.config())?,
            };
            return app.serve(addr).await.map_err(CliError::failure);
        }
        Command::Config(ConfigCommand::Show(args)) => {
            let format = if args.json {
                OutputFormat::Json
            } else {
                args.output
            };
            handle_config_show(app, format)?
        }
        Command::Config(ConfigCommand::Get(args)) => handle_config_get(app, &args.key)?,
        Command::Instance => handle_instance(app),
        Command::Commands => handle_commands(app)?,
        Command::Assets(AssetsCommand::List) => handle_assets_list(app)?,
        Command::Assets(AssetsCommand::Build) => handle_assets_build(app)?,
    };
    print!("{text}");
    Ok(())
}

#[derive(Parser)]
#[command(name = "invenio", about = "Build, inspect, and serve an Invenio instance")]
pub(crate) struct Cli {
    #[arg(long, global = true, help = "Instance folder (default: <prefix>/var/invenio-instance)")]
    instance_path: Option<PathBuf>,
    #[arg(long, global = true, help = "Static folder (default: <instance>/static)")]
    static_folder: Option<PathBuf>,
    #[arg(long, global = true, help = "URL prefix static files are served under")]
    static_url_path: Option<String>,
    #[arg(
        long = "set",
        global = true,
        value_name = "KEY=VALUE",
        value_parser = parse_override,
        help = "Explicit setting; beats every other configuration source"
    )]
    overrides: Vec<(String, Value)>,
    #[arg(
        long,
        global = true,
        env = "INVENIO_WARNINGS",
        value_parser = parse_warning_action,
        help = "Deprecation warning handling: default, always, ignore, error"
    )]
    warnings: Option<WarningAction>,
    #[arg(long, global = true, value_parser = parse_log_format)]
    log_format: Option<LogFormat>,
    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn options(&self) -> AppOptions {
        AppOptions {
            instance_path: self.instance_path.clone(),
            static_folder: self.static_folder.clone(),
            static_url_path: self.static_url_path.clone(),
            overrides: self.overrides.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Serve the application over HTTP
    Run(RunArgs),
    /// Inspect the loaded configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print the resolved instance and static paths
    Instance,
    /// List registered command groups
    Commands,
    /// Inspect and build asset bundles
    #[command(subcommand)]
    Assets(AssetsCommand),
}

#[derive(Args)]
struct RunArgs {
    #[arg(long, help = "Listen address (default: SERVER_BIND)")]
    bind: Option<SocketAddr>,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print every setting with the stage that set it
    Show(ConfigShowArgs),
    /// Print one setting
    Get(ConfigGetArgs),
}

#[derive(Args)]
struct ConfigShowArgs {
    #[arg(long, help = "Shorthand for --output json")]
    json: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[derive(Args)]
struct ConfigGetArgs {
    key: String,
}

#[derive(Subcommand)]
enum AssetsCommand {
    /// List registered bundles
    List,
    /// Concatenate every bundle into the static root
    Build,
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Run(_) => "run",
        Command::Config(ConfigCommand::Show(_)) => "config_show",
        Command::Config(ConfigCommand::Get(_)) => "config_get",
        Command::Instance => "instance",
        Command::Commands => "commands",
        Command::Assets(AssetsCommand::List) => "assets_list",
        Command::Assets(AssetsCommand::Build) => "assets_build",
    }
}

fn parse_warning_action(input: &str) -> Result<WarningAction, String> {
    input
        .parse()
        .map_err(|_| format!("unknown warning action '{input}'"))
}

fn parse_log_format(input: &str) -> Result<LogFormat, String> {
    input
        .parse()
        .map_err(|_| format!("unknown log format '{input}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serde_json::json;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_are_parsed() -> Result<(), clap::Error> {
        let cli = Cli::try_parse_from([
            "invenio",
            "config",
            "show",
            "--instance-path",
            "/srv/site",
            "--set",
            "DEBUG=True",
            "--set",
            "THEME_SITENAME='Zenodo'",
            "--warnings",
            "error",
            "--log-format",
            "json",
        ])?;
        assert_eq!(cli.instance_path, Some(PathBuf::from("/srv/site")));
        assert_eq!(
            cli.overrides,
            vec![
                ("DEBUG".to_string(), json!(true)),
                ("THEME_SITENAME".to_string(), json!("Zenodo")),
            ]
        );
        assert_eq!(cli.warnings, Some(WarningAction::Error));
        assert_eq!(cli.log_format, Some(LogFormat::Json));
        assert_eq!(command_label(&cli.command), "config_show");
        Ok(())
    }

    #[test]
    fn invalid_flags_are_rejected() {
        assert!(Cli::try_parse_from(["invenio", "--set", "lower=1", "instance"]).is_err());
        assert!(Cli::try_parse_from(["invenio", "--warnings", "loud", "instance"]).is_err());
        assert!(Cli::try_parse_from(["invenio", "run", "--bind", "nowhere"]).is_err());
    }

    #[test]
    fn run_accepts_bind_address() -> Result<(), clap::Error> {
        let cli = Cli::try_parse_from(["invenio", "run", "--bind", "0.0.0.0:8000"])?;
        assert!(matches!(
            cli.command,
            Command::Run(RunArgs { bind: Some(addr) }) if addr.port() == 8000
        ));
        Ok(())
    }

    #[test]
    fn options_mirror_global_flags() -> Result<(), clap::Error> {
        let cli = Cli::try_parse_from([
            "invenio",
            "--static-url-path",
            "/assets/",
            "--static-folder",
            "/srv/public",
            "commands",
        ])?;
        let options = cli.options();
        assert_eq!(options.static_url_path.as_deref(), Some("/assets/"));
        assert_eq!(options.static_folder, Some(PathBuf::from("/srv/public")));
        assert!(options.overrides.is_empty());
        Ok(())
    }
}
