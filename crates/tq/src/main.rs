use clap::Parser;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands, ConfigCommands};
use commands::config::{load_config, ConfigSetOptions};
use commands::projects::ProjectsListOptions;
use commands::query::QueryOptions;
use commands::{CommandContext, CommandError};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                match serde_json::to_string_pretty(&error_json) {
                    Ok(text) => eprintln!("{text}"),
                    Err(_) => eprintln!("Error: {e}"),
                }
            } else {
                eprintln!("Error: {e}");
            }
            error_exit_code(&e)
        }
    }
}

/// Installs the stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` enables debug events and
/// the default shows warnings only.
fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tq={level},taskq_core={level},taskq_query={level}")));

    // Ignore failure: a subscriber may already be installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!cli.no_color)
        .with_target(false)
        .try_init();
}

async fn run(cli: &Cli) -> commands::Result<()> {
    let config = load_config()?;
    let ctx = CommandContext::from_cli(cli, &config);

    match &cli.command {
        Commands::Query {
            expr,
            parse_only,
            fuzzy_threshold,
        } => {
            let opts = QueryOptions {
                expr: expr.join(" "),
                parse_only: *parse_only,
                fuzzy_threshold: *fuzzy_threshold,
            };
            commands::query::execute(&ctx, &config, &opts).await
        }
        Commands::Projects { r#match, archived } => {
            let opts = ProjectsListOptions {
                search: r#match.clone(),
                archived: *archived,
            };
            commands::projects::execute(&ctx, &config, &opts).await
        }
        Commands::Config { command } => match command {
            Some(ConfigCommands::Show) | None => commands::config::execute_show(&ctx),
            Some(ConfigCommands::Path) => commands::config::execute_path(&ctx),
            Some(ConfigCommands::Set { key, value }) => {
                let opts = ConfigSetOptions {
                    key: key.clone(),
                    value: value.clone(),
                };
                commands::config::execute_set(&ctx, &opts)
            }
        },
    }
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Query(q) if q.is_syntax_error() => "QUERY_SYNTAX_ERROR",
        CommandError::Query(_) => "QUERY_RESOLUTION_ERROR",
        CommandError::Catalog(_) => "CATALOG_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the exit status for an error: 2 for query errors, 1 otherwise.
fn error_status(e: &CommandError) -> u8 {
    match e {
        CommandError::Query(_) => 2,
        _ => 1,
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    ExitCode::from(error_status(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskq_query::QueryError;

    #[test]
    fn test_error_codes() {
        let syntax = CommandError::Query(QueryError::missing_value("status"));
        let resolution = CommandError::Query(QueryError::project_not_found("x"));
        let config = CommandError::Config("bad".to_string());

        assert_eq!(error_code(&syntax), "QUERY_SYNTAX_ERROR");
        assert_eq!(error_code(&resolution), "QUERY_RESOLUTION_ERROR");
        assert_eq!(error_code(&config), "CONFIG_ERROR");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            error_status(&CommandError::Query(QueryError::invalid_date("x"))),
            2
        );
        assert_eq!(
            error_status(&CommandError::Query(QueryError::project_not_found("x"))),
            2
        );
        assert_eq!(error_status(&CommandError::Config("bad".to_string())), 1);
    }
}
