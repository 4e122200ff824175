//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the tq CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// tq - Parse and resolve taskq query expressions
#[derive(Parser, Debug)]
#[command(name = "tq")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Project catalog file (default: from config, then the data directory)
    #[arg(long, global = true, env = "TQ_CATALOG")]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a query and resolve it into a task filter
    #[command(alias = "q")]
    Query {
        /// Query expression (e.g., "status:pending @backend due:<+7d")
        #[arg(required = true, num_args = 1..)]
        expr: Vec<String>,

        /// Stop after parsing; do not resolve projects or dates
        #[arg(long)]
        parse_only: bool,

        /// Minimum score (0-100) for @~name matches
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        fuzzy_threshold: Option<u8>,
    },

    /// List projects in the catalog
    #[command(alias = "p")]
    Projects {
        /// Rank projects by fuzzy match against this term
        #[arg(short, long)]
        r#match: Option<String>,

        /// Include archived projects
        #[arg(long)]
        archived: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Show config file path
    Path,

    /// Set a configuration value
    Set {
        /// Configuration key (catalog.path, query.fuzzy_threshold, output.color)
        key: String,

        /// Configuration value
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_joins_words() {
        let cli = Cli::parse_from(["tq", "query", "status:pending", "fix", "login"]);
        match cli.command {
            Commands::Query {
                expr,
                parse_only,
                fuzzy_threshold,
            } => {
                assert_eq!(expr, vec!["status:pending", "fix", "login"]);
                assert!(!parse_only);
                assert!(fuzzy_threshold.is_none());
            }
            other => panic!("Expected Query command, got {other:?}"),
        }
    }

    #[test]
    fn test_query_flags() {
        let cli = Cli::parse_from([
            "tq",
            "--json",
            "query",
            "--parse-only",
            "--fuzzy-threshold",
            "50",
            "@~api",
        ]);
        assert!(cli.json);
        match cli.command {
            Commands::Query {
                parse_only,
                fuzzy_threshold,
                ..
            } => {
                assert!(parse_only);
                assert_eq!(fuzzy_threshold, Some(50));
            }
            other => panic!("Expected Query command, got {other:?}"),
        }
    }

    #[test]
    fn test_query_negated_clause_is_not_a_flag() {
        let cli = Cli::parse_from(["tq", "query", "--", "-tag:wontfix"]);
        match cli.command {
            Commands::Query { expr, .. } => assert_eq!(expr, vec!["-tag:wontfix"]),
            other => panic!("Expected Query command, got {other:?}"),
        }
    }

    #[test]
    fn test_query_requires_expression() {
        assert!(Cli::try_parse_from(["tq", "query"]).is_err());
    }

    #[test]
    fn test_fuzzy_threshold_range() {
        assert!(Cli::try_parse_from(["tq", "query", "--fuzzy-threshold", "101", "x"]).is_err());
    }

    #[test]
    fn test_query_alias() {
        let cli = Cli::parse_from(["tq", "q", "tag:bug"]);
        assert!(matches!(cli.command, Commands::Query { .. }));
    }

    #[test]
    fn test_projects_match() {
        let cli = Cli::parse_from(["tq", "projects", "--match", "back", "--archived"]);
        match cli.command {
            Commands::Projects { r#match, archived } => {
                assert_eq!(r#match.as_deref(), Some("back"));
                assert!(archived);
            }
            other => panic!("Expected Projects command, got {other:?}"),
        }
    }

    #[test]
    fn test_config_set() {
        let cli = Cli::parse_from(["tq", "config", "set", "query.fuzzy_threshold", "45"]);
        if let Commands::Config {
            command: Some(ConfigCommands::Set { key, value }),
        } = cli.command
        {
            assert_eq!(key, "query.fuzzy_threshold");
            assert_eq!(value, "45");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn test_global_catalog_flag() {
        let cli = Cli::parse_from(["tq", "projects", "--catalog", "/tmp/projects.json"]);
        assert_eq!(cli.catalog, Some(PathBuf::from("/tmp/projects.json")));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["tq", "-q", "-v", "projects"]).is_err());
    }
}
