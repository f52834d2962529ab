//! CLI argument parsing for confsync.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Confsync: import staged configuration into the active store.
///
/// Staged objects named `ignore.<name>` exclude themselves and `<name>` from
/// the import, and are hidden from the importer's validation of the staged tree.
#[derive(Parser, Debug)]
#[command(name = "confsync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Project root (defaults to the current directory).
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for confsync.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Import staged configuration into the active store.
    ///
    /// Lists the changes, asks for confirmation, then applies them.
    Import(ImportArgs),

    /// Show pending changes and exclusions without importing.
    Status(StatusArgs),

    /// Import lock management.
    Lock(LockCommand),
}

/// Arguments for the `import` command.
#[derive(Parser, Debug)]
pub struct ImportArgs {
    /// Skip the confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the `status` command.
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Print the pending changes and exclusions as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Lock subcommands.
#[derive(Parser, Debug)]
pub struct LockCommand {
    #[command(subcommand)]
    pub action: LockAction,
}

/// Available lock actions.
#[derive(Subcommand, Debug)]
pub enum LockAction {
    /// Remove a stale import lock.
    ///
    /// A lock that is not stale is only removed with --force.
    Clear(LockClearArgs),
}

/// Arguments for the `lock clear` command.
#[derive(Parser, Debug)]
pub struct LockClearArgs {
    /// Clear the lock even if it is not stale.
    #[arg(long)]
    pub force: bool,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Log level implied by `-v`/`-q`.
    pub fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            return log::LevelFilter::Error;
        }
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_import() {
        let cli = Cli::try_parse_from(["confsync", "import"]).unwrap();
        if let Command::Import(args) = cli.command {
            assert!(!args.yes);
        } else {
            panic!("Expected Import command");
        }
        assert!(cli.root.is_none());
    }

    #[test]
    fn parse_import_yes_with_root() {
        let cli = Cli::try_parse_from(["confsync", "import", "-y", "--root", "/srv/site"]).unwrap();
        assert_eq!(cli.root, Some(PathBuf::from("/srv/site")));
        assert!(matches!(cli.command, Command::Import(ImportArgs { yes: true })));
    }

    #[test]
    fn parse_status_json() {
        let cli = Cli::try_parse_from(["confsync", "status", "--json"]).unwrap();
        assert!(matches!(cli.command, Command::Status(StatusArgs { json: true })));
    }

    #[test]
    fn parse_lock_clear_force() {
        let cli = Cli::try_parse_from(["confsync", "lock", "clear", "--force"]).unwrap();
        if let Command::Lock(lock_cmd) = cli.command {
            let LockAction::Clear(args) = lock_cmd.action;
            assert!(args.force);
        } else {
            panic!("Expected Lock command");
        }
    }

    #[test]
    fn verbosity_maps_to_log_level() {
        let cli = Cli::try_parse_from(["confsync", "-vv", "status"]).unwrap();
        assert_eq!(cli.log_level(), log::LevelFilter::Debug);

        let cli = Cli::try_parse_from(["confsync", "status", "-q"]).unwrap();
        assert_eq!(cli.log_level(), log::LevelFilter::Error);

        let cli = Cli::try_parse_from(["confsync", "status"]).unwrap();
        assert_eq!(cli.log_level(), log::LevelFilter::Warn);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["confsync", "-q", "-v", "status"]).is_err());
    }

    #[test]
    fn parse_no_command_fails() {
        assert!(Cli::try_parse_from(["confsync"]).is_err());
    }
}
