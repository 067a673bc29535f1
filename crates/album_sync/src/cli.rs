//! Command-line surface of `album_sync`.

use std::path::PathBuf;

use album_core::{ProcessingOrder, SyncMode};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

use crate::logging::LogDestination;

#[derive(Parser, Debug)]
#[command(name = "album_sync", version, about = "Incremental mirror of article albums")]
pub struct Cli {
    /// Collection table (JSON object of name -> {id, output_directory, account?, url?})
    #[arg(global = true, short, long, default_value = "collections.json")]
    pub config: PathBuf,

    /// Log debug detail
    #[arg(global = true, short, long, default_value_t = false)]
    pub verbose: bool,

    /// Also write the log to ./album_sync.log
    #[arg(global = true, long, default_value_t = false)]
    pub log_file: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sync one configured collection, or `all` of them.
    Sync(SyncArgs),
    /// Store a single article page outside any collection.
    Import(ImportArgs),
    /// Print the configured collection names.
    List,
}

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Collection name, or `all`
    pub target: String,

    /// Only report whether the local copy is current
    #[arg(long, conflicts_with_all = ["skip_existing", "force"])]
    pub check_only: bool,

    /// List without the freshness check and fetch only missing articles
    #[arg(long, conflicts_with = "force")]
    pub skip_existing: bool,

    /// Rewrite every article
    #[arg(long)]
    pub force: bool,

    /// Process the oldest articles first
    #[arg(long)]
    pub oldest_first: bool,
}

impl SyncArgs {
    pub fn mode(&self) -> SyncMode {
        if self.check_only {
            SyncMode::CheckOnly
        } else if self.skip_existing {
            SyncMode::SkipExisting
        } else if self.force {
            SyncMode::Force
        } else {
            SyncMode::Auto
        }
    }

    pub fn order(&self) -> ProcessingOrder {
        if self.oldest_first {
            ProcessingOrder::OldestFirst
        } else {
            ProcessingOrder::NewestFirst
        }
    }

    pub fn is_all(&self) -> bool {
        self.target.eq_ignore_ascii_case("all")
    }
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Article page URL
    pub url: String,

    /// Output directory
    #[arg(short, long)]
    pub dir: PathBuf,

    /// Title to use instead of the page's own
    #[arg(short, long)]
    pub title: Option<String>,

    /// Publish date (YYYY-MM-DD) to use instead of the page's own
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    pub fn log_destination(&self) -> LogDestination {
        if self.log_file {
            LogDestination::Both
        } else {
            LogDestination::Terminal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_defaults_to_auto_newest_first() {
        let cli = Cli::parse_from(["album_sync", "sync", "Demo"]);
        let Command::Sync(args) = &cli.command else {
            panic!("expected sync");
        };
        assert_eq!(args.mode(), SyncMode::Auto);
        assert_eq!(args.order(), ProcessingOrder::NewestFirst);
        assert!(!args.is_all());
        assert_eq!(cli.config, PathBuf::from("collections.json"));
        assert_eq!(cli.log_level(), LevelFilter::Info);
    }

    #[test]
    fn sync_flags_select_mode_and_order() {
        let cli = Cli::parse_from([
            "album_sync",
            "--verbose",
            "sync",
            "all",
            "--skip-existing",
            "--oldest-first",
        ]);
        assert_eq!(cli.log_level(), LevelFilter::Debug);
        let Command::Sync(args) = &cli.command else {
            panic!("expected sync");
        };
        assert_eq!(args.mode(), SyncMode::SkipExisting);
        assert_eq!(args.order(), ProcessingOrder::OldestFirst);
        assert!(args.is_all());
    }

    #[test]
    fn global_flags_are_read_after_the_subcommand() {
        let cli = Cli::parse_from(["album_sync", "list", "--log-file", "--config", "c.json"]);
        assert!(matches!(cli.command, Command::List));
        assert_eq!(cli.log_destination(), LogDestination::Both);
        assert_eq!(cli.config, PathBuf::from("c.json"));
        assert_eq!(cli.log_level(), LevelFilter::Info);
    }

    #[test]
    fn conflicting_modes_are_rejected() {
        let result = Cli::try_parse_from(["album_sync", "sync", "Demo", "--force", "--check-only"]);
        assert!(result.is_err());
    }

    #[test]
    fn import_parses_overrides() {
        let cli = Cli::parse_from([
            "album_sync",
            "import",
            "https://mp.weixin.qq.com/s/abc",
            "--dir",
            "out/single",
            "--title",
            "Chosen",
            "--date",
            "2025-01-05",
        ]);
        let Command::Import(args) = &cli.command else {
            panic!("expected import");
        };
        assert_eq!(args.dir, PathBuf::from("out/single"));
        assert_eq!(args.title.as_deref(), Some("Chosen"));
        assert_eq!(args.date, NaiveDate::from_ymd_opt(2025, 1, 5));
    }
}
