use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "todoz", bin_name = "todoz", version = get_version())]
#[command(about = "A small, durable todo list for the command line", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding todos and config (defaults to $TODOZ_HOME, then the OS data dir)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Add a todo
    #[command(alias = "a")]
    Add {
        /// Text of the todo; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// List todos, newest first
    #[command(alias = "ls")]
    List,

    /// Mark a todo done, or not done again
    #[command(aliases = ["t", "done"])]
    Toggle {
        /// Index from `todoz list`, or a todo id (prefix)
        selector: String,
    },

    /// Replace the text of a todo
    #[command(alias = "e")]
    Edit {
        /// Index from `todoz list`, or a todo id (prefix)
        selector: String,

        /// New text; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Delete a todo
    #[command(alias = "rm")]
    Delete {
        /// Index from `todoz list`, or a todo id (prefix)
        selector: String,
    },

    /// Show total, completed and pending counts
    Stats,

    /// Remove all stored todos
    Clear {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (storage-key, max-text-length, quota-bytes)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Print where todos are stored
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("todoz").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn no_command_means_list() {
        assert_eq!(parse(&[]).command, None);
    }

    #[test]
    fn add_collects_words() {
        assert_eq!(
            parse(&["add", "Buy", "milk"]).command,
            Some(Commands::Add {
                text: vec!["Buy".into(), "milk".into()]
            })
        );
    }

    #[test]
    fn aliases_resolve() {
        assert_eq!(parse(&["ls"]).command, Some(Commands::List));
        assert_eq!(
            parse(&["done", "2"]).command,
            Some(Commands::Toggle {
                selector: "2".into()
            })
        );
        assert_eq!(
            parse(&["rm", "1"]).command,
            Some(Commands::Delete {
                selector: "1".into()
            })
        );
    }

    #[test]
    fn edit_takes_selector_and_text() {
        assert_eq!(
            parse(&["edit", "1", "Buy", "oat", "milk"]).command,
            Some(Commands::Edit {
                selector: "1".into(),
                text: vec!["Buy".into(), "oat".into(), "milk".into()]
            })
        );
    }

    #[test]
    fn add_requires_text() {
        assert!(Cli::try_parse_from(["todoz", "add"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["list", "--data-dir", "/tmp/x", "-v"]);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
        assert!(cli.verbose);
    }
}
