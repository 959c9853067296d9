//! # CLI Layer
//!
//! This module is **one possible UI client** for todoz. It is not the
//! application itself: every state change goes through [`TodoManager`].
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Resolves where data lives on disk
//! - Turns a manager error into a non-zero exit
//!
//! ## Flow
//!
//! 1. `run()` parses arguments and installs the log subscriber
//! 2. `init_context()` resolves the data directory and loads `config.json`
//! 3. `handle_*()` opens a [`TodoManager`] over an [`FsBackend`] and sends one intent
//! 4. If the manager reports an error afterwards, it is returned so `main`
//!    prints it and exits with status 1
//!
//! Selectors (`todoz toggle 2`) are resolved against the same newest-first
//! order `todoz list` prints.

use super::print::{print_info, print_success, print_warning, render_list, render_stats};
use super::setup::{Cli, Commands};
use clap::Parser;
use directories::ProjectDirs;
use std::path::PathBuf;
use todoz::config::TodozConfig;
use todoz::error::{Result, TodozError};
use todoz::logging::init_logging;
use todoz::manager::{Mutation, TodoManager};
use todoz::model::TodoPatch;
use todoz::storage::TodoStorage;
use todoz::store::fs_backend::FsBackend;
use todoz::view::{TodoStats, resolve_selector};
use tracing::debug;

pub const HOME_ENV: &str = "TODOZ_HOME";

struct AppContext {
    data_dir: PathBuf,
    config: TodozConfig,
}

impl AppContext {
    fn backend(&self) -> FsBackend {
        let backend = FsBackend::new(&self.data_dir);
        match self.config.quota_bytes {
            Some(quota) => backend.with_quota(quota),
            None => backend,
        }
    }

    fn open_manager(&self) -> TodoManager<FsBackend> {
        TodoManager::with_options(
            self.backend(),
            self.config.storage_key.as_str(),
            self.config.constraints(),
        )
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut ctx = init_context(&cli)?;
    debug!(data_dir = %ctx.data_dir.display(), "context ready");

    match cli.command {
        Some(Commands::Add { text }) => handle_add(&ctx, text.join(" ")),
        Some(Commands::List) | None => handle_list(&ctx),
        Some(Commands::Toggle { selector }) => handle_toggle(&ctx, &selector),
        Some(Commands::Edit { selector, text }) => handle_edit(&ctx, &selector, text.join(" ")),
        Some(Commands::Delete { selector }) => handle_delete(&ctx, &selector),
        Some(Commands::Stats) => handle_stats(&ctx),
        Some(Commands::Clear { yes }) => handle_clear(&ctx, yes),
        Some(Commands::Config { key, value }) => handle_config(&mut ctx, key, value),
        Some(Commands::Path) => handle_path(&ctx),
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = resolve_data_dir(cli.data_dir.clone())?;
    let config = TodozConfig::load(&data_dir)?;
    Ok(AppContext { data_dir, config })
}

/// `--data-dir`, then `$TODOZ_HOME`, then the platform data directory.
fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "todoz", "todoz")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            TodozError::Config(format!(
                "Could not determine a data directory; pass --data-dir or set {}",
                HOME_ENV
            ))
        })
}

/// Surfaces the manager's error, if any, as the command's failure.
fn finish(manager: &TodoManager<FsBackend>) -> Result<()> {
    match manager.error() {
        Some(message) => Err(TodozError::Api(message.to_string())),
        None => Ok(()),
    }
}

fn handle_add(ctx: &AppContext, text: String) -> Result<()> {
    let constraints = ctx.config.constraints();
    if !constraints.accepts(&text) {
        return Err(TodozError::Api(format!(
            "Todo text must be between {} and {} characters",
            constraints.min_text_length, constraints.max_text_length
        )));
    }

    let mut manager = ctx.open_manager();
    finish(&manager)?;
    if manager.add_todo(&text) == Mutation::Committed {
        print_success(&format!("Added: {}", text.trim()));
    }
    finish(&manager)
}

fn handle_list(ctx: &AppContext) -> Result<()> {
    let manager = ctx.open_manager();
    print!("{}", render_list(manager.todos()));
    if !manager.todos().is_empty() {
        println!();
        print!("{}", render_stats(&TodoStats::from_todos(manager.todos())));
    }
    finish(&manager)
}

fn handle_toggle(ctx: &AppContext, selector: &str) -> Result<()> {
    let mut manager = ctx.open_manager();
    finish(&manager)?;
    let id = resolve_selector(manager.todos(), selector)?;

    if manager.toggle_todo(&id) == Mutation::Committed
        && let Some(todo) = manager.find(&id)
    {
        if todo.completed {
            print_success(&format!("Completed: {}", todo.text));
        } else {
            print_success(&format!("Reopened: {}", todo.text));
        }
    }
    finish(&manager)
}

fn handle_edit(ctx: &AppContext, selector: &str, text: String) -> Result<()> {
    let constraints = ctx.config.constraints();
    if !constraints.accepts(&text) {
        return Err(TodozError::Api(format!(
            "Todo text must be between {} and {} characters",
            constraints.min_text_length, constraints.max_text_length
        )));
    }
    let text = text.trim().to_string();

    let mut manager = ctx.open_manager();
    finish(&manager)?;
    let id = resolve_selector(manager.todos(), selector)?;

    if manager.find(&id).is_some_and(|todo| todo.text == text) {
        print_info("Nothing to change.");
        return Ok(());
    }

    if manager.update_todo(&id, &TodoPatch::text(text.as_str())) == Mutation::Committed {
        print_success(&format!("Updated: {}", text));
    }
    finish(&manager)
}

fn handle_delete(ctx: &AppContext, selector: &str) -> Result<()> {
    let mut manager = ctx.open_manager();
    finish(&manager)?;
    let id = resolve_selector(manager.todos(), selector)?;
    let text = manager
        .find(&id)
        .map(|todo| todo.text.clone())
        .unwrap_or_default();

    if manager.delete_todo(&id) == Mutation::Committed {
        print_success(&format!("Deleted: {}", text));
    }
    finish(&manager)
}

fn handle_stats(ctx: &AppContext) -> Result<()> {
    let manager = ctx.open_manager();
    print!("{}", render_stats(&TodoStats::from_todos(manager.todos())));
    finish(&manager)
}

fn handle_clear(ctx: &AppContext, yes: bool) -> Result<()> {
    if !yes {
        print_warning("This removes every stored todo. Run again with --yes to confirm.");
        return Ok(());
    }

    let backend = ctx.backend();
    TodoStorage::new(&backend).clear_todos_at(&ctx.config.storage_key);
    print_success("All todos removed.");
    Ok(())
}

fn handle_config(ctx: &mut AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    match (key, value) {
        (None, _) => {
            for key in TodozConfig::KEYS {
                println!("{} = {}", key, ctx.config.get(key)?);
            }
        }
        (Some(key), None) => println!("{} = {}", key, ctx.config.get(&key)?),
        (Some(key), Some(value)) => {
            ctx.config.set(&key, &value)?;
            ctx.config.save(&ctx.data_dir)?;
            print_success(&format!("{} set to {}", key, ctx.config.get(&key)?));
        }
    }
    Ok(())
}

fn handle_path(ctx: &AppContext) -> Result<()> {
    println!("{}", ctx.data_dir.display());
    println!("{}", ctx.backend().value_path(&ctx.config.storage_key).display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wins_over_environment() {
        let dir = resolve_data_dir(Some(PathBuf::from("/tmp/todoz-flag"))).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/todoz-flag"));
    }

    #[test]
    fn quota_from_config_reaches_the_backend() {
        let temp = tempfile::tempdir().unwrap();
        let mut config = TodozConfig::default();
        config.set("quota-bytes", "8").unwrap();
        let ctx = AppContext {
            data_dir: temp.path().to_path_buf(),
            config,
        };

        let mut manager = ctx.open_manager();
        assert_eq!(manager.add_todo("far too long for eight bytes"), Mutation::RolledBack);
        assert!(finish(&manager).is_err());
        assert!(manager.todos().is_empty());
    }
}
