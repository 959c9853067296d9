//! # Todoz Architecture
//!
//! Todoz is a **UI-agnostic todo library** with a small command-line client on
//! top. The library owns the todo collection and its persistence; any UI (the
//! bundled CLI, a TUI, a web front end over WASM) only reads snapshots and
//! sends intents.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  State Manager (manager.rs)                                 │
//! │  - Owns the collection and the last error                   │
//! │  - Optimistic update, persist, roll back on failure         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Adapter (storage.rs)                               │
//! │  - Serializes the collection under one key                  │
//! │  - Maps backend failures to fixed user-facing codes         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Key-Value Backends (store/)                                │
//! │  - KeyValueStore trait                                      │
//! │  - FsBackend (production), MemBackend (testing)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `manager.rs` inward, code never writes to stdout/stderr, never exits
//! the process, and never returns an error for a failed mutation: the manager
//! rolls back and exposes a message through [`manager::TodoManager::error`].
//!
//! ## Module Overview
//!
//! - [`manager`]: The state manager, entry point for all operations
//! - [`storage`]: Serialization and failure classification
//! - [`store`]: Backend trait and implementations
//! - [`model`]: `Todo` and `TodoPatch`
//! - [`validation`]: Text rules and shared constants
//! - [`view`]: Sorting, stats and display indexes
//! - [`config`]: Configuration management
//! - [`logging`]: Subscriber setup for hosts
//! - [`error`]: Error types
//! - `cli`: Argument parsing and printing for the binary (not part of the lib API)

pub mod config;
pub mod error;
pub mod logging;
pub mod manager;
pub mod model;
pub mod storage;
pub mod store;
pub mod validation;
pub mod view;
