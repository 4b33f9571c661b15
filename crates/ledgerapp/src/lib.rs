//! # Ledger Architecture
//!
//! Ledger is a **UI-agnostic personal finance library**. A CLI ships with it,
//! but nothing in this crate knows about terminals, argument parsing or exit
//! codes.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Client (the `ledger` binary, or any other UI)              │
//! │  - Parses input, renders results, owns stdout/stderr        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Form validation, search, summaries, import/export flow   │
//! │  - Returns structured CmdResult values                      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Store (store/)                                             │
//! │  - LedgerStore: in-memory authority with subscribers        │
//! │  - Persistence over a StorageBackend (files or memory)      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pure building blocks ([`validation`], [`search`], [`stats`]) have no
//! state and can be used without a store.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`store`]: The reactive store, persistence and backends
//! - [`model`]: Records, settings and their partial updates
//! - [`validation`]: Field rules for the record form
//! - [`search`]: Regex filtering, highlighting and sorting
//! - [`stats`]: Totals, top category, seven-day trend, budget
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod search;
pub mod stats;
pub mod store;
pub mod validation;
