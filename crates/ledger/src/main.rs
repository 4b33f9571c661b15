//! # Ledger CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, while this
//! file only invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/ledgerapp/`: UI-agnostic library (store, validation, search, stats)
//! - `crates/ledger/`: this CLI, depending on `ledgerapp`
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/ledger/src/cli/)                         │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context setup + dispatch (commands.rs)                   │
//! │  - Terminal rendering (render.rs, styles.rs)                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/ledgerapp/src/api.rs)                    │
//! │  - Dispatches to command modules                            │
//! │  - Returns structured `CmdResult` values                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Testing Approach
//!
//! - **Library**: unit tests next to each module, filesystem tests in
//!   `crates/ledgerapp/tests/`.
//! - **CLI**: argument parsing and rendering are unit tested in `src/cli/`;
//!   `tests/cli_e2e.rs` runs the binary against a temporary data directory.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
