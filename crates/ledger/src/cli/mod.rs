//! # CLI Behavior
//!
//! This is **one possible UI client** for the ledger, not the application
//! itself. It is the only place that knows about terminal I/O, exit codes and
//! output formatting. For the overall architecture see the `ledgerapp` crate docs.
//!
//! ## Conventions
//!
//! - Running `ledger` with no subcommand lists transactions.
//! - Records are addressed by id (`txn_…`), shown in the last column of `ledger list`.
//! - `--json` switches any command to machine-readable output.
//! - Rejected input (a failed field rule, an invalid regex) is printed as
//!   `Error: …` on stderr with exit status 1; nothing is changed.
//! - `ledger clear` asks for `--yes` since it cannot be undone.
//!
//! ## Module Structure
//!
//! - `setup`: Argument parsing via clap
//! - `commands`: Context setup, dispatch to the API, output selection
//! - `render`: Tables, summaries and messages as text
//! - `styles`: Terminal styles

mod commands;
mod render;
pub mod setup;
mod styles;

pub use commands::run;
