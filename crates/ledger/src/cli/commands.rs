//! # CLI Layer
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: Convert shell arguments into typed commands via clap
//! 2. **Context Setup**: Load configuration, set up logging, open the ledger
//! 3. **Dispatch**: Route each command to the API facade
//! 4. **Output Formatting**: Render the `CmdResult` as text or JSON
//! 5. **Error Handling**: Rejected input becomes an `Err`, so `main` prints
//!    `Error: ...` and exits with status 1

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use ledgerapp::api::{self, LedgerApi, RecordEdit, SettingsUpdate};
use ledgerapp::commands::{CmdResult, ListOptions, MessageLevel};
use ledgerapp::config::LedgerConfig;
use ledgerapp::store::StorageBackend;
use ledgerapp::validation::RecordForm;
use tracing_subscriber::EnvFilter;

use super::render;
use super::setup::{Cli, Commands, SortArg};

/// Which payload of a [`CmdResult`] a command produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Affected,
    Listed,
    Summary,
    Budget,
    Settings,
    Exported,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = LedgerConfig::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    let mut api = api::open(config)?;

    // Naked `ledger` lists transactions.
    let command = cli.command.unwrap_or(Commands::List {
        pattern: None,
        case_sensitive: false,
        sort: SortArg::Date,
        asc: false,
    });

    let (result, view) = dispatch(&mut api, command)?;
    tracing::debug!(?view, messages = result.messages.len(), "command finished");
    print!("{}", render_result(&result, view, cli.json)?);

    if let Some(error) = result
        .messages
        .iter()
        .find(|m| m.level == MessageLevel::Error)
    {
        bail!("{}", error.content);
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose > 1)
        .try_init();
}

fn dispatch<B: StorageBackend>(
    api: &mut LedgerApi<B>,
    command: Commands,
) -> Result<(CmdResult, View)> {
    let dispatched = match command {
        Commands::Add {
            description,
            amount,
            category,
            date,
        } => {
            let form = RecordForm {
                description,
                amount,
                category,
                date: date.unwrap_or_else(today),
            };
            (api.add_record(&form)?, View::Affected)
        }
        Commands::Edit {
            id,
            description,
            amount,
            category,
            date,
        } => {
            let edit = RecordEdit {
                description,
                amount,
                category,
                date,
            };
            (api.edit_record(&id, &edit)?, View::Affected)
        }
        Commands::Rm { ids } => (api.delete_records(&ids)?, View::Affected),
        Commands::List {
            pattern,
            case_sensitive,
            sort,
            asc,
        } => {
            let options = ListOptions {
                pattern,
                case_sensitive,
                sort: sort.key(asc),
            };
            (api.list(&options)?, View::Listed)
        }
        Commands::Summary => (api.summary()?, View::Summary),
        Commands::Budget { amount: None } => (api.budget()?, View::Budget),
        Commands::Budget {
            amount: Some(amount),
        } => (api.set_budget(&amount)?, View::Budget),
        Commands::Settings {
            currency,
            eur,
            gbp,
            theme,
        } => {
            let update = SettingsUpdate {
                base_currency: currency,
                eur_rate: eur,
                gbp_rate: gbp,
                theme,
            };
            let result = if update == SettingsUpdate::default() {
                api.settings()?
            } else {
                api.update_settings(&update)?
            };
            (result, View::Settings)
        }
        Commands::Export { output } => (api.export(output.as_deref())?, View::Exported),
        Commands::Import { file } => {
            let result = api
                .import_file(&file)
                .with_context(|| format!("could not import {}", file.display()))?;
            (result, View::Affected)
        }
        Commands::Clear { yes } => {
            if !yes {
                return Err(anyhow!(
                    "this deletes every transaction; run `ledger clear --yes` to confirm"
                ));
            }
            (api.clear()?, View::Affected)
        }
    };
    Ok(dispatched)
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Renders everything except error messages, which `run` turns into the
/// process error.
fn render_result(result: &CmdResult, view: View, json: bool) -> Result<String> {
    if view == View::Exported {
        if let Some(text) = &result.exported {
            return Ok(format!("{}\n", text));
        }
    }

    if json {
        let value = match view {
            View::Affected => serde_json::to_value(&result.affected_records)?,
            View::Listed => serde_json::to_value(&result.listed_records)?,
            View::Summary => serde_json::to_value(&result.summary)?,
            View::Budget => serde_json::to_value(&result.budget)?,
            View::Settings => serde_json::to_value(&result.settings)?,
            View::Exported => serde_json::to_value(&result.messages)?,
        };
        return Ok(format!("{}\n", serde_json::to_string_pretty(&value)?));
    }

    let mut out = String::new();
    match view {
        View::Affected => out.push_str(&render::render_affected(&result.affected_records)),
        View::Listed => out.push_str(&render::render_records(&result.listed_records)),
        View::Summary => {
            if let Some(summary) = &result.summary {
                out.push_str(&render::render_summary(summary));
            }
        }
        View::Budget => {
            if let Some(budget) = &result.budget {
                out.push_str(&render::render_budget(budget));
            }
        }
        View::Settings => {
            if let Some(settings) = &result.settings {
                out.push_str(&render::render_settings(settings));
            }
        }
        View::Exported => {}
    }

    let shown: Vec<_> = result
        .messages
        .iter()
        .filter(|m| m.level != MessageLevel::Error)
        .cloned()
        .collect();
    out.push_str(&render::render_messages(&shown));
    Ok(out)
}
