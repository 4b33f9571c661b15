use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use ledgerapp::model::Theme;
use ledgerapp::search::{SortDirection, SortField, SortKey};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ledger",
    bin_name = "ledger",
    version,
    disable_help_subcommand = true,
    about = "Personal finance ledger: record, search and budget your spending",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the ledger data (overrides config and LEDGER_DATA_DIR)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Config file to use instead of the default ledger.toml
    #[arg(long, global = true, value_name = "FILE", help_heading = "Options")]
    pub config: Option<PathBuf>,

    /// Print JSON instead of formatted text
    #[arg(long, global = true, help_heading = "Options")]
    pub json: bool,

    /// Verbose logging to stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count, help_heading = "Options")]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a new transaction
    Add {
        /// What the money was spent on
        description: String,

        /// Amount, e.g. 12 or 12.50
        amount: String,

        /// Category (letters, spaces or hyphens)
        #[arg(short, long)]
        category: String,

        /// Date as YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Change fields of an existing transaction
    Edit {
        /// Id of the transaction (see `ledger list`)
        id: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(short, long)]
        amount: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(short, long)]
        date: Option<String>,
    },

    /// Delete transactions by id
    #[command(alias = "delete")]
    Rm {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// List transactions, optionally filtered by a regex
    #[command(alias = "ls")]
    List {
        /// Pattern matched against description and category, or /pattern/flags
        pattern: Option<String>,

        /// Match case exactly (default search ignores case)
        #[arg(short = 's', long)]
        case_sensitive: bool,

        /// Column to sort by
        #[arg(long, value_enum, default_value_t = SortArg::Date)]
        sort: SortArg,

        /// Sort ascending instead of descending
        #[arg(long)]
        asc: bool,
    },

    /// Show totals, top category and the last seven days
    Summary,

    /// Show the monthly budget, or set it
    Budget {
        /// New monthly budget (must be greater than zero)
        amount: Option<String>,
    },

    /// Show or change settings
    Settings {
        /// Base currency code, e.g. USD
        #[arg(long)]
        currency: Option<String>,

        /// EUR exchange rate
        #[arg(long)]
        eur: Option<String>,

        /// GBP exchange rate
        #[arg(long)]
        gbp: Option<String>,

        /// light or dark
        #[arg(long)]
        theme: Option<Theme>,
    },

    /// Export records and settings as JSON
    Export {
        /// Output file (prints to stdout when omitted)
        output: Option<PathBuf>,
    },

    /// Replace all records with the contents of a JSON export
    Import {
        file: PathBuf,
    },

    /// Delete every transaction
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Date,
    Amount,
    Description,
}

impl SortArg {
    pub fn key(self, ascending: bool) -> SortKey {
        let field = match self {
            SortArg::Date => SortField::Date,
            SortArg::Amount => SortField::Amount,
            SortArg::Description => SortField::Description,
        };
        let direction = if ascending {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        };
        SortKey::new(field, direction)
    }
}
