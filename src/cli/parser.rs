use crate::export::ExportFormat;
use clap::{Parser, Subcommand, ValueEnum};

/// Command-line interface definition for pointage
/// Attendance reconciliation: punches in, day records and overtime tiers out
#[derive(Parser)]
#[command(
    name = "pointage",
    version = env!("CARGO_PKG_VERSION"),
    about = "Reconcile time-clock punches into daily worked hours and overtime tiers (SQLite)",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which configured column layout an import uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LayoutKind {
    /// Time-clock device CSV
    Device,
    /// Legacy single-sheet spreadsheet, saved as delimited text
    Sheet,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Register or list employees
    Employee {
        /// Register an employee by the id printed on the device (updates the name if known)
        #[arg(long = "add", value_name = "DEVICE_ID", requires = "name")]
        add: Option<String>,

        #[arg(long = "name", help = "Employee name (with --add)")]
        name: Option<String>,

        #[arg(long = "list", help = "List registered employees")]
        list: bool,
    },

    /// Add, delete or list raw punches
    Punch {
        /// Manual punch: EMPLOYEE DATE(YYYY-MM-DD) TIME(HH:MM) in|out
        #[arg(
            long = "add",
            num_args = 4,
            value_names = ["EMPLOYEE", "DATE", "TIME", "DIRECTION"],
            conflicts_with_all = ["del", "list"]
        )]
        add: Option<Vec<String>>,

        #[arg(long = "del", value_name = "PUNCH_ID", help = "Delete a punch by id")]
        del: Option<i64>,

        #[arg(long = "list", value_name = "EMPLOYEE", help = "List punches of an employee")]
        list: Option<String>,

        #[arg(long, short, help = "Period for --list (YYYY, YYYY-MM, YYYY-MM-DD or A:B)")]
        period: Option<String>,
    },

    /// Import punches from a delimited file
    Import {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, value_enum, default_value_t = LayoutKind::Device)]
        layout: LayoutKind,
    },

    /// Show or set the weekly calendar
    Calendar {
        /// Weekend days, e.g. "sat,sun" or "fri"
        #[arg(long = "weekend", value_name = "DAYS")]
        weekend: Option<String>,
    },

    /// Manage public holidays
    Holiday {
        #[arg(long = "add", value_name = "DATE", conflicts_with = "del")]
        add: Option<String>,

        #[arg(long = "premium", default_value_t = 100, help = "Premium percent: 50 or 100")]
        premium: u8,

        #[arg(long = "label", default_value = "")]
        label: String,

        #[arg(long = "del", value_name = "DATE")]
        del: Option<String>,

        #[arg(long = "list", help = "List configured holidays")]
        list: bool,
    },

    /// Recompute day records from punches, replacing stored ones
    Reconcile {
        #[arg(long, short, help = "Period (YYYY, YYYY-MM, YYYY-MM-DD or A:B)")]
        period: String,

        #[arg(long, required_unless_present = "all", conflicts_with = "all")]
        employee: Option<String>,

        #[arg(long, help = "Reconcile every registered employee")]
        all: bool,

        #[arg(long = "ignore-missing-out", help = "Skip days with an IN lacking its OUT instead of using the default OUT")]
        ignore_missing_out: bool,

        #[arg(
            long = "default-out",
            value_name = "HH:MM",
            help = "Cut-off hour for a missing OUT (the OUT lands on minute 59)"
        )]
        default_out: Option<String>,

        #[arg(long = "meal-auto", conflicts_with = "no_meal_auto")]
        meal_auto: bool,

        #[arg(long = "no-meal-auto")]
        no_meal_auto: bool,

        #[arg(long, help = "Parallel workers (defaults to the configured value)")]
        workers: Option<usize>,
    },

    /// List stored day records
    List {
        #[arg(long)]
        employee: String,

        #[arg(long, short)]
        period: String,
    },

    /// Period totals with overtime tiers
    Summary {
        #[arg(long, help = "Employee (all when omitted)")]
        employee: Option<String>,

        #[arg(long, short)]
        period: String,
    },

    /// Export day records or period totals
    Export {
        #[arg(long, value_enum)]
        format: ExportFormat,

        #[arg(long, value_name = "FILE", help = "Absolute path of the output file")]
        file: String,

        #[arg(long, short)]
        period: String,

        #[arg(long)]
        employee: Option<String>,

        #[arg(long, help = "Export period totals instead of day records")]
        totals: bool,

        #[arg(long, help = "Overwrite an existing file without asking")]
        force: bool,
    },
}
