use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for campusledger
#[derive(Parser)]
#[command(
    name = "campusledger",
    version = env!("CARGO_PKG_VERSION"),
    about = "Campus attendance ledger: clock students in and out and track daily time on campus",
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

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view, check or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Add missing fields to the configuration file")]
        check: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Editor to use with --edit")]
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

    /// Manage registered students
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Record a clock-in or clock-out
    Clock {
        /// Student code
        student: String,

        /// Event kind: in | out (also clockin, clock_in, clockout, clock_out)
        kind: String,

        #[arg(
            long = "at",
            help = "Event time (RFC 3339, or YYYY-MM-DD HH:MM[:SS] in UTC); default: now"
        )]
        at: Option<String>,

        #[arg(long, allow_negative_numbers = true, help = "Latitude in degrees")]
        lat: Option<f64>,

        #[arg(long, allow_negative_numbers = true, help = "Longitude in degrees")]
        lng: Option<f64>,

        #[arg(long, help = "GPS accuracy in meters")]
        accuracy: Option<f64>,

        #[arg(long, help = "Print the outcome as JSON")]
        json: bool,
    },

    /// Show whether a student is currently clocked in
    Status {
        /// Student code
        student: String,
    },

    /// List daily totals (or clock events) for a student
    List {
        /// Student code
        student: String,

        #[arg(long, short, help = "Filter by year/month/day or a custom range")]
        period: Option<String>,

        #[arg(long = "events", help = "List clock events instead of daily totals")]
        events: bool,
    },

    /// Export daily totals (or clock events) for a student
    Export {
        /// Student code
        student: String,

        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(
            long,
            short,
            value_name = "PERIOD",
            help = "Filter export by year/month/day or a custom range"
        )]
        period: Option<String>,

        #[arg(long, short = 'e')]
        events: bool,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Share, list or clear student locations
    Location {
        #[command(subcommand)]
        action: LocationAction,
    },

    /// Daily totals of every student, by day then student code
    Report {
        #[arg(long, short, help = "Filter by year/month/day or a custom range")]
        period: Option<String>,

        #[arg(long, value_enum, default_value = "csv", help = "Format used with --file")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE", help = "Write the report to FILE instead of printing it")]
        file: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Register a student
    Add {
        /// Unique student code
        code: String,

        #[arg(long)]
        email: String,

        #[arg(long = "first")]
        first_name: String,

        #[arg(long = "last")]
        last_name: String,
    },

    /// List registered students
    List,
}

#[derive(Subcommand)]
pub enum LocationAction {
    /// Record a student's current position
    Share {
        /// Student code
        student: String,

        #[arg(long, allow_negative_numbers = true, help = "Latitude in degrees")]
        lat: f64,

        #[arg(long, allow_negative_numbers = true, help = "Longitude in degrees")]
        lng: f64,

        #[arg(long, help = "GPS accuracy in meters")]
        accuracy: Option<f64>,

        #[arg(long, help = "Free-text note (room, class...)")]
        notes: Option<String>,

        #[arg(long = "at", help = "Time of the fix; default: now")]
        at: Option<String>,
    },

    /// Show a student's recent positions, newest first
    List {
        /// Student code
        student: String,

        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Delete a student's location history (or everyone's with --all)
    Clear {
        /// Student code
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        student: Option<String>,

        #[arg(long)]
        all: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "campusledger", "clock", "S1", "in", "--lat", "-33.86", "--lng", "-151.2",
        ])
        .unwrap();
        match cli.command {
            Commands::Clock { lat, lng, .. } => {
                assert_eq!(lat, Some(-33.86));
                assert_eq!(lng, Some(-151.2));
            }
            _ => panic!("expected clock"),
        }
    }

    #[test]
    fn location_clear_needs_a_student_or_all() {
        assert!(Cli::try_parse_from(["campusledger", "location", "clear"]).is_err());
        assert!(Cli::try_parse_from(["campusledger", "location", "clear", "S1", "--all"]).is_err());

        let cli = Cli::try_parse_from(["campusledger", "location", "clear", "--all"]).unwrap();
        match cli.command {
            Commands::Location {
                action: LocationAction::Clear { student, all },
            } => {
                assert!(student.is_none());
                assert!(all);
            }
            _ => panic!("expected location clear"),
        }
    }

    #[test]
    fn global_db_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["campusledger", "status", "S1", "--db", "/tmp/x.sqlite"])
            .unwrap();
        assert_eq!(cli.db.as_deref(), Some("/tmp/x.sqlite"));
    }
}
