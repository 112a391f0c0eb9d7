//! Clap derive structures for the `ticketdesk` CLI.
//!
//! Defines the command tree, global flags and shared argument groups.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// ticketdesk -- manage events, students and registrations
#[derive(Debug, Parser)]
#[command(
    name = "ticketdesk",
    version,
    about = "Event ticketing administration from the command line",
    long_about = "Browse and administer events, categories, cities, students,\n\
        registrations and reminders on a ticketdesk backend.\n\n\
        Sign in once with `ticketdesk login`; the session is remembered\n\
        until `ticketdesk logout`.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "TICKETDESK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile)
    #[arg(long, short = 'b', env = "TICKETDESK_BACKEND", global = true)]
    pub backend: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "TICKETDESK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "TICKETDESK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in (admin accounts first, then student accounts)
    Login(LoginArgs),

    /// Forget the stored session
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Create an admin account
    Register(RegisterArgs),

    /// Set a new password for an account
    ResetPassword(ResetPasswordArgs),

    /// View or edit your profile
    Profile(ProfileArgs),

    /// Show the screens available to the signed-in role
    Menu,

    /// Manage event categories
    #[command(alias = "cat")]
    Categories(CategoriesArgs),

    /// Manage cities
    Cities(CitiesArgs),

    /// Manage and browse events
    #[command(alias = "ev")]
    Events(EventsArgs),

    /// Manage students
    #[command(alias = "students")]
    Customers(CustomersArgs),

    /// View registrations and send reminders
    #[command(alias = "reg")]
    Registrations(RegistrationsArgs),

    /// View and record sent reminders
    Reminders(RemindersArgs),

    /// Events recommended for you (students)
    #[command(alias = "recs")]
    Recommendations,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

/// Search and paging shared by every list command.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Case-insensitive search text
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Page to show, starting at 1
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Rows per page (defaults to the profile's page size)
    #[arg(long, short = 'n')]
    pub page_size: Option<usize>,

    /// Show every matching row on one page
    #[arg(long, short = 'a', conflicts_with_all = ["page", "page_size"])]
    pub all: bool,
}

/// A record addressed by its server id.
#[derive(Debug, Args)]
pub struct IdArg {
    /// Record id
    pub id: i64,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ACCOUNT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (prompted when omitted)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Read the password from this variable instead of prompting
    #[arg(long, value_name = "VAR")]
    pub password_env: Option<String>,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    #[arg(long, short = 'e')]
    pub email: String,
}

#[derive(Debug, Args)]
pub struct ResetPasswordArgs {
    /// Account email
    #[arg(long, short = 'e')]
    pub email: String,
}

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show the stored profile
    Show,

    /// Change profile fields (admins)
    Update {
        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        #[arg(long, short = 'e')]
        email: Option<String>,

        /// Prompt for a new password
        #[arg(long)]
        password: bool,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CATEGORIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CategoriesArgs {
    #[command(subcommand)]
    pub command: CategoriesCommand,
}

#[derive(Debug, Subcommand)]
pub enum CategoriesCommand {
    /// List categories
    #[command(alias = "ls")]
    List(ListArgs),

    /// Add a category
    Create {
        #[arg(long)]
        name: String,

        #[arg(long, short = 'd', default_value = "")]
        description: String,
    },

    /// Edit a category
    Update {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long, short = 'd')]
        description: Option<String>,
    },

    /// Delete a category
    #[command(alias = "rm")]
    Delete(IdArg),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CITIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CitiesArgs {
    #[command(subcommand)]
    pub command: CitiesCommand,
}

#[derive(Debug, Subcommand)]
pub enum CitiesCommand {
    /// List cities
    #[command(alias = "ls")]
    List(ListArgs),

    /// Add a city
    Create {
        #[arg(long)]
        city: String,

        #[arg(long)]
        state: String,

        #[arg(long)]
        country: String,
    },

    /// Edit a city
    Update {
        id: i64,

        #[arg(long)]
        city: Option<String>,

        #[arg(long)]
        state: Option<String>,

        #[arg(long)]
        country: Option<String>,
    },

    /// Delete a city
    #[command(alias = "rm")]
    Delete(IdArg),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  EVENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct EventsArgs {
    #[command(subcommand)]
    pub command: EventsCommand,
}

/// Event fields shared by create and update. On update, omitted fields
/// keep their current values.
#[derive(Debug, Args)]
pub struct EventFields {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Local date and time, e.g. 2025-06-01T19:00
    #[arg(long)]
    pub date: Option<String>,

    #[arg(long)]
    pub organizer: Option<String>,

    /// Category id or name
    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub capacity: Option<i64>,

    #[arg(long)]
    pub fee: Option<f64>,

    #[arg(long)]
    pub status: Option<String>,

    #[arg(long)]
    pub contact_email: Option<String>,

    #[arg(long)]
    pub contact_phone: Option<String>,

    #[arg(long)]
    pub result: Option<String>,

    /// Poster image to upload with the event
    #[arg(long, value_name = "FILE")]
    pub image: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum EventsCommand {
    /// List events (admin view)
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one event
    Get(IdArg),

    /// Browse upcoming and past events (student view)
    Browse {
        /// Name search
        #[arg(long, short = 's', default_value = "")]
        search: String,

        /// Category name, or "all"
        #[arg(long, short = 'c', default_value = "all")]
        category: String,
    },

    /// Add an event
    Create(EventFields),

    /// Edit an event
    Update {
        id: i64,

        #[command(flatten)]
        fields: EventFields,
    },

    /// Delete an event
    #[command(alias = "rm")]
    Delete(IdArg),

    /// Register yourself for an event (students)
    Register(IdArg),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CUSTOMERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CustomersArgs {
    #[command(subcommand)]
    pub command: CustomersCommand,
}

#[derive(Debug, Args)]
pub struct CustomerFields {
    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long, short = 'e')]
    pub email: Option<String>,

    #[arg(long)]
    pub gender: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub state: Option<String>,

    #[arg(long)]
    pub country: Option<String>,

    /// Prompt for a password
    #[arg(long)]
    pub password: bool,
}

#[derive(Debug, Subcommand)]
pub enum CustomersCommand {
    /// List students
    #[command(alias = "ls")]
    List(ListArgs),

    /// Add a student
    Create(CustomerFields),

    /// Edit a student
    Update {
        id: i64,

        #[command(flatten)]
        fields: CustomerFields,
    },

    /// Delete a student
    #[command(alias = "rm")]
    Delete(IdArg),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  REGISTRATIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RegistrationsArgs {
    #[command(subcommand)]
    pub command: RegistrationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RegistrationsCommand {
    /// List registrations (students see only their own)
    #[command(alias = "ls")]
    List(ListArgs),

    /// Register a student for an event
    Create {
        #[arg(long)]
        customer: i64,

        #[arg(long)]
        event: i64,
    },

    /// Move a registration to another student or event
    Update {
        id: i64,

        #[arg(long)]
        customer: Option<i64>,

        #[arg(long)]
        event: Option<i64>,
    },

    /// Delete a registration
    #[command(alias = "rm")]
    Delete(IdArg),

    /// Email the registered student a reminder
    Remind(IdArg),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  REMINDERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RemindersArgs {
    #[command(subcommand)]
    pub command: RemindersCommand,
}

#[derive(Debug, Subcommand)]
pub enum RemindersCommand {
    /// List sent reminders
    #[command(alias = "ls")]
    List(ListArgs),

    /// Record a reminder
    Create {
        #[arg(long)]
        customer_name: String,

        #[arg(long)]
        event_name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a value on the active profile (backend, timeout, page_size, ca_cert, insecure)
    Set {
        key: String,

        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        name: String,
    },

    /// Print the config and session file locations
    Path,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
