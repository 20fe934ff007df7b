//! CLI definition using clap

use clap::{Args, Parser, Subcommand};
use pesv_types::{CompanyId, MissionId, OutputFormat, SegmentId};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pesv")]
#[command(version)]
#[command(about = "PESV company sizing from fleet and driver questionnaires")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Store directory override. Uses config value if not specified.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Submit questionnaire answers and size the company
    Submit {
        /// JSON answer payload ({"company", "vehicleData", "driverData"})
        file: PathBuf,

        /// Company id (overrides the payload's company)
        #[arg(long, short = 'c')]
        company: Option<CompanyId>,
    },

    /// Classify counts against a mission's criteria without saving anything
    Classify {
        #[arg(long, short = 'm')]
        mission: MissionId,

        /// Total vehicles
        #[arg(long)]
        vehicles: u64,

        /// Total drivers
        #[arg(long)]
        drivers: u64,
    },

    /// Manage companies
    Company {
        #[command(subcommand)]
        action: CompanyCommand,
    },

    /// Show stored answers of a company
    Answers {
        #[command(subcommand)]
        action: AnswersCommand,
    },

    /// Manage reference catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogCommand,
    },

    /// Show or modify configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

/// Optional descriptive fields shared by create and update
#[derive(Args, Debug, Clone, Default)]
pub struct CompanyFields {
    #[arg(long)]
    pub mission: Option<MissionId>,

    #[arg(long)]
    pub segment: Option<SegmentId>,

    /// Contact person
    #[arg(long)]
    pub dependant: Option<String>,

    #[arg(long)]
    pub dependant_position: Option<String>,

    #[arg(long)]
    pub dependant_phone: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    /// CIIU economic activities, free text
    #[arg(long)]
    pub activities_ciiu: Option<String>,

    /// CIIU codes from the catalog, comma separated (replaces the list on update)
    #[arg(long = "ciiu", value_delimiter = ',')]
    pub ciius: Option<Vec<String>>,

    #[arg(long)]
    pub acquired_certification: Option<String>,
}

#[derive(Subcommand)]
pub enum CompanyCommand {
    /// Register a company
    Create {
        name: String,

        /// Tax identification number
        nit: String,

        #[command(flatten)]
        fields: CompanyFields,
    },

    /// List companies
    List {
        /// Include soft-deleted companies
        #[arg(long)]
        include_deleted: bool,
    },

    /// Show one company
    Show { id: CompanyId },

    /// Update fields of a company (blank text clears a field)
    Update {
        id: CompanyId,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        nit: Option<String>,

        #[arg(long)]
        diagnosis: Option<String>,

        #[command(flatten)]
        fields: CompanyFields,
    },

    /// Soft-delete a company
    Delete { id: CompanyId },
}

#[derive(Subcommand)]
pub enum AnswersCommand {
    /// Fleet answers of a company
    Fleets { company: CompanyId },

    /// Driver answers of a company
    Drivers { company: CompanyId },

    /// Totals over a company's stored answers
    Totals { company: CompanyId },
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// Replace the catalog from a TOML file
    Import { file: PathBuf },

    Missions,

    Segments,

    /// Size categories
    Sizes,

    /// Size criteria of a mission
    Criteria { mission: MissionId },

    VehicleQuestions,

    DriverQuestions,

    /// CIIU activity codes
    Ciiu {
        /// Only codes containing this fragment
        #[arg(long)]
        code: Option<String>,
    },

    /// Check size criteria for overlaps and dangling references
    Check,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Set a configuration key (data_dir, output_format, log_json)
    Set { key: String, value: String },

    /// Reset configuration to defaults
    Reset,
}
