//! Command handlers

use crate::cli::{
    AnswersCommand, CatalogCommand, Cli, Commands, CompanyCommand, CompanyFields, ConfigCommand,
};
use crate::output::{
    output_classification, output_companies, output_company, output_criteria,
    output_driver_answers, output_fleet_answers, output_import, output_named, output_report,
    output_totals,
};
use pesv_app::app::{
    self, query_service, AnswerSubmission, CompanyServiceError, QueryServiceError, SizingError,
};
use pesv_app::config::Config;
use pesv_app::repository::open_store;
use pesv_domain::model::{CompanyDraft, CompanyPatch};
use pesv_domain::service::{generate_criteria_report, SizingTotals};
use pesv_infra::answer_payload::load_payload_from_file;
use pesv_infra::persistence::JsonStore;
use pesv_types::{CompanyId, Error, MissionId, OutputFormat, Result};
use std::path::PathBuf;

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(ref dir) = cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    let output_format = cli.format.unwrap_or(config.output_format);

    match &cli.command {
        Commands::Submit { file, company } => {
            cmd_submit(&config, file.clone(), *company, output_format)
        }

        Commands::Classify {
            mission,
            vehicles,
            drivers,
        } => cmd_classify(&config, *mission, *vehicles, *drivers, output_format),

        Commands::Company { action } => cmd_company(&config, action, output_format),

        Commands::Answers { action } => cmd_answers(&config, action, output_format),

        Commands::Catalog { action } => cmd_catalog(&config, action, output_format),

        Commands::Config { action } => cmd_config(config, action),
    }
}

fn cmd_submit(
    config: &Config,
    file: PathBuf,
    company: Option<CompanyId>,
    output_format: OutputFormat,
) -> Result<()> {
    let payload = load_payload_from_file(&file)?;
    let submission = AnswerSubmission::from_payload(payload, company)?;

    let store = open_store(config)?;
    let report = app::submit_answers(&store, &submission).map_err(sizing_error)?;
    output_report(output_format, &report)
}

fn cmd_classify(
    config: &Config,
    mission: MissionId,
    vehicles: u64,
    drivers: u64,
    output_format: OutputFormat,
) -> Result<()> {
    let store = open_store(config)?;
    let totals = SizingTotals { vehicles, drivers };
    let (classification, size) =
        query_service::classify_counts(&store, mission, totals).map_err(query_error)?;
    output_classification(output_format, &classification, &size)
}

fn cmd_company(
    config: &Config,
    action: &CompanyCommand,
    output_format: OutputFormat,
) -> Result<()> {
    let store = open_store(config)?;

    match action {
        CompanyCommand::Create { name, nit, fields } => {
            let draft = company_draft(name, nit, fields.clone());
            let company = app::create_company(&store, draft).map_err(company_error)?;
            output_company(output_format, &company)
        }
        CompanyCommand::List { include_deleted } => {
            let companies =
                app::list_companies(&store, *include_deleted).map_err(company_error)?;
            output_companies(output_format, &companies)
        }
        CompanyCommand::Show { id } => {
            let company = app::get_company(&store, *id).map_err(company_error)?;
            output_company(output_format, &company)
        }
        CompanyCommand::Update {
            id,
            name,
            nit,
            diagnosis,
            fields,
        } => {
            let fields = fields.clone();
            let patch = CompanyPatch {
                name: name.clone(),
                nit: nit.clone(),
                segment_id: fields.segment,
                mission_id: fields.mission,
                dependant: fields.dependant,
                dependant_position: fields.dependant_position,
                dependant_phone: fields.dependant_phone,
                email: fields.email,
                activities_ciiu: fields.activities_ciiu,
                ciius: fields.ciius,
                acquired_certification: fields.acquired_certification,
                diagnosis: diagnosis.clone(),
            };
            let company = app::update_company(&store, *id, patch).map_err(company_error)?;
            output_company(output_format, &company)
        }
        CompanyCommand::Delete { id } => {
            let company = app::delete_company(&store, *id).map_err(company_error)?;
            println!("Company {} ({}) deleted", company.id, company.name);
            Ok(())
        }
    }
}

fn company_draft(name: &str, nit: &str, fields: CompanyFields) -> CompanyDraft {
    CompanyDraft {
        name: name.to_string(),
        nit: nit.to_string(),
        segment_id: fields.segment,
        mission_id: fields.mission,
        dependant: fields.dependant,
        dependant_position: fields.dependant_position,
        dependant_phone: fields.dependant_phone,
        email: fields.email,
        activities_ciiu: fields.activities_ciiu,
        ciius: fields.ciius.unwrap_or_default(),
        acquired_certification: fields.acquired_certification,
    }
}

fn cmd_answers(
    config: &Config,
    action: &AnswersCommand,
    output_format: OutputFormat,
) -> Result<()> {
    let store = open_store(config)?;

    match action {
        AnswersCommand::Fleets { company } => {
            let rows = query_service::fleet_answers(&store, *company).map_err(query_error)?;
            output_fleet_answers(output_format, &rows)
        }
        AnswersCommand::Drivers { company } => {
            let rows = query_service::driver_answers(&store, *company).map_err(query_error)?;
            output_driver_answers(output_format, &rows)
        }
        AnswersCommand::Totals { company } => {
            let totals = query_service::company_totals(&store, *company).map_err(query_error)?;
            output_totals(output_format, &totals)
        }
    }
}

fn cmd_catalog(
    config: &Config,
    action: &CatalogCommand,
    output_format: OutputFormat,
) -> Result<()> {
    let store: JsonStore = open_store(config)?;

    match action {
        CatalogCommand::Import { file } => {
            let import = app::import_catalog(&store, file)?;
            output_import(output_format, &import)
        }
        CatalogCommand::Missions => {
            let rows = query_service::list_missions(&store).map_err(query_error)?;
            output_named(output_format, "Missions", &rows, |m| {
                (m.id.to_string(), m.name.clone())
            })
        }
        CatalogCommand::Segments => {
            let rows = query_service::list_segments(&store).map_err(query_error)?;
            output_named(output_format, "Segments", &rows, |s| {
                (s.id.to_string(), s.name.clone())
            })
        }
        CatalogCommand::Sizes => {
            let rows = query_service::list_sizes(&store).map_err(query_error)?;
            output_named(output_format, "Company Sizes", &rows, |s| {
                let label = if s.description.is_empty() {
                    s.name.clone()
                } else {
                    format!("{} - {}", s.name, s.description)
                };
                (s.id.to_string(), label)
            })
        }
        CatalogCommand::Criteria { mission } => {
            let rows =
                query_service::criteria_for_mission(&store, *mission).map_err(query_error)?;
            output_criteria(output_format, &rows)
        }
        CatalogCommand::VehicleQuestions => {
            let rows = query_service::list_vehicle_questions(&store).map_err(query_error)?;
            output_named(output_format, "Vehicle Questions", &rows, |q| {
                (q.id.to_string(), q.name.clone())
            })
        }
        CatalogCommand::DriverQuestions => {
            let rows = query_service::list_driver_questions(&store).map_err(query_error)?;
            output_named(output_format, "Driver Questions", &rows, |q| {
                (q.id.to_string(), q.name.clone())
            })
        }
        CatalogCommand::Ciiu { code } => {
            let rows = query_service::find_ciius(&store, code.as_deref()).map_err(query_error)?;
            output_named(output_format, "CIIU Codes", &rows, |c| (c.code.clone(), c.name.clone()))
        }
        CatalogCommand::Check => {
            let (catalog, issues) = app::check_catalog(&store)?;
            if output_format == OutputFormat::Json {
                crate::output::print_json(&issues)?;
            } else {
                print!("{}", generate_criteria_report(&catalog, &issues));
            }
            if issues.is_empty() {
                Ok(())
            } else {
                Err(Error::Rejected(format!("{} size criteria issue(s) found", issues.len())))
            }
        }
    }
}

fn cmd_config(mut config: Config, action: &ConfigCommand) -> Result<()> {
    match action {
        ConfigCommand::Show => {
            println!("{}", config);
            Ok(())
        }
        ConfigCommand::Set { key, value } => {
            // Persist the file values, not the CLI overrides
            config = Config::load()?;
            config.set(key, value)?;
            config.save()?;
            println!("Configuration updated");
            Ok(())
        }
        ConfigCommand::Reset => {
            Config::default().save()?;
            println!("Configuration reset to defaults");
            Ok(())
        }
    }
}

fn sizing_error(e: SizingError) -> Error {
    match e {
        SizingError::Store(e) => e,
        SizingError::CompanyNotFound(id) => Error::NotFound(format!("company {}", id)),
        other => Error::Rejected(other.to_string()),
    }
}

fn company_error(e: CompanyServiceError) -> Error {
    match e {
        CompanyServiceError::Store(e) => e,
        CompanyServiceError::CompanyNotFound(id) => Error::NotFound(format!("company {}", id)),
        other => Error::Rejected(other.to_string()),
    }
}

fn query_error(e: QueryServiceError) -> Error {
    match e {
        QueryServiceError::Store(e) => e,
        QueryServiceError::NotFound(what) => Error::NotFound(what),
        QueryServiceError::Classification(err) => Error::Rejected(err.to_string()),
    }
}
