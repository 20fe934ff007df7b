//! Output formatting module

use pesv_app::app::{CatalogImport, SizingOutcome, SizingReport};
use pesv_domain::model::{
    Company, CompanySize, DriverAnswer, FleetAnswer, SizeCriterion,
};
use pesv_domain::service::{Classification, RecordError, SizingTotals};
use pesv_types::{OutputFormat, Result};
use serde::Serialize;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    println!("{}", content);
    Ok(())
}

pub fn output_report(output_format: OutputFormat, report: &SizingReport) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(report);
    }

    println!("\nSizing Result");
    println!("=============");
    println!("Company:         {}", report.company_id);
    println!("Total vehicles:  {}", report.totals.vehicles);
    println!("Total drivers:   {}", report.totals.drivers);
    match &report.outcome {
        SizingOutcome::Sized(c) => {
            println!("Size:            {} (criterion {})", c.size_id, c.criterion_id);
        }
        SizingOutcome::Failed(err) => {
            println!("Size:            not resolved ({})", err);
        }
    }
    println!(
        "Current size:    {}",
        report
            .size_id
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!("Diagnosis step:  {}", report.diagnosis_step);
    println!(
        "Saved answers:   {} vehicle, {} driver",
        report.vehicles_saved, report.drivers_saved
    );

    print_record_errors("Vehicle", &report.vehicle_errors);
    print_record_errors("Driver", &report.driver_errors);
    Ok(())
}

fn print_record_errors(kind: &str, errors: &[RecordError]) {
    if errors.is_empty() {
        return;
    }
    println!("\n{} records rejected: {}", kind, errors.len());
    for err in errors {
        println!("  - {}", err);
    }
}

pub fn output_companies(output_format: OutputFormat, companies: &[Company]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(companies);
    }

    if companies.is_empty() {
        println!("No companies found.");
        return Ok(());
    }

    println!(
        "{:>6} {:<32} {:<14} {:>8} {:>6} {:<12} {:<8}",
        "ID", "Name", "NIT", "Mission", "Size", "Step", "Deleted"
    );
    println!("{}", "-".repeat(92));
    for c in companies {
        println!(
            "{:>6} {:<32} {:<14} {:>8} {:>6} {:<12} {:<8}",
            c.id,
            truncate(&c.name, 32),
            truncate(&c.nit, 14),
            opt(c.mission_id),
            opt(c.size_id),
            c.diagnosis_step.to_string(),
            if c.is_deleted() { "yes" } else { "" }
        );
    }
    Ok(())
}

pub fn output_company(output_format: OutputFormat, c: &Company) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(c);
    }

    println!("\nCompany {}", c.id);
    println!("==========");
    println!("Name:            {}", c.name);
    println!("NIT:             {}", c.nit);
    println!("Mission:         {}", opt(c.mission_id));
    println!("Segment:         {}", opt(c.segment_id));
    println!("Size:            {}", opt(c.size_id));
    println!("Diagnosis step:  {}", c.diagnosis_step);
    println!("Contact:         {}", text(&c.dependant));
    println!("Position:        {}", text(&c.dependant_position));
    println!("Phone:           {}", text(&c.dependant_phone));
    println!("Email:           {}", text(&c.email));
    println!("Activities:      {}", text(&c.activities_ciiu));
    if c.ciius.is_empty() {
        println!("CIIU codes:      -");
    } else {
        println!("CIIU codes:      {}", c.ciius.join(", "));
    }
    println!("Certification:   {}", text(&c.acquired_certification));
    println!("Diagnosis:       {}", text(&c.diagnosis));
    println!("Created:         {}", c.created_at.format("%Y-%m-%d %H:%M"));
    println!("Updated:         {}", c.updated_at.format("%Y-%m-%d %H:%M"));
    if let Some(deleted) = c.deleted_at {
        println!("Deleted:         {}", deleted.format("%Y-%m-%d %H:%M"));
    }
    Ok(())
}

pub fn output_fleet_answers(output_format: OutputFormat, rows: &[FleetAnswer]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(rows);
    }

    if rows.is_empty() {
        println!("No fleet answers stored.");
        return Ok(());
    }

    println!(
        "{:>8} {:>6} {:>6} {:>8} {:>7} {:>7} {:>7} {:>7} {:>7}",
        "Question", "Owned", "Third", "Arrended", "Contr.", "Interm.", "Leasing", "Renting", "Total"
    );
    println!("{}", "-".repeat(75));
    for row in rows {
        let c = &row.counts;
        println!(
            "{:>8} {:>6} {:>6} {:>8} {:>7} {:>7} {:>7} {:>7} {:>7}",
            row.question_id,
            c.owned,
            c.third_party,
            c.arrended,
            c.contractors,
            c.intermediation,
            c.leasing,
            c.renting,
            c.total()
        );
    }
    Ok(())
}

pub fn output_driver_answers(output_format: OutputFormat, rows: &[DriverAnswer]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(rows);
    }

    if rows.is_empty() {
        println!("No driver answers stored.");
        return Ok(());
    }

    println!("{:>8} {:>8}", "Question", "Quantity");
    println!("{}", "-".repeat(17));
    for row in rows {
        println!("{:>8} {:>8}", row.question_id, row.quantity);
    }
    Ok(())
}

pub fn output_totals(output_format: OutputFormat, totals: &SizingTotals) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(totals);
    }
    println!("Total vehicles:  {}", totals.vehicles);
    println!("Total drivers:   {}", totals.drivers);
    Ok(())
}

pub fn output_classification(
    output_format: OutputFormat,
    classification: &Classification,
    size: &CompanySize,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(&serde_json::json!({
            "classification": classification,
            "size": size,
        }));
    }
    println!("Size:            {} ({})", size.name, size.id);
    println!("Criterion:       {}", classification.criterion_id);
    if !size.description.is_empty() {
        println!("Description:     {}", size.description);
    }
    Ok(())
}

/// (id, name) rows of a reference table
pub fn output_named<T: Serialize>(
    output_format: OutputFormat,
    title: &str,
    rows: &[T],
    fields: impl Fn(&T) -> (String, String),
) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(rows);
    }

    println!("{}", title);
    println!("{}", "=".repeat(title.chars().count()));
    if rows.is_empty() {
        println!("(none)");
        return Ok(());
    }
    for row in rows {
        let (id, name) = fields(row);
        println!("{:>6}  {}", id, name);
    }
    Ok(())
}

pub fn output_criteria(output_format: OutputFormat, criteria: &[SizeCriterion]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(criteria);
    }

    if criteria.is_empty() {
        println!("No criteria configured.");
        return Ok(());
    }

    println!("{:>6} {:>6} {:<16} {:<16}", "ID", "Size", "Vehicles", "Drivers");
    println!("{}", "-".repeat(47));
    for c in criteria {
        println!(
            "{:>6} {:>6} {:<16} {:<16}",
            c.id,
            c.size_id,
            c.vehicles.to_string(),
            c.drivers.to_string()
        );
    }
    Ok(())
}

pub fn output_import(output_format: OutputFormat, import: &CatalogImport) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(import);
    }

    println!("Catalog imported");
    println!("  Missions:           {}", import.missions);
    println!("  Segments:           {}", import.segments);
    println!("  Sizes:              {}", import.sizes);
    println!("  Criteria:           {}", import.criteria);
    println!("  Vehicle questions:  {}", import.vehicle_questions);
    println!("  Driver questions:   {}", import.driver_questions);
    println!("  CIIU codes:         {}", import.ciius);
    if !import.issues.is_empty() {
        println!("\nCriteria issues ({}):", import.issues.len());
        for issue in &import.issues {
            println!("  - {}", issue);
        }
    }
    Ok(())
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}
