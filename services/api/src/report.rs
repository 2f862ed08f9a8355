use crate::infra::{parse_column_override, parse_mode, read_mapping_file};
use clap::Args;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tuition_scenarios::config::{load_scenario_file, AppConfig};
use tuition_scenarios::error::AppError;
use tuition_scenarios::telemetry;
use tuition_scenarios::workflows::intake::{ColumnMapping, MappedField, ProgramTable};
use tuition_scenarios::workflows::scenario::export::{self, EXPORT_FILE_NAME};
use tuition_scenarios::workflows::scenario::report::views::ProgramImpactView;
use tuition_scenarios::workflows::scenario::{
    AuditRow, CreditMixMode, ScenarioOutcome, TuitionScenarioEngine, DEFAULT_AUDIT_ROWS,
    DEFAULT_TOP_N,
};

#[derive(Args, Debug)]
pub(crate) struct ScenarioRunArgs {
    /// Program table (semicolon separated; other delimiters are detected)
    pub(crate) input: PathBuf,
    /// JSON scenario parameters (defaults to SCENARIO_CONFIG, then built-in values)
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
    /// Credit mix mode: split_cohort or blended
    #[arg(long, value_parser = parse_mode)]
    pub(crate) mode: Option<CreditMixMode>,
    /// JSON column mapping applied over the suggested one
    #[arg(long)]
    pub(crate) mapping: Option<PathBuf>,
    /// Map a single field, e.g. --column enrollment="N° Est" (repeatable)
    #[arg(long = "column", value_parser = parse_column_override)]
    pub(crate) columns: Vec<(MappedField, String)>,
    /// Number of programs listed as top gainers and losers
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub(crate) top: usize,
    /// Rows included in the formula spot check
    #[arg(long, default_value_t = DEFAULT_AUDIT_ROWS)]
    pub(crate) audit: usize,
    /// Write the semicolon export to this path
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Write the export to the default file name in the working directory
    #[arg(long = "export")]
    pub(crate) write_export: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ColumnsArgs {
    /// Program table to inspect
    pub(crate) input: PathBuf,
}

pub(crate) fn run_scenario(args: ScenarioRunArgs) -> Result<(), AppError> {
    let ScenarioRunArgs {
        input,
        config,
        mode,
        mapping,
        columns,
        top,
        audit,
        output,
        write_export,
    } = args;

    let app_config = AppConfig::load()?;
    telemetry::init(&app_config.telemetry)?;

    let mut scenario = match config {
        Some(path) => load_scenario_file(path)?,
        None => app_config.scenario,
    };
    if let Some(mode) = mode {
        scenario.credit_mix_mode = mode;
    }

    let table = ProgramTable::from_path(&input)?;
    let mapping = resolve_mapping(&table, mapping, columns)?;

    let engine = TuitionScenarioEngine::new(scenario)?;
    let outcome = engine.run(&table, &mapping)?;
    let audit_rows = engine.audit(&table, &mapping, &outcome, audit)?;

    render_outcome(&input, &outcome, top);
    render_audit(&audit_rows);

    let output = output.or_else(|| write_export.then(|| PathBuf::from(EXPORT_FILE_NAME)));
    if let Some(path) = output {
        let file = File::create(&path)?;
        export::write_results(&table, &outcome, BufWriter::new(file))?;
        println!("\nExport written to {}", path.display());
    }

    Ok(())
}

pub(crate) fn run_columns(args: ColumnsArgs) -> Result<(), AppError> {
    let table = ProgramTable::from_path(&args.input)?;
    let suggested = table.suggest_mapping();

    println!("Program table {}", args.input.display());
    println!(
        "- {} rows | {} columns | delimiter '{}'",
        table.len(),
        table.headers().len(),
        char::from(table.delimiter())
    );
    println!("Columns:");
    for header in table.headers() {
        println!("  - {header}");
    }
    println!("Suggested mapping:");
    for field in MappedField::ordered() {
        println!(
            "  - {:<22} {}",
            field.key(),
            suggested.get(field).unwrap_or("(unmapped)")
        );
    }
    Ok(())
}

fn resolve_mapping(
    table: &ProgramTable,
    mapping_file: Option<PathBuf>,
    columns: Vec<(MappedField, String)>,
) -> Result<ColumnMapping, AppError> {
    let mut mapping = table.suggest_mapping();
    if let Some(path) = mapping_file {
        mapping = mapping.merge(read_mapping_file(&path)?);
    }
    for (field, column) in columns {
        mapping.set(field, column);
    }
    Ok(mapping)
}

fn render_outcome(input: &std::path::Path, outcome: &ScenarioOutcome, top: usize) {
    let totals = outcome.totals();

    println!("Tuition scenario for {}", input.display());
    println!(
        "- {} programs | {} students | credit mix {}",
        totals.programs,
        format_amount(totals.enrollment),
        outcome.mode().label()
    );
    println!("- Current revenue   {}", format_amount(totals.current_revenue));
    println!("- Scenario revenue  {}", format_amount(totals.new_revenue));
    println!(
        "- Delta             {} ({})",
        format_amount(totals.delta),
        format_ratio(totals.delta_ratio)
    );

    println!("\nBy level:");
    for level in outcome.level_summary() {
        println!(
            "  - {:<15} {:>3} programs | {} -> {} | {} ({})",
            level.level_label,
            level.programs,
            format_amount(level.rec_actual),
            format_amount(level.rec_nuevo),
            format_amount(level.delta),
            format_ratio(level.delta_ratio)
        );
    }

    println!("\nBy level label in the source table:");
    for label in outcome.label_summary() {
        println!(
            "  - {:<25} {:>3} programs | {} ({})",
            label.label,
            label.programs,
            format_amount(label.delta),
            format_ratio(label.delta_ratio)
        );
    }

    render_ranking("Top gainers", &outcome.top_gainers(top));
    render_ranking("Top losers", &outcome.top_losers(top));

    let diagnostics = outcome.diagnostics();
    if !diagnostics.is_clean() {
        println!("\nInput warnings:");
        for (field, count) in &diagnostics.unparsed_cells {
            println!("  - {count} unreadable '{field}' cells treated as 0");
        }
        for label in &diagnostics.unrecognized_levels {
            println!("  - level '{label}' not recognized, priced as Master");
        }
        for label in &diagnostics.unrecognized_modalities {
            println!("  - modality '{label}' not recognized, default multiplier applied");
        }
        if diagnostics.clamped_enrollments > 0 {
            println!(
                "  - {} negative enrollments treated as 0",
                diagnostics.clamped_enrollments
            );
        }
    }
}

fn render_ranking(title: &str, programs: &[ProgramImpactView]) {
    if programs.is_empty() {
        return;
    }
    println!("\n{title}:");
    for program in programs {
        println!(
            "  - {} [{}]: {} ({})",
            program.program,
            program.level_label,
            format_amount(program.revenue_delta),
            format_ratio(program.revenue_delta_ratio)
        );
    }
}

fn render_audit(rows: &[AuditRow]) {
    if rows.is_empty() {
        return;
    }
    println!("\nSpot check (enrollment x tuition from raw cells):");
    for row in rows {
        let flag = if row.consistent { "ok" } else { "MISMATCH" };
        println!(
            "  - {} | N={} | tuition {} | current {} | new {} | {flag}",
            row.program,
            row.enrollment_cell,
            row.current_tuition_cell,
            format_amount(row.calc_current_revenue),
            format_amount(row.calc_new_revenue)
        );
    }
}

/// Rounds to whole units and groups thousands with dots.
fn format_amount(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn format_ratio(ratio: f64) -> String {
    format!("{:+.1}%", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_group_thousands() {
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(999.4), "999");
        assert_eq!(format_amount(7_200_000.0), "7.200.000");
        assert_eq!(format_amount(-63_000_000.0), "-63.000.000");
    }

    #[test]
    fn ratios_render_as_signed_percentages() {
        assert_eq!(format_ratio(7.0), "+700.0%");
        assert_eq!(format_ratio(-0.125), "-12.5%");
    }
}
