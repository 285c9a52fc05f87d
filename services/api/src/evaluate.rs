use crate::infra::{build_service, parse_date, parse_locale, SessionAuditLog};
use chrono::{Local, NaiveDate};
use clap::Args;
use hla_donor::config::AppConfig;
use hla_donor::donors::{
    evidence, parse_submissions, BatchPolicy, DonorReport, EvaluationSession, Locale,
};
use hla_donor::error::AppError;
use hla_donor::telemetry;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// CSV file with one donor/recipient pair per row
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Report language (es or en); defaults to APP_LOCALE
    #[arg(long, value_parser = parse_locale)]
    pub(crate) locale: Option<Locale>,
    /// Write the patient summary table to this CSV file
    #[arg(long)]
    pub(crate) csv_out: Option<PathBuf>,
    /// Order patients by priority tier instead of input order
    #[arg(long)]
    pub(crate) sort_by_priority: bool,
    /// Append audit lines to this CSV file; defaults to APP_AUDIT_LOG
    #[arg(long)]
    pub(crate) audit_log: Option<PathBuf>,
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Keep evaluating after an invalid row and list the rejected rows
    #[arg(long)]
    pub(crate) collect_partial: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct EvidenceArgs {
    /// Table language (es or en); defaults to APP_LOCALE
    #[arg(long, value_parser = parse_locale)]
    pub(crate) locale: Option<Locale>,
    /// Write the table to this CSV file instead of printing it
    #[arg(long)]
    pub(crate) csv_out: Option<PathBuf>,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        input,
        locale,
        csv_out,
        sort_by_priority,
        audit_log,
        date,
        collect_partial,
    } = args;

    let mut config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    if let Some(locale) = locale {
        config.evaluation.locale = locale;
    }
    if collect_partial {
        config.evaluation.batch_policy = BatchPolicy::CollectPartial;
    }
    if audit_log.is_some() {
        config.evaluation.audit_log_path = audit_log;
    }

    let submissions = parse_submissions(BufReader::new(File::open(&input)?))?;
    info!(input = %input.display(), rows = submissions.len(), "donor submissions loaded");

    let audit = SessionAuditLog::from_settings(&config.evaluation);
    let service = build_service(&config.evaluation, audit);
    let evaluation_date = date.unwrap_or_else(|| Local::now().date_naive());
    let session = service.evaluate_session(submissions, evaluation_date)?;
    let report = session.report(service.presentation());

    let stdout = io::stdout();
    render_summary(&mut stdout.lock(), &session, &report, sort_by_priority)?;

    if let Some(path) = csv_out {
        report.write_csv(BufWriter::new(File::create(&path)?), sort_by_priority)?;
        println!("\nSummary written to {}", path.display());
    }

    Ok(())
}

pub(crate) fn run_evidence(args: EvidenceArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let locale = args.locale.unwrap_or(config.evaluation.locale);

    match args.csv_out {
        Some(path) => {
            evidence::write_csv(BufWriter::new(File::create(&path)?), locale)?;
            println!("Evidence table written to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            render_evidence(&mut stdout.lock(), locale)?;
        }
    }

    Ok(())
}

pub(crate) fn render_summary<W: Write>(
    out: &mut W,
    session: &EvaluationSession,
    report: &DonorReport,
    sort_by_priority: bool,
) -> io::Result<()> {
    let locale = report.locale();
    writeln!(out, "{}", report.title())?;
    writeln!(
        out,
        "{}: {} | {}: {}",
        locale.pick("Informe", "Report"),
        session.report_id,
        locale.pick("Fecha", "Date"),
        session.evaluation_date
    )?;

    let rows = if sort_by_priority {
        report.sorted_by_priority()
    } else {
        report.rows().to_vec()
    };

    for row in &rows {
        writeln!(
            out,
            "\n- {} ({} {}, DSA {} MFI)",
            row.patient_code,
            locale.pick("edad", "age"),
            row.donor_age,
            row.dsa_level
        )?;
        writeln!(
            out,
            "  GVHD: {} | {}: {} | {}: {}",
            row.gvhd_risk_label,
            locale.pick("Recaída", "Relapse"),
            row.relapse_risk_label,
            locale.pick("Prendimiento", "Engraftment"),
            row.engraftment_failure_risk_label
        )?;
        writeln!(
            out,
            "  DSA: {} | ABO: {}",
            row.dsa_status_label, row.abo_compatibility_label
        )?;
        writeln!(out, "  {}", row.priority_label)?;
        writeln!(out, "  {}", row.recommendation_text)?;
    }

    if !report.rejected().is_empty() {
        writeln!(out, "\n{}:", locale.pick("Registros rechazados", "Rejected records"))?;
        for rejected in report.rejected() {
            writeln!(
                out,
                "  - #{} {}: {}",
                rejected.position + 1,
                rejected.patient_code,
                rejected.error
            )?;
        }
    }

    let tally = report.tally();
    writeln!(out)?;
    for tier in &tally.tiers {
        writeln!(out, "{}: {}", tier.label, tier.count)?;
    }
    writeln!(
        out,
        "{}: {} | {}: {}",
        locale.pick("GVHD alto", "High GVHD"),
        tally.high_gvhd_risk,
        locale.pick("Fallo de prendimiento alto", "High engraftment failure"),
        tally.high_engraftment_failure_risk
    )?;
    Ok(())
}

pub(crate) fn render_evidence<W: Write>(out: &mut W, locale: Locale) -> io::Result<()> {
    writeln!(out, "{}", evidence::table_title(locale))?;
    for row in evidence::views(locale) {
        writeln!(
            out,
            "{:>2}. {} | {} | n={} | {} | {}",
            row.rank,
            row.factor,
            row.clinical_impact,
            row.cohort_size,
            row.strength_label,
            row.citation
        )?;
    }
    Ok(())
}
