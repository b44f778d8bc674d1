use clap::{Parser, Subcommand};
use idgen_demo::audit::{audit_ledger, AuditIssue, IssueLevel};
use idgen_demo::iban::{generate_ibans, IbanCountry};
use idgen_demo::ledger::{self, append_entries, KIND_IBAN, KIND_MRZ, KIND_PASSPORT};
use idgen_demo::logging;
use idgen_demo::models::{LedgerEntry, MrzRowResult};
use idgen_demo::mod97::verify_iban;
use idgen_demo::mrz_batch::{generate_mrz_batch, load_rows, DateFormat};
use idgen_demo::passport::{generate_passport_dates, generate_passport_numbers, PassportCountry};
use std::fs::create_dir_all;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "idgen-demo")]
#[command(about = "Synthetic IBAN and passport MRZ generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Iban(IbanArgs),
    VerifyIban(VerifyIbanArgs),
    Mrz(MrzArgs),
    Passport(PassportArgs),
    PassportDates(PassportDatesArgs),
    Audit(AuditArgs),
}

#[derive(Parser)]
struct IbanArgs {
    #[arg(long, default_value_t = 1)]
    count: usize,
    #[arg(long, default_value = "BR")]
    country: String,
    #[arg(long)]
    ledger: Option<PathBuf>,
}

#[derive(Parser)]
struct VerifyIbanArgs {
    #[arg(required = true)]
    ibans: Vec<String>,
}

#[derive(Parser)]
struct MrzArgs {
    #[arg(long)]
    input: PathBuf,
    /// iso, dmy-slash, dmy-dash, mdy-slash or ymd-slash; tries all when omitted
    #[arg(long)]
    date_format: Option<String>,
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long)]
    ledger: Option<PathBuf>,
}

#[derive(Parser)]
struct PassportArgs {
    #[arg(long, default_value_t = 1)]
    count: usize,
    #[arg(long, default_value = "BR")]
    country: String,
    #[arg(long, default_value = "")]
    prefix: String,
    #[arg(long)]
    ledger: Option<PathBuf>,
}

#[derive(Parser)]
struct PassportDatesArgs {
    #[arg(long, default_value_t = 1)]
    count: usize,
    #[arg(long, default_value = "BR")]
    country: String,
    #[arg(long, default_value = "Y-m-d")]
    format: String,
}

#[derive(Parser)]
struct AuditArgs {
    #[arg(long, default_value = "data/ledger.csv")]
    input: PathBuf,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    logging::init_logging("idgen-demo")?;
    let cli = Cli::parse();
    match cli.command {
        Command::Iban(args) => run_iban(args),
        Command::VerifyIban(args) => run_verify_iban(args),
        Command::Mrz(args) => run_mrz(args),
        Command::Passport(args) => run_passport(args),
        Command::PassportDates(args) => run_passport_dates(args),
        Command::Audit(args) => run_audit(args),
    }
}

fn run_iban(args: IbanArgs) -> Result<(), String> {
    let country = IbanCountry::from_code(&args.country)?;
    let start = Instant::now();
    let ibans = generate_ibans(args.count, country)?;
    log::info!(
        "generated {} {} IBAN(s) in {} ms",
        ibans.len(),
        country.code(),
        start.elapsed().as_millis()
    );
    for iban in &ibans {
        println!("{iban}");
    }
    record(args.ledger.as_deref(), KIND_IBAN, &ibans)
}

fn run_verify_iban(args: VerifyIbanArgs) -> Result<(), String> {
    let mut invalid = 0usize;
    for raw in &args.ibans {
        let iban: String = raw
            .chars()
            .filter(|ch| !ch.is_whitespace())
            .collect::<String>()
            .to_uppercase();
        let valid = verify_iban(&iban);
        if !valid {
            invalid += 1;
        }
        println!("{} {}", iban, if valid { "valid" } else { "invalid" });
    }
    if invalid > 0 {
        return Err(format!("{} of {} IBAN(s) invalid", invalid, args.ibans.len()));
    }
    Ok(())
}

fn run_mrz(args: MrzArgs) -> Result<(), String> {
    let format = args
        .date_format
        .as_deref()
        .map(DateFormat::from_tag)
        .transpose()?;
    let rows = load_rows(&args.input)?;
    let results = generate_mrz_batch(&rows, format)?;
    let json = serde_json::to_string_pretty(&results).map_err(|err| err.to_string())?;

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                create_dir_all(parent).map_err(|err| err.to_string())?;
            }
            std::fs::write(path, json).map_err(|err| err.to_string())?;
            emit_info_line(&format!("MRZ output written to {}", path.display()));
        }
        None => println!("{json}"),
    }

    let encoded: Vec<String> = results
        .iter()
        .filter_map(|result| match result {
            MrzRowResult::Ok { mrz, .. } => Some(ledger::mrz_value(&mrz[0], &mrz[1])),
            MrzRowResult::Failed { .. } => None,
        })
        .collect();
    emit_info_line(&format!(
        "MRZ rows: {} encoded, {} rejected",
        encoded.len(),
        results.len() - encoded.len()
    ));
    record(args.ledger.as_deref(), KIND_MRZ, &encoded)
}

fn run_passport(args: PassportArgs) -> Result<(), String> {
    let country = PassportCountry::from_code(&args.country)?;
    let mut rng = rand::thread_rng();
    let numbers = generate_passport_numbers(&mut rng, args.count, country, &args.prefix)?;
    for number in &numbers {
        println!("{number}");
    }
    record(args.ledger.as_deref(), KIND_PASSPORT, &numbers)
}

fn run_passport_dates(args: PassportDatesArgs) -> Result<(), String> {
    let country = PassportCountry::from_code(&args.country)?;
    let mut rng = rand::thread_rng();
    let today = chrono::Local::now().date_naive();
    let pairs = generate_passport_dates(&mut rng, args.count, country, &args.format, today)?;
    let json = serde_json::to_string_pretty(&pairs).map_err(|err| err.to_string())?;
    println!("{json}");
    Ok(())
}

fn run_audit(args: AuditArgs) -> Result<(), String> {
    let report = audit_ledger(&args.input)?;

    emit_info_line(&format!(
        "Audit: entries={} ibans={} passports={} mrz={}",
        report.total_entries, report.ibans, report.passports, report.mrzs
    ));
    emit_info_line(&format!(
        "Audit issues: errors={} warnings={}",
        report.error_count(),
        report.warning_count()
    ));

    emit_issue_summary("error", &report.issues, IssueLevel::Error);
    emit_issue_summary("warning", &report.issues, IssueLevel::Warning);

    if report.error_count() > 0 {
        return Err(format!("audit failed with {} error(s)", report.error_count()));
    }
    Ok(())
}

fn record(path: Option<&Path>, kind: &str, values: &[String]) -> Result<(), String> {
    let Some(path) = path else {
        return Ok(());
    };
    let entries: Vec<LedgerEntry> = values.iter().map(|value| ledger::entry(kind, value)).collect();
    append_entries(path, &entries)?;
    Ok(())
}

fn emit_issue_summary(label: &str, issues: &[AuditIssue], level: IssueLevel) {
    let mut counts = std::collections::HashMap::new();
    for issue in issues.iter().filter(|issue| issue.level == level) {
        *counts.entry(issue.message.as_str()).or_insert(0usize) += 1;
    }
    if counts.is_empty() {
        return;
    }

    let mut items: Vec<(&str, usize)> = counts.into_iter().collect();
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let max_items = 5usize;
    for (message, count) in items.iter().take(max_items) {
        emit_info_line(&format!("Audit {}s: {} = {}", label, message, count));
    }
    if items.len() > max_items {
        emit_info_line(&format!(
            "Audit {}s: {} additional issue types not shown",
            label,
            items.len() - max_items
        ));
    }
}

fn emit_info_line(message: &str) {
    if log::log_enabled!(log::Level::Info) {
        log::info!("{}", message);
    } else {
        eprintln!("{message}");
    }
}
