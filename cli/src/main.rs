//! docqc CLI - Word document quality-control tool

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docqc::detect::{has_supported_extension, SUPPORTED_EXTENSIONS};
use docqc::report::to_text;
use docqc::{
    acronym, load_document_with_options, AcronymTable, BuildOptions, DocQc, JsonFormat,
    OverallStatus, QcConfig, Report, RuleRegistry, ViolationType,
};

/// Exit code for a report with status PASS.
const EXIT_PASS: i32 = 0;
/// Exit code for a load, configuration or I/O error.
const EXIT_ERROR: i32 = 1;
/// Exit code for a report with status FAIL.
const EXIT_FAIL: i32 = 2;

/// Locations printed per check in terminal output.
const MAX_PRINTED_LOCATIONS: usize = 5;

#[derive(Parser)]
#[command(name = "docqc")]
#[command(version)]
#[command(about = "Quality-control checks for Word (.docx) documents", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks against a document
    Check {
        /// Input .docx file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,

        /// Output compact JSON
        #[arg(long, requires = "json")]
        compact: bool,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Checker configuration (JSON)
        #[arg(long, value_name = "FILE", env = "DOCQC_CONFIG")]
        config: Option<PathBuf>,

        /// Acronym database (JSON) replacing the built-in table
        #[arg(long, value_name = "FILE")]
        acronyms: Option<PathBuf>,

        /// Record unresolved style references as warnings
        #[arg(long)]
        lenient: bool,

        /// Run rules one after another
        #[arg(long)]
        sequential: bool,
    },

    /// Show document information
    Info {
        /// Input .docx file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// List the rule catalogue
    Rules,

    /// Show or export the acronym database
    Acronyms {
        /// Print the database as JSON
        #[arg(long)]
        export: bool,

        /// Output file for --export (stdout if not specified)
        #[arg(short, long, value_name = "FILE", requires = "export")]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match cli.command {
        Commands::Check {
            input,
            json,
            compact,
            output,
            config,
            acronyms,
            lenient,
            sequential,
        } => cmd_check(
            &input,
            CheckArgs {
                json,
                compact,
                output: output.as_deref(),
                config: config.as_deref(),
                acronyms: acronyms.as_deref(),
                lenient,
                sequential,
            },
        ),
        Commands::Info { input } => cmd_info(&input).map(|_| EXIT_PASS),
        Commands::Rules => {
            cmd_rules();
            Ok(EXIT_PASS)
        }
        Commands::Acronyms { export, output } => {
            cmd_acronyms(export, output.as_deref()).map(|_| EXIT_PASS)
        }
        Commands::Version => {
            cmd_version();
            Ok(EXIT_PASS)
        }
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            std::process::exit(EXIT_ERROR);
        }
    }
}

struct CheckArgs<'a> {
    json: bool,
    compact: bool,
    output: Option<&'a Path>,
    config: Option<&'a Path>,
    acronyms: Option<&'a Path>,
    lenient: bool,
    sequential: bool,
}

fn ensure_docx(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if has_supported_extension(input) {
        Ok(())
    } else {
        Err(format!(
            "{} is not a Word document (expected one of: .{})",
            input.display(),
            SUPPORTED_EXTENSIONS.join(", .")
        )
        .into())
    }
}

fn exit_code(report: &Report) -> i32 {
    match report.summary.overall_status {
        OverallStatus::Pass => EXIT_PASS,
        OverallStatus::Fail => EXIT_FAIL,
    }
}

fn cmd_check(input: &Path, args: CheckArgs<'_>) -> Result<i32, Box<dyn std::error::Error>> {
    ensure_docx(input)?;

    let mut qc = DocQc::new();
    if let Some(path) = args.config {
        qc = qc.with_config(QcConfig::from_json_file(path)?);
    }
    if let Some(path) = args.acronyms {
        let json = fs::read_to_string(path)?;
        let table = AcronymTable::from_json(&json)?;
        log::debug!("Loaded {} acronyms from {}", table.len(), path.display());
        qc = qc.with_acronyms(table);
    }
    if args.lenient {
        qc = qc.lenient();
    }
    if args.sequential {
        qc = qc.sequential();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Checking {}...", input.display()));
    let report = qc.check(input);
    pb.finish_and_clear();
    let report = report?;
    log::debug!(
        "{} checks, {} failed",
        report.summary.total_checks,
        report.summary.failed_checks
    );

    if args.json {
        let format = if args.compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        };
        let json = docqc::report::to_json(&report, format)?;
        write_output(args.output, &json)?;
    } else if let Some(path) = args.output {
        fs::write(path, to_text(&report))?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        print_report(&report);
    }

    Ok(exit_code(&report))
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn print_report(report: &Report) {
    println!("{}", "Quality Control Report".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), report.document_path);
    println!();

    for check in &report.checks {
        let tag = match (check.passed, check.violation_type) {
            (true, _) => "PASS".green().bold(),
            (false, ViolationType::Warning) => "WARN".yellow().bold(),
            (false, _) => "FAIL".red().bold(),
        };
        println!(
            "[{}] {}. {}: {}",
            tag, check.rule_number, check.rule_name, check.message
        );
        for location in check.locations.iter().take(MAX_PRINTED_LOCATIONS) {
            println!("       {} {}", "at".dimmed(), location);
        }
        if check.locations.len() > MAX_PRINTED_LOCATIONS {
            println!(
                "       {}",
                format!("... and {} more", check.locations.len() - MAX_PRINTED_LOCATIONS)
                    .dimmed()
            );
        }
    }

    if !report.warnings.is_empty() {
        println!();
        println!("{}", "Builder warnings".yellow().bold());
        for warning in &report.warnings {
            println!("  {} {}", "-".dimmed(), warning);
        }
    }

    let summary = &report.summary;
    println!();
    println!("{}", "Summary".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!(
        "{}: {}/{} passed ({:.1}%)",
        "Checks".bold(),
        summary.passed_checks,
        summary.total_checks,
        summary.success_rate
    );
    println!(
        "{}: {} errors, {} warnings",
        "Findings".bold(),
        summary.errors,
        summary.warnings
    );
    let status = match summary.overall_status {
        OverallStatus::Pass => summary.overall_status.to_string().green().bold(),
        OverallStatus::Fail => summary.overall_status.to_string().red().bold(),
    };
    println!("{}: {} (severity {})", "Status".bold(), status, summary.severity);
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    ensure_docx(input)?;

    // Lenient so that information is shown even for documents with broken style references
    let doc = load_document_with_options(input, &BuildOptions::new().lenient())?;
    let props = doc.core_properties();
    let stats = doc.stats();

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    if let Some(ref title) = props.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = props.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref modified_by) = props.last_modified_by {
        println!("{}: {}", "Last modified by".bold(), modified_by);
    }
    if let Some(ref created) = props.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(ref modified) = props.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }

    println!();
    println!("{}", "Page Layout".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for section in doc.sections() {
        let layout = &section.layout;
        println!(
            "{} {}: {:.2}\" x {:.2}\" {}, header {:.2}\", footer {:.2}\"",
            "Section".bold(),
            section.index + 1,
            layout.width_inches(),
            layout.height_inches(),
            layout.orientation(),
            layout.header_distance_inches(),
            layout.footer_distance_inches()
        );
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Sections".bold(), stats.section_count);
    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!("{}: {}", "Headings".bold(), stats.heading_count);
    println!("{}: {}", "Tables".bold(), stats.table_count);
    println!("{}: {}", "Runs".bold(), stats.run_count);
    println!("{}: {}", "Hyperlinks".bold(), stats.hyperlink_count);
    println!("{}: {}", "Bookmarks".bold(), stats.bookmark_count);
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);

    if !doc.warnings().is_empty() {
        println!();
        println!("{}", "Builder warnings".yellow().bold());
        for warning in doc.warnings() {
            println!("  {} {}", "-".dimmed(), warning);
        }
    }

    Ok(())
}

fn cmd_rules() {
    let registry = RuleRegistry::with_defaults(&QcConfig::default());
    println!("{}", "Rule Catalogue".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for id in registry.ids() {
        println!("{:>3}. {}", id.number, id.name);
    }
}

fn cmd_acronyms(export: bool, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let table = acronym::global();
    if export {
        return write_output(output, &table.to_json()?);
    }

    println!("{}", "Acronym Database".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Entries".bold(), table.len());
    for (category, tokens) in table.categories() {
        println!("{}: {}", category.bold(), tokens.len());
    }
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docqc".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Word document quality-control tool");
    println!();
    println!("License: MIT");
}
