//! ClassLens - literacy class-profile analyzer
//!
//! A CLI tool that fetches a class roster and curriculum profile from a
//! REST endpoint and renders the derived performance views: class
//! overview, roster list, student detail, strand cohorts, analytics,
//! and exported reports.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (connection, config, bad roster data, etc.)

mod analysis;
mod api;
mod catalog;
mod cli;
mod config;
mod error;
mod models;
mod report;
mod state;

use anyhow::{Context, Result};
use api::ProfileClient;
use catalog::StrandCatalog;
use chrono::Utc;
use cli::{Args, Command, OutputFormat};
use config::Config;
use indicatif::ProgressBar;
use models::{ClassProfile, CompetenceLevel, StudentRecord};
use state::AppState;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle init-config early (no logging needed)
    if matches!(args.command, Command::InitConfig) {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("ClassLens v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle init-config: generate a default .classlens.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".classlens.toml");

    if path.exists() {
        eprintln!("⚠️  .classlens.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .classlens.toml")?;

    println!("✅ Created .classlens.toml with default settings.");
    println!("   Edit it to customize the API address and strand catalog.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the selected command against a freshly fetched snapshot.
async fn run(args: Args) -> Result<()> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let catalog = config.catalog.to_catalog();
    if catalog.is_empty() {
        anyhow::bail!("Strand catalog is empty; check the [catalog] section of .classlens.toml");
    }

    let client = ProfileClient::new(&config.api.base_url, config.api.timeout_seconds)?;
    info!("Class API: {}", client.base_url());

    match args.command {
        Command::Overview => {
            let (roster, profile) = fetch_snapshot(&client, args.quiet).await?;
            let state = load_state(roster, Some(profile))?;
            render_overview(&state, &catalog);
        }
        Command::Students { ref search } => {
            let spinner = fetch_spinner(args.quiet, "Fetching roster...");
            let roster = client.fetch_students().await?;
            spinner.finish_and_clear();

            let mut state = load_state(roster, None)?;
            if let Some(query) = search {
                state.set_search_query(query);
            }
            render_students(&state, &catalog)?;
        }
        Command::Student { ref id } => {
            let spinner = fetch_spinner(args.quiet, "Fetching student...");
            let student = client.fetch_student(id).await?;
            spinner.finish_and_clear();

            let student =
                student.ok_or_else(|| anyhow::anyhow!("No student found with id {}", id))?;
            analysis::validate_student(&student).context("Fetched student failed validation")?;
            render_student(&student, &catalog)?;
        }
        Command::Strand { ref name } => {
            let spinner = fetch_spinner(args.quiet, "Fetching roster...");
            let roster = client.fetch_students().await?;
            spinner.finish_and_clear();

            let strand = catalog
                .by_name(name)
                .ok_or_else(|| anyhow::anyhow!("Unknown strand: {}", name))?
                .clone();
            let mut state = load_state(roster, None)?;
            state.select_strand(&strand.name);
            render_strand_cohort(&state, &catalog, &strand.name)?;
        }
        Command::Analytics => {
            let (roster, profile) = fetch_snapshot(&client, args.quiet).await?;
            let state = load_state(roster, Some(profile))?;
            render_analytics(&state, &catalog)?;
        }
        Command::Report { ref student } => {
            handle_report(&args, &config, &client, &catalog, student.as_deref()).await?;
        }
        Command::InitConfig => unreachable!("handled before logging init"),
    }

    Ok(())
}

/// Export a class report, or one student's text report.
async fn handle_report(
    args: &Args,
    config: &Config,
    client: &ProfileClient,
    catalog: &StrandCatalog,
    student_id: Option<&str>,
) -> Result<()> {
    let output = std::path::Path::new(&config.general.output);

    let content = match student_id {
        Some(id) => {
            let spinner = fetch_spinner(args.quiet, "Fetching student...");
            let student = client.fetch_student(id).await?;
            spinner.finish_and_clear();

            let student =
                student.ok_or_else(|| anyhow::anyhow!("No student found with id {}", id))?;
            analysis::validate_student(&student).context("Fetched student failed validation")?;
            report::generate_student_report(&student, catalog, Utc::now())?
        }
        None => {
            let (roster, profile) = fetch_snapshot(client, args.quiet).await?;
            let state = load_state(roster, Some(profile))?;

            let class_report = report::build_class_report(
                state.roster(),
                state.class_profile(),
                catalog,
                client.base_url(),
                Utc::now(),
            )?;

            match args.format {
                OutputFormat::Json => report::generate_json_report(&class_report)?,
                OutputFormat::Markdown => {
                    report::generate_markdown_report(&class_report, state.roster(), catalog)
                }
            }
        }
    };

    std::fs::write(output, &content)
        .with_context(|| format!("Failed to write report to {}", output.display()))?;

    println!("✅ Report saved to: {}", output.display());
    Ok(())
}

/// Fetch the class profile and roster concurrently, as one snapshot.
async fn fetch_snapshot(
    client: &ProfileClient,
    quiet: bool,
) -> Result<(Vec<StudentRecord>, ClassProfile)> {
    let spinner = fetch_spinner(quiet, "Fetching class data...");

    let result = futures::future::try_join(client.fetch_students(), client.fetch_class_profile())
        .await;

    spinner.finish_and_clear();
    result
}

/// Validate the fetched snapshot into application state.
fn load_state(roster: Vec<StudentRecord>, profile: Option<ClassProfile>) -> Result<AppState> {
    let mut state = AppState::new();
    state
        .set_roster(roster)
        .context("Fetched roster failed validation")?;
    if let Some(profile) = profile {
        state.set_class_profile(profile);
    }
    Ok(state)
}

fn fetch_spinner(quiet: bool, message: &str) -> ProgressBar {
    if quiet {
        ProgressBar::hidden()
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner
    }
}

/// Class overview: mastery key, then per-strand coverage and cohort size.
fn render_overview(state: &AppState, catalog: &StrandCatalog) {
    println!("\n📚 Class Overview");
    println!("   Students: {}\n", state.roster().len());

    println!("Mastery Key:");
    for level in CompetenceLevel::ALL {
        println!("   {} - {}: {}", level.code(), level.label(), level.description());
    }

    println!("\nStrands:");
    for strand in catalog.iter() {
        let covered = state
            .class_profile()
            .and_then(|p| p.work_covered_for(&strand.name))
            .unwrap_or(0);
        let cohort = analysis::strand_cohort(state.roster(), strand);

        println!(
            "   {} - work covered {}%, {} assessed student{}",
            strand.name,
            covered,
            cohort.len(),
            if cohort.len() == 1 { "" } else { "s" }
        );
    }
    println!();
}

/// Roster list with per-student derived metrics.
fn render_students(state: &AppState, catalog: &StrandCatalog) -> Result<()> {
    let students = state.visible_students();

    if !state.search_query().is_empty() {
        println!(
            "\n🔎 Students matching \"{}\": {}\n",
            state.search_query(),
            students.len()
        );
    } else {
        println!("\n👥 Students: {}\n", students.len());
    }

    if students.is_empty() {
        println!("   No matching students.");
        return Ok(());
    }

    for student in students {
        let progress = analysis::overall_progress(student, catalog)?;
        let competence = analysis::overall_competence(student, catalog);
        println!(
            "   {} ({}) - overall progress {}%, {}",
            student.name,
            student.id,
            progress,
            competence.code()
        );
    }
    println!();

    Ok(())
}

/// Detail view for one student: stats, tally grid, per-strand cards.
fn render_student(student: &StudentRecord, catalog: &StrandCatalog) -> Result<()> {
    let progress = analysis::overall_progress(student, catalog)?;
    let completed = analysis::completed_strand_count(student, catalog);
    let tally = analysis::competence_tally(student, catalog);

    println!("\n🎓 {} (ID: {})", student.name, student.id);
    println!(
        "   Avg Progress: {}% | Strands: {} | Completed: {}\n",
        progress,
        catalog.len(),
        completed
    );

    println!("Performance Summary:");
    for level in CompetenceLevel::ALL {
        println!("   {}: {}", level.code(), tally[&level]);
    }

    println!("\nLearning Strands Performance:");
    for strand in catalog.iter() {
        match student.strand(&strand.key) {
            Some(record) => {
                let badge = student.badge_competence_for(&strand.key);
                println!(
                    "   {} - {} ({}), progress {}%",
                    strand.name,
                    badge.label(),
                    badge.code(),
                    record.progress
                );
            }
            None => {
                println!("   {} - no record", strand.name);
            }
        }
    }
    println!();

    Ok(())
}

/// Drill-down: students with an assigned competence for one strand.
fn render_strand_cohort(state: &AppState, catalog: &StrandCatalog, name: &str) -> Result<()> {
    let cohort = state.selected_cohort(catalog);
    let strand = catalog
        .by_name(name)
        .ok_or_else(|| anyhow::anyhow!("Unknown strand: {}", name))?;

    println!(
        "\n📖 {} - {} assessed student{}\n",
        strand.name,
        cohort.len(),
        if cohort.len() == 1 { "" } else { "s" }
    );

    if cohort.is_empty() {
        println!("   No students have been assessed for this strand yet.");
        return Ok(());
    }

    for student in cohort {
        let badge = student.badge_competence_for(&strand.key);
        println!(
            "   {} ({}) - {} ({}), work progress {}%",
            student.name,
            student.id,
            badge.label(),
            badge.code(),
            student.progress_for(&strand.key)
        );
    }
    println!();

    Ok(())
}

/// Class-level analytics across all strands.
fn render_analytics(state: &AppState, catalog: &StrandCatalog) -> Result<()> {
    let roster = state.roster();
    let average = analysis::class_average_progress(roster, catalog)?;
    let meeting = analysis::meeting_expectation_share(roster, catalog);
    let distribution = analysis::class_competence_distribution(roster, catalog);

    if roster.is_empty() {
        warn!("Roster is empty; analytics will be all zeroes");
    }

    println!("\n📊 Class Analytics");
    println!("   Average Progress: {}%", average);
    println!("   Students Meeting Expectations: {}%\n", meeting);

    println!("Competence Distribution:");
    for level in CompetenceLevel::ALL {
        println!("   {}: {}", level.code(), distribution[&level]);
    }

    println!("\nStrand Performance:");
    for strand in catalog.iter() {
        let strand_avg = analysis::strand_average_progress(roster, strand);
        let covered = state
            .class_profile()
            .and_then(|p| p.work_covered_for(&strand.name))
            .unwrap_or(0);
        println!(
            "   {} - average progress {}%, work covered {}%",
            strand.name, strand_avg, covered
        );
    }
    println!();

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .classlens.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
