use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use donation_core::calculations::AllowanceSimulation;
use donation_core::calculations::common::today;
use donation_core::models::{NewDonation, OwnerId, PersonId, RelationshipCode, TaxSystem};
use donation_core::{DonationEngine, EngineConfig, FamilyGraph, ReferenceData};
use donation_data::{FamilyLoader, LoadedFamily, TaxBracketLoader};
use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Plan tax-free family gifts from a family tree stored in CSV files.
///
/// The people file has the columns key, first_name, last_name, gender,
/// birth_date, death_date and owner. The links file has parent and child
/// keys. The donations file has donor, beneficiary, amount, created_at,
/// tax_system and tax_paid.
#[derive(Parser, Debug)]
#[command(name = "donation-planner")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file listing family members
    #[arg(short, long)]
    people: Option<PathBuf>,

    /// Path to the CSV file of parent-child links
    #[arg(short, long)]
    links: Option<PathBuf>,

    /// Path to the CSV file of recorded gifts
    #[arg(short, long)]
    donations: Option<PathBuf>,

    /// TOML engine configuration (defaults to the built-in French rules)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// CSV file of tax brackets replacing the configured schedules
    #[arg(short, long)]
    brackets: Option<PathBuf>,

    /// Reference date as YYYY-MM-DD (defaults to today)
    #[arg(long)]
    date: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Allowances left between a donor and a beneficiary
    Simulate {
        #[arg(long)]
        donor: String,
        #[arg(long)]
        beneficiary: String,
    },

    /// Every usable allowance in the family, by priority
    Plan {
        #[arg(long, default_value_t = 1)]
        owner: i64,
    },

    /// Expired, running and never-used allowance cycles
    Analyze {
        #[arg(long, default_value_t = 1)]
        owner: i64,
    },

    /// What a person can receive and give
    Overview {
        #[arg(long)]
        person: String,
    },

    /// Family gift history and the projected plan
    Dashboard {
        #[arg(long, default_value_t = 1)]
        owner: i64,
    },

    /// Tax avoided by giving an amount under an allowance
    Saving {
        #[arg(long)]
        amount: Decimal,
        #[arg(long, value_parser = parse_relationship)]
        relationship: RelationshipCode,
    },

    /// Check a gift before recording it, on the reference date
    Validate {
        #[arg(long)]
        donor: String,
        #[arg(long)]
        beneficiary: String,
        #[arg(long)]
        amount: Decimal,
        #[arg(long, value_parser = parse_tax_system)]
        tax_system: TaxSystem,
        #[arg(long, default_value_t = Decimal::ZERO)]
        tax_paid: Decimal,
    },
}

fn parse_relationship(s: &str) -> Result<RelationshipCode, String> {
    RelationshipCode::parse(&s.to_ascii_uppercase())
        .ok_or_else(|| format!("unknown relationship code: {s}"))
}

fn parse_tax_system(s: &str) -> Result<TaxSystem, String> {
    TaxSystem::parse(s).ok_or_else(|| format!("unknown tax system: {s}"))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("Failed to open: {}", path.display()))
}

fn load_reference_data(args: &Args) -> Result<ReferenceData> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("Failed to read configuration: {}", path.display()))?,
        None => EngineConfig::french_reference().context("Built-in configuration is invalid")?,
    };

    if let Some(path) = &args.brackets {
        let records = TaxBracketLoader::parse(open(path)?)
            .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
        let inserted = TaxBracketLoader::load(&mut config, &records)
            .with_context(|| format!("Failed to load brackets from: {}", path.display()))?;
        info!(inserted, "tax brackets loaded");
    }

    config.into_reference_data().context("Invalid engine configuration")
}

fn load_family(args: &Args) -> Result<LoadedFamily> {
    let people = match &args.people {
        Some(path) => FamilyLoader::parse_people(open(path)?)
            .with_context(|| format!("Failed to parse CSV: {}", path.display()))?,
        None => Vec::new(),
    };
    let links = match &args.links {
        Some(path) => FamilyLoader::parse_links(open(path)?)
            .with_context(|| format!("Failed to parse CSV: {}", path.display()))?,
        None => Vec::new(),
    };
    let donations = match &args.donations {
        Some(path) => FamilyLoader::parse_donations(open(path)?)
            .with_context(|| format!("Failed to parse CSV: {}", path.display()))?,
        None => Vec::new(),
    };

    FamilyLoader::load(&people, &links, &donations).context("Failed to build the family tree")
}

fn name_of(
    graph: &FamilyGraph,
    id: PersonId,
) -> String {
    graph
        .person(id)
        .map(|p| p.full_name())
        .unwrap_or_else(|| id.to_string())
}

fn print_simulation(
    graph: &FamilyGraph,
    data: &ReferenceData,
    simulation: &AllowanceSimulation,
) {
    let relationship = match graph.person(simulation.beneficiary) {
        Some(beneficiary) => data
            .labels
            .label_for(simulation.relationship_code, beneficiary.gender),
        None => simulation.relationship_code.to_string(),
    };
    println!(
        "{} -> {} ({}) on {}",
        name_of(graph, simulation.donor),
        name_of(graph, simulation.beneficiary),
        relationship,
        simulation.reference_date
    );
    for rule in &simulation.rules {
        let status = if rule.is_valid { "ok" } else { "--" };
        println!(
            "  [{}] {} ({}): ceiling {}, consumed {}, available {}",
            status, rule.label, rule.tax_system, rule.ceiling, rule.consumed, rule.available
        );
        if let Some(reason) = &rule.reason {
            println!("       {}", reason);
        }
    }
    println!("  Total available: {}", simulation.total_available);
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let data = load_reference_data(&args)?;
    let family = load_family(&args)?;
    let graph = &family.graph;
    let engine = DonationEngine::new(graph, &data);
    let reference = args.date;

    match &args.command {
        Command::Simulate { donor, beneficiary } => {
            let donor = family.person_id(donor)?;
            let beneficiary = family.person_id(beneficiary)?;
            let simulation = engine
                .simulator()
                .simulate(donor, beneficiary, reference)
                .context("Simulation failed")?;
            print_simulation(graph, &data, &simulation);
        }
        Command::Plan { owner } => {
            let people = graph.people_of(OwnerId(*owner));
            let plan = engine
                .planner()
                .plan(&people, reference)
                .context("Planning failed")?;
            if plan.is_empty() {
                println!("No allowance left to use.");
            }
            for entry in &plan {
                println!(
                    "{} -> {}: {} ({}) {}",
                    name_of(graph, entry.donor),
                    name_of(graph, entry.beneficiary),
                    entry.label,
                    entry.tax_system,
                    entry.available
                );
            }
        }
        Command::Analyze { owner } => {
            let analysis = engine
                .analyzer()
                .analyze(OwnerId(*owner), reference)
                .context("Analysis failed")?;
            println!("Running cycles: {}", analysis.active_periods.len());
            for period in &analysis.active_periods {
                println!(
                    "  {} -> {}: {} to {}, {} of {} used",
                    name_of(graph, period.donor),
                    name_of(graph, period.beneficiary),
                    period.start_date,
                    period.end_date,
                    period.used,
                    period.ceiling
                );
            }
            println!("Expired cycles: {}", analysis.expired_periods.len());
            for period in &analysis.expired_periods {
                println!(
                    "  {} -> {}: ended {}, {} left unused",
                    name_of(graph, period.donor),
                    name_of(graph, period.beneficiary),
                    period.end_date,
                    period.unoptimized
                );
            }
            println!("Never used:");
            for opportunity in &analysis.never_used {
                println!(
                    "  {} -> {}: {} {}",
                    name_of(graph, opportunity.donor),
                    name_of(graph, opportunity.beneficiary),
                    opportunity.label,
                    opportunity.amount
                );
            }
            println!("Total missed: {}", analysis.total_missed);
        }
        Command::Overview { person } => {
            let person = family.person_id(person)?;
            let overview = engine
                .overview()
                .person_overview(person, reference)
                .context("Overview failed")?;
            println!("Can receive:");
            for simulation in &overview.received_simulations {
                print_simulation(graph, &data, simulation);
            }
            println!("Can give:");
            for simulation in &overview.given_simulations {
                print_simulation(graph, &data, simulation);
            }
            println!(
                "Gifts received: {}, gifts made: {}",
                overview.history_received.len(),
                overview.history_given.len()
            );
            println!("Total allowance to give: {}", overview.total_given_allowance);
        }
        Command::Dashboard { owner } => {
            let owner = OwnerId(*owner);
            let overview = engine.overview();
            let history = overview.family_dashboard(owner, reference);
            let future = overview
                .future_dashboard(owner, reference)
                .context("Dashboard failed")?;
            println!("Members: {}", history.total_members);
            println!(
                "Gifts in the recall window: {}, older gifts: {}",
                history.active_donations.len(),
                history.expired_donations.len()
            );
            println!(
                "On {}: {} available across {} allowances, {} of tax avoided",
                future.reference_date,
                future.total_available,
                future.family_plan.len(),
                future.total_saving
            );
            println!("Missed so far: {}", future.analysis.total_missed);
        }
        Command::Saving {
            amount,
            relationship,
        } => {
            let saving = engine.saving().saving(*amount, *relationship);
            println!("Tax avoided on {} ({}): {}", amount, relationship, saving);
        }
        Command::Validate {
            donor,
            beneficiary,
            amount,
            tax_system,
            tax_paid,
        } => {
            let donation = NewDonation {
                donor: family.person_id(donor)?,
                beneficiary: family.person_id(beneficiary)?,
                amount: *amount,
                created_at: reference.unwrap_or_else(today),
                tax_system: *tax_system,
                tax_paid: *tax_paid,
            };
            let violations = engine.validator().validate(&donation);
            if violations.is_empty() {
                println!("Gift is valid.");
            }
            for violation in &violations {
                println!("  {}", violation);
            }
        }
    }

    Ok(())
}
