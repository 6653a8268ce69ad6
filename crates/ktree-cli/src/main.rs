//! Knowledge Tree CLI - grows a prerequisite graph of concepts

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use ktree_core::config::Config;
use ktree_core::domain::concept::{ConceptRepository, Domain, GraphStats};
use ktree_core::domain::generator::{
    GenerationResult, GenerationStatus, GeneratorDeps, Orchestrator, PassDirection, PassResult,
};
use ktree_core::domain::mvg::{MvgResult, MvgService};
use ktree_core::infrastructure::{
    InMemoryConceptStore, SqliteConceptRepository, build_chain, build_enrichers,
};
use ktree_core::llm::{LlmClient, UsageSummary};
use ktree_core::seeds::load_seed_definitions;
use ktree_core::storage::Database;
use serde_json::json;
use tracing::{debug, info};

/// Errors shown in the text summary before truncating
const MAX_ERRORS_SHOWN: usize = 10;

#[derive(Parser)]
#[command(name = "ktree")]
#[command(author, version, about = "Grow a knowledge tree of concepts and prerequisites", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Load seeds and run alternating forward/backward passes
    Generate {
        /// Domains to expand (MATH, PHYSICS, CHEMISTRY, BIOLOGY, CS)
        #[arg(short, long, value_delimiter = ',', value_parser = parse_domain)]
        domains: Vec<Domain>,
        /// Expand every supported domain
        #[arg(long, conflicts_with = "domains")]
        all_domains: bool,
        /// Number of new concepts to aim for
        #[arg(short, long, default_value_t = 50)]
        target: usize,
        /// Only load seed definitions
        #[arg(long)]
        seed_only: bool,
        /// Use a throwaway in-memory graph
        #[arg(long)]
        dry_run: bool,
        /// SQLite database path (overrides storage.database_path)
        #[arg(long)]
        database: Option<PathBuf>,
    },

    /// Run a single forward or backward pass
    Pass {
        /// forward or backward
        pass_type: String,
        #[arg(short, long, default_value_t = 10)]
        target: usize,
        #[arg(short, long, value_delimiter = ',', value_parser = parse_domain)]
        domains: Vec<Domain>,
        #[arg(long)]
        dry_run: bool,
        #[arg(long)]
        database: Option<PathBuf>,
    },

    /// Build a minimum viable graph for a target concept
    Mvg {
        /// Concept to explain
        target: String,
        #[arg(long, default_value = "MATH", value_parser = parse_domain)]
        domain: Domain,
        #[arg(long)]
        dry_run: bool,
        #[arg(long)]
        database: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Reset configuration to defaults
    Reset,
    /// Show config file path
    Path,
}

fn parse_domain(value: &str) -> Result<Domain, String> {
    value.parse().map_err(|e: ktree_core::Error| e.to_string())
}

/// Requested domains, defaulting to MATH; duplicates are dropped
fn resolve_domains(mut domains: Vec<Domain>, all_domains: bool) -> Vec<Domain> {
    if all_domains {
        return Domain::all().to_vec();
    }
    if domains.is_empty() {
        return vec![Domain::Math];
    }
    let mut seen = Vec::with_capacity(domains.len());
    domains.retain(|d| {
        if seen.contains(d) {
            false
        } else {
            seen.push(*d);
            true
        }
    });
    domains
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let directive = if cli.verbose { "ktree=debug" } else { "ktree=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(directive.parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate {
            domains,
            all_domains,
            target,
            seed_only,
            dry_run,
            database,
        } => {
            let domains = resolve_domains(domains, all_domains);
            cmd_generate(&domains, target, seed_only, dry_run, database, cli.format).await
        }

        Commands::Pass {
            pass_type,
            target,
            domains,
            dry_run,
            database,
        } => {
            let direction: PassDirection = pass_type.parse()?;
            let domains = resolve_domains(domains, false);
            cmd_pass(direction, target, &domains, dry_run, database, cli.format).await
        }

        Commands::Mvg {
            target,
            domain,
            dry_run,
            database,
        } => cmd_mvg(&target, domain, dry_run, database, cli.format).await,

        Commands::Config { action } => cmd_config(action),
    }
}

/// In-memory graph for dry runs, SQLite otherwise
async fn open_store(
    config: &Config,
    dry_run: bool,
    database: Option<PathBuf>,
) -> anyhow::Result<Arc<dyn ConceptRepository>> {
    if dry_run {
        debug!("Dry run, using in-memory graph");
        return Ok(Arc::new(InMemoryConceptStore::new()));
    }

    let path = database.unwrap_or_else(|| config.storage.resolved_database_path());
    info!(path = %path.display(), "Opening knowledge graph");
    let db = Database::open(path).await?;
    Ok(Arc::new(SqliteConceptRepository::new(db.pool().clone())))
}

fn build_client(config: &Config) -> anyhow::Result<Arc<LlmClient>> {
    let api_key = config
        .llm
        .resolved_api_key()?
        .ok_or_else(|| anyhow!("No API key found. Set KTREE_API_KEY or OPENROUTER_API_KEY."))?;
    Ok(Arc::new(LlmClient::new(config.llm.clone(), api_key)?))
}

fn build_orchestrator(
    config: &Config,
    store: Arc<dyn ConceptRepository>,
    client: Arc<LlmClient>,
) -> anyhow::Result<Orchestrator> {
    let deps = GeneratorDeps {
        store,
        backend: client,
        extractors: build_chain(&config.extractors)?,
        enrichers: build_enrichers(&config.extractors),
    };
    Ok(Orchestrator::from_deps(deps, config.generator.clone()))
}

async fn cmd_generate(
    domains: &[Domain],
    target: usize,
    seed_only: bool,
    dry_run: bool,
    database: Option<PathBuf>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let config = Config::load()?;
    let store = open_store(&config, dry_run, database).await?;

    let seeds_loaded = load_seed_definitions(store.as_ref(), domains).await?;

    if seed_only {
        let stats = store.stats().await?;
        match format {
            OutputFormat::Json => println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "seeds_loaded": seeds_loaded,
                    "stats": stats,
                }))?
            ),
            OutputFormat::Text => {
                println!("Loaded {} seed definitions", seeds_loaded);
                print_stats(&stats);
            }
        }
        return Ok(());
    }

    let client = build_client(&config)?;
    let mut orchestrator = build_orchestrator(&config, store.clone(), client.clone())?;
    let result = orchestrator.run(target, domains).await;
    let stats = store.stats().await?;
    let usage = client.usage().summary();

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "seeds_loaded": seeds_loaded,
                "result": result,
                "stats": stats,
                "usage": usage,
            }))?
        ),
        OutputFormat::Text => {
            println!("Loaded {} seed definitions", seeds_loaded);
            println!();
            print_generation(&result);
            print_stats(&stats);
            print_usage(&usage);
        }
    }
    Ok(())
}

async fn cmd_pass(
    direction: PassDirection,
    target: usize,
    domains: &[Domain],
    dry_run: bool,
    database: Option<PathBuf>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let config = Config::load()?;
    let store = open_store(&config, dry_run, database).await?;
    load_seed_definitions(store.as_ref(), domains).await?;

    let client = build_client(&config)?;
    let mut orchestrator = build_orchestrator(&config, store, client.clone())?;
    let result = orchestrator
        .run_single_pass(direction.as_str(), target, domains)
        .await?;
    let usage = client.usage().summary();

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&json!({ "result": result, "usage": usage }))?
        ),
        OutputFormat::Text => {
            print_pass(&result);
            print_usage(&usage);
        }
    }
    Ok(())
}

async fn cmd_mvg(
    target: &str,
    domain: Domain,
    dry_run: bool,
    database: Option<PathBuf>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let config = Config::load()?;
    let store = open_store(&config, dry_run, database).await?;
    if dry_run {
        // Give the throwaway graph something to link against
        load_seed_definitions(store.as_ref(), &[domain]).await?;
    }

    let client = build_client(&config)?;
    let service = MvgService::new(client, store);
    let result = service.generate(target, domain).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => print_mvg(&result),
    }
    Ok(())
}

fn cmd_config(action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            println!("{}", config.get(&key)?);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            println!("Set {} = {}", key, value);
        }
        ConfigAction::List => {
            let config = Config::load()?;
            for (key, value) in config.list()? {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Reset => {
            Config::reset()?;
            println!("Configuration reset to defaults.");
        }
        ConfigAction::Path => {
            println!("{}", Config::config_path()?.display());
        }
    }
    Ok(())
}

fn status_label(status: GenerationStatus) -> &'static str {
    match status {
        GenerationStatus::Completed => "completed",
        GenerationStatus::Stalled => "stalled",
    }
}

fn print_errors(errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    println!("  Errors: {}", errors.len());
    for error in errors.iter().take(MAX_ERRORS_SHOWN) {
        println!("    - {}", error);
    }
    if errors.len() > MAX_ERRORS_SHOWN {
        println!("    ... and {} more", errors.len() - MAX_ERRORS_SHOWN);
    }
}

fn print_generation(result: &GenerationResult) {
    println!("Generation {}", status_label(result.status));
    println!(
        "  Concepts added: {} / {}",
        result.total_concepts_added, result.target_terms
    );
    println!(
        "    Forward:  {} ({} passes)",
        result.forward_concepts, result.forward_passes
    );
    println!(
        "    Backward: {} ({} passes)",
        result.backward_concepts, result.backward_passes
    );
    println!("  Iterations: {}", result.iterations);
    print_errors(&result.all_errors);
    println!("  Success: {}", result.success);
    println!();
}

fn print_pass(result: &PassResult) {
    println!("{} pass", result.direction);
    println!("  Added:   {}", result.concepts_added);
    println!("  Skipped: {}", result.concepts_skipped);
    if result.direction == PassDirection::Backward {
        println!("  Linked:  {}", result.prerequisites_linked);
    }
    print_errors(&result.errors);
    println!();
}

fn print_stats(stats: &GraphStats) {
    println!("Graph");
    println!("  Concepts:       {}", stats.concepts);
    println!("  Axioms:         {}", stats.axioms);
    println!("  Requires edges: {}", stats.requires_edges);
    for (domain, count) in &stats.by_domain {
        println!("    {:<10} {}", domain.as_str(), count);
    }
}

fn print_usage(usage: &UsageSummary) {
    println!();
    println!("Token usage");
    println!("  Calls:  {}", usage.calls);
    println!("  Input:  {}", usage.input_tokens);
    println!("  Output: {}", usage.output_tokens);
}

fn print_mvg(result: &MvgResult) {
    println!("Minimum viable graph for {} ({})", result.target, result.domain);
    println!();
    for (step, node) in result.path.iter().enumerate() {
        let marker = match (node.is_axiom, node.is_virtual()) {
            (true, _) => " [axiom]",
            (false, true) => " [new]",
            (false, false) => "",
        };
        println!("{:>2}. {}{}", step + 1, node.name, marker);
        if !node.description.is_empty() {
            println!("    {}", node.description);
        }
    }
    if !result.explanation.is_empty() {
        println!();
        println!("{}", result.explanation);
    }
}

#[cfg(test)]
mod main_tests;
