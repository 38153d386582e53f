//! `seo-core` operator binary

use anyhow::Context;
use clap::{Parser, Subcommand};
use seo_core::prelude::*;
use seo_core::{
    init_tracing, InMemoryKeywordStore, InMemoryPageDirectory, Keyword, Page,
    SiteOwnershipValidator,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "seo-core",
    version,
    about = "Sentence-generation settings and change propagation"
)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, help = "Configuration file path (TOML)")]
    config: Option<PathBuf>,

    #[arg(long, global = true, help = "Log filter, overrides the configured one")]
    log: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Run a scripted scenario against in-memory stores")]
    Demo,

    #[command(about = "Print the effective configuration as TOML")]
    ShowConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CoreConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => CoreConfig::default().with_env_overrides(),
    };
    if let Some(filter) = cli.log {
        config = config.with_log_filter(filter);
    }

    match cli.command {
        Commands::ShowConfig => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
        Commands::Demo => {
            init_tracing(&config.log_filter).context("initializing tracing")?;
            run_demo(&config).await
        }
    }
}

async fn run_demo(config: &CoreConfig) -> anyhow::Result<()> {
    let store = Arc::new(InMemorySettingsStore::new());
    let pages = Arc::new(InMemoryPageDirectory::new());
    let keywords = Arc::new(InMemoryKeywordStore::new());
    let access = Arc::new(SiteOwnershipValidator::new(pages.clone(), keywords.clone()));

    let owner = UserId::new();
    let site_id = SiteId::new();
    access.grant(site_id, owner);

    let page = Page::new(site_id, "https://shop.example.com/shoes");
    let keyword = Keyword::new(site_id, "Trail Running Shoes");
    pages.insert(page.clone());
    keywords.insert(keyword.clone());

    // Site prefers hand-written descriptions
    let mut site_settings = GeneratorSettings::new();
    site_settings.set(SentenceType::Description, SentenceGenerationType::Manual);
    store.set_site_settings(site_id, site_settings, false).await?;

    let (propagator, changes) = ChangePropagator::from_config(config);
    let worker = RegenerationWorker::new(Arc::new(TracingPipeline), DeliveryPolicy::from(config))
        .spawn(changes);

    let pages_handler =
        SetPageSentenceGenerationTypeHandler::new(access.clone(), pages, store.clone(), propagator);
    let keywords_handler = SetKeywordIsForcedHandler::new(access, keywords);

    let resolver = SettingsResolver::new(store.clone());
    let before = resolver.resolve(page.id, site_id).await?;
    println!("before: settings from {} tier", before.source);

    let change = pages_handler
        .handle(SetPageSentenceGenerationTypeCommand::new(
            Some(owner),
            page.id.to_string(),
            SentenceType::Title,
            SentenceGenerationType::Template,
        ))
        .await?;
    println!(
        "{} on {}: {} -> {}",
        change.sentence_type, change.page_id, change.old, change.new
    );

    let after = resolver.resolve(page.id, site_id).await?;
    println!("after: settings from {} tier", after.source);
    for (sentence_type, generation_type) in after.settings.iter() {
        println!("  {sentence_type}: {generation_type}");
    }

    match pages_handler
        .handle(SetPageSentenceGenerationTypeCommand::new(
            Some(UserId::new()),
            page.id.to_string(),
            SentenceType::H1,
            SentenceGenerationType::Manual,
        ))
        .await
    {
        Ok(_) => println!("stranger was allowed to change the page"),
        Err(e) => println!("stranger rejected: {e}"),
    }

    let updated = keywords_handler
        .handle(SetKeywordIsForcedCommand::new(
            Some(owner),
            keyword.id.to_string(),
            true,
        ))
        .await?;
    println!(
        "keyword {:?} forced={} at {}",
        updated.text.as_str(),
        updated.is_forced,
        updated.date_updated
    );

    drop(pages_handler);
    let stats = worker.await.context("regeneration worker panicked")?;
    println!(
        "regeneration: delivered={} retried={} failed={}",
        stats.delivered, stats.retried, stats.failed
    );
    Ok(())
}
