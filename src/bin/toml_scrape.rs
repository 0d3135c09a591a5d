use anyhow::Context;
use clap::Parser;
use price_scrape_etl::core::ConfigProvider;
use price_scrape_etl::utils::{logger, validation::Validate};
use price_scrape_etl::{EtlEngine, LocalStorage, PricePipeline, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-scrape")]
#[command(about = "Price scrape ETL driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "price-etl.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the chart export path from config
    #[arg(long)]
    chart_output: Option<String>,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting TOML-based price scrape");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load config file '{}'", args.config))?;

    if let Some(chart) = &args.chart_output {
        config.report.chart_output = Some(chart.clone());
        tracing::info!("🔧 Chart output overridden to: {}", chart);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No request will be made");
        return Ok(());
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = PricePipeline::with_http_source(storage, config)?;

    match EtlEngine::new(pipeline).run().await {
        Ok(report) => {
            tracing::info!("✅ Done: {} listings priced", report.count);
            Ok(())
        }
        Err(e) => {
            tracing::error!("❌ ETL run failed: {} (Category: {:?})", e, e.category());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    }
}

fn display_config_summary(config: &TomlConfig) {
    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} {}",
        config.pipeline.name,
        config.pipeline.version.as_deref().unwrap_or("")
    );
    println!("  Start URL: {}", config.start_url());
    println!("  Allowed domains: {}", config.allowed_domains().join(", "));
    println!(
        "  Selectors: {} / {} / {}",
        config.container_selector(),
        config.name_selector(),
        config.price_selector()
    );
    println!("  Output: {}", config.output_path());
    println!("  Files: {} -> {}", config.raw_file(), config.cleaned_file());
    println!("  Bins: {}", config.bin_count());
    match config.chart_output() {
        Some(chart) => println!("  Chart: {} (SVG)", chart),
        None => println!("  Chart: terminal"),
    }
    println!();
}
