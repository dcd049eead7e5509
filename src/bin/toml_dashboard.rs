use clap::Parser;
use customer_360::adapters::selector::{DefaultSelector, PromptSelector};
use customer_360::config::toml_config::TomlConfig;
use customer_360::domain::model::CustomerId;
use customer_360::domain::ports::ConfigProvider;
use customer_360::render::text::render_summary;
use customer_360::utils::error::ErrorSeverity;
use customer_360::utils::{logger, validation::Validate};
use customer_360::{build_source, DashboardEngine, DashboardPipeline, LocalStorage, SourceSettings};

#[derive(Parser)]
#[command(name = "toml-dashboard")]
#[command(about = "Customer 360 dashboard driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "dashboard-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the configured customer
    #[arg(long)]
    customer_id: Option<String>,

    /// Keep prompting for customers after the first render
    #[arg(long)]
    interactive: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Dry run - validate configuration and show the source without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    logger::init_logger(config.log_format(), args.verbose);

    tracing::info!("🚀 Starting TOML-based customer-360");
    tracing::info!("📁 Configuration loaded from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(customer_id) = &args.customer_id {
        config.selection.customer_id = Some(customer_id.clone());
        tracing::info!("🔧 Customer overridden to: {}", customer_id);
    }

    let settings = match config.validate().and_then(|_| config.source_settings()) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &settings);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be fetched or written");
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    let print_summary = config.print_summary();
    let mut initial = DefaultSelector::new(config.customer_id().map(CustomerId::from));

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = DashboardPipeline::new(storage, config, build_source(&settings));
    let engine = DashboardEngine::new_with_monitoring(pipeline, monitor_enabled);

    let on_render = |outcome: &customer_360::core::engine::RenderOutcome| {
        if print_summary {
            println!("{}", render_summary(&outcome.dashboard));
        }
        println!("📁 Dashboard saved to: {}", outcome.output_path);
    };

    let result = if args.interactive {
        let stdin = std::io::stdin();
        let mut prompt = PromptSelector::new(stdin.lock(), std::io::stdout());
        engine
            .run_interactive(&mut initial, &mut prompt, on_render)
            .await
            .map(|_| ())
    } else {
        engine.run(&mut initial).await.map(|outcome| on_render(&outcome))
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ Dashboard generation failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, settings: &SourceSettings) {
    tracing::info!("📋 Dashboard: {}", config.title());
    match settings {
        SourceSettings::Catalog {
            endpoint,
            dataset_id,
            timeout_seconds,
            ..
        } => {
            tracing::info!("📚 Source: AI Catalog {} (dataset {})", endpoint, dataset_id);
            if let Some(timeout) = timeout_seconds {
                tracing::info!("⏱️ Request timeout: {}s", timeout);
            }
        }
        SourceSettings::CsvFile { path } => tracing::info!("📄 Source: CSV file {}", path),
    }
    tracing::info!(
        "🎯 Customer: {}",
        config.customer_id().unwrap_or("first in dataset")
    );
    tracing::info!(
        "📊 Charts: {} bins, kde {}, {}x{}",
        config.histogram_bins(),
        if config.kde_enabled() { "on" } else { "off" },
        config.chart_size().0,
        config.chart_size().1
    );
    tracing::info!("📁 Output path: {}", config.output_path());
}
