use clap::Parser;
use customer_360::adapters::selector::{DefaultSelector, PromptSelector};
use customer_360::core::engine::RenderOutcome;
use customer_360::domain::model::CustomerId;
use customer_360::domain::ports::ConfigProvider;
use customer_360::render::text::render_summary;
use customer_360::utils::error::{DashboardError, ErrorSeverity};
use customer_360::utils::{logger, validation::Validate};
use customer_360::{build_source, CliConfig, DashboardEngine, DashboardPipeline, LocalStorage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting customer-360");
    if config.verbose {
        tracing::debug!(
            "Output: {}, bins: {}, kde: {}, interactive: {}",
            config.output_path,
            config.bins,
            config.kde_enabled(),
            config.interactive
        );
    }

    // 驗證配置
    let settings = match config.validate().and_then(|_| config.source_settings()) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let interactive = config.interactive;
    let mut initial = DefaultSelector::new(config.customer_id().map(CustomerId::from));

    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = DashboardPipeline::new(storage, config, build_source(&settings));
    let engine = DashboardEngine::new_with_monitoring(pipeline, monitor_enabled);

    let result = if interactive {
        let stdin = std::io::stdin();
        let mut prompt = PromptSelector::new(stdin.lock(), std::io::stdout());
        engine
            .run_interactive(&mut initial, &mut prompt, print_outcome)
            .await
            .map(|_| ())
    } else {
        engine.run(&mut initial).await.map(|outcome| print_outcome(&outcome))
    };

    if let Err(e) = result {
        exit_with(e);
    }

    Ok(())
}

fn print_outcome(outcome: &RenderOutcome) {
    println!("{}", render_summary(&outcome.dashboard));
    println!("📁 Dashboard saved to: {}", outcome.output_path);
}

fn exit_with(e: DashboardError) -> ! {
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
    std::process::exit(exit_code);
}
