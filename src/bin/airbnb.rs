use clap::Parser;
use vancouver_insights::config::settings::Settings;
use vancouver_insights::utils::prompt::TerminalPrompter;
use vancouver_insights::utils::{logger, validation::Validate};
use vancouver_insights::{AirbnbArgs, AirbnbConfig, AirbnbPipeline, EtlEngine, InsightError, LocalStorage};

fn fail(e: InsightError) -> ! {
    tracing::error!("❌ Airbnb analysis failed: {} (Severity: {:?})", e, e.severity());
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.severity().exit_code());
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = AirbnbArgs::parse();
    logger::init(args.common.verbose, args.common.json_logs);

    println!("This program analyses Airbnb locations in Vancouver and recommends locations with good amenities nearby.");
    println!("In addition, it lets you filter the results by price range.\n");

    let settings = Settings::load(args.common.config.as_deref()).unwrap_or_else(|e| fail(e));
    if let Err(e) = settings.validate() {
        fail(e);
    }

    let mut config = AirbnbConfig::resolve(&args, &settings);
    if !args.common.no_prompt {
        config.prompt_for_prices(&mut TerminalPrompter::new());
    }
    if let Err(e) = config.validate() {
        fail(e);
    }
    tracing::debug!("Resolved config: {:?}", config);

    let input = LocalStorage::new(config.paths.input_dir.clone());
    let output = LocalStorage::new(config.paths.output_dir.clone());
    if let Err(e) = output.ensure_base_dir() {
        tracing::error!("Cannot create {}", config.paths.output_dir.display());
        fail(e);
    }

    let engine = EtlEngine::new(AirbnbPipeline::new(input, output, config));
    match engine.run().await {
        Ok(report) => {
            println!("✅ Airbnb analysis completed successfully!");
            println!("📁 Results saved to: {}", report.output_dir.display());
        }
        Err(e) => fail(e),
    }

    Ok(())
}
