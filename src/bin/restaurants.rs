use clap::Parser;
use vancouver_insights::config::settings::Settings;
use vancouver_insights::utils::prompt::TerminalPrompter;
use vancouver_insights::utils::{logger, validation::Validate};
use vancouver_insights::{EtlEngine, InsightError, LocalStorage, RestaurantArgs, RestaurantConfig, RestaurantPipeline};

fn fail(e: InsightError) -> ! {
    tracing::error!("❌ Restaurant analysis failed: {} (Severity: {:?})", e, e.severity());
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.severity().exit_code());
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = RestaurantArgs::parse();
    logger::init(args.common.verbose, args.common.json_logs);

    println!("This program performs statistical analysis on all chain/non-chain restaurants in Vancouver.");
    println!("In addition, it lets you find all Vancouver locations of a particular restaurant.\n");

    let settings = Settings::load(args.common.config.as_deref()).unwrap_or_else(|e| fail(e));
    if let Err(e) = settings.validate() {
        fail(e);
    }

    let mut config = RestaurantConfig::resolve(&args, &settings);
    if !args.common.no_prompt {
        config.prompt_for_restaurant(&mut TerminalPrompter::new());
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

    let engine = EtlEngine::new(RestaurantPipeline::new(input, output, config));
    match engine.run().await {
        Ok(report) => {
            println!("✅ Restaurant analysis completed successfully!");
            println!("📁 Results saved to: {}", report.output_dir.display());
        }
        Err(e) => fail(e),
    }

    Ok(())
}
