use clap::Parser;
use company_finder::core::completion::{build_chat_request, ApiSettings};
use company_finder::core::ConfigProvider;
use company_finder::utils::{logger, report, validation::Validate};
use company_finder::{build_prompt, FinderEngine, LocalStorage, SearchPipeline, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-finder")]
#[command(about = "Company finder driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "finder.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Print the raw model output after the results
    #[arg(long)]
    show_raw: bool,

    /// Dry run - show the prompt and request body without calling the API
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Load TOML configuration
    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    let verbose = args.verbose || config.verbose_logging();
    if config.json_logging() {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("📁 Loaded configuration from: {}", args.config);

    if let Err(e) = config.validate() {
        std::process::exit(report::report_failure(&e));
    }

    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no request will be sent");
        if let Err(e) = perform_dry_run(&config) {
            std::process::exit(report::report_failure(&e));
        }
        return;
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let result = match SearchPipeline::new(storage, config) {
        Ok(pipeline) => FinderEngine::new(pipeline).run().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(search_report) => report::print_report(&search_report, args.show_raw),
        Err(e) => {
            let exit_code = report::report_failure(&e);
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}

fn display_config_summary(config: &TomlConfig) {
    let filters = config.search_filters();
    let formats: Vec<&str> = config
        .output_formats()
        .iter()
        .map(|f| f.file_name())
        .collect();

    println!("📋 Configuration Summary:");
    println!("  Endpoint: {}", config.api_endpoint());
    println!("  Model: {}", config.model());
    println!("  Reasoning: {}", config.reasoning_enabled());
    println!(
        "  API key: {}",
        if config.api_key().is_some() { "set" } else { "missing" }
    );
    println!("  Max companies: {}", filters.max_results);
    println!("  Output: {} ({})", config.output_path(), formats.join(", "));
    println!();
}

fn perform_dry_run(config: &TomlConfig) -> company_finder::Result<()> {
    let settings = ApiSettings::from_config(config);
    let prompt = build_prompt(&config.search_filters());
    let request = build_chat_request(&settings, &prompt);

    println!("🔍 Dry Run:");
    println!();
    println!("📝 Prompt:");
    println!("{}", prompt);
    println!("📡 Request body:");
    println!("{}", serde_json::to_string_pretty(&request)?);

    if !settings.web_search_enabled() {
        println!();
        println!("⚠️ Model has no ':online' suffix; web search will not be used");
    }

    Ok(())
}
