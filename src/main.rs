use clap::Parser;
use company_finder::utils::{logger, report, validation::Validate};
use company_finder::{CliConfig, FinderEngine, LocalStorage, SearchPipeline};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting company-finder");
    tracing::debug!("CLI config: {:?}", config);

    // Validate configuration
    if let Err(e) = config.validate() {
        std::process::exit(report::report_failure(&e));
    }

    let show_raw = config.show_raw;
    let storage = LocalStorage::new(config.output_path.clone());

    let result = match SearchPipeline::new(storage, config) {
        Ok(pipeline) => FinderEngine::new(pipeline).run().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(search_report) => report::print_report(&search_report, show_raw),
        Err(e) => {
            let exit_code = report::report_failure(&e);
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}
