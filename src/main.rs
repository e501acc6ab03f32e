//! cur-mean - daily mean cost of an AWS service, computed with Athena.

use cur_mean::athena::AthenaQueryService;
use cur_mean::cli::Cli;
use cur_mean::config::Config;
use cur_mean::error::Result;
use cur_mean::logging;
use cur_mean::pipeline::{self, PipelineSettings, TokioSleeper};
use cur_mean::query::CostQuery;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Optional local overrides for AWS_* and RUST_LOG
    let _ = dotenvy::dotenv();

    logging::init_stderr_logging();

    if let Err(e) = run().await {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    cli.apply_to(&mut config);
    config.validate()?;

    let query = CostQuery::from_config(&config.query);
    if cli.print_query {
        println!("{}", query.to_sql());
        return Ok(());
    }

    info!(
        "Computing mean cost of {} between {} and {}",
        query.service, query.start_date, query.end_date
    );

    let service = AthenaQueryService::connect(&config.aws).await;
    let request = query.to_request(&config.query.output_location);
    let mut stdout = std::io::stdout();

    pipeline::run(
        &service,
        &TokioSleeper,
        &request,
        PipelineSettings::from(&config),
        &mut stdout,
    )
    .await?;

    Ok(())
}
