//! Application entry point for jobwatch.
//!
//! Initializes all components, starts the cadence schedulers and the
//! trigger endpoints.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use dotenv::dotenv;
use log::debug;
use log::error;
use log::info;

use jobwatch::config::Config;
use jobwatch::database::Database;
use jobwatch::logging::setup_logging;
use jobwatch::push::PushClient;
use jobwatch::search::JobSearchClient;
use jobwatch::server::run_server;
use jobwatch::service::Services;
use jobwatch::service::cadence::Cadence;
use jobwatch::task::scheduler::CadenceScheduler;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let init_start = Instant::now();
    let config = load_config().await?;

    let db = setup_database(&config, init_start).await?;
    let services = setup_services(&config, db.clone());

    setup_schedulers(&config, services.clone())?;

    let server_services = services.clone();
    let port = config.http_port;
    tokio::spawn(async move {
        if let Err(e) = run_server(server_services, port).await {
            error!("Trigger server stopped: {e}");
        }
    });

    run(init_start).await
}

async fn load_config() -> Result<Arc<Config>> {
    debug!("Loading configuration...");
    let mut config = Config::new();
    config.load()?;
    let config = Arc::new(config);
    setup_logging(&config)?;
    info!("Starting jobwatch...");
    Ok(config)
}

async fn setup_database(config: &Config, init_start: Instant) -> Result<Arc<Database>> {
    debug!("Setting up Database...");
    let db = Arc::new(Database::new(&config.db_url, &config.db_path).await?);

    info!("Running database migrations...");
    db.run_migrations().await?;
    info!(
        "Database setup complete ({:.2}s).",
        init_start.elapsed().as_secs_f64()
    );

    Ok(db)
}

fn setup_services(config: &Arc<Config>, db: Arc<Database>) -> Arc<Services> {
    debug!("Setting up Services...");
    let search = Arc::new(JobSearchClient::new(&config.jobs_api_url));
    let push = Arc::new(PushClient::new(
        &config.push_api_url,
        &config.push_api_user,
        &config.push_api_password,
        config.push_dry_run,
    ));
    Arc::new(Services::new(db, search, push, config.clone()))
}

fn setup_schedulers(config: &Arc<Config>, services: Arc<Services>) -> Result<()> {
    debug!("Setting up Schedulers...");

    for cadence in [Cadence::Daily, Cadence::Weekly, Cadence::Monthly] {
        CadenceScheduler::new(cadence, services.clone(), config.clone()).start()?;
    }

    Ok(())
}

async fn run(init_start: Instant) -> Result<()> {
    info!(
        "jobwatch is up in {:.2}s. Press Ctrl+C to stop.",
        init_start.elapsed().as_secs_f64()
    );

    tokio::signal::ctrl_c().await?;
    info!("Ctrl+C received, shutting down.");

    Ok(())
}
