use clinic_api::config::ApiConfig;
use clinic_db::{ClinicStore, PgStore};
use color_eyre::eyre::Result;
use dotenv::dotenv;
use tracing::{info, Level};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();
    dotenv().ok();

    let config = ApiConfig::from_env()?;
    config.ensure_not_production("clear data")?;

    info!("Connecting to database...");
    let store = PgStore::new(clinic_db::create_pool(&config.database_url).await?);

    info!("Connected. Clearing data...");
    store.clear_all().await?;
    info!("Cleared patients and appointments.");

    Ok(())
}
