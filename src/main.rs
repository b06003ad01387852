//! `HostelBuddy` entry point: initializes logging and configuration,
//! connects to the database, seeds the room inventory, and prints an
//! occupancy report with a consistency audit.

use hostel_buddy::core::report;
use hostel_buddy::{config, errors::Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing as early as possible
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // .env is optional; env vars can be set externally
    dotenvy::dotenv().ok();

    let db = config::database::create_connection().await?;
    config::database::create_tables(&db).await?;
    info!("Database initialized successfully.");

    // Seed rooms from config.toml when present
    match config::rooms::load_default_config() {
        Ok(room_config) => {
            config::rooms::seed_rooms(&db, &room_config).await?;
        }
        Err(e) => {
            info!("No room configuration loaded ({e}); skipping seeding");
        }
    }

    let summaries = report::occupancy_report(&db).await?;
    info!("{}", report::format_occupancy_report(&summaries));

    let drift = report::audit_occupancy(&db).await?;
    if drift.is_empty() {
        info!("Occupancy audit clean.");
    } else {
        for d in &drift {
            warn!(
                "Occupancy drift in room {}: stored {} vs actual {}",
                d.room_number, d.stored, d.actual
            );
        }
    }

    Ok(())
}
