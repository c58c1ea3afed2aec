//! InnSpot - booking backend for hotel-room reservations

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use innspot::{
    config::Args,
    db::MongoClient,
    server::{self, AppState, UNAUTHENTICATED_WRITES},
    store::MemoryRoomStore,
};

/// Rooms for the in-memory store, from `SEED_ROOMS` when set
fn load_seed_rooms(args: &Args) -> anyhow::Result<MemoryRoomStore> {
    let Some(path) = &args.seed_rooms else {
        return Ok(MemoryRoomStore::new());
    };

    let json = std::fs::read_to_string(path)?;
    let store = MemoryRoomStore::from_seed_json(&json)?;
    info!("Loaded {} seed rooms from {}", store.len(), path.display());
    Ok(store)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("innspot={},info", args.log_level).into());
    let registry = tracing_subscriber::registry().with(filter);
    if args.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!("======================================");
    info!("  InnSpot booking API");
    info!("======================================");
    info!("Listen: {}", args.listen);
    info!("Mode: {}", if args.dev_mode { "DEVELOPMENT" } else { "PRODUCTION" });
    info!("MongoDB database: {}", args.mongodb_db);
    info!("CORS origins: {}", args.cors_origin_list().join(", "));
    info!("Secure cookie: {}", args.cookie_secure);
    info!("======================================");

    // MongoDB is optional in dev mode
    let state = match MongoClient::new(&args.mongodb_uri, &args.mongodb_db).await {
        Ok(mongo) => AppState::with_mongo(args, mongo).await?,
        Err(e) if args.dev_mode => {
            warn!("MongoDB connection failed (dev mode, using in-memory store): {}", e);
            let rooms = load_seed_rooms(&args)?;
            AppState::in_memory(args, rooms)?
        }
        Err(e) => {
            error!("MongoDB connection failed: {}", e);
            std::process::exit(1);
        }
    };

    warn!(
        "These endpoints accept writes without authentication: {}",
        UNAUTHENTICATED_WRITES.join(", ")
    );
    if state.args.dev_mode {
        warn!("Development mode enabled - tokens are signed with an insecure secret");
    }

    server::run(Arc::new(state)).await?;

    info!("InnSpot stopped");
    Ok(())
}
