#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::unreadable_literal)]

use std::{
    env,
    path::Path,
    sync::{atomic::AtomicBool, Arc},
};

use serenity::{prelude::GatewayIntents, Client};
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info, warn};

use crate::{
    database::{memory::MemoryStore, migration, postgres::giveaways::PostgresStore},
    models::{config::UpdaterConfig, store::GiveawayStore},
};

mod commands;
mod common;
mod database;
mod events;
mod models;

async fn connect_store() -> Option<Arc<dyn GiveawayStore>> {
    let (Ok(main_db_password), Ok(redis_db_password)) =
        (env::var("DB_PASSWORD"), env::var("REDIS_PASSWORD"))
    else {
        warn!("DB_PASSWORD or REDIS_PASSWORD is not set, giveaways will only be kept in memory");
        return Some(Arc::new(MemoryStore::new()));
    };
    let main_db_username = env::var("DB_USER").unwrap_or("postgres".to_string());
    let main_db_host = env::var("DB_HOST").unwrap_or("localhost".to_string());
    let main_db_port = env::var("DB_PORT").unwrap_or("5432".to_string());
    let main_db_name = env::var("DB_NAME").unwrap_or("postgres".to_string());
    let redis_db_host = env::var("REDIS_HOST").unwrap_or("redis".to_string());
    let redis_db_port = env::var("REDIS_PORT").unwrap_or("6379".to_string());

    // Main database connection
    let connection_url = format!(
        "postgres://{main_db_username}:{main_db_password}@{main_db_host}:{main_db_port}/{main_db_name}"
    );
    info!("Establishing connection to main database");
    let main_database = match PgPoolOptions::new().connect(&connection_url).await {
        Ok(pool) => pool,
        Err(err) => {
            error!("Could not connect to main database. Failed with error: {:?}", err);
            return None;
        }
    };
    info!("Running outstanding migrations");
    if let Err(err) = sqlx::migrate!().run(&main_database).await {
        error!("Could not run migrations. Failed with error: {:?}", err);
        return None;
    }
    info!("Connected to main database");

    // Redis database connection
    let redis_connection_url =
        format!("redis://:{redis_db_password}@{redis_db_host}:{redis_db_port}/");
    info!("Establishing connection to Redis database");
    let redis_database = match redis::Client::open(redis_connection_url) {
        Ok(client) => client,
        Err(err) => {
            error!("Could not open Redis client. Failed with error: {:?}", err);
            return None;
        }
    };
    info!("Connected to Redis database");

    Some(Arc::new(PostgresStore::new(main_database, redis_database)))
}

#[tokio::main]
async fn main() {
    let log_level = match env::var("DEBUG").unwrap_or(false.to_string()).as_str() {
        "true" => tracing::Level::DEBUG,
        _ => tracing::Level::INFO,
    };
    tracing_subscriber::fmt().with_max_level(log_level).init();

    info!("Getting environment variables");
    let Ok(discord_token) = env::var("DISCORD_TOKEN") else {
        error!("DISCORD_TOKEN must be set");
        return;
    };
    let config = UpdaterConfig::from_env();

    let Some(store) = connect_store().await else {
        return;
    };

    if let Ok(path) = env::var("GIVEAWAY_MIGRATION_FILE") {
        info!("Importing legacy giveaways from {}", path);
        migration::import_file(store.as_ref(), Path::new(&path)).await;
    }

    // Discord client connection
    let handler = models::handler::Handler {
        store,
        config,
        updater_started: Arc::new(AtomicBool::new(false)),
    };
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::GUILD_MESSAGE_REACTIONS;
    let mut client = match Client::builder(&discord_token, intents)
        .event_handler(handler)
        .await
    {
        Ok(client) => client,
        Err(err) => {
            error!("Could not build Discord client. Failed with error: {}", err);
            return;
        }
    };

    if let Err(err) = client.start_autosharded().await {
        error!(
            "Attempted to start giveaway Discord client, but failed with error: {}",
            err
        );
    }
}
