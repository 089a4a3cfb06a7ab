//! Rachao Server
//!
//! Player-card records over HTTP, with the overall rating of each player
//! derived asynchronously through a topic exchange.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::{ConfigLoader, get_amqp_url, get_database_url};
use rachao_core::config::{BrokerKind, MessagingConfig};
use rachao_core::events::{InboundReceiver, inbound_message_channel};
use rachao_core::framework::DatabaseProcessor;
use rachao_core::messaging::{AmqpChannel, InMemoryBroker, MessageChannel};
use rachao_core::processors::{AggregateReader, OverallConsumer, OverallProducer};
use server::{build_router, run_server};
use sqlx::postgres::PgPoolOptions;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Rachao - player cards with asynchronously derived overall ratings
#[derive(Parser, Debug)]
#[command(name = "rachao-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./rachao-config.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Run database migrations on startup
    #[arg(long, default_value = "false")]
    migrate: bool,
}

/// The connected broker: where producers publish and where the consumer reads.
struct Messaging {
    channel: Arc<dyn MessageChannel>,
    inbound_rx: InboundReceiver,
    amqp: Option<Arc<AmqpChannel>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before tracing so RUST_LOG set there is honoured
    let dotenv = dotenvy::dotenv();

    // Initialize tracing
    init_tracing();

    match dotenv {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => tracing::debug!("No .env file found"),
        Err(e) => tracing::warn!(error = %e, "Failed to load .env file"),
    }

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting rachao-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let loaded_config = ConfigLoader::new(&args.config, args.listen)
        .load()
        .map_err(|e| {
            tracing::error!("Failed to load configuration: {}", e);
            e
        })?;
    tracing::info!("Configuration loaded from {:?}", args.config);

    // Get database URL from environment
    let database_url = get_database_url().map_err(|e| {
        tracing::error!("DATABASE_URL environment variable not set");
        e
    })?;

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(loaded_config.max_connections)
        .connect(&database_url)
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect to database: {}", e);
            e
        })?;
    tracing::info!("Database connection established");

    // Run migrations if requested
    if args.migrate {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("../migrations")
            .run(&db_pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to run migrations: {}", e);
                e
            })?;
        tracing::info!("Migrations completed successfully");
    }

    // Connect the overall pipeline
    let messaging_config = &loaded_config.messaging;
    let messaging = connect_messaging(messaging_config).await.map_err(|e| {
        tracing::error!("Failed to set up messaging: {}", e);
        e
    })?;

    let processor = DatabaseProcessor::new(db_pool.clone());
    let producer = OverallProducer::new(
        AggregateReader::new(Arc::new(processor.clone())),
        messaging.channel.clone(),
        &messaging_config.exchange,
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let consumer_handle =
        OverallConsumer::new(Arc::new(processor)).spawn(shutdown_rx, messaging.inbound_rx);

    // Build the router
    let state = AppState::new(db_pool.clone(), producer);
    let router = build_router(state);

    // Run the server
    tracing::info!("Starting HTTP server on {}", loaded_config.listen);
    let result = run_server(router, loaded_config.listen).await;

    // Stop the consumer
    let _ = shutdown_tx.send(true);
    if let Err(e) = consumer_handle.await {
        tracing::error!(error = %e, "Overall consumer task failed");
    }

    if let Some(amqp) = messaging.amqp {
        tracing::info!("Closing AMQP connection...");
        if let Err(e) = amqp.close().await {
            tracing::warn!(error = %e, "Failed to close AMQP connection");
        }
    }

    // Close database connections gracefully
    tracing::info!("Closing database connections...");
    db_pool.close().await;
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Declare the exchange, queue and binding on the configured broker and start
/// consuming the overall queue.
async fn connect_messaging(config: &MessagingConfig) -> anyhow::Result<Messaging> {
    match config.broker {
        BrokerKind::Amqp => {
            let url = get_amqp_url()?;
            let amqp = AmqpChannel::connect(&url).await?;
            amqp.declare_topology(&config.exchange, &config.queue, &config.binding_key)
                .await?;

            let (inbound_tx, inbound_rx) = inbound_message_channel();
            // Ends on its own once the subscription or the receiver goes away.
            let _pump = amqp
                .start_consuming(
                    &config.queue,
                    &config.consumer_tag,
                    config.ack_mode,
                    inbound_tx,
                )
                .await?;

            let amqp = Arc::new(amqp);
            Ok(Messaging {
                channel: amqp.clone(),
                inbound_rx,
                amqp: Some(amqp),
            })
        }
        BrokerKind::Memory => {
            tracing::warn!("Using the in-process broker; overall payloads do not survive a restart");
            let broker = InMemoryBroker::new();
            let inbound_rx = broker.declare_queue(&config.queue, config.ack_mode).await;
            broker
                .bind(&config.queue, &config.exchange, &config.binding_key)
                .await?;
            Ok(Messaging {
                channel: Arc::new(broker),
                inbound_rx,
                amqp: None,
            })
        }
    }
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,lapin=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
