use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use helpdesk_api::{build_router, config::Config, state::AppState};
use helpdesk_core::Orchestrator;
use helpdesk_llm::ClientFactory;
use helpdesk_persist::PersistClientBuilder;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!("Starting helpdesk API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    tracing::info!(
        provider = ?config.llm.provider,
        model = %config.llm.model,
        timeout_secs = config.llm.timeout_secs,
        "Initializing completion client"
    );
    let client = ClientFactory::create_client_with_timeout(
        config.provider(),
        Duration::from_secs(config.llm.timeout_secs),
    )?;

    let persist = build_persist(&config).await?;
    tracing::info!("Stores ready");

    let orchestrator = Orchestrator::builder()
        .client(client)
        .persist(persist.clone())
        .build()?;

    let state = Arc::new(AppState::new(config.clone(), persist, orchestrator));
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("API docs: http://{}/api/docs", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_persist(config: &Config) -> anyhow::Result<helpdesk_persist::PersistClient> {
    let storage = &config.storage;
    let builder = PersistClientBuilder::new()
        .chats_file(&storage.chats_file)
        .feedback_file(&storage.feedback_file)
        .database_url(&storage.database_url)
        .blob_dir(&storage.blob_dir);

    #[cfg(feature = "mongodb")]
    let builder = match (&config.mongodb_uri, &storage.mongodb_database) {
        (Some(uri), Some(database)) => builder.mongodb(uri, database),
        (Some(_), None) => {
            tracing::warn!("MONGODB_URI is set but storage.mongodb_database is not, using local stores");
            builder
        }
        _ => builder,
    };

    #[cfg(not(feature = "mongodb"))]
    if config.mongodb_uri.is_some() {
        tracing::warn!("MONGODB_URI is set but the server was built without the mongodb feature");
    }

    Ok(builder.build().await?)
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
