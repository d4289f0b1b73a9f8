use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use coin_critters::config::{AppConfig, StoreBackend};
use coin_critters::onboarding::{OnboardingRouteState, onboarding_routes};
use coin_critters::store::{LibSqlProfileStore, LocalProfileStore, ProfileStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("Invalid configuration")?;

    // Initialize tracing, optionally teeing to a daily log file.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (file_layer, _log_guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "coin-critters.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(file_layer)
        .init();

    eprintln!("🐾 Coin Critters v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Variant: {:?}", config.onboarding.variant);
    eprintln!("   Currency: {}", config.onboarding.currency_symbol);

    // ── Profile store ───────────────────────────────────────────────────
    let store: Arc<dyn ProfileStore> = match config.store {
        StoreBackend::Local => {
            eprintln!("   Store: local ({})", config.local_path.display());
            Arc::new(
                LocalProfileStore::new_file(&config.local_path)
                    .await
                    .with_context(|| {
                        format!("Failed to open local store at {}", config.local_path.display())
                    })?,
            )
        }
        StoreBackend::Remote => {
            eprintln!("   Store: libsql ({})", config.db_path.display());
            Arc::new(
                LibSqlProfileStore::new_local(&config.db_path)
                    .await
                    .with_context(|| {
                        format!("Failed to open database at {}", config.db_path.display())
                    })?,
            )
        }
    };

    // ── HTTP ────────────────────────────────────────────────────────────
    let app = onboarding_routes(OnboardingRouteState::new(store, config.onboarding.clone()));
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    eprintln!("   Pages: http://{addr}/");
    eprintln!("   API:   http://{addr}/api/onboarding/status\n");
    tracing::info!(port = config.port, "Onboarding server started");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
