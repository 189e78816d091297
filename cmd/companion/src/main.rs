//! # Companion Binary
//!
//! The entry point that assembles the application based on compile-time
//! features and runtime settings.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::{router, AppState, Metrics};
use auth_adapters::EventSubVerifier;
use configs::{Settings, StorageBackend, StorageSettings, DiscordSettings};
use domains::{IdeaNotifier, IdeaRepository, SystemClock};
use notify_adapters::NoopNotifier;
use services::{IdeaSubmissionService, VoteCorrelator};
use storage_adapters::InMemoryIdeaRepository;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load settings")?;
    init_tracing(&settings);
    if let Some(path) = &settings.env_file {
        info!(path = %path.display(), "loaded .env");
    }

    // 1. Idea list
    let ideas = idea_repository(&settings.storage)?;

    // 2. New-idea notifications
    let notifier = idea_notifier(&settings.discord)?;

    // 3. Services, wired with explicit dependencies
    let clock = Arc::new(SystemClock);
    let state = AppState {
        correlator: Arc::new(VoteCorrelator::new(ideas.clone(), clock.clone())),
        submissions: Arc::new(IdeaSubmissionService::new(ideas, notifier, clock)),
        verifier: Arc::new(EventSubVerifier::new(settings.twitch.webhook_secret)),
        metrics: Arc::new(Metrics::new()),
    };

    let address = settings.server.address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!(%address, "companion listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("companion shut down");
    Ok(())
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log.filter));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if settings.log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn idea_repository(storage: &StorageSettings) -> anyhow::Result<Arc<dyn IdeaRepository>> {
    match storage.backend {
        StorageBackend::Memory => {
            warn!("using in-memory idea list; ideas are lost on restart");
            Ok(Arc::new(InMemoryIdeaRepository::new(storage.ideas_key.clone())))
        }
        #[cfg(feature = "redis")]
        StorageBackend::Redis => {
            use secrecy::ExposeSecret;

            let url = storage
                .redis_url
                .as_ref()
                .context("storage.redis_url is not set")?;
            let repo = storage_adapters::RedisIdeaRepository::new(
                url.expose_secret(),
                storage.ideas_key.clone(),
                storage.timeout(),
            )?;
            info!(key = %storage.ideas_key, "using redis idea list");
            Ok(Arc::new(repo))
        }
        #[cfg(not(feature = "redis"))]
        StorageBackend::Redis => anyhow::bail!("built without the `redis` feature"),
    }
}

fn idea_notifier(discord: &DiscordSettings) -> anyhow::Result<Arc<dyn IdeaNotifier>> {
    match &discord.webhook_url {
        #[cfg(feature = "discord")]
        Some(url) => {
            let notifier = notify_adapters::DiscordNotifier::new(url.clone(), discord.timeout())?;
            info!("discord notifications enabled");
            Ok(Arc::new(notifier))
        }
        #[cfg(not(feature = "discord"))]
        Some(_) => {
            warn!("discord webhook configured but built without the `discord` feature");
            Ok(Arc::new(NoopNotifier))
        }
        None => Ok(Arc::new(NoopNotifier)),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
