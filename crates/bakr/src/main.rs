use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use bakr_core::{
    config::Config,
    session::{MemorySessionStore, SessionStore},
    store::{ConcertStore, SqliteConcertStore},
};

#[tokio::main]
async fn main() -> Result<(), bakr_core::Error> {
    bakr_core::logging::init("bakr")?;

    let cfg = Arc::new(Config::load()?);

    let store: Arc<dyn ConcertStore> = Arc::new(SqliteConcertStore::open(&cfg.database_path)?);
    tracing::info!(path = %cfg.database_path.display(), "concert database opened");
    let sessions: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("failed to listen for ctrl-c: {e}");
                return;
            }
            tracing::info!("shutting down");
            shutdown.cancel();
        });
    }

    // A dead bot must not take the docs server down with it, and vice versa.
    let http = bakr_http::serve(&cfg, shutdown.clone());
    let bot = bakr_telegram::router::run_polling(cfg.clone(), store, sessions, shutdown.clone());
    let (http_res, bot_res) = tokio::join!(http, bot);

    if let Err(e) = http_res {
        tracing::error!("http server failed: {e}");
    }
    if let Err(e) = bot_res {
        tracing::error!("telegram bot failed: {e}");
    }

    Ok(())
}
