use std::net::SocketAddr;

use english_study_backend::config::Config;
use english_study_backend::db::Database;
use english_study_backend::services::Providers;
use english_study_backend::state::AppState;
use english_study_backend::{build_app, logging};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();

    let _log_guard = logging::init_tracing(&config.log_level);

    let db = match Database::connect(&config.database_path).await {
        Ok(db) => db,
        Err(err) => {
            tracing::error!(
                error = %err,
                path = %config.database_path.display(),
                "database initialization failed"
            );
            std::process::exit(1);
        }
    };

    let providers = Providers::new(config.endpoints.clone());
    let state = AppState::new(db, providers);
    let app = build_app(state);

    let addr = config.bind_addr();
    tracing::info!(%addr, "english-study-backend listening");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(error = %err, %addr, "bind failed");
            std::process::exit(1);
        }
    };

    let server = axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal());

    if let Err(err) = server.await {
        tracing::error!(error = %err, "server error");
    }

    tracing::info!("shutdown complete");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
