//! ServerBuilder for fluent assembly of the HTTP server

use super::exposure::RestExposure;
use super::host::AppState;
use crate::auth::{AdminAccount, LoginRateLimiter, TokenConfig, TokenService};
use crate::config::AppConfig;
use crate::core::clock::{Clock, SystemClock};
use crate::core::error::{ConfigError, RepairError, RepairResult};
use crate::core::service::OrderService;
use crate::core::store::OrderStore;
use crate::storage::InMemoryOrderStore;
use axum::Router;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// How often expired rate-limit windows are purged
const LIMITER_CLEANUP_PERIOD: Duration = Duration::from_secs(60);

/// Builder for the repair-desk HTTP server
///
/// # Example
///
/// ```rust,ignore
/// let app = ServerBuilder::new()
///     .with_store(Arc::new(InMemoryOrderStore::new()))
///     .with_admin(AdminAccount::with_password("admin", "secret"))
///     .with_token_config(TokenConfig::new(secret, 24, "repair-desk"))
///     .build()?;
/// ```
pub struct ServerBuilder {
    store: Option<Arc<dyn OrderStore>>,
    clock: Option<Arc<dyn Clock>>,
    admin: Option<AdminAccount>,
    token_config: Option<TokenConfig>,
    max_login_attempts: u32,
    login_window: Duration,
    static_dir: Option<PathBuf>,
    shutdown: CancellationToken,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            clock: None,
            admin: None,
            token_config: None,
            max_login_attempts: 5,
            login_window: Duration::from_secs(15 * 60),
            static_dir: None,
            shutdown: CancellationToken::new(),
        }
    }

    /// Builder pre-filled from a loaded configuration, store excluded
    pub fn from_config(config: &AppConfig) -> RepairResult<Self> {
        Ok(Self::new()
            .with_clock(config.clock())
            .with_admin(config.admin_account()?)
            .with_token_config(config.token_config()?)
            .with_login_limit(config.rate_limit.max_attempts, config.rate_limit.window())
            .with_static_dir(config.server.static_dir.clone()))
    }

    pub fn with_store(mut self, store: Arc<dyn OrderStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_admin(mut self, admin: AdminAccount) -> Self {
        self.admin = Some(admin);
        self
    }

    pub fn with_token_config(mut self, config: TokenConfig) -> Self {
        self.token_config = Some(config);
        self
    }

    pub fn with_login_limit(mut self, max_attempts: u32, window: Duration) -> Self {
        self.max_login_attempts = max_attempts;
        self.login_window = window;
        self
    }

    pub fn with_static_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.static_dir = dir;
        self
    }

    /// Token cancelled when the server shuts down; background tasks stop with it
    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Assemble the shared state
    ///
    /// Defaults to an in-memory store and the host's local clock. An admin
    /// account and token settings are required.
    pub fn build_state(&self) -> RepairResult<AppState> {
        let store = self
            .store
            .clone()
            .unwrap_or_else(|| Arc::new(InMemoryOrderStore::new()));
        let clock = self
            .clock
            .clone()
            .unwrap_or_else(|| Arc::new(SystemClock::local()));
        let admin = self.admin.clone().ok_or_else(|| missing("admin account"))?;
        let token_config = self
            .token_config
            .clone()
            .ok_or_else(|| missing("token settings"))?;

        Ok(AppState::new(
            OrderService::new(store, clock),
            TokenService::new(token_config),
            admin,
            LoginRateLimiter::new(self.max_login_attempts, self.login_window),
        ))
    }

    /// Build the router without starting background tasks
    pub fn build(self) -> RepairResult<Router> {
        let state = self.build_state()?;
        Ok(RestExposure::build_router(state, self.static_dir))
    }

    /// Bind `addr` and serve until Ctrl-C/SIGTERM
    pub async fn serve(self, addr: &str) -> RepairResult<()> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| RepairError::Internal(format!("failed to bind {}: {}", addr, e)))?;

        let shutdown = self.shutdown.clone();
        tokio::spawn({
            let shutdown = shutdown.clone();
            async move {
                shutdown_signal().await;
                shutdown.cancel();
            }
        });

        self.serve_listener(listener).await
    }

    /// Serve on an already bound listener until the shutdown token fires
    pub async fn serve_listener(self, listener: TcpListener) -> RepairResult<()> {
        let shutdown = self.shutdown.clone();
        let state = self.build_state()?;
        let cleanup = state
            .login_limiter
            .spawn_cleanup(LIMITER_CLEANUP_PERIOD, shutdown.clone());
        let backend = state.service.store().backend_name();
        let app = RestExposure::build_router(state, self.static_dir);

        let local_addr = listener
            .local_addr()
            .map_err(|e| RepairError::Internal(e.to_string()))?;
        tracing::info!(addr = %local_addr, backend, "server listening");

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown.clone().cancelled_owned())
        .await
        .map_err(|e| RepairError::Internal(format!("server error: {}", e)))?;

        shutdown.cancel();
        if let Err(e) = cleanup.await {
            tracing::warn!(error = %e, "rate limiter cleanup task failed");
        }
        tracing::info!("server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn missing(what: &str) -> RepairError {
    ConfigError::MissingField {
        field: what.to_string(),
        context: "server builder".to_string(),
    }
    .into()
}

/// Resolves on Ctrl-C or SIGTERM
pub async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
