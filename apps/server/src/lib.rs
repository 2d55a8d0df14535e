//! # Folio Server
//!
//! The portfolio API on `Axum` and `SurrealDB`, serving the single-page frontend with the
//! administrator's customization blocks rendered into its shell.
//!
//! ## Example
//! ```no_run
//! use folio_server::Server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Server::builder()
//!         .port(5000)
//!         .build()
//!         .await?
//!         .run()
//!         .await
//! }
//! ```

mod router;
mod shell;

use anyhow::{Context, Result};
use axum::Router;
use axum_server::Handle;
use axum_server::tls_rustls::RustlsConfig;
use folio::domain::config::ApiConfig;
use folio::kernel::server::ApiState;
use folio_database::Database;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};

pub use crate::shell::FALLBACK_SHELL;

/// A fluent builder for configuring and initializing the [`Server`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct ServerBuilder {
    cfg: ApiConfig,
}

impl ServerBuilder {
    /// Set up the server's configuration.
    pub fn config(mut self, cfg: ApiConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.cfg.server.port = port;
        self
    }

    async fn init_database(&self) -> Result<Database> {
        let db_cfg = &self.cfg.database;
        let mut builder = Database::builder()
            .url(&db_cfg.url)
            .session(&db_cfg.namespace, &db_cfg.database)
            .migrations(folio::migrations());

        if let Some(creds) = &db_cfg.credentials {
            builder = builder.auth(&creds.username, &creds.password);
        }

        builder.init().await.context("Failed to establish database connection")
    }

    fn validate_ssl_config(&self) -> Result<()> {
        if let Some(ssl) = &self.cfg.server.ssl {
            if !ssl.cert.exists() {
                anyhow::bail!("SSL certificate not found at: {}", ssl.cert.display());
            }
            if !ssl.key.exists() {
                anyhow::bail!("SSL key not found at: {}", ssl.key.display());
            }

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let metadata = ssl.key.metadata()?;
                if metadata.permissions().mode() & 0o077 != 0 {
                    tracing::warn!(key = %ssl.key.display(), "SSL private key is readable by others (expected 600)");
                }
            }
        }
        Ok(())
    }

    /// Consumes the builder and initializes the server.
    ///
    /// Connects the database and applies every slice's migrations, initializes the feature
    /// slices (seeding the administrator and opening the media store), and assembles the state.
    ///
    /// # Errors
    /// Returns an error if:
    /// * the SSL certificate or key is configured but missing
    /// * the database is unreachable or a migration fails
    /// * a slice cannot initialize (invalid admin seed, unusable media directory)
    pub async fn build(self) -> Result<Server> {
        self.validate_ssl_config()?;

        let address = SocketAddr::new(self.cfg.server.address, self.cfg.server.port);
        info!(address = %address, "Initializing server");

        let db = self.init_database().await?;
        let slices = folio::init(&self.cfg, &db).await.context("Platform bootstrap failed")?;

        let state = ApiState::builder()
            .config(self.cfg)
            .db(db)
            .register_slices(slices)
            .build()
            .context("Failed to finalize API state registry")?;
        Ok(Server { state })
    }
}

/// A fully initialized server instance ready to run.
#[must_use = "call .run().await to start the server"]
#[derive(Debug)]
pub struct Server {
    state: ApiState,
}

impl Server {
    /// Returns a new [`ServerBuilder`] to configure the server.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// The complete application: API, docs, uploads and the rendered frontend.
    pub fn router(&self) -> Router {
        router::init(self.state.clone())
    }

    /// Serves the application until SIGINT or SIGTERM, then drains open connections for the
    /// configured grace period.
    ///
    /// # Errors
    /// Returns an error if the listener cannot bind or the TLS material cannot be loaded.
    pub async fn run(self) -> Result<()> {
        let server = &self.state.config.server;
        let address = SocketAddr::new(server.address, server.port);
        let grace = Duration::from_secs(server.shutdown_grace_seconds);
        let tls = server.ssl.clone();

        info!(
            address = %address,
            tls = tls.is_some(),
            slices = ?self.state.slice_names().collect::<Vec<_>>(),
            "Starting server"
        );

        let service = self.router().into_make_service();
        let handle = Handle::<SocketAddr>::new();
        watch_shutdown(handle.clone(), grace);

        match tls {
            Some(ssl) => {
                let rustls = RustlsConfig::from_pem_file(&ssl.cert, &ssl.key)
                    .await
                    .context("Failed to load TLS certificate or key")?;
                info!("Listening on https://{address}");
                axum_server::bind_rustls(address, rustls)
                    .handle(handle)
                    .serve(service)
                    .await
                    .context("HTTPS listener failed")?;
            },
            None => {
                info!("Listening on http://{address}");
                axum_server::bind(address)
                    .handle(handle)
                    .serve(service)
                    .await
                    .context("HTTP listener failed")?;
            },
        }

        info!("Server stopped");
        Ok(())
    }

    #[must_use]
    pub const fn state(&self) -> &ApiState {
        &self.state
    }
}

fn watch_shutdown(handle: Handle<SocketAddr>, grace: Duration) {
    tokio::spawn(async move {
        match shutdown_signal().await {
            Ok(()) => {
                info!(grace_seconds = grace.as_secs(), "Shutdown requested, draining connections");
                handle.graceful_shutdown(Some(grace));
            },
            Err(err) => error!(error = %err, "Shutdown signal handler unavailable"),
        }
    });
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?;
        tokio::select! {
            res = signal::ctrl_c() => res.context("Failed to listen for Ctrl+C")?,
            _ = terminate.recv() => {},
        }
    }

    #[cfg(not(unix))]
    signal::ctrl_c().await.context("Failed to listen for Ctrl+C")?;

    Ok(())
}
