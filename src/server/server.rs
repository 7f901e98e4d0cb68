//! HTTP server core implementation

use crate::config::{Config, ServerConfig};
use crate::server::middleware::RequestIdMiddleware;
use crate::server::routes;
use crate::server::state::AppState;
use crate::services::{Notifier, TracingNotifier, spawn_activity_worker};
use crate::storage::StorageLayer;
use crate::utils::error::{DocflowError, Result};
use actix_cors::Cors;
use actix_web::{App, HttpServer as ActixHttpServer, middleware::DefaultHeaders, web};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;

/// HTTP server
pub struct HttpServer {
    config: ServerConfig,
    state: AppState,
    activity_worker: JoinHandle<()>,
}

impl HttpServer {
    /// Connect storage, wire services and start the activity worker
    pub async fn new(config: &Config) -> Result<Self> {
        Self::with_notifier(config, Arc::new(TracingNotifier)).await
    }

    pub async fn with_notifier(config: &Config, notifier: Arc<dyn Notifier>) -> Result<Self> {
        info!("Creating HTTP server");

        let storage = Arc::new(StorageLayer::new(config.storage()).await?);
        let (state, receiver) = AppState::new(config.clone(), storage.clone(), notifier);
        let activity_worker = spawn_activity_worker(
            receiver,
            storage,
            config.collaboration().audit_deadline(),
        );

        Ok(Self {
            config: config.server().clone(),
            state,
            activity_worker,
        })
    }

    /// Create the Actix-web application
    pub fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let server_config = state.config.server().clone();
        let cors = Self::cors(&server_config);

        App::new()
            .app_data(state)
            .app_data(
                web::JsonConfig::default()
                    .limit(server_config.max_body_size)
                    .error_handler(|err, _| DocflowError::bad_request(err.to_string()).into()),
            )
            .app_data(
                web::PathConfig::default()
                    .error_handler(|err, _| DocflowError::validation(err.to_string()).into()),
            )
            .app_data(
                web::QueryConfig::default()
                    .error_handler(|err, _| DocflowError::validation(err.to_string()).into()),
            )
            .wrap(cors)
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .wrap(DefaultHeaders::new().add(("Server", "docflow")))
            .configure(routes::configure_routes)
    }

    fn cors(config: &ServerConfig) -> Cors {
        let cors_config = &config.cors;
        if !cors_config.enabled {
            return Cors::default();
        }

        let mut cors = if cors_config.allows_all_origins() {
            Cors::default().allow_any_origin()
        } else {
            cors_config
                .allowed_origins
                .iter()
                .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        };
        cors = cors
            .allow_any_method()
            .allow_any_header()
            .expose_headers(vec![actix_web::http::header::HeaderName::from_static(
                crate::server::middleware::REQUEST_ID_HEADER,
            )])
            .max_age(cors_config.max_age);
        if cors_config.allow_credentials {
            cors = cors.supports_credentials();
        }
        cors
    }

    /// Start the HTTP server and run until it is stopped
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.address();
        let workers = self.config.worker_count();
        let timeout = Duration::from_secs(self.config.timeout);

        let limiter = self.state.login_limiter.clone();
        let window = Duration::from_secs(
            self.state
                .config
                .auth()
                .login_rate_limit
                .window_secs
                .max(1),
        );
        let cleanup = tokio::spawn(async move {
            let mut interval = tokio::time::interval(window);
            loop {
                interval.tick().await;
                limiter.cleanup_old_entries();
            }
        });

        info!("Starting HTTP server on {} ({} workers)", bind_addr, workers);

        let state = web::Data::new(self.state);
        let server = ActixHttpServer::new(move || Self::create_app(state.clone()))
            .workers(workers)
            .client_request_timeout(timeout)
            .disable_signals()
            .bind(&bind_addr)
            .map_err(|e| Self::format_bind_error(e, &bind_addr, self.config.port))?
            .run();

        let handle = server.handle();
        let shutdown = tokio::spawn(async move {
            Self::shutdown_signal().await;
            handle.stop(true).await;
        });

        info!("HTTP server listening on {}", bind_addr);
        let result = server.await;
        shutdown.abort();
        cleanup.abort();

        // Every sender is gone once the app factories are dropped
        if tokio::time::timeout(Duration::from_secs(5), self.activity_worker)
            .await
            .is_err()
        {
            warn!("Activity worker did not drain before shutdown");
        }

        result?;
        info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}
