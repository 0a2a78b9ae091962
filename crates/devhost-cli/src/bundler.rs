//! Local bundler server adapter.
//!
//! Serves project files over HTTP behind the installed middleware enhancer,
//! with websocket endpoints routed ahead of everything else.

use crate::watcher::FileWatcher;
use async_trait::async_trait;
use axum::Router;
use devhost::{
    Bundler, DevServerConfig, ReporterEvent, RunServerOptions, RunningServer, ServerContext,
};
use serde_json::{Map, json};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::services::ServeDir;
use tracing::{debug, info};

pub const INITIALIZE_STARTED: &str = "initialize_started";
pub const INITIALIZE_DONE: &str = "initialize_done";
pub const INITIALIZE_FAILED: &str = "initialize_failed";

fn port_event(kind: &str, port: u16) -> ReporterEvent {
    let mut fields = Map::new();
    fields.insert("port".into(), json!(port));
    ReporterEvent::new(kind, fields)
}

/// Bundler server that serves the project root from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalBundler;

impl LocalBundler {
    /// Build the request pipeline: websockets, then the enhanced core.
    pub fn build_app(
        config: &DevServerConfig,
        options: &RunServerOptions,
        context: &ServerContext,
    ) -> Router {
        let core = Router::new().fallback_service(ServeDir::new(&config.project_root));
        let app = match &config.server.enhance_middleware {
            Some(enhance) => enhance(core, context),
            None => core,
        };
        options
            .websocket_endpoints
            .clone()
            .into_router()
            .fallback_service(app)
    }
}

#[async_trait]
impl Bundler for LocalBundler {
    async fn run_server(
        &self,
        config: DevServerConfig,
        options: RunServerOptions,
    ) -> devhost::Result<RunningServer> {
        let reporter = config.reporter.clone();
        let addr = SocketAddr::new(config.server.host, config.server.port);
        reporter.update(&port_event(INITIALIZE_STARTED, config.server.port));

        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(e) => {
                let mut fields = Map::new();
                fields.insert("error".into(), json!(e.to_string()));
                reporter.update(&ReporterEvent::new(INITIALIZE_FAILED, fields));
                return Err(devhost::Error::Launch(format!(
                    "Failed to bind to {}: {}",
                    addr, e
                )));
            }
        };
        let local_addr = listener.local_addr()?;

        let context = ServerContext {
            project_root: config.project_root.clone(),
            port: local_addr.port(),
            watch_folders: config.watch_folders.clone(),
        };
        let app = Self::build_app(&config, &options, &context);
        debug!(
            hmr = options.hmr_enabled,
            sockets = ?options.websocket_endpoints,
            "Built server pipeline"
        );

        let watcher = if options.watch {
            let watcher = FileWatcher::new(config.watch_folders.clone(), reporter.clone())
                .map_err(|e| devhost::Error::Launch(format!("Failed to start file watcher: {}", e)))?;
            Some(watcher)
        } else {
            None
        };

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let _watcher = watcher;
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        info!(address = %local_addr, "Listening");
        reporter.update(&port_event(INITIALIZE_DONE, local_addr.port()));
        Ok(RunningServer::new(local_addr, shutdown_tx, task))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use devhost::{
        EnhanceMiddleware, Middleware, Reporter, ResolverConfig, ServerConfig, WebsocketEndpoints,
    };
    use parking_lot::Mutex;
    use std::net::{IpAddr, Ipv4Addr};
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    #[derive(Default)]
    struct Kinds(Mutex<Vec<String>>);

    impl Reporter for Kinds {
        fn update(&self, event: &ReporterEvent) {
            self.0
                .lock()
                .push(event.kind().unwrap_or_default().to_string());
        }
    }

    fn config(root: &Path, port: u16, reporter: Arc<Kinds>) -> DevServerConfig {
        DevServerConfig {
            project_root: root.to_path_buf(),
            server: ServerConfig {
                host: IpAddr::V4(Ipv4Addr::LOCALHOST),
                port,
                enhance_middleware: None,
            },
            watch_folders: vec![root.to_path_buf()],
            resolver: ResolverConfig::default(),
            max_workers: None,
            reset_cache: false,
            reporter,
        }
    }

    fn run_options(websocket_endpoints: WebsocketEndpoints) -> RunServerOptions {
        RunServerOptions {
            hmr_enabled: true,
            websocket_endpoints,
            watch: false,
        }
    }

    async fn body(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[tokio::test]
    async fn test_pipeline_order() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("index.js"), "console.log(1)").unwrap();

        let mut config = config(dir.path(), 8081, Arc::default());
        let enhance: EnhanceMiddleware = Arc::new(|core: Middleware, ctx: &ServerContext| {
            let port = ctx.port;
            Router::new()
                .route("/port", get(move || async move { port.to_string() }))
                .fallback_service(core)
        });
        config.server.enhance_middleware = Some(enhance);

        let mut sockets = WebsocketEndpoints::new();
        sockets.insert("/message", get(|| async { "socket" }));
        let context = ServerContext {
            project_root: dir.path().to_path_buf(),
            port: 9999,
            watch_folders: vec![],
        };
        let app = LocalBundler::build_app(&config, &run_options(sockets), &context);

        assert_eq!(body(app.clone(), "/message").await.1, "socket");
        assert_eq!(body(app.clone(), "/port").await.1, "9999");
        assert_eq!(body(app.clone(), "/index.js").await.1, "console.log(1)");
        assert_eq!(body(app, "/missing.js").await.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_run_server_reports_lifecycle() {
        let dir = TempDir::new().unwrap();
        let kinds = Arc::new(Kinds::default());

        let server = LocalBundler
            .run_server(
                config(dir.path(), 0, kinds.clone()),
                run_options(WebsocketEndpoints::new()),
            )
            .await
            .unwrap();
        assert_ne!(server.local_addr().port(), 0);
        assert_eq!(*kinds.0.lock(), vec![INITIALIZE_STARTED, INITIALIZE_DONE]);

        server.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_bind_failure_reports_and_errors() {
        let dir = TempDir::new().unwrap();
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();
        let kinds = Arc::new(Kinds::default());

        let err = LocalBundler
            .run_server(
                config(dir.path(), port, kinds.clone()),
                run_options(WebsocketEndpoints::new()),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, devhost::Error::Launch(_)));
        assert_eq!(*kinds.0.lock(), vec![INITIALIZE_STARTED, INITIALIZE_FAILED]);
    }
}
