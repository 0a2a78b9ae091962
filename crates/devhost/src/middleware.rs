//! Dev-tooling middleware stack and enhancer composition.
//!
//! The bundler's server builds its own request handler (the core bundler
//! middleware) and passes it through a single `enhance_middleware` hook
//! before serving. [`compose_enhancer`] produces that hook from the
//! dev-tooling [`MiddlewareStack`] and any enhancer the project config
//! already carried.
//!
//! # Request order
//!
//! ```text
//! request ─▶ stack layers (first used = outermost, incl. telemetry)
//!         ─▶ stack endpoints (/status, sockets, ...)
//!         ─▶ prior enhancer output
//!         ─▶ core bundler middleware
//! ```

use crate::server::ServerContext;
use axum::Router;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// A composable request handler.
pub type Middleware = Router;

/// Hook the bundler's server calls with its core middleware.
pub type EnhanceMiddleware = Arc<dyn Fn(Middleware, &ServerContext) -> Middleware + Send + Sync>;

/// Wraps a middleware in another layer of request handling.
pub type StackLayer = Arc<dyn Fn(Middleware) -> Middleware + Send + Sync>;

/// Dev-tooling middleware: endpoints plus an ordered list of layers.
///
/// Layers can be added after the stack has been handed to the enhancer;
/// they take effect the next time [`MiddlewareStack::wrap`] runs, which is
/// when the bundler's server asks for its middleware.
pub struct MiddlewareStack {
    endpoints: Router,
    layers: RwLock<Vec<(String, StackLayer)>>,
}

impl MiddlewareStack {
    pub fn new() -> Self {
        Self::with_endpoints(Router::new())
    }

    /// Create a stack that serves `endpoints` ahead of any wrapped middleware.
    pub fn with_endpoints(endpoints: Router) -> Self {
        Self {
            endpoints,
            layers: RwLock::new(Vec::new()),
        }
    }

    /// Append a layer. Layers run in the order they were added.
    pub fn use_layer(&self, name: impl Into<String>, layer: StackLayer) {
        self.layers.write().push((name.into(), layer));
    }

    /// Names of the installed layers, in execution order.
    pub fn layer_names(&self) -> Vec<String> {
        self.layers
            .read()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Put this stack in front of `inner`.
    ///
    /// Requests hit the layers first, then the stack's endpoints; anything
    /// the endpoints don't match falls through to `inner`.
    pub fn wrap(&self, inner: Middleware) -> Middleware {
        let mut app = self.endpoints.clone().fallback_service(inner);
        // Router::layer makes the newest layer outermost, so apply in reverse.
        for (_, layer) in self.layers.read().iter().rev() {
            app = layer(app);
        }
        app
    }
}

impl Default for MiddlewareStack {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MiddlewareStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareStack")
            .field("layers", &self.layer_names())
            .finish_non_exhaustive()
    }
}

/// Build the enhancer installed into the bundler config.
///
/// The prior enhancer (if any) sees the core bundler middleware first; the
/// dev-tooling stack then wraps its output. Pure composition: nothing is
/// mutated, the returned hook owns both inputs.
pub fn compose_enhancer(
    stack: Arc<MiddlewareStack>,
    prior: Option<EnhanceMiddleware>,
) -> EnhanceMiddleware {
    Arc::new(move |core: Middleware, server: &ServerContext| {
        let intermediate = match &prior {
            Some(enhance) => enhance(core, server),
            None => core,
        };
        stack.wrap(intermediate)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::Request;
    use axum::http::StatusCode;
    use axum::middleware::{self, Next};
    use axum::routing::get;
    use parking_lot::Mutex;
    use std::path::PathBuf;
    use tower::ServiceExt;

    type Trail = Arc<Mutex<Vec<&'static str>>>;

    fn tracing_layer(trail: Trail, label: &'static str) -> StackLayer {
        Arc::new(move |router: Middleware| {
            let trail = trail.clone();
            router.layer(middleware::from_fn(move |req: Request, next: Next| {
                let trail = trail.clone();
                async move {
                    trail.lock().push(label);
                    next.run(req).await
                }
            }))
        })
    }

    fn core_middleware(trail: Trail) -> Middleware {
        Router::new().fallback(move || {
            let trail = trail.clone();
            async move {
                trail.lock().push("core");
                "bundle"
            }
        })
    }

    fn context() -> ServerContext {
        ServerContext {
            project_root: PathBuf::from("/project"),
            port: 8081,
            watch_folders: vec![PathBuf::from("/project")],
        }
    }

    async fn send(app: Middleware, uri: &str) -> StatusCode {
        let request = axum::http::Request::builder().uri(uri).body(Body::empty()).unwrap();
        app.oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_stack_runs_before_prior_enhancer_and_core() {
        let trail: Trail = Arc::default();
        let stack = Arc::new(MiddlewareStack::new());
        stack.use_layer("devtools", tracing_layer(trail.clone(), "devtools"));

        let prior_trail = trail.clone();
        let prior: EnhanceMiddleware = Arc::new(move |m: Middleware, _: &ServerContext| {
            tracing_layer(prior_trail.clone(), "prior")(m)
        });

        let enhance = compose_enhancer(stack, Some(prior));
        let app = enhance(core_middleware(trail.clone()), &context());

        assert_eq!(send(app, "/index.bundle").await, StatusCode::OK);
        assert_eq!(*trail.lock(), vec!["devtools", "prior", "core"]);
    }

    #[tokio::test]
    async fn test_without_prior_enhancer_core_is_wrapped_directly() {
        let trail: Trail = Arc::default();
        let stack = Arc::new(MiddlewareStack::new());
        stack.use_layer("devtools", tracing_layer(trail.clone(), "devtools"));

        let enhance = compose_enhancer(stack, None);
        let app = enhance(core_middleware(trail.clone()), &context());

        send(app, "/").await;
        assert_eq!(*trail.lock(), vec!["devtools", "core"]);
    }

    #[tokio::test]
    async fn test_layers_run_in_use_order() {
        let trail: Trail = Arc::default();
        let stack = MiddlewareStack::new();
        stack.use_layer("first", tracing_layer(trail.clone(), "first"));
        stack.use_layer("second", tracing_layer(trail.clone(), "second"));

        send(stack.wrap(core_middleware(trail.clone())), "/").await;
        assert_eq!(*trail.lock(), vec!["first", "second", "core"]);
        assert_eq!(stack.layer_names(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_layer_added_after_composition_is_applied() {
        let trail: Trail = Arc::default();
        let stack = Arc::new(MiddlewareStack::new());
        let enhance = compose_enhancer(stack.clone(), None);

        stack.use_layer("telemetry", tracing_layer(trail.clone(), "telemetry"));

        send(enhance(core_middleware(trail.clone()), &context()), "/").await;
        assert_eq!(*trail.lock(), vec!["telemetry", "core"]);
    }

    #[tokio::test]
    async fn test_endpoints_shadow_core() {
        let trail: Trail = Arc::default();
        let stack = MiddlewareStack::with_endpoints(
            Router::new().route("/status", get(|| async { "packager-status:running" })),
        );

        let app = stack.wrap(core_middleware(trail.clone()));
        assert_eq!(send(app.clone(), "/status").await, StatusCode::OK);
        assert!(trail.lock().is_empty());

        send(app, "/main.bundle").await;
        assert_eq!(*trail.lock(), vec!["core"]);
    }
}
