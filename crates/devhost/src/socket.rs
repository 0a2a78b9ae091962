//! Live-reload socket contracts.

use axum::Router;
use axum::routing::MethodRouter;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Parameters attached to a broadcast message.
pub type BroadcastParams = Map<String, Value>;

/// Push channel to every connected live-reload client.
///
/// This is the only outward command surface of a running dev server.
pub trait MessageSocket: Send + Sync {
    fn broadcast(&self, method: &str, params: Option<BroadcastParams>);
}

/// Websocket upgrade handlers keyed by request path.
///
/// The bundler's server routes these ahead of any other middleware.
#[derive(Clone, Default)]
pub struct WebsocketEndpoints {
    routes: BTreeMap<String, MethodRouter>,
}

impl WebsocketEndpoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, handler: MethodRouter) {
        self.routes.insert(path.into(), handler);
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Route every endpoint on a fresh router.
    pub fn into_router(self) -> Router {
        self.routes
            .into_iter()
            .fold(Router::new(), |router, (path, handler)| {
                router.route(&path, handler)
            })
    }
}

impl fmt::Debug for WebsocketEndpoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.paths()).finish()
    }
}
