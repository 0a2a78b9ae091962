//! Running server handles.

use crate::error::{Error, Result};
use crate::middleware::MiddlewareStack;
use crate::socket::MessageSocket;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// What the bundler's server knows about itself when it asks for middleware.
#[derive(Debug, Clone)]
pub struct ServerContext {
    pub project_root: PathBuf,
    pub port: u16,
    pub watch_folders: Vec<PathBuf>,
}

/// Network listener handle returned by a bundler launch.
///
/// Dropping the handle releases the shutdown trigger, which stops servers
/// that were started with graceful shutdown.
pub struct RunningServer {
    local_addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<std::io::Result<()>>>,
}

impl RunningServer {
    /// Wrap a server task that stops when `shutdown` fires.
    pub fn new(
        local_addr: SocketAddr,
        shutdown: oneshot::Sender<()>,
        task: JoinHandle<std::io::Result<()>>,
    ) -> Self {
        Self {
            local_addr,
            shutdown: Some(shutdown),
            task: Some(task),
        }
    }

    /// Handle for a server whose lifetime is managed elsewhere.
    pub fn detached(local_addr: SocketAddr) -> Self {
        Self {
            local_addr,
            shutdown: None,
            task: None,
        }
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.local_addr)
    }

    /// Ask the server to stop and wait for it to finish.
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.join().await
    }

    async fn join(&mut self) -> Result<()> {
        match self.task.take() {
            Some(task) => match task.await {
                Ok(result) => result.map_err(Error::Io),
                Err(e) => Err(Error::Launch(format!("server task aborted: {}", e))),
            },
            None => Ok(()),
        }
    }
}

impl fmt::Debug for RunningServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunningServer")
            .field("local_addr", &self.local_addr)
            .field("managed", &self.task.is_some())
            .finish()
    }
}

/// Normalized result of a bootstrap, identical for both attachment protocols.
pub struct ServerHandle {
    pub server: RunningServer,
    pub middleware: Arc<MiddlewareStack>,
    pub message_socket: Arc<dyn MessageSocket>,
}

impl fmt::Debug for ServerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerHandle")
            .field("server", &self.server)
            .field("middleware", &self.middleware)
            .finish_non_exhaustive()
    }
}
