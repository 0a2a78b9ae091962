//! Dev-tooling middleware, status endpoints and live-reload sockets.
//!
//! Projects declaring an SDK at or below [`LEGACY_SDK_MAJOR`] get the
//! legacy attachment (a callback run against the live server); everything
//! else gets the socket endpoints directly.

mod sockets;

pub use sockets::{Broadcaster, EventsSocketServer, MESSAGE_PROTOCOL_VERSION, MessageSocketServer};

use axum::routing::get;
use axum::{Json, Router};
use devhost::{
    AttachedSockets, AttachmentResult, DevTools, DevToolsFactory, DevToolsOptions, MiddlewareStack,
    ProjectDescriptor, Protocol, RunningServer, WebsocketEndpoints,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Last SDK major version that expects the legacy attach callback.
pub const LEGACY_SDK_MAJOR: u32 = 44;

pub const STATUS_PATH: &str = "/status";
pub const STATUS_BODY: &str = "packager-status:running";
pub const INFO_PATH: &str = "/devtools/info";
pub const MESSAGE_PATH: &str = "/message";
pub const EVENTS_PATH: &str = "/events";

/// Body of `GET /devtools/info`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DevToolsInfo {
    pub name: String,
    pub project_root: PathBuf,
    pub port: u16,
    pub watch_folders: Vec<PathBuf>,
    pub protocol: &'static str,
}

pub fn protocol_for(project: &ProjectDescriptor) -> Protocol {
    match project.sdk_major() {
        Some(major) if major <= LEGACY_SDK_MAJOR => Protocol::Legacy,
        _ => Protocol::Current,
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DevToolsMiddlewareFactory;

impl DevToolsFactory for DevToolsMiddlewareFactory {
    fn create(
        &self,
        project_root: &Path,
        options: DevToolsOptions,
        project: &ProjectDescriptor,
    ) -> devhost::Result<DevTools> {
        if options.watch_folders.is_empty() {
            return Err(devhost::Error::DevTools(format!(
                "no watch folders configured for {}",
                project_root.display()
            )));
        }
        let protocol = protocol_for(project);
        let info = DevToolsInfo {
            name: project.name.clone(),
            project_root: project_root.to_path_buf(),
            port: options.port,
            watch_folders: options.watch_folders,
            protocol: match protocol {
                Protocol::Legacy => "legacy",
                Protocol::Current => "current",
            },
        };
        debug!(protocol = info.protocol, "Creating dev tools");

        let endpoints = Router::new()
            .route(STATUS_PATH, get(|| async { STATUS_BODY }))
            .route(
                INFO_PATH,
                get(move || {
                    let info = info.clone();
                    async move { Json(info) }
                }),
            );

        let message = Broadcaster::new();
        let events = Broadcaster::new();
        let mut websocket_endpoints = WebsocketEndpoints::new();
        websocket_endpoints.insert(MESSAGE_PATH, message.route());
        websocket_endpoints.insert(EVENTS_PATH, events.route());

        let attachment = match protocol {
            Protocol::Legacy => AttachmentResult {
                attach_to_server: Some(Box::new(move |server: &RunningServer| {
                    debug!(address = %server.local_addr(), "Attaching sockets to server");
                    AttachedSockets {
                        message_socket: Arc::new(MessageSocketServer::new(message)),
                        events_socket: Arc::new(EventsSocketServer::new(events)),
                    }
                })),
                ..Default::default()
            },
            Protocol::Current => AttachmentResult {
                attach_to_server: None,
                message_socket_endpoint: Some(Arc::new(MessageSocketServer::new(message))),
                events_socket_endpoint: Some(Arc::new(EventsSocketServer::new(events))),
            },
        };

        Ok(DevTools {
            middleware: Arc::new(MiddlewareStack::with_endpoints(endpoints)),
            websocket_endpoints,
            attachment,
        })
    }
}
