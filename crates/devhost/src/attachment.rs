//! Reconciles the two socket attachment protocols bundlers expose.
//!
//! Older bundler releases hand back an `attach_to_server` callback that must
//! be invoked with the live server to obtain the message and events sockets.
//! Newer releases provide both socket endpoints up front. Which one is in
//! effect is decided structurally, from the fields that are present, never
//! from a version string.

use crate::error::{Error, Result};
use crate::reporter::EventSink;
use crate::server::RunningServer;
use crate::socket::MessageSocket;
use std::fmt;
use std::sync::Arc;

/// Sockets produced by the legacy attach callback.
pub struct AttachedSockets {
    pub message_socket: Arc<dyn MessageSocket>,
    pub events_socket: Arc<dyn EventSink>,
}

/// Legacy callback that attaches sockets to a running server.
pub type AttachToServer = Box<dyn FnOnce(&RunningServer) -> AttachedSockets + Send>;

/// Raw attachment fields as reported by the bundler side.
#[derive(Default)]
pub struct AttachmentResult {
    pub attach_to_server: Option<AttachToServer>,
    pub message_socket_endpoint: Option<Arc<dyn MessageSocket>>,
    pub events_socket_endpoint: Option<Arc<dyn EventSink>>,
}

impl fmt::Debug for AttachmentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttachmentResult")
            .field("attach_to_server", &self.attach_to_server.is_some())
            .field("message_socket_endpoint", &self.message_socket_endpoint.is_some())
            .field("events_socket_endpoint", &self.events_socket_endpoint.is_some())
            .finish()
    }
}

/// Which attachment protocol a launch used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Legacy,
    Current,
}

/// An attachment result resolved to exactly one protocol.
pub enum Attachment {
    /// Sockets come from invoking the callback with the live server
    Legacy(AttachToServer),
    /// Sockets are provided directly
    Current {
        message_socket: Arc<dyn MessageSocket>,
        events_socket: Arc<dyn EventSink>,
    },
}

impl Attachment {
    /// Classify a raw result.
    ///
    /// A present `attach_to_server` always selects the legacy protocol, even
    /// if endpoints are present too.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedAttachment`] when neither the callback nor the
    /// complete endpoint pair is present.
    pub fn detect(result: AttachmentResult) -> Result<Self> {
        match result {
            AttachmentResult {
                attach_to_server: Some(attach),
                ..
            } => Ok(Self::Legacy(attach)),
            AttachmentResult {
                attach_to_server: None,
                message_socket_endpoint: Some(message_socket),
                events_socket_endpoint: Some(events_socket),
            } => Ok(Self::Current {
                message_socket,
                events_socket,
            }),
            AttachmentResult {
                message_socket_endpoint: None,
                events_socket_endpoint: None,
                ..
            } => Err(Error::UnsupportedAttachment(
                "neither an attach callback nor socket endpoints were provided",
            )),
            AttachmentResult {
                message_socket_endpoint: None,
                ..
            } => Err(Error::UnsupportedAttachment(
                "events socket endpoint provided without a message socket endpoint",
            )),
            AttachmentResult { .. } => Err(Error::UnsupportedAttachment(
                "message socket endpoint provided without an events socket endpoint",
            )),
        }
    }

    pub fn protocol(&self) -> Protocol {
        match self {
            Self::Legacy(_) => Protocol::Legacy,
            Self::Current { .. } => Protocol::Current,
        }
    }

    /// Resolve the sockets for `server`.
    pub fn attach(self, server: &RunningServer) -> NormalizedSockets {
        match self {
            Self::Legacy(attach) => {
                let AttachedSockets {
                    message_socket,
                    events_socket,
                } = attach(server);
                NormalizedSockets {
                    message_socket,
                    report_event: events_socket,
                    protocol: Protocol::Legacy,
                }
            }
            Self::Current {
                message_socket,
                events_socket,
            } => NormalizedSockets {
                message_socket,
                report_event: events_socket,
                protocol: Protocol::Current,
            },
        }
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Attachment").field(&self.protocol()).finish()
    }
}

/// Uniform socket pair, whichever protocol produced it.
pub struct NormalizedSockets {
    pub message_socket: Arc<dyn MessageSocket>,
    pub report_event: Arc<dyn EventSink>,
    pub protocol: Protocol,
}

impl fmt::Debug for NormalizedSockets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalizedSockets")
            .field("protocol", &self.protocol)
            .finish_non_exhaustive()
    }
}

/// Detect the protocol of `result` and resolve its sockets against `server`.
pub fn normalize(result: AttachmentResult, server: &RunningServer) -> Result<NormalizedSockets> {
    let attachment = Attachment::detect(result)?;
    tracing::debug!(protocol = ?attachment.protocol(), "Attaching live-reload sockets");
    Ok(attachment.attach(server))
}
