//! Outbound link to the embedding notebook/dashboard.
//!
//! The controller holds an `Option<Box<dyn HostChannel>>`; `None` is the
//! standalone preview mode where nothing is reported.

use std::io::Write;

use crossbeam::channel::{self, Receiver, Sender};
use serde::Serialize;

use crate::controller::state::OutboundSnapshot;
use crate::error::HostError;

pub trait HostChannel: Send {
    fn signal_ready(&mut self) -> Result<(), HostError>;
    fn push_snapshot(&mut self, snapshot: &OutboundSnapshot) -> Result<(), HostError>;
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum HostMessage {
    Ready,
    Value(OutboundSnapshot),
}

/// Forwards host messages over a channel to whatever bridges to the host.
#[derive(Debug)]
pub struct ChannelHost {
    tx: Sender<HostMessage>,
}

pub fn create_host_channel() -> (ChannelHost, Receiver<HostMessage>) {
    let (tx, rx) = channel::unbounded();
    (ChannelHost { tx }, rx)
}

impl ChannelHost {
    fn send(&self, msg: HostMessage) -> Result<(), HostError> {
        self.tx.send(msg).map_err(|_| HostError::Disconnected)
    }
}

impl HostChannel for ChannelHost {
    fn signal_ready(&mut self) -> Result<(), HostError> {
        self.send(HostMessage::Ready)
    }

    fn push_snapshot(&mut self, snapshot: &OutboundSnapshot) -> Result<(), HostError> {
        self.send(HostMessage::Value(snapshot.clone()))
    }
}

/// Writes one JSON object per message, e.g. to stdout for a parent process.
pub struct JsonLinesHost<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> JsonLinesHost<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, msg: &HostMessage) -> Result<(), HostError> {
        serde_json::to_writer(&mut self.out, msg)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write + Send> HostChannel for JsonLinesHost<W> {
    fn signal_ready(&mut self) -> Result<(), HostError> {
        self.write(&HostMessage::Ready)
    }

    fn push_snapshot(&mut self, snapshot: &OutboundSnapshot) -> Result<(), HostError> {
        self.write(&HostMessage::Value(snapshot.clone()))
    }
}
