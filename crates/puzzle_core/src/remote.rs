//! Best-effort remote mirror.
//!
//! The engine calls the mirror only after a local change is committed. A
//! failing mirror is logged and otherwise ignored; local results never
//! depend on it.

use crate::error::{GameError, GameResult};
use crate::shop::ShopOrder;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, Sender};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MirrorEvent {
    AdCompleted {
        level: u32,
        amount: f64,
    },
    ScoreUpdated {
        #[serde(rename = "playerId")]
        player_id: String,
        score: f64,
    },
    OrderPlaced(ShopOrder),
}

pub trait RemoteMirror {
    fn mirror(&self, event: MirrorEvent) -> GameResult<()>;
}

/// Mirror used when no backend is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMirror;

impl RemoteMirror for NoopMirror {
    fn mirror(&self, event: MirrorEvent) -> GameResult<()> {
        tracing::trace!(?event, "no remote mirror configured");
        Ok(())
    }
}

/// Hands events to another thread (which performs the actual POSTs) without
/// blocking.
#[derive(Debug, Clone)]
pub struct ChannelMirror {
    sender: Sender<MirrorEvent>,
}

impl ChannelMirror {
    pub fn new(sender: Sender<MirrorEvent>) -> Self {
        Self { sender }
    }

    pub fn channel() -> (Self, Receiver<MirrorEvent>) {
        let (sender, receiver) = mpsc::channel();
        (Self::new(sender), receiver)
    }
}

impl RemoteMirror for ChannelMirror {
    fn mirror(&self, event: MirrorEvent) -> GameResult<()> {
        self.sender
            .send(event)
            .map_err(|e| GameError::Remote(format!("mirror receiver gone: {:?}", e.0)))
    }
}
