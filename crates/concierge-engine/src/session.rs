//! Session driver: wires the controller to a responder on the tokio runtime.
//!
//! The controller itself is synchronous; the session owns the async edge.
//! Each accepted submit spawns one task that runs the responder call and
//! reports its settlement over a channel, which the host loop drains between
//! events. All state mutation stays on the host loop.

use crate::config::ChatConfig;
use crate::controller::{Controller, RequestId};
use crate::responder::{Reply, Responder, ResponderError};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// The single resumption of an issued request.
#[derive(Debug)]
pub struct Settlement {
    /// Id of the request this settlement belongs to.
    pub request_id: RequestId,
    /// How the call ended.
    pub outcome: Result<Reply, ResponderError>,
}

/// A conversation session: controller, responder, and the settlement channel.
pub struct Session {
    controller: Controller,
    responder: Arc<dyn Responder>,
    settle_tx: mpsc::UnboundedSender<Settlement>,
    settle_rx: mpsc::UnboundedReceiver<Settlement>,
}

impl Session {
    /// Create a session over the given responder.
    pub fn new(responder: Arc<dyn Responder>, config: &ChatConfig) -> Self {
        let (settle_tx, settle_rx) = mpsc::unbounded_channel();
        Self {
            controller: Controller::from_config(config),
            responder,
            settle_tx,
            settle_rx,
        }
    }

    /// Read access to the conversation state.
    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Replace the draft input text.
    pub fn set_draft_input(&mut self, text: impl Into<String>) {
        self.controller.set_draft_input(text);
    }

    /// Submit the current draft, dispatching the responder call.
    ///
    /// Returns whether the submit was accepted by the eligibility gate.
    pub fn submit(&mut self) -> bool {
        let Some(request) = self.controller.submit() else {
            return false;
        };

        let responder = Arc::clone(&self.responder);
        let tx = self.settle_tx.clone();
        // Send failures are ignored: a dropped receiver means the session
        // itself is gone.
        tokio::spawn(async move {
            let outcome = responder
                .respond(&request.message, &request.history, request.cancel.clone())
                .await;
            let _ = tx.send(Settlement {
                request_id: request.id,
                outcome,
            });
        });
        true
    }

    /// Request cancellation of the in-flight call, if any.
    pub fn cancel(&mut self) {
        self.controller.cancel();
    }

    /// Record the user's satisfied/not-satisfied judgment.
    pub fn provide_feedback(&mut self, satisfied: bool) {
        self.controller.provide_feedback(satisfied);
    }

    /// Start over with a fresh conversation instance.
    pub fn reset_conversation(&mut self) {
        self.controller.reset_conversation();
    }

    /// Drain and apply any settlements that have arrived.
    ///
    /// Non-blocking; intended to run on every UI tick. Returns the number of
    /// settlements applied.
    pub fn poll_settlements(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(settlement) = self.settle_rx.try_recv() {
            self.controller
                .settle(settlement.request_id, settlement.outcome);
            applied += 1;
        }
        if applied > 0 {
            debug!(applied, "settlements applied");
        }
        applied
    }

    /// Wait for the next settlement and apply it.
    ///
    /// Returns `false` if the channel is closed. Used by tests and headless
    /// drivers that want to block instead of polling.
    pub async fn settled(&mut self) -> bool {
        match self.settle_rx.recv().await {
            Some(settlement) => {
                self.controller
                    .settle(settlement.request_id, settlement.outcome);
                true
            }
            None => false,
        }
    }
}
