use std::sync::{Arc, Mutex, MutexGuard};

use crate::peer_connection::RTCPeerConnection;
use crate::peer_connection::configuration::{RTCAnswerOptions, RTCOfferOptions};
use crate::peer_connection::engine::{RTCEngineEvent, RTCEngineRequest};
use crate::peer_connection::event::{EventSink, RTCPeerConnectionEvent};
use crate::peer_connection::ice_coordinator::RTCIceCandidateAddOutcome;
use crate::peer_connection::operation::Completion;
use crate::peer_connection::sdp::RTCSessionDescription;
use crate::peer_connection::state::{RTCPeerConnectionState, RTCSignalingState};
use crate::peer_connection::transport::ice::RTCIceCandidateInit;
use shared::error::Result;

/// A cloneable, thread-safe handle to an [`RTCPeerConnection`].
///
/// Every call locks the connection for its duration, so application threads
/// and the engine thread may use the same connection concurrently. Results
/// of negotiation operations arrive through the returned [`Completion`]s,
/// never while the lock is held by the caller.
#[derive(Debug, Clone)]
pub struct RTCPeerConnectionHandle {
    inner: Arc<Mutex<RTCPeerConnection>>,
}

impl From<RTCPeerConnection> for RTCPeerConnectionHandle {
    fn from(pc: RTCPeerConnection) -> Self {
        RTCPeerConnectionHandle {
            inner: Arc::new(Mutex::new(pc)),
        }
    }
}

impl RTCPeerConnectionHandle {
    pub fn new(pc: RTCPeerConnection) -> Self {
        pc.into()
    }

    /// Locks the connection for a sequence of calls.
    pub fn lock(&self) -> Result<MutexGuard<'_, RTCPeerConnection>> {
        Ok(self.inner.lock()?)
    }

    pub fn set_event_sink(&self, sink: Box<dyn EventSink>) -> Result<()> {
        self.lock()?.set_event_sink(sink);
        Ok(())
    }

    pub fn create_offer(
        &self,
        options: Option<RTCOfferOptions>,
    ) -> Result<Completion<RTCSessionDescription>> {
        self.lock()?.create_offer(options)
    }

    pub fn create_answer(
        &self,
        options: Option<RTCAnswerOptions>,
    ) -> Result<Completion<RTCSessionDescription>> {
        self.lock()?.create_answer(options)
    }

    pub fn set_local_description(&self, description: RTCSessionDescription) -> Result<Completion<()>> {
        self.lock()?.set_local_description(description)
    }

    pub fn set_remote_description(
        &self,
        description: RTCSessionDescription,
    ) -> Result<Completion<()>> {
        self.lock()?.set_remote_description(description)
    }

    pub fn add_ice_candidate(
        &self,
        candidate: RTCIceCandidateInit,
    ) -> Result<RTCIceCandidateAddOutcome> {
        self.lock()?.add_ice_candidate(candidate)
    }

    pub fn remove_ice_candidates(&self, candidates: &[RTCIceCandidateInit]) -> Result<()> {
        self.lock()?.remove_ice_candidates(candidates)
    }

    pub fn restart_ice(&self) -> Result<()> {
        self.lock()?.restart_ice()
    }

    pub fn maybe_fire_negotiation_needed(&self, event_id: u32) -> Result<bool> {
        Ok(self.lock()?.maybe_fire_negotiation_needed(event_id))
    }

    /// Feeds an engine callback, see [`RTCPeerConnection::apply`].
    pub fn apply(&self, event: RTCEngineEvent) -> Result<()> {
        self.lock()?.apply(event)
    }

    pub fn poll_request(&self) -> Result<Option<RTCEngineRequest>> {
        Ok(self.lock()?.poll_request())
    }

    pub fn poll_event(&self) -> Result<Option<RTCPeerConnectionEvent>> {
        Ok(self.lock()?.poll_notification())
    }

    pub fn close(&self) -> Result<()> {
        self.lock()?.close()
    }

    pub fn signaling_state(&self) -> Result<RTCSignalingState> {
        Ok(self.lock()?.signaling_state())
    }

    pub fn connection_state(&self) -> Result<RTCPeerConnectionState> {
        Ok(self.lock()?.connection_state())
    }

    pub fn is_closed(&self) -> Result<bool> {
        Ok(self.lock()?.is_closed())
    }
}
