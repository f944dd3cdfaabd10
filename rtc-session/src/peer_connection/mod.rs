//! The peer connection negotiation core.
//!
//! [`RTCPeerConnection`] sits between the application and a media engine. The
//! application calls the W3C-shaped API (`create_offer`,
//! `set_remote_description`, `add_ice_candidate`, ...); the core validates
//! each call against its own state, serializes negotiation through the
//! operations chain and hands the engine work as [`RTCEngineRequest`]s. The
//! engine reports back with [`RTCEngineEvent`]s, which the core filters and
//! turns into [`RTCPeerConnectionEvent`]s for the application.
//!
//! The core performs no I/O and owns no threads. It is driven through the
//! [`sansio::Protocol`] implementation:
//!
//! ```
//! use rtc_session::peer_connection::RTCPeerConnection;
//! use rtc_session::peer_connection::configuration::RTCConfiguration;
//! use rtc_session::peer_connection::engine::RTCEngineRequest;
//! use rtc_session::sansio::Protocol;
//!
//! let mut pc = RTCPeerConnection::new(RTCConfiguration::default());
//! let mut offer = pc.create_offer(None).unwrap();
//!
//! // hand the request to the media engine
//! assert!(matches!(pc.poll_write(), Some(RTCEngineRequest::CreateOffer(_))));
//! assert!(offer.try_recv().is_none());
//! ```

pub mod configuration;
pub mod engine;
pub mod event;
pub mod ice_coordinator;
pub mod negotiator;
pub mod operation;
pub mod sdp;
pub mod state;
pub mod transport;

mod handle;
mod handler;
mod internal;

pub use handle::RTCPeerConnectionHandle;

use std::collections::VecDeque;

use crate::peer_connection::configuration::{RTCAnswerOptions, RTCConfiguration, RTCOfferOptions};
use crate::peer_connection::engine::{RTCEngineEvent, RTCEngineRequest};
use crate::peer_connection::event::{
    EventSink, RTCDataChannelEvent, RTCIceCandidatePairChangeEvent, RTCPeerConnectionEvent,
    RTCTrackEvent,
};
use crate::peer_connection::ice_coordinator::{IceCoordinator, RTCIceCandidateAddOutcome};
use crate::peer_connection::negotiator::DescriptionNegotiator;
use crate::peer_connection::operation::{Completion, PendingOperation, RTCOperationKind, completion};
use crate::peer_connection::sdp::RTCSessionDescription;
use crate::peer_connection::state::{
    RTCIceConnectionState, RTCIceGatheringState, RTCPeerConnectionState, RTCSignalingState,
};
use crate::peer_connection::transport::RTCDtlsTransportState;
use crate::peer_connection::transport::ice::{RTCIceCandidateInit, RTCIceParameters};
use shared::error::{IceError, Result};

/// PeerConnection represents the negotiation side of a WebRTC connection
/// with a remote peer. Media and transports live in the engine; this type
/// decides what the engine is asked to do and what the application is told.
pub struct RTCPeerConnection {
    //////////////////////////////////////////////////
    // PeerConnection W3C Interface Definition
    //////////////////////////////////////////////////
    configuration: RTCConfiguration,
    peer_connection_state: RTCPeerConnectionState,
    dtls_transport_state: RTCDtlsTransportState,
    is_closed: bool,

    remote_tracks: Vec<RTCTrackEvent>,
    data_channels: Vec<RTCDataChannelEvent>,

    //////////////////////////////////////////////////
    // PeerConnection Internal State Machine
    //////////////////////////////////////////////////
    pub(crate) negotiator: DescriptionNegotiator,
    pub(crate) ice: IceCoordinator,

    sink: Option<Box<dyn EventSink>>,
    events: VecDeque<RTCPeerConnectionEvent>,
    requests: VecDeque<RTCEngineRequest>,
}

impl std::fmt::Debug for RTCPeerConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RTCPeerConnection")
            .field("configuration", &self.configuration)
            .field("signaling_state", &self.negotiator.signaling_state())
            .field("peer_connection_state", &self.peer_connection_state)
            .field("pending_operation", &self.negotiator.pending_operation())
            .field("has_event_sink", &self.sink.is_some())
            .finish()
    }
}

impl Default for RTCPeerConnection {
    fn default() -> Self {
        RTCPeerConnection::new(RTCConfiguration::default())
    }
}

impl RTCPeerConnection {
    /// creates a PeerConnection with RTCConfiguration
    pub fn new(configuration: RTCConfiguration) -> Self {
        let negotiator = DescriptionNegotiator::new(configuration.operations_chain_policy());
        let ice = IceCoordinator::new(
            configuration.ice_candidate_buffer_policy(),
            configuration.max_buffered_candidates(),
        );

        RTCPeerConnection {
            configuration,
            peer_connection_state: RTCPeerConnectionState::New,
            dtls_transport_state: RTCDtlsTransportState::New,
            is_closed: false,
            remote_tracks: vec![],
            data_channels: vec![],
            negotiator,
            ice,
            sink: None,
            events: VecDeque::new(),
            requests: VecDeque::new(),
        }
    }

    /// Routes every future event to `sink` instead of the
    /// [`poll_event`](sansio::Protocol::poll_event) queue.
    pub fn with_event_sink(mut self, sink: Box<dyn EventSink>) -> Self {
        self.set_event_sink(sink);
        self
    }

    /// Installs `sink`. Events already queued for `poll_event` are forwarded
    /// to it first, in order. Ignored once the connection is closed.
    pub fn set_event_sink(&mut self, mut sink: Box<dyn EventSink>) {
        if self.is_closed {
            log::debug!("ignoring event sink installed after close");
            return;
        }
        while let Some(event) = self.events.pop_front() {
            sink.on_event(event);
        }
        self.sink = Some(sink);
    }

    /// create_offer asks the engine for an offer.
    /// <https://w3c.github.io/webrtc-pc/#dom-rtcpeerconnection-createoffer>
    ///
    /// Fails right away if the connection is closed or, with the `Reject`
    /// operations chain policy, if another negotiation operation is in
    /// flight. Otherwise the returned [`Completion`] resolves once the engine
    /// has answered.
    pub fn create_offer(
        &mut self,
        options: Option<RTCOfferOptions>,
    ) -> Result<Completion<RTCSessionDescription>> {
        let (done, completion) = completion(RTCOperationKind::CreateOffer);
        self.enqueue_operation(PendingOperation::CreateOffer {
            options: options.unwrap_or_default(),
            done,
        })?;
        Ok(completion)
    }

    /// create_answer asks the engine for an answer to the remote offer.
    /// <https://w3c.github.io/webrtc-pc/#dom-rtcpeerconnection-createanswer>
    pub fn create_answer(
        &mut self,
        options: Option<RTCAnswerOptions>,
    ) -> Result<Completion<RTCSessionDescription>> {
        let (done, completion) = completion(RTCOperationKind::CreateAnswer);
        self.enqueue_operation(PendingOperation::CreateAnswer {
            options: options.unwrap_or_default(),
            done,
        })?;
        Ok(completion)
    }

    /// set_local_description sets the SessionDescription of the local peer.
    /// An offer or answer with an empty `sdp` refers to the last one created.
    /// <https://w3c.github.io/webrtc-pc/#dom-rtcpeerconnection-setlocaldescription>
    pub fn set_local_description(
        &mut self,
        description: RTCSessionDescription,
    ) -> Result<Completion<()>> {
        let (done, completion) = completion(RTCOperationKind::SetLocalDescription);
        self.enqueue_operation(PendingOperation::SetLocalDescription { description, done })?;
        Ok(completion)
    }

    /// set_remote_description sets the SessionDescription of the remote peer.
    /// Buffered remote candidates are applied once it succeeds.
    /// <https://w3c.github.io/webrtc-pc/#dom-rtcpeerconnection-setremotedescription>
    pub fn set_remote_description(
        &mut self,
        description: RTCSessionDescription,
    ) -> Result<Completion<()>> {
        let (done, completion) = completion(RTCOperationKind::SetRemoteDescription);
        self.enqueue_operation(PendingOperation::SetRemoteDescription { description, done })?;
        Ok(completion)
    }

    /// add_ice_candidate accepts a candidate from the remote peer.
    /// <https://w3c.github.io/webrtc-pc/#dom-rtcpeerconnection-addicecandidate>
    ///
    /// Without a remote description the candidate is buffered (or rejected,
    /// per [`RTCIceCandidateBufferPolicy`](configuration::RTCIceCandidateBufferPolicy)).
    pub fn add_ice_candidate(
        &mut self,
        candidate: RTCIceCandidateInit,
    ) -> Result<RTCIceCandidateAddOutcome> {
        if self.is_closed {
            return Err(IceError::Closed.into());
        }

        let outcome = self
            .ice
            .add_ice_candidate(&candidate, self.negotiator.remote_description())?;
        if outcome == RTCIceCandidateAddOutcome::Applied {
            self.requests
                .push_back(RTCEngineRequest::AddIceCandidate(candidate));
        }
        Ok(outcome)
    }

    /// Withdraws remote candidates added earlier. Unknown candidates are
    /// ignored.
    pub fn remove_ice_candidates(&mut self, candidates: &[RTCIceCandidateInit]) -> Result<()> {
        if self.is_closed {
            return Err(IceError::Closed.into());
        }

        let removed = self.ice.remove_ice_candidates(candidates);
        if !removed.is_empty() {
            self.requests
                .push_back(RTCEngineRequest::RemoveIceCandidates(removed));
        }
        Ok(())
    }

    /// restart_ice starts a new ICE generation with fresh local credentials.
    /// <https://w3c.github.io/webrtc-pc/#dom-rtcpeerconnection-restartice>
    pub fn restart_ice(&mut self) -> Result<()> {
        if self.is_closed {
            return Err(IceError::Closed.into());
        }
        self.start_ice_restart();
        Ok(())
    }

    /// Fires `OnNegotiationNeededEvent(event_id)` if negotiation is idle and
    /// `event_id` is still the latest the engine reported. Returns whether
    /// the event fired.
    pub fn maybe_fire_negotiation_needed(&mut self, event_id: u32) -> bool {
        if self.is_closed || !self.negotiator.should_fire_negotiation_needed(event_id) {
            return false;
        }

        self.negotiator.clear_negotiation_needed();
        log::debug!("negotiation needed, event {event_id}");
        self.emit(RTCPeerConnectionEvent::OnNegotiationNeededEvent(event_id));
        true
    }

    /// Feeds one engine callback into the core.
    ///
    /// Events arriving after close are ignored. A state code the core does
    /// not recognize closes the connection and is returned as
    /// [`Error::FatalProtocol`](shared::error::Error::FatalProtocol).
    pub fn apply(&mut self, event: RTCEngineEvent) -> Result<()> {
        if self.is_closed {
            log::trace!("ignoring engine event after close: {event:?}");
            return Ok(());
        }

        let result = self.dispatch_engine_event(event);
        self.deliver_negotiation_needed();
        result
    }

    /// Closes the connection. Pending operations fail with their closed
    /// error, the event sink is released and the engine is asked to shut
    /// down. Calling it again does nothing.
    /// <https://www.w3.org/TR/webrtc/#dom-rtcpeerconnection-close>
    pub fn close(&mut self) -> Result<()> {
        if self.is_closed {
            return Ok(());
        }
        self.do_close();
        Ok(())
    }

    pub fn configuration(&self) -> &RTCConfiguration {
        &self.configuration
    }

    pub fn is_closed(&self) -> bool {
        self.is_closed
    }

    /// signaling_state returns the signaling state of the PeerConnection instance.
    pub fn signaling_state(&self) -> RTCSignalingState {
        self.negotiator.signaling_state()
    }

    /// connection_state returns the current connection state
    pub fn connection_state(&self) -> RTCPeerConnectionState {
        self.peer_connection_state
    }

    pub fn ice_connection_state(&self) -> RTCIceConnectionState {
        self.ice.connection_state()
    }

    pub fn ice_gathering_state(&self) -> RTCIceGatheringState {
        self.ice.gathering_state()
    }

    pub fn dtls_transport_state(&self) -> RTCDtlsTransportState {
        self.dtls_transport_state
    }

    /// local_description returns PendingLocalDescription if it is not null and
    /// otherwise it returns CurrentLocalDescription.
    pub fn local_description(&self) -> Option<&RTCSessionDescription> {
        self.negotiator.local_description()
    }

    pub fn current_local_description(&self) -> Option<&RTCSessionDescription> {
        self.negotiator.current_local_description()
    }

    pub fn pending_local_description(&self) -> Option<&RTCSessionDescription> {
        self.negotiator.pending_local_description()
    }

    /// remote_description returns PendingRemoteDescription if it is not null and
    /// otherwise it returns CurrentRemoteDescription.
    pub fn remote_description(&self) -> Option<&RTCSessionDescription> {
        self.negotiator.remote_description()
    }

    pub fn current_remote_description(&self) -> Option<&RTCSessionDescription> {
        self.negotiator.current_remote_description()
    }

    pub fn pending_remote_description(&self) -> Option<&RTCSessionDescription> {
        self.negotiator.pending_remote_description()
    }

    /// The negotiation operation the engine is currently working on.
    pub fn pending_operation(&self) -> Option<RTCOperationKind> {
        self.negotiator.pending_operation()
    }

    /// Local candidates gathered in the current ICE generation.
    pub fn local_candidates(&self) -> &[RTCIceCandidateInit] {
        self.ice.local_candidates()
    }

    /// Remote candidates handed to the engine so far.
    pub fn remote_candidates(&self) -> &[RTCIceCandidateInit] {
        self.ice.remote_candidates()
    }

    pub fn local_ice_parameters(&self) -> Option<&RTCIceParameters> {
        self.ice.local_parameters()
    }

    pub fn selected_candidate_pair(&self) -> Option<&RTCIceCandidatePairChangeEvent> {
        self.ice.selected_candidate_pair()
    }

    /// Remote tracks announced by the engine and not removed since.
    pub fn remote_tracks(&self) -> &[RTCTrackEvent] {
        &self.remote_tracks
    }

    /// Data channels opened by the remote peer.
    pub fn data_channels(&self) -> &[RTCDataChannelEvent] {
        &self.data_channels
    }
}
