use super::*;
use crate::peer_connection::event::RTCRtpReceiverId;
use crate::peer_connection::operation::CompletionSender;
use crate::peer_connection::sdp::RTCSdpType;
use crate::peer_connection::state::peer_connection_state::derive_connection_state;
use crate::peer_connection::state::signaling_state::StateChangeOp;
use shared::error::{Error, FatalProtocolError, SdpCreationError, SdpSetError};

/// Decodes a raw engine state code, treating anything that maps to
/// `unspecified` as a protocol violation.
fn decode_state<S>(
    kind: &'static str,
    raw: u8,
    unspecified: S,
) -> std::result::Result<S, FatalProtocolError>
where
    S: From<u8> + PartialEq,
{
    let state = S::from(raw);
    if state == unspecified {
        Err(FatalProtocolError::UnrecognizedState { kind, value: raw })
    } else {
        Ok(state)
    }
}

impl RTCPeerConnection {
    pub(super) fn emit(&mut self, event: RTCPeerConnectionEvent) {
        match self.sink.as_mut() {
            Some(sink) => sink.on_event(event),
            None => self.events.push_back(event),
        }
    }

    pub(super) fn poll_request(&mut self) -> Option<RTCEngineRequest> {
        self.requests.pop_front()
    }

    pub(super) fn poll_notification(&mut self) -> Option<RTCPeerConnectionEvent> {
        self.events.pop_front()
    }

    pub(super) fn enqueue_operation(&mut self, op: PendingOperation) -> Result<()> {
        let kind = op.kind();
        if self.is_closed {
            return Err(kind.closed_error());
        }

        match self.negotiator.admit(op)? {
            Some(op) => self.start_operation(op),
            None => log::debug!(
                "{kind} queued behind {} operation(s)",
                self.negotiator.queued_operations()
            ),
        }
        Ok(())
    }

    fn start_operation(&mut self, op: PendingOperation) {
        log::debug!("starting {}", op.kind());
        let request = match &op {
            PendingOperation::CreateOffer { options, .. } => {
                if options.ice_restart {
                    self.start_ice_restart();
                }
                RTCEngineRequest::CreateOffer(*options)
            }
            PendingOperation::CreateAnswer { options, .. } => {
                RTCEngineRequest::CreateAnswer(*options)
            }
            PendingOperation::SetLocalDescription { description, .. } => {
                RTCEngineRequest::SetLocalDescription(description.clone())
            }
            PendingOperation::SetRemoteDescription { description, .. } => {
                RTCEngineRequest::SetRemoteDescription(description.clone())
            }
        };
        self.negotiator.start(op);
        self.requests.push_back(request);
    }

    /// Starts queued operations until one is in flight or the queue is empty.
    /// Queued operations are validated against the state at the moment they
    /// reach the head of the chain.
    fn advance_operations_chain(&mut self) {
        while self.negotiator.pending_operation().is_none() {
            let Some(mut op) = self.negotiator.next_queued() else {
                break;
            };
            match self.negotiator.prepare(&mut op) {
                Ok(()) => self.start_operation(op),
                Err(err) => {
                    log::debug!("queued {} failed: {err}", op.kind());
                    op.fail(err);
                }
            }
        }
    }

    pub(super) fn start_ice_restart(&mut self) {
        let (parameters, reset) = self.ice.restart();
        log::info!("restarting ICE, generation {}", parameters.generation);
        if let Some(state) = reset {
            self.do_ice_gathering_state_change(state);
        }
        self.requests
            .push_back(RTCEngineRequest::RestartIce(parameters));
    }

    /// Delivers deferred negotiation-needed events once negotiation is idle.
    /// Superseded ids are dropped.
    pub(super) fn deliver_negotiation_needed(&mut self) {
        if self.is_closed
            || !self.negotiator.is_operations_chain_empty()
            || self.negotiator.signaling_state() != RTCSignalingState::Stable
        {
            return;
        }
        if let Some(event_id) = self.negotiator.take_deferred_negotiation_needed() {
            if !self.maybe_fire_negotiation_needed(event_id) {
                log::debug!("dropping stale negotiation needed event {event_id}");
            }
        }
    }

    pub(super) fn dispatch_engine_event(&mut self, event: RTCEngineEvent) -> Result<()> {
        match event {
            RTCEngineEvent::IceCandidate { generation, event } => {
                if let Some(event) = self.ice.on_local_candidate(generation, event) {
                    self.emit(RTCPeerConnectionEvent::OnIceCandidateEvent(event));
                }
            }
            RTCEngineEvent::IceCandidateError(event) => {
                log::warn!(
                    "ice candidate error {} on {}: {}",
                    event.error_code,
                    event.url,
                    event.error_text
                );
                self.emit(RTCPeerConnectionEvent::OnIceCandidateErrorEvent(event));
            }
            RTCEngineEvent::IceCandidatesRemoved(candidates) => {
                let removed = self.ice.on_local_candidates_removed(candidates);
                if !removed.is_empty() {
                    self.emit(RTCPeerConnectionEvent::OnIceCandidatesRemovedEvent(removed));
                }
            }
            RTCEngineEvent::SignalingChange(raw) => {
                let state = self.decode_or_fail(decode_state(
                    "signaling state",
                    raw,
                    RTCSignalingState::Unspecified,
                ))?;
                if state != self.negotiator.signaling_state() {
                    log::warn!(
                        "engine reported signaling state {state}, expected {}; ignoring",
                        self.negotiator.signaling_state()
                    );
                }
            }
            RTCEngineEvent::StandardizedIceConnectionChange(raw) => {
                let state = self.decode_or_fail(decode_state(
                    "ice connection state",
                    raw,
                    RTCIceConnectionState::Unspecified,
                ))?;
                if let Some(state) = self.ice.on_connection_change(state) {
                    self.do_ice_connection_state_change(state);
                    self.update_connection_state();
                }
            }
            RTCEngineEvent::ConnectionChange(raw) => {
                let state = self.decode_or_fail(decode_state(
                    "peer connection state",
                    raw,
                    RTCPeerConnectionState::Unspecified,
                ))?;
                if state != self.peer_connection_state {
                    log::debug!(
                        "engine reported peer connection state {state}, derived {}",
                        self.peer_connection_state
                    );
                }
            }
            RTCEngineEvent::IceConnectionReceivingChange(receiving) => {
                if let Some(receiving) = self.ice.on_receiving_change(receiving) {
                    self.emit(RTCPeerConnectionEvent::OnIceConnectionReceivingChangeEvent(
                        receiving,
                    ));
                }
            }
            RTCEngineEvent::IceGatheringChange { generation, state } => {
                let state = self.decode_or_fail(decode_state(
                    "ice gathering state",
                    state,
                    RTCIceGatheringState::Unspecified,
                ))?;
                if let Some(state) = self.ice.on_gathering_change(generation, state) {
                    self.do_ice_gathering_state_change(state);
                }
            }
            RTCEngineEvent::IceSelectedCandidatePairChanged(event) => {
                self.ice.on_candidate_pair_changed(&event);
                self.emit(RTCPeerConnectionEvent::OnIceSelectedCandidatePairChangeEvent(
                    event,
                ));
            }
            RTCEngineEvent::DataChannel(event) => {
                log::debug!("remote data channel {} opened", event.label);
                self.data_channels.push(event.clone());
                self.emit(RTCPeerConnectionEvent::OnDataChannel(event));
            }
            RTCEngineEvent::NegotiationNeeded(event_id) => {
                log::trace!("engine reported negotiation needed, event {event_id}");
                self.negotiator.record_negotiation_needed(event_id);
            }
            RTCEngineEvent::Track(event) => {
                match self
                    .remote_tracks
                    .iter_mut()
                    .find(|t| t.receiver_id == event.receiver_id)
                {
                    Some(track) => *track = event.clone(),
                    None => self.remote_tracks.push(event.clone()),
                }
                self.emit(RTCPeerConnectionEvent::OnTrack(event));
            }
            RTCEngineEvent::RemoveTrack(receiver_id) => self.remove_track(receiver_id),
            RTCEngineEvent::DtlsStateChange(raw) => {
                let state = self.decode_or_fail(decode_state(
                    "dtls transport state",
                    raw,
                    RTCDtlsTransportState::Unspecified,
                ))?;
                if state != self.dtls_transport_state {
                    log::debug!("dtls transport state changed to {state}");
                    self.dtls_transport_state = state;
                    self.update_connection_state();
                }
            }
            RTCEngineEvent::CreateSessionDescriptionComplete(result) => {
                self.on_create_session_description_complete(result);
            }
            RTCEngineEvent::SetLocalDescriptionComplete(result) => {
                self.on_set_description_complete(StateChangeOp::SetLocal, result);
            }
            RTCEngineEvent::SetRemoteDescriptionComplete(result) => {
                self.on_set_description_complete(StateChangeOp::SetRemote, result);
            }
        }
        Ok(())
    }

    /// Passes a decoded state through, or closes the connection on a fatal
    /// protocol error.
    fn decode_or_fail<S>(&mut self, decoded: std::result::Result<S, FatalProtocolError>) -> Result<S> {
        decoded.map_err(|err| {
            log::error!("{err}; closing peer connection");
            self.emit(RTCPeerConnectionEvent::OnFatalErrorEvent(err.clone()));
            self.do_close();
            Error::FatalProtocol(err)
        })
    }

    fn remove_track(&mut self, receiver_id: RTCRtpReceiverId) {
        let Some(index) = self
            .remote_tracks
            .iter()
            .position(|t| t.receiver_id == receiver_id)
        else {
            log::debug!("ignoring removal of unknown receiver {receiver_id}");
            return;
        };
        self.remote_tracks.remove(index);
        self.emit(RTCPeerConnectionEvent::OnRemoveTrack(receiver_id));
    }

    fn on_create_session_description_complete(
        &mut self,
        result: std::result::Result<RTCSessionDescription, SdpCreationError>,
    ) {
        match self.negotiator.take_current() {
            Some(PendingOperation::CreateOffer { done, .. }) => {
                self.finish_create(RTCOperationKind::CreateOffer, done, result);
            }
            Some(PendingOperation::CreateAnswer { done, .. }) => {
                self.finish_create(RTCOperationKind::CreateAnswer, done, result);
            }
            Some(other) => {
                log::warn!(
                    "engine completed description creation while {} is pending; ignoring",
                    other.kind()
                );
                self.negotiator.restore_current(other);
                return;
            }
            None => {
                log::warn!("engine completed description creation with nothing pending; ignoring");
                return;
            }
        }
        self.advance_operations_chain();
    }

    fn finish_create(
        &mut self,
        kind: RTCOperationKind,
        done: CompletionSender<RTCSessionDescription>,
        result: std::result::Result<RTCSessionDescription, SdpCreationError>,
    ) {
        let result = result.map_err(Error::from).and_then(|mut description| {
            let type_matches = match kind {
                RTCOperationKind::CreateOffer => description.sdp_type == RTCSdpType::Offer,
                _ => matches!(
                    description.sdp_type,
                    RTCSdpType::Answer | RTCSdpType::Pranswer
                ),
            };
            if !type_matches {
                return Err(SdpCreationError::InvalidDescription(format!(
                    "{kind} produced a description of type {}",
                    description.sdp_type
                ))
                .into());
            }
            description
                .ensure_parsed()
                .map_err(|err| SdpCreationError::InvalidDescription(err.to_string()))?;
            Ok(description)
        });

        match &result {
            Ok(description) => {
                log::debug!("{kind} succeeded");
                self.negotiator.record_created(description);
            }
            Err(err) => log::debug!("{kind} failed: {err}"),
        }
        done.complete(result);
    }

    fn on_set_description_complete(
        &mut self,
        op: StateChangeOp,
        result: std::result::Result<(), SdpSetError>,
    ) {
        let (description, done) = match (op, self.negotiator.take_current()) {
            (
                StateChangeOp::SetLocal,
                Some(PendingOperation::SetLocalDescription { description, done }),
            )
            | (
                StateChangeOp::SetRemote,
                Some(PendingOperation::SetRemoteDescription { description, done }),
            ) => (description, done),
            (_, Some(other)) => {
                log::warn!(
                    "engine completed {op} while {} is pending; ignoring",
                    other.kind()
                );
                self.negotiator.restore_current(other);
                return;
            }
            (_, None) => {
                log::warn!("engine completed {op} with nothing pending; ignoring");
                return;
            }
        };

        match result {
            Ok(()) => self.commit_description(op, description, done),
            Err(err) => {
                log::debug!("{op} {} rejected by engine: {err}", description.sdp_type);
                done.complete(Err(err.into()));
            }
        }
        self.advance_operations_chain();
    }

    fn commit_description(
        &mut self,
        op: StateChangeOp,
        description: RTCSessionDescription,
        done: CompletionSender<()>,
    ) {
        match self.negotiator.apply_description(op, description) {
            Ok(changed) => {
                if let Some(state) = changed {
                    self.do_signaling_state_change(state);
                }
                if op == StateChangeOp::SetRemote {
                    self.flush_buffered_candidates();
                }
                done.complete(Ok(()));
            }
            Err(err) => {
                log::warn!("{op} accepted by engine but not applicable: {err}");
                done.complete(Err(err));
            }
        }
    }

    fn flush_buffered_candidates(&mut self) {
        let Some(remote) = self.negotiator.remote_description() else {
            return;
        };
        let applied = self.ice.take_buffered_candidates(remote);
        for candidate in applied {
            log::debug!("applying buffered candidate {candidate}");
            self.requests
                .push_back(RTCEngineRequest::AddIceCandidate(candidate.clone()));
            self.emit(RTCPeerConnectionEvent::OnIceCandidateAppliedEvent(candidate));
        }
    }

    pub(super) fn do_close(&mut self) {
        log::debug!("closing peer connection");
        self.is_closed = true;

        for op in self.negotiator.drain_operations() {
            let kind = op.kind();
            log::debug!("{kind} aborted by close");
            op.fail(kind.closed_error());
        }

        if let Some(state) = self.negotiator.close() {
            self.do_signaling_state_change(state);
        }
        if let Some(state) = self.ice.close() {
            self.do_ice_connection_state_change(state);
        }
        self.update_connection_state();

        self.requests.push_back(RTCEngineRequest::Close);
        self.sink = None;
    }

    fn do_signaling_state_change(&mut self, new_state: RTCSignalingState) {
        log::info!("signaling state changed to {new_state}");
        self.emit(RTCPeerConnectionEvent::OnSignalingStateChangeEvent(new_state));
    }

    fn do_ice_connection_state_change(&mut self, new_state: RTCIceConnectionState) {
        log::info!("ICE connection state changed: {new_state}");
        self.emit(RTCPeerConnectionEvent::OnIceConnectionStateChangeEvent(
            new_state,
        ));
    }

    fn do_ice_gathering_state_change(&mut self, new_state: RTCIceGatheringState) {
        log::info!("ICE gathering state changed: {new_state}");
        self.emit(RTCPeerConnectionEvent::OnIceGatheringStateChangeEvent(
            new_state,
        ));
    }

    /// <https://www.w3.org/TR/webrtc/#rtcpeerconnectionstate-enum>
    fn update_connection_state(&mut self) {
        let connection_state = derive_connection_state(
            self.is_closed,
            self.ice.connection_state(),
            self.dtls_transport_state,
        );

        if self.peer_connection_state == connection_state {
            return;
        }

        log::info!("peer connection state changed: {connection_state}");
        self.peer_connection_state = connection_state;
        self.emit(RTCPeerConnectionEvent::OnConnectionStateChangeEvent(
            connection_state,
        ));
    }
}
