//! The boundary with the media engine.
//!
//! The engine feeds [`RTCEngineEvent`]s into
//! [`RTCPeerConnection::apply`](crate::peer_connection::RTCPeerConnection::apply)
//! and executes the [`RTCEngineRequest`]s drained from
//! [`poll_write`](sansio::Protocol::poll_write). State payloads are carried as
//! raw `u8` codes, exactly as the engine reports them, so that values the core
//! does not recognize can be detected.

use crate::peer_connection::configuration::{RTCAnswerOptions, RTCOfferOptions};
use crate::peer_connection::event::{
    RTCDataChannelEvent, RTCIceCandidatePairChangeEvent, RTCPeerConnectionIceErrorEvent,
    RTCPeerConnectionIceEvent, RTCRtpReceiverId, RTCTrackEvent,
};
use crate::peer_connection::sdp::RTCSessionDescription;
use crate::peer_connection::transport::ice::{RTCIceCandidateInit, RTCIceParameters};
use shared::error::{SdpCreationError, SdpSetError};

/// A callback from the media engine.
#[derive(Debug, Clone)]
pub enum RTCEngineEvent {
    /// A local candidate was gathered in ICE generation `generation`.
    IceCandidate {
        generation: u32,
        event: RTCPeerConnectionIceEvent,
    },
    IceCandidateError(RTCPeerConnectionIceErrorEvent),
    IceCandidatesRemoved(Vec<RTCIceCandidateInit>),
    /// Raw `RTCSignalingState` code.
    SignalingChange(u8),
    /// Raw `RTCIceConnectionState` code.
    StandardizedIceConnectionChange(u8),
    /// Raw `RTCPeerConnectionState` code.
    ConnectionChange(u8),
    IceConnectionReceivingChange(bool),
    /// Raw `RTCIceGatheringState` code for ICE generation `generation`.
    IceGatheringChange { generation: u32, state: u8 },
    IceSelectedCandidatePairChanged(RTCIceCandidatePairChangeEvent),
    DataChannel(RTCDataChannelEvent),
    NegotiationNeeded(u32),
    Track(RTCTrackEvent),
    RemoveTrack(RTCRtpReceiverId),
    /// Raw `RTCDtlsTransportState` code.
    DtlsStateChange(u8),

    /// Outcome of the pending `CreateOffer` / `CreateAnswer` request.
    CreateSessionDescriptionComplete(Result<RTCSessionDescription, SdpCreationError>),
    /// Outcome of the pending `SetLocalDescription` request.
    SetLocalDescriptionComplete(Result<(), SdpSetError>),
    /// Outcome of the pending `SetRemoteDescription` request.
    SetRemoteDescriptionComplete(Result<(), SdpSetError>),
}

/// Work the core asks the media engine to perform.
///
/// At most one of `CreateOffer`, `CreateAnswer`, `SetLocalDescription` and
/// `SetRemoteDescription` is outstanding at any time; the engine answers it
/// with the matching completion event.
#[derive(Debug, Clone)]
pub enum RTCEngineRequest {
    CreateOffer(RTCOfferOptions),
    CreateAnswer(RTCAnswerOptions),
    SetLocalDescription(RTCSessionDescription),
    SetRemoteDescription(RTCSessionDescription),
    AddIceCandidate(RTCIceCandidateInit),
    RemoveIceCandidates(Vec<RTCIceCandidateInit>),
    /// Start a new ICE generation with fresh local credentials.
    RestartIce(RTCIceParameters),
    Close,
}

impl RTCEngineRequest {
    /// Whether the request occupies the operations chain.
    pub fn is_negotiation(&self) -> bool {
        matches!(
            self,
            RTCEngineRequest::CreateOffer(_)
                | RTCEngineRequest::CreateAnswer(_)
                | RTCEngineRequest::SetLocalDescription(_)
                | RTCEngineRequest::SetRemoteDescription(_)
        )
    }
}
