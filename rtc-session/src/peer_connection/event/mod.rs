//! Notifications surfaced to the embedding application.
//!
//! Every state change the core accepts is reported as one
//! [`RTCPeerConnectionEvent`]. The embedder either installs an [`EventSink`]
//! or drains the events with
//! [`poll_event`](sansio::Protocol::poll_event).

use crate::peer_connection::state::{
    RTCIceConnectionState, RTCIceGatheringState, RTCPeerConnectionState, RTCSignalingState,
};
use crate::peer_connection::transport::ice::RTCIceCandidateInit;
use shared::error::FatalProtocolError;

pub mod candidate_pair_change_event;
pub mod data_channel_event;
pub mod ice_error_event;
pub mod ice_event;
pub mod track_event;

pub use candidate_pair_change_event::RTCIceCandidatePairChangeEvent;
pub use data_channel_event::{RTCDataChannelEvent, RTCDataChannelId};
pub use ice_error_event::RTCPeerConnectionIceErrorEvent;
pub use ice_event::RTCPeerConnectionIceEvent;
pub use track_event::{MediaStreamId, MediaStreamTrackId, RTCRtpReceiverId, RTCTrackEvent};

#[allow(clippy::enum_variant_names)]
#[derive(Debug, Clone, PartialEq)]
pub enum RTCPeerConnectionEvent {
    /// Renegotiation is required. Carries the engine's event id.
    OnNegotiationNeededEvent(u32),
    OnIceCandidateEvent(RTCPeerConnectionIceEvent),
    OnIceCandidateErrorEvent(RTCPeerConnectionIceErrorEvent),
    OnIceCandidatesRemovedEvent(Vec<RTCIceCandidateInit>),
    /// A remote candidate held back until a remote description was set has
    /// been handed to the engine.
    OnIceCandidateAppliedEvent(RTCIceCandidateInit),
    OnSignalingStateChangeEvent(RTCSignalingState),
    OnIceConnectionStateChangeEvent(RTCIceConnectionState),
    OnIceConnectionReceivingChangeEvent(bool),
    OnIceGatheringStateChangeEvent(RTCIceGatheringState),
    OnIceSelectedCandidatePairChangeEvent(RTCIceCandidatePairChangeEvent),
    OnConnectionStateChangeEvent(RTCPeerConnectionState),

    OnDataChannel(RTCDataChannelEvent),

    OnTrack(RTCTrackEvent),
    OnRemoveTrack(RTCRtpReceiverId),

    /// The engine reported something the core cannot interpret. The
    /// connection has been closed.
    OnFatalErrorEvent(FatalProtocolError),
}

/// Receives every [`RTCPeerConnectionEvent`] in the order the core produced
/// them.
///
/// The peer connection owns its sink until it is closed. `on_event` runs while
/// the connection is being mutated, so it must not call back into the same
/// connection; forward the event to a channel instead.
pub trait EventSink: Send {
    fn on_event(&mut self, event: RTCPeerConnectionEvent);
}

impl EventSink for tokio::sync::mpsc::UnboundedSender<RTCPeerConnectionEvent> {
    fn on_event(&mut self, event: RTCPeerConnectionEvent) {
        if let Err(err) = self.send(event) {
            log::debug!("event sink receiver dropped: {:?}", err.0);
        }
    }
}

impl EventSink for std::sync::mpsc::Sender<RTCPeerConnectionEvent> {
    fn on_event(&mut self, event: RTCPeerConnectionEvent) {
        if let Err(err) = self.send(event) {
            log::debug!("event sink receiver dropped: {:?}", err.0);
        }
    }
}
