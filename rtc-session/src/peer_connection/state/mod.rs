//! Connection state types.
//!
//! A peer connection tracks several independent state machines:
//!
//! - **[`RTCSignalingState`]** - offer/answer negotiation progress
//! - **[`RTCIceConnectionState`]** - ICE transport connectivity
//! - **[`RTCIceGatheringState`]** - local candidate gathering progress
//! - **[`RTCPeerConnectionState`]** - aggregate of ICE and DTLS transport state
//!
//! Each enum has an `Unspecified` variant which is never a live state. Raw
//! `u8` values reported by the media engine that decode to `Unspecified` are
//! treated as a fatal protocol error by [`RTCPeerConnection`](crate::peer_connection::RTCPeerConnection).

pub(crate) mod ice_connection_state;
pub(crate) mod ice_gathering_state;
pub(crate) mod peer_connection_state;
pub(crate) mod signaling_state;

pub use ice_connection_state::RTCIceConnectionState;
pub use ice_gathering_state::RTCIceGatheringState;
pub use peer_connection_state::RTCPeerConnectionState;
pub use signaling_state::RTCSignalingState;
