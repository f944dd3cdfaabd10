use crate::peer_connection::transport::ice::RTCIceCandidateInit;

/// A local candidate to be sent to the remote peer.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct RTCPeerConnectionIceEvent {
    pub candidate: RTCIceCandidateInit,
    /// The STUN or TURN server the candidate was gathered from, empty for host
    /// candidates.
    pub url: String,
}
