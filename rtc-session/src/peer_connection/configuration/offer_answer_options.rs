/// Options for [`create_answer`](crate::peer_connection::RTCPeerConnection::create_answer),
/// forwarded to the media engine.
#[derive(Default, Debug, PartialEq, Eq, Copy, Clone)]
pub struct RTCAnswerOptions {
    pub voice_activity_detection: bool,
}

/// Options for [`create_offer`](crate::peer_connection::RTCPeerConnection::create_offer).
#[derive(Default, Debug, PartialEq, Eq, Copy, Clone)]
pub struct RTCOfferOptions {
    /// Restart ICE before creating the offer, so the offer carries fresh
    /// credentials.
    pub ice_restart: bool,
    pub voice_activity_detection: bool,
}
