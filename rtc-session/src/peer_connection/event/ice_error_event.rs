/// A failure reported by the ICE agent while gathering, typically a STUN or
/// TURN server error. `error_code` follows the STUN error codes, or 701 when
/// the server could not be reached.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct RTCPeerConnectionIceErrorEvent {
    pub address: String,
    pub port: u16,
    pub url: String,
    pub error_code: u16,
    pub error_text: String,
}
