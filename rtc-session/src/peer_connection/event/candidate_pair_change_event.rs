use crate::peer_connection::transport::ice::RTCIceCandidatePair;

/// The ICE agent switched the pair used to send and receive.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct RTCIceCandidatePairChangeEvent {
    pub selected_candidate_pair: RTCIceCandidatePair,
    pub last_data_received_ms: i64,
    pub reason: String,
    pub estimated_disconnected_time_ms: i64,
}
