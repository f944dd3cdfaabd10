pub(crate) mod candidate;
pub(crate) mod candidate_pair;
pub(crate) mod candidate_type;
pub(crate) mod parameters;

pub use candidate::{
    RTCIceCandidate, RTCIceCandidateInit, RTCIceProtocol, RTCIceTcpCandidateType,
    unmarshal_candidate,
};
pub use candidate_pair::RTCIceCandidatePair;
pub use candidate_type::RTCIceCandidateType;
pub use parameters::RTCIceParameters;
