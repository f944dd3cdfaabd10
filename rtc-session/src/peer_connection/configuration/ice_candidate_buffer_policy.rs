use std::fmt;

use serde::{Deserialize, Serialize};

/// What `add_ice_candidate` does with a remote candidate that arrives before
/// any remote description has been applied.
#[derive(Default, Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
pub enum RTCIceCandidateBufferPolicy {
    /// Behaves as `Buffer`.
    #[default]
    Unspecified = 0,

    /// Hold the candidate and apply it once a remote description is set.
    #[serde(rename = "buffer")]
    Buffer = 1,

    /// Fail with `NoRemoteDescription` and let the caller retry.
    #[serde(rename = "reject")]
    Reject = 2,
}

const ICE_CANDIDATE_BUFFER_POLICY_BUFFER_STR: &str = "buffer";
const ICE_CANDIDATE_BUFFER_POLICY_REJECT_STR: &str = "reject";

impl From<&str> for RTCIceCandidateBufferPolicy {
    fn from(raw: &str) -> Self {
        match raw {
            ICE_CANDIDATE_BUFFER_POLICY_BUFFER_STR => RTCIceCandidateBufferPolicy::Buffer,
            ICE_CANDIDATE_BUFFER_POLICY_REJECT_STR => RTCIceCandidateBufferPolicy::Reject,
            _ => RTCIceCandidateBufferPolicy::Unspecified,
        }
    }
}

impl fmt::Display for RTCIceCandidateBufferPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            RTCIceCandidateBufferPolicy::Buffer => {
                write!(f, "{ICE_CANDIDATE_BUFFER_POLICY_BUFFER_STR}")
            }
            RTCIceCandidateBufferPolicy::Reject => {
                write!(f, "{ICE_CANDIDATE_BUFFER_POLICY_REJECT_STR}")
            }
            _ => write!(
                f,
                "{}",
                crate::peer_connection::configuration::UNSPECIFIED_STR
            ),
        }
    }
}
