use std::fmt;

use super::candidate::RTCIceCandidateInit;

/// A local/remote pairing nominated by the ICE agent.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct RTCIceCandidatePair {
    local: RTCIceCandidateInit,
    remote: RTCIceCandidateInit,
}

impl fmt::Display for RTCIceCandidatePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(local) {} <-> (remote) {}",
            self.local.candidate, self.remote.candidate
        )
    }
}

impl RTCIceCandidatePair {
    pub fn new(local: RTCIceCandidateInit, remote: RTCIceCandidateInit) -> Self {
        RTCIceCandidatePair { local, remote }
    }

    pub fn local(&self) -> &RTCIceCandidateInit {
        &self.local
    }

    pub fn remote(&self) -> &RTCIceCandidateInit {
        &self.remote
    }
}
