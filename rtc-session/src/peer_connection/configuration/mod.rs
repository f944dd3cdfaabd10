//! Peer connection configuration.
//!
//! ```
//! use rtc_session::peer_connection::configuration::{
//!     RTCConfigurationBuilder, RTCIceCandidateBufferPolicy, RTCOperationsChainPolicy,
//! };
//!
//! let config = RTCConfigurationBuilder::new()
//!     .with_operations_chain_policy(RTCOperationsChainPolicy::Queue)
//!     .with_ice_candidate_buffer_policy(RTCIceCandidateBufferPolicy::Buffer)
//!     .with_max_buffered_candidates(32)
//!     .build();
//! assert_eq!(config.operations_chain_policy(), RTCOperationsChainPolicy::Queue);
//! ```

pub mod ice_candidate_buffer_policy;
pub mod offer_answer_options;
pub mod operations_chain_policy;

pub use ice_candidate_buffer_policy::RTCIceCandidateBufferPolicy;
pub use offer_answer_options::{RTCAnswerOptions, RTCOfferOptions};
pub use operations_chain_policy::RTCOperationsChainPolicy;

pub(crate) const UNSPECIFIED_STR: &str = "Unspecified";

/// Used when `max_buffered_candidates` is left at zero.
pub const DEFAULT_MAX_BUFFERED_CANDIDATES: usize = 128;

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct RTCConfiguration {
    pub(crate) operations_chain_policy: RTCOperationsChainPolicy,

    pub(crate) ice_candidate_buffer_policy: RTCIceCandidateBufferPolicy,

    pub(crate) max_buffered_candidates: usize,
}

impl RTCConfiguration {
    /// The effective policy; `Unspecified` resolves to `Reject`.
    pub fn operations_chain_policy(&self) -> RTCOperationsChainPolicy {
        match self.operations_chain_policy {
            RTCOperationsChainPolicy::Unspecified => RTCOperationsChainPolicy::Reject,
            policy => policy,
        }
    }

    /// The effective policy; `Unspecified` resolves to `Buffer`.
    pub fn ice_candidate_buffer_policy(&self) -> RTCIceCandidateBufferPolicy {
        match self.ice_candidate_buffer_policy {
            RTCIceCandidateBufferPolicy::Unspecified => RTCIceCandidateBufferPolicy::Buffer,
            policy => policy,
        }
    }

    pub fn max_buffered_candidates(&self) -> usize {
        if self.max_buffered_candidates == 0 {
            DEFAULT_MAX_BUFFERED_CANDIDATES
        } else {
            self.max_buffered_candidates
        }
    }
}

#[derive(Default)]
pub struct RTCConfigurationBuilder {
    pub(crate) operations_chain_policy: RTCOperationsChainPolicy,

    pub(crate) ice_candidate_buffer_policy: RTCIceCandidateBufferPolicy,

    pub(crate) max_buffered_candidates: usize,
}

impl RTCConfigurationBuilder {
    pub fn new() -> Self {
        RTCConfigurationBuilder::default()
    }

    pub fn with_operations_chain_policy(
        mut self,
        operations_chain_policy: RTCOperationsChainPolicy,
    ) -> Self {
        self.operations_chain_policy = operations_chain_policy;
        self
    }

    pub fn with_ice_candidate_buffer_policy(
        mut self,
        ice_candidate_buffer_policy: RTCIceCandidateBufferPolicy,
    ) -> Self {
        self.ice_candidate_buffer_policy = ice_candidate_buffer_policy;
        self
    }

    pub fn with_max_buffered_candidates(mut self, max_buffered_candidates: usize) -> Self {
        self.max_buffered_candidates = max_buffered_candidates;
        self
    }

    pub fn build(self) -> RTCConfiguration {
        RTCConfiguration {
            operations_chain_policy: self.operations_chain_policy,
            ice_candidate_buffer_policy: self.ice_candidate_buffer_policy,
            max_buffered_candidates: self.max_buffered_candidates,
        }
    }
}
