use std::fmt;

use serde::{Deserialize, Serialize};

/// What happens to a negotiation operation started while another one is
/// still pending.
#[derive(Default, Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
pub enum RTCOperationsChainPolicy {
    /// Behaves as `Reject`.
    #[default]
    Unspecified = 0,

    /// Fail the call immediately with an `OperationInProgress` error.
    #[serde(rename = "reject")]
    Reject = 1,

    /// Append the call to a FIFO queue. It is validated when it starts.
    #[serde(rename = "queue")]
    Queue = 2,
}

const OPERATIONS_CHAIN_POLICY_REJECT_STR: &str = "reject";
const OPERATIONS_CHAIN_POLICY_QUEUE_STR: &str = "queue";

impl From<&str> for RTCOperationsChainPolicy {
    fn from(raw: &str) -> Self {
        match raw {
            OPERATIONS_CHAIN_POLICY_REJECT_STR => RTCOperationsChainPolicy::Reject,
            OPERATIONS_CHAIN_POLICY_QUEUE_STR => RTCOperationsChainPolicy::Queue,
            _ => RTCOperationsChainPolicy::Unspecified,
        }
    }
}

impl fmt::Display for RTCOperationsChainPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            RTCOperationsChainPolicy::Reject => write!(f, "{OPERATIONS_CHAIN_POLICY_REJECT_STR}"),
            RTCOperationsChainPolicy::Queue => write!(f, "{OPERATIONS_CHAIN_POLICY_QUEUE_STR}"),
            _ => write!(
                f,
                "{}",
                crate::peer_connection::configuration::UNSPECIFIED_STR
            ),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_new_operations_chain_policy() {
        let tests = vec![
            ("Unspecified", RTCOperationsChainPolicy::Unspecified),
            ("reject", RTCOperationsChainPolicy::Reject),
            ("queue", RTCOperationsChainPolicy::Queue),
        ];

        for (policy_string, expected_policy) in tests {
            assert_eq!(RTCOperationsChainPolicy::from(policy_string), expected_policy);
            assert_eq!(expected_policy.to_string(), policy_string);
        }
    }
}
