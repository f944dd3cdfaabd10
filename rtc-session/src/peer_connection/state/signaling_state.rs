use std::fmt;

use crate::peer_connection::configuration::UNSPECIFIED_STR;
use crate::peer_connection::sdp::RTCSdpType;
use shared::error::{Result, SdpSetError};

/// Which side of the negotiation a description is applied to.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum StateChangeOp {
    #[default]
    SetLocal,
    SetRemote,
}

impl fmt::Display for StateChangeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            StateChangeOp::SetLocal => write!(f, "SetLocal"),
            StateChangeOp::SetRemote => write!(f, "SetRemote"),
        }
    }
}

/// Offer/answer negotiation progress, see
/// <https://www.w3.org/TR/webrtc/#rtcsignalingstate-enum>.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RTCSignalingState {
    Unspecified = 0,

    /// No offer/answer exchange in progress. Also the initial state.
    #[default]
    Stable,

    /// A local offer has been applied.
    HaveLocalOffer,

    /// A remote offer has been applied.
    HaveRemoteOffer,

    /// A remote offer and a local provisional answer have been applied.
    HaveLocalPranswer,

    /// A local offer and a remote provisional answer have been applied.
    HaveRemotePranswer,

    Closed,
}

const SIGNALING_STATE_STABLE_STR: &str = "stable";
const SIGNALING_STATE_HAVE_LOCAL_OFFER_STR: &str = "have-local-offer";
const SIGNALING_STATE_HAVE_REMOTE_OFFER_STR: &str = "have-remote-offer";
const SIGNALING_STATE_HAVE_LOCAL_PRANSWER_STR: &str = "have-local-pranswer";
const SIGNALING_STATE_HAVE_REMOTE_PRANSWER_STR: &str = "have-remote-pranswer";
const SIGNALING_STATE_CLOSED_STR: &str = "closed";

impl From<&str> for RTCSignalingState {
    fn from(raw: &str) -> Self {
        match raw {
            SIGNALING_STATE_STABLE_STR => RTCSignalingState::Stable,
            SIGNALING_STATE_HAVE_LOCAL_OFFER_STR => RTCSignalingState::HaveLocalOffer,
            SIGNALING_STATE_HAVE_REMOTE_OFFER_STR => RTCSignalingState::HaveRemoteOffer,
            SIGNALING_STATE_HAVE_LOCAL_PRANSWER_STR => RTCSignalingState::HaveLocalPranswer,
            SIGNALING_STATE_HAVE_REMOTE_PRANSWER_STR => RTCSignalingState::HaveRemotePranswer,
            SIGNALING_STATE_CLOSED_STR => RTCSignalingState::Closed,
            _ => RTCSignalingState::Unspecified,
        }
    }
}

impl From<u8> for RTCSignalingState {
    fn from(v: u8) -> Self {
        match v {
            1 => RTCSignalingState::Stable,
            2 => RTCSignalingState::HaveLocalOffer,
            3 => RTCSignalingState::HaveRemoteOffer,
            4 => RTCSignalingState::HaveLocalPranswer,
            5 => RTCSignalingState::HaveRemotePranswer,
            6 => RTCSignalingState::Closed,
            _ => RTCSignalingState::Unspecified,
        }
    }
}

impl fmt::Display for RTCSignalingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            RTCSignalingState::Stable => SIGNALING_STATE_STABLE_STR,
            RTCSignalingState::HaveLocalOffer => SIGNALING_STATE_HAVE_LOCAL_OFFER_STR,
            RTCSignalingState::HaveRemoteOffer => SIGNALING_STATE_HAVE_REMOTE_OFFER_STR,
            RTCSignalingState::HaveLocalPranswer => SIGNALING_STATE_HAVE_LOCAL_PRANSWER_STR,
            RTCSignalingState::HaveRemotePranswer => SIGNALING_STATE_HAVE_REMOTE_PRANSWER_STR,
            RTCSignalingState::Closed => SIGNALING_STATE_CLOSED_STR,
            RTCSignalingState::Unspecified => UNSPECIFIED_STR,
        };
        write!(f, "{s}")
    }
}

/// Computes the state reached by applying a description of `sdp_type` on
/// side `op` while in `cur`, or the reason the transition is not allowed.
pub(crate) fn check_next_signaling_state(
    cur: RTCSignalingState,
    op: StateChangeOp,
    sdp_type: RTCSdpType,
) -> Result<RTCSignalingState> {
    use RTCSdpType::*;
    use RTCSignalingState::*;
    use StateChangeOp::*;

    if cur == Closed {
        return Err(SdpSetError::Closed.into());
    }
    if sdp_type == RTCSdpType::Unspecified {
        return Err(SdpSetError::InvalidType.into());
    }
    if sdp_type == Rollback && cur == Stable {
        return Err(SdpSetError::CannotRollback.into());
    }

    // https://www.w3.org/TR/webrtc/#set-description 4.3.1
    let next = match (cur, op, sdp_type) {
        (Stable, SetLocal, Offer) => Some(HaveLocalOffer),
        (Stable, SetRemote, Offer) => Some(HaveRemoteOffer),

        (HaveLocalOffer, SetLocal, Offer) => Some(HaveLocalOffer),
        (HaveLocalOffer, SetLocal, Rollback) => Some(Stable),
        (HaveLocalOffer, SetRemote, Answer) => Some(Stable),
        (HaveLocalOffer, SetRemote, Pranswer) => Some(HaveRemotePranswer),

        (HaveRemotePranswer, SetRemote, Pranswer) => Some(HaveRemotePranswer),
        (HaveRemotePranswer, SetRemote, Answer) => Some(Stable),

        (HaveRemoteOffer, SetRemote, Offer) => Some(HaveRemoteOffer),
        (HaveRemoteOffer, SetRemote, Rollback) => Some(Stable),
        (HaveRemoteOffer, SetLocal, Answer) => Some(Stable),
        (HaveRemoteOffer, SetLocal, Pranswer) => Some(HaveLocalPranswer),

        (HaveLocalPranswer, SetLocal, Pranswer) => Some(HaveLocalPranswer),
        (HaveLocalPranswer, SetLocal, Answer) => Some(Stable),

        _ => None,
    };

    next.ok_or_else(|| {
        SdpSetError::StateMismatch(format!("from {cur} applying {op} {sdp_type}")).into()
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use shared::error::Error;

    #[test]
    fn test_new_signaling_state() {
        let tests = vec![
            ("Unspecified", RTCSignalingState::Unspecified),
            ("stable", RTCSignalingState::Stable),
            ("have-local-offer", RTCSignalingState::HaveLocalOffer),
            ("have-remote-offer", RTCSignalingState::HaveRemoteOffer),
            ("have-local-pranswer", RTCSignalingState::HaveLocalPranswer),
            (
                "have-remote-pranswer",
                RTCSignalingState::HaveRemotePranswer,
            ),
            ("closed", RTCSignalingState::Closed),
        ];

        for (state_string, expected_state) in tests {
            assert_eq!(RTCSignalingState::from(state_string), expected_state);
        }
    }

    #[test]
    fn test_signaling_state_from_u8() {
        let tests = vec![
            (0u8, RTCSignalingState::Unspecified),
            (1, RTCSignalingState::Stable),
            (4, RTCSignalingState::HaveLocalPranswer),
            (6, RTCSignalingState::Closed),
            (7, RTCSignalingState::Unspecified),
            (255, RTCSignalingState::Unspecified),
        ];

        for (raw, expected_state) in tests {
            assert_eq!(RTCSignalingState::from(raw), expected_state, "raw {raw}");
        }
    }

    #[test]
    fn test_signaling_state_string() {
        let tests = vec![
            (RTCSignalingState::Unspecified, "Unspecified"),
            (RTCSignalingState::Stable, "stable"),
            (RTCSignalingState::HaveLocalOffer, "have-local-offer"),
            (RTCSignalingState::HaveRemoteOffer, "have-remote-offer"),
            (RTCSignalingState::HaveLocalPranswer, "have-local-pranswer"),
            (
                RTCSignalingState::HaveRemotePranswer,
                "have-remote-pranswer",
            ),
            (RTCSignalingState::Closed, "closed"),
        ];

        for (state, expected_string) in tests {
            assert_eq!(state.to_string(), expected_string);
        }
    }

    #[test]
    fn test_signaling_state_transitions() {
        let tests = vec![
            (
                "stable->SetLocal(offer)->have-local-offer",
                RTCSignalingState::Stable,
                StateChangeOp::SetLocal,
                RTCSdpType::Offer,
                Ok(RTCSignalingState::HaveLocalOffer),
            ),
            (
                "stable->SetRemote(offer)->have-remote-offer",
                RTCSignalingState::Stable,
                StateChangeOp::SetRemote,
                RTCSdpType::Offer,
                Ok(RTCSignalingState::HaveRemoteOffer),
            ),
            (
                "have-local-offer->SetRemote(answer)->stable",
                RTCSignalingState::HaveLocalOffer,
                StateChangeOp::SetRemote,
                RTCSdpType::Answer,
                Ok(RTCSignalingState::Stable),
            ),
            (
                "have-local-offer->SetRemote(pranswer)->have-remote-pranswer",
                RTCSignalingState::HaveLocalOffer,
                StateChangeOp::SetRemote,
                RTCSdpType::Pranswer,
                Ok(RTCSignalingState::HaveRemotePranswer),
            ),
            (
                "have-local-offer->SetLocal(rollback)->stable",
                RTCSignalingState::HaveLocalOffer,
                StateChangeOp::SetLocal,
                RTCSdpType::Rollback,
                Ok(RTCSignalingState::Stable),
            ),
            (
                "have-remote-pranswer->SetRemote(answer)->stable",
                RTCSignalingState::HaveRemotePranswer,
                StateChangeOp::SetRemote,
                RTCSdpType::Answer,
                Ok(RTCSignalingState::Stable),
            ),
            (
                "have-remote-offer->SetLocal(answer)->stable",
                RTCSignalingState::HaveRemoteOffer,
                StateChangeOp::SetLocal,
                RTCSdpType::Answer,
                Ok(RTCSignalingState::Stable),
            ),
            (
                "have-remote-offer->SetLocal(pranswer)->have-local-pranswer",
                RTCSignalingState::HaveRemoteOffer,
                StateChangeOp::SetLocal,
                RTCSdpType::Pranswer,
                Ok(RTCSignalingState::HaveLocalPranswer),
            ),
            (
                "have-remote-offer->SetRemote(rollback)->stable",
                RTCSignalingState::HaveRemoteOffer,
                StateChangeOp::SetRemote,
                RTCSdpType::Rollback,
                Ok(RTCSignalingState::Stable),
            ),
            (
                "have-local-pranswer->SetLocal(answer)->stable",
                RTCSignalingState::HaveLocalPranswer,
                StateChangeOp::SetLocal,
                RTCSdpType::Answer,
                Ok(RTCSignalingState::Stable),
            ),
            (
                "(invalid) stable->SetRemote(pranswer)",
                RTCSignalingState::Stable,
                StateChangeOp::SetRemote,
                RTCSdpType::Pranswer,
                Err(Error::from(SdpSetError::StateMismatch(
                    "from stable applying SetRemote pranswer".to_owned(),
                ))),
            ),
            (
                "(invalid) stable->SetLocal(answer)",
                RTCSignalingState::Stable,
                StateChangeOp::SetLocal,
                RTCSdpType::Answer,
                Err(Error::from(SdpSetError::StateMismatch(
                    "from stable applying SetLocal answer".to_owned(),
                ))),
            ),
            (
                "(invalid) have-local-offer->SetRemote(offer)",
                RTCSignalingState::HaveLocalOffer,
                StateChangeOp::SetRemote,
                RTCSdpType::Offer,
                Err(Error::from(SdpSetError::StateMismatch(
                    "from have-local-offer applying SetRemote offer".to_owned(),
                ))),
            ),
            (
                "(invalid) have-remote-offer->SetLocal(rollback)",
                RTCSignalingState::HaveRemoteOffer,
                StateChangeOp::SetLocal,
                RTCSdpType::Rollback,
                Err(Error::from(SdpSetError::StateMismatch(
                    "from have-remote-offer applying SetLocal rollback".to_owned(),
                ))),
            ),
            (
                "(invalid) stable->SetRemote(rollback)",
                RTCSignalingState::Stable,
                StateChangeOp::SetRemote,
                RTCSdpType::Rollback,
                Err(Error::from(SdpSetError::CannotRollback)),
            ),
            (
                "(invalid) closed->SetLocal(offer)",
                RTCSignalingState::Closed,
                StateChangeOp::SetLocal,
                RTCSdpType::Offer,
                Err(Error::from(SdpSetError::Closed)),
            ),
            (
                "(invalid) stable->SetLocal(unspecified)",
                RTCSignalingState::Stable,
                StateChangeOp::SetLocal,
                RTCSdpType::Unspecified,
                Err(Error::from(SdpSetError::InvalidType)),
            ),
        ];

        for (desc, cur, op, sdp_type, expected) in tests {
            let result = check_next_signaling_state(cur, op, sdp_type);
            assert_eq!(result, expected, "{desc}");
        }
    }
}
