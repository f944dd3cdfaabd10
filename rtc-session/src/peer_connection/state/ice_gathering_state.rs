use crate::peer_connection::configuration::UNSPECIFIED_STR;
use std::fmt;

/// Local candidate gathering progress. Moves forward only within one ICE
/// generation; an ICE restart starts over at `New`.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RTCIceGatheringState {
    #[default]
    Unspecified,

    New,

    Gathering,

    Complete,
}

const ICE_GATHERING_STATE_NEW_STR: &str = "new";
const ICE_GATHERING_STATE_GATHERING_STR: &str = "gathering";
const ICE_GATHERING_STATE_COMPLETE_STR: &str = "complete";

impl RTCIceGatheringState {
    /// Position along New -> Gathering -> Complete.
    pub(crate) fn progress(&self) -> u8 {
        match *self {
            RTCIceGatheringState::Unspecified => 0,
            RTCIceGatheringState::New => 1,
            RTCIceGatheringState::Gathering => 2,
            RTCIceGatheringState::Complete => 3,
        }
    }
}

impl From<&str> for RTCIceGatheringState {
    fn from(raw: &str) -> Self {
        match raw {
            ICE_GATHERING_STATE_NEW_STR => RTCIceGatheringState::New,
            ICE_GATHERING_STATE_GATHERING_STR => RTCIceGatheringState::Gathering,
            ICE_GATHERING_STATE_COMPLETE_STR => RTCIceGatheringState::Complete,
            _ => RTCIceGatheringState::Unspecified,
        }
    }
}

impl From<u8> for RTCIceGatheringState {
    fn from(v: u8) -> Self {
        match v {
            1 => RTCIceGatheringState::New,
            2 => RTCIceGatheringState::Gathering,
            3 => RTCIceGatheringState::Complete,
            _ => RTCIceGatheringState::Unspecified,
        }
    }
}

impl fmt::Display for RTCIceGatheringState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            RTCIceGatheringState::New => write!(f, "{ICE_GATHERING_STATE_NEW_STR}"),
            RTCIceGatheringState::Gathering => write!(f, "{ICE_GATHERING_STATE_GATHERING_STR}"),
            RTCIceGatheringState::Complete => write!(f, "{ICE_GATHERING_STATE_COMPLETE_STR}"),
            _ => write!(f, "{UNSPECIFIED_STR}"),
        }
    }
}
