use crate::peer_connection::configuration::UNSPECIFIED_STR;
use crate::peer_connection::state::RTCIceConnectionState;
use crate::peer_connection::transport::RTCDtlsTransportState;
use std::fmt;

/// Overall state of the peer connection.
///
/// Aggregates the ICE connection state with the DTLS transport state reported
/// by the media engine. The connection is only `Connected` once both layers
/// are established.
///
/// ```text
/// New → Connecting → Connected ⇄ Disconnected
///            ↘            ↘
///             Failed       Failed
/// ```
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RTCPeerConnectionState {
    #[default]
    Unspecified,

    New,

    Connecting,

    Connected,

    Disconnected,

    Failed,

    Closed,
}

const PEER_CONNECTION_STATE_NEW_STR: &str = "new";
const PEER_CONNECTION_STATE_CONNECTING_STR: &str = "connecting";
const PEER_CONNECTION_STATE_CONNECTED_STR: &str = "connected";
const PEER_CONNECTION_STATE_DISCONNECTED_STR: &str = "disconnected";
const PEER_CONNECTION_STATE_FAILED_STR: &str = "failed";
const PEER_CONNECTION_STATE_CLOSED_STR: &str = "closed";

impl From<&str> for RTCPeerConnectionState {
    fn from(raw: &str) -> Self {
        match raw {
            PEER_CONNECTION_STATE_NEW_STR => RTCPeerConnectionState::New,
            PEER_CONNECTION_STATE_CONNECTING_STR => RTCPeerConnectionState::Connecting,
            PEER_CONNECTION_STATE_CONNECTED_STR => RTCPeerConnectionState::Connected,
            PEER_CONNECTION_STATE_DISCONNECTED_STR => RTCPeerConnectionState::Disconnected,
            PEER_CONNECTION_STATE_FAILED_STR => RTCPeerConnectionState::Failed,
            PEER_CONNECTION_STATE_CLOSED_STR => RTCPeerConnectionState::Closed,
            _ => RTCPeerConnectionState::Unspecified,
        }
    }
}

impl From<u8> for RTCPeerConnectionState {
    fn from(v: u8) -> Self {
        match v {
            1 => RTCPeerConnectionState::New,
            2 => RTCPeerConnectionState::Connecting,
            3 => RTCPeerConnectionState::Connected,
            4 => RTCPeerConnectionState::Disconnected,
            5 => RTCPeerConnectionState::Failed,
            6 => RTCPeerConnectionState::Closed,
            _ => RTCPeerConnectionState::Unspecified,
        }
    }
}

impl fmt::Display for RTCPeerConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            RTCPeerConnectionState::New => PEER_CONNECTION_STATE_NEW_STR,
            RTCPeerConnectionState::Connecting => PEER_CONNECTION_STATE_CONNECTING_STR,
            RTCPeerConnectionState::Connected => PEER_CONNECTION_STATE_CONNECTED_STR,
            RTCPeerConnectionState::Disconnected => PEER_CONNECTION_STATE_DISCONNECTED_STR,
            RTCPeerConnectionState::Failed => PEER_CONNECTION_STATE_FAILED_STR,
            RTCPeerConnectionState::Closed => PEER_CONNECTION_STATE_CLOSED_STR,
            RTCPeerConnectionState::Unspecified => UNSPECIFIED_STR,
        };
        write!(f, "{s}")
    }
}

/// <https://www.w3.org/TR/webrtc/#rtcpeerconnectionstate-enum>
pub(crate) fn derive_connection_state(
    is_closed: bool,
    ice: RTCIceConnectionState,
    dtls: RTCDtlsTransportState,
) -> RTCPeerConnectionState {
    use RTCDtlsTransportState as Dtls;
    use RTCIceConnectionState as Ice;

    if is_closed {
        RTCPeerConnectionState::Closed
    } else if ice == Ice::Failed || dtls == Dtls::Failed {
        RTCPeerConnectionState::Failed
    } else if ice == Ice::Disconnected {
        RTCPeerConnectionState::Disconnected
    } else if matches!(ice, Ice::New | Ice::Closed) && matches!(dtls, Dtls::New | Dtls::Closed) {
        RTCPeerConnectionState::New
    } else if matches!(ice, Ice::New | Ice::Checking) || matches!(dtls, Dtls::New | Dtls::Connecting)
    {
        RTCPeerConnectionState::Connecting
    } else if matches!(ice, Ice::Connected | Ice::Completed | Ice::Closed)
        && matches!(dtls, Dtls::Connected | Dtls::Closed)
    {
        RTCPeerConnectionState::Connected
    } else {
        RTCPeerConnectionState::New
    }
}
