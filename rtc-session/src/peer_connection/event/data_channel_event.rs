pub type RTCDataChannelId = u16;

/// A data channel announced by the remote peer and opened by the engine.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct RTCDataChannelEvent {
    /// `None` until the engine has assigned a stream id.
    pub id: Option<RTCDataChannelId>,
    pub label: String,
    pub protocol: String,
    pub ordered: bool,
    pub negotiated: bool,
}
