pub type RTCRtpReceiverId = usize;
pub type MediaStreamId = String;
pub type MediaStreamTrackId = String;

/// A remote track started arriving on a receiver.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct RTCTrackEvent {
    pub receiver_id: RTCRtpReceiverId,
    pub track_id: MediaStreamTrackId,
    pub stream_ids: Vec<MediaStreamId>,
    pub mid: Option<String>,
}
