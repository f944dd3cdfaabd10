//! Session descriptions exchanged during offer/answer negotiation.
//!
//! The SDP body is opaque to the negotiation core except for the m-sections,
//! which are consulted to validate the `sdp_mid` / `sdp_mline_index` of
//! remote ICE candidates.

pub(crate) mod sdp_type;
pub(crate) mod session_description;

pub use sdp_type::RTCSdpType;
pub use session_description::RTCSessionDescription;

use ::sdp::description::media::MediaDescription;
use ::sdp::description::session::SessionDescription;

pub(crate) const ATTR_KEY_MID: &str = "mid";

/// Value of the `a=mid` attribute of an m-section, if any.
pub(crate) fn get_mid_value(media: &MediaDescription) -> Option<&str> {
    media.attribute(ATTR_KEY_MID).flatten()
}

/// Index of the m-section carrying `mid`.
pub(crate) fn find_mline_index_by_mid(parsed: &SessionDescription, mid: &str) -> Option<usize> {
    parsed
        .media_descriptions
        .iter()
        .position(|media| get_mid_value(media) == Some(mid))
}
