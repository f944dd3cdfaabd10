use std::fmt::Display;
use std::io::Cursor;

use sdp::description::session::SessionDescription;
use serde::{Deserialize, Serialize};

use super::sdp_type::RTCSdpType;
use shared::error::{Result, SdpSetError};

/// An SDP offer, answer, provisional answer or rollback.
///
/// Serializes to the JSON shape used by browsers, `{"type":"offer","sdp":"..."}`.
/// The parsed form is cached when the description is built through one of the
/// constructors or accepted by the negotiator.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct RTCSessionDescription {
    #[serde(rename = "type")]
    pub sdp_type: RTCSdpType,

    pub sdp: String,

    #[serde(skip)]
    pub(crate) parsed: Option<SessionDescription>,
}

impl Display for RTCSessionDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "type: {}, sdp:\n{}",
            self.sdp_type,
            self.sdp.replace("\r\n", "\n")
        )
    }
}

impl RTCSessionDescription {
    fn parsed_with_type(sdp: String, sdp_type: RTCSdpType) -> Result<RTCSessionDescription> {
        let mut desc = RTCSessionDescription {
            sdp,
            sdp_type,
            parsed: None,
        };

        let parsed = desc.unmarshal()?;
        desc.parsed = Some(parsed);

        Ok(desc)
    }

    pub fn offer(sdp: String) -> Result<RTCSessionDescription> {
        Self::parsed_with_type(sdp, RTCSdpType::Offer)
    }

    pub fn answer(sdp: String) -> Result<RTCSessionDescription> {
        Self::parsed_with_type(sdp, RTCSdpType::Answer)
    }

    pub fn pranswer(sdp: String) -> Result<RTCSessionDescription> {
        Self::parsed_with_type(sdp, RTCSdpType::Pranswer)
    }

    /// A rollback carries no SDP body.
    pub fn rollback() -> RTCSessionDescription {
        RTCSessionDescription {
            sdp_type: RTCSdpType::Rollback,
            ..Default::default()
        }
    }

    pub fn unmarshal(&self) -> Result<SessionDescription> {
        let mut reader = Cursor::new(self.sdp.as_bytes());
        let parsed = SessionDescription::unmarshal(&mut reader)
            .map_err(|err| SdpSetError::Parse(err.to_string()))?;
        Ok(parsed)
    }

    /// Parses the SDP unless a parsed form is already cached. Rollbacks have
    /// nothing to parse.
    pub(crate) fn ensure_parsed(&mut self) -> Result<()> {
        if self.sdp_type == RTCSdpType::Rollback || self.parsed.is_some() {
            return Ok(());
        }
        self.parsed = Some(self.unmarshal()?);
        Ok(())
    }

    /// Number of m-sections, if the description has been parsed.
    pub fn media_section_count(&self) -> Option<usize> {
        self.parsed
            .as_ref()
            .map(|parsed| parsed.media_descriptions.len())
    }
}
