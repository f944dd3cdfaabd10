use serde::{Deserialize, Serialize};
use std::fmt;

use super::candidate_type::RTCIceCandidateType;
use crate::peer_connection::configuration::UNSPECIFIED_STR;
use shared::error::{IceError, Result};

const CANDIDATE_PREFIX: &str = "candidate:";

/// Transport protocol of a candidate.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RTCIceProtocol {
    #[default]
    Unspecified,

    #[serde(rename = "udp")]
    Udp,

    #[serde(rename = "tcp")]
    Tcp,
}

const ICE_PROTOCOL_UDP_STR: &str = "udp";
const ICE_PROTOCOL_TCP_STR: &str = "tcp";

impl From<&str> for RTCIceProtocol {
    fn from(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case(ICE_PROTOCOL_UDP_STR) {
            RTCIceProtocol::Udp
        } else if raw.eq_ignore_ascii_case(ICE_PROTOCOL_TCP_STR) {
            RTCIceProtocol::Tcp
        } else {
            RTCIceProtocol::Unspecified
        }
    }
}

impl fmt::Display for RTCIceProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            RTCIceProtocol::Udp => write!(f, "{ICE_PROTOCOL_UDP_STR}"),
            RTCIceProtocol::Tcp => write!(f, "{ICE_PROTOCOL_TCP_STR}"),
            _ => write!(f, "{UNSPECIFIED_STR}"),
        }
    }
}

#[derive(Default, PartialEq, Eq, Debug, Copy, Clone, Serialize, Deserialize)]
pub enum RTCIceTcpCandidateType {
    #[default]
    Unspecified,

    #[serde(rename = "active")]
    Active,

    #[serde(rename = "passive")]
    Passive,

    #[serde(rename = "so")]
    SimultaneousOpen,
}

impl From<&str> for RTCIceTcpCandidateType {
    fn from(raw: &str) -> Self {
        match raw {
            "active" => RTCIceTcpCandidateType::Active,
            "passive" => RTCIceTcpCandidateType::Passive,
            "so" => RTCIceTcpCandidateType::SimultaneousOpen,
            _ => RTCIceTcpCandidateType::Unspecified,
        }
    }
}

/// The fields of an `a=candidate` line.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RTCIceCandidate {
    pub foundation: String,
    pub component: u16,
    pub protocol: RTCIceProtocol,
    pub priority: u32,
    pub address: String,
    pub port: u16,
    pub typ: RTCIceCandidateType,
    pub related_address: String,
    pub related_port: u16,
    pub tcp_type: RTCIceTcpCandidateType,
}

impl fmt::Display for RTCIceCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}:{}",
            self.protocol, self.typ, self.address, self.port
        )?;
        if !self.related_address.is_empty() {
            write!(f, " raddr {}:{}", self.related_address, self.related_port)?;
        }
        Ok(())
    }
}

fn invalid(reason: impl fmt::Display) -> shared::error::Error {
    IceError::InvalidCandidate(reason.to_string()).into()
}

/// Parses a candidate attribute value, with or without the leading
/// `candidate:`, following <https://tools.ietf.org/html/rfc8839#section-5.1>.
pub fn unmarshal_candidate(raw: &str) -> Result<RTCIceCandidate> {
    let raw = raw.strip_prefix(CANDIDATE_PREFIX).unwrap_or(raw);
    let split: Vec<&str> = raw.split_whitespace().collect();
    if split.len() < 8 {
        return Err(invalid(format!(
            "attribute not long enough to be ICE candidate ({})",
            split.len()
        )));
    }

    let foundation = split[0].to_owned();

    let component: u16 = split[1]
        .parse()
        .map_err(|err| invalid(format!("component {}: {err}", split[1])))?;
    if component == 0 {
        return Err(invalid("component must be at least 1"));
    }

    let protocol = RTCIceProtocol::from(split[2]);
    if protocol == RTCIceProtocol::Unspecified {
        return Err(invalid(format!("unknown transport {}", split[2])));
    }

    let priority: u32 = split[3]
        .parse()
        .map_err(|err| invalid(format!("priority {}: {err}", split[3])))?;

    let address = split[4].to_owned();

    let port: u16 = split[5]
        .parse()
        .map_err(|err| invalid(format!("port {}: {err}", split[5])))?;

    if split[6] != "typ" {
        return Err(invalid(format!("expected typ, found {}", split[6])));
    }
    let typ = RTCIceCandidateType::from(split[7]);
    if typ == RTCIceCandidateType::Unspecified {
        return Err(invalid(format!("unknown candidate type {}", split[7])));
    }

    let mut candidate = RTCIceCandidate {
        foundation,
        component,
        protocol,
        priority,
        address,
        port,
        typ,
        ..Default::default()
    };

    // extension attributes come as name/value pairs
    for pair in split[8..].chunks(2) {
        match pair {
            ["raddr", addr] => candidate.related_address = (*addr).to_owned(),
            ["rport", port] => {
                candidate.related_port = port
                    .parse()
                    .map_err(|err| invalid(format!("rport {port}: {err}")))?;
            }
            ["tcptype", tcp_type] => candidate.tcp_type = RTCIceTcpCandidateType::from(*tcp_type),
            [name] => return Err(invalid(format!("extension {name} has no value"))),
            _ => {}
        }
    }

    Ok(candidate)
}

/// A candidate as exchanged over signaling.
///
/// An empty `candidate` marks the end of candidates for the m-section.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RTCIceCandidateInit {
    pub candidate: String,
    pub sdp_mid: Option<String>,
    #[serde(rename = "sdpMLineIndex")]
    pub sdp_mline_index: Option<u16>,
    pub username_fragment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl RTCIceCandidateInit {
    pub fn new(
        candidate: impl Into<String>,
        sdp_mid: Option<String>,
        sdp_mline_index: Option<u16>,
    ) -> Self {
        RTCIceCandidateInit {
            candidate: candidate.into(),
            sdp_mid,
            sdp_mline_index,
            ..Default::default()
        }
    }

    pub fn is_end_of_candidates(&self) -> bool {
        self.candidate.trim().is_empty()
    }

    /// Checks the parts of the candidate that do not depend on a remote
    /// description.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.sdp_mid.is_none() && self.sdp_mline_index.is_none() {
            return Err(invalid("sdp_mid and sdp_mline_index are both unset"));
        }
        if !self.is_end_of_candidates() {
            unmarshal_candidate(&self.candidate)?;
        }
        Ok(())
    }
}

impl fmt::Display for RTCIceCandidateInit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (mid {:?}, mline {:?})",
            self.candidate, self.sdp_mid, self.sdp_mline_index
        )
    }
}
