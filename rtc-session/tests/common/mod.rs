#![allow(dead_code)]

use anyhow::Result;
use sansio::Protocol;
use std::sync::mpsc::Receiver;

use rtc_session::peer_connection::RTCPeerConnection;
use rtc_session::peer_connection::configuration::RTCConfiguration;
use rtc_session::peer_connection::engine::{RTCEngineEvent, RTCEngineRequest};
use rtc_session::peer_connection::event::RTCPeerConnectionEvent;
use rtc_session::peer_connection::sdp::RTCSessionDescription;
use rtc_session::peer_connection::state::RTCSignalingState;
use rtc_session::shared::error::SdpSetError;

pub const OFFER_SDP: &str = "v=0\r\n\
    o=- 4596489990601351948 2 IN IP4 127.0.0.1\r\n\
    s=-\r\n\
    t=0 0\r\n\
    a=group:BUNDLE 0 1\r\n\
    m=audio 9 UDP/TLS/RTP/SAVPF 111\r\n\
    c=IN IP4 0.0.0.0\r\n\
    a=mid:0\r\n\
    a=sendrecv\r\n\
    m=application 9 UDP/DTLS/SCTP webrtc-datachannel\r\n\
    c=IN IP4 0.0.0.0\r\n\
    a=mid:1\r\n";

pub const ANSWER_SDP: &str = "v=0\r\n\
    o=- 6920599311270853001 2 IN IP4 127.0.0.1\r\n\
    s=-\r\n\
    t=0 0\r\n\
    a=group:BUNDLE 0 1\r\n\
    m=audio 9 UDP/TLS/RTP/SAVPF 111\r\n\
    c=IN IP4 0.0.0.0\r\n\
    a=mid:0\r\n\
    a=sendrecv\r\n\
    m=application 9 UDP/DTLS/SCTP webrtc-datachannel\r\n\
    c=IN IP4 0.0.0.0\r\n\
    a=mid:1\r\n";

pub const HOST_CANDIDATE: &str = "candidate:1 1 udp 2130706431 192.168.1.2 50000 typ host";
pub const SRFLX_CANDIDATE: &str =
    "candidate:2 1 udp 1694498815 203.0.113.7 61000 typ srflx raddr 192.168.1.2 rport 50000";

pub fn init_logger() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();
}

/// A peer connection whose events are collected on a channel.
pub fn new_peer(
    configuration: RTCConfiguration,
) -> (RTCPeerConnection, Receiver<RTCPeerConnectionEvent>) {
    let (tx, rx) = std::sync::mpsc::channel();
    let pc = RTCPeerConnection::new(configuration).with_event_sink(Box::new(tx));
    (pc, rx)
}

pub fn drain(rx: &Receiver<RTCPeerConnectionEvent>) -> Vec<RTCPeerConnectionEvent> {
    rx.try_iter().collect()
}

pub fn signaling_changes(events: &[RTCPeerConnectionEvent]) -> Vec<RTCSignalingState> {
    events
        .iter()
        .filter_map(|event| match event {
            RTCPeerConnectionEvent::OnSignalingStateChangeEvent(state) => Some(*state),
            _ => None,
        })
        .collect()
}

pub fn offer() -> Result<RTCSessionDescription> {
    Ok(RTCSessionDescription::offer(OFFER_SDP.to_owned())?)
}

pub fn answer() -> Result<RTCSessionDescription> {
    Ok(RTCSessionDescription::answer(ANSWER_SDP.to_owned())?)
}

/// A description with an empty `sdp`, which `set_local_description`
/// resolves to the last created one.
pub fn implicit(sdp_type: &str) -> Result<RTCSessionDescription> {
    Ok(serde_json::from_str(&format!(
        r#"{{"type":"{sdp_type}","sdp":""}}"#
    ))?)
}

/// Stands in for the media engine: answers every negotiation request the
/// core emits and records everything it was asked to do.
#[derive(Default)]
pub struct FakeEngine {
    pub executed: Vec<RTCEngineRequest>,
    /// Failure returned for the next set-description request.
    pub fail_next_set: Option<SdpSetError>,
}

impl FakeEngine {
    pub fn reply_for(&mut self, request: &RTCEngineRequest) -> Result<Option<RTCEngineEvent>> {
        let reply = match request {
            RTCEngineRequest::CreateOffer(_) => {
                Some(RTCEngineEvent::CreateSessionDescriptionComplete(Ok(offer()?)))
            }
            RTCEngineRequest::CreateAnswer(_) => {
                Some(RTCEngineEvent::CreateSessionDescriptionComplete(Ok(answer()?)))
            }
            RTCEngineRequest::SetLocalDescription(_) => Some(
                RTCEngineEvent::SetLocalDescriptionComplete(self.next_set_result()),
            ),
            RTCEngineRequest::SetRemoteDescription(_) => Some(
                RTCEngineEvent::SetRemoteDescriptionComplete(self.next_set_result()),
            ),
            _ => None,
        };
        Ok(reply)
    }

    fn next_set_result(&mut self) -> std::result::Result<(), SdpSetError> {
        match self.fail_next_set.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Executes requests until the core has nothing more to ask.
    pub fn pump(&mut self, pc: &mut RTCPeerConnection) -> Result<()> {
        while let Some(request) = pc.poll_write() {
            let reply = self.reply_for(&request)?;
            log::debug!("engine executed {request:?}");
            self.executed.push(request);
            if let Some(reply) = reply {
                pc.handle_read(reply)?;
            }
        }
        Ok(())
    }

    pub fn add_ice_candidate_requests(&self) -> Vec<String> {
        self.executed
            .iter()
            .filter_map(|request| match request {
                RTCEngineRequest::AddIceCandidate(candidate) => Some(candidate.candidate.clone()),
                _ => None,
            })
            .collect()
    }
}
