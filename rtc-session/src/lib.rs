//! # RTC Session - Sans-I/O WebRTC Negotiation Core
//!
//! The session layer of a WebRTC peer connection: offer/answer negotiation,
//! the operations chain, remote ICE candidate handling and the aggregation of
//! engine state into application events. Media, transports and SDP
//! generation belong to a separate **media engine**; this crate decides what
//! the engine is asked to do and what the application is told.
//!
//! ## Architecture
//!
//! ```text
//!   application                 RTCPeerConnection                 media engine
//!  ─────────────               ───────────────────               ──────────────
//!  create_offer() ──────────▶  DescriptionNegotiator ── poll_write() ──▶ RTCEngineRequest
//!  add_ice_candidate() ─────▶  IceCoordinator
//!  EventSink / poll_event() ◀─ events ◀──────────── apply() ◀────────── RTCEngineEvent
//! ```
//!
//! - [`DescriptionNegotiator`](peer_connection::negotiator::DescriptionNegotiator)
//!   owns the signaling state and the operations chain: at most one of
//!   `create_offer`, `create_answer`, `set_local_description` and
//!   `set_remote_description` is in flight at any time.
//! - [`IceCoordinator`](peer_connection::ice_coordinator::IceCoordinator)
//!   buffers early remote candidates, ignores stale ICE generations and keeps
//!   gathering monotonic.
//! - [`RTCPeerConnection`](peer_connection::RTCPeerConnection) ties them
//!   together, derives the aggregate connection state and delivers events.
//!
//! Nothing here performs I/O or spawns threads. Drive the core through
//! [`sansio::Protocol`], or share it across threads with
//! [`RTCPeerConnectionHandle`](peer_connection::RTCPeerConnectionHandle).
//!
//! ## Quick Start
//!
//! ```
//! use rtc_session::peer_connection::RTCPeerConnection;
//! use rtc_session::peer_connection::configuration::RTCConfigurationBuilder;
//! use rtc_session::peer_connection::engine::{RTCEngineEvent, RTCEngineRequest};
//! use rtc_session::peer_connection::event::RTCPeerConnectionEvent;
//! use rtc_session::peer_connection::sdp::RTCSessionDescription;
//! use rtc_session::peer_connection::state::RTCSignalingState;
//! use rtc_session::sansio::Protocol;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (tx, rx) = std::sync::mpsc::channel();
//! let mut pc = RTCPeerConnection::new(RTCConfigurationBuilder::new().build())
//!     .with_event_sink(Box::new(tx));
//!
//! // 1. Ask for an offer; the engine receives a request
//! let mut offer = pc.create_offer(None)?;
//! while let Some(request) = pc.poll_write() {
//!     if let RTCEngineRequest::CreateOffer(_) = request {
//!         // 2. The engine answers with the offer it generated
//!         let sdp = "v=0\r\no=- 1 2 IN IP4 127.0.0.1\r\ns=-\r\nt=0 0\r\n".to_owned();
//!         pc.handle_read(RTCEngineEvent::CreateSessionDescriptionComplete(Ok(
//!             RTCSessionDescription::offer(sdp)?,
//!         )))?;
//!     }
//! }
//! let offer = offer.try_recv().expect("resolved")?;
//!
//! // 3. Apply it locally
//! let mut applied = pc.set_local_description(offer)?;
//! while let Some(request) = pc.poll_write() {
//!     if let RTCEngineRequest::SetLocalDescription(_) = request {
//!         pc.handle_read(RTCEngineEvent::SetLocalDescriptionComplete(Ok(())))?;
//!     }
//! }
//! applied.try_recv().expect("resolved")?;
//!
//! assert_eq!(pc.signaling_state(), RTCSignalingState::HaveLocalOffer);
//! assert_eq!(
//!     rx.try_recv()?,
//!     RTCPeerConnectionEvent::OnSignalingStateChangeEvent(RTCSignalingState::HaveLocalOffer)
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Further Reading
//!
//! - [W3C WebRTC 1.0](https://www.w3.org/TR/webrtc/) - the API this crate follows
//! - [RFC 8829 (JSEP)](https://www.rfc-editor.org/rfc/rfc8829) - offer/answer state machine
//! - [Sans-I/O Approach](https://sans-io.readthedocs.io/) - why the core performs no I/O

#![doc(
    html_logo_url = "https://raw.githubusercontent.com/webrtc-rs/webrtc-rs.github.io/master/res/rtc.png"
)]
#![warn(rust_2018_idioms)]
#![allow(dead_code)]

pub use {sansio, sdp, shared};

pub mod peer_connection;
