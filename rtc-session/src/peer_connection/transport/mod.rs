//! Transport-level value types: ICE candidates, candidate pairs, ICE
//! credentials and the DTLS transport state.

pub(crate) mod dtls_transport_state;
pub mod ice;

pub use dtls_transport_state::RTCDtlsTransportState;
