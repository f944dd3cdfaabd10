use std::time::Instant;

use crate::peer_connection::RTCPeerConnection;
use crate::peer_connection::engine::{RTCEngineEvent, RTCEngineRequest};
use crate::peer_connection::event::RTCPeerConnectionEvent;
use shared::error::Error;

/// Engine callbacks are read in, engine requests are written out and
/// application notifications are polled as events. The core keeps no timers.
impl sansio::Protocol<RTCEngineEvent, (), ()> for RTCPeerConnection {
    type Rout = ();
    type Wout = RTCEngineRequest;
    type Eout = RTCPeerConnectionEvent;
    type Error = Error;
    type Time = Instant;

    fn handle_read(&mut self, msg: RTCEngineEvent) -> Result<(), Self::Error> {
        self.apply(msg)
    }

    fn poll_read(&mut self) -> Option<Self::Rout> {
        None
    }

    fn handle_write(&mut self, _msg: ()) -> Result<(), Self::Error> {
        Ok(())
    }

    fn poll_write(&mut self) -> Option<Self::Wout> {
        self.poll_request()
    }

    fn handle_event(&mut self, _evt: ()) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Only yields events while no [`EventSink`](crate::peer_connection::event::EventSink)
    /// is installed.
    fn poll_event(&mut self) -> Option<Self::Eout> {
        self.poll_notification()
    }

    fn handle_timeout(&mut self, _now: Instant) -> Result<(), Self::Error> {
        Ok(())
    }

    fn poll_timeout(&mut self) -> Option<Instant> {
        None
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        RTCPeerConnection::close(self)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::peer_connection::state::RTCSignalingState;
    use sansio::Protocol;

    #[test]
    fn test_protocol_drives_core() {
        let mut pc = RTCPeerConnection::default();
        let _offer = pc.create_offer(None).expect("create_offer admitted");

        assert!(matches!(
            pc.poll_write(),
            Some(RTCEngineRequest::CreateOffer(_))
        ));
        assert!(pc.poll_write().is_none());
        assert!(pc.poll_read().is_none());
        assert!(pc.poll_timeout().is_none());

        Protocol::close(&mut pc).expect("close");
        assert!(matches!(pc.poll_write(), Some(RTCEngineRequest::Close)));
        assert_eq!(
            pc.poll_event(),
            Some(RTCPeerConnectionEvent::OnSignalingStateChangeEvent(
                RTCSignalingState::Closed
            ))
        );

        // engine events after close are ignored
        pc.handle_read(RTCEngineEvent::SignalingChange(200))
            .expect("ignored after close");
    }
}
