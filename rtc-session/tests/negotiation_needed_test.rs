/// Integration tests for negotiation-needed delivery
///
/// These tests verify that:
/// - A negotiation-needed report fires right away when negotiation is idle
/// - Reports arriving mid-negotiation are held until the chain is empty and signaling is stable
/// - Superseded event ids never fire
mod common;

use anyhow::Result;
use sansio::Protocol;

use rtc_session::peer_connection::configuration::RTCConfiguration;
use rtc_session::peer_connection::engine::{RTCEngineEvent, RTCEngineRequest};
use rtc_session::peer_connection::event::RTCPeerConnectionEvent;

use common::{FakeEngine, drain, init_logger, new_peer, offer};

fn negotiation_needed(events: &[RTCPeerConnectionEvent]) -> Vec<u32> {
    events
        .iter()
        .filter_map(|event| match event {
            RTCPeerConnectionEvent::OnNegotiationNeededEvent(id) => Some(*id),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_negotiation_needed_fires_when_idle() -> Result<()> {
    init_logger();

    let (mut pc, rx) = new_peer(RTCConfiguration::default());
    pc.handle_read(RTCEngineEvent::NegotiationNeeded(1))?;
    assert_eq!(negotiation_needed(&drain(&rx)), vec![1]);

    // already delivered
    assert!(!pc.maybe_fire_negotiation_needed(1));
    assert!(drain(&rx).is_empty());

    Ok(())
}

#[tokio::test]
async fn test_stale_negotiation_needed_is_dropped() -> Result<()> {
    init_logger();
    log::info!("Starting stale negotiation needed test");

    let (mut pc, rx) = new_peer(RTCConfiguration::default());

    let created = pc.create_offer(None)?;
    assert!(matches!(
        pc.poll_write(),
        Some(RTCEngineRequest::CreateOffer(_))
    ));

    pc.handle_read(RTCEngineEvent::NegotiationNeeded(1))?;
    pc.handle_read(RTCEngineEvent::NegotiationNeeded(2))?;
    assert!(negotiation_needed(&drain(&rx)).is_empty());
    assert!(!pc.maybe_fire_negotiation_needed(2), "operation in flight");

    pc.handle_read(RTCEngineEvent::CreateSessionDescriptionComplete(Ok(
        offer()?,
    )))?;
    created.await?;

    assert_eq!(negotiation_needed(&drain(&rx)), vec![2]);
    assert!(!pc.maybe_fire_negotiation_needed(1));

    Ok(())
}

#[tokio::test]
async fn test_negotiation_needed_waits_for_stable() -> Result<()> {
    init_logger();

    let (mut pc, rx) = new_peer(RTCConfiguration::default());
    let mut engine = FakeEngine::default();

    let applied = pc.set_remote_description(offer()?)?;
    engine.pump(&mut pc)?;
    applied.await?;

    pc.handle_read(RTCEngineEvent::NegotiationNeeded(3))?;
    assert!(!pc.maybe_fire_negotiation_needed(3), "not stable");
    assert!(negotiation_needed(&drain(&rx)).is_empty());

    let created = pc.create_answer(None)?;
    engine.pump(&mut pc)?;
    let answer = created.await?;
    assert!(negotiation_needed(&drain(&rx)).is_empty());

    let applied = pc.set_local_description(answer)?;
    engine.pump(&mut pc)?;
    applied.await?;

    assert_eq!(negotiation_needed(&drain(&rx)), vec![3]);

    Ok(())
}

#[tokio::test]
async fn test_negotiation_needed_after_close() -> Result<()> {
    init_logger();

    let (mut pc, rx) = new_peer(RTCConfiguration::default());
    let _created = pc.create_offer(None)?;
    pc.handle_read(RTCEngineEvent::NegotiationNeeded(4))?;

    pc.close()?;
    assert!(!pc.maybe_fire_negotiation_needed(4));
    assert!(negotiation_needed(&drain(&rx)).is_empty());

    Ok(())
}
