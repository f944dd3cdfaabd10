/// Integration tests for offer/answer negotiation through the operations chain
///
/// These tests verify that:
/// - A full offer/answer exchange reports each signaling transition exactly once
/// - Rollback returns to stable and discards the pending description
/// - A description the engine rejects leaves the state untouched
/// - The operations chain rejects or queues concurrent operations per policy
mod common;

use anyhow::Result;
use sansio::Protocol;

use rtc_session::peer_connection::configuration::{
    RTCConfiguration, RTCConfigurationBuilder, RTCOperationsChainPolicy,
};
use rtc_session::peer_connection::engine::{RTCEngineEvent, RTCEngineRequest};
use rtc_session::peer_connection::operation::RTCOperationKind;
use rtc_session::peer_connection::sdp::{RTCSdpType, RTCSessionDescription};
use rtc_session::peer_connection::state::RTCSignalingState;
use rtc_session::shared::error::{Error, SdpCreationError, SdpSetError};

use common::{FakeEngine, OFFER_SDP, answer, drain, implicit, init_logger, new_peer, offer};

#[tokio::test]
async fn test_offer_answer_as_offerer() -> Result<()> {
    init_logger();
    log::info!("Starting offerer negotiation test");

    let (mut pc, rx) = new_peer(RTCConfiguration::default());
    let mut engine = FakeEngine::default();

    let created = pc.create_offer(None)?;
    engine.pump(&mut pc)?;
    let created = created.await?;
    assert_eq!(created.sdp_type, RTCSdpType::Offer);
    assert_eq!(pc.signaling_state(), RTCSignalingState::Stable);

    // an empty local offer refers to the one just created
    let applied = pc.set_local_description(implicit("offer")?)?;
    engine.pump(&mut pc)?;
    applied.await?;
    assert_eq!(pc.signaling_state(), RTCSignalingState::HaveLocalOffer);
    assert_eq!(
        pc.pending_local_description().map(|d| d.sdp.as_str()),
        Some(OFFER_SDP)
    );
    assert!(pc.current_local_description().is_none());

    let applied = pc.set_remote_description(answer()?)?;
    engine.pump(&mut pc)?;
    applied.await?;
    assert_eq!(pc.signaling_state(), RTCSignalingState::Stable);
    assert!(pc.pending_local_description().is_none());
    assert!(pc.current_local_description().is_some());
    assert!(pc.current_remote_description().is_some());
    log::info!("Negotiation complete");

    let events = drain(&rx);
    assert_eq!(
        common::signaling_changes(&events),
        vec![
            RTCSignalingState::HaveLocalOffer,
            RTCSignalingState::Stable
        ]
    );

    let negotiation_requests = engine
        .executed
        .iter()
        .filter(|request| request.is_negotiation())
        .count();
    assert_eq!(negotiation_requests, 3);

    Ok(())
}

#[tokio::test]
async fn test_offer_answer_as_answerer() -> Result<()> {
    init_logger();
    log::info!("Starting answerer negotiation test");

    let (mut pc, rx) = new_peer(RTCConfiguration::default());
    let mut engine = FakeEngine::default();

    // an answer can not be created before a remote offer arrives
    let early = pc.create_answer(None);
    assert!(matches!(
        early,
        Err(Error::SdpCreation(SdpCreationError::IncorrectSignalingState(_)))
    ));

    let applied = pc.set_remote_description(offer()?)?;
    engine.pump(&mut pc)?;
    applied.await?;
    assert_eq!(pc.signaling_state(), RTCSignalingState::HaveRemoteOffer);
    assert!(pc.pending_remote_description().is_some());

    let created = pc.create_answer(None)?;
    engine.pump(&mut pc)?;
    let created = created.await?;
    assert_eq!(created.sdp_type, RTCSdpType::Answer);

    let applied = pc.set_local_description(created)?;
    engine.pump(&mut pc)?;
    applied.await?;
    assert_eq!(pc.signaling_state(), RTCSignalingState::Stable);
    assert!(pc.pending_remote_description().is_none());
    assert!(pc.current_remote_description().is_some());
    assert!(pc.current_local_description().is_some());

    assert_eq!(
        common::signaling_changes(&drain(&rx)),
        vec![
            RTCSignalingState::HaveRemoteOffer,
            RTCSignalingState::Stable
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_rollback_remote_offer() -> Result<()> {
    init_logger();

    let (mut pc, rx) = new_peer(RTCConfiguration::default());
    let mut engine = FakeEngine::default();

    let applied = pc.set_remote_description(offer()?)?;
    engine.pump(&mut pc)?;
    applied.await?;

    let rolled_back = pc.set_remote_description(RTCSessionDescription::rollback())?;
    engine.pump(&mut pc)?;
    rolled_back.await?;

    assert_eq!(pc.signaling_state(), RTCSignalingState::Stable);
    assert!(pc.remote_description().is_none());
    assert_eq!(
        common::signaling_changes(&drain(&rx)),
        vec![
            RTCSignalingState::HaveRemoteOffer,
            RTCSignalingState::Stable
        ]
    );

    // nothing left to roll back
    let err = pc
        .set_remote_description(RTCSessionDescription::rollback())
        .err();
    assert_eq!(err, Some(Error::from(SdpSetError::CannotRollback)));

    Ok(())
}

#[tokio::test]
async fn test_engine_rejects_description() -> Result<()> {
    init_logger();

    let (mut pc, rx) = new_peer(RTCConfiguration::default());
    let mut engine = FakeEngine {
        fail_next_set: Some(SdpSetError::Rejected("unsupported codec".to_owned())),
        ..Default::default()
    };

    let applied = pc.set_remote_description(offer()?)?;
    engine.pump(&mut pc)?;
    assert_eq!(
        applied.await,
        Err(Error::from(SdpSetError::Rejected(
            "unsupported codec".to_owned()
        )))
    );
    assert_eq!(pc.signaling_state(), RTCSignalingState::Stable);
    assert!(pc.remote_description().is_none());
    assert!(pc.pending_operation().is_none());
    assert!(common::signaling_changes(&drain(&rx)).is_empty());

    // the chain is free again
    let applied = pc.set_remote_description(offer()?)?;
    engine.pump(&mut pc)?;
    applied.await?;
    assert_eq!(pc.signaling_state(), RTCSignalingState::HaveRemoteOffer);

    Ok(())
}

#[tokio::test]
async fn test_parse_failure_is_reported_synchronously() -> Result<()> {
    init_logger();

    let (mut pc, _rx) = new_peer(RTCConfiguration::default());
    let garbage: RTCSessionDescription =
        serde_json::from_str(r#"{"type":"offer","sdp":"not an sdp"}"#)?;

    let result = pc.set_remote_description(garbage);
    assert!(
        matches!(result, Err(Error::SdpSet(SdpSetError::Parse(_)))),
        "unexpected result {result:?}"
    );
    assert!(pc.poll_write().is_none());
    assert_eq!(pc.signaling_state(), RTCSignalingState::Stable);

    Ok(())
}

#[tokio::test]
async fn test_reject_policy_while_operation_in_flight() -> Result<()> {
    init_logger();

    let (mut pc, _rx) = new_peer(RTCConfiguration::default());
    let mut engine = FakeEngine::default();

    let created = pc.create_offer(None)?;
    assert_eq!(pc.pending_operation(), Some(RTCOperationKind::CreateOffer));

    let tests = vec![
        ("create_offer", pc.create_offer(None).err()),
        ("set_remote_description", pc.set_remote_description(offer()?).err()),
    ];
    for (name, err) in tests {
        let err = err.unwrap_or_else(|| panic!("{name} should be rejected"));
        assert!(err.is_operation_in_progress(), "{name}: {err}");
    }

    engine.pump(&mut pc)?;
    created.await?;
    assert!(pc.pending_operation().is_none());

    Ok(())
}

#[tokio::test]
async fn test_queue_policy_runs_operations_in_order() -> Result<()> {
    init_logger();

    let config = RTCConfigurationBuilder::new()
        .with_operations_chain_policy(RTCOperationsChainPolicy::Queue)
        .build();
    let (mut pc, rx) = new_peer(config);
    let mut engine = FakeEngine::default();

    let created = pc.create_offer(None)?;
    let applied_local = pc.set_local_description(implicit("offer")?)?;
    let applied_remote = pc.set_remote_description(answer()?)?;

    // only the head of the chain reached the engine
    assert!(matches!(
        pc.poll_write(),
        Some(RTCEngineRequest::CreateOffer(_))
    ));
    assert!(pc.poll_write().is_none());
    pc.handle_read(RTCEngineEvent::CreateSessionDescriptionComplete(Ok(offer()?)))?;

    engine.pump(&mut pc)?;
    created.await?;
    applied_local.await?;
    applied_remote.await?;

    assert_eq!(pc.signaling_state(), RTCSignalingState::Stable);
    assert_eq!(
        common::signaling_changes(&drain(&rx)),
        vec![
            RTCSignalingState::HaveLocalOffer,
            RTCSignalingState::Stable
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_queued_operation_revalidated_at_head() -> Result<()> {
    init_logger();

    let config = RTCConfigurationBuilder::new()
        .with_operations_chain_policy(RTCOperationsChainPolicy::Queue)
        .build();
    let (mut pc, _rx) = new_peer(config);
    let mut engine = FakeEngine::default();

    let created = pc.create_offer(None)?;
    // queued unchecked; once it reaches the head the state is still stable,
    // where a local answer does not apply
    let misplaced = pc.set_local_description(answer()?)?;

    engine.pump(&mut pc)?;
    created.await?;
    assert!(matches!(
        misplaced.await,
        Err(Error::SdpSet(SdpSetError::StateMismatch(_)))
    ));
    assert!(pc.pending_operation().is_none());

    Ok(())
}

#[tokio::test]
async fn test_engine_returns_wrong_description_type() -> Result<()> {
    init_logger();

    let (mut pc, _rx) = new_peer(RTCConfiguration::default());
    let created = pc.create_offer(None)?;
    assert!(matches!(
        pc.poll_write(),
        Some(RTCEngineRequest::CreateOffer(_))
    ));

    pc.handle_read(RTCEngineEvent::CreateSessionDescriptionComplete(Ok(
        answer()?,
    )))?;
    assert!(matches!(
        created.await,
        Err(Error::SdpCreation(SdpCreationError::InvalidDescription(_)))
    ));

    // a completion with nothing pending is ignored
    pc.handle_read(RTCEngineEvent::SetLocalDescriptionComplete(Ok(())))?;
    assert_eq!(pc.signaling_state(), RTCSignalingState::Stable);

    Ok(())
}
