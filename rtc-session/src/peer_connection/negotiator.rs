//! Offer/answer bookkeeping and the operations chain.
//!
//! [`DescriptionNegotiator`] owns the signaling state, the pending and current
//! descriptions and the chain of negotiation operations. It never talks to the
//! engine itself; [`RTCPeerConnection`](crate::peer_connection::RTCPeerConnection)
//! turns the operations it admits into engine requests and feeds completions
//! back.

use std::collections::VecDeque;

use crate::peer_connection::configuration::RTCOperationsChainPolicy;
use crate::peer_connection::operation::{PendingOperation, RTCOperationKind};
use crate::peer_connection::sdp::{RTCSdpType, RTCSessionDescription};
use crate::peer_connection::state::RTCSignalingState;
use crate::peer_connection::state::signaling_state::{StateChangeOp, check_next_signaling_state};
use shared::error::{Result, SdpCreationError, SdpSetError};

#[derive(Debug)]
pub struct DescriptionNegotiator {
    signaling_state: RTCSignalingState,

    current_local_description: Option<RTCSessionDescription>,
    pending_local_description: Option<RTCSessionDescription>,
    current_remote_description: Option<RTCSessionDescription>,
    pending_remote_description: Option<RTCSessionDescription>,

    last_offer: String,
    last_answer: String,

    policy: RTCOperationsChainPolicy,
    current: Option<PendingOperation>,
    queued: VecDeque<PendingOperation>,

    latest_negotiation_needed: Option<u32>,
    deferred_negotiation_needed: Option<u32>,
}

impl DescriptionNegotiator {
    pub(crate) fn new(policy: RTCOperationsChainPolicy) -> Self {
        DescriptionNegotiator {
            signaling_state: RTCSignalingState::Stable,
            current_local_description: None,
            pending_local_description: None,
            current_remote_description: None,
            pending_remote_description: None,
            last_offer: String::new(),
            last_answer: String::new(),
            policy,
            current: None,
            queued: VecDeque::new(),
            latest_negotiation_needed: None,
            deferred_negotiation_needed: None,
        }
    }

    pub fn signaling_state(&self) -> RTCSignalingState {
        self.signaling_state
    }

    pub fn current_local_description(&self) -> Option<&RTCSessionDescription> {
        self.current_local_description.as_ref()
    }

    pub fn pending_local_description(&self) -> Option<&RTCSessionDescription> {
        self.pending_local_description.as_ref()
    }

    /// The pending local description if there is one, otherwise the current.
    pub fn local_description(&self) -> Option<&RTCSessionDescription> {
        self.pending_local_description
            .as_ref()
            .or(self.current_local_description.as_ref())
    }

    pub fn current_remote_description(&self) -> Option<&RTCSessionDescription> {
        self.current_remote_description.as_ref()
    }

    pub fn pending_remote_description(&self) -> Option<&RTCSessionDescription> {
        self.pending_remote_description.as_ref()
    }

    /// The pending remote description if there is one, otherwise the current.
    pub fn remote_description(&self) -> Option<&RTCSessionDescription> {
        self.pending_remote_description
            .as_ref()
            .or(self.current_remote_description.as_ref())
    }

    /// The operation currently waiting for the engine.
    pub fn pending_operation(&self) -> Option<RTCOperationKind> {
        self.current.as_ref().map(PendingOperation::kind)
    }

    pub fn queued_operations(&self) -> usize {
        self.queued.len()
    }

    pub fn is_operations_chain_empty(&self) -> bool {
        self.current.is_none() && self.queued.is_empty()
    }

    /// Decides what happens to a newly requested operation: `Ok(Some(op))`
    /// when it may start right away, `Ok(None)` when it was queued, `Err` when
    /// it is rejected. Nothing changes on rejection.
    pub(crate) fn admit(&mut self, mut op: PendingOperation) -> Result<Option<PendingOperation>> {
        let kind = op.kind();
        if self.signaling_state == RTCSignalingState::Closed {
            return Err(kind.closed_error());
        }

        if !self.is_operations_chain_empty() {
            return match self.policy {
                RTCOperationsChainPolicy::Queue => {
                    self.queued.push_back(op);
                    Ok(None)
                }
                _ => Err(kind.busy_error()),
            };
        }

        self.prepare(&mut op)?;
        Ok(Some(op))
    }

    /// Validates `op` against the current state right before it starts and
    /// fills in what it leaves implicit.
    pub(crate) fn prepare(&self, op: &mut PendingOperation) -> Result<()> {
        match op {
            PendingOperation::CreateOffer { .. } => {
                if self.signaling_state == RTCSignalingState::Closed {
                    return Err(SdpCreationError::Closed.into());
                }
            }
            PendingOperation::CreateAnswer { .. } => {
                if !matches!(
                    self.signaling_state,
                    RTCSignalingState::HaveRemoteOffer | RTCSignalingState::HaveLocalPranswer
                ) {
                    return Err(SdpCreationError::IncorrectSignalingState(
                        self.signaling_state.to_string(),
                    )
                    .into());
                }
            }
            PendingOperation::SetLocalDescription { description, .. } => {
                // JSEP 5.4: an empty local offer/answer means "the one just created"
                if description.sdp.is_empty() {
                    match description.sdp_type {
                        RTCSdpType::Offer => description.sdp.clone_from(&self.last_offer),
                        RTCSdpType::Answer | RTCSdpType::Pranswer => {
                            description.sdp.clone_from(&self.last_answer)
                        }
                        _ => {}
                    }
                }
                self.validate_description(StateChangeOp::SetLocal, description)?;
            }
            PendingOperation::SetRemoteDescription { description, .. } => {
                self.validate_description(StateChangeOp::SetRemote, description)?;
            }
        }
        Ok(())
    }

    fn validate_description(
        &self,
        op: StateChangeOp,
        description: &mut RTCSessionDescription,
    ) -> Result<()> {
        check_next_signaling_state(self.signaling_state, op, description.sdp_type)?;
        if description.sdp_type != RTCSdpType::Rollback && description.sdp.is_empty() {
            return Err(SdpSetError::Parse(format!(
                "{} description has no sdp",
                description.sdp_type
            ))
            .into());
        }
        description.ensure_parsed()
    }

    pub(crate) fn start(&mut self, op: PendingOperation) {
        self.current = Some(op);
    }

    pub(crate) fn take_current(&mut self) -> Option<PendingOperation> {
        self.current.take()
    }

    pub(crate) fn restore_current(&mut self, op: PendingOperation) {
        self.current = Some(op);
    }

    pub(crate) fn next_queued(&mut self) -> Option<PendingOperation> {
        self.queued.pop_front()
    }

    /// Empties the chain, current operation first.
    pub(crate) fn drain_operations(&mut self) -> Vec<PendingOperation> {
        self.current.take().into_iter().chain(self.queued.drain(..)).collect()
    }

    /// Remembers a freshly created description so that an empty
    /// `set_local_description` can refer to it.
    pub(crate) fn record_created(&mut self, description: &RTCSessionDescription) {
        match description.sdp_type {
            RTCSdpType::Offer => self.last_offer.clone_from(&description.sdp),
            RTCSdpType::Answer | RTCSdpType::Pranswer => {
                self.last_answer.clone_from(&description.sdp)
            }
            _ => {}
        }
    }

    /// Commits a description the engine accepted. Returns the new signaling
    /// state if it changed.
    pub(crate) fn apply_description(
        &mut self,
        op: StateChangeOp,
        description: RTCSessionDescription,
    ) -> Result<Option<RTCSignalingState>> {
        let next = check_next_signaling_state(self.signaling_state, op, description.sdp_type)?;

        match (op, description.sdp_type) {
            (StateChangeOp::SetLocal, RTCSdpType::Offer | RTCSdpType::Pranswer) => {
                self.pending_local_description = Some(description);
            }
            (StateChangeOp::SetLocal, RTCSdpType::Answer) => {
                self.current_local_description = Some(description);
                if let Some(remote) = self.pending_remote_description.take() {
                    self.current_remote_description = Some(remote);
                }
                self.pending_local_description = None;
            }
            (StateChangeOp::SetLocal, _) => {
                self.pending_local_description = None;
            }
            (StateChangeOp::SetRemote, RTCSdpType::Offer | RTCSdpType::Pranswer) => {
                self.pending_remote_description = Some(description);
            }
            (StateChangeOp::SetRemote, RTCSdpType::Answer) => {
                self.current_remote_description = Some(description);
                if let Some(local) = self.pending_local_description.take() {
                    self.current_local_description = Some(local);
                }
                self.pending_remote_description = None;
            }
            (StateChangeOp::SetRemote, _) => {
                self.pending_remote_description = None;
            }
        }

        if next == self.signaling_state {
            return Ok(None);
        }
        self.signaling_state = next;
        Ok(Some(next))
    }

    /// Returns `Some(Closed)` the first time.
    pub(crate) fn close(&mut self) -> Option<RTCSignalingState> {
        self.latest_negotiation_needed = None;
        self.deferred_negotiation_needed = None;
        if self.signaling_state == RTCSignalingState::Closed {
            return None;
        }
        self.signaling_state = RTCSignalingState::Closed;
        Some(RTCSignalingState::Closed)
    }

    /// Only the latest id is held for later delivery; earlier ones are
    /// already superseded.
    pub(crate) fn record_negotiation_needed(&mut self, event_id: u32) {
        self.latest_negotiation_needed = Some(event_id);
        self.deferred_negotiation_needed = Some(event_id);
    }

    /// Negotiation is idle and `event_id` has not been superseded.
    pub(crate) fn should_fire_negotiation_needed(&self, event_id: u32) -> bool {
        self.signaling_state == RTCSignalingState::Stable
            && self.is_operations_chain_empty()
            && self.latest_negotiation_needed == Some(event_id)
    }

    pub(crate) fn clear_negotiation_needed(&mut self) {
        self.latest_negotiation_needed = None;
    }

    pub(crate) fn take_deferred_negotiation_needed(&mut self) -> Option<u32> {
        self.deferred_negotiation_needed.take()
    }
}
