use std::collections::VecDeque;

use crate::peer_connection::configuration::RTCIceCandidateBufferPolicy;
use crate::peer_connection::event::{RTCIceCandidatePairChangeEvent, RTCPeerConnectionIceEvent};
use crate::peer_connection::sdp::{RTCSessionDescription, find_mline_index_by_mid};
use crate::peer_connection::state::{RTCIceConnectionState, RTCIceGatheringState};
use crate::peer_connection::transport::ice::{RTCIceCandidateInit, RTCIceParameters};
use shared::error::{IceError, Result};

/// What happened to a remote candidate passed to
/// [`add_ice_candidate`](crate::peer_connection::RTCPeerConnection::add_ice_candidate).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RTCIceCandidateAddOutcome {
    /// Handed to the engine.
    Applied,
    /// Held until a remote description is set.
    Buffered,
}

/// Tracks ICE gathering, connectivity and remote candidates.
///
/// Engine reports are filtered here before they become application events:
/// stale generations and backwards gathering moves are dropped, repeated
/// connection and receiving states are coalesced.
#[derive(Debug)]
pub struct IceCoordinator {
    buffer_policy: RTCIceCandidateBufferPolicy,
    max_buffered_candidates: usize,

    generation: u32,
    local_parameters: Option<RTCIceParameters>,
    gathering_state: RTCIceGatheringState,
    connection_state: RTCIceConnectionState,
    receiving: bool,
    selected_candidate_pair: Option<RTCIceCandidatePairChangeEvent>,

    local_candidates: Vec<RTCIceCandidateInit>,
    buffered_candidates: VecDeque<RTCIceCandidateInit>,
    remote_candidates: Vec<RTCIceCandidateInit>,
}

impl IceCoordinator {
    pub(crate) fn new(
        buffer_policy: RTCIceCandidateBufferPolicy,
        max_buffered_candidates: usize,
    ) -> Self {
        IceCoordinator {
            buffer_policy,
            max_buffered_candidates,
            generation: 0,
            local_parameters: None,
            gathering_state: RTCIceGatheringState::New,
            connection_state: RTCIceConnectionState::New,
            receiving: false,
            selected_candidate_pair: None,
            local_candidates: vec![],
            buffered_candidates: VecDeque::new(),
            remote_candidates: vec![],
        }
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Credentials of the current generation, once ICE has been restarted.
    pub fn local_parameters(&self) -> Option<&RTCIceParameters> {
        self.local_parameters.as_ref()
    }

    pub fn gathering_state(&self) -> RTCIceGatheringState {
        self.gathering_state
    }

    pub fn connection_state(&self) -> RTCIceConnectionState {
        self.connection_state
    }

    pub fn is_receiving(&self) -> bool {
        self.receiving
    }

    pub fn selected_candidate_pair(&self) -> Option<&RTCIceCandidatePairChangeEvent> {
        self.selected_candidate_pair.as_ref()
    }

    /// Local candidates gathered in the current generation.
    pub fn local_candidates(&self) -> &[RTCIceCandidateInit] {
        &self.local_candidates
    }

    pub fn buffered_candidates(&self) -> impl Iterator<Item = &RTCIceCandidateInit> {
        self.buffered_candidates.iter()
    }

    /// Remote candidates handed to the engine and not removed since.
    pub fn remote_candidates(&self) -> &[RTCIceCandidateInit] {
        &self.remote_candidates
    }

    /// Accepts a remote candidate. With a remote description it is checked
    /// against the description's m-sections and reported as `Applied`;
    /// without one it is buffered or rejected according to the buffer policy.
    pub(crate) fn add_ice_candidate(
        &mut self,
        candidate: &RTCIceCandidateInit,
        remote: Option<&RTCSessionDescription>,
    ) -> Result<RTCIceCandidateAddOutcome> {
        candidate.validate()?;

        let Some(remote) = remote else {
            if self.buffer_policy == RTCIceCandidateBufferPolicy::Reject {
                return Err(IceError::NoRemoteDescription.into());
            }
            if self.buffered_candidates.contains(candidate) {
                log::debug!("candidate {candidate} already buffered");
                return Ok(RTCIceCandidateAddOutcome::Buffered);
            }
            if self.buffered_candidates.len() >= self.max_buffered_candidates {
                return Err(IceError::CandidateBufferFull(self.max_buffered_candidates).into());
            }
            log::debug!("buffering candidate {candidate} until a remote description is set");
            self.buffered_candidates.push_back(candidate.clone());
            return Ok(RTCIceCandidateAddOutcome::Buffered);
        };

        check_candidate_media(candidate, remote)?;
        self.remote_candidates.push(candidate.clone());
        Ok(RTCIceCandidateAddOutcome::Applied)
    }

    /// Drains the buffer in arrival order, returning the candidates that fit
    /// `remote`. The rest are dropped.
    pub(crate) fn take_buffered_candidates(
        &mut self,
        remote: &RTCSessionDescription,
    ) -> Vec<RTCIceCandidateInit> {
        let mut applied = Vec::with_capacity(self.buffered_candidates.len());
        while let Some(candidate) = self.buffered_candidates.pop_front() {
            match check_candidate_media(&candidate, remote) {
                Ok(()) => {
                    self.remote_candidates.push(candidate.clone());
                    applied.push(candidate);
                }
                Err(err) => log::warn!("dropping buffered candidate {candidate}: {err}"),
            }
        }
        applied
    }

    /// Forgets the given remote candidates. Buffered ones are discarded
    /// silently; the applied ones are returned so the engine can drop them.
    pub(crate) fn remove_ice_candidates(
        &mut self,
        candidates: &[RTCIceCandidateInit],
    ) -> Vec<RTCIceCandidateInit> {
        let mut removed = vec![];
        for candidate in candidates {
            if let Some(index) = self
                .buffered_candidates
                .iter()
                .position(|c| same_candidate(c, candidate))
            {
                self.buffered_candidates.remove(index);
            } else if let Some(index) = self
                .remote_candidates
                .iter()
                .position(|c| same_candidate(c, candidate))
            {
                removed.push(self.remote_candidates.remove(index));
            } else {
                log::debug!("ignoring removal of unknown candidate {candidate}");
            }
        }
        removed
    }

    /// Starts a new ICE generation with fresh credentials. Returns the
    /// credentials and, if gathering had progressed, the reset gathering
    /// state.
    pub(crate) fn restart(&mut self) -> (RTCIceParameters, Option<RTCIceGatheringState>) {
        self.generation += 1;
        let parameters = RTCIceParameters::generate(self.generation);
        self.local_parameters = Some(parameters.clone());
        self.local_candidates.clear();

        let reset = if self.gathering_state != RTCIceGatheringState::New {
            self.gathering_state = RTCIceGatheringState::New;
            Some(RTCIceGatheringState::New)
        } else {
            None
        };
        (parameters, reset)
    }

    pub(crate) fn on_local_candidate(
        &mut self,
        generation: u32,
        event: RTCPeerConnectionIceEvent,
    ) -> Option<RTCPeerConnectionIceEvent> {
        if generation != self.generation {
            log::debug!(
                "dropping candidate {} of stale ICE generation {generation}",
                event.candidate
            );
            return None;
        }
        self.local_candidates.push(event.candidate.clone());
        Some(event)
    }

    /// Returns the candidates to report as removed.
    pub(crate) fn on_local_candidates_removed(
        &mut self,
        candidates: Vec<RTCIceCandidateInit>,
    ) -> Vec<RTCIceCandidateInit> {
        self.local_candidates
            .retain(|local| !candidates.iter().any(|c| same_candidate(c, local)));
        candidates
    }

    /// Gathering only moves forward within a generation.
    pub(crate) fn on_gathering_change(
        &mut self,
        generation: u32,
        state: RTCIceGatheringState,
    ) -> Option<RTCIceGatheringState> {
        if generation != self.generation {
            log::debug!("ignoring gathering state {state} of stale ICE generation {generation}");
            return None;
        }
        if state.progress() <= self.gathering_state.progress() {
            log::debug!(
                "ignoring gathering state {state}, already {}",
                self.gathering_state
            );
            return None;
        }
        self.gathering_state = state;
        Some(state)
    }

    pub(crate) fn on_connection_change(
        &mut self,
        state: RTCIceConnectionState,
    ) -> Option<RTCIceConnectionState> {
        if state == self.connection_state {
            return None;
        }
        self.connection_state = state;
        Some(state)
    }

    pub(crate) fn on_receiving_change(&mut self, receiving: bool) -> Option<bool> {
        if receiving == self.receiving {
            return None;
        }
        self.receiving = receiving;
        Some(receiving)
    }

    pub(crate) fn on_candidate_pair_changed(&mut self, event: &RTCIceCandidatePairChangeEvent) {
        self.selected_candidate_pair = Some(event.clone());
    }

    /// Drops buffered candidates and moves connectivity to `Closed`. Returns
    /// the new connection state if it changed.
    pub(crate) fn close(&mut self) -> Option<RTCIceConnectionState> {
        self.buffered_candidates.clear();
        self.on_connection_change(RTCIceConnectionState::Closed)
    }
}

/// Same candidate line on the same m-section. The mid decides when both
/// sides carry one; the m-line index only when neither does.
fn same_candidate(a: &RTCIceCandidateInit, b: &RTCIceCandidateInit) -> bool {
    if a.candidate != b.candidate {
        return false;
    }
    let mid = |c: &RTCIceCandidateInit| c.sdp_mid.clone().filter(|mid| !mid.is_empty());
    match (mid(a), mid(b)) {
        (Some(a_mid), Some(b_mid)) => a_mid == b_mid,
        (None, None) => matches!(
            (a.sdp_mline_index, b.sdp_mline_index),
            (Some(a_index), Some(b_index)) if a_index == b_index
        ),
        _ => false,
    }
}

/// The candidate must name an m-section that exists in `remote`. `sdp_mid`
/// wins over `sdp_mline_index` when both are set.
fn check_candidate_media(
    candidate: &RTCIceCandidateInit,
    remote: &RTCSessionDescription,
) -> Result<()> {
    let Some(parsed) = remote.parsed.as_ref() else {
        return Ok(());
    };

    if let Some(mid) = candidate.sdp_mid.as_deref().filter(|mid| !mid.is_empty()) {
        if find_mline_index_by_mid(parsed, mid).is_none() {
            return Err(IceError::InvalidCandidate(format!(
                "remote description has no m-section with mid {mid}"
            ))
            .into());
        }
    } else if let Some(index) = candidate.sdp_mline_index {
        let count = parsed.media_descriptions.len();
        if usize::from(index) >= count {
            return Err(IceError::InvalidCandidate(format!(
                "sdp_mline_index {index} out of range, remote description has {count} m-sections"
            ))
            .into());
        }
    }
    Ok(())
}
