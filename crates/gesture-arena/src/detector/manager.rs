//! Static detector relations resolved against the live member set.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexSet;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use super::{GestureDetector, GestureId};
use crate::member::{MemberId, MemberRef, MemberRegistry};

/// Members and gesture ids that keep running next to a winner.
#[derive(Default)]
pub struct SimultaneousWinners {
    /// Other members owning a detector the winner declared simultaneous.
    pub members: SmallVec<[MemberRef; 2]>,
    /// Simultaneous ids owned by the winner itself; exempt from the
    /// per-member race.
    pub gesture_ids: FxHashSet<GestureId>,
}

/// Resolves the simultaneous group of a winner.
pub trait SimultaneousResolver {
    fn handle_simultaneous_winner(&self, current: &MemberRef) -> Option<SimultaneousWinners>;
}

/// Tracks which members own which gesture ids.
pub struct GestureDetectorManager {
    gesture_to_members: RefCell<FxHashMap<GestureId, IndexSet<MemberId>>>,
    registry: Rc<MemberRegistry>,
}

impl GestureDetectorManager {
    pub fn new(registry: Rc<MemberRegistry>) -> Self {
        Self {
            gesture_to_members: RefCell::new(FxHashMap::default()),
            registry,
        }
    }

    pub fn register_gesture_detector(&self, member_id: MemberId, detector: &GestureDetector) {
        self.gesture_to_members
            .borrow_mut()
            .entry(detector.id())
            .or_default()
            .insert(member_id);
    }

    pub fn unregister_gesture_detector(&self, member_id: MemberId, detector: &GestureDetector) {
        let mut map = self.gesture_to_members.borrow_mut();
        let Some(members) = map.get_mut(&detector.id()) else {
            return;
        };
        members.shift_remove(&member_id);
        if members.is_empty() {
            map.remove(&detector.id());
        }
    }

    /// Members registered for `gesture_id`, in registration order.
    pub fn members_for(&self, gesture_id: GestureId) -> Vec<MemberId> {
        self.gesture_to_members
            .borrow()
            .get(&gesture_id)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    fn members_for_all(&self, gesture_ids: &[GestureId]) -> IndexSet<MemberId> {
        let map = self.gesture_to_members.borrow();
        gesture_ids
            .iter()
            .filter_map(|id| map.get(id))
            .flat_map(|members| members.iter().copied())
            .collect()
    }

    /// Reorders a hit-test response chain (innermost first) by the
    /// `waitFor` and `continueWith` relations of its members.
    ///
    /// For each node the first detector, in ascending id order, that
    /// declares either relation decides. `waitFor` pulls the matching members
    /// that sit further out in the chain in front of the node and ends the
    /// chain there; a `waitFor` that moves nobody leaves the node in place.
    /// `continueWith` appends the matching members after the node and ends
    /// the chain, also after a `waitFor` that moved members.
    pub fn convert_response_chain_to_compete_chain(
        &self,
        response_chain: &[MemberRef],
    ) -> Vec<MemberRef> {
        let mut result = Vec::with_capacity(response_chain.len());

        for (index, node) in response_chain.iter().enumerate() {
            let relations = node.gesture_detectors().and_then(|detectors| {
                detectors.values().map(GestureDetector::relations).find(|relations| {
                    !relations.wait_for.is_empty() || !relations.continue_with.is_empty()
                })
            });
            let Some(relations) = relations else {
                result.push(node.clone());
                continue;
            };

            if !relations.wait_for.is_empty() {
                let waited = self.members_for_all(&relations.wait_for);
                let node_id = node.arena_member_id();
                let last_index = response_chain
                    .iter()
                    .rposition(|member| member.arena_member_id() == node_id)
                    .unwrap_or(index);
                let mut moved = false;
                for member_id in &waited {
                    for candidate in &response_chain[last_index + 1..] {
                        if candidate.arena_member_id() == *member_id {
                            result.push(candidate.clone());
                            moved = true;
                        }
                    }
                }
                result.push(node.clone());
                if !moved {
                    continue;
                }
                log::trace!("member {node_id} waits for {} member(s)", waited.len());
            } else {
                result.push(node.clone());
            }

            self.append_continue_with(&mut result, &relations.continue_with);
            break;
        }

        result
    }

    fn append_continue_with(&self, result: &mut Vec<MemberRef>, gesture_ids: &[GestureId]) {
        for member_id in self.members_for_all(gesture_ids) {
            match self.registry.get(member_id) {
                Some(member) => result.push(member),
                None => log::debug!("continueWith target {member_id} is not in the arena"),
            }
        }
    }

    pub fn clear(&self) {
        self.gesture_to_members.borrow_mut().clear();
    }
}

impl SimultaneousResolver for GestureDetectorManager {
    fn handle_simultaneous_winner(&self, current: &MemberRef) -> Option<SimultaneousWinners> {
        let detectors = current.gesture_detectors()?;
        let current_id = current.arena_member_id();
        let mut winners = SimultaneousWinners::default();
        let map = self.gesture_to_members.borrow();

        for detector in detectors.values() {
            for &gesture_id in &detector.relations().simultaneous {
                if detectors.contains_key(&gesture_id) {
                    winners.gesture_ids.insert(gesture_id);
                    continue;
                }
                let Some(member_ids) = map.get(&gesture_id) else {
                    continue;
                };
                for &member_id in member_ids {
                    if member_id == current_id
                        || winners
                            .members
                            .iter()
                            .any(|member| member.arena_member_id() == member_id)
                    {
                        continue;
                    }
                    if let Some(member) = self.registry.get(member_id) {
                        winners.members.push(member);
                    }
                }
            }
        }

        Some(winners)
    }
}

#[cfg(test)]
#[path = "../tests/detector_manager_tests.rs"]
mod tests;
