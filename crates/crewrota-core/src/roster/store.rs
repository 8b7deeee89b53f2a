//! The roster store.
//!
//! State lives behind one `RwLock`: reads observe a roster state that
//! existed at some point (never a partial add/remove) and mutations
//! serialize through the write half. Membership operations are idempotent
//! and report their outcome as a [`MembershipChange`] status, not an error,
//! so retrying them is always safe.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::RosterError;
use crate::models::{DriverClass, Member, Rank, Squad, SquadType};

/// Outcome of an idempotent membership operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipChange {
    Added,
    AlreadyPresent,
    Removed,
    NotPresent,
}

/// A squad together with its membership set.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SquadEntry {
    squad: Squad,
    member_ids: BTreeSet<i64>,
}

/// The complete persisted roster state.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RosterState {
    squad_types: BTreeMap<String, SquadType>,
    /// Squads per type name, kept sorted by ordinal.
    squads: BTreeMap<String, Vec<SquadEntry>>,
    members: BTreeMap<i64, Member>,
    next_member_id: i64,
}

pub struct RosterStore {
    state: RwLock<RosterState>,
}

impl Default for RosterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RosterStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RosterState {
                next_member_id: 1,
                ..RosterState::default()
            }),
        }
    }

    // A poisoned lock still holds the last written state; every mutation
    // here is a single map/set operation that cannot leave it torn.
    fn read(&self) -> RwLockReadGuard<'_, RosterState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RosterState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ===== Squad types and squads =====

    /// Register (or replace) a squad type. Existing squads of that type are
    /// kept.
    pub fn register_squad_type(&self, squad_type: SquadType) {
        let mut state = self.write();
        debug!(squad_type = %squad_type.name, count = squad_type.squad_count, "Registering squad type");
        state.squads.entry(squad_type.name.clone()).or_default();
        state.squad_types.insert(squad_type.name.clone(), squad_type);
    }

    /// Replace the squad list of a type. Ordinals are assigned from the
    /// order of `names`, contiguous from 0. Memberships of squads that keep
    /// their name survive.
    pub fn register_squads<S: AsRef<str>>(
        &self,
        squad_type: &str,
        names: &[S],
    ) -> Result<(), RosterError> {
        let mut state = self.write();
        if !state.squad_types.contains_key(squad_type) {
            return Err(RosterError::UnknownSquadType(squad_type.to_string()));
        }
        let old = state.squads.remove(squad_type).unwrap_or_default();
        let entries = names
            .iter()
            .enumerate()
            .map(|(ordinal, name)| {
                let name = name.as_ref().to_string();
                let member_ids = old
                    .iter()
                    .find(|e| e.squad.name == name)
                    .map(|e| e.member_ids.clone())
                    .unwrap_or_default();
                SquadEntry {
                    squad: Squad { name, ordinal },
                    member_ids,
                }
            })
            .collect();
        state.squads.insert(squad_type.to_string(), entries);
        Ok(())
    }

    /// Append one squad at the end of a type's rotation.
    pub fn add_squad(&self, squad_type: &str, name: &str) -> Result<Squad, RosterError> {
        let mut state = self.write();
        if !state.squad_types.contains_key(squad_type) {
            return Err(RosterError::UnknownSquadType(squad_type.to_string()));
        }
        let entries = state.squads.entry(squad_type.to_string()).or_default();
        let squad = Squad {
            name: name.to_string(),
            ordinal: entries.len(),
        };
        entries.push(SquadEntry {
            squad: squad.clone(),
            member_ids: BTreeSet::new(),
        });
        debug!(squad_type, squad = name, ordinal = squad.ordinal, "Squad added");
        Ok(squad)
    }

    /// Remove a squad. The remaining ordinals are compacted so they stay
    /// contiguous from 0.
    pub fn remove_squad(&self, squad_type: &str, name: &str) -> Result<(), RosterError> {
        let mut state = self.write();
        let entries = state
            .squads
            .get_mut(squad_type)
            .ok_or_else(|| RosterError::UnknownSquadType(squad_type.to_string()))?;
        let position = entries
            .iter()
            .position(|e| e.squad.name == name)
            .ok_or_else(|| RosterError::UnknownSquad {
                squad_type: squad_type.to_string(),
                squad: name.to_string(),
            })?;
        entries.remove(position);
        for (ordinal, entry) in entries.iter_mut().enumerate() {
            entry.squad.ordinal = ordinal;
        }
        debug!(squad_type, squad = name, "Squad removed");
        Ok(())
    }

    pub fn squad_type(&self, name: &str) -> Option<SquadType> {
        self.read().squad_types.get(name).cloned()
    }

    pub fn squad_types(&self) -> Vec<SquadType> {
        self.read().squad_types.values().cloned().collect()
    }

    /// Squads of a type, ordered by ordinal. Empty when the type has no
    /// squads registered (or is unknown); that is not an error.
    pub fn squads_of(&self, squad_type: &str) -> Vec<Squad> {
        self.read()
            .squads
            .get(squad_type)
            .map(|entries| entries.iter().map(|e| e.squad.clone()).collect())
            .unwrap_or_default()
    }

    // ===== Members =====

    /// Create a member and assign it the next free id.
    pub fn add_member(
        &self,
        rank: Rank,
        driver_class: DriverClass,
        family_name: &str,
        given_name: &str,
    ) -> Member {
        let mut state = self.write();
        let id = state.next_member_id;
        state.next_member_id += 1;
        let member = Member {
            id,
            rank,
            driver_class,
            family_name: family_name.to_string(),
            given_name: given_name.to_string(),
        };
        debug!(id, name = %member.full_name(), "Member added");
        state.members.insert(id, member.clone());
        member
    }

    pub fn member(&self, id: i64) -> Result<Member, RosterError> {
        self.read()
            .members
            .get(&id)
            .cloned()
            .ok_or(RosterError::UnknownMember(id))
    }

    /// Replace a member's record (the explicit edit operation).
    pub fn update_member(&self, member: Member) -> Result<(), RosterError> {
        let mut state = self.write();
        if !state.members.contains_key(&member.id) {
            return Err(RosterError::UnknownMember(member.id));
        }
        state.members.insert(member.id, member);
        Ok(())
    }

    /// Remove a member and clear every membership that references them.
    pub fn remove_member(&self, id: i64) -> Result<Member, RosterError> {
        let mut state = self.write();
        let member = state
            .members
            .remove(&id)
            .ok_or(RosterError::UnknownMember(id))?;
        for entries in state.squads.values_mut() {
            for entry in entries.iter_mut() {
                entry.member_ids.remove(&id);
            }
        }
        debug!(id, name = %member.full_name(), "Member removed");
        Ok(member)
    }

    /// All members, in the fixed presentation order.
    pub fn members(&self) -> Vec<Member> {
        let mut members: Vec<Member> = self.read().members.values().cloned().collect();
        members.sort_by_key(Member::sort_key);
        members
    }

    // ===== Memberships =====

    /// Add a member to a squad. A no-op when the pair already exists.
    pub fn add_membership(
        &self,
        squad_type: &str,
        squad: &str,
        member_id: i64,
    ) -> Result<MembershipChange, RosterError> {
        let mut state = self.write();
        if !state.members.contains_key(&member_id) {
            return Err(RosterError::UnknownMember(member_id));
        }
        let entry = find_squad_mut(&mut state, squad_type, squad)?;
        if entry.member_ids.insert(member_id) {
            debug!(squad_type, squad, member_id, "Membership added");
            Ok(MembershipChange::Added)
        } else {
            Ok(MembershipChange::AlreadyPresent)
        }
    }

    /// Remove a member from a squad. A no-op when the pair is absent.
    pub fn remove_membership(
        &self,
        squad_type: &str,
        squad: &str,
        member_id: i64,
    ) -> Result<MembershipChange, RosterError> {
        let mut state = self.write();
        let entry = find_squad_mut(&mut state, squad_type, squad)?;
        if entry.member_ids.remove(&member_id) {
            debug!(squad_type, squad, member_id, "Membership removed");
            Ok(MembershipChange::Removed)
        } else {
            Ok(MembershipChange::NotPresent)
        }
    }

    /// Members of one squad, in the fixed presentation order: rank (senior
    /// first), driver class descending, then family and given name.
    ///
    /// The order is a contract and never depends on insertion order.
    pub fn members_of(&self, squad_type: &str, squad: &str) -> Result<Vec<Member>, RosterError> {
        let state = self.read();
        let entries = state
            .squads
            .get(squad_type)
            .ok_or_else(|| RosterError::UnknownSquadType(squad_type.to_string()))?;
        let entry = entries
            .iter()
            .find(|e| e.squad.name == squad)
            .ok_or_else(|| RosterError::UnknownSquad {
                squad_type: squad_type.to_string(),
                squad: squad.to_string(),
            })?;
        let mut members: Vec<Member> = entry
            .member_ids
            .iter()
            .filter_map(|id| state.members.get(id).cloned())
            .collect();
        members.sort_by_key(Member::sort_key);
        Ok(members)
    }

    /// Every (squad type, squad) the member sits in, for "your squads"
    /// style listings.
    pub fn squads_of_member(&self, member_id: i64) -> Result<Vec<(String, Squad)>, RosterError> {
        let state = self.read();
        if !state.members.contains_key(&member_id) {
            return Err(RosterError::UnknownMember(member_id));
        }
        let mut result = Vec::new();
        for (type_name, entries) in &state.squads {
            for entry in entries {
                if entry.member_ids.contains(&member_id) {
                    result.push((type_name.clone(), entry.squad.clone()));
                }
            }
        }
        Ok(result)
    }

    // ===== Persistence =====

    /// Load a store from a JSON snapshot file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read roster snapshot: {}", path.display()))?;
        let state: RosterState = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse roster snapshot: {}", path.display()))?;
        info!(
            path = %path.display(),
            members = state.members.len(),
            squad_types = state.squad_types.len(),
            "Roster snapshot loaded"
        );
        Ok(Self {
            state: RwLock::new(state),
        })
    }

    /// Write the current state as a JSON snapshot file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = {
            let state = self.read();
            serde_json::to_string_pretty(&*state)?
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write roster snapshot: {}", path.display()))?;
        debug!(path = %path.display(), "Roster snapshot saved");
        Ok(())
    }
}

fn find_squad_mut<'a>(
    state: &'a mut RosterState,
    squad_type: &str,
    squad: &str,
) -> Result<&'a mut SquadEntry, RosterError> {
    let entries = state
        .squads
        .get_mut(squad_type)
        .ok_or_else(|| RosterError::UnknownSquadType(squad_type.to_string()))?;
    entries
        .iter_mut()
        .find(|e| e.squad.name == squad)
        .ok_or_else(|| RosterError::UnknownSquad {
            squad_type: squad_type.to_string(),
            squad: squad.to_string(),
        })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_squads() -> RosterStore {
        let store = RosterStore::new();
        store.register_squad_type(SquadType {
            name: "weekend".to_string(),
            description: "Weekend squads".to_string(),
            squad_count: 4,
        });
        store
            .register_squads("weekend", &["A", "B", "C", "D"])
            .unwrap();
        store
    }

    #[test]
    fn test_squads_of_ordered_by_ordinal() {
        let store = store_with_squads();
        let squads = store.squads_of("weekend");
        let names: Vec<&str> = squads.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C", "D"]);
        assert_eq!(squads[3].ordinal, 3);
    }

    #[test]
    fn test_squads_of_unknown_type_is_empty() {
        let store = RosterStore::new();
        assert!(store.squads_of("nope").is_empty());
    }

    #[test]
    fn test_add_squad_appends_and_remove_compacts() {
        let store = store_with_squads();
        let squad = store.add_squad("weekend", "E").unwrap();
        assert_eq!(squad.ordinal, 4);

        store.remove_squad("weekend", "B").unwrap();
        let squads = store.squads_of("weekend");
        let ordinals: Vec<usize> = squads.iter().map(|s| s.ordinal).collect();
        assert_eq!(ordinals, [0, 1, 2, 3]);
        assert_eq!(squads[1].name, "C");
    }

    #[test]
    fn test_membership_add_is_idempotent() {
        let store = store_with_squads();
        let member = store.add_member(Rank::Standard, DriverClass::ClassII, "Rossi", "Marco");

        assert_eq!(
            store.add_membership("weekend", "A", member.id).unwrap(),
            MembershipChange::Added
        );
        assert_eq!(
            store.add_membership("weekend", "A", member.id).unwrap(),
            MembershipChange::AlreadyPresent
        );
        assert_eq!(store.members_of("weekend", "A").unwrap().len(), 1);
    }

    #[test]
    fn test_membership_remove_is_idempotent() {
        let store = store_with_squads();
        let member = store.add_member(Rank::Standard, DriverClass::None, "Rossi", "Marco");
        store.add_membership("weekend", "A", member.id).unwrap();

        assert_eq!(
            store.remove_membership("weekend", "A", member.id).unwrap(),
            MembershipChange::Removed
        );
        assert_eq!(
            store.remove_membership("weekend", "A", member.id).unwrap(),
            MembershipChange::NotPresent
        );
    }

    #[test]
    fn test_membership_unknown_references() {
        let store = store_with_squads();
        let member = store.add_member(Rank::Standard, DriverClass::None, "Rossi", "Marco");

        assert!(matches!(
            store.add_membership("nope", "A", member.id),
            Err(RosterError::UnknownSquadType(_))
        ));
        assert!(matches!(
            store.add_membership("weekend", "Z", member.id),
            Err(RosterError::UnknownSquad { .. })
        ));
        assert!(matches!(
            store.add_membership("weekend", "A", 999),
            Err(RosterError::UnknownMember(999))
        ));
    }

    #[test]
    fn test_members_of_order_invariant_to_insertion() {
        // Insert the same four members in two different orders and expect
        // the identical listing from both stores.
        let fixtures = [
            (Rank::Standard, DriverClass::ClassI, "Bianchi", "Luca"),
            (Rank::Senior, DriverClass::None, "Verdi", "Anna"),
            (Rank::Standard, DriverClass::ClassIII, "Rossi", "Marco"),
            (Rank::Standard, DriverClass::ClassIII, "Neri", "Paola"),
        ];

        let listing = |order: &[usize]| -> Vec<String> {
            let store = store_with_squads();
            for &i in order {
                let (rank, driver, family, given) = fixtures[i];
                let m = store.add_member(rank, driver, family, given);
                store.add_membership("weekend", "A", m.id).unwrap();
            }
            store
                .members_of("weekend", "A")
                .unwrap()
                .iter()
                .map(Member::full_name)
                .collect()
        };

        let expected = [
            "Verdi Anna",
            "Neri Paola",
            "Rossi Marco",
            "Bianchi Luca",
        ];
        assert_eq!(listing(&[0, 1, 2, 3]), expected);
        assert_eq!(listing(&[3, 2, 1, 0]), expected);
        assert_eq!(listing(&[2, 0, 3, 1]), expected);
    }

    #[test]
    fn test_remove_member_clears_memberships() {
        let store = store_with_squads();
        let member = store.add_member(Rank::Senior, DriverClass::ClassII, "Rossi", "Marco");
        store.add_membership("weekend", "A", member.id).unwrap();
        store.add_membership("weekend", "B", member.id).unwrap();

        store.remove_member(member.id).unwrap();
        assert!(store.members_of("weekend", "A").unwrap().is_empty());
        assert!(store.members_of("weekend", "B").unwrap().is_empty());
        assert!(matches!(
            store.member(member.id),
            Err(RosterError::UnknownMember(_))
        ));
    }

    #[test]
    fn test_squads_of_member_across_types() {
        let store = store_with_squads();
        store.register_squad_type(SquadType {
            name: "evening".to_string(),
            description: "Evening squads".to_string(),
            squad_count: 2,
        });
        store.register_squads("evening", &["S1", "S2"]).unwrap();

        let member = store.add_member(Rank::Standard, DriverClass::ClassI, "Rossi", "Marco");
        store.add_membership("weekend", "D", member.id).unwrap();
        store.add_membership("evening", "S1", member.id).unwrap();

        // Types iterate in name order, so the listing is deterministic
        let squads = store.squads_of_member(member.id).unwrap();
        assert_eq!(squads.len(), 2);
        assert_eq!(squads[0].0, "evening");
        assert_eq!(squads[0].1.name, "S1");
        assert_eq!(squads[1].0, "weekend");
        assert_eq!(squads[1].1.name, "D");
    }

    #[test]
    fn test_update_member() {
        let store = store_with_squads();
        let mut member = store.add_member(Rank::Standard, DriverClass::ClassI, "Rossi", "Marco");
        member.driver_class = DriverClass::ClassII;
        store.update_member(member.clone()).unwrap();
        assert_eq!(
            store.member(member.id).unwrap().driver_class,
            DriverClass::ClassII
        );

        member.id = 999;
        assert!(matches!(
            store.update_member(member),
            Err(RosterError::UnknownMember(999))
        ));
    }

    #[test]
    fn test_register_squads_preserves_memberships_by_name() {
        let store = store_with_squads();
        let member = store.add_member(Rank::Standard, DriverClass::None, "Rossi", "Marco");
        store.add_membership("weekend", "C", member.id).unwrap();

        // Re-register with C moved to the front: membership follows the name
        store
            .register_squads("weekend", &["C", "A", "B", "D"])
            .unwrap();
        assert_eq!(store.squads_of("weekend")[0].name, "C");
        assert_eq!(store.members_of("weekend", "C").unwrap().len(), 1);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let store = store_with_squads();
        let member = store.add_member(Rank::Senior, DriverClass::ClassIII, "Rossi", "Marco");
        store.add_membership("weekend", "B", member.id).unwrap();

        let path = std::env::temp_dir().join(format!("crewrota-test-{}.json", std::process::id()));
        store.save_to(&path).unwrap();
        let restored = RosterStore::load_from(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(restored.squads_of("weekend").len(), 4);
        let members = restored.members_of("weekend", "B").unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].full_name(), "Rossi Marco");
        // Ids keep advancing from where the snapshot left off
        let next = restored.add_member(Rank::Standard, DriverClass::None, "Verdi", "Anna");
        assert!(next.id > member.id);
    }
}
