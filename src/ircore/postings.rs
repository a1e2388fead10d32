use serde::{Serialize, Deserialize};
use std::collections::HashSet;
use super::RecordId;

/// Set of record ids a term occurs in.
///
/// Ids are kept in insertion order, each id at most once. Membership is all
/// that matters to callers; the order is only there to make output stable.
///
/// Persisted as the plain id list, membership is rebuilt on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<RecordId>", into = "Vec<RecordId>")]
pub struct PostingSet {
    records: Vec<RecordId>,
    members: HashSet<RecordId>,
}

impl PostingSet {
    pub fn new() -> Self {
        PostingSet{records: vec![], members: HashSet::new()}
    }

    // returns false when the id was already present
    pub fn insert(&mut self, record_id: RecordId) -> bool {
        if !self.members.insert(record_id) {
            return false;
        }
        self.records.push(record_id);
        true
    }

    pub fn contains(&self, record_id: RecordId) -> bool {
        self.members.contains(&record_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecordId> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[RecordId] {
        &self.records
    }

    pub fn as_set(&self) -> &HashSet<RecordId> {
        &self.members
    }

    pub fn to_set(&self) -> HashSet<RecordId> {
        self.members.clone()
    }
}

impl From<Vec<RecordId>> for PostingSet {
    fn from(records: Vec<RecordId>) -> Self {
        records.into_iter().collect()
    }
}

impl From<PostingSet> for Vec<RecordId> {
    fn from(set: PostingSet) -> Self {
        set.records
    }
}

impl FromIterator<RecordId> for PostingSet {
    fn from_iter<I: IntoIterator<Item = RecordId>>(iter: I) -> Self {
        let mut set = PostingSet::new();
        for record_id in iter {
            set.insert(record_id);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_idempotent() {
        let mut set = PostingSet::new();
        assert!(set.insert(1));
        assert!(set.insert(3));
        assert!(!set.insert(3));
        assert!(!set.insert(1));
        assert_eq!(set.len(), 2);
        assert_eq!(set.as_slice(), &[1, 3]);
    }

    #[test]
    fn test_insertion_order_kept() {
        let set: PostingSet = vec![5, 2, 5, 9, 2].into_iter().collect();
        assert_eq!(set.as_slice(), &[5, 2, 9]);
        assert!(set.contains(9));
        assert!(!set.contains(1));
        assert_eq!(set.to_set(), HashSet::from([2, 5, 9]));
    }

    #[test]
    fn test_many_records() {
        let mut set = PostingSet::new();
        for record_id in 1..=200_000 {
            assert!(set.insert(record_id));
        }
        for record_id in (1..=200_000).step_by(7) {
            assert!(!set.insert(record_id));
        }
        assert_eq!(set.len(), 200_000);
        assert!(set.contains(123_456));
        assert!(!set.contains(200_001));
        // out of order ids are deduplicated too
        assert!(!set.insert(3));
        assert!(set.insert(0));
        assert_eq!(set.as_slice().last(), Some(&0));
    }

    #[test]
    fn test_membership_survives_serialization() {
        let set: PostingSet = vec![4, 1, 9].into_iter().collect();
        let encoded = bincode::serialize(&set).unwrap();
        assert_eq!(encoded, bincode::serialize(&vec![4u32, 1, 9]).unwrap());
        let mut loaded: PostingSet = bincode::deserialize(&encoded).unwrap();
        assert_eq!(loaded, set);
        assert!(loaded.contains(9));
        assert!(!loaded.insert(1));
        assert_eq!(loaded.as_set(), &HashSet::from([1, 4, 9]));
    }
}
