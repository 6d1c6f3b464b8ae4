//! Canonical output shapes.
//!
//! A run produces exactly one of these and hands it whole to the JSON sink and
//! the summary reporter. Serialization is the on-disk format: the grouped
//! catalog is a bare JSON object, the ranking table is the `{"data": [...]}`
//! envelope.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Canonical field names of a ranking record, in projection order.
pub const RANKING_FIELDS: [&str; 3] = ["score", "num", "accumulate"];

/// Group key mapped to its distinct members.
///
/// Keys iterate in byte order and members are kept sorted, so two builds over
/// the same rows serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupedCatalog {
    groups: BTreeMap<String, BTreeSet<String>>,
}

impl GroupedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures `key` is present, even if no member is ever added.
    pub fn touch(&mut self, key: impl Into<String>) -> &mut BTreeSet<String> {
        self.groups.entry(key.into()).or_default()
    }

    /// Adds a member under `key`. Returns false when it was already present.
    pub fn insert(&mut self, key: impl Into<String>, member: impl Into<String>) -> bool {
        self.touch(key).insert(member.into())
    }

    pub fn get(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.groups.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.groups.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.groups.iter()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Total members across all groups.
    pub fn member_count(&self) -> usize {
        self.groups.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups ordered by member count, largest first; ties by key.
    pub fn by_member_count(&self) -> Vec<(&str, &BTreeSet<String>)> {
        let mut ordered: Vec<(&str, &BTreeSet<String>)> = self
            .groups
            .iter()
            .map(|(key, members)| (key.as_str(), members))
            .collect();
        ordered.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(b.0)));
        ordered
    }
}

/// One row of a score ranking table.
///
/// `score` stays text: sources publish values such as `"700-750"` or
/// `"695及以上"` that must survive unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RankingRecord {
    pub score: String,
    pub num: i64,
    pub accumulate: i64,
}

impl RankingRecord {
    pub fn new(score: impl Into<String>, num: i64, accumulate: i64) -> Self {
        Self {
            score: score.into(),
            num,
            accumulate,
        }
    }
}

/// Ranking records in source order, wrapped in the `data` envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RankingTable {
    pub data: Vec<RankingRecord>,
}

impl RankingTable {
    pub fn new(data: Vec<RankingRecord>) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Which of the two canonical structures a document holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Flat,
    Grouped,
}

impl Shape {
    pub fn name(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Grouped => "grouped",
        }
    }
}

/// The structure a run produces.
///
/// Untagged: each variant's own envelope is the whole document. When reading
/// back, `{"data": [...]}` resolves to [`CanonicalResult::Flat`]. A grouped
/// catalog whose only key is `data` and which has no members serializes to
/// `{"data": []}`, the same text as an empty ranking table, and reads back as
/// `Flat`. Read such a document with an explicit [`Shape`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CanonicalResult {
    Flat(RankingTable),
    Grouped(GroupedCatalog),
}

impl CanonicalResult {
    /// Number of groups or records.
    pub fn entry_count(&self) -> usize {
        match self {
            Self::Grouped(catalog) => catalog.group_count(),
            Self::Flat(table) => table.len(),
        }
    }

    pub fn shape(&self) -> Shape {
        match self {
            Self::Grouped(_) => Shape::Grouped,
            Self::Flat(_) => Shape::Flat,
        }
    }

    pub fn shape_name(&self) -> &'static str {
        self.shape().name()
    }
}

impl From<GroupedCatalog> for CanonicalResult {
    fn from(value: GroupedCatalog) -> Self {
        Self::Grouped(value)
    }
}

impl From<RankingTable> for CanonicalResult {
    fn from(value: RankingTable) -> Self {
        Self::Flat(value)
    }
}
