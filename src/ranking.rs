use crate::prediction::Annotation;
use crate::sequence_stylizing::priority_order;
use std::cmp::Ordering;

/// An annotation together with its 1-based rank by descending score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedAnnotation<'a> {
    pub rank: usize,
    pub annotation: &'a Annotation,
}

/// Rank annotations using the same priority order the sequence view uses to
/// resolve overlaps, so ties rank identically everywhere.
pub fn rank(annotations: &[Annotation]) -> Vec<RankedAnnotation<'_>> {
    priority_order(annotations)
        .into_iter()
        .enumerate()
        .map(|(i, index)| RankedAnnotation {
            rank: i + 1,
            annotation: &annotations[index],
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Rank,
    Position,
    Score,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortConfig {
    /// Next sort configuration after the user asks to sort by `key`:
    /// ascending, unless `key` is already sorted ascending.
    pub fn request(current: Option<SortConfig>, key: SortKey) -> SortConfig {
        let direction = match current {
            Some(SortConfig {
                key: current_key,
                direction: SortDirection::Ascending,
            }) if current_key == key => SortDirection::Descending,
            _ => SortDirection::Ascending,
        };
        SortConfig { key, direction }
    }

    fn compare(&self, a: &RankedAnnotation, b: &RankedAnnotation) -> Ordering {
        let ordering = match self.key {
            SortKey::Rank => a.rank.cmp(&b.rank),
            SortKey::Position => a.annotation.start.cmp(&b.annotation.start),
            SortKey::Score => a.annotation.score.total_cmp(&b.annotation.score),
        };
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Table rows: ranked annotations, re-sorted by `sort` if given.
/// Rows with equal keys stay in rank order.
pub fn table_rows(annotations: &[Annotation], sort: Option<SortConfig>) -> Vec<RankedAnnotation<'_>> {
    let mut rows = rank(annotations);
    if let Some(sort) = sort {
        rows.sort_by(|a, b| sort.compare(a, b));
    }
    rows
}
