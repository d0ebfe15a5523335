use crate::prediction::Annotation;
use gcollections::ops::set::{Intersection, Union};
use gcollections::ops::Empty;
use interval::interval_set::{IntervalSet, ToIntervalSet};
use interval::ops::Width;

/// Positions covered by at least two of the given sets
pub fn find_intersections<Bound: Width + num_traits::Num>(
    sets: &[IntervalSet<Bound>],
) -> IntervalSet<Bound> {
    sets.iter()
        .enumerate()
        .flat_map(|(i, x)| sets.iter().skip(i + 1).map(move |y| (x, y)))
        .fold(IntervalSet::empty(), |acc, (j, k)| acc.union(&j.intersection(k)))
}

/// Convert boolean vector to IntervalSet
pub fn bool_vector_to_intervals(bool_vec: &[bool]) -> IntervalSet<usize> {
    let mut intervals = Vec::new();
    let mut start = None;

    for (i, &is_active) in bool_vec.iter().enumerate() {
        match (start, is_active) {
            (None, true) => start = Some(i),
            (Some(s), false) => {
                intervals.push((s, i - 1));
                start = None;
            }
            _ => {}
        }
    }

    // sequence ends inside a run
    if let Some(s) = start {
        intervals.push((s, bool_vec.len() - 1));
    }

    intervals.to_interval_set()
}

/// Residues covered by two or more annotations, clipped to `len`.
pub fn contested_positions(annotations: &[Annotation], len: usize) -> IntervalSet<usize> {
    if len == 0 {
        return IntervalSet::empty();
    }
    let sets: Vec<IntervalSet<usize>> = annotations
        .iter()
        .filter(|a| a.start <= a.end && a.start < len)
        .map(|a| vec![(a.start, a.end.min(len - 1))].to_interval_set())
        .collect();
    find_intersections(&sets)
}
