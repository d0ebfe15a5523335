use crate::prediction::Annotation;
use crate::sequence::ProteinSequence;
use crate::sequence_stylizing::score_tiers::{ScoreTier, TierThresholds};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Rendering decision for one owned residue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decoration<'a> {
    pub annotation: &'a Annotation,
    pub tier: ScoreTier,
}

/// Indices of `annotations` sorted by [`Annotation::priority_cmp`].
pub fn priority_order(annotations: &[Annotation]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..annotations.len()).collect();
    order.sort_by(|&a, &b| annotations[a].priority_cmp(&annotations[b]));
    order
}

/// For every residue of `sequence`, the annotation owning it.
///
/// The owner of position `i` is the highest priority annotation covering `i`,
/// provided that annotation is consistent with the sequence; otherwise `i` is
/// left unowned. Lower priority annotations never take over from an
/// inconsistent one.
pub fn resolve_owners<'a>(
    sequence: &ProteinSequence,
    annotations: &'a [Annotation],
) -> Vec<Option<&'a Annotation>> {
    let len = sequence.len();
    let mut owners: Vec<Option<&Annotation>> = vec![None; len];
    if len == 0 || annotations.is_empty() {
        return owners;
    }

    // rank 0 is the highest priority
    let order = priority_order(annotations);
    let mut starts: Vec<Vec<usize>> = vec![Vec::new(); len];
    for (rank, &index) in order.iter().enumerate() {
        let a = &annotations[index];
        if a.start <= a.end && a.start < len {
            starts[a.start].push(rank);
        }
    }
    let consistent: Vec<bool> = order
        .iter()
        .map(|&index| annotations[index].is_consistent_with(sequence))
        .collect();

    // sweep left to right; intervals that ended are discarded lazily
    let mut active: BinaryHeap<Reverse<usize>> = BinaryHeap::new();
    for (pos, owner) in owners.iter_mut().enumerate() {
        active.extend(starts[pos].iter().map(|&rank| Reverse(rank)));
        while let Some(&Reverse(rank)) = active.peek() {
            if annotations[order[rank]].end < pos {
                active.pop();
            } else {
                break;
            }
        }
        if let Some(&Reverse(rank)) = active.peek() {
            if consistent[rank] {
                *owner = Some(&annotations[order[rank]]);
            }
        }
    }

    for (rank, &index) in order.iter().enumerate() {
        if !consistent[rank] {
            let a = &annotations[index];
            log::debug!(
                "annotation {} ({}..={}) does not match the sequence and is left unrendered",
                a.id,
                a.start,
                a.end
            );
        }
    }
    owners
}

/// [`resolve_owners`] plus the display tier of every owner.
pub fn decorate<'a>(
    sequence: &ProteinSequence,
    annotations: &'a [Annotation],
    thresholds: &TierThresholds,
) -> Vec<Option<Decoration<'a>>> {
    resolve_owners(sequence, annotations)
        .into_iter()
        .map(|owner| {
            owner.map(|annotation| Decoration {
                annotation,
                tier: thresholds.tier(annotation.score),
            })
        })
        .collect()
}
