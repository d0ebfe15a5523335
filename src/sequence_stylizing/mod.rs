mod interval_operations;
pub mod combined_styling;
pub mod overlap_resolver;
pub mod score_tiers;

pub use crate::sequence_stylizing::combined_styling::{
    highlight_with_combined_styles, CombinedStyle, StyleInput,
};
pub use crate::sequence_stylizing::interval_operations::contested_positions;
pub use crate::sequence_stylizing::overlap_resolver::{
    decorate, priority_order, resolve_owners, Decoration,
};
pub use crate::sequence_stylizing::score_tiers::{ScoreTier, TierThresholds};

use crate::prediction::{Annotation, ResultSet};
use ratatui::prelude::Line;

/// Color-coded lines for the sequence of `result`.
pub fn render_sequence(
    result: &ResultSet,
    thresholds: &TierThresholds,
    selected: Option<&Annotation>,
    group_width: usize,
) -> Vec<Line<'static>> {
    let sequence = result.sequence();
    let decorations = decorate(sequence, result.annotations(), thresholds);
    let mut style_input = StyleInput::from_decorations(&decorations, selected);
    style_input.set_underline(contested_positions(result.annotations(), sequence.len()));
    highlight_with_combined_styles(sequence.as_str(), &style_input, group_width)
}
