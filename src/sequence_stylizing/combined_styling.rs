use crate::prediction::Annotation;
use crate::sequence_stylizing::interval_operations::bool_vector_to_intervals;
use crate::sequence_stylizing::overlap_resolver::Decoration;
use crate::sequence_stylizing::score_tiers::ScoreTier;
use gcollections::ops::Bounded;
use interval::IntervalSet;
use ratatui::prelude::{Color, Line, Span, Style, Stylize};
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CombinedStyle {
    pub fg_color: Option<Color>,
    pub bg_color: Option<Color>,
    pub bold: bool,
    pub underlined: bool,
}

impl CombinedStyle {
    pub fn to_ratatui_style(self) -> Style {
        let mut style = Style::default();

        if let Some(fg) = self.fg_color {
            style = style.fg(fg);
        }
        if let Some(bg) = self.bg_color {
            style = style.bg(bg);
        }
        if self.bold {
            style = style.bold();
        }
        if self.underlined {
            style = style.underlined();
        }

        style
    }
}

/// Style layers for one sequence, applied in field order.
pub struct StyleInput {
    pub fg_color_intervals: Vec<(IntervalSet<usize>, Color)>,
    pub bg_color_intervals: Vec<(IntervalSet<usize>, Color)>,
    pub bold_positions: Vec<bool>,
    pub underline_intervals: Option<IntervalSet<usize>>,
}

impl StyleInput {
    pub fn new(sequence_length: usize) -> Self {
        Self {
            fg_color_intervals: Vec::new(),
            bg_color_intervals: Vec::new(),
            bold_positions: vec![false; sequence_length],
            underline_intervals: None,
        }
    }

    pub fn add_fg_color(&mut self, intervals: IntervalSet<usize>, color: Color) {
        self.fg_color_intervals.push((intervals, color));
    }

    pub fn add_bg_color(&mut self, intervals: IntervalSet<usize>, color: Color) {
        self.bg_color_intervals.push((intervals, color));
    }

    pub fn set_bold_positions(&mut self, bold_vec: Vec<bool>) {
        self.bold_positions = bold_vec;
    }

    pub fn set_underline(&mut self, intervals: IntervalSet<usize>) {
        self.underline_intervals = Some(intervals);
    }

    /// Tier backgrounds for owned residues, black text on top of them, and
    /// bold over the interval of `selected`.
    pub fn from_decorations(
        decorations: &[Option<Decoration>],
        selected: Option<&Annotation>,
    ) -> Self {
        let len = decorations.len();
        let mut ret = Self::new(len);

        let owned: Vec<bool> = decorations.iter().map(Option::is_some).collect();
        ret.add_fg_color(bool_vector_to_intervals(&owned), Color::Black);

        for tier in ScoreTier::ALL {
            let in_tier: Vec<bool> = decorations
                .iter()
                .map(|d| d.is_some_and(|d| d.tier == tier))
                .collect();
            ret.add_bg_color(bool_vector_to_intervals(&in_tier), tier.bg_color());
        }

        if let Some(selected) = selected {
            ret.set_bold_positions((0..len).map(|i| selected.covers(i)).collect());
        }
        ret
    }
}

fn paint(
    position_styles: &mut [CombinedStyle],
    intervals: &IntervalSet<usize>,
    f: impl Fn(&mut CombinedStyle),
) {
    let len = position_styles.len();
    if len == 0 {
        return;
    }
    for interval in intervals.iter() {
        let start: usize = interval.lower();
        let end: usize = interval.upper();
        if start >= len {
            continue;
        }
        for style in &mut position_styles[start..=end.min(len - 1)] {
            f(style);
        }
    }
}

/// Flatten the style layers into one style per position
pub fn position_styles(text_len: usize, style_input: &StyleInput) -> Vec<CombinedStyle> {
    let mut position_styles = vec![CombinedStyle::default(); text_len];

    for (intervals, color) in &style_input.fg_color_intervals {
        paint(&mut position_styles, intervals, |s| s.fg_color = Some(*color));
    }
    for (intervals, color) in &style_input.bg_color_intervals {
        paint(&mut position_styles, intervals, |s| s.bg_color = Some(*color));
    }
    for (style, &is_bold) in position_styles.iter_mut().zip(&style_input.bold_positions) {
        style.bold |= is_bold;
    }
    if let Some(intervals) = &style_input.underline_intervals {
        paint(&mut position_styles, intervals, |s| s.underlined = true);
    }

    position_styles
}

/// Group consecutive positions with the same style into spans
pub fn styled_line(text: &str, styles: &[CombinedStyle]) -> Line<'static> {
    debug_assert_eq!(text.len(), styles.len());
    if styles.is_empty() {
        return Line::from(text.to_string());
    }

    let mut spans = Vec::new();
    let mut current_start = 0;
    let mut current_style = styles[0];

    for (pos, style) in styles.iter().enumerate().skip(1) {
        if *style != current_style {
            spans.push(create_styled_span(
                text[current_start..pos].to_string(),
                current_style,
            ));
            current_start = pos;
            current_style = *style;
        }
    }
    spans.push(create_styled_span(
        text[current_start..].to_string(),
        current_style,
    ));

    Line::from(spans)
}

/// Highlight an ASCII sequence, one line per `group_width` residues.
pub fn highlight_with_combined_styles(
    text: &str,
    style_input: &StyleInput,
    group_width: usize,
) -> Vec<Line<'static>> {
    let styles = position_styles(text.len(), style_input);
    let group_width = group_width.max(1);
    // parallel by group
    text.as_bytes()
        .par_chunks(group_width)
        .zip(styles.par_chunks(group_width))
        .map(|(chunk, chunk_styles)| {
            styled_line(&String::from_utf8_lossy(chunk), chunk_styles)
        })
        .collect()
}

fn create_styled_span(text: String, combined_style: CombinedStyle) -> Span<'static> {
    let ratatui_style = combined_style.to_ratatui_style();

    if ratatui_style == Style::default() {
        text.into()
    } else {
        Span::styled(text, ratatui_style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::ProteinSequence;
    use crate::sequence_stylizing::overlap_resolver::decorate;
    use crate::sequence_stylizing::score_tiers::TierThresholds;
    use interval::interval_set::ToIntervalSet;

    #[test]
    fn test_position_styles_clip_to_text() {
        let mut input = StyleInput::new(4);
        input.add_bg_color(vec![(2, 10)].to_interval_set(), Color::Green);
        input.add_bg_color(vec![(20, 30)].to_interval_set(), Color::Red);
        input.set_underline(vec![(0, 0)].to_interval_set());
        let styles = position_styles(4, &input);
        assert_eq!(
            styles[0],
            CombinedStyle {
                underlined: true,
                ..Default::default()
            }
        );
        assert_eq!(styles[1], CombinedStyle::default());
        assert_eq!(styles[2].bg_color, Some(Color::Green));
        assert_eq!(styles[3].bg_color, Some(Color::Green));
    }

    #[test]
    fn test_position_styles_layers() {
        let mut input = StyleInput::new(5);
        input.add_fg_color(vec![(0, 4)].to_interval_set(), Color::Black);
        input.add_bg_color(vec![(0, 2)].to_interval_set(), Color::Green);
        // later layers paint over earlier ones
        input.add_bg_color(vec![(2, 3)].to_interval_set(), Color::Red);
        input.set_bold_positions(vec![false, true, false, false, false]);
        let styles = position_styles(5, &input);
        assert_eq!(styles[1].bg_color, Some(Color::Green));
        assert!(styles[1].bold);
        assert_eq!(styles[2].bg_color, Some(Color::Red));
        assert_eq!(styles[4].bg_color, None);
        assert!(styles.iter().all(|s| s.fg_color == Some(Color::Black)));
        assert_eq!(
            styles[1].to_ratatui_style(),
            Style::default().fg(Color::Black).bg(Color::Green).bold()
        );
    }

    #[test]
    fn test_position_styles_empty_text() {
        let mut input = StyleInput::new(0);
        input.set_underline(vec![(0, 3)].to_interval_set());
        assert!(position_styles(0, &input).is_empty());
        assert!(highlight_with_combined_styles("", &input, 10).is_empty());
    }

    #[test]
    fn test_styled_line_merges_runs() {
        let red = CombinedStyle {
            bg_color: Some(Color::Red),
            ..Default::default()
        };
        let styles = vec![
            CombinedStyle::default(),
            red,
            red,
            CombinedStyle::default(),
        ];
        let line = styled_line("ACDE", &styles);
        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans[0].content, "A");
        assert_eq!(line.spans[1].content, "CD");
        assert_eq!(line.spans[1].style, Style::default().bg(Color::Red));
        assert_eq!(line.spans[2].content, "E");
    }

    #[test]
    fn test_highlight_groups_lines() {
        let seq = ProteinSequence::parse("ACDEFGHIK").unwrap();
        let annotations = vec![
            Annotation::from_parts(1, 0, 2, "ACD", 0.9),
            Annotation::from_parts(2, 1, 3, "CDE", 0.6),
        ];
        let decorations = decorate(&seq, &annotations, &TierThresholds::default());
        let input = StyleInput::from_decorations(&decorations, Some(&annotations[1]));
        let lines = highlight_with_combined_styles(seq.as_str(), &input, 4);

        assert_eq!(lines.len(), 3);
        let text: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        assert_eq!(text, vec!["ACDE", "FGHI", "K"]);

        let high = Style::default().fg(Color::Black).bg(ScoreTier::High.bg_color());
        let medium = Style::default().fg(Color::Black).bg(ScoreTier::Medium.bg_color());
        assert_eq!(lines[0].spans[0].content, "A");
        assert_eq!(lines[0].spans[0].style, high);
        assert_eq!(lines[0].spans[1].content, "CD");
        assert_eq!(lines[0].spans[1].style, high.bold());
        assert_eq!(lines[0].spans[2].content, "E");
        assert_eq!(lines[0].spans[2].style, medium.bold());
        assert_eq!(lines[1].spans.len(), 1);
        assert_eq!(lines[1].spans[0].style, Style::default());
    }
}
