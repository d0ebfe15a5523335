use crate::config::ViewerConfig;
use crate::control::Update;
use crate::export::export_to_dir;
use crate::prediction::{Annotation, BindingSitePredictor, ResultSet};
use crate::ranking::{table_rows, SortConfig, SortKey};
use anyhow::Result;
use ratatui::prelude::{Style, Stylize};
use ratatui::widgets::{Block, Borders};
use tui_textarea::TextArea;

/// Ticks a status message stays visible
const MESSAGE_TICKS: u8 = 12;

const INPUT_PLACEHOLDER: &str =
    "Enter your protein sequence here (single-letter amino acid codes)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Input,
    Results,
    /// Results were requested before anything was submitted
    NoResults,
}

#[derive(Debug, Default)]
pub struct TransientMessage {
    message: String,
    timer: u8, // ticks to live
}
impl TransientMessage {
    pub fn new(message: String) -> Self {
        Self {
            message,
            timer: MESSAGE_TICKS,
        }
    }
    pub fn get(&self) -> Option<&str> {
        if self.timer > 0 {
            Some(&self.message)
        } else {
            None
        }
    }
    pub fn tick(&mut self) {
        self.timer = self.timer.saturating_sub(1);
    }
    pub fn dismiss(&mut self) {
        self.timer = 0;
    }
}

fn new_input<'a>() -> TextArea<'a> {
    let mut input = TextArea::default();
    input.set_block(
        Block::default()
            .borders(Borders::ALL)
            .title("Protein Sequence"),
    );
    input.set_placeholder_text(INPUT_PLACEHOLDER);
    input.set_cursor_line_style(Style::default());
    input
}

pub struct App<'a> {
    pub page: Page,
    pub quit: bool,
    pub input: TextArea<'a>,
    pub input_error: Option<String>,
    pub result: Option<ResultSet>,
    pub sort: Option<SortConfig>,
    pub selected_row: Option<usize>,
    pub sequence_scroll: u16,
    pub config: ViewerConfig,
    predictor: Box<dyn BindingSitePredictor>,
    message: TransientMessage,
}

impl App<'_> {
    pub fn new(config: ViewerConfig) -> Result<Self> {
        let predictor = config.build_predictor()?;
        Ok(App {
            page: Page::Input,
            quit: false,
            input: new_input(),
            input_error: None,
            result: None,
            sort: None,
            selected_row: None,
            sequence_scroll: 0,
            config,
            predictor,
            message: TransientMessage::default(),
        })
    }

    /// Set quit to true to leave the main loop.
    pub fn quit(&mut self) {
        self.quit = true;
    }

    pub fn apply(&mut self, update: Update) {
        match update {
            Update::Submit => self.submit(),
            Update::ClearInput => self.clear_input(),
            Update::Input(key) => {
                self.input.input(key);
            }
            Update::BackToInput => self.back_to_input(),
            Update::ShowResults => self.show_results(),
            Update::Sort(key) => self.request_sort(key),
            Update::MoveSelection(reverse) => self.move_selection(reverse),
            Update::Export => self.export(),
            Update::ScrollSequence(lines) => self.scroll_sequence(lines),
            Update::Tick => self.message.tick(),
            Update::Msg(msg) => self.set_message(msg),
            Update::Quit => self.quit(),
            Update::None => {}
        }
    }

    pub fn set_input(&mut self, text: &str) {
        self.input = new_input();
        self.input.insert_str(text);
    }

    pub fn input_text(&self) -> String {
        self.input.lines().join("\n")
    }

    /// Validate the input and run the predictor; on success switch to the results page.
    pub fn submit(&mut self) {
        match ResultSet::submit(&self.input_text(), self.predictor.as_mut()) {
            Ok(result) => {
                log::info!(
                    "submission accepted: {} residues, {} annotations",
                    result.sequence().len(),
                    result.annotations().len()
                );
                self.selected_row = if result.annotations().is_empty() {
                    None
                } else {
                    Some(0)
                };
                self.result = Some(result);
                self.sort = None;
                self.sequence_scroll = 0;
                self.input_error = None;
                self.page = Page::Results;
            }
            Err(err) => {
                log::warn!("submission rejected: {}", err.detail());
                self.input_error = Some(err.to_string());
            }
        }
    }

    pub fn clear_input(&mut self) {
        self.input = new_input();
        self.input_error = None;
    }

    pub fn back_to_input(&mut self) {
        self.page = Page::Input;
        self.message.dismiss();
    }

    pub fn show_results(&mut self) {
        self.page = if self.result.is_some() {
            Page::Results
        } else {
            Page::NoResults
        };
    }

    /// Re-sort the table; the selection stays on the same annotation.
    pub fn request_sort(&mut self, key: SortKey) {
        let selected_id = self.selected_annotation().map(|a| a.id);
        self.sort = Some(SortConfig::request(self.sort, key));
        if let (Some(id), Some(result)) = (selected_id, &self.result) {
            self.selected_row = table_rows(result.annotations(), self.sort)
                .iter()
                .position(|row| row.annotation.id == id);
        }
    }

    pub fn row_count(&self) -> usize {
        self.result
            .as_ref()
            .map_or(0, |result| result.annotations().len())
    }

    /// Cycle through the table rows
    pub fn move_selection(&mut self, reverse: bool) {
        let len = self.row_count();
        if len == 0 {
            self.selected_row = None;
            return;
        }
        self.selected_row = Some(match self.selected_row {
            Some(i) if reverse => (i + len - 1) % len,
            Some(i) => (i + 1) % len,
            None if reverse => len - 1,
            None => 0,
        });
    }

    /// Annotation of the selected table row, under the current sort
    pub fn selected_annotation(&self) -> Option<&Annotation> {
        let result = self.result.as_ref()?;
        let row = self.selected_row?;
        table_rows(result.annotations(), self.sort)
            .get(row)
            .map(|r| r.annotation)
    }

    /// Lines of the rendered sequence view, one per `group_width` residues
    pub fn sequence_line_count(&self) -> usize {
        self.result.as_ref().map_or(0, |result| {
            result.sequence().len().div_ceil(self.config.group_width)
        })
    }

    /// Scroll the sequence view, keeping its last line reachable at the top.
    pub fn scroll_sequence(&mut self, lines: isize) {
        let max_scroll = self
            .sequence_line_count()
            .saturating_sub(1)
            .min(u16::MAX as usize) as isize;
        let scrolled = self.sequence_scroll as isize + lines;
        self.sequence_scroll = scrolled.clamp(0, max_scroll) as u16;
    }

    pub fn export(&mut self) {
        let Some(result) = &self.result else {
            self.set_message("Nothing to export".to_string());
            return;
        };
        match export_to_dir(result, &self.config.export_dir) {
            Ok(path) => {
                log::info!("exported results to {}", path.display());
                self.set_message(format!("Results written to {}", path.display()));
            }
            Err(err) => {
                log::error!("export failed: {err:#}");
                self.set_message(format!("Export failed: {err}"));
            }
        }
    }

    pub fn set_message(&mut self, msg: String) {
        self.message = TransientMessage::new(msg);
    }

    pub fn get_message(&self) -> Option<&str> {
        self.message.get()
    }

    /// Error line style on the input page
    pub fn error_style() -> Style {
        Style::new().red().bold()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerArgs;
    use crate::export::read_csv;
    use clap::Parser;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        viewer: ViewerArgs,
    }

    fn app_with(args: &[&str]) -> App<'static> {
        let args = TestCli::parse_from(std::iter::once("epiview").chain(args.iter().copied()));
        App::new(ViewerConfig::from_args(&args.viewer).unwrap()).unwrap()
    }

    fn long_input() -> String {
        "ACDEFGHIKLMNPQRSTVWY".repeat(8)
    }

    #[test]
    fn test_submit_empty_input() {
        let mut app = app_with(&["--seed", "1"]);
        app.apply(Update::Submit);
        assert_eq!(app.page, Page::Input);
        assert_eq!(
            app.input_error.as_deref(),
            Some("Please enter a protein sequence.")
        );
        assert!(app.result.is_none());
    }

    #[test]
    fn test_submit_invalid_input() {
        let mut app = app_with(&["--seed", "1"]);
        app.set_input("ACDXEF");
        app.submit();
        assert_eq!(app.page, Page::Input);
        assert!(app.input_error.as_deref().unwrap().starts_with("Invalid sequence."));
        assert!(app.result.is_none());
    }

    #[test]
    fn test_typing_and_submit() {
        let mut app = app_with(&["--seed", "1"]);
        for c in "acd ef".chars() {
            app.apply(Update::Input(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)));
        }
        assert_eq!(app.input_text(), "acd ef");
        app.apply(Update::Submit);
        assert_eq!(app.page, Page::Results);
        let result = app.result.as_ref().unwrap();
        assert_eq!(result.sequence().as_str(), "ACDEF");
        // too short for any of the fixed sites
        assert!(result.annotations().is_empty());
        assert_eq!(app.selected_row, None);
    }

    #[test]
    fn test_submit_long_sequence() {
        let mut app = app_with(&["--seed", "3"]);
        app.set_input(&long_input());
        app.submit();
        assert_eq!(app.page, Page::Results);
        assert_eq!(app.row_count(), 3);
        assert_eq!(app.selected_row, Some(0));
        assert!(app.input_error.is_none());

        let top = app.selected_annotation().unwrap();
        let best = app
            .result
            .as_ref()
            .unwrap()
            .annotations()
            .iter()
            .map(|a| a.score)
            .fold(f64::MIN, f64::max);
        assert_eq!(top.score, best);
    }

    #[test]
    fn test_error_cleared_after_valid_submit() {
        let mut app = app_with(&[]);
        app.submit();
        assert!(app.input_error.is_some());
        app.set_input("ACDE");
        app.submit();
        assert!(app.input_error.is_none());
    }

    #[test]
    fn test_results_without_submission() {
        let mut app = app_with(&[]);
        app.apply(Update::ShowResults);
        assert_eq!(app.page, Page::NoResults);
        app.apply(Update::BackToInput);
        assert_eq!(app.page, Page::Input);
    }

    #[test]
    fn test_navigation_keeps_result() {
        let mut app = app_with(&["--seed", "3"]);
        app.set_input(&long_input());
        app.submit();
        app.back_to_input();
        assert_eq!(app.page, Page::Input);
        app.show_results();
        assert_eq!(app.page, Page::Results);
    }

    #[test]
    fn test_clear_input() {
        let mut app = app_with(&[]);
        app.set_input("XYZ");
        app.submit();
        app.apply(Update::ClearInput);
        assert_eq!(app.input_text(), "");
        assert!(app.input_error.is_none());
    }

    #[test]
    fn test_selection_wraps() {
        let mut app = app_with(&["--seed", "3"]);
        app.set_input(&long_input());
        app.submit();

        app.move_selection(true);
        assert_eq!(app.selected_row, Some(2));
        app.move_selection(false);
        assert_eq!(app.selected_row, Some(0));

        app.apply(Update::Sort(SortKey::Position));
        app.selected_row = Some(0);
        assert_eq!(app.selected_annotation().unwrap().start, 10);
    }

    #[test]
    fn test_selection_follows_annotation_across_sorts() {
        let mut app = app_with(&["--seed", "3"]);
        app.set_input(&long_input());
        app.submit();
        app.move_selection(false);
        let selected = app.selected_annotation().unwrap().clone();

        for key in [
            SortKey::Position,
            SortKey::Position,
            SortKey::Score,
            SortKey::Rank,
            SortKey::Rank,
        ] {
            app.apply(Update::Sort(key));
            let row = app.selected_row.unwrap();
            let rows = table_rows(app.result.as_ref().unwrap().annotations(), app.sort);
            assert_eq!(rows[row].annotation, &selected);
            assert_eq!(app.selected_annotation(), Some(&selected));
        }
    }

    #[test]
    fn test_export_writes_csv() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(&["--seed", "3", "--export-dir", dir.path().to_str().unwrap()]);
        app.export();
        assert_eq!(app.get_message(), Some("Nothing to export"));

        app.set_input(&long_input());
        app.submit();
        app.apply(Update::Export);
        assert!(app.get_message().unwrap().starts_with("Results written to"));

        let file = std::fs::read_dir(dir.path())
            .unwrap()
            .next()
            .unwrap()
            .unwrap()
            .path();
        let rows = read_csv(std::fs::File::open(file).unwrap()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows.iter().map(|r| r.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_message_expires() {
        let mut app = app_with(&[]);
        app.apply(Update::Msg("hello".to_string()));
        for _ in 0..MESSAGE_TICKS - 1 {
            app.apply(Update::Tick);
        }
        assert_eq!(app.get_message(), Some("hello"));
        app.apply(Update::Tick);
        assert_eq!(app.get_message(), None);
    }

    #[test]
    fn test_scroll_sequence_without_result() {
        let mut app = app_with(&[]);
        app.scroll_sequence(5);
        assert_eq!(app.sequence_scroll, 0);
    }

    #[test]
    fn test_scroll_sequence_stops_at_last_line() {
        // 160 residues in groups of 50: 4 lines
        let mut app = app_with(&["--seed", "2"]);
        app.set_input(&long_input());
        app.submit();
        assert_eq!(app.sequence_line_count(), 4);
        app.scroll_sequence(-3);
        assert_eq!(app.sequence_scroll, 0);
        app.apply(Update::ScrollSequence(5));
        assert_eq!(app.sequence_scroll, 3);
        app.scroll_sequence(-2);
        assert_eq!(app.sequence_scroll, 1);

        let mut app = app_with(&["--seed", "2", "--group-width", "10"]);
        app.set_input(&long_input());
        app.submit();
        app.scroll_sequence(100);
        assert_eq!(app.sequence_scroll, 15);
    }
}
