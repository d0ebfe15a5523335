use crate::app::{App, Page};
use crate::event::Event;
use crate::ranking::SortKey;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Lines scrolled by PageUp / PageDown in the sequence view
const SEQUENCE_PAGE: isize = 5;

pub enum Update {
    Submit,
    ClearInput,
    Input(KeyEvent),
    BackToInput,
    ShowResults,
    Sort(SortKey),
    MoveSelection(bool), // reverse?
    Export,
    ScrollSequence(isize),
    Tick,
    Msg(String),
    Quit,
    None,
}

pub fn handle_input(app: &App, input: Event) -> Update {
    let keyevent = match input {
        Event::Tick => return Update::Tick,
        Event::Key(keyevent) => keyevent,
        Event::Mouse(_) | Event::Resize(_, _) => return Update::None,
    };

    // Quit independent of page
    if let KeyEvent {
        code: KeyCode::Char('c'),
        modifiers: KeyModifiers::CONTROL,
        ..
    } = keyevent
    {
        return Update::Quit;
    }

    match app.page {
        Page::Input => match (keyevent.code, keyevent.modifiers) {
            (KeyCode::Enter, KeyModifiers::NONE) => Update::Submit,
            (KeyCode::Char('l'), KeyModifiers::CONTROL) => Update::ClearInput,
            (KeyCode::Char('r'), KeyModifiers::CONTROL) => Update::ShowResults,
            (KeyCode::Esc, _) => Update::Quit,
            _ => Update::Input(keyevent),
        },

        Page::Results => match (keyevent.code, keyevent.modifiers) {
            (KeyCode::Char('q'), KeyModifiers::NONE) => Update::Quit,
            (KeyCode::Char('b') | KeyCode::Esc, KeyModifiers::NONE) => Update::BackToInput,
            (KeyCode::Char('r'), KeyModifiers::NONE) => Update::Sort(SortKey::Rank),
            (KeyCode::Char('p'), KeyModifiers::NONE) => Update::Sort(SortKey::Position),
            (KeyCode::Char('s'), KeyModifiers::NONE) => Update::Sort(SortKey::Score),
            (KeyCode::Char('j') | KeyCode::Down, KeyModifiers::NONE) => {
                Update::MoveSelection(false)
            }
            (KeyCode::Char('k') | KeyCode::Up, KeyModifiers::NONE) => Update::MoveSelection(true),
            (KeyCode::PageDown, _) => Update::ScrollSequence(SEQUENCE_PAGE),
            (KeyCode::PageUp, _) => Update::ScrollSequence(-SEQUENCE_PAGE),
            (KeyCode::Char('e'), KeyModifiers::NONE) => Update::Export,
            (KeyCode::Char('t'), KeyModifiers::NONE) => Update::Msg(
                "Sort: r rank, p position, s score (again to reverse)".to_string(),
            ),
            _ => Update::None,
        },

        Page::NoResults => match keyevent.code {
            KeyCode::Enter | KeyCode::Char('b') | KeyCode::Esc => Update::BackToInput,
            KeyCode::Char('q') => Update::Quit,
            _ => Update::None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ViewerArgs, ViewerConfig};
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        viewer: ViewerArgs,
    }

    fn app() -> App<'static> {
        let args = TestCli::parse_from(["epiview", "--seed", "5"]);
        App::new(ViewerConfig::from_args(&args.viewer).unwrap()).unwrap()
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    #[test]
    fn test_input_page_keys() {
        let app = app();
        assert!(matches!(handle_input(&app, key(KeyCode::Enter)), Update::Submit));
        assert!(matches!(handle_input(&app, ctrl('l')), Update::ClearInput));
        assert!(matches!(handle_input(&app, ctrl('r')), Update::ShowResults));
        assert!(matches!(handle_input(&app, ctrl('c')), Update::Quit));
        // plain letters are typed, including the results-page shortcuts
        assert!(matches!(
            handle_input(&app, key(KeyCode::Char('q'))),
            Update::Input(_)
        ));
        assert!(matches!(handle_input(&app, Event::Tick), Update::Tick));
    }

    #[test]
    fn test_results_page_keys() {
        let mut app = app();
        app.set_input(&"ACDEFGHIKLMNPQRSTVWY".repeat(4));
        app.submit();
        assert!(matches!(
            handle_input(&app, key(KeyCode::Char('s'))),
            Update::Sort(SortKey::Score)
        ));
        assert!(matches!(
            handle_input(&app, key(KeyCode::Char('p'))),
            Update::Sort(SortKey::Position)
        ));
        assert!(matches!(
            handle_input(&app, key(KeyCode::Down)),
            Update::MoveSelection(false)
        ));
        assert!(matches!(
            handle_input(&app, key(KeyCode::PageUp)),
            Update::ScrollSequence(-5)
        ));
        assert!(matches!(handle_input(&app, key(KeyCode::Char('e'))), Update::Export));
        assert!(matches!(handle_input(&app, key(KeyCode::Esc)), Update::BackToInput));
        assert!(matches!(handle_input(&app, key(KeyCode::Char('q'))), Update::Quit));
    }

    #[test]
    fn test_no_results_page_keys() {
        let mut app = app();
        app.show_results();
        assert_eq!(app.page, Page::NoResults);
        assert!(matches!(handle_input(&app, key(KeyCode::Enter)), Update::BackToInput));
        assert!(matches!(handle_input(&app, key(KeyCode::Char('x'))), Update::None));
    }
}
