use crate::{
    app::{App, Page},
    prediction::ResultSet,
    ranking::{table_rows, SortConfig, SortKey},
    sequence_stylizing::{render_sequence, ScoreTier},
};
use chrono::Local;
use ratatui::{
    prelude::{Alignment, Color, Constraint, Direction, Frame, Layout, Line, Rect, Span, Style},
    style::{Modifier, Stylize},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
};

const TABLE_HEADER: [(SortKey, &str); 3] = [
    (SortKey::Rank, "Rank"),
    (SortKey::Position, "Position"),
    (SortKey::Score, "Score"),
];

pub fn render(app: &mut App, frame: &mut Frame) {
    match app.page {
        Page::Input => render_input(app, frame),
        Page::Results => match &app.result {
            Some(result) => render_results(app, result, frame),
            None => render_no_results(frame),
        },
        Page::NoResults => render_no_results(frame),
    }
}

fn render_input(app: &App, frame: &mut Frame) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    frame.render_widget(
        Paragraph::new(Line::from("Protein Binding Site Predictor".bold()))
            .alignment(Alignment::Center),
        layout[0],
    );
    frame.render_widget(&app.input, layout[1]);
    if let Some(error) = &app.input_error {
        frame.render_widget(
            Paragraph::new(error.as_str()).style(App::error_style()),
            layout[2],
        );
    }
    frame.render_widget(
        Paragraph::new("Enter: predict   Ctrl-L: clear   Ctrl-R: results   Esc: quit")
            .style(Style::new().fg(Color::DarkGray)),
        layout[3],
    );
}

fn render_results(app: &App, result: &ResultSet, frame: &mut Frame) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Percentage(45),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(frame.area());

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            "Prediction Results".bold(),
            Span::raw(format!(
                "  {} residues, {} predicted sites",
                result.sequence().len(),
                result.annotations().len()
            )),
        ])),
        layout[0],
    );
    frame.render_widget(Paragraph::new(legend(app)), layout[1]);

    let selected = app.selected_annotation();
    let sequence = render_sequence(
        result,
        &app.config.thresholds,
        selected,
        app.config.group_width,
    );
    frame.render_widget(
        Paragraph::new(sequence)
            .block(Block::default().borders(Borders::ALL).title("Sequence"))
            .wrap(Wrap { trim: false })
            .scroll((app.sequence_scroll, 0)),
        layout[2],
    );

    render_table(app, result, frame, layout[3]);

    let finished = result
        .timestamp()
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S");
    let mut footer = vec![Span::raw(format!("Analysis completed at: {finished}"))];
    if let Some(msg) = app.get_message() {
        footer.push(Span::raw("   "));
        footer.push(msg.to_string().yellow());
    }
    frame.render_widget(Paragraph::new(Line::from(footer)), layout[4]);
}

/// One swatch per tier, lowest first
fn legend(app: &App) -> Line<'static> {
    let thresholds = &app.config.thresholds;
    let mut spans = Vec::new();
    for tier in ScoreTier::ALL {
        let bound = thresholds.lower_bound(tier);
        let text = if tier == ScoreTier::Low {
            format!(" {} (<{:.2}) ", tier.label(), thresholds.medium)
        } else {
            format!(" {} (≥{:.2}) ", tier.label(), bound)
        };
        spans.push(Span::styled(
            text,
            Style::new().fg(Color::Black).bg(tier.bg_color()),
        ));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(
        "underlined: overlapping predictions",
        Style::new().add_modifier(Modifier::UNDERLINED),
    ));
    Line::from(spans)
}

fn header_cell(title: &str, key: SortKey, sort: Option<SortConfig>) -> Cell<'static> {
    match sort {
        Some(config) if config.key == key => {
            Cell::from(format!("{title} {}", config.direction.arrow())).bold()
        }
        _ => Cell::from(title.to_string()),
    }
}

fn render_table(app: &App, result: &ResultSet, frame: &mut Frame, area: Rect) {
    let [rank, position, score] = TABLE_HEADER.map(|(key, title)| header_cell(title, key, app.sort));
    let header = Row::new(vec![rank, position, Cell::from("Epitope"), score])
        .style(Style::new().add_modifier(Modifier::REVERSED));

    let thresholds = &app.config.thresholds;
    let rows: Vec<Row> = table_rows(result.annotations(), app.sort)
        .into_iter()
        .map(|row| {
            let annotation = row.annotation;
            let tier = thresholds.tier(annotation.score);
            Row::new(vec![
                Cell::from(row.rank.to_string()),
                Cell::from(format!("{} - {}", annotation.start + 1, annotation.end)),
                Cell::from(annotation.label.clone()),
                Cell::from(format!("{:.3}", annotation.score))
                    .style(Style::new().fg(Color::Black).bg(tier.bg_color())),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(12),
            Constraint::Min(10),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Ranked Predictions (r/p/s sort, j/k select, e export, b back, q quit)"),
    )
    .row_highlight_style(Style::new().add_modifier(Modifier::BOLD | Modifier::REVERSED));

    let mut state = TableState::default().with_selected(app.selected_row);
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_no_results(frame: &mut Frame) {
    let area = centered_rect(50, 30, frame.area());
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(vec![
            Line::from("No results available".bold()),
            Line::from(""),
            Line::from("Press Enter to go back to input"),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

/// helper function to create a centered rect using up certain percentage of the available rect `r`
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
