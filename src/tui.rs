//! Interactive terminal screen

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{execute, terminal};
use ratatui::prelude::*;
use ratatui::widgets::*;
use tracing::debug;

use crate::controller::ScreenController;
use crate::explainer::Explainer;
use crate::view::{ExplanationArea, ScreenView};

struct App<E: Explainer> {
    controller: ScreenController<E>,
    categories: Vec<String>,
    list_state: ListState,
}

impl<E: Explainer> App<E> {
    fn new(controller: ScreenController<E>) -> Self {
        let categories = controller.categories();
        let selected = if categories.is_empty() { None } else { Some(0) };
        Self {
            controller,
            categories,
            list_state: ListState::default().with_selected(selected),
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.categories.is_empty() {
            return;
        }
        let last = self.categories.len() as isize - 1;
        let current = self.list_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, last);
        self.list_state.select(Some(next as usize));
    }

    fn select_under_cursor(&mut self) {
        if let Some(name) = self
            .list_state
            .selected()
            .and_then(|i| self.categories.get(i))
            .cloned()
        {
            if let Err(e) = self.controller.select(&name) {
                debug!("Selection of '{}' ignored: {}", name, e);
            }
        }
    }
}

/// Run the screen until the user quits
pub async fn run<E: Explainer>(controller: ScreenController<E>) -> anyhow::Result<()> {
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(controller);
    let outcome = event_loop(&mut terminal, &mut app).await;

    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    outcome
}

async fn event_loop<B: Backend, E: Explainer>(
    terminal: &mut Terminal<B>,
    app: &mut App<E>,
) -> anyhow::Result<()> {
    loop {
        let view = app.controller.view();
        terminal.draw(|f| ui(f, &view, &app.categories, &mut app.list_state))?;

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        let Event::Key(k) = event::read()? else {
            continue;
        };
        if k.kind != KeyEventKind::Press {
            continue;
        }
        match k.code {
            KeyCode::Char('q') | KeyCode::Esc => break,
            KeyCode::Char('c') if k.modifiers.contains(KeyModifiers::CONTROL) => break,
            KeyCode::Up | KeyCode::Char('k') => app.move_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => app.move_cursor(1),
            KeyCode::PageUp => app.move_cursor(-10),
            KeyCode::PageDown => app.move_cursor(10),
            KeyCode::Enter => app.select_under_cursor(),
            KeyCode::Char('c') => app.controller.clear(),
            KeyCode::Char('e') => {
                if let Some(prompt) = app.controller.begin_explanation() {
                    // show the loading state before blocking on the request
                    let view = app.controller.view();
                    terminal.draw(|f| ui(f, &view, &app.categories, &mut app.list_state))?;
                    let result = app.controller.explainer().explain(&prompt).await;
                    app.controller.finish_explanation(result);
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn ui(f: &mut Frame, view: &ScreenView, categories: &[String], list_state: &mut ListState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(12),
            Constraint::Length(3),
        ])
        .split(f.size());

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            view.title,
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::raw(view.subtitle),
    ])
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL).title("Market Lens"));
    f.render_widget(header, rows[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(rows[1]);

    let current = view.selected.as_ref().map(|s| s.category.as_str());
    let items: Vec<ListItem> = categories
        .iter()
        .map(|c| {
            let marker = if Some(c.as_str()) == current { "• " } else { "  " };
            ListItem::new(format!("{marker}{c}"))
        })
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Select a Market Category"),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    f.render_stateful_widget(list, body[0], list_state);

    render_details(f, view, body[1]);

    let mut footer = vec![Span::raw(
        "↑↓/jk move • Enter select • e explain • c clear • q quit",
    )];
    if let Some(warning) = &view.warning {
        footer.push(Span::raw("  |  "));
        footer.push(Span::styled(
            format!("⚠ {warning}"),
            Style::default().fg(Color::Yellow),
        ));
    }
    let help = Paragraph::new(Line::from(footer))
        .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(help, rows[2]);
}

fn render_details(f: &mut Frame, view: &ScreenView, area: Rect) {
    let Some(sel) = &view.selected else {
        let idle = Paragraph::new("Choose a category and press Enter to see its indicators.")
            .block(Block::default().borders(Borders::ALL).title("Category Results"));
        f.render_widget(idle, area);
        return;
    };

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Length(7),
            Constraint::Min(4),
        ])
        .split(area);

    // two-column metric grid: Demand/Cost left, Supply/Score right
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(parts[0]);
    let metric_line = |i: usize| {
        sel.indicators
            .get(i)
            .map(|m| {
                Line::from(vec![
                    Span::raw(format!("{}: ", m.label)),
                    Span::styled(m.value.clone(), Style::default().add_modifier(Modifier::BOLD)),
                ])
            })
            .unwrap_or_default()
    };
    let left = Paragraph::new(vec![metric_line(0), metric_line(2)]).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Category Results: {}", sel.category)),
    );
    let right = Paragraph::new(vec![metric_line(1), metric_line(3)])
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(left, cols[0]);
    f.render_widget(right, cols[1]);

    let banner = Paragraph::new(format!(
        "Final Classification: {} {}",
        sel.banner.symbol, sel.banner.level
    ))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(banner, parts[1]);

    let rec_lines: Vec<Line> = sel
        .recommendation
        .lines()
        .map(|l| Line::raw(l.replace("**", "")))
        .collect();
    let rec = Paragraph::new(rec_lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Strategic Recommendations"),
        );
    f.render_widget(rec, parts[2]);

    let (body, style) = match &view.explanation {
        ExplanationArea::Idle => (
            "Press 'e' to request an AI explanation.".to_string(),
            Style::default().fg(Color::DarkGray),
        ),
        ExplanationArea::Loading => (
            "Loading…".to_string(),
            Style::default().fg(Color::Cyan),
        ),
        ExplanationArea::Result { text, received_at } => (
            format!("{}\n\n(received {})", text, received_at.format("%H:%M:%S UTC")),
            Style::default(),
        ),
        ExplanationArea::Error {
            message, detail, ..
        } => (format!("{message}\n{detail}"), Style::default().fg(Color::Red)),
    };
    let explanation = Paragraph::new(body)
        .style(style)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Explanation"));
    f.render_widget(explanation, parts[3]);
}
