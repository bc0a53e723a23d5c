use crate::{
    app::{App, FormField, FormMode, Focus, Overlay},
    calendar,
    view::{Filter, EMPTY_PLACEHOLDER},
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Gauge, List, ListItem, Paragraph, Row, Table, TableState},
    Frame,
};

const HELP: &str = "a add  e edit  space toggle  d delete  D delete all  1-5 filter  \
                    p/u/s sort  / search  c calendar  i import  x export  q quit";

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_form(f, app, chunks[0]);
    draw_filters(f, app, chunks[1]);
    draw_tasks(f, app, chunks[2]);
    draw_stats(f, app, chunks[3]);
    draw_status(f, app, chunks[4]);

    match app.overlay {
        Overlay::ConfirmDeleteAll => draw_confirm(f),
        Overlay::Calendar => draw_calendar(f, app),
        Overlay::None => {}
    }
}

fn field_style(app: &App, field: FormField) -> Style {
    if app.focus == Focus::Form(field) {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn draw_form(f: &mut Frame, app: &App, area: Rect) {
    let title = match app.mode {
        FormMode::Idle => "New task",
        FormMode::Editing(_) => "Edit task (Esc to cancel)",
    };
    let priority = if app.form.priority.is_set() {
        app.form.priority.as_str()
    } else {
        "-"
    };
    let line = Line::from(vec![
        Span::raw("Task: "),
        Span::styled(&app.form.text, field_style(app, FormField::Text)),
        Span::raw("  Due (YYYY-MM-DD): "),
        Span::styled(&app.form.due_date, field_style(app, FormField::DueDate)),
        Span::raw("  Priority: "),
        Span::styled(priority, field_style(app, FormField::Priority)),
    ]);
    let border = if matches!(app.focus, Focus::Form(_)) {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    f.render_widget(
        Paragraph::new(line).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(border),
        ),
        area,
    );
}

fn draw_filters(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = Vec::new();
    for (i, filter) in Filter::ALL.iter().enumerate() {
        let style = if *filter == app.filter && app.search.is_none() {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!(" {} {} ", i + 1, filter.name()), style));
    }
    spans.push(Span::raw("   Search: "));
    let search_style = if app.focus == Focus::Search {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    spans.push(Span::styled(
        app.search.as_deref().unwrap_or_default(),
        search_style,
    ));
    if app.focus == Focus::ImportPath {
        spans.push(Span::raw("   Import file: "));
        spans.push(Span::styled(
            &app.import_path,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
    }
    f.render_widget(
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn draw_tasks(f: &mut Frame, app: &App, area: Rect) {
    let model = app.model();
    let rows: Vec<Row> = if model.is_empty() {
        vec![Row::new(vec![Cell::from(EMPTY_PLACEHOLDER)])
            .style(Style::default().fg(Color::DarkGray))]
    } else {
        model
            .rows
            .iter()
            .map(|row| {
                let status_color = if row.completed {
                    Color::Green
                } else {
                    Color::Yellow
                };
                let style = if row.overdue {
                    Style::default().fg(Color::Red)
                } else {
                    Style::default()
                };
                Row::new(vec![
                    Cell::from(row.text.as_str()),
                    Cell::from(row.due_date.as_str()),
                    Cell::from(row.priority),
                    Cell::from(row.status.as_str()).style(Style::default().fg(status_color)),
                ])
                .style(style)
            })
            .collect()
    };

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(45),
            Constraint::Length(12),
            Constraint::Length(16),
            Constraint::Length(10),
        ],
    )
    .header(
        Row::new(vec!["Task", "Due date", "Priority", "Status"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().title("Tasks").borders(Borders::ALL).border_style(
        if app.focus == Focus::Table {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        },
    ))
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = TableState::default();
    if !model.is_empty() {
        state.select(Some(app.selected));
    }
    f.render_stateful_widget(table, area, &mut state);
}

fn draw_stats(f: &mut Frame, app: &App, area: Rect) {
    let stats = app.model().stats;
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(format!(
            "Total {}  Completed {}  Pending {}",
            stats.total, stats.completed, stats.pending
        )))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio((stats.percent_complete / 100.0).clamp(0.0, 1.0));
    f.render_widget(gauge, area);
}

fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let left = app.status_line.as_deref().unwrap_or(HELP);
    let mut spans = vec![Span::raw(left.to_string())];
    if let Some(weather) = &app.weather {
        spans.push(Span::styled(
            format!("  |  {weather}"),
            Style::default().fg(Color::Blue),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_confirm(f: &mut Frame) {
    let area = centered(f.area(), 40, 5);
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new("Delete all tasks? (y/n)")
            .block(Block::default().title("Confirm").borders(Borders::ALL)),
        area,
    );
}

fn draw_calendar(f: &mut Frame, app: &App) {
    let area = centered(f.area(), 70, 20);
    let mut items = Vec::new();
    for (day, tasks) in calendar::group_by_due_date(app.store().tasks()) {
        items.push(ListItem::new(Line::from(Span::styled(
            day.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ))));
        for task in tasks {
            items.push(ListItem::new(Line::from(vec![
                Span::raw(format!("  - {} ", task.text)),
                Span::styled(
                    format!("[{}] ", task.priority.label()),
                    Style::default().fg(Color::Magenta),
                ),
                Span::styled(
                    task.status.as_str().to_string(),
                    Style::default().fg(if task.status.is_completed() {
                        Color::Green
                    } else {
                        Color::Yellow
                    }),
                ),
            ])));
        }
    }
    f.render_widget(Clear, area);
    f.render_widget(
        List::new(items).block(
            Block::default()
                .title("Calendar (Esc to close)")
                .borders(Borders::ALL),
        ),
        area,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app::Action,
        storage::MemorySlot,
        store::TaskStore,
        task::{Priority, TaskDraft},
    };
    use ratatui::{backend::TestBackend, Terminal};

    fn rendered(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app() -> App {
        let store = TaskStore::open(Box::new(MemorySlot::new())).unwrap();
        App::new(store, std::env::temp_dir(), "2024-06-01".into())
    }

    #[test]
    fn empty_view_shows_placeholder() {
        assert!(rendered(&app()).contains(EMPTY_PLACEHOLDER));
    }

    #[test]
    fn rows_and_counts_are_drawn() {
        let mut app = app();
        app.form = TaskDraft::new("Water plants", "2024-01-01", Priority::High);
        app.dispatch(Action::Submit);
        let screen = rendered(&app);
        assert!(screen.contains("Water plants"));
        assert!(screen.contains("Very important"));
        assert!(screen.contains("Total 1"));
    }

    #[test]
    fn calendar_overlay_groups_undated() {
        let mut app = app();
        app.form = TaskDraft::new("Someday", "", Priority::Low);
        app.dispatch(Action::Submit);
        app.dispatch(Action::ShowCalendar);
        let screen = rendered(&app);
        assert!(screen.contains("Calendar (Esc to close)"));
        assert!(screen.contains("- Someday"));
    }
}
