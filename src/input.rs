use crate::{
    app::{Action, App, FormField, Focus, Overlay},
    store::{Confirmation, SortKey},
    view::Filter,
};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use std::path::PathBuf;

/// Whether the event loop should keep running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn handle_key(app: &mut App, key: KeyEvent) -> Flow {
    if key.kind == KeyEventKind::Release {
        return Flow::Continue;
    }
    match app.overlay {
        Overlay::ConfirmDeleteAll => {
            let answer = match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => Confirmation::Confirmed,
                _ => Confirmation::Declined,
            };
            app.dispatch(Action::AnswerDeleteAll(answer));
            return Flow::Continue;
        }
        Overlay::Calendar => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('c') | KeyCode::Char('q')) {
                app.dispatch(Action::HideCalendar);
            }
            return Flow::Continue;
        }
        Overlay::None => {}
    }
    match app.focus {
        Focus::Table => return table_key(app, key.code),
        Focus::Form(field) => form_key(app, field, key.code),
        Focus::Search => search_key(app, key.code),
        Focus::ImportPath => import_key(app, key.code),
    }
    Flow::Continue
}

fn table_key(app: &mut App, code: KeyCode) -> Flow {
    match code {
        KeyCode::Char('q') => return Flow::Quit,
        KeyCode::Char('a') => app.focus = Focus::Form(FormField::Text),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Char('e') => {
            if let Some(task) = app.selected_task() {
                app.dispatch(Action::BeginEdit(task));
            }
        }
        KeyCode::Char(' ') => {
            if let Some(task) = app.selected_task() {
                app.dispatch(Action::Toggle(task));
            }
        }
        KeyCode::Char('d') => {
            if let Some(task) = app.selected_task() {
                app.dispatch(Action::Delete(task));
            }
        }
        KeyCode::Char('D') => app.dispatch(Action::RequestDeleteAll),
        KeyCode::Char(digit @ '1'..='5') => {
            let index = digit as usize - '1' as usize;
            app.dispatch(Action::SetFilter(Filter::ALL[index]));
        }
        KeyCode::Char('p') => app.dispatch(Action::Sort(SortKey::Priority)),
        KeyCode::Char('u') => app.dispatch(Action::Sort(SortKey::DueDate)),
        KeyCode::Char('s') => app.dispatch(Action::Sort(SortKey::Status)),
        KeyCode::Char('/') => app.focus = Focus::Search,
        KeyCode::Char('c') => app.dispatch(Action::ShowCalendar),
        KeyCode::Char('i') => {
            app.import_path.clear();
            app.focus = Focus::ImportPath;
        }
        KeyCode::Char('x') => app.dispatch(Action::Export),
        _ => {}
    }
    Flow::Continue
}

fn form_key(app: &mut App, field: FormField, code: KeyCode) {
    match code {
        KeyCode::Esc => {
            app.dispatch(Action::CancelEdit);
            app.focus = Focus::Table;
        }
        KeyCode::Tab => {
            app.focus = Focus::Form(match field {
                FormField::Text => FormField::DueDate,
                FormField::DueDate => FormField::Priority,
                FormField::Priority => FormField::Text,
            })
        }
        KeyCode::Enter => {
            app.dispatch(Action::Submit);
            if app.form.text.is_empty() {
                app.focus = Focus::Table;
            }
        }
        KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right if field == FormField::Priority => {
            app.cycle_priority()
        }
        KeyCode::Backspace => {
            if let Some(buffer) = form_buffer(app, field) {
                buffer.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(buffer) = form_buffer(app, field) {
                buffer.push(c);
            }
        }
        _ => {}
    }
}

fn form_buffer(app: &mut App, field: FormField) -> Option<&mut String> {
    match field {
        FormField::Text => Some(&mut app.form.text),
        FormField::DueDate => Some(&mut app.form.due_date),
        FormField::Priority => None,
    }
}

/// Every keystroke re-runs the search.
fn search_key(app: &mut App, code: KeyCode) {
    let mut search = app.search.clone().unwrap_or_default();
    match code {
        KeyCode::Esc => {
            app.focus = Focus::Table;
            app.dispatch(Action::ClearSearch);
            return;
        }
        KeyCode::Enter => app.focus = Focus::Table,
        KeyCode::Backspace => {
            search.pop();
        }
        KeyCode::Char(c) => search.push(c),
        _ => return,
    }
    app.dispatch(Action::SetSearch(search));
}

fn import_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.focus = Focus::Table,
        KeyCode::Enter => {
            let path = PathBuf::from(app.import_path.trim());
            app.focus = Focus::Table;
            if !path.as_os_str().is_empty() {
                app.dispatch(Action::Import(path));
            }
        }
        KeyCode::Backspace => {
            app.import_path.pop();
        }
        KeyCode::Char(c) => app.import_path.push(c),
        _ => {}
    }
}
