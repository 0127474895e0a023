//! Keyboard event handling.
//!
//! Routes key presses into `App` transitions, one handler per screen.

use crossterm::event::{KeyCode, KeyEvent};

use crate::{App, ProjectView, Tab};

/// Result of handling a key event.
pub enum KeyEventResult {
    /// Continue the event loop normally
    Continue,
    /// Should quit the application
    Quit,
}

pub fn handle_key_event(app: &mut App, key: KeyEvent) -> KeyEventResult {
    // The search box captures everything while it is being edited.
    if app.section == Tab::Projects && app.search_edit {
        handle_search_key(app, key);
        return KeyEventResult::Continue;
    }

    match key.code {
        KeyCode::Char('q') => return KeyEventResult::Quit,
        KeyCode::Char('1') => app.section = Tab::Home,
        KeyCode::Char('2') => app.section = Tab::Projects,
        KeyCode::Char('3') => app.section = Tab::About,
        _ => {
            if app.section == Tab::Projects {
                handle_projects_key(app, key);
            }
        }
    }
    KeyEventResult::Continue
}

fn handle_search_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.search_edit = false;
            app.search_query.clear();
            app.update_filtered();
        }
        KeyCode::Enter => app.search_edit = false,
        KeyCode::Backspace => {
            app.search_query.pop();
            app.update_filtered();
        }
        KeyCode::Char(ch) => {
            app.search_query.push(ch);
            app.update_filtered();
        }
        _ => {}
    }
}

fn handle_projects_key(app: &mut App, key: KeyEvent) {
    match app.view {
        ProjectView::List => handle_list_key(app, key),
        ProjectView::Detail => handle_detail_key(app, key),
        ProjectView::Notebook | ProjectView::Markdown => handle_document_key(app, key),
    }
}

fn handle_list_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_repo_selection(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_repo_selection(-1),
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => app.open_selected_repo(),
        KeyCode::Char('/') => app.search_edit = true,
        KeyCode::Char('r') => app.load_repos(),
        KeyCode::Char('y') => {
            if let Some(repo) = app.selected_repo_row() {
                let url = repo.html_url.clone();
                app.yank("repository URL", url);
            }
        }
        _ => {}
    }
}

fn handle_detail_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_entry_selection(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_entry_selection(-1),
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => app.open_selected_entry(),
        KeyCode::Backspace | KeyCode::Char('h') | KeyCode::Left | KeyCode::Esc => app.go_back(),
        KeyCode::Char('J') => app.scroll_readme(1),
        KeyCode::Char('K') => app.scroll_readme(-1),
        KeyCode::Char('r') => {
            let path = app.current_path.clone();
            app.open_directory(path);
        }
        KeyCode::Char('y') => {
            let url = app
                .selected_entry()
                .and_then(|entry| entry.download_url.clone());
            if let Some(url) = url {
                app.yank("raw file URL", url);
            }
        }
        _ => {}
    }
}

fn handle_document_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.scroll_document(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_document(-1),
        KeyCode::Char('d') | KeyCode::PageDown => app.scroll_document(10),
        KeyCode::Char('u') | KeyCode::PageUp => app.scroll_document(-10),
        KeyCode::Char('g') | KeyCode::Home => app.scroll_document(-10_000),
        KeyCode::Char('G') | KeyCode::End => app.scroll_document(10_000),
        KeyCode::Backspace | KeyCode::Char('h') | KeyCode::Left | KeyCode::Esc => app.go_back(),
        _ => {}
    }
}
