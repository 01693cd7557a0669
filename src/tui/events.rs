// src/tui/events.rs

use anyhow::Result;
use crossterm::event::{Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::Terminal;
use std::time::{Duration, Instant};
use tracing::debug;

use super::app::{App, AppView, Focus, InputMode};
use super::ui::ui;

// Slider moves per PageUp/PageDown press
const COARSE_STEPS: i64 = 10;

pub async fn run_app_loop<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    let mut last_tick = Instant::now();
    let mut crossterm_events = EventStream::new();
    let tick_duration = Duration::from_millis(app.config.interface.refresh_interval_ms);

    loop {
        terminal.draw(|f| ui(f, &mut app))?;
        app.drain_logs();

        tokio::select! {
            maybe_event = crossterm_events.next() => {
                match maybe_event {
                    Some(Ok(CrosstermEvent::Key(key))) => on_key(&mut app, key),
                    Some(Ok(CrosstermEvent::Mouse(mouse))) => on_mouse_event(&mut app, mouse),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => app.should_quit = true,
                }
            }

            _ = tokio::time::sleep(tick_duration) => {
                if last_tick.elapsed() >= tick_duration {
                    app.tick();
                    last_tick = Instant::now();
                }
            }
        }

        if app.should_quit {
            debug!("Leaving TUI event loop");
            return Ok(());
        }
    }
}

pub fn on_mouse_event(app: &mut App, mouse_event: MouseEvent) {
    match mouse_event.kind {
        MouseEventKind::ScrollUp => match app.active_view {
            AppView::Catalog => app.select_previous_result(),
            AppView::Logs => app.scroll_logs_up(),
        },
        MouseEventKind::ScrollDown => match app.active_view {
            AppView::Catalog => app.select_next_result(),
            AppView::Logs => app.scroll_logs_down(),
        },
        _ => {}
    }
}

fn key_matches(app: &App, action: &str, key_event: &KeyEvent) -> bool {
    let Some((code, mods)) = app.keybinding_map.get(action) else {
        return false;
    };
    // Terminals report Shift on punctuation like '?', so it is ignored for plain characters.
    let pressed = match key_event.code {
        KeyCode::Char(_) => key_event.modifiers.difference(KeyModifiers::SHIFT),
        _ => key_event.modifiers,
    };
    let code_matches = match (key_event.code, code) {
        (KeyCode::Char(pressed_char), KeyCode::Char(bound)) => pressed_char.to_ascii_lowercase() == *bound,
        (pressed_code, bound) => pressed_code == *bound,
    };
    code_matches && pressed == *mods
}

pub fn on_key(app: &mut App, key_event: KeyEvent) {
    if key_event.kind == KeyEventKind::Release {
        return;
    }
    if key_event.code == KeyCode::Char('c') && key_event.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }
    if app.show_keybindings_modal {
        if key_matches(app, "help", &key_event) || key_event.code == KeyCode::Esc {
            app.show_keybindings_modal = false;
        }
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode_key(app, key_event),
        InputMode::Search => handle_search_mode_key(app, key_event),
    }
}

fn handle_normal_mode_key(app: &mut App, key_event: KeyEvent) {
    if key_matches(app, "quit", &key_event) {
        app.should_quit = true;
    } else if key_matches(app, "help", &key_event) {
        app.show_keybindings_modal = true;
    } else if key_matches(app, "logs", &key_event) {
        app.active_view = app.active_view.toggle();
    } else if app.active_view == AppView::Logs {
        if key_matches(app, "up", &key_event) || key_event.code == KeyCode::Char('k') {
            app.scroll_logs_up();
        } else if key_matches(app, "down", &key_event) || key_event.code == KeyCode::Char('j') {
            app.scroll_logs_down();
        } else if key_event.code == KeyCode::Esc {
            app.active_view = AppView::Catalog;
        }
    } else if key_matches(app, "search", &key_event) {
        app.input_mode = InputMode::Search;
    } else if key_matches(app, "clear", &key_event) {
        app.clear_filters();
    } else if key_matches(app, "reload", &key_event) {
        app.reload_catalog();
    } else if key_matches(app, "next_focus", &key_event) {
        app.focus_next();
    } else if key_matches(app, "prev_focus", &key_event) {
        app.focus_previous();
    } else {
        handle_focused_key(app, key_event);
    }
}

fn handle_focused_key(app: &mut App, key_event: KeyEvent) {
    match app.focus {
        Focus::Brands => {
            if key_matches(app, "down", &key_event) || key_event.code == KeyCode::Char('j') {
                app.brand_next();
            } else if key_matches(app, "up", &key_event) || key_event.code == KeyCode::Char('k') {
                app.brand_previous();
            } else if key_matches(app, "toggle", &key_event) || key_event.code == KeyCode::Enter {
                app.toggle_brand_at_cursor();
            }
        }
        Focus::Slider(dimension) => {
            if key_matches(app, "right", &key_event) {
                app.adjust_slider(dimension, 1);
            } else if key_matches(app, "left", &key_event) {
                app.adjust_slider(dimension, -1);
            } else if key_event.code == KeyCode::PageUp {
                app.adjust_slider(dimension, COARSE_STEPS);
            } else if key_event.code == KeyCode::PageDown {
                app.adjust_slider(dimension, -COARSE_STEPS);
            } else if key_matches(app, "switch_handle", &key_event)
                || key_matches(app, "toggle", &key_event)
            {
                app.switch_handle();
            } else if key_matches(app, "down", &key_event) {
                app.focus_next();
            } else if key_matches(app, "up", &key_event) {
                app.focus_previous();
            }
        }
        Focus::Results => {
            if key_matches(app, "down", &key_event) || key_event.code == KeyCode::Char('j') {
                app.select_next_result();
            } else if key_matches(app, "up", &key_event) || key_event.code == KeyCode::Char('k') {
                app.select_previous_result();
            }
        }
    }
}

fn handle_search_mode_key(app: &mut App, key_event: KeyEvent) {
    match key_event.code {
        KeyCode::Enter | KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Backspace => app.pop_search_char(),
        KeyCode::Char('u') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            while !app.search_input.is_empty() {
                app.pop_search_char();
            }
        }
        KeyCode::Char(c) => app.push_search_char(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::moto;
    use crate::catalog::{Dimension, FilterEngine, ViewContext};
    use crate::config::Config;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn app() -> App {
        let items = vec![
            moto("1", "KTM", 2022, 12_000, Some(890)),
            moto("2", "Beta", 2019, 7_000, Some(300)),
        ];
        let (_tx, rx) = mpsc::unbounded_channel();
        App::new(Arc::new(Config::default()), FilterEngine::new(items, ViewContext::catalog()), rx)
    }

    fn press(app: &mut App, code: KeyCode) {
        on_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn quit_and_help() {
        let mut app = app();
        on_key(&mut app, KeyEvent::new(KeyCode::Char('?'), KeyModifiers::SHIFT));
        assert!(app.show_keybindings_modal);
        // Keys other than help/Esc are swallowed by the modal.
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_keybindings_modal);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn search_mode_captures_text() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.input_mode, InputMode::Search);
        for c in "beta q".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        // 'q' is text while searching.
        assert!(!app.should_quit);
        assert_eq!(app.search_input, "beta q");
        assert!(app.visible.is_empty());
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.visible.len(), 1);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn slider_keys_move_active_handle() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Slider(Dimension::Year));
        press(&mut app, KeyCode::Right);
        assert_eq!(app.engine.state().range(Dimension::Year), (2020, 2022));
        press(&mut app, KeyCode::Char('h'));
        press(&mut app, KeyCode::Left);
        assert_eq!(app.engine.state().range(Dimension::Year), (2020, 2021));
        assert!(app.visible.is_empty());

        press(&mut app, KeyCode::Char('r'));
        assert!(!app.engine.is_dirty());
        assert_eq!(app.year_slider.value(), (2019, 2022));
    }

    #[test]
    fn space_toggles_brand_in_brand_focus() {
        let mut app = app();
        assert_eq!(app.focus, Focus::Brands);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.engine.is_brand_selected("Beta"));
        assert_eq!(app.visible.len(), 1);
    }

    #[test]
    fn ctrl_r_reloads_while_plain_r_resets() {
        let mut app = app();
        app.adjust_slider(Dimension::Year, 1);
        // No catalog file is attached, so reload leaves the state alone.
        on_key(&mut app, KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL));
        assert!(app.engine.is_dirty());
        press(&mut app, KeyCode::Char('r'));
        assert!(!app.engine.is_dirty());
    }

    #[test]
    fn logs_view_toggle() {
        let mut app = app();
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.active_view, AppView::Logs);
        // Catalog keys are inert in the logs view.
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.input_mode, InputMode::Normal);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.active_view, AppView::Catalog);
    }
}
