use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use super::app::{App, AppView};
use super::widgets::{
    filter_panel::FilterPanelWidget, keybindings_modal::KeybindingsModalWidget, logs::LogsWidget,
    results::ResultsWidget, search_bar::SearchBarWidget, status_bar::StatusBarWidget,
};

// Sidebar width in columns; mirrors the fixed-width filter column of the web layout.
const SIDEBAR_WIDTH: u16 = 38;

pub fn ui(f: &mut Frame, app: &mut App) {
    // Status bar at the top, content in the middle, search bar at the bottom.
    let main_layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status bar
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Search bar
        ])
        .split(f.size());

    StatusBarWidget::render(f, app, main_layout_chunks[0]);

    let main_content_area = main_layout_chunks[1];
    match app.active_view {
        AppView::Catalog => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
                .split(main_content_area);
            FilterPanelWidget::render(f, app, columns[0]);
            ResultsWidget::render(f, app, columns[1]);
        }
        AppView::Logs => {
            LogsWidget::render(f, app, main_content_area);
        }
    }

    SearchBarWidget::render(f, app, main_layout_chunks[2]);

    if app.show_keybindings_modal {
        KeybindingsModalWidget::render(f, app, f.size());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::{moto, used};
    use crate::catalog::{Condition, FilterEngine, ViewContext};
    use crate::config::Config;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn draw(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        format!("{:?}", terminal.backend().buffer())
    }

    fn app(context: ViewContext) -> App {
        let items = vec![
            moto("1", "KTM", 2022, 12_000, Some(890)),
            used(moto("2", "Beta", 2019, 7_000, Some(300)), 8_000),
        ];
        let (_tx, rx) = mpsc::unbounded_channel();
        App::new(Arc::new(Config::default()), FilterEngine::new(items, context), rx)
    }

    #[test]
    fn catalog_screen_shows_filters_and_results() {
        let mut app = app(ViewContext::catalog());
        let screen = draw(&mut app);
        assert!(screen.contains("Filters"));
        assert!(screen.contains("KTM 1"));
        assert!(screen.contains("2 results"));
        assert!(!screen.contains("[r] Reset"));
    }

    #[test]
    fn empty_state_offers_reset() {
        let mut app = app(ViewContext::catalog());
        for c in "nothing".chars() {
            app.push_search_char(c);
        }
        let screen = draw(&mut app);
        assert!(screen.contains("No results"));
        assert!(screen.contains("[r] Reset"));
    }

    #[test]
    fn brand_page_has_title_and_no_brand_list() {
        let mut app = app(ViewContext::brand_page("KTM"));
        let screen = draw(&mut app);
        assert!(screen.contains("Ready to Race"));
        assert!(!screen.contains("Brands"));
    }

    #[test]
    fn used_brand_page_is_titled_used() {
        let context = ViewContext { brand: Some("Beta".to_string()), condition: Condition::UsedOnly };
        let mut app = app(context);
        let screen = draw(&mut app);
        assert!(screen.contains("Beta - Used (1)"));
        assert!(!screen.contains("Beta - New"));
    }

    #[test]
    fn help_modal_renders_over_content() {
        let mut app = app(ViewContext::catalog());
        app.show_keybindings_modal = true;
        let screen = draw(&mut app);
        assert!(screen.contains("Keybindings"));
    }
}
