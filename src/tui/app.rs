// src/tui/app.rs

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::widgets::ListState;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn, Level};

use crate::catalog::brands::{self, ThemeColor};
use crate::catalog::{self, Dimension, DualRange, FilterEngine, Handle, Motorcycle};
use crate::config::{Config, KeyBindingsConfig};

use super::theme::AppTheme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppView {
    Catalog,
    Logs,
}

impl AppView {
    pub fn toggle(&self) -> Self {
        match self {
            Self::Catalog => Self::Logs,
            Self::Logs => Self::Catalog,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

/// Which sidebar control or pane receives navigation keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Brands,
    Slider(Dimension),
    Results,
}

impl Focus {
    pub fn label(&self) -> &'static str {
        match self {
            Focus::Brands => "Brands",
            Focus::Slider(dimension) => dimension.label(),
            Focus::Results => "Results",
        }
    }
}

#[derive(Clone, Debug)]
pub struct UILogEntry {
    pub timestamp: String, // formatted in the tracing layer
    pub level: Level,
    pub target: String,
    pub message: String,
}

pub struct App {
    pub should_quit: bool,
    pub config: Arc<Config>,
    pub theme: Arc<AppTheme>,

    pub engine: FilterEngine,
    /// Source of `engine`'s items, re-read on reload.
    pub catalog_path: Option<PathBuf>,
    /// Indices into `engine.items()` in catalog order.
    pub visible: Vec<usize>,
    pub results_state: ListState,

    pub brands: Vec<String>,
    pub brand_list_state: ListState,

    pub year_slider: DualRange,
    pub price_slider: DualRange,
    pub displacement_slider: DualRange,
    pub active_handle: Handle,

    pub focus: Focus,
    pub active_view: AppView,
    pub input_mode: InputMode,
    pub search_input: String,

    pub log_entries: Vec<UILogEntry>,
    pub log_list_state: ListState,
    pub log_receiver: Option<mpsc::UnboundedReceiver<UILogEntry>>,

    pub show_keybindings_modal: bool,
    pub keybinding_map: HashMap<String, (KeyCode, KeyModifiers)>,
}

impl App {
    pub fn new(
        config: Arc<Config>,
        engine: FilterEngine,
        log_receiver: mpsc::UnboundedReceiver<UILogEntry>,
    ) -> Self {
        let accent = page_accent(&engine, &config);
        let slider = |dimension: Dimension| {
            let span = engine.bounds().get(dimension);
            DualRange::new(
                span.min,
                span.max,
                config.sliders.step(dimension),
                engine.state().range(dimension),
            )
        };
        let year_slider = slider(Dimension::Year);
        let price_slider = slider(Dimension::Price);
        let displacement_slider = slider(Dimension::Displacement);

        let brands = engine.available_brands();
        let mut brand_list_state = ListState::default();
        if !brands.is_empty() {
            brand_list_state.select(Some(0));
        }
        let focus = if engine.context().is_brand_scoped() {
            Focus::Slider(Dimension::Year)
        } else {
            Focus::Brands
        };
        let keybinding_map = parse_keybindings(&config.keybindings);

        let mut app = Self {
            should_quit: false,
            theme: Arc::new(AppTheme::with_accent(accent)),
            config,
            engine,
            catalog_path: None,
            visible: Vec::new(),
            results_state: ListState::default(),
            brands,
            brand_list_state,
            year_slider,
            price_slider,
            displacement_slider,
            active_handle: Handle::Low,
            focus,
            active_view: AppView::Catalog,
            input_mode: InputMode::Normal,
            search_input: String::new(),
            log_entries: Vec::new(),
            log_list_state: ListState::default(),
            log_receiver: Some(log_receiver),
            show_keybindings_modal: false,
            keybinding_map,
        };
        app.refresh_visible();
        app
    }

    pub fn with_catalog_path(mut self, path: PathBuf) -> Self {
        self.catalog_path = Some(path);
        self
    }

    pub fn tick(&mut self) {
        self.drain_logs();
    }

    pub fn drain_logs(&mut self) {
        if let Some(receiver) = self.log_receiver.as_mut() {
            while let Ok(log_entry) = receiver.try_recv() {
                self.log_entries.push(log_entry);
            }
        }
        let max_logs = self.config.interface.max_log_entries;
        if self.log_entries.len() > max_logs {
            let overflow = self.log_entries.len() - max_logs;
            self.log_entries.drain(0..overflow);
        }
        if self.active_view == AppView::Logs {
            let is_scrolled_to_bottom = match self.log_list_state.selected() {
                Some(index) => index >= self.log_entries.len().saturating_sub(1),
                None => true,
            };
            if is_scrolled_to_bottom && !self.log_entries.is_empty() {
                self.log_list_state.select(Some(self.log_entries.len() - 1));
            }
        }
    }

    /// Recomputes the visible list and keeps the selection inside it.
    pub fn refresh_visible(&mut self) {
        self.visible = self.engine.visible_indices();
        if self.visible.is_empty() {
            self.results_state.select(None);
            return;
        }
        let selected = self
            .results_state
            .selected()
            .map_or(0, |i| i.min(self.visible.len() - 1));
        self.results_state.select(Some(selected));
    }

    pub fn selected_item(&self) -> Option<&Motorcycle> {
        let position = self.results_state.selected()?;
        let index = *self.visible.get(position)?;
        self.engine.items().get(index)
    }

    pub fn slider(&self, dimension: Dimension) -> &DualRange {
        match dimension {
            Dimension::Year => &self.year_slider,
            Dimension::Price => &self.price_slider,
            Dimension::Displacement => &self.displacement_slider,
        }
    }

    fn slider_mut(&mut self, dimension: Dimension) -> &mut DualRange {
        match dimension {
            Dimension::Year => &mut self.year_slider,
            Dimension::Price => &mut self.price_slider,
            Dimension::Displacement => &mut self.displacement_slider,
        }
    }

    /// Pushes the engine's bounds and ranges into the sliders, discarding their state.
    pub fn sync_sliders(&mut self) {
        for dimension in Dimension::ALL {
            let span = self.engine.bounds().get(dimension);
            let range = self.engine.state().range(dimension);
            self.slider_mut(dimension).sync(span.min, span.max, range);
        }
    }

    /// Moves the active handle by `steps` and commits the range straight away.
    pub fn adjust_slider(&mut self, dimension: Dimension, steps: i64) {
        let handle = self.active_handle;
        let range = self.slider_mut(dimension).nudge(handle, steps);
        self.engine.set_range(dimension, range);
        self.refresh_visible();
    }

    /// Re-reads the catalog file. A failed read keeps the current items.
    pub fn reload_catalog(&mut self) {
        let Some(path) = self.catalog_path.clone() else {
            warn!("No catalog file to reload from");
            return;
        };
        match catalog::load_catalog(&path) {
            Ok(items) => self.replace_catalog(items),
            Err(e) => error!("Catalog reload failed: {}", e),
        }
    }

    /// New bounds reset the three ranges; search text and brand selection survive.
    pub fn replace_catalog(&mut self, items: Vec<Motorcycle>) {
        self.engine.replace_items(items);
        self.brands = self.engine.available_brands();
        let cursor = self.brand_list_state.selected().unwrap_or(0);
        self.brand_list_state
            .select((!self.brands.is_empty()).then(|| cursor.min(self.brands.len() - 1)));
        self.sync_sliders();
        self.refresh_visible();
        info!("Catalog reloaded: {} motorcycles", self.engine.items().len());
    }

    pub fn switch_handle(&mut self) {
        self.active_handle = self.active_handle.other();
    }

    pub fn focus_order(&self) -> Vec<Focus> {
        let mut order = Vec::with_capacity(5);
        if !self.engine.context().is_brand_scoped() {
            order.push(Focus::Brands);
        }
        order.extend(Dimension::ALL.iter().map(|d| Focus::Slider(*d)));
        order.push(Focus::Results);
        order
    }

    pub fn focus_next(&mut self) {
        let order = self.focus_order();
        let position = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(position + 1) % order.len()];
    }

    pub fn focus_previous(&mut self) {
        let order = self.focus_order();
        let position = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(position + order.len() - 1) % order.len()];
    }

    pub fn toggle_brand_at_cursor(&mut self) {
        let Some(name) = self
            .brand_list_state
            .selected()
            .and_then(|i| self.brands.get(i))
            .cloned()
        else {
            return;
        };
        self.engine.toggle_brand(&name);
        self.refresh_visible();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search_input.push(c);
        self.apply_search();
    }

    pub fn pop_search_char(&mut self) {
        if self.search_input.pop().is_some() {
            self.apply_search();
        }
    }

    fn apply_search(&mut self) {
        self.engine.set_search_query(self.search_input.clone());
        self.refresh_visible();
    }

    /// The "reset" affordance: all filters back to bounds, sliders resynced.
    pub fn clear_filters(&mut self) {
        debug!("Clearing filters from the TUI");
        self.engine.clear();
        self.search_input.clear();
        self.sync_sliders();
        self.refresh_visible();
    }

    pub fn select_next_result(&mut self) {
        select_next(&mut self.results_state, self.visible.len());
    }

    pub fn select_previous_result(&mut self) {
        select_previous(&mut self.results_state, self.visible.len());
    }

    pub fn brand_next(&mut self) {
        select_next(&mut self.brand_list_state, self.brands.len());
    }

    pub fn brand_previous(&mut self) {
        select_previous(&mut self.brand_list_state, self.brands.len());
    }

    pub fn scroll_logs_up(&mut self) {
        if let Some(selected) = self.log_list_state.selected() {
            if selected > 0 {
                self.log_list_state.select(Some(selected - 1));
            }
        }
    }

    pub fn scroll_logs_down(&mut self) {
        if let Some(selected) = self.log_list_state.selected() {
            if selected < self.log_entries.len().saturating_sub(1) {
                self.log_list_state.select(Some(selected + 1));
            }
        } else if !self.log_entries.is_empty() {
            self.log_list_state.select(Some(0));
        }
    }
}

// Brand pages take the brand's colour, everything else the configured one.
fn page_accent(engine: &FilterEngine, config: &Config) -> ThemeColor {
    match &engine.context().brand {
        Some(brand) => brands::color_for_brand(brand),
        None => config.interface.theme_color,
    }
}

// Wrapping list navigation
fn select_next(state: &mut ListState, len: usize) {
    if len == 0 {
        state.select(None);
        return;
    }
    let i = match state.selected() {
        Some(i) if i + 1 < len => i + 1,
        _ => 0,
    };
    state.select(Some(i));
}

fn select_previous(state: &mut ListState, len: usize) {
    if len == 0 {
        state.select(None);
        return;
    }
    let i = match state.selected() {
        Some(0) | None => len - 1,
        Some(i) => i - 1,
    };
    state.select(Some(i));
}

pub(crate) fn parse_keybindings(cfg: &KeyBindingsConfig) -> HashMap<String, (KeyCode, KeyModifiers)> {
    let mut map = HashMap::new();
    macro_rules! insert {
        ($action:expr, $binding:expr, $fallback:expr) => {
            let parsed = parse_keybinding(&$binding).unwrap_or_else(|| {
                tracing::warn!("Unrecognised keybinding '{}' for {}, using default", $binding, $action);
                $fallback
            });
            map.insert($action.to_string(), parsed);
        };
    }
    insert!("quit", cfg.quit, (KeyCode::Char('q'), KeyModifiers::NONE));
    insert!("help", cfg.help, (KeyCode::Char('?'), KeyModifiers::NONE));
    insert!("next_focus", cfg.next_focus, (KeyCode::Tab, KeyModifiers::NONE));
    insert!("prev_focus", cfg.prev_focus, (KeyCode::BackTab, KeyModifiers::NONE));
    insert!("search", cfg.search, (KeyCode::Char('/'), KeyModifiers::NONE));
    insert!("clear", cfg.clear, (KeyCode::Char('r'), KeyModifiers::NONE));
    insert!("reload", cfg.reload, (KeyCode::Char('r'), KeyModifiers::CONTROL));
    insert!("toggle", cfg.toggle, (KeyCode::Char(' '), KeyModifiers::NONE));
    insert!("switch_handle", cfg.switch_handle, (KeyCode::Char('h'), KeyModifiers::NONE));
    insert!("logs", cfg.logs, (KeyCode::Char('l'), KeyModifiers::NONE));
    insert!("up", cfg.up, (KeyCode::Up, KeyModifiers::NONE));
    insert!("down", cfg.down, (KeyCode::Down, KeyModifiers::NONE));
    insert!("left", cfg.left, (KeyCode::Left, KeyModifiers::NONE));
    insert!("right", cfg.right, (KeyCode::Right, KeyModifiers::NONE));
    map
}

pub(crate) fn parse_keybinding(s: &str) -> Option<(KeyCode, KeyModifiers)> {
    let s = s.trim();
    let mut mods = KeyModifiers::empty();
    let mut key = s;
    if let Some(stripped) = key.strip_prefix("Ctrl+") {
        mods |= KeyModifiers::CONTROL;
        key = stripped;
    }
    if let Some(stripped) = key.strip_prefix("Alt+") {
        mods |= KeyModifiers::ALT;
        key = stripped;
    }
    if let Some(stripped) = key.strip_prefix("Shift+") {
        mods |= KeyModifiers::SHIFT;
        key = stripped;
    }
    let lowered = key.to_lowercase();
    let code = match lowered.as_str() {
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "enter" => KeyCode::Enter,
        "esc" => KeyCode::Esc,
        "space" => KeyCode::Char(' '),
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        _ => {
            let mut chars = lowered.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };
    Some((code, mods))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::{moto, used};
    use crate::catalog::ViewContext;

    fn app_with(context: ViewContext) -> App {
        let items = vec![
            moto("1", "KTM", 2022, 12_000, Some(890)),
            moto("2", "Beta", 2019, 7_000, Some(300)),
            used(moto("3", "KTM", 2018, 5_500, Some(690)), 21_000),
            moto("4", "Kymco", 2023, 3_000, None),
        ];
        let (_tx, rx) = mpsc::unbounded_channel();
        App::new(Arc::new(Config::default()), FilterEngine::new(items, context), rx)
    }

    fn visible_ids(app: &App) -> Vec<String> {
        app.visible
            .iter()
            .map(|i| app.engine.items()[*i].id.clone())
            .collect()
    }

    #[test]
    fn starts_with_everything_visible_and_first_selected() {
        let app = app_with(ViewContext::catalog());
        assert_eq!(visible_ids(&app), ["1", "2", "3", "4"]);
        assert_eq!(app.results_state.selected(), Some(0));
        assert_eq!(app.brands, ["Beta", "KTM", "Kymco"]);
        assert_eq!(app.focus, Focus::Brands);
    }

    #[test]
    fn brand_page_skips_brand_focus_and_uses_brand_accent() {
        let mut app = app_with(ViewContext::brand_page("Kymco"));
        assert_eq!(visible_ids(&app), ["4"]);
        assert_eq!(page_accent(&app.engine, &app.config), ThemeColor::Green);
        assert!(!app.focus_order().contains(&Focus::Brands));
        app.focus = Focus::Results;
        app.focus_next();
        assert_eq!(app.focus, Focus::Slider(Dimension::Year));
    }

    #[test]
    fn focus_cycles_both_ways() {
        let mut app = app_with(ViewContext::catalog());
        app.focus_previous();
        assert_eq!(app.focus, Focus::Results);
        app.focus_next();
        app.focus_next();
        assert_eq!(app.focus, Focus::Slider(Dimension::Year));
    }

    #[test]
    fn slider_nudge_commits_to_engine() {
        let mut app = app_with(ViewContext::catalog());
        // Year bounds are 2018..2023; raise the low handle by two years.
        app.adjust_slider(Dimension::Year, 2);
        assert_eq!(app.engine.state().range(Dimension::Year), (2020, 2023));
        assert_eq!(visible_ids(&app), ["1", "4"]);
        assert!(app.engine.is_dirty());

        app.switch_handle();
        app.adjust_slider(Dimension::Year, -100);
        // The high handle cannot cross the low one.
        assert_eq!(app.year_slider.value(), (2020, 2020));
        assert!(app.visible.is_empty());
        assert_eq!(app.results_state.selected(), None);
    }

    #[test]
    fn toggling_brand_at_cursor_filters_results() {
        let mut app = app_with(ViewContext::catalog());
        app.brand_next(); // KTM
        app.toggle_brand_at_cursor();
        assert_eq!(visible_ids(&app), ["1", "3"]);
        app.toggle_brand_at_cursor();
        assert_eq!(visible_ids(&app), ["1", "2", "3", "4"]);
    }

    #[test]
    fn search_typing_and_backspace() {
        let mut app = app_with(ViewContext::catalog());
        for c in "kym".chars() {
            app.push_search_char(c);
        }
        assert_eq!(visible_ids(&app), ["4"]);
        app.pop_search_char();
        app.pop_search_char();
        app.pop_search_char();
        app.pop_search_char();
        assert_eq!(app.search_input, "");
        assert_eq!(visible_ids(&app), ["1", "2", "3", "4"]);
    }

    #[test]
    fn clear_restores_defaults_and_sliders() {
        let mut app = app_with(ViewContext::catalog());
        app.adjust_slider(Dimension::Price, 30);
        app.push_search_char('z');
        assert!(app.visible.is_empty());

        app.clear_filters();
        assert!(!app.engine.is_dirty());
        assert_eq!(app.search_input, "");
        let span = app.engine.bounds().get(Dimension::Price);
        assert_eq!(app.price_slider.value(), (span.min, span.max));
        assert_eq!(app.visible.len(), 4);
        assert_eq!(app.results_state.selected(), Some(0));
    }

    #[test]
    fn replacing_catalog_resets_ranges_and_keeps_search() {
        let mut app = app_with(ViewContext::catalog());
        app.adjust_slider(Dimension::Year, 2);
        app.push_search_char('k');
        app.brand_list_state.select(Some(2));

        app.replace_catalog(vec![
            moto("5", "BMW", 2010, 20_000, Some(1250)),
            moto("6", "KTM", 2012, 8_000, Some(690)),
        ]);
        assert_eq!(app.brands, ["BMW", "KTM"]);
        assert_eq!(app.brand_list_state.selected(), Some(1));
        assert_eq!(app.engine.state().range(Dimension::Year), (2010, 2012));
        assert_eq!(app.year_slider.value(), (2010, 2012));
        assert_eq!(app.search_input, "k");
        assert_eq!(visible_ids(&app), ["6"]);
    }

    #[test]
    fn reload_reads_catalog_file_and_survives_bad_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"_id": "r1", "title": "Svartpilen", "slug": "svartpilen", "brand": "Husqvarna", "year": 2024, "price": 6990}}]"#
        )
        .unwrap();
        let mut app = app_with(ViewContext::catalog()).with_catalog_path(file.path().to_path_buf());
        app.reload_catalog();
        assert_eq!(visible_ids(&app), ["r1"]);

        std::fs::write(file.path(), "not json").unwrap();
        app.reload_catalog();
        assert_eq!(visible_ids(&app), ["r1"]);
    }

    #[test]
    fn selection_wraps_and_follows_visible() {
        let mut app = app_with(ViewContext::catalog());
        app.select_previous_result();
        assert_eq!(app.selected_item().map(|m| m.id.as_str()), Some("4"));
        app.select_next_result();
        assert_eq!(app.selected_item().map(|m| m.id.as_str()), Some("1"));

        app.select_previous_result();
        app.push_search_char('b'); // only Beta remains
        assert_eq!(app.selected_item().map(|m| m.id.as_str()), Some("2"));
    }

    #[test]
    fn keybinding_parsing() {
        assert_eq!(parse_keybinding("Space"), Some((KeyCode::Char(' '), KeyModifiers::NONE)));
        assert_eq!(parse_keybinding("Ctrl+r"), Some((KeyCode::Char('r'), KeyModifiers::CONTROL)));
        assert_eq!(parse_keybinding("BackTab"), Some((KeyCode::BackTab, KeyModifiers::NONE)));
        assert_eq!(parse_keybinding("/"), Some((KeyCode::Char('/'), KeyModifiers::NONE)));
        assert_eq!(parse_keybinding("nonsense"), None);
    }

    #[test]
    fn bad_keybinding_falls_back_to_default() {
        let cfg = KeyBindingsConfig {
            quit: "nonsense".to_string(),
            ..KeyBindingsConfig::default()
        };
        let map = parse_keybindings(&cfg);
        assert_eq!(map["quit"], (KeyCode::Char('q'), KeyModifiers::NONE));
        assert_eq!(map["toggle"], (KeyCode::Char(' '), KeyModifiers::NONE));
    }

    #[test]
    fn logs_are_capped() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut config = Config::default();
        config.interface.max_log_entries = 2;
        let mut app = App::new(
            Arc::new(config),
            FilterEngine::new(Vec::new(), ViewContext::catalog()),
            rx,
        );
        for i in 0..5 {
            tx.send(UILogEntry {
                timestamp: "00:00:00".to_string(),
                level: Level::INFO,
                target: "showroom".to_string(),
                message: format!("entry {}", i),
            })
            .unwrap();
        }
        app.tick();
        let messages: Vec<_> = app.log_entries.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["entry 3", "entry 4"]);
    }
}
