use ratatui::style::{Color, Modifier, Style};

use crate::catalog::brands::ThemeColor;

/// Terminal colour for a brand accent, matching the shades the website uses.
pub fn accent_color(color: ThemeColor) -> Color {
    match color {
        ThemeColor::Orange => Color::Rgb(249, 115, 22),
        ThemeColor::Blue => Color::Rgb(59, 130, 246),
        ThemeColor::Yellow => Color::Rgb(234, 179, 8),
        ThemeColor::Green => Color::Rgb(34, 197, 94),
        ThemeColor::Red => Color::Rgb(220, 38, 38),
        ThemeColor::Fuchsia => Color::Rgb(217, 70, 239),
        ThemeColor::Teal => Color::Rgb(45, 212, 191),
    }
}

#[derive(Debug, Clone)]
pub struct AppTheme {
    // General
    pub accent: Color,
    pub primary_foreground: Color,
    pub secondary_foreground: Color,
    pub tertiary_foreground: Color,
    pub border_primary: Color,
    pub border_focused: Color,
    pub highlight_style: Style, // For list selections
    pub help_text: Color,

    // Status Bar
    pub status_bar_background: Color,
    pub status_bar_foreground: Color,
    pub status_bar_mode_normal_bg: Color,
    pub status_bar_mode_search_bg: Color,
    pub status_bar_view_name_fg: Color,

    // Search Bar
    pub search_bar_background: Color,
    pub search_bar_text_fg: Color,
    pub search_bar_border: Color,

    // Filter panel
    pub filter_title: Style,
    pub filter_label: Style,
    pub filter_value: Style,
    pub brand_checked: Style,
    pub brand_unchecked: Style,
    pub slider_track: Color,
    pub slider_handle_inactive: Color,
    pub reset_badge: Style,

    // Results
    pub results_title: Style,
    pub card_brand: Style,
    pub card_title: Style,
    pub card_price: Style,
    pub card_meta: Style,
    pub used_badge: Style,
    pub empty_state_title: Style,
    pub empty_state_hint: Style,
    pub detail_label: Style,
    pub detail_catchphrase: Style,

    // Log View
    pub log_title: Style,
    pub log_level_trace: Style,
    pub log_level_debug: Style,
    pub log_level_info: Style,
    pub log_level_warn: Style,
    pub log_level_error: Style,
    pub log_timestamp: Style,
    pub log_target: Style,

    // Popup
    pub popup_background: Color,
}

impl AppTheme {
    pub fn with_accent(color: ThemeColor) -> Self {
        let accent = accent_color(color);
        Self {
            accent,
            border_focused: accent,
            filter_title: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            brand_checked: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            card_brand: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            status_bar_mode_normal_bg: accent,
            ..Self::default()
        }
    }
}

impl Default for AppTheme {
    fn default() -> Self {
        let accent = accent_color(ThemeColor::default());
        Self {
            // General
            accent,
            primary_foreground: Color::White,
            secondary_foreground: Color::Gray,
            tertiary_foreground: Color::DarkGray,
            border_primary: Color::DarkGray,
            border_focused: accent,
            highlight_style: Style::default().add_modifier(Modifier::REVERSED),
            help_text: Color::DarkGray,

            // Status Bar
            status_bar_background: Color::Rgb(23, 23, 23),
            status_bar_foreground: Color::White,
            status_bar_mode_normal_bg: accent,
            status_bar_mode_search_bg: Color::LightMagenta,
            status_bar_view_name_fg: Color::Yellow,

            // Search Bar
            search_bar_background: Color::Rgb(15, 15, 15),
            search_bar_text_fg: Color::White,
            search_bar_border: Color::DarkGray,

            // Filter panel
            filter_title: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            filter_label: Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
            filter_value: Style::default().fg(Color::White),
            brand_checked: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            brand_unchecked: Style::default().fg(Color::Gray),
            slider_track: Color::DarkGray,
            slider_handle_inactive: Color::Gray,
            reset_badge: Style::default().fg(Color::Gray).bg(Color::Rgb(38, 38, 38)),

            // Results
            results_title: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            card_brand: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            card_title: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            card_price: Style::default().fg(Color::White),
            card_meta: Style::default().fg(Color::Gray),
            used_badge: Style::default().fg(Color::Black).bg(Color::Gray),
            empty_state_title: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            empty_state_hint: Style::default().fg(Color::DarkGray),
            detail_label: Style::default().fg(Color::Gray),
            detail_catchphrase: Style::default().fg(Color::White).add_modifier(Modifier::ITALIC),

            // Log View
            log_title: Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            log_level_trace: Style::default().fg(Color::Magenta),
            log_level_debug: Style::default().fg(Color::Blue),
            log_level_info: Style::default().fg(Color::Green),
            log_level_warn: Style::default().fg(Color::Yellow),
            log_level_error: Style::default().fg(Color::Red),
            log_timestamp: Style::default().fg(Color::DarkGray),
            log_target: Style::default().fg(Color::Cyan),

            // Popup
            popup_background: Color::Rgb(23, 23, 23),
        }
    }
}
