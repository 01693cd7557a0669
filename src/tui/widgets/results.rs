use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::catalog::brands;
use crate::catalog::{format_price, Motorcycle};
use crate::tui::app::{App, Focus};
use crate::tui::theme::AppTheme;

pub struct ResultsWidget;

impl ResultsWidget {
    pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
        let theme = app.theme.clone();

        // Brand pages get a title band with the brand's tagline.
        let brand_theme = app.engine.context().brand.as_deref().and_then(brands::lookup);
        let header_height = if app.engine.context().is_brand_scoped() { 2 } else { 0 };
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(header_height), Constraint::Min(0)])
            .split(area);
        if let Some(brand) = &app.engine.context().brand {
            let subtitle = brand_theme.map_or("", |t| t.subtitle);
            let header = vec![
                Line::from(Span::styled(brand.clone(), theme.card_brand)),
                Line::from(Span::styled(subtitle.to_string(), theme.card_meta)),
            ];
            f.render_widget(Paragraph::new(header), rows[0]);
        }

        let title = app.engine.context().page_title();

        if app.visible.is_empty() {
            Self::render_empty_state(f, app, &theme, &title, rows[1]);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(rows[1]);

        let focused = app.focus == Focus::Results;
        let list_block = Block::default()
            .title(Line::from(Span::styled(
                format!("{} ({})", title, app.visible.len()),
                theme.results_title,
            )))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if focused { theme.border_focused } else { theme.border_primary }));

        let items = app.engine.items();
        let cards: Vec<ListItem> = app
            .visible
            .iter()
            .filter_map(|i| items.get(*i))
            .map(|item| ListItem::new(card_lines(item, &theme)))
            .collect();

        let list = List::new(cards)
            .block(list_block)
            .highlight_style(theme.highlight_style)
            .highlight_symbol(">> ");
        f.render_stateful_widget(list, chunks[0], &mut app.results_state);

        let detail_block = Block::default()
            .title(Line::from(Span::styled("Details", Style::default().fg(theme.primary_foreground))))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_primary));
        let detail_area = detail_block.inner(chunks[1]);
        f.render_widget(detail_block, chunks[1]);

        match app.selected_item() {
            Some(item) => {
                let details = Paragraph::new(detail_text(item, &theme))
                    .wrap(Wrap { trim: true })
                    .style(Style::default().fg(theme.primary_foreground));
                f.render_widget(details, detail_area);
            }
            None => {
                f.render_widget(
                    Paragraph::new("No motorcycle selected").style(Style::default().fg(theme.secondary_foreground)),
                    detail_area,
                );
            }
        }
    }

    fn render_empty_state(f: &mut Frame, app: &App, theme: &AppTheme, title: &str, area: Rect) {
        let block = Block::default()
            .title(Line::from(Span::styled(format!("{} (0)", title), theme.results_title)))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_primary));
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled("No results found", theme.empty_state_title)),
            Line::from(Span::styled("No motorcycle matches the current filters.", theme.empty_state_hint)),
            Line::from(""),
            Line::from(Span::styled(
                format!("[{}] Reset filters", app.config.keybindings.clear),
                theme.reset_badge,
            )),
        ];
        f.render_widget(Paragraph::new(lines).alignment(Alignment::Center).block(block), area);
    }
}

fn card_lines(item: &Motorcycle, theme: &AppTheme) -> Vec<Line<'static>> {
    let brand_style = theme.card_brand.fg(crate::tui::theme::accent_color(brands::color_for_brand(&item.brand)));
    let mut first = vec![
        Span::styled(format!("{} ", item.brand.to_uppercase()), brand_style),
        Span::styled(item.title.clone(), theme.card_title),
    ];
    if item.is_used() {
        first.push(Span::raw(" "));
        first.push(Span::styled(" USED ", theme.used_badge));
    }
    if item.is_featured() {
        first.push(Span::styled(" *", brand_style));
    }

    let mut meta = vec![
        Span::styled(format_price(i64::from(item.price)), theme.card_price),
        Span::styled(format!("  {}", item.year), theme.card_meta),
    ];
    if let Some(cc) = item.displacement_cc() {
        meta.push(Span::styled(format!("  {}cc", cc), theme.card_meta));
    }
    meta.push(Span::styled(format!("  {}", item.condition_label()), theme.card_meta));

    vec![Line::from(first), Line::from(meta)]
}

fn detail_text(item: &Motorcycle, theme: &AppTheme) -> Text<'static> {
    let field = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{:<14}", label), theme.detail_label),
            Span::raw(value),
        ])
    };

    let mut lines = vec![Line::from(Span::styled(item.title.clone(), theme.card_title))];
    if let Some(catchphrase) = &item.catchphrase {
        lines.push(Line::from(Span::styled(catchphrase.clone(), theme.detail_catchphrase)));
    }
    lines.push(Line::from(""));
    lines.push(field("Brand:", item.brand.clone()));
    lines.push(field("Year:", item.year.to_string()));
    lines.push(field("Price:", format_price(i64::from(item.price))));
    lines.push(field(
        "Displacement:",
        item.displacement_cc().map_or_else(|| "n/a".to_string(), |cc| format!("{}cc", cc)),
    ));
    lines.push(field("Condition:", item.condition_label()));
    if !item.slug.is_empty() {
        lines.push(field("Slug:", item.slug.clone()));
    }

    if let Some(body) = item.summary.as_ref().or(item.description.as_ref()) {
        lines.push(Line::from(""));
        lines.extend(body.lines().map(|l| Line::from(l.to_string())));
    }
    Text::from(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::{moto, used};

    fn text(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn card_for_used_bike_shows_badge_and_km() {
        let item = used(moto("7", "Beta", 2019, 7_000, None), 12_500);
        let lines = text(&card_lines(&item, &AppTheme::default()));
        assert_eq!(lines[0], "BETA Beta 7  USED ");
        assert_eq!(lines[1], "€ 7.000  2019  12.500 km");
    }

    #[test]
    fn detail_prefers_summary_and_marks_missing_displacement() {
        let mut item = moto("9", "KTM", 2024, 10_990, Some(0));
        item.summary = Some("Short summary".to_string());
        item.description = Some("Long description".to_string());
        let detail = detail_text(&item, &AppTheme::default());
        let lines = text(&detail.lines);
        assert!(lines.iter().any(|l| l == "Displacement: n/a"));
        assert!(lines.iter().any(|l| l == "Short summary"));
        assert!(!lines.iter().any(|l| l.contains("Long description")));
    }

    #[test]
    fn detail_omits_missing_slug() {
        let mut item = moto("9", "KTM", 2024, 10_990, Some(890));
        item.slug = String::new();
        let lines = text(&detail_text(&item, &AppTheme::default()).lines);
        assert!(!lines.iter().any(|l| l.starts_with("Slug:")));
    }
}
