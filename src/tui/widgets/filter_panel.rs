// src/tui/widgets/filter_panel.rs
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::catalog::{Dimension, Handle};
use crate::tui::app::{App, Focus};

use super::range_slider::RangeSliderWidget;

// Upper bound on rows given to the brand list before it scrolls
const MAX_BRAND_ROWS: u16 = 8;

pub struct FilterPanelWidget;

impl FilterPanelWidget {
    pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
        let theme = app.theme.clone();
        let panel_block = Block::default()
            .title(Line::from(Span::styled("Filters", theme.filter_title)))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_primary));
        let inner = panel_block.inner(area);
        f.render_widget(panel_block, area);

        let brand_scoped = app.engine.context().is_brand_scoped();
        let brand_rows = if brand_scoped {
            0
        } else {
            brand_list_height(app.brands.len())
        };

        let mut constraints = vec![Constraint::Length(brand_rows)];
        constraints.extend(Dimension::ALL.iter().map(|_| Constraint::Length(4)));
        constraints.push(Constraint::Min(0)); // results count and reset
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        if !brand_scoped {
            Self::render_brands(f, app, chunks[0]);
        }

        for (i, dimension) in Dimension::ALL.iter().enumerate() {
            let area = chunks[i + 1];
            let focused = app.focus == Focus::Slider(*dimension);
            let active = focused.then_some(app.active_handle);
            let mut lines =
                RangeSliderWidget::lines(*dimension, app.slider(*dimension), area.width.saturating_sub(2), active, &theme);
            if focused {
                if let Some(first) = lines.first_mut() {
                    first.spans.push(Span::styled(
                        format!("  {} handle", handle_name(app.active_handle)),
                        Style::default().fg(theme.tertiary_foreground),
                    ));
                }
            }
            let marker = if focused { "▌" } else { " " };
            let lines: Vec<Line> = lines
                .into_iter()
                .map(|mut line| {
                    line.spans.insert(0, Span::styled(marker, Style::default().fg(theme.border_focused)));
                    line
                })
                .collect();
            f.render_widget(Paragraph::new(lines), area);
        }

        let count = app.visible.len();
        let mut footer = vec![Line::from(Span::styled(
            format!("{} {}", count, if count == 1 { "result" } else { "results" }),
            theme.results_title,
        ))];
        if app.engine.is_dirty() {
            footer.push(Line::from(Span::styled(
                format!("[{}] Reset", app.config.keybindings.clear),
                theme.reset_badge,
            )));
        }
        f.render_widget(Paragraph::new(footer), chunks[Dimension::ALL.len() + 1]);
    }

    fn render_brands(f: &mut Frame, app: &mut App, area: Rect) {
        let theme = app.theme.clone();
        let focused = app.focus == Focus::Brands;
        let block = Block::default()
            .title("Brands")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if focused { theme.border_focused } else { theme.border_primary }));

        let items: Vec<ListItem> = app
            .brands
            .iter()
            .map(|brand| {
                if app.engine.is_brand_selected(brand) {
                    ListItem::new(Line::from(Span::styled(format!("[x] {}", brand), theme.brand_checked)))
                } else {
                    ListItem::new(Line::from(Span::styled(format!("[ ] {}", brand), theme.brand_unchecked)))
                }
            })
            .collect();

        let mut list = List::new(items).block(block);
        if focused {
            list = list.highlight_style(theme.highlight_style).highlight_symbol("> ");
        }
        f.render_stateful_widget(list, area, &mut app.brand_list_state);
    }
}

// Visible brand rows plus the block borders.
fn brand_list_height(brand_count: usize) -> u16 {
    brand_count.min(usize::from(MAX_BRAND_ROWS)) as u16 + 2
}

fn handle_name(handle: Handle) -> &'static str {
    match handle {
        Handle::Low => "min",
        Handle::High => "max",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brand_list_height_is_capped() {
        assert_eq!(brand_list_height(0), 2);
        assert_eq!(brand_list_height(3), 5);
        assert_eq!(brand_list_height(usize::from(u16::MAX) + 3), MAX_BRAND_ROWS + 2);
    }
}
