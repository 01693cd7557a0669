// src/tui/widgets/range_slider.rs
// Text rendering of a dual-handle slider: label row, value row and a track.

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::catalog::{Dimension, DualRange, Handle};
use crate::tui::theme::AppTheme;

const TRACK: &str = "─";
const FILL: &str = "━";
const KNOB: &str = "●";

pub struct RangeSliderWidget;

impl RangeSliderWidget {
    /// Label, formatted bounds of the selection and the track, in that order.
    pub fn lines(
        dimension: Dimension,
        slider: &DualRange,
        width: u16,
        active: Option<Handle>,
        theme: &AppTheme,
    ) -> Vec<Line<'static>> {
        let (low, high) = slider.value();
        vec![
            Line::from(Span::styled(dimension.label().to_string(), theme.filter_label)),
            Line::from(vec![
                Span::styled(dimension.format_value(low), value_style(active == Some(Handle::Low), theme)),
                Span::styled(" - ".to_string(), theme.filter_value),
                Span::styled(dimension.format_value(high), value_style(active == Some(Handle::High), theme)),
            ]),
            Self::track(slider, width, active, theme),
        ]
    }

    pub fn track(slider: &DualRange, width: u16, active: Option<Handle>, theme: &AppTheme) -> Line<'static> {
        let cols = usize::from(width);
        if cols < 2 {
            return Line::default();
        }
        let low_col = column(slider.low_percent(), cols);
        let high_col = column(slider.high_percent(), cols);
        let knob_style = |handle: Handle| {
            if active == Some(handle) {
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.slider_handle_inactive)
            }
        };

        let spans = (0..cols)
            .map(|col| {
                if col == low_col {
                    Span::styled(KNOB, knob_style(Handle::Low))
                } else if col == high_col {
                    Span::styled(KNOB, knob_style(Handle::High))
                } else if col > low_col && col < high_col {
                    Span::styled(FILL, Style::default().fg(theme.accent))
                } else {
                    Span::styled(TRACK, Style::default().fg(theme.slider_track))
                }
            })
            .collect::<Vec<_>>();
        Line::from(spans)
    }
}

fn value_style(active: bool, theme: &AppTheme) -> Style {
    if active {
        theme.filter_value.fg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
        theme.filter_value
    }
}

// Maps 0..=100 onto 0..cols-1, rounding to the nearest cell.
fn column(percent: u8, cols: usize) -> usize {
    (usize::from(percent) * (cols - 1) + 50) / 100
}
