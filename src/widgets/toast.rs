//! Toast notification widget.
//!
//! Renders the current [`Notice`] in the bottom-right corner without
//! shifting the rest of the layout. Expiry is handled by `Notices::expire`.

use crate::state::notice::{Notice, NoticeLevel};
use crate::styles::{theme, ThemeType};
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap};

fn icon(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Success => "\u{2714}", // ✔
        NoticeLevel::Info => "\u{2139}",    // ℹ
        NoticeLevel::Warning => "\u{26A0}", // ⚠
        NoticeLevel::Error => "\u{2718}",   // ✘
    }
}

fn border_color(level: NoticeLevel) -> Color {
    let t = theme();
    match level {
        NoticeLevel::Success => t.success,
        NoticeLevel::Info => t.primary,
        NoticeLevel::Warning => t.warning,
        NoticeLevel::Error => t.error,
    }
}

pub struct ToastWidget<'a> {
    notice: &'a Notice,
}

impl<'a> ToastWidget<'a> {
    pub fn new(notice: &'a Notice) -> Self {
        Self { notice }
    }

    /// Bottom-right corner, above the status line.
    fn calculate_area(&self, area: Rect) -> Rect {
        let toast_width = 48u16.min(area.width.saturating_sub(4));
        let toast_height = 3u16.min(area.height);

        let x = area.x + area.width.saturating_sub(toast_width + 2);
        let y = area.y + area.height.saturating_sub(toast_height + 3);

        Rect::new(x, y, toast_width, toast_height)
    }
}

impl Widget for ToastWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let toast_area = self.calculate_area(area);
        let t = theme();

        Widget::render(Clear, toast_area, buf);

        let message = format!(" {} {} ", icon(self.notice.level), self.notice.message);
        let border_style = if t.theme_type == ThemeType::NoColor {
            Style::default()
        } else {
            Style::default().fg(border_color(self.notice.level))
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(t.background));

        let paragraph = Paragraph::new(message)
            .block(block)
            .style(Style::default().fg(t.text).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });

        Widget::render(paragraph, toast_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_renders_message() {
        let notice = Notice::new("Deleted successfully", NoticeLevel::Success);
        let area = Rect::new(0, 0, 60, 10);
        let mut buf = Buffer::empty(area);
        ToastWidget::new(&notice).render(area, &mut buf);

        let rendered: String = (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect();
        assert!(rendered.contains("Deleted successfully"));
    }

    #[test]
    fn test_toast_area_fits_small_terminals() {
        let notice = Notice::new("x", NoticeLevel::Info);
        let widget = ToastWidget::new(&notice);
        let area = widget.calculate_area(Rect::new(0, 0, 10, 2));
        assert!(area.width <= 10);
        assert!(area.height <= 2);
    }
}
