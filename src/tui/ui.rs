use super::app::{BrowseFilter, BrowserApp, Mode};
use crate::models::{Booking, Task};
use crate::state::list::ListSource;
use crate::styles::{theme, LIST_HIGHLIGHT_SYMBOL};
use crate::widgets::ToastWidget;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use ratatui::Frame;

/// How a record is shown as one table row.
pub trait TableRow {
    fn headers() -> &'static [&'static str];
    fn widths() -> Vec<Constraint>;
    fn cells(&self) -> Vec<Cell<'static>>;
    /// Short description used in the delete prompt
    fn summary(&self) -> String;
    fn deletable_by(&self, _user_id: Option<&str>) -> bool {
        true
    }
}

impl TableRow for Booking {
    fn headers() -> &'static [&'static str] {
        &["Customer", "Vehicle", "Service", "Date", "Price", "Status"]
    }

    fn widths() -> Vec<Constraint> {
        vec![
            Constraint::Min(18),
            Constraint::Length(16),
            Constraint::Length(15),
            Constraint::Length(17),
            Constraint::Length(8),
            Constraint::Length(10),
        ]
    }

    fn cells(&self) -> Vec<Cell<'static>> {
        let t = theme();
        vec![
            Cell::from(self.customer_name.clone()),
            Cell::from(self.vehicle_label()),
            Cell::from(self.service_type.map(|s| s.to_string()).unwrap_or_default()),
            Cell::from(self.date.as_deref().map(short_date).unwrap_or_default()),
            Cell::from(self.price.map(|p| format!("${}", p)).unwrap_or_default()),
            Cell::from(self.status.to_string()).style(t.booking_status_style(self.status)),
        ]
    }

    fn summary(&self) -> String {
        format!("booking for {}", self.customer_name)
    }
}

impl TableRow for Task {
    fn headers() -> &'static [&'static str] {
        &["Title", "Description", "Status"]
    }

    fn widths() -> Vec<Constraint> {
        vec![
            Constraint::Percentage(35),
            Constraint::Percentage(50),
            Constraint::Length(9),
        ]
    }

    fn cells(&self) -> Vec<Cell<'static>> {
        let t = theme();
        vec![
            Cell::from(self.title.clone()),
            Cell::from(self.description.clone()),
            Cell::from(self.status.to_string()).style(t.task_status_style(self.status)),
        ]
    }

    fn summary(&self) -> String {
        format!("task \"{}\"", self.title)
    }

    fn deletable_by(&self, user_id: Option<&str>) -> bool {
        self.is_owned_by(user_id)
    }
}

/// `YYYY-MM-DDTHH:MM` from a longer timestamp, shown with a space.
fn short_date(date: &str) -> String {
    date.chars().take(16).collect::<String>().replacen('T', " ", 1)
}

pub fn render<S>(frame: &mut Frame, app: &mut BrowserApp<S>)
where
    S: ListSource + Clone + 'static,
    S::Item: TableRow + 'static,
    S::Filter: BrowseFilter,
{
    let t = theme();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search
            Constraint::Min(0),    // Table
            Constraint::Length(1), // Status
            Constraint::Length(1), // Help
        ])
        .split(frame.area());

    app.search.render(frame, chunks[0]);

    let controller = &app.controller;
    let label = controller.source().label();
    let title = if controller.is_loading() {
        format!(" {} (loading…) ", label)
    } else if app.debouncer.is_pending() {
        format!(" {} (searching…) ", label)
    } else {
        format!(" {} ", label)
    };

    let rows: Vec<Row> = controller
        .items()
        .iter()
        .map(|item| Row::new(item.cells()))
        .collect();
    let empty = rows.is_empty() && !controller.is_loading();

    let table = Table::new(rows, S::Item::widths())
        .header(Row::new(S::Item::headers().to_vec()).style(t.title_style()).bottom_margin(1))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(t.border_style(app.mode == Mode::Normal))
                .title(Span::styled(title, t.title_style())),
        )
        .row_highlight_style(t.highlight_style())
        .highlight_symbol(LIST_HIGHLIGHT_SYMBOL);
    frame.render_stateful_widget(table, chunks[1], &mut app.table_state);

    if empty {
        let inner = chunks[1].inner(Margin::new(2, 3));
        frame.render_widget(
            Paragraph::new(controller.empty_message()).style(t.muted_style()),
            inner,
        );
    }

    let controller = &app.controller;
    let status = Line::from(vec![
        Span::styled(
            format!(" page {}/{} ", controller.page(), controller.total_pages()),
            t.title_style(),
        ),
        Span::raw(format!(" {} total  ", controller.total_items())),
        Span::styled(controller.filter().describe(), t.muted_style()),
        Span::styled(
            controller
                .query()
                .sort
                .as_ref()
                .map(|s| format!("  sort: {} {}", s.by, s.order.as_str()))
                .unwrap_or_default(),
            t.muted_style(),
        ),
    ]);
    frame.render_widget(Paragraph::new(status), chunks[2]);

    let help = match &app.mode {
        Mode::Normal => {
            "q quit  ↑↓ select  ←→ page  / search  s status  t service  o sort  c clear  r refresh  d delete"
        }
        Mode::Search => "Enter apply  Esc cancel",
        Mode::ConfirmDelete { .. } => "y confirm  any other key cancels",
    };
    frame.render_widget(Paragraph::new(help).style(t.muted_style()), chunks[3]);

    if let Mode::ConfirmDelete { label, .. } = &app.mode {
        render_confirm(frame, &format!("Delete {}?", label));
    }

    if let Some(notice) = app.controller.notices().current() {
        frame.render_widget(ToastWidget::new(notice), frame.area());
    }
}

fn render_confirm(frame: &mut Frame, question: &str) {
    let t = theme();
    let area = centered(frame.area(), 50, 5);
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(vec![Line::from(""), Line::from(question.to_string())])
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(t.border_style(true))
                    .title(Span::styled(" Confirm ", t.title_style())),
            ),
        area,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
