//! Interactive browser over one paged list.

use super::ui::{self, TableRow};
use super::Tui;
use crate::error::ApiError;
use crate::models::{BookingStatus, Record, TaskStatus};
use crate::state::filters::{BookingFilter, BookingFilterPatch, TaskFilter, TaskFilterPatch};
use crate::state::list::{FetchTicket, Filter, ListController, ListSource, Page, PageQuery, Sort};
use crate::utils::{Debouncer, InputField};
use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::widgets::TableState;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

/// Filter operations bound to browser keys.
pub trait BrowseFilter: Filter {
    /// Patch moving the status filter one step along its cycle
    fn cycle_status(&self) -> Self::Patch;
    /// Patch for the secondary cycle key, if the list has one
    fn cycle_category(&self) -> Option<Self::Patch> {
        None
    }
    fn search_patch(text: String) -> Self::Patch;
    fn search_text(&self) -> &str;
    fn describe(&self) -> String;
}

impl BrowseFilter for BookingFilter {
    fn cycle_status(&self) -> BookingFilterPatch {
        BookingFilterPatch {
            status: Some(self.status.cycle(&BookingStatus::ALL)),
            ..Default::default()
        }
    }

    fn cycle_category(&self) -> Option<BookingFilterPatch> {
        Some(BookingFilterPatch {
            service_type: Some(self.next_service_type()),
            ..Default::default()
        })
    }

    fn search_patch(text: String) -> BookingFilterPatch {
        BookingFilterPatch {
            query: Some(text),
            ..Default::default()
        }
    }

    fn search_text(&self) -> &str {
        &self.query
    }

    fn describe(&self) -> String {
        BookingFilter::describe(self)
    }
}

impl BrowseFilter for TaskFilter {
    fn cycle_status(&self) -> TaskFilterPatch {
        TaskFilterPatch {
            status: Some(self.status.cycle(&TaskStatus::ALL)),
            ..Default::default()
        }
    }

    fn search_patch(text: String) -> TaskFilterPatch {
        TaskFilterPatch {
            search: Some(text),
            ..Default::default()
        }
    }

    fn search_text(&self) -> &str {
        &self.search
    }

    fn describe(&self) -> String {
        TaskFilter::describe(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Search,
    /// Waiting for y/n on deleting the record with this id
    ConfirmDelete { id: String, label: String },
}

type FetchResult<S> = (
    FetchTicket<<S as ListSource>::Filter>,
    Result<Page<<S as ListSource>::Item>, ApiError>,
);

pub struct BrowserApp<S: ListSource> {
    pub(crate) controller: ListController<S>,
    pub(crate) table_state: TableState,
    pub(crate) search: InputField,
    pub(crate) mode: Mode,
    pub(crate) user_id: Option<String>,
    pub(crate) debouncer: Debouncer<String>,
    notice_ttl: Duration,
    runtime: Handle,
    tx: UnboundedSender<FetchResult<S>>,
    rx: UnboundedReceiver<FetchResult<S>>,
    in_flight: Option<PageQuery<S::Filter>>,
    should_quit: bool,
}

impl<S> BrowserApp<S>
where
    S: ListSource + Clone + 'static,
    S::Item: TableRow + 'static,
    S::Filter: BrowseFilter,
{
    pub fn new(
        controller: ListController<S>,
        runtime: Handle,
        search_debounce: Duration,
        notice_ttl: Duration,
    ) -> Self {
        let (tx, rx) = unbounded_channel();
        let mut search = InputField::new("Search").with_placeholder("type to filter, Enter to apply");
        search.set_value(controller.filter().search_text());
        Self {
            controller,
            table_state: TableState::default(),
            search,
            mode: Mode::Normal,
            user_id: None,
            debouncer: Debouncer::new(search_debounce),
            notice_ttl,
            runtime,
            tx,
            rx,
            in_flight: None,
            should_quit: false,
        }
    }

    /// Signed-in user, for ownership checks on delete.
    pub fn with_user(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn controller(&self) -> &ListController<S> {
        &self.controller
    }

    pub fn run(&mut self, tui: &mut Tui) -> Result<()> {
        tui.enter()?;
        info!("Browsing {}", self.controller.source().label());

        loop {
            self.tick(Instant::now());
            tui.draw(|frame| ui::render(frame, self))?;

            if self.should_quit {
                break;
            }

            if let Some(event) = tui.poll_event(Duration::from_millis(100))? {
                self.handle_event(event);
            }
        }

        tui.exit()?;
        Ok(())
    }

    /// Drain finished fetches, fire due searches, start a fetch if the query moved.
    pub fn tick(&mut self, now: Instant) {
        while let Ok((ticket, result)) = self.rx.try_recv() {
            if self.controller.apply(ticket, result) {
                self.in_flight = None;
                self.clamp_selection();
            }
        }

        if let Some(text) = self.debouncer.poll(now) {
            debug!("Search settled on {:?}", text);
            self.controller.set_filter(S::Filter::search_patch(text));
        }

        if self.controller.is_stale() && self.in_flight.as_ref() != Some(self.controller.query()) {
            self.spawn_fetch();
        }

        self.controller.notices_mut().expire(self.notice_ttl, now);
    }

    fn spawn_fetch(&mut self) {
        let ticket = self.controller.begin_fetch();
        self.in_flight = Some(ticket.query().clone());
        let source = self.controller.source().clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = source.fetch_page(ticket.query()).await;
            // The receiver is gone only once the browser has quit.
            let _ = tx.send((ticket, result));
        });
    }

    /// Apply one terminal event. Only key presses act.
    pub fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match self.mode.clone() {
            Mode::Normal => self.handle_normal_key(key),
            Mode::Search => self.handle_search_key(key),
            Mode::ConfirmDelete { id, .. } => self.handle_confirm_key(key, &id),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Right | KeyCode::Char('n') | KeyCode::PageDown => {
                self.controller.next_page();
            }
            KeyCode::Left | KeyCode::Char('p') | KeyCode::PageUp => {
                self.controller.prev_page();
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.controller.set_page(1);
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.controller.set_page(self.controller.total_pages());
            }
            KeyCode::Char('s') => {
                let patch = self.controller.filter().cycle_status();
                self.controller.set_filter(patch);
            }
            KeyCode::Char('t') => {
                if let Some(patch) = self.controller.filter().cycle_category() {
                    self.controller.set_filter(patch);
                }
            }
            KeyCode::Char('o') => self.toggle_sort(),
            KeyCode::Char('c') => {
                self.debouncer.cancel();
                self.search.clear();
                self.controller.clear_filters();
            }
            KeyCode::Char('r') => self.spawn_fetch(),
            KeyCode::Char('/') => {
                self.mode = Mode::Search;
                self.search.is_focused = true;
            }
            KeyCode::Char('d') | KeyCode::Delete => self.request_delete(),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.debouncer.cancel();
                let text = self.search.value.clone();
                if text != self.controller.filter().search_text() {
                    self.controller.set_filter(S::Filter::search_patch(text));
                }
                self.leave_search();
            }
            KeyCode::Esc => {
                self.debouncer.cancel();
                let current = self.controller.filter().search_text().to_string();
                self.search.set_value(&current);
                self.leave_search();
            }
            code => {
                if self.search.handle_key(code) {
                    self.debouncer.push(self.search.value.clone(), Instant::now());
                }
            }
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent, id: &str) {
        self.mode = Mode::Normal;
        if !matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
            self.controller.notices_mut().info("Delete cancelled");
            return;
        }
        // The list is locked while the delete and its refresh run.
        let runtime = self.runtime.clone();
        let _ = runtime.block_on(self.controller.delete(id));
        self.in_flight = None;
        self.clamp_selection();
    }

    fn leave_search(&mut self) {
        self.mode = Mode::Normal;
        self.search.is_focused = false;
    }

    fn toggle_sort(&mut self) {
        let sort = match &self.controller.query().sort {
            Some(sort) => Sort::new(&sort.by, sort.order.toggled()),
            None => match self.controller.source().default_sort() {
                Some(sort) => Sort::new(&sort.by, sort.order.toggled()),
                None => return,
            },
        };
        self.controller.set_sort(sort);
    }

    fn request_delete(&mut self) {
        let Some(item) = self.selected() else {
            return;
        };
        if !item.deletable_by(self.user_id.as_deref()) {
            self.controller
                .notices_mut()
                .warning("Only the creator can delete this record");
            return;
        }
        let (id, label) = (item.id().to_string(), item.summary());
        self.mode = Mode::ConfirmDelete { id, label };
    }

    fn selected(&self) -> Option<&S::Item> {
        self.table_state
            .selected()
            .and_then(|i| self.controller.items().get(i))
    }

    fn select_next(&mut self) {
        let len = self.controller.items().len();
        if len == 0 {
            return;
        }
        let next = self.table_state.selected().map_or(0, |i| (i + 1).min(len - 1));
        self.table_state.select(Some(next));
    }

    fn select_previous(&mut self) {
        if self.controller.items().is_empty() {
            return;
        }
        let prev = self.table_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.table_state.select(Some(prev));
    }

    fn clamp_selection(&mut self) {
        let len = self.controller.items().len();
        let selected = match (len, self.table_state.selected()) {
            (0, _) => None,
            (_, None) => Some(0),
            (len, Some(i)) => Some(i.min(len - 1)),
        };
        self.table_state.select(selected);
    }
}

