//! Rendering surface of the restaurant list and the add form.

use crate::domain::restaurant::Restaurant;
use std::sync::{Arc, Mutex, MutexGuard};

pub const EMPTY_LIST_MESSAGE: &str = "No saved restaurants.";

/// One row of the restaurant list, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub id: i64,
    pub name: String,
    pub category_label: String,
    pub address: String,
    pub stars: String,
    pub review: String,
}

impl From<&Restaurant> for ListItem {
    fn from(record: &Restaurant) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            category_label: record.category.display_name().to_string(),
            address: record.address.clone(),
            stars: record.stars(),
            review: record.review_or_placeholder().to_string(),
        }
    }
}

pub trait ListView: Send {
    fn show_loading(&mut self);

    /// An empty slice should render [`EMPTY_LIST_MESSAGE`].
    fn render_list(&mut self, items: &[ListItem]);

    /// Replaces the list with an inline error.
    fn show_error(&mut self, message: &str);

    /// Transient confirmation shown above the list.
    fn show_success(&mut self, message: &str);

    /// Modal notice, e.g. a failed address lookup.
    fn notify(&mut self, message: &str);

    fn show_add_form(&mut self, address: &str);

    fn hide_add_form(&mut self);

    fn reset_add_form(&mut self);

    /// Highlights the first `filled` stars of the rating input.
    fn display_rating(&mut self, filled: u8);
}

/// What occupies the list area.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ListPane {
    #[default]
    Blank,
    Loading,
    Items(Vec<ListItem>),
    Empty(String),
    Error(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenState {
    pub pane: ListPane,
    pub successes: Vec<String>,
    pub notices: Vec<String>,
    /// Prefilled address while the add form is visible.
    pub add_form: Option<String>,
    pub form_resets: usize,
    pub rating_display: u8,
}

impl ScreenState {
    pub fn items(&self) -> &[ListItem] {
        match &self.pane {
            ListPane::Items(items) => items,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.pane {
            ListPane::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// View that records the screen state instead of drawing it. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct HeadlessView {
    state: Arc<Mutex<ScreenState>>,
}

impl HeadlessView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ScreenState {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, ScreenState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ListView for HeadlessView {
    fn show_loading(&mut self) {
        self.lock().pane = ListPane::Loading;
    }

    fn render_list(&mut self, items: &[ListItem]) {
        self.lock().pane = if items.is_empty() {
            ListPane::Empty(EMPTY_LIST_MESSAGE.to_string())
        } else {
            ListPane::Items(items.to_vec())
        };
    }

    fn show_error(&mut self, message: &str) {
        self.lock().pane = ListPane::Error(message.to_string());
    }

    fn show_success(&mut self, message: &str) {
        self.lock().successes.push(message.to_string());
    }

    fn notify(&mut self, message: &str) {
        self.lock().notices.push(message.to_string());
    }

    fn show_add_form(&mut self, address: &str) {
        self.lock().add_form = Some(address.to_string());
    }

    fn hide_add_form(&mut self) {
        self.lock().add_form = None;
    }

    fn reset_add_form(&mut self) {
        self.lock().form_resets += 1;
    }

    fn display_rating(&mut self, filled: u8) {
        self.lock().rating_display = filled;
    }
}
