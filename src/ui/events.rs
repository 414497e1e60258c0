//! User interactions delivered to the view controller.

use crate::domain::location::Coordinate;
use crate::domain::restaurant::Category;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Values of the add-restaurant form as typed by the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddForm {
    pub name: String,
    pub address: String,
    /// Raw value of the category selector; blank when nothing is chosen.
    pub category: String,
    pub review: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Date,
    Rating,
}

/// State of the category filter and sort selectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterState {
    pub category: Option<Category>,
    pub sort: SortOrder,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Search(String),
    FilterChanged(FilterState),
    SubmitAdd(AddForm),
    CancelAdd,
    StarClicked(u8),
    StarHovered(u8),
    StarHoverEnded,
    ViewOnMap(i64),
    /// Already confirmed by the user.
    Delete(i64),
    MapClicked(Coordinate),
    MarkerClicked(i64),
}

/// Anything that yields UI events in order. `None` ends the session.
#[async_trait]
pub trait EventSource: Send {
    async fn next_event(&mut self) -> Option<UiEvent>;
}

#[async_trait]
impl EventSource for mpsc::Receiver<UiEvent> {
    async fn next_event(&mut self) -> Option<UiEvent> {
        self.recv().await
    }
}

#[async_trait]
impl EventSource for mpsc::UnboundedReceiver<UiEvent> {
    async fn next_event(&mut self) -> Option<UiEvent> {
        self.recv().await
    }
}
