pub mod controller;
pub mod events;
pub mod view;

pub use controller::{ViewController, DEFAULT_RATING, DEFAULT_REVERT_DELAY};
pub use events::{AddForm, EventSource, FilterState, SortOrder, UiEvent};
pub use view::{HeadlessView, ListItem, ListPane, ListView, ScreenState, EMPTY_LIST_MESSAGE};
