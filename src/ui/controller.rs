//! Drives the repository and the map from user events and renders the results.

use crate::app::repository::RestaurantRepository;
use crate::domain::location::{is_valid_latitude, is_valid_longitude, Coordinate};
use crate::domain::restaurant::{Category, NewRestaurant, Restaurant, MAX_RATING, MIN_RATING};
use crate::error::Error;
use crate::map::{Geocoder, MapAdapter, MapCanvas};
use crate::ui::events::{AddForm, EventSource, FilterState, SortOrder, UiEvent};
use crate::ui::view::{ListItem, ListView};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

/// How long an inline error stays before the full list is reloaded.
pub const DEFAULT_REVERT_DELAY: Duration = Duration::from_secs(3);

/// Rating preselected on the add form.
pub const DEFAULT_RATING: u8 = 5;

pub struct ViewController<C, G, V> {
    repo: Arc<dyn RestaurantRepository>,
    map: MapAdapter<C, G>,
    view: V,
    selected_rating: u8,
    current: Vec<Restaurant>,
    revert_delay: Duration,
    revert_at: Option<Instant>,
}

impl<C: MapCanvas, G: Geocoder, V: ListView> ViewController<C, G, V> {
    pub fn new(repo: Arc<dyn RestaurantRepository>, map: MapAdapter<C, G>, view: V) -> Self {
        Self {
            repo,
            map,
            view,
            selected_rating: DEFAULT_RATING,
            current: Vec::new(),
            revert_delay: DEFAULT_REVERT_DELAY,
            revert_at: None,
        }
    }

    pub fn with_revert_delay(mut self, delay: Duration) -> Self {
        self.revert_delay = delay;
        self
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn map(&self) -> &MapAdapter<C, G> {
        &self.map
    }

    pub fn selected_rating(&self) -> u8 {
        self.selected_rating
    }

    /// The record set currently rendered in the list and on the map.
    pub fn current(&self) -> &[Restaurant] {
        &self.current
    }

    pub fn revert_delay(&self) -> Duration {
        self.revert_delay
    }

    pub fn has_pending_revert(&self) -> bool {
        self.revert_at.is_some()
    }

    /// First render: rating input and the full list.
    pub async fn init(&mut self) {
        self.view.display_rating(self.selected_rating);
        self.reload().await;
    }

    /// Runs [`init`](Self::init), then handles events one at a time until the
    /// source is exhausted. A pending error revert fires between events.
    pub async fn run<S: EventSource>(&mut self, mut events: S) {
        self.init().await;
        loop {
            let revert = self.revert_at;
            tokio::select! {
                event = events.next_event() => match event {
                    Some(event) => self.handle(event).await,
                    None => break,
                },
                _ = sleep_until(revert.unwrap_or_else(Instant::now)), if revert.is_some() => {
                    debug!("Reverting to the full list after error");
                    self.revert_at = None;
                    self.reload().await;
                }
            }
        }
        debug!("Event source closed, view controller stopped");
    }

    pub async fn handle(&mut self, event: UiEvent) {
        debug!(?event, "Handling UI event");
        match event {
            UiEvent::Search(query) => self.search(&query).await,
            UiEvent::FilterChanged(filter) => self.filter(filter).await,
            UiEvent::SubmitAdd(form) => self.submit_add(form).await,
            UiEvent::CancelAdd => self.hide_add_form(),
            UiEvent::StarClicked(n) => {
                if in_rating_range(n) {
                    self.selected_rating = n;
                    self.view.display_rating(n);
                }
            }
            UiEvent::StarHovered(n) => {
                if in_rating_range(n) {
                    self.view.display_rating(n);
                }
            }
            UiEvent::StarHoverEnded => self.view.display_rating(self.selected_rating),
            UiEvent::ViewOnMap(id) => match self.current.iter().find(|r| r.id == id) {
                Some(record) => self.map.move_to_restaurant(record),
                None => debug!(id, "Record not in the current list"),
            },
            UiEvent::Delete(id) => self.delete(id).await,
            UiEvent::MapClicked(at) => self.map_clicked(at).await,
            UiEvent::MarkerClicked(id) => {
                self.map.marker_clicked(id);
            }
        }
    }

    /// Fetches the full list and renders it.
    pub async fn reload(&mut self) {
        self.view.show_loading();
        match self.repo.all().await {
            Ok(records) => self.show(records),
            Err(e) => {
                warn!(error = %e, "Failed to load restaurants");
                self.fail("Failed to load the restaurant list.");
            }
        }
    }

    /// Renders `records` in the list and as markers together.
    fn show(&mut self, records: Vec<Restaurant>) {
        let items: Vec<ListItem> = records.iter().map(ListItem::from).collect();
        self.view.render_list(&items);
        self.map.update_markers(&records);
        self.current = records;
    }

    /// Shows an inline error and schedules the revert to the full list.
    fn fail(&mut self, message: &str) {
        self.view.show_error(message);
        self.revert_at = Some(Instant::now() + self.revert_delay);
    }

    async fn search(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            self.reload().await;
            return;
        }

        self.view.show_loading();
        match self.map.search_by_address(query).await {
            Ok(Some(hit)) => debug!(address = %hit.address, "Map moved to address"),
            Ok(None) => self.view.notify("No results found for that address."),
            Err(e) => {
                warn!(error = %e, "Address search failed");
                self.view.notify("Address search is unavailable right now.");
            }
        }

        match self.repo.search(query).await {
            Ok(records) => self.show(records),
            Err(e) => {
                warn!(error = %e, query, "Search failed");
                self.fail("An error occurred while searching.");
            }
        }
    }

    async fn filter(&mut self, filter: FilterState) {
        self.view.show_loading();
        let result = match (filter.category, filter.sort) {
            (Some(category), _) => self.repo.by_category(category).await,
            (None, SortOrder::Rating) => self.repo.sorted_by_rating().await,
            (None, SortOrder::Date) => self.repo.sorted_by_date().await,
        };
        match result {
            Ok(records) => self.show(records),
            Err(e) => {
                warn!(error = %e, ?filter, "Filtering failed");
                self.fail("An error occurred while filtering.");
            }
        }
    }

    /// Form checks that run before anything is sent.
    fn prepare(&self, form: AddForm) -> Result<NewRestaurant, String> {
        let name = form.name.trim();
        if name.is_empty() {
            return Err("Please enter the restaurant name.".to_string());
        }
        let address = form.address.trim();
        if address.is_empty() {
            return Err("Please enter the address.".to_string());
        }
        if form.category.trim().is_empty() {
            return Err("Please select a category.".to_string());
        }
        let category: Category = form.category.parse().map_err(|e: Error| e.to_string())?;

        let Some(at) = self.map.selected_position() else {
            return Err("Please select a location on the map.".to_string());
        };
        if !is_valid_latitude(at.latitude) {
            return Err("Invalid latitude (must be between -90 and 90).".to_string());
        }
        if !is_valid_longitude(at.longitude) {
            return Err("Invalid longitude (must be between -180 and 180).".to_string());
        }

        let review = form.review.trim();
        Ok(NewRestaurant {
            name: name.to_string(),
            address: address.to_string(),
            category,
            rating: i64::from(self.selected_rating),
            review: (!review.is_empty()).then(|| review.to_string()),
            latitude: at.latitude,
            longitude: at.longitude,
        })
    }

    async fn submit_add(&mut self, form: AddForm) {
        let data = match self.prepare(form) {
            Ok(data) => data,
            Err(message) => {
                debug!(%message, "Add form rejected");
                self.fail(&message);
                return;
            }
        };

        match self.repo.add(data).await {
            Ok(record) => {
                info!(id = record.id, name = %record.name, "Restaurant added from form");
                self.reload().await;
                self.hide_add_form();
                self.reset_add_form();
                self.view.show_success("Restaurant added successfully!");
            }
            Err(e) => {
                warn!(error = %e, "Adding restaurant failed");
                self.fail(&e.to_string());
            }
        }
    }

    async fn delete(&mut self, id: i64) {
        match self.repo.delete(id).await {
            Ok(()) => {
                info!(id, "Restaurant deleted from list");
                self.reload().await;
                self.view.show_success("Restaurant deleted successfully.");
            }
            Err(e) => {
                warn!(error = %e, id, "Deleting restaurant failed");
                self.fail("An error occurred while deleting the restaurant.");
            }
        }
    }

    async fn map_clicked(&mut self, at: Coordinate) {
        match self.map.handle_click(at).await {
            Ok(Some(address)) => self.view.show_add_form(&address),
            Ok(None) => debug!(?at, "No address at clicked position"),
            Err(e) => {
                warn!(error = %e, "Reverse geocoding failed");
                self.view.notify("Could not look up the address of that location.");
            }
        }
    }

    fn hide_add_form(&mut self) {
        self.view.hide_add_form();
        self.map.clear_selection();
    }

    fn reset_add_form(&mut self) {
        self.view.reset_add_form();
        self.selected_rating = DEFAULT_RATING;
        self.view.display_rating(DEFAULT_RATING);
    }
}

fn in_rating_range(n: u8) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&i64::from(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::repository::LocalRepository;
    use crate::app::restaurant_manager::{ManagerOptions, RestaurantManager};
    use crate::map::{GazetteerGeocoder, HeadlessCanvas};
    use crate::storage::MemoryStore;
    use crate::ui::view::HeadlessView;

    async fn controller() -> (
        ViewController<HeadlessCanvas, GazetteerGeocoder, HeadlessView>,
        HeadlessView,
    ) {
        let manager = RestaurantManager::load(Arc::new(MemoryStore::new()), ManagerOptions::default())
            .await
            .unwrap();
        let repo = Arc::new(LocalRepository::new(manager));
        let view = HeadlessView::new();
        let map = MapAdapter::new(HeadlessCanvas::new(), GazetteerGeocoder::default());
        (ViewController::new(repo, map, view.clone()), view)
    }

    #[tokio::test]
    async fn star_events_track_selection() {
        let (mut ui, view) = controller().await;
        ui.init().await;
        assert_eq!(view.snapshot().rating_display, 5);

        ui.handle(UiEvent::StarHovered(2)).await;
        assert_eq!(view.snapshot().rating_display, 2);
        assert_eq!(ui.selected_rating(), 5);

        ui.handle(UiEvent::StarClicked(3)).await;
        ui.handle(UiEvent::StarHovered(1)).await;
        ui.handle(UiEvent::StarHoverEnded).await;
        assert_eq!(ui.selected_rating(), 3);
        assert_eq!(view.snapshot().rating_display, 3);

        ui.handle(UiEvent::StarClicked(9)).await;
        assert_eq!(ui.selected_rating(), 3);
    }

    #[tokio::test]
    async fn add_requires_fields_and_position() {
        let (mut ui, view) = controller().await;
        ui.init().await;

        let form = AddForm {
            name: "Tosokchon".into(),
            address: "5 Jahamun-ro 5-gil".into(),
            category: "korean".into(),
            review: String::new(),
        };

        ui.handle(UiEvent::SubmitAdd(AddForm {
            name: "  ".into(),
            ..form.clone()
        }))
        .await;
        assert_eq!(view.snapshot().error(), Some("Please enter the restaurant name."));
        assert!(ui.has_pending_revert());

        ui.handle(UiEvent::SubmitAdd(AddForm {
            category: String::new(),
            ..form.clone()
        }))
        .await;
        assert_eq!(view.snapshot().error(), Some("Please select a category."));

        ui.handle(UiEvent::SubmitAdd(form.clone())).await;
        assert_eq!(
            view.snapshot().error(),
            Some("Please select a location on the map.")
        );
        assert!(ui.current().is_empty());

        ui.handle(UiEvent::MapClicked(Coordinate::new(37.5779, 126.9710))).await;
        ui.handle(UiEvent::StarClicked(4)).await;
        ui.handle(UiEvent::SubmitAdd(form)).await;

        let screen = view.snapshot();
        assert_eq!(screen.items().len(), 1);
        assert_eq!(screen.items()[0].stars, "★★★★☆");
        assert_eq!(screen.items()[0].review, "No review");
        assert_eq!(screen.successes, ["Restaurant added successfully!"]);
        assert_eq!(screen.form_resets, 1);
        assert_eq!(ui.selected_rating(), DEFAULT_RATING);
        assert_eq!(ui.map().selected_position(), None);
        assert_eq!(ui.map().marker_ids(), [1]);
    }

    #[tokio::test]
    async fn add_and_delete_place_each_marker_once() {
        let (mut ui, view) = controller().await;
        ui.init().await;

        ui.handle(UiEvent::MapClicked(Coordinate::new(37.5779, 126.9710))).await;
        ui.handle(UiEvent::SubmitAdd(AddForm {
            name: "Tosokchon".into(),
            address: "5 Jahamun-ro 5-gil".into(),
            category: "korean".into(),
            review: String::new(),
        }))
        .await;
        assert_eq!(ui.map().marker_ids(), [1]);
        assert_eq!(ui.map().canvas().placed_total(), 1);

        ui.handle(UiEvent::Delete(1)).await;
        assert!(view.snapshot().items().is_empty());
        assert_eq!(ui.map().canvas().marker_count(), 0);
        assert_eq!(ui.map().canvas().placed_total(), 1);
    }
}
