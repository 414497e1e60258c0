//! Keeps map markers in step with a record set and tracks the selected position.

use crate::domain::location::Coordinate;
use crate::domain::restaurant::Restaurant;
use crate::error::Result;
use crate::map::canvas::{InfoPanel, MapCanvas, MarkerHandle};
use crate::map::geocoder::{GeocodeHit, Geocoder};

/// Seoul City Hall.
pub const HOME_CENTER: Coordinate = Coordinate {
    latitude: 37.566826,
    longitude: 126.9786567,
};

/// Zoom level used whenever the adapter recenters the map.
pub const FOCUS_LEVEL: u8 = 3;

#[derive(Debug)]
struct MarkerEntry {
    handle: MarkerHandle,
    record: Restaurant,
    panel: InfoPanel,
    open: bool,
}

pub struct MapAdapter<C, G> {
    canvas: C,
    geocoder: G,
    markers: Vec<MarkerEntry>,
    selected_position: Option<Coordinate>,
}

impl<C: MapCanvas, G: Geocoder> MapAdapter<C, G> {
    /// Wraps `canvas`, centering it on [`HOME_CENTER`].
    pub fn new(mut canvas: C, geocoder: G) -> Self {
        canvas.set_center(HOME_CENTER, FOCUS_LEVEL);
        Self {
            canvas,
            geocoder,
            markers: Vec::new(),
            selected_position: None,
        }
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// Ids of the records that currently have a marker, in placement order.
    pub fn marker_ids(&self) -> Vec<i64> {
        self.markers.iter().map(|m| m.record.id).collect()
    }

    /// Id of the record whose info panel is open, if any.
    pub fn open_marker(&self) -> Option<i64> {
        self.markers.iter().find(|m| m.open).map(|m| m.record.id)
    }

    pub fn add_marker(&mut self, record: &Restaurant) {
        let handle = self.canvas.place_marker(record.coordinate(), &record.name);
        self.markers.push(MarkerEntry {
            handle,
            record: record.clone(),
            panel: InfoPanel::from(record),
            open: false,
        });
    }

    pub fn close_all_info_panels(&mut self) {
        for entry in &mut self.markers {
            if entry.open {
                self.canvas.close_info_panel(entry.handle);
                entry.open = false;
            }
        }
    }

    fn open_panel(&mut self, id: i64) -> bool {
        let Some(index) = self.markers.iter().position(|m| m.record.id == id) else {
            return false;
        };
        self.close_all_info_panels();
        let entry = &mut self.markers[index];
        self.canvas.open_info_panel(entry.handle, &entry.panel);
        entry.open = true;
        true
    }

    /// Opens the panel of `id`'s marker, closing any other. False when there is
    /// no such marker.
    pub fn marker_clicked(&mut self, id: i64) -> bool {
        self.open_panel(id)
    }

    /// False when no marker exists for `id`.
    pub fn remove_marker(&mut self, id: i64) -> bool {
        let Some(index) = self.markers.iter().position(|m| m.record.id == id) else {
            return false;
        };
        let entry = self.markers.remove(index);
        self.canvas.remove_marker(entry.handle);
        true
    }

    pub fn clear_markers(&mut self) {
        for entry in self.markers.drain(..) {
            self.canvas.remove_marker(entry.handle);
        }
    }

    /// Replaces every marker with one per record.
    pub fn update_markers(&mut self, records: &[Restaurant]) {
        self.clear_markers();
        for record in records {
            self.add_marker(record);
        }
    }

    /// Centers on `record` and opens its panel when it has a marker.
    pub fn move_to_restaurant(&mut self, record: &Restaurant) {
        self.canvas.set_center(record.coordinate(), FOCUS_LEVEL);
        self.open_panel(record.id);
    }

    /// Centers on an arbitrary position, e.g. the device location.
    pub fn recenter(&mut self, at: Coordinate) {
        self.canvas.set_center(at, FOCUS_LEVEL);
    }

    /// Remembers `at` as the selected position and looks up its address.
    pub async fn handle_click(&mut self, at: Coordinate) -> Result<Option<String>> {
        self.selected_position = Some(at);
        self.geocoder.reverse(at).await
    }

    /// Looks up `query` and centers on the first hit.
    pub async fn search_by_address(&mut self, query: &str) -> Result<Option<GeocodeHit>> {
        let hit = self.geocoder.forward(query).await?;
        if let Some(hit) = &hit {
            self.canvas.set_center(hit.coordinate, FOCUS_LEVEL);
        }
        Ok(hit)
    }

    pub fn selected_position(&self) -> Option<Coordinate> {
        self.selected_position
    }

    pub fn clear_selection(&mut self) {
        self.selected_position = None;
    }
}
