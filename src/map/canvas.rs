//! Map widget primitives and an in-memory implementation.

use crate::domain::location::Coordinate;
use crate::domain::restaurant::Restaurant;
use std::collections::BTreeMap;

/// Opaque reference to a marker placed on a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerHandle(pub u64);

/// Popup content attached to a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct InfoPanel {
    pub title: String,
    pub category_label: String,
    pub stars: String,
    pub address: String,
    pub review: String,
}

impl From<&Restaurant> for InfoPanel {
    fn from(record: &Restaurant) -> Self {
        Self {
            title: record.name.clone(),
            category_label: record.category.display_name().to_string(),
            stars: record.stars(),
            address: record.address.clone(),
            review: record.review_or_placeholder().to_string(),
        }
    }
}

/// What an interactive map widget must offer. Rendering is up to the implementor.
pub trait MapCanvas: Send {
    fn place_marker(&mut self, at: Coordinate, title: &str) -> MarkerHandle;

    fn remove_marker(&mut self, handle: MarkerHandle);

    fn open_info_panel(&mut self, handle: MarkerHandle, panel: &InfoPanel);

    fn close_info_panel(&mut self, handle: MarkerHandle);

    /// Recenters the view. Lower `level` means closer zoom.
    fn set_center(&mut self, at: Coordinate, level: u8);
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMarker {
    pub at: Coordinate,
    pub title: String,
}

/// Canvas that only keeps book of what would be on screen.
#[derive(Debug, Default)]
pub struct HeadlessCanvas {
    next_handle: u64,
    markers: BTreeMap<MarkerHandle, PlacedMarker>,
    open_panels: BTreeMap<MarkerHandle, InfoPanel>,
    center: Option<(Coordinate, u8)>,
}

impl HeadlessCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markers(&self) -> impl Iterator<Item = &PlacedMarker> {
        self.markers.values()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Markers placed since creation, including ones removed since.
    pub fn placed_total(&self) -> u64 {
        self.next_handle
    }

    pub fn open_panels(&self) -> Vec<&InfoPanel> {
        self.open_panels.values().collect()
    }

    pub fn center(&self) -> Option<(Coordinate, u8)> {
        self.center
    }
}

impl MapCanvas for HeadlessCanvas {
    fn place_marker(&mut self, at: Coordinate, title: &str) -> MarkerHandle {
        self.next_handle += 1;
        let handle = MarkerHandle(self.next_handle);
        self.markers.insert(
            handle,
            PlacedMarker {
                at,
                title: title.to_string(),
            },
        );
        handle
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        self.markers.remove(&handle);
        self.open_panels.remove(&handle);
    }

    fn open_info_panel(&mut self, handle: MarkerHandle, panel: &InfoPanel) {
        if self.markers.contains_key(&handle) {
            self.open_panels.insert(handle, panel.clone());
        }
    }

    fn close_info_panel(&mut self, handle: MarkerHandle) {
        self.open_panels.remove(&handle);
    }

    fn set_center(&mut self, at: Coordinate, level: u8) {
        self.center = Some((at, level));
    }
}
