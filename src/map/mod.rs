pub mod adapter;
pub mod canvas;
pub mod geocoder;
pub mod kakao;

pub use adapter::{MapAdapter, FOCUS_LEVEL, HOME_CENTER};
pub use canvas::{HeadlessCanvas, InfoPanel, MapCanvas, MarkerHandle};
pub use geocoder::{GazetteerGeocoder, GeocodeHit, Geocoder};
pub use kakao::KakaoGeocoder;
