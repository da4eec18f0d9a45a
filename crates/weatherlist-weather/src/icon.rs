//! Forecast icon addresses and decoded icon images.

use crate::types::IconError;

pub const DEFAULT_ICON_BASE_URL: &str = "https://openweathermap.org";

/// Build the icon address for an icon id, e.g. `10d` ->
/// `https://openweathermap.org/img/wn/10d@2x.png`. The result is the icon cache key.
pub fn icon_url(base_url: &str, icon_id: &str) -> String {
    format!("{}/img/wn/{}@2x.png", base_url.trim_end_matches('/'), icon_id)
}

/// Decoded RGBA8 icon
#[derive(Clone, PartialEq, Eq)]
pub struct IconImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl IconImage {
    /// Decode a PNG payload into RGBA pixels
    pub fn decode(bytes: &[u8]) -> Result<Self, IconError> {
        let decoded = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = decoded.dimensions();
        Ok(Self {
            width,
            height,
            pixels: decoded.into_raw(),
        })
    }
}

impl std::fmt::Debug for IconImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IconImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}
