//! Small geospatial helpers.
//!
//! Coordinates passed here are expected in EPSG:4326 already; nothing in
//! this module reprojects.

/// Most frequent CRS string, ties going to the first one seen.
pub fn most_common_crs<S: AsRef<str>>(crs_list: &[S]) -> Option<String> {
    if crs_list.is_empty() {
        tracing::warn!("No data was found for the supplied CRS list");
        return None;
    }

    let mut counts: Vec<(&str, usize)> = Vec::new();
    for crs in crs_list {
        let crs = crs.as_ref();
        match counts.iter_mut().find(|(seen, _)| *seen == crs) {
            Some((_, count)) => *count += 1,
            None => counts.push((crs, 1)),
        }
    }

    // max_by_key keeps the last maximum, so walk in reverse.
    counts
        .into_iter()
        .rev()
        .max_by_key(|(_, count)| *count)
        .map(|(crs, _)| crs.to_string())
}

/// Whether a CRS identifier names a geographic (lat/lon) system.
pub fn is_geographic(crs: &str) -> bool {
    let upper = crs.trim().to_uppercase();
    if upper.starts_with("GEOGCS") || upper.starts_with("GEOGCRS") {
        return true;
    }
    upper
        .strip_prefix("EPSG:")
        .and_then(|code| code.parse::<u32>().ok())
        .map(|code| (4000..5000).contains(&code))
        .unwrap_or(false)
}

/// EPSG code of an `EPSG:<code>` identifier.
pub fn epsg_code(crs: &str) -> Option<u16> {
    crs.trim()
        .to_uppercase()
        .strip_prefix("EPSG:")
        .and_then(|code| code.parse::<u16>().ok())
}

/// Web map zoom level that fits the span between two coordinates.
///
/// `margin` pads (or, negative, shrinks) the span; a zero span zooms to 18.
pub fn degree_to_zoom_level(l1: f64, l2: f64, margin: f64) -> i32 {
    let degree = (l1 - l2).abs() * (1.0 + margin);
    if degree != 0.0 {
        (360.0 / degree).log2() as i32
    } else {
        18
    }
}

/// Zoom level that fits both the longitude and latitude spans.
pub fn zoom_level_for_bounds(lon: (f64, f64), lat: (f64, f64), margin: f64, zoom_bias: i32) -> i32 {
    let lat_zoom = degree_to_zoom_level(lat.0, lat.1, margin) + zoom_bias;
    let lon_zoom = degree_to_zoom_level(lon.0, lon.1, margin) + zoom_bias;
    lat_zoom.min(lon_zoom)
}

/// Latitude/longitude bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLonBounds {
    /// Longitude span.
    pub lon: (f64, f64),
    /// Latitude span.
    pub lat: (f64, f64),
}

impl LatLonBounds {
    /// Centre as `(lat, lon)`.
    pub fn center(&self) -> (f64, f64) {
        ((self.lat.0 + self.lat.1) / 2.0, (self.lon.0 + self.lon.1) / 2.0)
    }

    /// Zoom level that fits the box.
    pub fn zoom_level(&self, margin: f64, zoom_bias: i32) -> i32 {
        zoom_level_for_bounds(self.lon, self.lat, margin, zoom_bias)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn most_common_crs_counts_and_breaks_ties_by_order() {
        assert_eq!(
            most_common_crs(&["EPSG:32755", "EPSG:4326", "EPSG:4326"]).as_deref(),
            Some("EPSG:4326")
        );
        assert_eq!(
            most_common_crs(&["EPSG:3577", "EPSG:4326"]).as_deref(),
            Some("EPSG:3577")
        );
        assert_eq!(most_common_crs::<&str>(&[]), None);
    }

    #[test]
    fn geographic_detection() {
        assert!(is_geographic("EPSG:4326"));
        assert!(is_geographic("epsg:4283"));
        assert!(!is_geographic("EPSG:32755"));
        assert!(is_geographic("GEOGCS[\"WGS 84\"]"));
        assert!(!is_geographic("not a crs"));
    }

    #[test]
    fn zoom_level_matches_log2_span() {
        assert_eq!(degree_to_zoom_level(0.0, 360.0, 0.0), 0);
        assert_eq!(degree_to_zoom_level(0.0, 1.0, 0.0), 8);
        assert_eq!(degree_to_zoom_level(5.0, 5.0, 0.0), 18);
        // A negative margin shrinks the span and zooms in.
        assert_eq!(degree_to_zoom_level(0.0, 2.0, -0.5), 8);
    }

    #[test]
    fn bounds_zoom_takes_the_tighter_axis() {
        assert_eq!(zoom_level_for_bounds((0.0, 1.0), (0.0, 10.0), 0.0, 0), 5);
        assert_eq!(zoom_level_for_bounds((0.0, 1.0), (0.0, 10.0), 0.0, 2), 7);
    }

    #[test]
    fn bounds_center_and_zoom() {
        let bounds = LatLonBounds {
            lon: (140.0, 150.0),
            lat: (-40.0, -30.0),
        };
        assert_eq!(bounds.center(), (-35.0, 145.0));
        assert_eq!(bounds.zoom_level(0.0, 0), 5);
    }
}
