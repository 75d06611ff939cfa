//! Layout override record for one control

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// CSS-like positioning override for one control
///
/// Each field holds a CSS length or transform string (`"10px"`, `"50%"`,
/// `"auto"`, `"translateX(-120%)"`, `"none"`). An empty string means unset.
/// The record is plain data; only the rendering surface turns it into an
/// on-screen position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlLayoutEntry {
    pub top: String,
    pub bottom: String,
    pub left: String,
    pub right: String,
    pub transform: String,
}

impl ControlLayoutEntry {
    /// Entry anchored by absolute top/left with the opposite edges released
    /// and no transform, as produced by a drag
    pub fn pinned(top_left: Point) -> Self {
        Self {
            top: format_px(top_left.y),
            bottom: "auto".to_string(),
            left: format_px(top_left.x),
            right: "auto".to_string(),
            transform: "none".to_string(),
        }
    }

    /// Update only the top/left anchors
    pub fn set_top_left(&mut self, top_left: Point) {
        self.top = format_px(top_left.y);
        self.left = format_px(top_left.x);
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Format a pixel length the way style strings carry it (`12px`, `12.5px`)
pub fn format_px(value: f32) -> String {
    // +0.0 avoids "-0px"
    format!("{}px", value + 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_px() {
        assert_eq!(format_px(12.0), "12px");
        assert_eq!(format_px(12.5), "12.5px");
        assert_eq!(format_px(-0.0), "0px");
        assert_eq!(format_px(-30.0), "-30px");
    }

    #[test]
    fn test_pinned_entry() {
        let entry = ControlLayoutEntry::pinned(Point::new(40.0, 300.0));
        assert_eq!(entry.left, "40px");
        assert_eq!(entry.top, "300px");
        assert_eq!(entry.right, "auto");
        assert_eq!(entry.bottom, "auto");
        assert_eq!(entry.transform, "none");
    }

    #[test]
    fn test_missing_fields_deserialize_empty() {
        let entry: ControlLayoutEntry =
            serde_json::from_str(r#"{"bottom":"10px","right":"20px"}"#).unwrap();
        assert_eq!(entry.bottom, "10px");
        assert_eq!(entry.right, "20px");
        assert_eq!(entry.top, "");
        assert_eq!(entry.transform, "");
    }
}
