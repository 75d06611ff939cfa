//! Display-less surface
//!
//! Keeps every element's spec, layout record and opacity in memory and
//! resolves positions with [`css::resolve_rect`](super::css::resolve_rect).
//! Used by the replay tool and by tests; a UI host provides its own
//! [`Surface`] instead.

use std::collections::HashMap;
use tracing::{trace, warn};

use super::css::resolve_rect;
use super::{ElementSpec, Surface};
use crate::geometry::{Point, Rect};
use crate::layout::ControlLayoutEntry;

#[derive(Debug, Clone)]
struct HeadlessElement {
    spec: ElementSpec,
    layout: ControlLayoutEntry,
    opacity: f32,
}

/// In-memory [`Surface`] with a fixed viewport rectangle
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    viewport: Rect,
    attached: bool,
    visible: bool,
    edit_highlight: bool,
    elements: HashMap<String, HeadlessElement>,
    /// Creation order, used to break z-index ties (later is on top)
    order: Vec<String>,
}

impl HeadlessSurface {
    /// Surface whose overlay root covers `width` x `height` at the origin
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_viewport(Rect::new(0.0, 0.0, width, height))
    }

    /// Surface whose overlay root covers `viewport`
    pub fn with_viewport(viewport: Rect) -> Self {
        Self {
            viewport,
            attached: false,
            visible: false,
            edit_highlight: false,
            elements: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn edit_highlight(&self) -> bool {
        self.edit_highlight
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn opacity(&self, id: &str) -> Option<f32> {
        self.elements.get(id).map(|e| e.opacity)
    }

    pub fn layout(&self, id: &str) -> Option<&ControlLayoutEntry> {
        self.elements.get(id).map(|e| &e.layout)
    }

    /// Element ids in creation order
    pub fn element_ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

impl Surface for HeadlessSurface {
    fn attach_root(&mut self) {
        self.attached = true;
    }

    fn detach_root(&mut self) {
        self.attached = false;
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn set_edit_highlight(&mut self, active: bool) {
        self.edit_highlight = active;
    }

    fn create_element(&mut self, spec: &ElementSpec, layout: &ControlLayoutEntry) {
        if self.elements.contains_key(&spec.id) {
            warn!("Element {} already exists, replacing it", spec.id);
            self.order.retain(|id| id != &spec.id);
        }
        self.order.push(spec.id.clone());
        self.elements.insert(
            spec.id.clone(),
            HeadlessElement {
                spec: spec.clone(),
                layout: layout.clone(),
                opacity: 1.0,
            },
        );
    }

    fn apply_layout(&mut self, id: &str, layout: &ControlLayoutEntry) {
        match self.elements.get_mut(id) {
            Some(element) => element.layout = layout.clone(),
            None => trace!("apply_layout on unknown element {}", id),
        }
    }

    fn set_opacity(&mut self, id: &str, opacity: f32) {
        if let Some(element) = self.elements.get_mut(id) {
            element.opacity = opacity;
        }
    }

    fn remove_element(&mut self, id: &str) {
        self.elements.remove(id);
        self.order.retain(|e| e != id);
    }

    fn element_rect(&self, id: &str) -> Option<Rect> {
        let element = self.elements.get(id)?;
        Some(resolve_rect(
            &element.layout,
            element.spec.width,
            element.spec.height,
            self.viewport,
        ))
    }

    fn overlay_rect(&self) -> Rect {
        self.viewport
    }

    fn hit_test(&self, point: Point) -> Option<String> {
        if !self.attached || !self.visible {
            return None;
        }

        self.order
            .iter()
            .enumerate()
            .filter_map(|(idx, id)| {
                let element = self.elements.get(id)?;
                let rect = self.element_rect(id)?;
                rect.contains(point).then_some((element.spec.z_index, idx, id))
            })
            .max_by_key(|(z, idx, _)| (*z, *idx))
            .map(|(_, _, id)| id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Shape;

    fn spec(id: &str, z_index: i32) -> ElementSpec {
        ElementSpec {
            id: id.to_string(),
            label: id.to_uppercase(),
            width: 50.0,
            height: 50.0,
            shape: Shape::Round,
            accent: None,
            z_index,
        }
    }

    fn at(left: &str, top: &str) -> ControlLayoutEntry {
        ControlLayoutEntry {
            left: left.into(),
            top: top.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_element_rect_follows_layout() {
        let mut surface = HeadlessSurface::new(800.0, 600.0);
        surface.create_element(&spec("a", 0), &at("10px", "20px"));
        assert_eq!(surface.element_rect("a"), Some(Rect::new(10.0, 20.0, 50.0, 50.0)));

        surface.apply_layout("a", &at("100px", "200px"));
        assert_eq!(surface.element_rect("a"), Some(Rect::new(100.0, 200.0, 50.0, 50.0)));
        assert_eq!(surface.element_rect("missing"), None);
    }

    #[test]
    fn test_hit_test_prefers_higher_z_then_later() {
        let mut surface = HeadlessSurface::new(800.0, 600.0);
        surface.attach_root();
        surface.set_visible(true);
        surface.create_element(&spec("top", 10), &at("0px", "0px"));
        surface.create_element(&spec("under", 0), &at("10px", "10px"));
        surface.create_element(&spec("later", 0), &at("20px", "20px"));

        assert_eq!(surface.hit_test(Point::new(25.0, 25.0)).as_deref(), Some("top"));
        assert_eq!(surface.hit_test(Point::new(55.0, 55.0)).as_deref(), Some("later"));
        assert_eq!(surface.hit_test(Point::new(500.0, 500.0)), None);
    }

    #[test]
    fn test_hit_test_requires_visible_root() {
        let mut surface = HeadlessSurface::new(800.0, 600.0);
        surface.create_element(&spec("a", 0), &at("0px", "0px"));
        assert_eq!(surface.hit_test(Point::new(5.0, 5.0)), None);

        surface.attach_root();
        surface.set_visible(true);
        assert_eq!(surface.hit_test(Point::new(5.0, 5.0)).as_deref(), Some("a"));
    }

    #[test]
    fn test_remove_element() {
        let mut surface = HeadlessSurface::new(800.0, 600.0);
        surface.create_element(&spec("a", 0), &at("0px", "0px"));
        surface.remove_element("a");
        assert_eq!(surface.element_count(), 0);
        assert_eq!(surface.element_ids().count(), 0);
    }
}
