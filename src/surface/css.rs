//! Resolution of CSS-like layout records into rectangles
//!
//! Only the subset the overlay layouts use is understood: `px` and `%`
//! lengths, `auto`, and `translate`/`translateX`/`translateY` transforms.
//! Anything else resolves as unset.

use tracing::trace;

use crate::geometry::Rect;
use crate::layout::ControlLayoutEntry;

/// A single CSS length
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f32),
    Percent(f32),
    Auto,
}

impl Length {
    /// Parse `"10px"`, `"-2.5px"`, `"50%"`, `"0"` or `"auto"`
    ///
    /// Returns `None` for empty or unsupported values.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        if s.eq_ignore_ascii_case("auto") {
            return Some(Length::Auto);
        }
        if let Some(px) = s.strip_suffix("px") {
            return px.trim().parse().ok().map(Length::Px);
        }
        if let Some(pct) = s.strip_suffix('%') {
            return pct.trim().parse().ok().map(Length::Percent);
        }
        // Unitless zero is valid CSS
        match s.parse::<f32>() {
            Ok(v) if v == 0.0 => Some(Length::Px(0.0)),
            _ => {
                trace!("Unsupported CSS length: {:?}", s);
                None
            }
        }
    }

    /// Resolve against `basis` (the size percentages refer to)
    ///
    /// `auto` resolves as `None` so the caller can fall back to the opposite
    /// edge.
    pub fn resolve(self, basis: f32) -> Option<f32> {
        match self {
            Length::Px(v) => Some(v),
            Length::Percent(p) => Some(basis * p / 100.0),
            Length::Auto => None,
        }
    }
}

/// Accumulated translation of a transform list
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Translation {
    x: AxisOffset,
    y: AxisOffset,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct AxisOffset {
    px: f32,
    percent: f32,
}

impl AxisOffset {
    fn add(&mut self, len: Length) {
        match len {
            Length::Px(v) => self.px += v,
            Length::Percent(p) => self.percent += p,
            Length::Auto => {}
        }
    }

    fn resolve(&self, size: f32) -> f32 {
        self.px + size * self.percent / 100.0
    }
}

impl Translation {
    /// Parse a transform string such as `"translateX(-120%)"` or
    /// `"translate(-50%, 10px)"`. `"none"` and `""` are the identity.
    pub fn parse(s: &str) -> Self {
        let mut out = Translation::default();
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("none") {
            return out;
        }

        for func in s.split(')') {
            let func = func.trim();
            if func.is_empty() {
                continue;
            }
            let Some((name, args)) = func.split_once('(') else {
                trace!("Unsupported transform fragment: {:?}", func);
                continue;
            };
            let args: Vec<Length> = args
                .split(',')
                .filter_map(Length::parse)
                .collect();

            match (name.trim(), args.as_slice()) {
                ("translateX", [x]) => out.x.add(*x),
                ("translateY", [y]) => out.y.add(*y),
                ("translate", [x]) => out.x.add(*x),
                ("translate", [x, y]) => {
                    out.x.add(*x);
                    out.y.add(*y);
                }
                (other, _) => trace!("Unsupported transform function: {:?}", other),
            }
        }

        out
    }

    /// Offset in pixels for an element of the given size
    pub fn offset(&self, width: f32, height: f32) -> (f32, f32) {
        (self.x.resolve(width), self.y.resolve(height))
    }
}

/// Resolve one edge pair into the start coordinate
fn resolve_axis(start: &str, end: &str, size: f32, container: f32) -> f32 {
    if let Some(v) = Length::parse(start).and_then(|l| l.resolve(container)) {
        return v;
    }
    if let Some(v) = Length::parse(end).and_then(|l| l.resolve(container)) {
        return container - v - size;
    }
    0.0
}

/// Rendered rectangle of an element of `width` x `height` placed by
/// `layout` inside `container` (all in viewport coordinates)
pub fn resolve_rect(layout: &ControlLayoutEntry, width: f32, height: f32, container: Rect) -> Rect {
    let x = resolve_axis(&layout.left, &layout.right, width, container.width);
    let y = resolve_axis(&layout.top, &layout.bottom, height, container.height);
    let (tx, ty) = Translation::parse(&layout.transform).offset(width, height);

    Rect::new(container.x + x + tx, container.y + y + ty, width, height)
}
