//! Built-in control table
//!
//! The default overlay (D-pad, two sticks, face buttons, Select/Start,
//! bumpers, triggers and the edit toggle) is described in
//! `docs/default-layout.csv` and embedded at build time. Each row gives the
//! control id, kind, label, binding, size, shape, tint and its default
//! CSS-like position.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::info;

use super::spec::{Binding, ControlKind, ControlSpec};
use crate::gamepad::{ButtonFlags, StickId, TriggerSide};
use crate::layout::ControlLayoutEntry;
use crate::surface::Shape;

/// Embedded default layout
pub const DEFAULT_CSV: &str = include_str!("../../docs/default-layout.csv");

/// Global cache for the parsed default table
static DEFAULT_CONTROLS: OnceLock<Vec<ControlSpec>> = OnceLock::new();

/// One CSV row
#[derive(Debug, Clone, Deserialize)]
struct LayoutRow {
    id: String,
    kind: ControlKind,
    label: String,
    binding: String,
    width: f32,
    height: f32,
    shape: Shape,
    accent: Option<String>,
    top: String,
    bottom: String,
    left: String,
    right: String,
    transform: String,
}

/// `true` for left, `false` for right
fn parse_side(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "left" => Ok(true),
        "right" => Ok(false),
        other => anyhow::bail!("Expected left or right, got {:?}", other),
    }
}

fn parse_binding(kind: ControlKind, binding: &str) -> Result<Binding> {
    match kind {
        ControlKind::Button => ButtonFlags::from_name(binding)
            .map(Binding::Button)
            .with_context(|| format!("Unknown button: {:?}", binding)),
        ControlKind::Trigger => Ok(Binding::Trigger(if parse_side(binding)? {
            TriggerSide::Left
        } else {
            TriggerSide::Right
        })),
        ControlKind::Joystick => Ok(Binding::Stick(if parse_side(binding)? {
            StickId::Left
        } else {
            StickId::Right
        })),
        ControlKind::Toggle => Ok(Binding::EditToggle),
    }
}

/// Parse a control table
pub fn parse_csv(csv_content: &str) -> Result<Vec<ControlSpec>> {
    let mut reader = csv::Reader::from_reader(csv_content.as_bytes());
    let mut specs = Vec::new();
    let mut seen = HashSet::new();

    for result in reader.deserialize() {
        let row: LayoutRow = result.context("Failed to parse CSV row")?;

        if !seen.insert(row.id.clone()) {
            anyhow::bail!("Duplicate control id: {}", row.id);
        }

        let binding = parse_binding(row.kind, &row.binding)
            .with_context(|| format!("Invalid binding for {}", row.id))?;

        specs.push(ControlSpec {
            binding,
            kind: row.kind,
            label: row.label,
            width: row.width,
            height: row.height,
            shape: row.shape,
            accent: row.accent.filter(|a| !a.is_empty()),
            default_layout: ControlLayoutEntry {
                top: row.top,
                bottom: row.bottom,
                left: row.left,
                right: row.right,
                transform: row.transform,
            },
            id: row.id,
        });
    }

    Ok(specs)
}

/// The embedded default controls (parsed once)
pub fn default_controls() -> Result<Vec<ControlSpec>> {
    if let Some(specs) = DEFAULT_CONTROLS.get() {
        return Ok(specs.clone());
    }

    let specs = parse_csv(DEFAULT_CSV).context("Invalid embedded default layout")?;
    info!("Loaded {} default controls", specs.len());
    let _ = DEFAULT_CONTROLS.set(specs.clone());
    Ok(specs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_table_parses() {
        let specs = default_controls().unwrap();
        assert_eq!(specs.len(), 17);

        let kinds = |k: ControlKind| specs.iter().filter(|s| s.kind == k).count();
        assert_eq!(kinds(ControlKind::Button), 12);
        assert_eq!(kinds(ControlKind::Trigger), 2);
        assert_eq!(kinds(ControlKind::Joystick), 2);
        assert_eq!(kinds(ControlKind::Toggle), 1);
    }

    #[test]
    fn test_button_a_defaults() {
        let specs = default_controls().unwrap();
        let a = specs.iter().find(|s| s.id == "btn-a").unwrap();
        assert_eq!(a.binding, Binding::Button(ButtonFlags::A));
        assert_eq!(a.default_layout.bottom, "35px");
        assert_eq!(a.default_layout.right, "70px");
        assert_eq!(a.default_layout.top, "");
        assert_eq!(a.accent.as_deref(), Some("#00ff00"));
    }

    #[test]
    fn test_bindings_cover_sticks_and_triggers() {
        let specs = default_controls().unwrap();
        let binding = |id: &str| specs.iter().find(|s| s.id == id).unwrap().binding;
        assert_eq!(binding("stick-left"), Binding::Stick(StickId::Left));
        assert_eq!(binding("stick-right"), Binding::Stick(StickId::Right));
        assert_eq!(binding("btn-l2"), Binding::Trigger(TriggerSide::Left));
        assert_eq!(binding("btn-select"), Binding::Button(ButtonFlags::BACK));
        assert_eq!(binding("btn-start"), Binding::Button(ButtonFlags::PLAY));
        assert_eq!(binding("edit-toggle"), Binding::EditToggle);
    }

    #[test]
    fn test_rejects_duplicates_and_bad_bindings() {
        let header = format!("{}\n", DEFAULT_CSV.lines().next().unwrap());

        let dup = format!(
            "{}a,button,A,a,1,1,round,,,,,,\na,button,B,b,1,1,round,,,,,,\n",
            header
        );
        assert!(parse_csv(&dup).is_err());

        let bad = format!("{}a,button,A,nope,1,1,round,,,,,,\n", header);
        assert!(parse_csv(&bad).is_err());

        let bad_side = format!("{}t,trigger,T,up,1,1,round,,,,,,\n", header);
        assert!(parse_csv(&bad_side).is_err());
    }
}
