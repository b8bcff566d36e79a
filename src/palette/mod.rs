//! Ink profiling, palette reduction, and paint mapping.
//!
//! The ink profile is the area-weighted list of colors that actually carry
//! the design; background plates, counters, whites, and `none` fills are
//! excluded. Reduced palettes come from greedy closest-pair ΔE merging with
//! area-weighted color averages; every paint group then maps to its nearest
//! surviving palette entry.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::classify::{WhiteClass, WhiteRegionDecision};
use crate::color::{Rgba, delta_e, is_white_like, lab_of, parse_color, rgb_to_lab};
use crate::registry::Registry;

/// One ink-profile line: a paint group's share of the visible design.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InkEntry {
    pub group_id: String,
    pub hex: String,
    pub lab: [f32; 3],
    pub area: f32,
    pub is_gradient: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteEntry {
    pub hex: String,
    pub lab: [f32; 3],
    pub area: f32,
}

/// Paint-group id → target hex (or `"none"`).
pub type PaintMapping = BTreeMap<String, String>;

/// A fixed production variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSpec {
    pub id: &'static str,
    pub name: &'static str,
    /// `None` = unlimited (full color).
    pub max_colors: Option<usize>,
    pub flatten_gradients: bool,
}

/// All four variants are always generated, in this order.
pub fn version_specs() -> [VersionSpec; 4] {
    [
        VersionSpec {
            id: "full_color",
            name: "Full Color",
            max_colors: None,
            flatten_gradients: false,
        },
        VersionSpec {
            id: "five_color",
            name: "3-5 Color",
            max_colors: Some(5),
            flatten_gradients: true,
        },
        VersionSpec {
            id: "two_color",
            name: "2 Color",
            max_colors: Some(2),
            flatten_gradients: true,
        },
        VersionSpec {
            id: "one_color",
            name: "1 Color",
            max_colors: Some(1),
            flatten_gradients: true,
        },
    ]
}

/// A variant's palette and per-group mapping, ready for an external
/// renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionPlan {
    pub spec: VersionSpec,
    pub palette: Vec<PaletteEntry>,
    pub mapping: PaintMapping,
    /// Full color passes the original markup through untouched.
    pub passthrough: bool,
}

// ============================================================================
// Ink profile
// ============================================================================

/// Paint groups that carry visible design ink, sorted by descending visible
/// area.
///
/// Excluded: groups whose representative is `none` or a white-like solid,
/// groups with no resolvable color (unresolved `Mesh` references), and
/// groups whose every member path is deleted or forced white by a
/// white-region decision.
pub fn build_ink_profile(
    registry: &Registry,
    decisions: &[WhiteRegionDecision],
) -> Vec<InkEntry> {
    let excluded_paths: FxHashSet<&str> = decisions
        .iter()
        .filter(|d| {
            matches!(
                d.classification,
                WhiteClass::BackgroundDelete | WhiteClass::CounterHole
            )
        })
        .map(|d| d.path_id.as_str())
        .collect();

    let mut profile: Vec<InkEntry> = registry
        .groups
        .iter()
        .filter_map(|group| {
            let rep = registry.paint(group.representative);
            if rep.is_none() {
                return None;
            }
            if rep.solid_rgba().is_some_and(is_white_like) {
                return None;
            }
            let color = rep.representative_rgba()?;

            let members = registry.fill_members(group);
            if members.is_empty() {
                return None;
            }
            let area: f32 = members
                .iter()
                .filter(|m| !excluded_paths.contains(m.id.as_str()))
                .map(|m| m.area)
                .sum();
            if area <= 0.0 {
                return None;
            }

            let lab = rgb_to_lab(color);
            Some(InkEntry {
                group_id: group.id.clone(),
                hex: color.hex(),
                lab: [lab.l, lab.a, lab.b],
                area,
                is_gradient: rep.is_gradient(),
            })
        })
        .collect();

    profile.sort_by(|a, b| b.area.total_cmp(&a.area));
    profile
}

// ============================================================================
// Palette reduction
// ============================================================================

/// Reduce the profile to at most `max_colors` entries by repeatedly merging
/// the closest pair (ΔE in Lab). The merged color is the area-weighted RGB
/// average; the merged area is the sum, so total area is conserved. Ties
/// take the first pair in scan order.
pub fn reduce_palette(profile: &[InkEntry], max_colors: usize) -> Vec<PaletteEntry> {
    let mut entries: Vec<PaletteEntry> = profile
        .iter()
        .map(|ink| PaletteEntry {
            hex: ink.hex.clone(),
            lab: ink.lab,
            area: ink.area,
        })
        .collect();

    while entries.len() > max_colors && entries.len() > 1 {
        let (mut best_i, mut best_j, mut best_d) = (0, 1, f32::MAX);
        for i in 0..entries.len() {
            for j in (i + 1)..entries.len() {
                let d = delta_e(lab_of(entries[i].lab), lab_of(entries[j].lab));
                if d < best_d {
                    (best_i, best_j, best_d) = (i, j, d);
                }
            }
        }

        let merged = merge_entries(&entries[best_i], &entries[best_j]);
        entries[best_i] = merged;
        entries.remove(best_j);
    }

    entries
}

fn merge_entries(a: &PaletteEntry, b: &PaletteEntry) -> PaletteEntry {
    let total = a.area + b.area;
    let wa = if total > 0.0 { a.area / total } else { 0.5 };
    let wb = 1.0 - wa;

    let ca = parse_color(&a.hex);
    let cb = parse_color(&b.hex);
    let channel = |x: u8, y: u8| (x as f32 * wa + y as f32 * wb).round() as u8;
    let rgba = Rgba::opaque(channel(ca.r, cb.r), channel(ca.g, cb.g), channel(ca.b, cb.b));

    let lab = rgb_to_lab(rgba);
    PaletteEntry {
        hex: rgba.hex(),
        lab: [lab.l, lab.a, lab.b],
        area: total,
    }
}

// ============================================================================
// Paint mapping
// ============================================================================

/// Map every paint group to a production target: `"none"` for unfilled
/// groups, white for white-like solids, otherwise the nearest palette entry
/// (first wins on ties). With an empty palette a group keeps its own
/// representative color, so the mapping stays total.
pub fn map_paints(registry: &Registry, palette: &[PaletteEntry]) -> PaintMapping {
    let mut mapping = PaintMapping::new();

    for group in &registry.groups {
        let rep = registry.paint(group.representative);
        let target = if rep.is_none() {
            "none".to_string()
        } else if rep.solid_rgba().is_some_and(is_white_like) {
            "#ffffff".to_string()
        } else {
            // Unresolved references fall back to opaque black, same as the
            // color parser.
            let color = rep.representative_rgba().unwrap_or(Rgba::BLACK);
            nearest_palette_hex(palette, color).unwrap_or_else(|| color.hex())
        };
        mapping.insert(group.id.clone(), target);
    }

    mapping
}

fn nearest_palette_hex(palette: &[PaletteEntry], color: Rgba) -> Option<String> {
    let lab = rgb_to_lab(color);
    let mut best: Option<(&PaletteEntry, f32)> = None;
    for entry in palette {
        let d = delta_e(lab, lab_of(entry.lab));
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((entry, d));
        }
    }
    best.map(|(entry, _)| entry.hex.clone())
}

/// Build all four version plans.
pub fn build_versions(
    registry: &Registry,
    profile: &[InkEntry],
) -> Vec<VersionPlan> {
    version_specs()
        .into_iter()
        .map(|spec| {
            let palette = match spec.max_colors {
                Some(max) => reduce_palette(profile, max),
                None => profile
                    .iter()
                    .map(|ink| PaletteEntry {
                        hex: ink.hex.clone(),
                        lab: ink.lab,
                        area: ink.area,
                    })
                    .collect(),
            };
            let mapping = map_paints(registry, &palette);
            let passthrough = spec.max_colors.is_none();
            VersionPlan {
                spec,
                palette,
                mapping,
                passthrough,
            }
        })
        .collect()
}
