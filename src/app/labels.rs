use eframe::egui::{Pos2, Vec2, vec2};

use crate::config::EngineConfig;

use super::edges::EdgeCurve;
use super::graph::RelationIndex;
use super::highlight::DensityGuard;

const PLATE_PADDING: Vec2 = vec2(6.0, 3.0);
const NARROW_GLYPH_EM: f32 = 0.58;

#[derive(Clone, Debug, PartialEq)]
pub struct LabelPlacement {
    pub edge: usize,
    /// Canvas percent.
    pub anchor: Pos2,
    pub text: String,
    /// Screen pixels.
    pub plate: Vec2,
}

/// First resolved edge joining each consecutive pair of `path`, in path order.
pub fn root_path_edges(index: &RelationIndex, path: &[usize]) -> Vec<usize> {
    path.windows(2)
        .filter_map(|pair| {
            let [a, b] = pair else {
                return None;
            };
            index
                .resolved_edges()
                .iter()
                .find(|edge| edge.connects(*a, *b))
                .map(|edge| edge.edge)
        })
        .collect()
}

/// Places labels for root-path edges given in path order.
pub fn place_path_labels<'a>(
    candidates: impl IntoIterator<Item = (usize, &'a EdgeCurve, &'a str)>,
    guard: DensityGuard,
    config: &EngineConfig,
    font_px: f32,
) -> Vec<LabelPlacement> {
    if !guard.labels_enabled() {
        return Vec::new();
    }

    candidates
        .into_iter()
        .filter(|(_, curve, text)| {
            !text.trim().is_empty() && curve.chord_length() >= config.min_label_length
        })
        .take(config.max_path_labels)
        .enumerate()
        .map(|(slot, (edge, curve, text))| {
            let length = curve.chord_length();
            let offset = (1.2 + length * 0.06) * (1.0 + slot as f32 * 0.22);
            LabelPlacement {
                edge,
                anchor: curve.point_at(0.5) + curve.normal_at(0.5) * offset,
                text: text.to_owned(),
                plate: plate_size(text, font_px),
            }
        })
        .collect()
}

pub fn plate_size(text: &str, font_px: f32) -> Vec2 {
    let ems = text.chars().map(glyph_em).sum::<f32>();
    vec2(ems * font_px, font_px) + PLATE_PADDING * 2.0
}

fn glyph_em(ch: char) -> f32 {
    if is_wide(ch) { 1.0 } else { NARROW_GLYPH_EM }
}

fn is_wide(ch: char) -> bool {
    matches!(
        u32::from(ch),
        0x1100..=0x115F
            | 0x2E80..=0xA4CF
            | 0xAC00..=0xD7A3
            | 0xF900..=0xFAFF
            | 0xFE30..=0xFE4F
            | 0xFF00..=0xFF60
            | 0xFFE0..=0xFFE6
            | 0x20000..=0x3FFFD
    )
}
