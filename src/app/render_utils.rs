use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke};

use crate::content::{NodeKind, Tone};

use super::highlight::EdgeTier;
use super::viewport::ViewportState;

pub(super) const SELECTED_COLOR: Color32 = Color32::from_rgb(245, 206, 93);
pub(super) const CANVAS_COLOR: Color32 = Color32::from_rgb(19, 23, 29);

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct ToneStyle {
    pub(super) fill: Color32,
    pub(super) border: Color32,
    pub(super) text: Color32,
}

pub(super) fn tone_style(tone: Tone) -> ToneStyle {
    match tone {
        Tone::Calm => ToneStyle {
            fill: Color32::from_rgb(34, 44, 58),
            border: Color32::from_rgb(92, 128, 160),
            text: Color32::from_gray(226),
        },
        Tone::Bright => ToneStyle {
            fill: Color32::from_rgb(58, 50, 30),
            border: Color32::from_rgb(232, 190, 96),
            text: Color32::from_rgb(252, 240, 210),
        },
        Tone::Warn => ToneStyle {
            fill: Color32::from_rgb(62, 32, 32),
            border: Color32::from_rgb(222, 108, 92),
            text: Color32::from_rgb(250, 222, 214),
        },
    }
}

pub(super) fn kind_accent(kind: NodeKind) -> Color32 {
    match kind {
        NodeKind::Person => Color32::from_rgb(103, 196, 255),
        NodeKind::Place => Color32::from_rgb(120, 210, 140),
        NodeKind::Faction => Color32::from_rgb(200, 140, 240),
        NodeKind::Artifact => Color32::from_rgb(246, 180, 90),
        NodeKind::Event => Color32::from_rgb(240, 110, 120),
        NodeKind::Concept => Color32::from_rgb(170, 180, 200),
        NodeKind::Other => Color32::from_gray(140),
    }
}

pub(super) fn tier_color(tier: EdgeTier) -> Color32 {
    match tier {
        EdgeTier::Primary => Color32::from_rgb(241, 146, 94),
        EdgeTier::Path => Color32::from_rgb(246, 206, 104),
        EdgeTier::Secondary => Color32::from_rgb(150, 172, 198),
        EdgeTier::Background => Color32::from_rgb(118, 126, 138),
    }
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    color.gamma_multiply(opacity.clamp(0.0, 1.0))
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, camera: ViewportState) {
    painter.rect_filled(rect, 0.0, CANVAS_COLOR);

    let step = (48.0 * camera.scale).max(20.0);
    let origin = rect.min + camera.translation();
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 60));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn rect_visible(viewport: Rect, rect: Rect) -> bool {
    viewport.intersects(rect)
}
