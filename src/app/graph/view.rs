use std::collections::HashSet;

use eframe::egui::epaint::CubicBezierShape;
use eframe::egui::{
    self, Align2, Color32, FontId, Painter, Pos2, Rect, Sense, Shape, Stroke, StrokeKind, Ui, Vec2,
    vec2,
};

use crate::util::truncate_chars;

use super::super::edges::{EdgeCurve, EdgeLayer, NodeBox, edge_layer};
use super::super::highlight::tiers::{edge_style, node_style};
use super::super::highlight::{
    DensityGuard, EdgeStyle, EdgeTier, NodeClass, edge_tier, node_class, visible_spotlight_edges,
};
use super::super::labels::{place_path_labels, root_path_edges};
use super::super::render_utils::{
    CANVAS_COLOR, SELECTED_COLOR, blend_color, draw_background, kind_accent, rect_visible,
    tier_color, tone_style, with_opacity,
};
use super::super::viewport::{ViewportPhase, ViewportState};
use super::super::ViewModel;

const NODE_FONT_PX: f32 = 13.0;
const NODE_PADDING: Vec2 = vec2(20.0, 10.0);
const NODE_CORNER: f32 = 6.0;
const TITLE_CHARS: usize = 28;
const LABEL_FONT_PX: f32 = 11.0;
const CURVE_SEGMENTS: usize = 24;
const ENTRANCE_SECS: f64 = 0.35;
const ENTRANCE_STAGGER_SECS: f64 = 0.025;
const ENTRANCE_STAGGER_CAP_SECS: f64 = 0.6;
const FLOW_SPEED: f64 = 28.0;

struct EdgeDraw {
    edge: usize,
    curve: EdgeCurve,
    tier: EdgeTier,
    style: EdgeStyle,
    layer: EdgeLayer,
}

fn tier_rank(tier: EdgeTier) -> u8 {
    match tier {
        EdgeTier::Background => 0,
        EdgeTier::Secondary => 1,
        EdgeTier::Path => 2,
        EdgeTier::Primary => 3,
    }
}

/// Paints one edge; returns whether it animates.
fn paint_edge(
    painter: &Painter,
    rect: Rect,
    camera: ViewportState,
    draw: &EdgeDraw,
    time: f64,
) -> bool {
    let curve = draw.curve.map_points(|point| camera.canvas_to_screen(rect, point));
    let color = with_opacity(tier_color(draw.tier), draw.style.opacity);
    let width = draw.style.width * camera.scale;

    if draw.style.glow {
        painter.add(CubicBezierShape::from_points_stroke(
            curve.points(),
            false,
            Color32::TRANSPARENT,
            Stroke::new(width * 3.2, color.gamma_multiply(0.22)),
        ));
    }

    match draw.style.dash {
        Some([dash, gap]) => {
            let points = curve.sample(CURVE_SEGMENTS);
            painter.extend(Shape::dashed_line(
                &points,
                Stroke::new(width, color),
                dash * camera.scale,
                gap * camera.scale,
            ));
        }
        None => {
            painter.add(CubicBezierShape::from_points_stroke(
                curve.points(),
                false,
                Color32::TRANSPARENT,
                Stroke::new(width, color),
            ));
        }
    }

    if !draw.style.flow {
        return false;
    }

    let points = curve.sample(CURVE_SEGMENTS);
    let offset = ((time * FLOW_SPEED) % 16.0) as f32;
    painter.extend(Shape::dashed_line_with_offset(
        &points,
        Stroke::new(width * 0.55, blend_color(color, Color32::WHITE, 0.45)),
        &[6.0],
        &[10.0],
        offset,
    ));
    true
}

impl ViewModel {
    /// Measures every node box at scale 1 from its rendered title.
    fn measure_boxes(&mut self, ui: &Ui) {
        let painter = ui.painter();
        let sizes = self
            .graph
            .nodes
            .iter()
            .map(|record| {
                let galley = painter.layout_no_wrap(
                    truncate_chars(&record.title, TITLE_CHARS),
                    FontId::proportional(NODE_FONT_PX),
                    Color32::WHITE,
                );
                galley.size() + NODE_PADDING
            })
            .collect::<Vec<_>>();

        tracing::debug!(nodes = sizes.len(), "measured node boxes");
        self.boxes.store(sizes);
    }

    fn node_box(&self, node: usize) -> NodeBox {
        let pos = self.graph.nodes[node].pos;
        NodeBox::new(Pos2::new(pos.x, pos.y), self.boxes.half_extent(node))
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        if self.graph_dirty {
            self.rebuild_render_graph();
        }

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let now = ui.input(|input| input.time);
        let loaded_at = *self.loaded_at.get_or_insert(now);

        self.hover.flush();
        if self.boxes.note_viewport(rect.size()) {
            tracing::trace!(width = rect.width(), height = rect.height(), "node remeasure scheduled");
        }
        if self.boxes.take_due(self.graph.node_count()) {
            self.measure_boxes(ui);
        }

        self.handle_graph_zoom(ui, rect, &response);
        let hovered = self.hovered_node_at(ui, rect);
        self.handle_graph_pan(&response, hovered.is_some());
        self.handle_keyboard(ui, now);

        let panning = self.viewport.phase() == ViewportPhase::Panning;
        let hovered_id = if panning {
            None
        } else {
            hovered.map(|node| self.graph.nodes[node].id.clone())
        };
        if hovered_id.as_deref() != self.hover.current() {
            ui.ctx().request_repaint();
        }
        self.hover.push(hovered_id);

        self.apply_pending_center(rect, now);
        let camera_moving = self.viewport.tick(now);
        let camera = self.viewport.state();

        let search_matches = self.search_matches().into_iter().collect::<HashSet<_>>();
        let focus = self.focus_state();
        let spotlight_edges = self.graph_cache.as_ref().map_or(0, |cache| {
            visible_spotlight_edges(&focus, self.index.resolved_edges(), &cache.visible_edges)
        });
        let guard = DensityGuard::evaluate(
            self.visible_node_count,
            self.visible_edge_count,
            spotlight_edges,
            &self.config,
        );
        if guard != self.last_guard {
            tracing::info!(heavy = guard.heavy, crowded = guard.crowded, "density guard changed");
            self.last_guard = guard;
        }

        let painter = ui.painter_at(rect);
        draw_background(&painter, rect, camera);

        let Some(cache) = self.graph_cache.as_ref() else {
            return;
        };
        if cache.visible_nodes.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No nodes match the current filters.",
                FontId::proportional(14.0),
                Color32::from_gray(180),
            );
            return;
        }

        let spotlight_active = focus.spotlight.is_some();
        let mut edge_draws = cache
            .visible_edges
            .iter()
            .map(|&position| {
                let resolved = &self.index.resolved_edges()[position];
                let record = &self.graph.edges[resolved.edge];
                let from = self.node_box(resolved.from);
                let to = self.node_box(resolved.to);
                let tier = edge_tier(&focus, resolved);
                EdgeDraw {
                    edge: resolved.edge,
                    curve: EdgeCurve::build(&record.id, from, to),
                    tier,
                    style: edge_style(tier, guard, spotlight_active),
                    layer: edge_layer(from, to),
                }
            })
            .collect::<Vec<_>>();
        edge_draws.sort_by_key(|draw| tier_rank(draw.tier));

        let mut animating = camera_moving;
        for draw in edge_draws.iter().filter(|draw| draw.layer == EdgeLayer::Occluded) {
            animating |= paint_edge(&painter, rect, camera, draw, now);
        }

        let entrance = guard.entrance_enabled() && !self.reduced_motion;
        for (order, &node) in cache.visible_nodes.iter().enumerate() {
            let node_rect = self.node_screen_rect(rect, camera, node);
            if !rect_visible(rect, node_rect.expand(10.0)) {
                continue;
            }

            let record = &self.graph.nodes[node];
            let class = node_class(&focus, node);
            let style = node_style(class, guard);
            let tone = tone_style(record.tone);

            let mut opacity = style.opacity;
            if entrance {
                let delay = (order as f64 * ENTRANCE_STAGGER_SECS).min(ENTRANCE_STAGGER_CAP_SECS);
                let progress = ((now - loaded_at - delay) / ENTRANCE_SECS).clamp(0.0, 1.0) as f32;
                animating |= progress < 1.0;
                opacity *= progress;
            }

            let selection_mix = ui.ctx().animate_bool(
                ui.make_persistent_id(("node-selection", record.id.as_str())),
                class == NodeClass::Current,
            );
            animating |= selection_mix > 0.0 && selection_mix < 1.0;

            let scale = camera.scale;
            let corner = NODE_CORNER * scale;
            // opaque fill so occluded edges stay hidden behind the box
            painter.rect_filled(node_rect, corner, blend_color(CANVAS_COLOR, tone.fill, opacity.max(0.15)));

            let accent = Rect::from_min_max(
                node_rect.left_top() + vec2(4.0, 4.0) * scale,
                Pos2::new(node_rect.left() + 7.0 * scale, node_rect.bottom() - 4.0 * scale),
            );
            painter.rect_filled(accent, 1.5 * scale, with_opacity(kind_accent(record.kind), opacity));

            let border = blend_color(tone.border, SELECTED_COLOR, selection_mix);
            let border_width = if search_matches.contains(&node) {
                style.border_width + 1.0
            } else {
                style.border_width
            };
            painter.rect_stroke(
                node_rect,
                corner,
                Stroke::new(border_width * scale, with_opacity(border, opacity)),
                StrokeKind::Inside,
            );

            if style.halo {
                let spread = 4.0 + (1.0 - selection_mix) * 4.0;
                painter.rect_stroke(
                    node_rect.expand(spread * scale),
                    corner + spread,
                    Stroke::new(1.5, with_opacity(SELECTED_COLOR, 0.55 * opacity)),
                    StrokeKind::Outside,
                );
            }

            if search_matches.contains(&node) {
                painter.rect_stroke(
                    node_rect.expand(2.0 * scale),
                    corner + 2.0,
                    Stroke::new(1.2, with_opacity(Color32::from_rgb(103, 196, 255), opacity)),
                    StrokeKind::Outside,
                );
            }

            painter.text(
                node_rect.center() + vec2(1.5 * scale, 0.0),
                Align2::CENTER_CENTER,
                truncate_chars(&record.title, TITLE_CHARS),
                FontId::proportional(NODE_FONT_PX * scale),
                with_opacity(tone.text, opacity),
            );
        }

        for draw in edge_draws.iter().filter(|draw| draw.layer == EdgeLayer::Overlay) {
            animating |= paint_edge(&painter, rect, camera, draw, now);
        }

        let path_edges = root_path_edges(&self.index, &focus.root_path);
        let candidates = path_edges.iter().filter_map(|&edge| {
            let draw = edge_draws.iter().find(|draw| draw.edge == edge)?;
            Some((edge, &draw.curve, self.graph.edges[edge].label.as_str()))
        });
        for placement in place_path_labels(candidates, guard, &self.config, LABEL_FONT_PX) {
            let anchor = camera.canvas_to_screen(rect, placement.anchor);
            let plate = Rect::from_center_size(anchor, placement.plate);
            painter.rect_filled(plate, 4.0, Color32::from_rgba_unmultiplied(24, 28, 36, 228));
            painter.rect_stroke(
                plate,
                4.0,
                Stroke::new(1.0, tier_color(EdgeTier::Path).gamma_multiply(0.7)),
                StrokeKind::Inside,
            );
            painter.text(
                anchor,
                Align2::CENTER_CENTER,
                &placement.text,
                FontId::proportional(LABEL_FONT_PX),
                Color32::from_gray(236),
            );
        }

        if let Some(node) = hovered {
            let record = &self.graph.nodes[node];
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                format!(
                    "{}  |  {}  |  links {}",
                    record.title,
                    record.kind.label(),
                    self.index.edges_touching(node).len()
                ),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        if animating {
            ui.ctx().request_repaint();
        }

        if response.clicked_by(egui::PointerButton::Primary)
            && let Some(node) = hovered
        {
            let id = self.graph.nodes[node].id.clone();
            self.select_id(&id);
        }
    }
}
