use eframe::egui::{self, Key, Pos2, Rect, Ui};

use super::super::viewport::{AnimationRequest, ViewportState};
use super::super::{CenterRequest, ViewModel};

impl ViewModel {
    pub(in crate::app) fn animation_request(&self) -> AnimationRequest {
        AnimationRequest {
            duration_secs: self.config.animation_duration_secs(),
            reduced_motion: self.reduced_motion,
        }
    }

    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let (scroll, modifier, pinch) = ui.input(|input| {
            (
                input.raw_scroll_delta.y,
                input.modifiers.ctrl || input.modifiers.command,
                input.zoom_delta(),
            )
        });
        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let cursor = pointer - rect.min;

        // egui reports wheel-up as positive, the zoom rate expects the opposite
        if modifier && scroll.abs() > f32::EPSILON {
            self.viewport.zoom_by_wheel(-scroll, cursor);
        } else if (pinch - 1.0).abs() > f32::EPSILON {
            self.viewport.zoom_by_factor(pinch, cursor);
        }
    }

    pub(in crate::app) fn handle_graph_pan(&mut self, response: &egui::Response, over_node: bool) {
        let pointer = response.interact_pointer_pos();

        if response.drag_started()
            && let Some(pointer) = pointer
        {
            let background_drag = response.dragged_by(egui::PointerButton::Primary) && !over_node;
            let alternate_drag = response.dragged_by(egui::PointerButton::Secondary)
                || response.dragged_by(egui::PointerButton::Middle);
            if (background_drag || alternate_drag) && !self.viewport.begin_pan(pointer) {
                tracing::trace!("pan already active");
            }
        }

        if response.dragged()
            && let Some(pointer) = pointer
        {
            self.viewport.update_pan(pointer);
        }

        if response.drag_stopped() {
            self.viewport.end_pan();
        }
    }

    /// Screen rect of a node box under `camera`.
    pub(in crate::app) fn node_screen_rect(
        &self,
        rect: Rect,
        camera: ViewportState,
        node: usize,
    ) -> Rect {
        let Some(record) = self.graph.nodes.get(node) else {
            return Rect::NOTHING;
        };

        let center = camera.canvas_to_screen(rect, Pos2::new(record.pos.x, record.pos.y));
        Rect::from_center_size(center, self.boxes.pixel_size(node) * camera.scale)
    }

    /// Topmost visible node under the pointer. Nodes are painted in visible
    /// order, so the last hit wins.
    pub(in crate::app) fn hovered_node_at(&self, ui: &Ui, rect: Rect) -> Option<usize> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        if !rect.contains(pointer) {
            return None;
        }

        let cache = self.graph_cache.as_ref()?;
        let camera = self.viewport.state();
        cache
            .visible_nodes
            .iter()
            .rev()
            .copied()
            .find(|&node| self.node_screen_rect(rect, camera, node).contains(pointer))
    }

    pub(in crate::app) fn handle_keyboard(&mut self, ui: &Ui, now: f64) {
        if ui.ctx().memory(|memory| memory.focused()).is_some() {
            return;
        }

        let (next, previous, home, reset, center) = ui.input(|input| {
            (
                input.key_pressed(Key::ArrowRight) || input.key_pressed(Key::ArrowDown),
                input.key_pressed(Key::ArrowLeft) || input.key_pressed(Key::ArrowUp),
                input.key_pressed(Key::Home),
                input.key_pressed(Key::Num0),
                input.key_pressed(Key::C),
            )
        });

        if next || previous {
            self.cycle_selection(if next { 1 } else { -1 });
        }
        if home && let Some(anchor) = self.index.anchor() {
            let id = self.graph.nodes[anchor].id.clone();
            self.select_id(&id);
        }
        if reset {
            self.reset_camera(now);
        }
        if center && let Some(id) = self.selected.clone() {
            self.request_center(id, true);
        }
    }

    fn cycle_selection(&mut self, step: isize) {
        let Some(cache) = self.graph_cache.as_ref() else {
            return;
        };
        let visible = &cache.visible_nodes;
        if visible.is_empty() {
            return;
        }

        let position = self
            .selected_index()
            .and_then(|node| visible.iter().position(|candidate| *candidate == node));
        let next = match position {
            Some(position) => (position as isize + step).rem_euclid(visible.len() as isize) as usize,
            None if step < 0 => visible.len() - 1,
            None => 0,
        };

        let id = self.graph.nodes[visible[next]].id.clone();
        self.select_id(&id);
    }

    pub(in crate::app) fn reset_camera(&mut self, now: f64) {
        let request = self.animation_request();
        let token = self.viewport.reset(now, request);
        tracing::debug!(token, "camera reset");
    }

    pub(in crate::app) fn request_center(&mut self, id: String, force: bool) {
        self.pending_center = Some(CenterRequest { id, force });
    }

    /// Runs a queued center request once the viewport size is known.
    pub(in crate::app) fn apply_pending_center(&mut self, rect: Rect, now: f64) {
        let Some(request) = self.pending_center.take() else {
            return;
        };
        let Some(pos) = self
            .graph
            .node_by_id(&request.id)
            .map(|record| Pos2::new(record.pos.x, record.pos.y))
        else {
            return;
        };

        let animation = self.animation_request();
        let moved = self.viewport.ensure_visible(
            pos,
            rect.size(),
            self.config.view_margin_px,
            request.force,
            now,
            animation,
        );
        if moved {
            tracing::debug!(id = %request.id, force = request.force, "centering node");
        }
    }

    /// External entry point: selects `id` and brings it into view. Unknown ids
    /// are ignored.
    pub(in crate::app) fn select_id(&mut self, id: &str) {
        if !self.graph.contains(id) {
            tracing::debug!(id, "ignoring selection of unknown node");
            return;
        }

        self.set_selected(Some(id.to_owned()));
    }

    pub(in crate::app) fn set_selected(&mut self, selected: Option<String>) {
        if self.selected == selected {
            if let Some(id) = selected {
                self.request_center(id, false);
            }
            return;
        }

        self.selected = selected;
        self.snapshot_dirty = true;
        if self.only_related {
            self.graph_dirty = true;
        }
        if let Some(id) = self.selected.clone() {
            self.request_center(id, false);
        }
    }
}
