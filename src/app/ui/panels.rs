use eframe::egui::{self, Align, Context, Layout, RichText};

use crate::config::EngineConfig;
use crate::content::{RelationGraph, SelectionSnapshot};

use super::super::graph::{BoxMeasurements, RelationIndex};
use super::super::highlight::DensityGuard;
use super::super::hover::HoverBuffer;
use super::super::viewport::ViewportController;
use super::super::{CenterRequest, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(
        graph: RelationGraph,
        config: EngineConfig,
        initial: &SelectionSnapshot,
        source_label: String,
    ) -> Self {
        let index = RelationIndex::build(&graph);
        let selected = initial
            .selected_id
            .as_deref()
            .filter(|id| graph.contains(id))
            .or_else(|| Some(graph.anchor_id.as_str()).filter(|id| graph.contains(id)))
            .map(str::to_owned);
        if let Some(requested) = &initial.selected_id
            && selected.as_ref() != Some(requested)
        {
            tracing::warn!(id = %requested, "initial selection not found, using anchor");
        }

        let pending_center = selected.clone().map(|id| CenterRequest { id, force: false });
        let reduced_motion = config.reduced_motion;

        Self {
            index,
            selected,
            hover: HoverBuffer::default(),
            kind_filter: initial.kind_filter,
            only_related: initial.only_related,
            search: String::new(),
            reduced_motion,
            viewport: ViewportController::default(),
            boxes: BoxMeasurements::default(),
            graph_dirty: true,
            render_graph_revision: 0,
            graph_cache: None,
            focus_cache: None,
            search_match_cache: None,
            pending_center,
            last_guard: DensityGuard::default(),
            loaded_at: None,
            snapshot_dirty: false,
            visible_node_count: 0,
            visible_edge_count: 0,
            graph,
            config,
            source_label,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        if self.graph_dirty {
            self.rebuild_render_graph();
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("relation-atlas");
                    ui.separator();
                    ui.label(format!("source: {}", self.source_label));
                    if let Some(anchor) = self.graph.node_by_id(&self.graph.anchor_id) {
                        ui.label(format!("anchor: {}", anchor.title));
                    }
                    ui.label(format!("nodes: {}", self.graph.node_count()));
                    ui.label(format!("edges: {}", self.graph.edge_count()));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload content"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!(
                            "visible {} nodes / {} edges",
                            self.visible_node_count, self.visible_edge_count
                        ));
                        if self.last_guard.heavy {
                            ui.label(RichText::new("heavy").color(egui::Color32::from_rgb(241, 146, 94)))
                                .on_hover_text("Glow, flow, labels and entrance fades are off.");
                        } else if self.last_guard.crowded {
                            ui.label("crowded")
                                .on_hover_text("Path labels are hidden around busy nodes.");
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui));
    }

    pub(in crate::app) fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            selected_id: self.selected.clone(),
            kind_filter: self.kind_filter,
            only_related: self.only_related,
        }
    }

    /// The current snapshot, once per change.
    pub(in crate::app) fn take_snapshot_change(&mut self) -> Option<SelectionSnapshot> {
        if !std::mem::take(&mut self.snapshot_dirty) {
            return None;
        }
        Some(self.snapshot())
    }
}
