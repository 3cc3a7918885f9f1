use eframe::egui::{self, RichText, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::content::{NodeKind, NodeRecord};

use super::super::{SearchMatchCache, ViewModel};

const MAX_SEARCH_ROWS: usize = 12;

fn fuzzy_match_score(matcher: &SkimMatcherV2, node: &NodeRecord, query: &str) -> Option<i64> {
    std::iter::once(node.title.as_str())
        .chain(node.keywords.iter().map(String::as_str))
        .filter_map(|text| {
            matcher
                .fuzzy_match(text, query)
                .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
        })
        .max()
}

impl ViewModel {
    /// Nodes matching the search box, best score first.
    pub(in crate::app) fn search_matches(&mut self) -> Vec<usize> {
        let query = self.search.trim();
        if query.is_empty() {
            return Vec::new();
        }

        if let Some(cached) = &self.search_match_cache
            && cached.query == query
        {
            return cached.matches.clone();
        }

        let matcher = SkimMatcherV2::default();
        let mut scored = self
            .graph
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(node, record)| {
                fuzzy_match_score(&matcher, record, query).map(|score| (node, score))
            })
            .collect::<Vec<_>>();
        scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        let matches = scored.into_iter().map(|(node, _)| node).collect::<Vec<_>>();

        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            matches: matches.clone(),
        });
        matches
    }

    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        let mut filters_changed = false;
        let kinds = self.graph.kinds_present();
        let selected_text = self.kind_filter.map_or("all kinds", NodeKind::label);
        egui::ComboBox::from_id_salt("kind_filter")
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                filters_changed |= ui
                    .selectable_value(&mut self.kind_filter, None, "all kinds")
                    .changed();
                for kind in kinds {
                    filters_changed |= ui
                        .selectable_value(&mut self.kind_filter, Some(kind), kind.label())
                        .changed();
                }
            });

        filters_changed |= ui
            .checkbox(&mut self.only_related, "Only nodes related to selection")
            .on_hover_text("Hide everything that is not a direct neighbor of the selected node.")
            .changed();

        if filters_changed {
            self.graph_dirty = true;
            self.snapshot_dirty = true;
            tracing::debug!(
                kind = ?self.kind_filter,
                only_related = self.only_related,
                "filters changed"
            );
        }

        ui.separator();
        ui.label("Search (title or keyword)")
            .on_hover_text("Fuzzy-highlight matching nodes, then click a result to select it.");
        ui.text_edit_singleline(&mut self.search);

        let matches = self.search_matches();
        let mut pending_selection = None;
        if !self.search.trim().is_empty() {
            if matches.is_empty() {
                ui.label(RichText::new("No matches.").weak());
            }
            for &node in matches.iter().take(MAX_SEARCH_ROWS) {
                let record = &self.graph.nodes[node];
                let hidden = !self.is_visible(node);
                let text = if hidden {
                    format!("{}  (filtered out)", record.title)
                } else {
                    record.title.clone()
                };
                if ui.link(text).on_hover_text(record.id.as_str()).clicked() {
                    pending_selection = Some(record.id.clone());
                }
            }
            if matches.len() > MAX_SEARCH_ROWS {
                ui.label(format!("… and {} more", matches.len() - MAX_SEARCH_ROWS));
            }
        }

        ui.separator();
        let now = ui.input(|input| input.time);
        ui.horizontal(|ui| {
            if ui
                .button("Reset view")
                .on_hover_text("Return to the default pan and zoom (0).")
                .clicked()
            {
                self.reset_camera(now);
            }
            let center = ui.add_enabled(self.selected.is_some(), egui::Button::new("Center selection"));
            if center.on_hover_text("Bring the selected node to the middle (C).").clicked()
                && let Some(id) = self.selected.clone()
            {
                self.request_center(id, true);
            }
        });

        if ui
            .checkbox(&mut self.reduced_motion, "Reduced motion")
            .on_hover_text("Jump the camera instead of animating it.")
            .changed()
        {
            self.viewport.cancel_animation();
        }

        ui.separator();
        let camera = self.viewport.state();
        ui.label(format!("Zoom: {:.0}%", camera.scale * 100.0));
        ui.label(format!(
            "Visible: {} of {} nodes, {} of {} edges",
            self.visible_node_count,
            self.graph.node_count(),
            self.visible_edge_count,
            self.graph.edge_count()
        ));
        let density = match (self.last_guard.heavy, self.last_guard.crowded) {
            (true, _) => "heavy",
            (false, true) => "crowded",
            (false, false) => "normal",
        };
        ui.label(format!("Density: {density}"));
        ui.add_space(6.0);
        ui.small("Drag to pan, Ctrl+wheel or pinch to zoom, arrows to step through nodes, Home for the anchor.");

        if let Some(id) = pending_selection {
            self.select_id(&id);
        }
    }
}
