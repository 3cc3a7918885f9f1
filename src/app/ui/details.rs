use eframe::egui::{self, RichText, Ui};

use crate::util::truncate_chars;

use super::super::ViewModel;
use super::super::highlight::shortest_path_ids;
use super::super::render_utils::kind_accent;

const MAX_BREADCRUMBS: usize = 10;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let Some(selected_id) = self.selected.clone() else {
            ui.label("Select a node on the canvas or from the search results.");
            return;
        };

        let Some(node) = self.graph.node_by_id(&selected_id) else {
            ui.label("Selected node no longer exists in the loaded content.");
            return;
        };

        let mut pending_selection = None;

        ui.label(RichText::new(node.title.as_str()).strong().size(17.0));
        ui.horizontal(|ui| {
            ui.label(RichText::new(node.kind.label()).color(kind_accent(node.kind)));
            ui.small(node.id.as_str());
        });
        ui.add_space(6.0);

        if !node.summary.is_empty() {
            ui.label(node.summary.as_str());
        }
        if !node.detail.is_empty() {
            ui.add_space(4.0);
            ui.label(RichText::new(node.detail.as_str()).weak());
        }
        if let Some(doc) = &node.doc {
            ui.label(format!("Document: {doc}"));
        }
        if let Some(event) = &node.event {
            ui.label(format!("Timeline event: {event}"));
        }
        if !node.keywords.is_empty() {
            ui.label(format!("Keywords: {}", node.keywords.join(", ")));
        }

        ui.separator();
        ui.label(RichText::new("Path to anchor").strong());
        let ids = self
            .graph
            .nodes
            .iter()
            .map(|record| record.id.as_str())
            .collect::<Vec<_>>();
        let path = shortest_path_ids(&self.index, &ids, &selected_id, &self.graph.anchor_id);
        if path.is_empty() {
            ui.label("Not connected to the anchor.");
        } else if path.len() == 1 {
            ui.label("This is the anchor.");
        } else {
            ui.horizontal_wrapped(|ui| {
                let elided = path.len() > MAX_BREADCRUMBS;
                for (position, id) in path.iter().enumerate() {
                    if elided && position == MAX_BREADCRUMBS - 2 {
                        ui.label("…");
                        ui.label("›");
                    }
                    if elided && position >= MAX_BREADCRUMBS - 2 && position + 1 < path.len() {
                        continue;
                    }

                    let title = self
                        .graph
                        .node_by_id(id)
                        .map_or(id.as_str(), |record| record.title.as_str());
                    if ui.link(truncate_chars(title, 18)).clicked() {
                        pending_selection = Some(id.clone());
                    }
                    if position + 1 < path.len() {
                        ui.label("›");
                    }
                }
            });
        }

        ui.separator();
        let touching = self.index.edges_touching_id(&self.graph, &selected_id);
        ui.label(RichText::new(format!("Connections ({})", touching.len())).strong());
        if touching.is_empty() {
            ui.label("No edges touch this node.");
        } else {
            egui::ScrollArea::vertical()
                .id_salt("connections_scroll")
                .max_height(320.0)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    for edge in touching {
                        let Some(other) = edge.other_end(&selected_id) else {
                            continue;
                        };
                        let other_title = self
                            .graph
                            .node_by_id(other)
                            .map_or(other, |record| record.title.as_str());
                        let direction = if edge.from == selected_id { "→" } else { "←" };
                        let text = if edge.label.is_empty() {
                            format!("{direction} {other_title}")
                        } else {
                            format!("{direction} {other_title}  ({})", edge.label)
                        };

                        if ui.link(text).on_hover_text(edge.id.as_str()).clicked() {
                            pending_selection = Some(other.to_owned());
                        }
                    }
                });
        }

        if let Some(id) = pending_selection {
            self.select_id(&id);
        }
    }
}
