use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};

use crate::config::EngineConfig;
use crate::content::{
    ContentSource, NodeKind, RelationGraph, SelectionSnapshot, SnapshotStore, load_relation_graph,
};

pub mod edges;
pub mod graph;
pub mod highlight;
pub mod hover;
pub mod labels;
mod render_utils;
mod ui;
pub mod viewport;

use self::graph::{BoxMeasurements, RelationIndex};
use self::highlight::{DensityGuard, FocusState};
use self::hover::HoverBuffer;
use self::viewport::ViewportController;

pub struct LaunchOptions {
    pub source: ContentSource,
    pub anchor_override: Option<String>,
    pub config: EngineConfig,
    pub initial: SelectionSnapshot,
    pub store: Option<Box<dyn SnapshotStore>>,
}

pub struct RelationAtlasApp {
    source: ContentSource,
    anchor_override: Option<String>,
    config: EngineConfig,
    initial: SelectionSnapshot,
    store: Option<Box<dyn SnapshotStore>>,
    state: AppState,
    reload_rx: Option<Receiver<Result<RelationGraph, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<RelationGraph, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    graph: RelationGraph,
    index: RelationIndex,
    config: EngineConfig,
    source_label: String,
    selected: Option<String>,
    hover: HoverBuffer,
    kind_filter: Option<NodeKind>,
    only_related: bool,
    search: String,
    reduced_motion: bool,
    viewport: ViewportController,
    boxes: BoxMeasurements,
    graph_dirty: bool,
    render_graph_revision: u64,
    graph_cache: Option<RenderGraph>,
    focus_cache: Option<FocusCache>,
    search_match_cache: Option<SearchMatchCache>,
    pending_center: Option<CenterRequest>,
    last_guard: DensityGuard,
    loaded_at: Option<f64>,
    snapshot_dirty: bool,
    visible_node_count: usize,
    visible_edge_count: usize,
}

/// Nodes and edges that pass the current kind and related-only filters.
struct RenderGraph {
    visible_nodes: Vec<usize>,
    visible_mask: Vec<bool>,
    /// Positions into `RelationIndex::resolved_edges`.
    visible_edges: Vec<usize>,
}

struct FocusCache {
    key: FocusCacheKey,
    focus: Arc<FocusState>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FocusCacheKey {
    selected: Option<usize>,
    hovered: Option<usize>,
}

struct SearchMatchCache {
    query: String,
    matches: Vec<usize>,
}

#[derive(Clone, Debug)]
struct CenterRequest {
    id: String,
    force: bool,
}

impl RelationAtlasApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, options: LaunchOptions) -> Self {
        let state = Self::start_load(options.source.clone(), options.anchor_override.clone());
        Self {
            source: options.source,
            anchor_override: options.anchor_override,
            config: options.config,
            initial: options.initial,
            store: options.store,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(
        source: ContentSource,
        anchor_override: Option<String>,
    ) -> Receiver<Result<RelationGraph, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_relation_graph(&source, anchor_override.as_deref())
                .map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(source: ContentSource, anchor_override: Option<String>) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(source, anchor_override),
        }
    }

    fn ready_state(&self, graph: RelationGraph) -> AppState {
        AppState::Ready(Box::new(ViewModel::new(
            graph,
            self.config.clone(),
            &self.initial,
            self.source.describe(),
        )))
    }

    fn loaded_state(&self, result: Result<RelationGraph, String>) -> AppState {
        match result {
            Ok(graph) => self.ready_state(graph),
            Err(error) => {
                tracing::error!(%error, "failed to load relation graph");
                AppState::Error(error)
            }
        }
    }

    fn persist(&mut self, snapshot: &SelectionSnapshot) {
        self.initial = snapshot.clone();
        let Some(store) = &self.store else {
            return;
        };

        if let Err(error) = store.save(snapshot) {
            tracing::warn!(error = %format!("{error:#}"), "failed to save selection snapshot");
        }
    }
}

impl eframe::App for RelationAtlasApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;
        let mut snapshot = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(result);
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading relation graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                let mut retry = false;
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load relation graph");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    retry = ui.button("Retry").clicked();
                });
                if retry {
                    self.state = Self::start_load(self.source.clone(), self.anchor_override.clone());
                    return;
                }
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut reload_requested, is_reloading);
                snapshot = model.take_snapshot_change();

                if reload_requested && self.reload_rx.is_none() {
                    self.initial = model.snapshot();
                    self.reload_rx = Some(Self::spawn_load(
                        self.source.clone(),
                        self.anchor_override.clone(),
                    ));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => transition = Some(result),
                        Err(TryRecvError::Empty) => self.reload_rx = Some(rx),
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(Err("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(snapshot) = snapshot {
            self.persist(&snapshot);
        }

        if let Some(result) = transition {
            self.reload_rx = None;
            self.state = self.loaded_state(result);
        }
    }
}
