use std::path::PathBuf;

use clap::Parser;
use relation_atlas::app::{LaunchOptions, RelationAtlasApp};
use relation_atlas::config::EngineConfig;
use relation_atlas::content::{ContentSource, JsonFileStore, SelectionSnapshot, SnapshotStore};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Content document (JSON). The bundled demo graph is used when omitted.
    #[arg(long)]
    content: Option<PathBuf>,
    /// Override the document's anchor node.
    #[arg(long)]
    anchor: Option<String>,
    /// Node to select on start.
    #[arg(long)]
    select: Option<String>,
    /// Engine tuning (TOML).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Where the selection snapshot is read from and saved to.
    #[arg(long)]
    state: Option<PathBuf>,
    #[arg(long)]
    reduced_motion: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config(path: Option<&PathBuf>) -> EngineConfig {
    let Some(path) = path else {
        return EngineConfig::default();
    };

    match EngineConfig::load(path) {
        Ok(config) => config,
        Err(error) => {
            tracing::warn!(error = %format!("{error:#}"), "using default engine config");
            EngineConfig::default()
        }
    }
}

fn load_snapshot(store: Option<&dyn SnapshotStore>) -> SelectionSnapshot {
    let Some(store) = store else {
        return SelectionSnapshot::default();
    };

    match store.load() {
        Ok(snapshot) => snapshot.unwrap_or_default(),
        Err(error) => {
            tracing::warn!(error = %format!("{error:#}"), "ignoring unreadable selection snapshot");
            SelectionSnapshot::default()
        }
    }
}

fn main() -> eframe::Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = load_config(args.config.as_ref());
    config.reduced_motion |= args.reduced_motion;

    let store = args
        .state
        .map(|path| Box::new(JsonFileStore::new(path)) as Box<dyn SnapshotStore>);
    let mut initial = load_snapshot(store.as_deref());
    if let Some(select) = args.select {
        initial.selected_id = Some(select);
    }

    let source = args.content.map_or(ContentSource::Bundled, ContentSource::File);
    tracing::info!(source = %source.describe(), "starting relation atlas");

    let launch = LaunchOptions {
        source,
        anchor_override: args.anchor,
        config,
        initial,
        store,
    };
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "relation-atlas",
        options,
        Box::new(move |cc| Ok(Box::new(RelationAtlasApp::new(cc, launch)))),
    )
}
