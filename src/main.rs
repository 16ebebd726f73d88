mod app;
mod config;
mod event;
mod ideas;
mod layout;
mod persist;
mod theme;
mod tree;
mod ui;

use anyhow::{Context, Result};
use app::ArbolApp;
use chrono::Utc;
use clap::Parser;
use config::Config;
use eframe::egui;
use ideas::{IdeaCatalog, IdeaGenerator};
use layout::LayoutKind;
use persist::TreeStore;
use std::path::PathBuf;
use std::sync::mpsc;
use theme::{NodePalette, Theme};
use tracing::{info, warn};
use tree::LifeTree;
use ui::NoticeLevel;

#[derive(Parser, Debug)]
#[command(name = "arbol", about = "An editable life-goals tree", version)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Directory holding the saved tree
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
    /// Layout shown at startup
    #[arg(long, value_enum)]
    layout: Option<LayoutKind>,
    /// Ignore the saved tree and start from the built-in one
    #[arg(long)]
    reset: bool,
    /// Write a dated export into DIR and exit without opening a window
    #[arg(long, value_name = "DIR")]
    export: Option<PathBuf>,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arbol=info".into()),
        )
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match cli.config.clone().or_else(Config::default_path) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    if let Some(layout) = cli.layout {
        config.layout = layout;
    }
    Ok(config)
}

/// Stored tree over the built-in one. A broken file is reported, not fatal.
fn load_tree(store: &TreeStore, reset: bool) -> (LifeTree, Option<(NoticeLevel, String)>) {
    let mut tree = LifeTree::default();
    if reset {
        info!("starting from the built-in tree");
        return (tree, None);
    }
    match store.load() {
        Ok(Some(saved)) => {
            let note = saved.last_saved.map(|at| {
                (
                    NoticeLevel::Info,
                    format!("Tree loaded, last saved {}", at.format("%Y-%m-%d %H:%M")),
                )
            });
            saved.apply_to(&mut tree);
            (tree, note)
        }
        Ok(None) => (tree, None),
        Err(err) => {
            warn!(error = %err, "stored tree unreadable, using the built-in tree");
            (
                tree,
                Some((NoticeLevel::Error, format!("Could not load saved tree: {err}"))),
            )
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let store = TreeStore::new(config.resolved_data_dir());
    let (tree, note) = load_tree(&store, cli.reset);

    if let Some(dir) = &cli.export {
        let path = store
            .export(&tree, dir, Utc::now())
            .context("exporting the tree")?;
        println!("{}", path.display());
        return Ok(());
    }

    let (tx, rx) = mpsc::channel();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("arbol-runtime")
        .build()?;

    let catalog = IdeaCatalog::builtin().context("parsing the built-in idea catalog")?;
    let generator = IdeaGenerator::new(catalog, tx, runtime.handle().clone(), config.idea_delay());
    let theme = Theme::new(NodePalette::from_config(&config.palette));
    let window_size = [config.canvas.width, config.canvas.height];

    let mut app = ArbolApp::new(rx, generator, store, config, theme.clone(), tree);
    if let Some((level, message)) = note {
        app.notify(level, message);
    }
    let _runtime = runtime;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(window_size)
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    info!("opening window");
    eframe::run_native(
        "Life tree",
        native_options,
        Box::new(move |creation_context| {
            theme.apply_visuals(&creation_context.egui_ctx);
            Ok(Box::new(app))
        }),
    )
    .map_err(|err| anyhow::anyhow!("window failed: {err}"))?;

    Ok(())
}
