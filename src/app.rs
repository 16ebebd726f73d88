use crate::config::Config;
use crate::event::AppEvent;
use crate::ideas::IdeaGenerator;
use crate::layout::{self, LayoutKind, LayoutOptions, TreeLayout};
use crate::persist::TreeStore;
use crate::theme::Theme;
use crate::tree::{LifeTree, NodePath};
use crate::ui::canvas::{self, CanvasView};
use crate::ui::mode::{ClickOutcome, SubmitError};
use crate::ui::panel::{self, PanelAction};
use crate::ui::{Interaction, Mode, NoticeLevel, Notices, Panel, Viewport};
use chrono::{DateTime, Local, Utc};
use eframe::egui::{self, RichText, ScrollArea};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct ArbolApp {
    rx: Receiver<AppEvent>,
    generator: IdeaGenerator,
    store: TreeStore,
    export_dir: PathBuf,
    config: Config,
    theme: Theme,
    tree: LifeTree,
    layout_kind: LayoutKind,
    layout: TreeLayout,
    collapsed: HashSet<NodePath>,
    dim_secondary: bool,
    interaction: Interaction,
    viewport: Option<Viewport>,
    canvas_size: egui::Vec2,
    notices: Notices,
    last_saved: Option<DateTime<Local>>,
    now: f64,
}

impl ArbolApp {
    pub fn new(
        rx: Receiver<AppEvent>,
        generator: IdeaGenerator,
        store: TreeStore,
        config: Config,
        theme: Theme,
        tree: LifeTree,
    ) -> Self {
        let layout_kind = config.layout;
        let mut app = Self {
            rx,
            generator,
            store,
            export_dir: config.resolved_export_dir(),
            notices: Notices::new(config.notice_lifetime()),
            theme,
            tree,
            layout_kind,
            layout: TreeLayout {
                kind: layout_kind,
                nodes: Vec::new(),
                links: Vec::new(),
                node_radius: config.nodes.radius,
            },
            collapsed: HashSet::new(),
            dim_secondary: false,
            interaction: Interaction::default(),
            viewport: None,
            canvas_size: egui::vec2(config.canvas.width, config.canvas.height),
            last_saved: None,
            now: 0.0,
            config,
        };
        app.set_layout(layout_kind);
        app
    }

    pub fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(level, message, self.now);
    }

    fn relayout(&mut self) {
        let options = LayoutOptions {
            canvas_width: self.config.canvas.width,
            node_radius: self.config.nodes.radius,
            collapsed: self.collapsed.clone(),
        };
        self.layout = TreeLayout::build(self.layout_kind, &self.tree, &options);
        self.interaction.forget_missing(&self.tree);
    }

    fn set_layout(&mut self, kind: LayoutKind) {
        self.layout_kind = kind;
        self.collapsed = if kind.supports_collapse() {
            layout::collapse_below_primaries(&self.tree)
        } else {
            HashSet::new()
        };
        info!(layout = kind.label(), "layout selected");
        self.relayout();
    }

    fn expand_all(&mut self) {
        self.dim_secondary = false;
        self.collapsed.clear();
        self.relayout();
    }

    fn collapse(&mut self) {
        self.dim_secondary = true;
        if self.layout_kind.supports_collapse() {
            self.collapsed = layout::collapse_below_primaries(&self.tree);
        }
        self.relayout();
    }

    fn toggle_collapsed(&mut self, path: NodePath) {
        let has_children = self
            .tree
            .get(path)
            .is_some_and(|node| !node.children.is_empty());
        if path == NodePath::Trunk || !has_children {
            return;
        }
        if !self.collapsed.remove(&path) {
            self.collapsed.insert(path);
        }
        self.relayout();
    }

    /// Persists the whole tree after a mutation and refreshes the layout.
    fn tree_changed(&mut self) {
        self.collapsed.retain(|path| self.tree.get(*path).is_some());
        self.relayout();
        match self.store.save(&self.tree, Utc::now()) {
            Ok(()) => self.last_saved = Some(Local::now()),
            Err(err) => {
                warn!(error = %err, "failed to persist tree");
                self.notify(NoticeLevel::Error, format!("Could not save: {err}"));
            }
        }
    }

    fn save_and_export(&mut self) {
        self.tree_changed();
        match self.store.export(&self.tree, &self.export_dir, Utc::now()) {
            Ok(path) => self.notify(
                NoticeLevel::Success,
                format!("Tree saved and exported to {}", path.display()),
            ),
            Err(err) => {
                warn!(error = %err, "export failed");
                self.notify(NoticeLevel::Error, format!("Export failed: {err}"));
            }
        }
    }

    fn handle_click(&mut self, path: NodePath) {
        match self.interaction.click(&self.tree, path) {
            ClickOutcome::Inspected(path) => {
                if self.layout_kind.supports_collapse() {
                    self.toggle_collapsed(path);
                }
            }
            ClickOutcome::EditOpened(path) => debug!(%path, "editing node"),
            ClickOutcome::ParentSelected { name, .. } => {
                self.notify(NoticeLevel::Success, format!("Parent selected: {name}"));
            }
            ClickOutcome::Rejected(reason) => self.notify(NoticeLevel::Warning, reason),
        }
    }

    fn start_or_cancel_create(&mut self) {
        if self.interaction.mode.is_create() {
            self.interaction.cancel_create();
            self.notify(NoticeLevel::Warning, "Creation cancelled");
        } else {
            self.interaction.start_create();
            self.notify(NoticeLevel::Info, "Select the parent node for the new node");
        }
    }

    fn apply_action(&mut self, action: PanelAction, ctx: Option<&egui::Context>) {
        match action {
            PanelAction::Close => {
                if self.interaction.mode.is_create() {
                    self.interaction.cancel_create();
                } else {
                    self.interaction.close_panel();
                }
            }
            PanelAction::SaveEdit => match self.interaction.submit_edit(&mut self.tree) {
                Ok(_) => {
                    self.tree_changed();
                    self.notify(NoticeLevel::Success, "Node updated");
                }
                Err(err) => self.submit_failed(err),
            },
            PanelAction::RequestDelete => self.interaction.request_delete(),
            PanelAction::ConfirmDelete => {
                let target = match &self.interaction.panel {
                    Panel::Edit(edit) => Some(edit.path),
                    _ => None,
                };
                match self.interaction.delete_edited(&mut self.tree) {
                    Ok(removed) => {
                        if let Some(target) = target {
                            self.collapsed = self
                                .collapsed
                                .iter()
                                .filter_map(|path| path.after_removal(target))
                                .collect();
                        }
                        self.tree_changed();
                        self.notify(NoticeLevel::Warning, format!("Deleted \"{}\"", removed.name));
                    }
                    Err(err) => self.submit_failed(err),
                }
            }
            PanelAction::SubmitCreate => {
                let hint = match &self.interaction.panel {
                    Panel::Create(create) => create.form.description_hint(),
                    _ => None,
                };
                match self.interaction.submit_create(&mut self.tree) {
                    Ok(path) => {
                        // A new child must show even under a collapsed parent.
                        if let Some(parent) = path.parent() {
                            self.collapsed.remove(&parent);
                        }
                        self.tree_changed();
                        let name = self
                            .tree
                            .get(path)
                            .map(|node| node.name.clone())
                            .unwrap_or_default();
                        self.notify(NoticeLevel::Success, format!("\"{name}\" created"));
                        if let Some(hint) = hint {
                            self.notify(NoticeLevel::Warning, hint);
                        }
                    }
                    Err(err) => self.submit_failed(err),
                }
            }
            PanelAction::CancelCreate => {
                self.interaction.cancel_create();
                self.notify(NoticeLevel::Warning, "Creation cancelled");
            }
            PanelAction::Generate => self.request_ideas(ctx),
            PanelAction::AcceptIdeas => match self.interaction.accept_ideas(&mut self.tree) {
                Ok(added) => {
                    self.tree_changed();
                    self.notify(
                        NoticeLevel::Success,
                        format!("{} ideas added to the tree", added.len()),
                    );
                }
                Err(err) => self.submit_failed(err),
            },
        }
    }

    fn submit_failed(&mut self, err: SubmitError) {
        let level = match err {
            SubmitError::NothingSelected | SubmitError::Unconfirmed => NoticeLevel::Warning,
            SubmitError::NoForm | SubmitError::Tree(_) => NoticeLevel::Error,
        };
        debug!(error = %err, "panel action rejected");
        self.notify(level, err.to_string());
    }

    fn request_ideas(&mut self, ctx: Option<&egui::Context>) {
        let Panel::Generate(form) = &mut self.interaction.panel else {
            return;
        };
        let accepted = self
            .generator
            .request(form.area, form.context.clone(), ctx.cloned());
        if accepted {
            form.pending = true;
        } else {
            self.notify(NoticeLevel::Info, "Ideas are already being generated");
        }
    }

    fn drain_events(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => self.apply_event(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("event channel disconnected");
                    break;
                }
            }
        }
    }

    fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::IdeasReady { area, ideas } => {
                let count = ideas.len();
                match self.interaction.waiting_for_ideas() {
                    Some(form) => {
                        form.set_ideas(area, ideas);
                        self.notify(NoticeLevel::Success, format!("{count} ideas generated"));
                    }
                    None => debug!(?area, "ideas arrived after the request was abandoned"),
                }
            }
            AppEvent::GeneratorError(message) => {
                if let Panel::Generate(form) = &mut self.interaction.panel {
                    form.pending = false;
                }
                warn!(%message, "idea generation failed");
                self.notify(NoticeLevel::Error, message);
            }
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.strong("🌳 Life tree");
                ui.separator();

                let mut selected = self.layout_kind;
                egui::ComboBox::from_id_salt("layout_kind")
                    .selected_text(selected.label())
                    .show_ui(ui, |ui| {
                        for kind in LayoutKind::ALL {
                            ui.selectable_value(&mut selected, kind, kind.label());
                        }
                    });
                if selected != self.layout_kind {
                    self.set_layout(selected);
                    self.start_recentre();
                }

                if ui.button("🌿 Expand all").clicked() {
                    self.expand_all();
                }
                if ui.button("🍂 Collapse").clicked() {
                    self.collapse();
                }
                if ui.button("🎯 Center").clicked() {
                    self.start_recentre();
                }
                ui.separator();

                let edit_label = if self.interaction.mode.is_edit() {
                    "👁️ View mode"
                } else {
                    "✏️ Edit mode"
                };
                if ui.button(edit_label).clicked() {
                    self.interaction.toggle_edit();
                }
                let create_label = if self.interaction.mode.is_create() {
                    RichText::new("❌ Cancel creation").color(self.theme.danger)
                } else {
                    RichText::new("➕ Add node")
                };
                if ui.button(create_label).clicked() {
                    self.start_or_cancel_create();
                }
                if ui.button("💡 Generate ideas").clicked() {
                    self.interaction.open_generate();
                }
                if ui.button("💾 Save & export").clicked() {
                    self.save_and_export();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let status = match self.last_saved {
                        Some(at) => format!("Saved {}", at.format("%H:%M:%S")),
                        None => "Not saved this session".to_string(),
                    };
                    ui.label(RichText::new(status).color(self.theme.text_muted).small());
                    ui.label(RichText::new(mode_label(self.interaction.mode)).color(self.theme.accent_primary));
                });
            });
        });
    }

    fn render_side_panel(&mut self, ctx: &egui::Context) {
        if !self.interaction.panel.is_open() {
            return;
        }
        let mut action = None;
        egui::SidePanel::right("side_panel")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| {
                action = panel::show(ui, &mut self.interaction, &self.tree, &self.theme);
            });
        if let Some(action) = action {
            self.apply_action(action, Some(ctx));
        }
    }

    fn render_diagnostics(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("diagnostics").show(ctx, |ui| {
            egui::CollapsingHeader::new("Diagnostics")
                .default_open(false)
                .show(ui, |ui| {
                    ScrollArea::vertical()
                        .id_salt("diagnostics_log")
                        .max_height(90.0)
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            for entry in self.notices.diagnostics() {
                                ui.label(RichText::new(entry).small().monospace());
                            }
                        });
                });
        });
    }

    fn render_canvas(&mut self, ctx: &egui::Context) {
        let mut clicked = None;
        egui::CentralPanel::default()
            .frame(egui::Frame::new())
            .show(ctx, |ui| {
                let size = ui.available_size();
                self.canvas_size = size;
                let viewport = self.viewport.get_or_insert_with(|| Viewport::initial(size));
                let view = CanvasView {
                    tree: &self.tree,
                    layout: &self.layout,
                    interaction: &self.interaction,
                    theme: &self.theme,
                    dim_secondary: self.dim_secondary,
                };
                clicked = canvas::show(ui, viewport, &view);
            });
        if let Some(path) = clicked {
            self.handle_click(path);
        }
    }

    fn start_recentre(&mut self) {
        let starts_at = self.now + self.config.animation_delay().as_secs_f64();
        let duration = self.config.animation_duration().as_secs_f64();
        if let Some(viewport) = self.viewport.as_mut() {
            viewport.start_recentre(self.canvas_size, starts_at, duration);
        }
    }
}

fn mode_label(mode: Mode) -> &'static str {
    match mode {
        Mode::View => "View",
        Mode::Edit => "Editing",
        Mode::Create { parent: None } => "Pick a parent",
        Mode::Create { parent: Some(_) } => "Creating",
    }
}

impl eframe::App for ArbolApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.now = ctx.input(|input| input.time);
        self.drain_events();

        self.render_top_bar(ctx);
        self.render_diagnostics(ctx);
        self.render_side_panel(ctx);
        self.render_canvas(ctx);
        self.notices.show(ctx, &self.theme);

        if self
            .viewport
            .as_mut()
            .is_some_and(|viewport| viewport.tick(self.now))
        {
            ctx.request_repaint();
        }
        if self.notices.prune(self.now) || self.generator.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ideas::{IdeaArea, IdeaCatalog};
    use crate::tree::{NodeKind, Side};
    use std::sync::mpsc;

    struct Harness {
        app: ArbolApp,
        _runtime: tokio::runtime::Runtime,
        _dir: tempfile::TempDir,
    }

    fn harness(layout: LayoutKind) -> Harness {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("test runtime");
        let dir = tempfile::tempdir().expect("temp dir");
        let (tx, rx) = mpsc::channel();
        let generator = IdeaGenerator::new(
            IdeaCatalog::builtin().expect("embedded catalog"),
            tx,
            runtime.handle().clone(),
            Duration::from_millis(10),
        );
        let config = Config {
            layout,
            export_dir: Some(dir.path().to_path_buf()),
            ..Config::default()
        };
        let app = ArbolApp::new(
            rx,
            generator,
            TreeStore::new(dir.path()),
            config,
            Theme::default(),
            LifeTree::default(),
        );
        Harness {
            app,
            _runtime: runtime,
            _dir: dir,
        }
    }

    fn stored(app: &ArbolApp) -> LifeTree {
        let mut tree = LifeTree::default();
        app.store
            .load()
            .expect("store readable")
            .expect("tree saved")
            .apply_to(&mut tree);
        tree
    }

    fn wait_for_ideas(app: &mut ArbolApp) {
        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while app.interaction.waiting_for_ideas().is_some() {
            assert!(std::time::Instant::now() < deadline, "ideas never arrived");
            std::thread::sleep(Duration::from_millis(5));
            app.drain_events();
        }
    }

    #[test]
    fn hierarchy_starts_collapsed_and_toggles_on_click() {
        let mut harness = harness(LayoutKind::Hierarchy);
        let app = &mut harness.app;
        let primaries = 1 + app.tree.roots.len() + app.tree.branches.len();
        assert_eq!(app.layout.nodes.len(), primaries);

        app.handle_click(NodePath::branch(0));
        let children = app.tree.branches[0].children.len();
        assert_eq!(app.layout.nodes.len(), primaries + children);
        assert_eq!(app.interaction.panel, Panel::Info(NodePath::branch(0)));

        app.expand_all();
        assert_eq!(app.layout.nodes.len(), app.tree.len());
        app.collapse();
        assert!(app.dim_secondary);
        assert_eq!(app.layout.nodes.len(), primaries);
    }

    #[test]
    fn create_persists_the_tree() {
        let mut harness = harness(LayoutKind::Vertical);
        let app = &mut harness.app;
        app.start_or_cancel_create();
        app.handle_click(NodePath::root(1));
        if let Panel::Create(create) = &mut app.interaction.panel {
            create.form.name = "Patience".to_string();
            create.form.kind = NodeKind::DeepRoots;
        }
        app.apply_action(PanelAction::SubmitCreate, None);

        let path = app
            .tree
            .find_by_name("Patience")
            .expect("node was added");
        assert_eq!(path.side(), Some(Side::Roots));
        assert!(app.layout.node(path).is_some());
        assert_eq!(stored(app), app.tree);
        assert!(app.last_saved.is_some());
    }

    #[test]
    fn child_created_under_collapsed_parent_is_laid_out() {
        let mut harness = harness(LayoutKind::Hierarchy);
        let app = &mut harness.app;
        assert!(app.collapsed.contains(&NodePath::branch(0)));
        app.start_or_cancel_create();
        app.handle_click(NodePath::branch(0));
        if let Panel::Create(create) = &mut app.interaction.panel {
            create.form.name = "Morning pages".to_string();
            create.form.kind = NodeKind::Leaf;
        }
        app.apply_action(PanelAction::SubmitCreate, None);

        let path = NodePath::branch(0).child(3).expect("child path");
        assert_eq!(
            app.tree.get(path).map(|node| node.name.as_str()),
            Some("Morning pages")
        );
        assert!(app.layout.node(path).is_some());
        assert!(!app.collapsed.contains(&NodePath::branch(0)));
        assert!(app.collapsed.contains(&NodePath::branch(1)));
    }

    #[test]
    fn deleting_a_primary_keeps_each_sibling_collapse_state() {
        let mut harness = harness(LayoutKind::Hierarchy);
        let app = &mut harness.app;
        app.handle_click(NodePath::branch(1));
        assert!(!app.collapsed.contains(&NodePath::branch(1)));

        app.interaction.toggle_edit();
        app.handle_click(NodePath::branch(0));
        app.apply_action(PanelAction::RequestDelete, None);
        app.apply_action(PanelAction::ConfirmDelete, None);

        // The expanded branch moved to index 0, its collapsed neighbours follow.
        assert!(!app.collapsed.contains(&NodePath::branch(0)));
        assert!(app.collapsed.contains(&NodePath::branch(1)));
        assert!(app.collapsed.contains(&NodePath::branch(2)));
        assert!(!app.collapsed.contains(&NodePath::branch(3)));
        let child = NodePath::branch(0).child(0).expect("child path");
        assert!(app.layout.node(child).is_some());
    }

    #[test]
    fn delete_persists_and_clears_selection() {
        let mut harness = harness(LayoutKind::Radial);
        let app = &mut harness.app;
        app.interaction.toggle_edit();
        app.handle_click(NodePath::branch(1));
        app.apply_action(PanelAction::RequestDelete, None);
        app.apply_action(PanelAction::ConfirmDelete, None);

        let saved = stored(app);
        assert_eq!(saved.branches.len(), LifeTree::default().branches.len() - 1);
        assert_eq!(app.interaction.active, None);
        assert_eq!(app.layout.nodes.len(), app.tree.len());
    }

    #[test]
    fn generated_ideas_reach_the_open_form() {
        let mut harness = harness(LayoutKind::Vertical);
        let app = &mut harness.app;
        app.interaction.open_generate();
        app.apply_action(PanelAction::Generate, None);
        assert!(app.interaction.waiting_for_ideas().is_some());
        wait_for_ideas(app);
        let Panel::Generate(form) = &mut app.interaction.panel else {
            panic!("generator form should stay open");
        };
        assert_eq!(form.ideas.len(), crate::ideas::MAX_IDEAS);
        form.toggle(0);
        form.toggle(2);

        let before = app.tree.branches.len();
        app.apply_action(PanelAction::AcceptIdeas, None);
        assert_eq!(app.tree.branches.len(), before + 2);
        assert_eq!(stored(app).branches.len(), before + 2);
    }

    #[test]
    fn changing_the_area_mid_request_still_delivers() {
        let mut harness = harness(LayoutKind::Vertical);
        let app = &mut harness.app;
        app.interaction.open_generate();
        app.apply_action(PanelAction::Generate, None);
        if let Panel::Generate(form) = &mut app.interaction.panel {
            form.area = IdeaArea::Financial;
        }
        wait_for_ideas(app);

        let Panel::Generate(form) = &app.interaction.panel else {
            panic!("generator form should stay open");
        };
        assert!(!form.pending);
        assert_eq!(form.area, IdeaArea::Values);
        assert_eq!(form.ideas.len(), crate::ideas::MAX_IDEAS);
        assert!(!app.generator.is_busy());
    }

    #[test]
    fn accepting_nothing_only_warns() {
        let mut harness = harness(LayoutKind::Vertical);
        let app = &mut harness.app;
        app.interaction.open_generate();
        app.apply_action(PanelAction::AcceptIdeas, None);
        assert!(matches!(app.interaction.panel, Panel::Generate(_)));
        assert_eq!(
            app.notices.active().last().map(|notice| notice.level),
            Some(NoticeLevel::Warning)
        );
        assert!(app.store.load().expect("store readable").is_none());
    }

    #[test]
    fn save_and_export_writes_both_files() {
        let mut harness = harness(LayoutKind::Organic);
        let app = &mut harness.app;
        app.save_and_export();
        let exported = std::fs::read_dir(&app.export_dir)
            .expect("export dir readable")
            .flatten()
            .filter(|entry| {
                entry
                    .file_name()
                    .to_string_lossy()
                    .starts_with("life-tree-")
            })
            .count();
        assert_eq!(exported, 1);
        assert_eq!(stored(app), app.tree);
    }
}
