use crate::ideas::{Idea, IdeaArea};
use crate::tree::validate::{description_hint, validate_name, ValidationError};
use crate::tree::{LifeTree, NodeDraft, NodeKind, NodePath, TreeError, TreeNode};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    View,
    Edit,
    Create { parent: Option<NodePath> },
}

impl Mode {
    pub fn is_edit(&self) -> bool {
        matches!(self, Self::Edit)
    }

    pub fn is_create(&self) -> bool {
        matches!(self, Self::Create { .. })
    }

    pub fn selected_parent(&self) -> Option<NodePath> {
        match self {
            Self::Create { parent } => *parent,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeForm {
    pub name: String,
    pub description: String,
    pub kind: NodeKind,
    pub kinds: &'static [NodeKind],
}

impl NodeForm {
    fn blank(kinds: &'static [NodeKind]) -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            kind: kinds.first().copied().unwrap_or(NodeKind::Leaf),
            kinds,
        }
    }

    fn filled(node: &TreeNode, kinds: &'static [NodeKind]) -> Self {
        Self {
            name: node.name.clone(),
            description: node.description.clone(),
            kind: node.kind,
            kinds,
        }
    }

    /// Inline hint shown under the name field while typing.
    pub fn name_problem(&self) -> Option<ValidationError> {
        validate_name(&self.name).err()
    }

    pub fn description_hint(&self) -> Option<&'static str> {
        description_hint(&self.description)
    }

    fn draft(&self) -> NodeDraft {
        NodeDraft::new(self.name.clone(), self.description.clone(), self.kind)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditForm {
    pub path: NodePath,
    pub original_name: String,
    pub form: NodeForm,
    pub confirm_delete: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateForm {
    pub parent: NodePath,
    pub parent_name: String,
    pub form: NodeForm,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateForm {
    pub area: IdeaArea,
    pub context: String,
    pub ideas: Vec<Idea>,
    pub selected: Vec<bool>,
    pub pending: bool,
}

impl Default for GenerateForm {
    fn default() -> Self {
        Self {
            area: IdeaArea::Values,
            context: String::new(),
            ideas: Vec::new(),
            selected: Vec::new(),
            pending: false,
        }
    }
}

impl GenerateForm {
    /// Shows the ideas generated for `area`, which becomes the form's area.
    pub fn set_ideas(&mut self, area: IdeaArea, ideas: Vec<Idea>) {
        self.area = area;
        self.selected = vec![false; ideas.len()];
        self.ideas = ideas;
        self.pending = false;
    }

    pub fn toggle(&mut self, index: usize) {
        if let Some(flag) = self.selected.get_mut(index) {
            *flag = !*flag;
        }
    }

    pub fn selected_ideas(&self) -> impl Iterator<Item = &Idea> {
        self.ideas
            .iter()
            .zip(&self.selected)
            .filter_map(|(idea, selected)| selected.then_some(idea))
    }

    pub fn selected_count(&self) -> usize {
        self.selected.iter().filter(|flag| **flag).count()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Panel {
    #[default]
    Hidden,
    Info(NodePath),
    Edit(EditForm),
    Create(CreateForm),
    Generate(GenerateForm),
}

impl Panel {
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// View mode: the node is now active and its info is showing.
    Inspected(NodePath),
    EditOpened(NodePath),
    ParentSelected { parent: NodePath, name: String },
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("no form is open")]
    NoForm,
    #[error("select at least one idea")]
    NothingSelected,
    #[error("confirm the deletion first")]
    Unconfirmed,
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// What the user is doing right now: the mode, the side panel and the
/// highlighted node.
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    pub mode: Mode,
    pub panel: Panel,
    pub active: Option<NodePath>,
}

impl Interaction {
    /// Flips between view and edit. Leaving edit mode closes the panel.
    pub fn toggle_edit(&mut self) {
        self.mode = match self.mode {
            Mode::Edit => {
                self.close_panel();
                Mode::View
            }
            Mode::View | Mode::Create { .. } => {
                if matches!(self.panel, Panel::Create(_)) {
                    self.close_panel();
                }
                Mode::Edit
            }
        };
        debug!(mode = ?self.mode, "edit mode toggled");
    }

    pub fn start_create(&mut self) {
        self.close_panel();
        self.mode = Mode::Create { parent: None };
        debug!("create mode started");
    }

    pub fn cancel_create(&mut self) {
        if self.mode.is_create() {
            self.mode = Mode::View;
            self.close_panel();
            debug!("create mode cancelled");
        }
    }

    pub fn open_generate(&mut self) {
        if !matches!(self.panel, Panel::Generate(_)) {
            self.panel = Panel::Generate(GenerateForm::default());
        }
    }

    pub fn close_panel(&mut self) {
        self.panel = Panel::Hidden;
        self.active = None;
    }

    pub fn click(&mut self, tree: &LifeTree, path: NodePath) -> ClickOutcome {
        let Some(node) = tree.get(path) else {
            return ClickOutcome::Rejected(format!("no node at {path}"));
        };
        match self.mode {
            Mode::Create { .. } => {
                let kinds = tree.allowed_child_kinds(path);
                if kinds.is_empty() {
                    return ClickOutcome::Rejected(format!(
                        "\"{}\" cannot have children",
                        node.short_name(40)
                    ));
                }
                self.mode = Mode::Create { parent: Some(path) };
                self.active = Some(path);
                self.panel = Panel::Create(CreateForm {
                    parent: path,
                    parent_name: node.name.clone(),
                    form: NodeForm::blank(kinds),
                });
                ClickOutcome::ParentSelected {
                    parent: path,
                    name: node.name.clone(),
                }
            }
            Mode::Edit => {
                self.active = Some(path);
                self.panel = Panel::Edit(EditForm {
                    path,
                    original_name: node.name.clone(),
                    form: NodeForm::filled(node, tree.editable_kinds(path)),
                    confirm_delete: false,
                });
                ClickOutcome::EditOpened(path)
            }
            Mode::View => {
                self.active = Some(path);
                self.panel = Panel::Info(path);
                ClickOutcome::Inspected(path)
            }
        }
    }

    /// Adds the drafted node and returns to view mode.
    pub fn submit_create(&mut self, tree: &mut LifeTree) -> Result<NodePath, SubmitError> {
        let Panel::Create(create) = &self.panel else {
            return Err(SubmitError::NoForm);
        };
        let path = tree.add_child(create.parent, create.form.draft())?;
        self.mode = Mode::View;
        self.close_panel();
        Ok(path)
    }

    pub fn submit_edit(&mut self, tree: &mut LifeTree) -> Result<NodePath, SubmitError> {
        let Panel::Edit(edit) = &self.panel else {
            return Err(SubmitError::NoForm);
        };
        let path = edit.path;
        tree.update(path, edit.form.draft())?;
        self.close_panel();
        Ok(path)
    }

    /// First call arms the confirmation, the second removes the node.
    pub fn request_delete(&mut self) {
        if let Panel::Edit(edit) = &mut self.panel {
            edit.confirm_delete = true;
        }
    }

    pub fn delete_edited(&mut self, tree: &mut LifeTree) -> Result<TreeNode, SubmitError> {
        let Panel::Edit(edit) = &self.panel else {
            return Err(SubmitError::NoForm);
        };
        if !edit.confirm_delete {
            return Err(SubmitError::Unconfirmed);
        }
        let removed = tree.remove(edit.path)?;
        self.close_panel();
        Ok(removed)
    }

    /// Returns the generator form while it awaits a result. The generator
    /// runs one request at a time, so any result belongs to this form.
    pub fn waiting_for_ideas(&mut self) -> Option<&mut GenerateForm> {
        match &mut self.panel {
            Panel::Generate(form) if form.pending => Some(form),
            _ => None,
        }
    }

    pub fn accept_ideas(&mut self, tree: &mut LifeTree) -> Result<Vec<NodePath>, SubmitError> {
        let Panel::Generate(form) = &self.panel else {
            return Err(SubmitError::NoForm);
        };
        if form.selected_count() == 0 {
            return Err(SubmitError::NothingSelected);
        }
        let added = tree.add_ideas(
            form.selected_ideas()
                .map(|idea| (idea.title.as_str(), idea.description.as_str())),
        )?;
        self.close_panel();
        Ok(added)
    }

    /// Drops panel state that points at a node that no longer exists.
    pub fn forget_missing(&mut self, tree: &LifeTree) {
        let stale = match &self.panel {
            Panel::Info(path) => tree.get(*path).is_none(),
            Panel::Edit(edit) => tree.get(edit.path).is_none(),
            Panel::Create(create) => tree.get(create.parent).is_none(),
            Panel::Hidden | Panel::Generate(_) => false,
        };
        if stale {
            self.close_panel();
        }
        if self.active.is_some_and(|path| tree.get(path).is_none()) {
            self.active = None;
        }
    }
}
