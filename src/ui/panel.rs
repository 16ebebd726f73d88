use crate::ideas::IdeaArea;
use crate::theme::Theme;
use crate::tree::validate::NAME_MAX_CHARS;
use crate::tree::{LifeTree, NodePath};
use crate::ui::mode::{CreateForm, EditForm, GenerateForm, Interaction, NodeForm, Panel};
use eframe::egui::{self, RichText, ScrollArea};

/// Something the user asked for in the side panel; the app applies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    Close,
    SaveEdit,
    RequestDelete,
    ConfirmDelete,
    SubmitCreate,
    CancelCreate,
    Generate,
    AcceptIdeas,
}

pub fn show(
    ui: &mut egui::Ui,
    interaction: &mut Interaction,
    tree: &LifeTree,
    theme: &Theme,
) -> Option<PanelAction> {
    let mut action = None;
    ScrollArea::vertical()
        .id_salt("side_panel")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            action = match &mut interaction.panel {
                Panel::Hidden => None,
                Panel::Info(path) => info(ui, tree, *path, theme),
                Panel::Edit(edit) => edit_form(ui, edit, theme),
                Panel::Create(create) => create_form(ui, create, theme),
                Panel::Generate(generate) => generate_form(ui, generate, theme),
            };
        });
    action
}

fn header(ui: &mut egui::Ui, title: &str) -> bool {
    let mut close = false;
    ui.horizontal(|ui| {
        ui.heading(title);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            close = ui.button("✕").on_hover_text("Close").clicked();
        });
    });
    ui.separator();
    close
}

fn info(ui: &mut egui::Ui, tree: &LifeTree, path: NodePath, theme: &Theme) -> Option<PanelAction> {
    let Some(node) = tree.get(path) else {
        return Some(PanelAction::Close);
    };
    let close = header(ui, &node.name);
    ui.label(RichText::new(node.kind.label()).color(theme.text_muted).small());
    if !node.description.is_empty() {
        ui.add_space(theme.spacing_4);
        ui.label(&node.description);
    }

    if !node.details.is_empty() {
        ui.add_space(theme.spacing_8);
        theme.card_frame().show(ui, |ui| {
            for (key, value) in &node.details {
                ui.label(RichText::new(detail_label(key)).strong());
                ui.label(value.display_value());
                ui.add_space(theme.spacing_4);
            }
        });
    }

    if !node.children.is_empty() {
        ui.add_space(theme.spacing_8);
        ui.label(RichText::new(format!("{} children", node.children.len())).color(theme.text_muted));
        for child in &node.children {
            ui.label(format!("{} {}", child.kind.icon(), child.name));
        }
    }

    close.then_some(PanelAction::Close)
}

fn node_fields(ui: &mut egui::Ui, form: &mut NodeForm, theme: &Theme, id: &str) {
    ui.label("Name");
    ui.add(
        egui::TextEdit::singleline(&mut form.name)
            .char_limit(NAME_MAX_CHARS + 10)
            .hint_text("At least 2 characters")
            .desired_width(f32::INFINITY),
    );
    if !form.name.is_empty() {
        if let Some(problem) = form.name_problem() {
            ui.label(RichText::new(problem.to_string()).color(theme.danger).small());
        }
    }

    ui.label("Description");
    ui.add(
        egui::TextEdit::multiline(&mut form.description)
            .desired_rows(3)
            .desired_width(f32::INFINITY),
    );
    if let Some(hint) = form.description_hint() {
        ui.label(RichText::new(hint).color(theme.warning).small());
    }

    ui.label("Type");
    egui::ComboBox::from_id_salt(id)
        .selected_text(format!("{} {}", form.kind.icon(), form.kind.label()))
        .show_ui(ui, |ui| {
            for kind in form.kinds {
                ui.selectable_value(&mut form.kind, *kind, format!("{} {}", kind.icon(), kind.label()));
            }
        });
}

fn edit_form(ui: &mut egui::Ui, edit: &mut EditForm, theme: &Theme) -> Option<PanelAction> {
    let mut action = header(ui, &format!("✏️ Editing: {}", edit.original_name))
        .then_some(PanelAction::Close);
    node_fields(ui, &mut edit.form, theme, "edit_kind");
    ui.add_space(theme.spacing_8);

    ui.horizontal(|ui| {
        let valid = edit.form.name_problem().is_none();
        if ui.add_enabled(valid, egui::Button::new("💾 Save")).clicked() {
            action = Some(PanelAction::SaveEdit);
        }
        if ui.button("Cancel").clicked() {
            action = Some(PanelAction::Close);
        }
    });

    if edit.path != NodePath::Trunk {
        ui.separator();
        if edit.confirm_delete {
            ui.label(
                RichText::new(format!(
                    "Delete \"{}\" and its children? This cannot be undone.",
                    edit.original_name
                ))
                .color(theme.danger),
            );
            ui.horizontal(|ui| {
                if ui
                    .button(RichText::new("Delete").color(theme.danger))
                    .clicked()
                {
                    action = Some(PanelAction::ConfirmDelete);
                }
                if ui.button("Keep").clicked() {
                    edit.confirm_delete = false;
                }
            });
        } else if ui.button("🗑️ Delete node").clicked() {
            action = Some(PanelAction::RequestDelete);
        }
    }
    action
}

fn create_form(ui: &mut egui::Ui, create: &mut CreateForm, theme: &Theme) -> Option<PanelAction> {
    let mut action = header(ui, "➕ New node").then_some(PanelAction::CancelCreate);
    ui.label(
        RichText::new(format!("Parent: {}", create.parent_name)).color(theme.text_muted),
    );
    node_fields(ui, &mut create.form, theme, "create_kind");
    ui.add_space(theme.spacing_8);
    ui.horizontal(|ui| {
        let valid = create.form.name_problem().is_none();
        if ui.add_enabled(valid, egui::Button::new("Create")).clicked() {
            action = Some(PanelAction::SubmitCreate);
        }
        if ui.button("Cancel").clicked() {
            action = Some(PanelAction::CancelCreate);
        }
    });
    action
}

fn generate_form(ui: &mut egui::Ui, form: &mut GenerateForm, theme: &Theme) -> Option<PanelAction> {
    let mut action = header(ui, "💡 Idea generator").then_some(PanelAction::Close);

    ui.label("Area");
    ui.add_enabled_ui(!form.pending, |ui| {
        egui::ComboBox::from_id_salt("idea_area")
            .selected_text(form.area.label())
            .show_ui(ui, |ui| {
                for area in IdeaArea::ALL {
                    ui.selectable_value(&mut form.area, area, area.label());
                }
            });
    });
    ui.label("Context (optional)");
    ui.add(
        egui::TextEdit::multiline(&mut form.context)
            .desired_rows(2)
            .hint_text("What are you working towards?")
            .desired_width(f32::INFINITY),
    );

    ui.horizontal(|ui| {
        let label = if form.ideas.is_empty() {
            "Generate ideas"
        } else {
            "🔄 Regenerate"
        };
        if ui
            .add_enabled(!form.pending, egui::Button::new(label))
            .clicked()
        {
            action = Some(PanelAction::Generate);
        }
        if form.pending {
            ui.spinner();
            ui.label(RichText::new("Thinking...").color(theme.text_muted));
        }
    });

    if form.ideas.is_empty() {
        return action;
    }

    ui.separator();
    for index in 0..form.ideas.len() {
        let title = form.ideas[index].title.clone();
        theme.card_frame().show(ui, |ui| {
            ui.set_width(ui.available_width());
            if let Some(selected) = form.selected.get_mut(index) {
                ui.checkbox(selected, RichText::new(title).strong());
            }
            ui.label(RichText::new(&form.ideas[index].description).small());
        });
        ui.add_space(theme.spacing_4);
    }

    let count = form.selected_count();
    if ui
        .button(format!("✅ Add selected ({count})"))
        .clicked()
    {
        action = Some(PanelAction::AcceptIdeas);
    }
    action
}

/// Human label for a detail key.
pub fn detail_label(key: &str) -> String {
    let known = match key {
        "objective" => Some("🎯 Objective"),
        "vision" => Some("🔮 Vision"),
        "mission" => Some("💫 Mission"),
        "timeline" => Some("⏰ Timeline"),
        "values" => Some("💎 Values"),
        "principles" => Some("📋 Principles"),
        "areas" => Some("🎯 Areas"),
        "strategies" => Some("📋 Strategies"),
        _ => None,
    };
    if let Some(label) = known {
        return label.to_string();
    }
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>().replace('_', " "),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_labels() {
        assert_eq!(detail_label("vision"), "🔮 Vision");
        assert_eq!(detail_label("routine"), "Routine");
        assert_eq!(detail_label("next_steps"), "Next steps");
        assert_eq!(detail_label(""), "");
    }
}
