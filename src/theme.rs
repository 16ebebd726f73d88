use crate::config::{parse_hex_colour, PaletteConfig};
use crate::tree::NodeKind;
use eframe::egui::{self, Color32, CornerRadius, FontId, Frame, Margin, Stroke, TextStyle};

#[derive(Debug, Clone)]
pub struct Theme {
    pub surface_1: Color32,
    pub surface_2: Color32,
    pub surface_3: Color32,
    pub accent_primary: Color32,
    pub accent_muted: Color32,
    pub success: Color32,
    pub warning: Color32,
    pub danger: Color32,
    pub info: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub text_on_node: Color32,
    pub canvas_fill: Color32,
    pub trunk_outline: Color32,
    pub trunk_link: Color32,
    pub deep_root_link: Color32,
    pub leaf_link: Color32,
    pub edit_indicator: Color32,
    pub nodes: NodePalette,
    pub spacing_4: f32,
    pub spacing_8: f32,
    pub spacing_12: f32,
    pub radius_10: u8,
    pub radius_12: u8,
}

#[derive(Debug, Clone)]
pub struct NodePalette {
    pub trunk: Color32,
    pub roots: Color32,
    pub deep_roots: Color32,
    pub branch: Color32,
    pub leaf: Color32,
    pub active: Color32,
    pub selected_parent: Color32,
}

impl NodePalette {
    pub fn from_config(config: &PaletteConfig) -> Self {
        let fallback = PaletteConfig::default();
        let colour = |value: &str, default: &str| {
            let [r, g, b] = parse_hex_colour(value)
                .or_else(|| parse_hex_colour(default))
                .unwrap_or([0x22, 0x8B, 0x22]);
            Color32::from_rgb(r, g, b)
        };
        Self {
            trunk: colour(&config.trunk, &fallback.trunk),
            roots: colour(&config.roots, &fallback.roots),
            deep_roots: colour(&config.deep_roots, &fallback.deep_roots),
            branch: colour(&config.branch, &fallback.branch),
            leaf: colour(&config.leaf, &fallback.leaf),
            active: colour(&config.active, &fallback.active),
            selected_parent: colour(&config.selected_parent, &fallback.selected_parent),
        }
    }

    pub fn for_kind(&self, kind: NodeKind) -> Color32 {
        match kind {
            NodeKind::Trunk => self.trunk,
            NodeKind::Roots => self.roots,
            NodeKind::DeepRoots => self.deep_roots,
            NodeKind::Branch => self.branch,
            NodeKind::Leaf => self.leaf,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(NodePalette::from_config(&PaletteConfig::default()))
    }
}

impl Theme {
    pub fn new(nodes: NodePalette) -> Self {
        Self {
            surface_1: Color32::from_rgb(0x16, 0x1A, 0x20),
            surface_2: Color32::from_rgb(0x1C, 0x22, 0x2B),
            surface_3: Color32::from_rgb(0x22, 0x2A, 0x35),
            accent_primary: Color32::from_rgb(0x3B, 0x82, 0xF6),
            accent_muted: Color32::from_rgb(0x2F, 0x6E, 0xD8),
            success: Color32::from_rgb(0x28, 0xA7, 0x45),
            warning: Color32::from_rgb(0xFF, 0xC1, 0x07),
            danger: Color32::from_rgb(0xDC, 0x35, 0x45),
            info: Color32::from_rgb(0x17, 0xA2, 0xB8),
            text_primary: Color32::from_rgb(0xE6, 0xED, 0xF3),
            text_muted: Color32::from_rgb(0x8B, 0x94, 0x9E),
            text_on_node: Color32::WHITE,
            canvas_fill: Color32::from_rgb(0xF4, 0xF1, 0xEA),
            trunk_outline: Color32::from_rgb(0x5D, 0x40, 0x37),
            trunk_link: Color32::from_rgb(0x8D, 0x6E, 0x63),
            deep_root_link: Color32::from_rgb(0x6D, 0x4C, 0x41),
            leaf_link: Color32::from_rgb(0x4C, 0xAF, 0x50),
            edit_indicator: Color32::from_rgb(0xFF, 0xD7, 0x00),
            nodes,
            spacing_4: 4.0,
            spacing_8: 8.0,
            spacing_12: 12.0,
            radius_10: 10,
            radius_12: 12,
        }
    }

    pub fn apply_visuals(&self, ctx: &egui::Context) {
        let mut visuals = egui::Visuals::dark();
        visuals.panel_fill = self.surface_1;
        visuals.override_text_color = Some(self.text_primary);
        visuals.widgets.noninteractive.bg_fill = self.surface_2;
        visuals.widgets.noninteractive.bg_stroke = Stroke::NONE;
        visuals.widgets.inactive.bg_fill = self.surface_2;
        visuals.widgets.inactive.bg_stroke = Stroke::NONE;
        visuals.widgets.hovered.bg_fill = self.surface_3;
        visuals.widgets.hovered.bg_stroke = Stroke::NONE;
        visuals.widgets.active.bg_fill = self.accent_muted;
        visuals.widgets.active.bg_stroke = Stroke::NONE;
        visuals.selection.bg_fill = self.accent_muted;
        visuals.hyperlink_color = self.accent_primary;
        visuals.window_fill = self.surface_1;
        visuals.window_stroke = Stroke::NONE;
        visuals.window_corner_radius = CornerRadius::same(self.radius_10);
        let mut style = (*ctx.style()).clone();
        style.visuals = visuals;
        style.spacing.item_spacing = egui::vec2(8.0, 8.0);
        style.spacing.button_padding = egui::vec2(10.0, 6.0);
        style.text_styles.insert(TextStyle::Heading, FontId::proportional(17.0));
        style.text_styles.insert(TextStyle::Body, FontId::proportional(14.0));
        style.text_styles.insert(TextStyle::Small, FontId::proportional(12.0));
        ctx.set_style(style);
    }

    pub fn card_frame(&self) -> Frame {
        Frame::new()
            .fill(self.surface_2)
            .inner_margin(Margin::same(self.spacing_12 as i8))
            .corner_radius(CornerRadius::same(self.radius_12))
            .stroke(Stroke::NONE)
    }

    pub fn notice_frame(&self, fill: Color32) -> Frame {
        Frame::new()
            .fill(fill)
            .inner_margin(Margin::symmetric(self.spacing_12 as i8, 10))
            .corner_radius(CornerRadius::same(8))
            .stroke(Stroke::NONE)
    }

    pub fn link_colour(&self, child_kind: NodeKind, child_level: usize) -> Color32 {
        match (child_level, child_kind.side()) {
            (1, _) | (_, None) => self.trunk_link,
            (_, Some(crate::tree::Side::Roots)) => self.deep_root_link,
            (_, Some(crate::tree::Side::Branches)) => self.leaf_link,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_falls_back_per_field() {
        let config = PaletteConfig {
            leaf: "nope".to_string(),
            branch: "#010203".to_string(),
            ..PaletteConfig::default()
        };
        let palette = NodePalette::from_config(&config);
        assert_eq!(palette.branch, Color32::from_rgb(1, 2, 3));
        assert_eq!(palette.leaf, Color32::from_rgb(0x32, 0xCD, 0x32));
        assert_eq!(palette.for_kind(NodeKind::Trunk), Color32::from_rgb(0x8B, 0x45, 0x13));
    }

    #[test]
    fn secondary_links_take_their_side_colour() {
        let theme = Theme::default();
        assert_eq!(theme.link_colour(NodeKind::Branch, 1), theme.trunk_link);
        assert_eq!(theme.link_colour(NodeKind::DeepRoots, 2), theme.deep_root_link);
        assert_eq!(theme.link_colour(NodeKind::Leaf, 2), theme.leaf_link);
    }
}
