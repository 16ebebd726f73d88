use crate::layout::{PlacedNode, TreeLayout, TRUNK_HALF_HEIGHT, TRUNK_HALF_WIDTH};
use crate::theme::Theme;
use crate::tree::{LifeTree, NodePath};
use crate::ui::mode::{Interaction, Mode};
use crate::ui::viewport::Viewport;
use eframe::egui::{self, Align2, Color32, FontId, Painter, Pos2, Sense, Shape, Stroke, Vec2};
use std::f32::consts::TAU;

const CURVE_SEGMENTS: usize = 24;
const ELLIPSE_SEGMENTS: usize = 40;
const SHORT_NAME_CHARS: usize = 10;
const DIMMED_NODE_OPACITY: f32 = 0.3;
const DIMMED_LINK_OPACITY: f32 = 0.2;

/// Everything the painter reads for one frame.
pub struct CanvasView<'a> {
    pub tree: &'a LifeTree,
    pub layout: &'a TreeLayout,
    pub interaction: &'a Interaction,
    pub theme: &'a Theme,
    pub dim_secondary: bool,
}

/// Paints the tree and returns the node clicked this frame, if any.
pub fn show(ui: &mut egui::Ui, viewport: &mut Viewport, view: &CanvasView<'_>) -> Option<NodePath> {
    let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, view.theme.canvas_fill);

    if response.dragged() {
        viewport.pan(response.drag_delta());
    }
    if response.hovered() {
        let (scroll, pinch, pointer) = ui.input(|input| {
            (
                input.smooth_scroll_delta.y,
                input.zoom_delta(),
                input.pointer.hover_pos(),
            )
        });
        let factor = pinch * (1.0 + scroll * 0.0018).clamp(0.85, 1.15);
        if (factor - 1.0).abs() > f32::EPSILON {
            let anchor = pointer.unwrap_or_else(|| rect.center()) - rect.min.to_vec2();
            viewport.zoom_at(anchor, factor);
        }
    }

    let to_screen = |world: Pos2| viewport.to_local(world) + rect.min.to_vec2();
    let to_world = |screen: Pos2| viewport.to_world(screen - rect.min.to_vec2());

    paint_links(&painter, view, viewport.scale, &to_screen);
    for node in &view.layout.nodes {
        paint_node(&painter, view, node, viewport.scale, to_screen(node.pos));
    }

    let hovered = response
        .hover_pos()
        .and_then(|pos| view.layout.hit_test(to_world(pos)));
    let clicked = if response.clicked() {
        response
            .interact_pointer_pos()
            .and_then(|pos| view.layout.hit_test(to_world(pos)))
    } else {
        None
    };

    if let Some(path) = hovered {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        if let Some(node) = view.tree.get(path) {
            response.on_hover_ui_at_pointer(|ui| {
                ui.set_max_width(260.0);
                ui.strong(&node.name);
                if !node.description.is_empty() {
                    ui.label(&node.description);
                }
            });
        }
    }

    clicked
}

fn paint_links(
    painter: &Painter,
    view: &CanvasView<'_>,
    scale: f32,
    to_screen: &impl Fn(Pos2) -> Pos2,
) {
    for link in &view.layout.links {
        let level = link.child.level();
        let Some(kind) = view.tree.get(link.child).map(|node| node.kind) else {
            continue;
        };
        let (width, opacity) = match level {
            1 => (4.0, 0.8),
            _ if view.dim_secondary => (2.5, DIMMED_LINK_OPACITY),
            _ => (2.5, 0.7),
        };
        let colour = view.theme.link_colour(kind, level).gamma_multiply(opacity);
        let points: Vec<Pos2> = link
            .connector
            .sample(CURVE_SEGMENTS)
            .into_iter()
            .map(to_screen)
            .collect();
        painter.add(Shape::line(points, Stroke::new(width * scale, colour)));
    }
}

fn paint_node(painter: &Painter, view: &CanvasView<'_>, node: &PlacedNode, scale: f32, centre: Pos2) {
    let Some(data) = view.tree.get(node.path) else {
        return;
    };
    let theme = view.theme;
    let opacity = node_opacity(node.level, view.dim_secondary);
    let fill = node_fill(node, view.interaction, theme).gamma_multiply(opacity);
    let white = Color32::WHITE.gamma_multiply(opacity);

    if node.level == 0 {
        let half = Vec2::new(TRUNK_HALF_WIDTH, TRUNK_HALF_HEIGHT) * scale;
        painter.add(Shape::convex_polygon(
            ellipse_points(centre, half),
            fill,
            Stroke::new(4.0 * scale, theme.trunk_outline),
        ));
        painter.add(Shape::closed_line(
            ellipse_points(centre, half - Vec2::splat(3.0 * scale)),
            Stroke::new(scale, theme.trunk_outline.gamma_multiply(0.6)),
        ));
        painter.text(
            centre - Vec2::new(0.0, (TRUNK_HALF_HEIGHT + 14.0) * scale),
            Align2::CENTER_CENTER,
            data.kind.icon(),
            FontId::proportional(30.0 * scale),
            Color32::WHITE,
        );
        painter.text(
            centre,
            Align2::CENTER_CENTER,
            "OBJECTIVE",
            FontId::proportional(12.0 * scale),
            theme.text_on_node,
        );
    } else {
        let radius = view.layout.drawn_radius(node.level) * scale;
        painter.circle(centre, radius, fill, Stroke::new(3.0 * scale, white));
        let icon_size = if node.level == 1 { 18.0 } else { 14.0 };
        painter.text(
            centre - Vec2::new(0.0, radius + 6.0 * scale),
            Align2::CENTER_BOTTOM,
            data.kind.icon(),
            FontId::proportional(icon_size * scale),
            white,
        );
        let label_size = if node.level == 1 { 10.0 } else { 8.0 };
        painter.text(
            centre,
            Align2::CENTER_CENTER,
            data.short_name(SHORT_NAME_CHARS),
            FontId::proportional(label_size * scale),
            white,
        );
        if node.collapsed {
            painter.circle_stroke(
                centre,
                radius + 2.0 * scale,
                Stroke::new(2.0 * scale, theme.trunk_outline),
            );
        }
    }

    if let Some(colour) = indicator_colour(view.interaction.mode, theme) {
        let radius = match node.level {
            0 => TRUNK_HALF_HEIGHT + 5.0,
            level => view.layout.drawn_radius(level) + 5.0,
        } * scale;
        let mut ring = ellipse_points(centre, Vec2::splat(radius));
        if let Some(first) = ring.first().copied() {
            ring.push(first);
        }
        painter.extend(Shape::dashed_line(
            &ring,
            Stroke::new(2.0 * scale, colour.gamma_multiply(0.8)),
            5.0 * scale,
            5.0 * scale,
        ));
    }
}

/// Selected parent wins over the active highlight, which wins over the kind.
fn node_fill(node: &PlacedNode, interaction: &Interaction, theme: &Theme) -> Color32 {
    if interaction.mode.selected_parent() == Some(node.path) {
        theme.nodes.selected_parent
    } else if interaction.active == Some(node.path) {
        theme.nodes.active
    } else {
        theme.nodes.for_kind(node.kind)
    }
}

fn node_opacity(level: usize, dim_secondary: bool) -> f32 {
    if dim_secondary && level > 1 {
        DIMMED_NODE_OPACITY
    } else {
        1.0
    }
}

fn indicator_colour(mode: Mode, theme: &Theme) -> Option<Color32> {
    match mode {
        Mode::View => None,
        Mode::Edit => Some(theme.edit_indicator),
        Mode::Create { .. } => Some(theme.nodes.selected_parent),
    }
}

fn ellipse_points(centre: Pos2, half: Vec2) -> Vec<Pos2> {
    (0..ELLIPSE_SEGMENTS)
        .map(|index| {
            let angle = index as f32 / ELLIPSE_SEGMENTS as f32 * TAU;
            centre + Vec2::new(angle.cos() * half.x, angle.sin() * half.y)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutKind, LayoutOptions};
    use crate::tree::NodeKind;

    fn placed(path: NodePath, kind: NodeKind) -> PlacedNode {
        PlacedNode {
            path,
            kind,
            pos: Pos2::ZERO,
            level: path.level(),
            collapsed: false,
        }
    }

    #[test]
    fn fill_priority_is_parent_then_active_then_kind() {
        let theme = Theme::default();
        let node = placed(NodePath::branch(0), NodeKind::Branch);
        let mut interaction = Interaction::default();
        assert_eq!(node_fill(&node, &interaction, &theme), theme.nodes.branch);

        interaction.active = Some(node.path);
        assert_eq!(node_fill(&node, &interaction, &theme), theme.nodes.active);

        interaction.mode = Mode::Create {
            parent: Some(node.path),
        };
        assert_eq!(
            node_fill(&node, &interaction, &theme),
            theme.nodes.selected_parent
        );
    }

    #[test]
    fn collapse_dims_only_secondary_nodes() {
        assert_eq!(node_opacity(0, true), 1.0);
        assert_eq!(node_opacity(1, true), 1.0);
        assert_eq!(node_opacity(2, true), DIMMED_NODE_OPACITY);
        assert_eq!(node_opacity(2, false), 1.0);
    }

    #[test]
    fn indicators_follow_the_mode() {
        let theme = Theme::default();
        assert_eq!(indicator_colour(Mode::View, &theme), None);
        assert_eq!(indicator_colour(Mode::Edit, &theme), Some(theme.edit_indicator));
        assert_eq!(
            indicator_colour(Mode::Create { parent: None }, &theme),
            Some(theme.nodes.selected_parent)
        );
    }

    #[test]
    fn ellipse_points_stay_on_the_outline() {
        let half = Vec2::new(TRUNK_HALF_WIDTH, TRUNK_HALF_HEIGHT);
        for point in ellipse_points(Pos2::ZERO, half) {
            let norm = (point.x / half.x).powi(2) + (point.y / half.y).powi(2);
            approx::assert_relative_eq!(norm, 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn world_clicks_resolve_through_the_viewport() {
        let tree = LifeTree::default();
        let options = LayoutOptions {
            canvas_width: 1200.0,
            node_radius: 30.0,
            ..LayoutOptions::default()
        };
        let layout = TreeLayout::build(LayoutKind::Vertical, &tree, &options);
        let viewport = Viewport::initial(Vec2::new(1200.0, 800.0));
        let root = layout.node(NodePath::root(0)).expect("root placed");
        let local = viewport.to_local(root.pos);
        assert_eq!(
            layout.hit_test(viewport.to_world(local)),
            Some(NodePath::root(0))
        );
    }
}
