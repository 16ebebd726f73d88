use egui::emath::easing;
use egui::{Pos2, Vec2};

pub const MIN_SCALE: f32 = 0.3;
pub const MAX_SCALE: f32 = 3.0;
pub const INITIAL_SCALE: f32 = 0.7;

/// World to canvas-local transform: `local = translation + world * scale`.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub translation: Vec2,
    pub scale: f32,
    recentre: Option<Recentre>,
}

#[derive(Debug, Clone, PartialEq)]
struct Recentre {
    from_translation: Vec2,
    from_scale: f32,
    to_translation: Vec2,
    to_scale: f32,
    started: f64,
    duration: f64,
}

impl Viewport {
    /// Origin in the middle of the canvas at the initial zoom.
    pub fn initial(canvas_size: Vec2) -> Self {
        Self {
            translation: canvas_size / 2.0,
            scale: INITIAL_SCALE,
            recentre: None,
        }
    }

    pub fn to_local(&self, world: Pos2) -> Pos2 {
        (self.translation + world.to_vec2() * self.scale).to_pos2()
    }

    pub fn to_world(&self, local: Pos2) -> Pos2 {
        ((local.to_vec2() - self.translation) / self.scale).to_pos2()
    }

    #[cfg(test)]
    pub fn is_animating(&self) -> bool {
        self.recentre.is_some()
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.recentre = None;
        self.translation += delta;
    }

    /// Scales by `factor` keeping the world point under `anchor` fixed.
    pub fn zoom_at(&mut self, anchor: Pos2, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        self.recentre = None;
        let world = self.to_world(anchor);
        self.scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        self.translation = anchor.to_vec2() - world.to_vec2() * self.scale;
    }

    /// Eases back to the initial view. Frames before `starts_at` keep the
    /// current transform.
    pub fn start_recentre(&mut self, canvas_size: Vec2, starts_at: f64, duration: f64) {
        let target = Self::initial(canvas_size);
        if duration <= 0.0 {
            *self = target;
            return;
        }
        self.recentre = Some(Recentre {
            from_translation: self.translation,
            from_scale: self.scale,
            to_translation: target.translation,
            to_scale: target.scale,
            started: starts_at,
            duration,
        });
    }

    /// Advances a running recentre. Returns true while more frames are needed.
    pub fn tick(&mut self, now: f64) -> bool {
        let Some(anim) = &self.recentre else {
            return false;
        };
        let t = ((now - anim.started) / anim.duration).clamp(0.0, 1.0) as f32;
        if t >= 1.0 {
            self.translation = anim.to_translation;
            self.scale = anim.to_scale;
            self.recentre = None;
            return false;
        }
        let eased = easing::cubic_in_out(t);
        self.translation =
            anim.from_translation + (anim.to_translation - anim.from_translation) * eased;
        self.scale = anim.from_scale + (anim.to_scale - anim.from_scale) * eased;
        true
    }
}
