use crate::theme::Theme;
use chrono::{DateTime, Local};
use eframe::egui::{self, Align2, Color32, RichText};
use std::time::Duration;

const MAX_DIAGNOSTICS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    fn colour(&self, theme: &Theme) -> Color32 {
        match self {
            Self::Info => theme.info,
            Self::Success => theme.success,
            Self::Warning => theme.warning,
            Self::Error => theme.danger,
        }
    }

    fn text_colour(&self) -> Color32 {
        match self {
            Self::Warning => Color32::BLACK,
            _ => Color32::WHITE,
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "ok",
            Self::Warning => "warn",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    expires_at: f64,
}

/// Transient toasts plus a bounded history of everything shown.
#[derive(Debug, Clone)]
pub struct Notices {
    lifetime: f64,
    active: Vec<Notice>,
    diagnostics: Vec<String>,
}

impl Notices {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            lifetime: lifetime.as_secs_f64(),
            active: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>, now: f64) {
        self.push_at(level, message, now, Local::now());
    }

    fn push_at(
        &mut self,
        level: NoticeLevel,
        message: impl Into<String>,
        now: f64,
        stamp: DateTime<Local>,
    ) {
        let message = message.into();
        self.diagnostics.push(format!(
            "[{}] {:<5} {}",
            stamp.format("%H:%M:%S"),
            level.tag(),
            message
        ));
        if self.diagnostics.len() > MAX_DIAGNOSTICS {
            let overflow = self.diagnostics.len() - MAX_DIAGNOSTICS;
            self.diagnostics.drain(..overflow);
        }
        self.active.push(Notice {
            level,
            message,
            expires_at: now + self.lifetime,
        });
    }

    /// Drops expired toasts. Returns true while any remain visible.
    pub fn prune(&mut self, now: f64) -> bool {
        self.active.retain(|notice| notice.expires_at > now);
        !self.active.is_empty()
    }

    pub fn active(&self) -> &[Notice] {
        &self.active
    }

    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    pub fn show(&self, ctx: &egui::Context, theme: &Theme) {
        if self.active.is_empty() {
            return;
        }
        egui::Area::new(egui::Id::new("notices"))
            .anchor(Align2::RIGHT_TOP, egui::vec2(-20.0, 56.0))
            .order(egui::Order::Foreground)
            .interactable(false)
            .show(ctx, |ui| {
                ui.set_max_width(320.0);
                for notice in &self.active {
                    theme.notice_frame(notice.level.colour(theme)).show(ui, |ui| {
                        ui.label(
                            RichText::new(&notice.message)
                                .color(notice.level.text_colour())
                                .strong(),
                        );
                    });
                    ui.add_space(theme.spacing_4);
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn notices_expire_after_their_lifetime() {
        let mut notices = Notices::new(Duration::from_millis(3000));
        notices.push(NoticeLevel::Success, "saved", 1.0);
        notices.push(NoticeLevel::Warning, "pick an idea", 2.5);

        assert!(notices.prune(3.9));
        assert_eq!(notices.active().len(), 2);
        assert!(notices.prune(4.2));
        assert_eq!(notices.active().len(), 1);
        assert_eq!(notices.active()[0].message, "pick an idea");
        assert!(!notices.prune(6.0));
        assert_eq!(notices.diagnostics().len(), 2);
    }

    #[test]
    fn diagnostics_are_stamped_and_bounded() {
        let mut notices = Notices::new(Duration::from_secs(1));
        let stamp = Local
            .with_ymd_and_hms(2025, 3, 4, 9, 15, 0)
            .single()
            .expect("unambiguous local time");
        for index in 0..(MAX_DIAGNOSTICS + 5) {
            notices.push_at(NoticeLevel::Error, format!("failure {index}"), 0.0, stamp);
        }
        assert_eq!(notices.diagnostics().len(), MAX_DIAGNOSTICS);
        assert_eq!(notices.diagnostics()[0], "[09:15:00] error failure 5");
    }
}
