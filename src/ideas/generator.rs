use super::{IdeaArea, IdeaCatalog};
use crate::event::AppEvent;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use tokio::runtime::Handle;
use tokio::time::{self, Duration};
use tracing::{debug, warn};

/// Looks ideas up after a fixed delay and reports them over the app
/// channel. One request runs at a time.
#[derive(Clone)]
pub struct IdeaGenerator {
    catalog: Arc<IdeaCatalog>,
    tx: mpsc::Sender<AppEvent>,
    runtime_handle: Handle,
    delay: Duration,
    busy: Arc<AtomicBool>,
}

impl IdeaGenerator {
    pub fn new(
        catalog: IdeaCatalog,
        tx: mpsc::Sender<AppEvent>,
        runtime_handle: Handle,
        delay: Duration,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            tx,
            runtime_handle,
            delay,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Returns false when a request is already running.
    pub fn request(&self, area: IdeaArea, context: String, repaint: Option<egui::Context>) -> bool {
        if self.busy.swap(true, Ordering::AcqRel) {
            debug!(?area, "idea request ignored, generator busy");
            return false;
        }

        let catalog = Arc::clone(&self.catalog);
        let tx = self.tx.clone();
        let busy = Arc::clone(&self.busy);
        let delay = self.delay;

        self.runtime_handle.spawn(async move {
            time::sleep(delay).await;
            let ideas = catalog.ideas_for(area, &context);
            debug!(?area, count = ideas.len(), "ideas generated");
            busy.store(false, Ordering::Release);
            let event = if ideas.is_empty() {
                AppEvent::GeneratorError(format!("no ideas available for {}", area.label()))
            } else {
                AppEvent::IdeasReady { area, ideas }
            };
            if tx.send(event).is_err() {
                warn!("idea result dropped: event channel closed");
            }
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("test runtime should build")
    }

    #[test]
    fn delivers_ideas_after_the_delay() {
        let runtime = runtime();
        let (tx, rx) = mpsc::channel();
        let generator = IdeaGenerator::new(
            IdeaCatalog::builtin().expect("embedded catalog"),
            tx,
            runtime.handle().clone(),
            Duration::from_millis(20),
        );

        assert!(generator.request(IdeaArea::Education, "evenings".to_string(), None));
        assert!(!generator.request(IdeaArea::Values, String::new(), None));

        match rx.recv_timeout(std::time::Duration::from_secs(5)) {
            Ok(AppEvent::IdeasReady { area, ideas }) => {
                assert_eq!(area, IdeaArea::Education);
                assert_eq!(ideas.len(), 5);
                assert!(ideas[0].description.contains("(Context: evenings...)"));
            }
            other => panic!("expected ideas, got {other:?}"),
        }
        assert!(!generator.is_busy());
    }

    #[test]
    fn empty_area_reports_an_error() {
        let runtime = runtime();
        let (tx, rx) = mpsc::channel();
        let generator = IdeaGenerator::new(
            IdeaCatalog::default(),
            tx,
            runtime.handle().clone(),
            Duration::ZERO,
        );
        assert!(generator.request(IdeaArea::Creativity, String::new(), None));
        match rx.recv_timeout(std::time::Duration::from_secs(5)) {
            Ok(AppEvent::GeneratorError(message)) => assert!(message.contains("Creativity")),
            other => panic!("expected generator error, got {other:?}"),
        }
    }
}
