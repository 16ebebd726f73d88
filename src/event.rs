use crate::ideas::{Idea, IdeaArea};

/// Work finished off the UI thread, drained once per frame.
#[derive(Debug, Clone)]
pub enum AppEvent {
    IdeasReady { area: IdeaArea, ideas: Vec<Idea> },
    GeneratorError(String),
}
