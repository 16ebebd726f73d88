use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod generator;

pub use generator::IdeaGenerator;

const BUILTIN_CATALOG: &str = include_str!("data/catalog.json");

pub const MAX_IDEAS: usize = 5;
const CONTEXT_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdeaArea {
    Values,
    Professional,
    Wellbeing,
    Financial,
    Relationships,
    Education,
    Creativity,
}

impl IdeaArea {
    pub const ALL: [IdeaArea; 7] = [
        IdeaArea::Values,
        IdeaArea::Professional,
        IdeaArea::Wellbeing,
        IdeaArea::Financial,
        IdeaArea::Relationships,
        IdeaArea::Education,
        IdeaArea::Creativity,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Values => "Values and principles",
            Self::Professional => "Professional development",
            Self::Wellbeing => "Wellbeing and health",
            Self::Financial => "Finances",
            Self::Relationships => "Relationships",
            Self::Education => "Education",
            Self::Creativity => "Creativity",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Idea {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct IdeaCatalog {
    areas: BTreeMap<IdeaArea, Vec<Idea>>,
}

impl IdeaCatalog {
    pub fn builtin() -> Result<Self, serde_json::Error> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            areas: serde_json::from_str(raw)?,
        })
    }

    /// Up to five ideas for the area. A non-empty context is appended to
    /// every description.
    pub fn ideas_for(&self, area: IdeaArea, context: &str) -> Vec<Idea> {
        let context = context.trim();
        let suffix = (!context.is_empty()).then(|| {
            let cut: String = context.chars().take(CONTEXT_CHARS).collect();
            format!(" (Context: {cut}...)")
        });

        self.areas
            .get(&area)
            .map(|ideas| ideas.as_slice())
            .unwrap_or_default()
            .iter()
            .take(MAX_IDEAS)
            .map(|idea| Idea {
                title: idea.title.clone(),
                description: match &suffix {
                    Some(suffix) => format!("{}{suffix}", idea.description),
                    None => idea.description.clone(),
                },
            })
            .collect()
    }
}
