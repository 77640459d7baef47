// src/guide/mod.rs
pub mod store;

use serde::{Deserialize, Serialize};

use crate::images::ImageIndex;
use crate::palette::{self, Swatch};
use crate::process::{AnswerRecord, CategoryIndex};

/// Result of one full pass: records in encounter order plus the category index.
///
/// Read-only once built. A refresh produces a new `Guide` rather than
/// mutating this one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Guide {
    records: Vec<AnswerRecord>,
    categories: CategoryIndex,
}

impl Guide {
    pub fn new(records: Vec<AnswerRecord>, categories: CategoryIndex) -> Self {
        Self {
            records,
            categories,
        }
    }

    pub fn records(&self) -> &[AnswerRecord] {
        &self.records
    }

    pub fn categories(&self) -> &CategoryIndex {
        &self.categories
    }

    /// Records for exactly `name`, in encounter order.
    pub fn records_for<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a AnswerRecord> + 'a {
        self.records.iter().filter(move |r| r.character == name)
    }

    /// First record for `name`. Characters with no top answer have none, so
    /// their category cannot be recovered here.
    pub fn first_record_for(&self, name: &str) -> Option<&AnswerRecord> {
        self.records.iter().find(|r| r.character == name)
    }

    /// Categories with the names containing `term`; categories left empty are dropped.
    pub fn search(&self, term: &str) -> Vec<CategoryGroup> {
        self.categories
            .iter()
            .filter_map(|(category, names)| {
                let characters: Vec<String> = names
                    .iter()
                    .filter(|n| n.contains(term))
                    .cloned()
                    .collect();
                (!characters.is_empty()).then(|| CategoryGroup {
                    category: category.clone(),
                    swatch: palette::swatch(category),
                    characters,
                })
            })
            .collect()
    }

    /// Build the full screen for one request.
    pub fn view(&self, request: &ViewRequest, images: &ImageIndex) -> GuideView {
        let groups = self
            .search(&request.search)
            .into_iter()
            .map(|group| SidebarGroup {
                entries: group
                    .characters
                    .into_iter()
                    .map(|name| SidebarEntry {
                        selected: request.selected.as_deref() == Some(name.as_str()),
                        image: images.resolve(&name).map(str::to_string),
                        name,
                    })
                    .collect(),
                category: group.category,
                swatch: group.swatch,
            })
            .collect();

        let character = request
            .selected
            .as_deref()
            .map(|name| self.character_panel(name, images));

        GuideView { groups, character }
    }

    pub fn character_panel(&self, name: &str, images: &ImageIndex) -> CharacterPanel {
        let category = self.first_record_for(name).map(|r| r.category.clone());
        CharacterPanel {
            name: name.to_string(),
            header: palette::header_swatch(category.as_deref()),
            category,
            image: images.resolve(name).map(str::to_string),
            lines: self
                .records_for(name)
                .map(|r| Line {
                    question: r.question.clone(),
                    answer: r.answer.clone(),
                })
                .collect(),
        }
    }
}

/// Per-request UI state handed to [`Guide::view`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRequest {
    pub selected: Option<String>,
    #[serde(default)]
    pub search: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryGroup {
    pub category: String,
    pub swatch: Swatch,
    pub characters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuideView {
    pub groups: Vec<SidebarGroup>,
    pub character: Option<CharacterPanel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarGroup {
    pub category: String,
    pub swatch: Swatch,
    pub entries: Vec<SidebarEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarEntry {
    pub name: String,
    pub image: Option<String>,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterPanel {
    pub name: String,
    pub category: Option<String>,
    pub header: Swatch,
    pub image: Option<String>,
    pub lines: Vec<Line>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    pub question: String,
    pub answer: String,
}
