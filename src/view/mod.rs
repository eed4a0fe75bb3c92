//! Pure render helpers: plain data in, displayable fragments out.
//!
//! Nothing in this module touches the network or mutates its input, and
//! every string passes through as plain text. The egui adapter in
//! `app.rs` turns these fragments into widgets.

use crate::api::types::Project;
use crate::state::{ChatMessage, ChatSender};
use chrono::{Datelike, NaiveDate};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectCard {
    pub title: String,
    pub subtitle: String,
}

pub fn project_card(project: &Project) -> ProjectCard {
    ProjectCard {
        title: project.name.clone(),
        subtitle: format!(
            "{} • {}",
            project.tech_stack,
            format_created_at(&project.created_at)
        ),
    }
}

/// `2025-01-01` (or an RFC 3339 prefix of it) becomes `1/1/2025`;
/// anything unparseable is shown verbatim.
fn format_created_at(raw: &str) -> String {
    let date_part = raw.get(..10).unwrap_or(raw);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => format!("{}/{}/{}", date.month(), date.day(), date.year()),
        Err(_) => raw.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatBubble {
    pub label: &'static str,
    pub text: String,
    pub typing: bool,
    pub from_user: bool,
}

pub fn chat_bubble(message: &ChatMessage) -> ChatBubble {
    ChatBubble {
        label: message.sender.label(),
        text: message.text.clone(),
        typing: message.is_typing,
        from_user: message.sender == ChatSender::You,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileTreeRow {
    Folder { name: String },
    File { name: String, depth: u8 },
}

/// The rendered shape of a `file_structure` payload. The backend is not
/// consistent about sending one, so absence or a non-list value maps to
/// an explicit placeholder instead of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileTreeView {
    Rows(Vec<FileTreeRow>),
    Placeholder,
}

impl FileTreeView {
    pub const PLACEHOLDER_TEXT: &'static str = "no structure available";
}

pub fn file_tree(structure: Option<&Value>) -> FileTreeView {
    let Some(Value::Array(entries)) = structure else {
        return FileTreeView::Placeholder;
    };
    if entries.is_empty() {
        return FileTreeView::Placeholder;
    }

    let mut rows = Vec::new();
    for entry in entries {
        match entry {
            Value::String(name) => rows.push(FileTreeRow::File {
                name: name.clone(),
                depth: 0,
            }),
            Value::Object(fields) => {
                let name = fields
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or("unnamed")
                    .to_string();
                let is_folder = fields
                    .get("type")
                    .and_then(Value::as_str)
                    .map(|kind| kind == "folder")
                    .unwrap_or(false);
                if is_folder {
                    rows.push(FileTreeRow::Folder { name });
                    if let Some(Value::Array(children)) = fields.get("children") {
                        for child in children {
                            let child_name = match child {
                                Value::String(name) => name.clone(),
                                Value::Object(child_fields) => child_fields
                                    .get("name")
                                    .and_then(Value::as_str)
                                    .unwrap_or("unnamed")
                                    .to_string(),
                                _ => continue,
                            };
                            rows.push(FileTreeRow::File {
                                name: child_name,
                                depth: 1,
                            });
                        }
                    }
                } else {
                    rows.push(FileTreeRow::File { name, depth: 0 });
                }
            }
            _ => {}
        }
    }

    if rows.is_empty() {
        FileTreeView::Placeholder
    } else {
        FileTreeView::Rows(rows)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressView {
    pub percent: u8,
    pub caption: String,
}

pub fn build_progress(percent: u8) -> ProgressView {
    ProgressView {
        percent: percent.min(100),
        caption: format!("Building... {}%", percent.min(100)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Project;
    use crate::event::AppEvent;
    use crate::state::WorkbenchState;
    use serde_json::json;
    use std::time::Instant;

    #[test]
    fn project_card_formats_tech_stack_and_date() {
        let project = Project {
            id: json!(1),
            name: "Demo".to_string(),
            tech_stack: "react".to_string(),
            created_at: "2025-01-01".to_string(),
        };
        let card = project_card(&project);
        assert_eq!(card.title, "Demo");
        assert_eq!(card.subtitle, "react • 1/1/2025");
    }

    #[test]
    fn project_card_passes_unparseable_dates_through() {
        let project = Project {
            id: json!(2),
            name: "Odd".to_string(),
            tech_stack: "vue".to_string(),
            created_at: "yesterday".to_string(),
        };
        assert_eq!(project_card(&project).subtitle, "vue • yesterday");
    }

    #[test]
    fn file_tree_indents_folder_children_one_level() {
        let structure = json!([
            {"name": "src", "type": "folder", "children": ["main.py", "util.py"]},
            "README.md"
        ]);
        let view = file_tree(Some(&structure));
        assert_eq!(
            view,
            FileTreeView::Rows(vec![
                FileTreeRow::Folder {
                    name: "src".to_string()
                },
                FileTreeRow::File {
                    name: "main.py".to_string(),
                    depth: 1
                },
                FileTreeRow::File {
                    name: "util.py".to_string(),
                    depth: 1
                },
                FileTreeRow::File {
                    name: "README.md".to_string(),
                    depth: 0
                },
            ])
        );
    }

    #[test]
    fn file_tree_handles_missing_or_malformed_structure() {
        assert_eq!(file_tree(None), FileTreeView::Placeholder);
        assert_eq!(
            file_tree(Some(&json!("not a list"))),
            FileTreeView::Placeholder
        );
        assert_eq!(file_tree(Some(&json!([]))), FileTreeView::Placeholder);
        assert_eq!(file_tree(Some(&json!([42]))), FileTreeView::Placeholder);
    }

    #[test]
    fn end_to_end_build_success_renders_expected_card() {
        let mut state = WorkbenchState::default();
        state.builder.name = "Demo".to_string();
        state.builder.description = "test app".to_string();
        state.begin_build();

        let response: Project = serde_json::from_value(json!({
            "id": 1,
            "name": "Demo",
            "tech_stack": "react",
            "created_at": "2025-01-01"
        }))
        .expect("stub project should deserialize");
        state.apply(AppEvent::BuildFinished(Ok(response)), Instant::now());

        assert_eq!(state.recent_projects.len(), 1);
        let card = project_card(&state.recent_projects[0]);
        assert_eq!(card.title, "Demo");
        assert_eq!(card.subtitle, "react • 1/1/2025");
        assert!(state.builder.name.is_empty());
        assert!(state.builder.description.is_empty());
        assert!(!state.build_in_flight);
    }
}
