use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(with = "super::timestamp")]
    pub created_date: DateTime<Utc>,
    #[serde(with = "super::timestamp")]
    pub modified_date: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub archived: bool,
}

fn default_category() -> String {
    "General".into()
}

/// Input for a new note.
#[derive(Debug, Clone)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: Vec<String>,
}

impl NewNote {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: String::new(),
            category: default_category(),
            tags: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteBook {
    pub notes: Vec<Note>,
    pub categories: Vec<String>,
    pub next_id: u64,
}

impl Default for NoteBook {
    fn default() -> Self {
        Self {
            notes: Vec::new(),
            categories: ["General", "Ideas", "Tasks", "Reminders"]
                .into_iter()
                .map(String::from)
                .collect(),
            next_id: 1,
        }
    }
}

impl NoteBook {
    pub fn add(&mut self, new: NewNote, now: DateTime<Utc>) -> &Note {
        let note = Note {
            id: self.next_id,
            title: new.title,
            content: new.content,
            category: new.category,
            created_date: now,
            modified_date: now,
            tags: new.tags,
            archived: false,
        };
        self.next_id += 1;
        self.notes.push(note);
        &self.notes[self.notes.len() - 1]
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut Note> {
        self.notes.iter_mut().find(|n| n.id == id)
    }

    /// Notes that are not archived.
    pub fn active(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter().filter(|n| !n.archived)
    }
}

impl Note {
    /// Set the archived flag. Returns false if it already had that value.
    pub fn set_archived(&mut self, archived: bool, now: DateTime<Utc>) -> bool {
        if self.archived == archived {
            return false;
        }
        self.archived = archived;
        self.modified_date = now;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_increase_and_archive_hides_notes() {
        let now = Utc::now();
        let mut book = NoteBook::default();
        assert_eq!(book.add(NewNote::titled("a"), now).id, 1);
        assert_eq!(book.add(NewNote::titled("b"), now).id, 2);
        assert_eq!(book.active().count(), 2);

        let note = book.get_mut(1).unwrap();
        assert!(note.set_archived(true, now));
        assert!(!note.set_archived(true, now));
        assert_eq!(book.active().count(), 1);
    }

    #[test]
    fn reads_notes_written_by_the_panel_scripts() {
        let raw = r#"{
            "notes": [{
                "id": 3, "title": "Idea", "content": "ship it", "category": "Ideas",
                "created_date": "2024-05-03 10:00:00.123456",
                "modified_date": "2024-05-04 09:30:00",
                "tags": ["work"], "archived": false
            }],
            "next_id": 4
        }"#;
        let book: NoteBook = serde_json::from_str(raw).unwrap();
        assert_eq!(book.categories.len(), 4);
        let note = &book.notes[0];
        assert_eq!(note.tags, vec!["work".to_string()]);
        assert!(note.modified_date > note.created_date);
    }
}
