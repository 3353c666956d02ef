//! In-memory session: the current job description and the uploaded resumes.
//!
//! One global session per process; nothing is persisted and a restart clears it.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// An uploaded resume with its extracted text and original bytes.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeRecord {
    pub id: Uuid,
    /// Original file name; unique within the session.
    pub name: String,
    #[serde(skip)]
    pub text: String,
    #[serde(skip)]
    pub file_data: Bytes,
    pub content_type: String,
    pub uploaded_at: DateTime<Utc>,
}

impl ResumeRecord {
    pub fn new(name: String, text: String, file_data: Bytes, content_type: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            text,
            file_data,
            content_type,
            uploaded_at: Utc::now(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Session {
    jd: Option<String>,
    resumes: Vec<ResumeRecord>,
}

impl Session {
    pub fn jd(&self) -> Option<&str> {
        self.jd.as_deref()
    }

    /// Replaces the job description.
    pub fn set_jd(&mut self, text: String) {
        self.jd = Some(text);
    }

    pub fn resumes(&self) -> &[ResumeRecord] {
        &self.resumes
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resumes.iter().any(|r| r.name == name)
    }

    /// Adds a resume unless one with the same name is already stored.
    /// Returns whether it was added.
    pub fn add_resume(&mut self, record: ResumeRecord) -> bool {
        if self.contains(&record.name) {
            return false;
        }
        self.resumes.push(record);
        true
    }

    pub fn find(&self, name: &str) -> Option<&ResumeRecord> {
        self.resumes.iter().find(|r| r.name == name)
    }

    pub fn clear(&mut self) {
        self.jd = None;
        self.resumes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> ResumeRecord {
        ResumeRecord::new(
            name.to_string(),
            "python developer".to_string(),
            Bytes::from_static(b"python developer"),
            "text/plain".to_string(),
        )
    }

    #[test]
    fn duplicate_names_are_skipped() {
        let mut session = Session::default();
        assert!(session.add_resume(record("alice.txt")));
        assert!(!session.add_resume(record("alice.txt")));
        assert!(session.add_resume(record("bob.txt")));
        assert_eq!(session.resumes().len(), 2);
    }

    #[test]
    fn set_jd_replaces_previous() {
        let mut session = Session::default();
        session.set_jd("first".to_string());
        session.set_jd("second".to_string());
        assert_eq!(session.jd(), Some("second"));
    }

    #[test]
    fn clear_resets_everything() {
        let mut session = Session::default();
        session.set_jd("jd".to_string());
        session.add_resume(record("a.txt"));
        session.clear();
        assert!(session.jd().is_none());
        assert!(session.resumes().is_empty());
    }

    #[test]
    fn find_by_name() {
        let mut session = Session::default();
        session.add_resume(record("a.txt"));
        assert!(session.find("a.txt").is_some());
        assert!(session.find("missing.txt").is_none());
    }

    #[test]
    fn serialized_record_omits_text_and_bytes() {
        let json = serde_json::to_value(record("a.txt")).unwrap();
        assert_eq!(json["name"], "a.txt");
        assert!(json.get("text").is_none());
        assert!(json.get("file_data").is_none());
    }
}
