//! Curriculum question bank and the ordered selection queue.

use std::path::Path;

use indexmap::IndexSet;
use serde::Deserialize;

use crate::utils::error::{QbankError, QbankResult};

/// One chapter file: `{"exercises": [{"exercise": "1.1", "questions": [...]}]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionBank {
    #[serde(default)]
    pub chapter: Option<String>,
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Exercise {
    #[serde(deserialize_with = "string_or_number")]
    pub exercise: String,
    pub questions: Vec<BankQuestion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BankQuestion {
    pub question: String,
    #[serde(default)]
    pub sub_questions: Vec<String>,
}

// Exercise ids are written both as "1.1" and as bare numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }
    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

impl QuestionBank {
    pub fn from_json_str(source: &str) -> QbankResult<Self> {
        serde_json::from_str(source).map_err(|e| QbankError::bank(e.to_string()))
    }

    pub fn load(path: &Path) -> QbankResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json_str(&source)
    }

    pub fn exercise_names(&self) -> Vec<&str> {
        self.exercises.iter().map(|e| e.exercise.as_str()).collect()
    }

    pub fn exercise(&self, name: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.exercise == name)
    }

    /// Selectable question strings for an exercise, labelled
    /// `Question {i}: {text}` and, per sub-question,
    /// `Question {i}: {text} {i}.{j} {sub}`.
    pub fn questions_for(&self, name: &str) -> QbankResult<Vec<String>> {
        let exercise = self
            .exercise(name)
            .ok_or_else(|| QbankError::bank(format!("no exercise named '{}'", name)))?;
        Ok(exercise.selectable_questions())
    }
}

impl Exercise {
    pub fn selectable_questions(&self) -> Vec<String> {
        let mut out = Vec::new();
        for (i, question) in self.questions.iter().enumerate() {
            let label = format!("Question {}: {}", i + 1, question.question);
            if question.sub_questions.is_empty() {
                out.push(label);
                continue;
            }
            for (j, sub) in question.sub_questions.iter().enumerate() {
                out.push(format!("{} {}.{} {}", label, i + 1, j + 1, sub));
            }
        }
        out
    }
}

/// Insertion-ordered, duplicate-free set of selected questions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionQueue {
    selected: IndexSet<String>,
}

impl QuestionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the question was already selected.
    pub fn select(&mut self, question: impl Into<String>) -> bool {
        self.selected.insert(question.into())
    }

    /// Returns `false` when the question was not selected.
    pub fn deselect(&mut self, question: &str) -> bool {
        self.selected.shift_remove(question)
    }

    /// Mirror a checkbox state.
    pub fn set(&mut self, question: &str, checked: bool) {
        if checked {
            self.select(question);
        } else {
            self.deselect(question);
        }
    }

    pub fn contains(&self, question: &str) -> bool {
        self.selected.contains(question)
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    /// Ordered snapshot for a request.
    pub fn snapshot(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CHAPTER: &str = r#"{
        "chapter": "Real Numbers",
        "exercises": [
            {
                "exercise": "1.1",
                "questions": [
                    {"question": "Express each number as a product of its prime factors:",
                     "sub_questions": ["140", "156"]},
                    {"question": "Check whether 6^n can end with the digit 0."}
                ]
            },
            {"exercise": 2, "questions": []}
        ]
    }"#;

    #[test]
    fn labels_questions_like_the_viewer() {
        let bank = QuestionBank::from_json_str(CHAPTER).unwrap();
        assert_eq!(bank.exercise_names(), vec!["1.1", "2"]);
        let questions = bank.questions_for("1.1").unwrap();
        assert_eq!(
            questions,
            vec![
                "Question 1: Express each number as a product of its prime factors: 1.1 140",
                "Question 1: Express each number as a product of its prime factors: 1.2 156",
                "Question 2: Check whether 6^n can end with the digit 0.",
            ]
        );
    }

    #[test]
    fn unknown_exercise_is_error() {
        let bank = QuestionBank::from_json_str(CHAPTER).unwrap();
        assert!(matches!(
            bank.questions_for("9.9"),
            Err(QbankError::QuestionBank { .. })
        ));
    }

    #[test]
    fn malformed_json_is_error() {
        assert!(QuestionBank::from_json_str("{\"exercises\": 3}").is_err());
    }

    #[test]
    fn queue_keeps_order_and_uniqueness() {
        let mut queue = QuestionQueue::new();
        assert!(queue.select("b"));
        assert!(queue.select("a"));
        assert!(!queue.select("b"));
        queue.set("c", true);
        queue.set("a", false);
        assert_eq!(queue.snapshot(), vec!["b", "c"]);
        assert!(!queue.deselect("zzz"));
        queue.clear();
        assert!(queue.is_empty());
    }
}
