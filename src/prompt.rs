//! Prompt templates for solving and generating questions.
//!
//! One template per language, filled from small lookup tables for question
//! type and difficulty, instead of a hand-written prompt per combination.

use std::str::FromStr;

use qbank_ir::{Language, SectionKind};

use crate::completion::ChatMessage;

pub const MIN_GENERATED: u32 = 1;
pub const MAX_GENERATED: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QuestionType {
    #[default]
    ShortAnswer,
    MultipleChoice,
    FillInTheBlanks,
    TrueFalse,
}

impl QuestionType {
    fn instruction(self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => {
                "Each question must offer exactly four options, written on separate lines as a) b) c) d)."
            }
            QuestionType::FillInTheBlanks => {
                "Each question must be a sentence containing one blank written as ____."
            }
            QuestionType::ShortAnswer => {
                "Each question must be answerable with a few lines of working."
            }
            QuestionType::TrueFalse => {
                "Each question must be a statement that is either True or False."
            }
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "mcq" | "multiplechoice" | "multiplechoicequestions" => Ok(QuestionType::MultipleChoice),
            "fillintheblanks" | "fillintheblank" | "blanks" => Ok(QuestionType::FillInTheBlanks),
            "shortanswer" | "shortanswertype" | "short" => Ok(QuestionType::ShortAnswer),
            "truefalse" | "tf" => Ok(QuestionType::TrueFalse),
            other => Err(format!("unknown question type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}

/// Lookup key for a generation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PromptKey {
    pub language: Language,
    pub question_type: QuestionType,
    pub difficulty: Difficulty,
}

/// System and user messages for one completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    pub fn messages(&self) -> Vec<ChatMessage> {
        vec![ChatMessage::system(&self.system), ChatMessage::user(&self.user)]
    }
}

struct LanguageTemplate {
    language: Language,
    language_name: &'static str,
    difficulty: [(Difficulty, &'static str); 3],
    steps_marker: &'static str,
}

const LANGUAGE_TEMPLATES: [LanguageTemplate; 2] = [
    LanguageTemplate {
        language: Language::English,
        language_name: "English",
        difficulty: [
            (Difficulty::Easy, "easy"),
            (Difficulty::Medium, "medium"),
            (Difficulty::Hard, "hard"),
        ],
        steps_marker: "Steps:",
    },
    LanguageTemplate {
        language: Language::Hindi,
        language_name: "Hindi (हिन्दी)",
        difficulty: [
            (Difficulty::Easy, "आसान (easy)"),
            (Difficulty::Medium, "मध्यम (medium)"),
            (Difficulty::Hard, "कठिन (hard)"),
        ],
        steps_marker: "चरण:",
    },
];

const GENERATE_SYSTEM: &str = "You are an experienced mathematics teacher. Generate questions similar to the given examples, following these guidelines:
1. Use LaTeX formatting for mathematical expressions (use $ for inline math and $$ for display math)
2. {type_instruction}
3. Write all questions and answers in {language_name}, keeping the section headers exactly as shown.";

const GENERATE_USER: &str = "Based on these example questions:

{examples}

Generate {count} new {difficulty} difficulty questions with the following structure:

{questions_header}
1. [First question]
2. [Second question]
...

{answers_header}
1. [Answer to first question with steps, starting the working with \"{steps}\"]
2. [Answer to second question with steps]
...";

const SOLVE_SYSTEM: &str = "You are a math tutor.";
const SOLVE_INTRO: &str = "Please solve the following mathematics questions step by step:\n\n";

fn template_for(language: Language) -> &'static LanguageTemplate {
    LANGUAGE_TEMPLATES
        .iter()
        .find(|t| t.language == language)
        .unwrap_or(&LANGUAGE_TEMPLATES[0])
}

/// Replace `{key}` placeholders in order. Values are not rescanned by earlier
/// keys, so user text belongs in the last pair.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in values {
        out = out.replace(&format!("{{{}}}", key), value);
    }
    out
}

/// Prompt asking for step-by-step solutions. Solutions are requested in
/// English; translation happens afterwards.
pub fn solve_prompt(questions: &[String]) -> Prompt {
    let mut user = String::from(SOLVE_INTRO);
    for (i, question) in questions.iter().enumerate() {
        user.push_str(&format!("Question {}: {}\n", i + 1, question));
    }
    Prompt {
        system: SOLVE_SYSTEM.to_string(),
        user,
    }
}

/// Prompt asking for `count` similar questions with answers. `count` is
/// clamped to `1..=10`.
pub fn generate_prompt(questions: &[String], key: PromptKey, count: u32) -> Prompt {
    let template = template_for(key.language);
    let difficulty = template
        .difficulty
        .iter()
        .find(|(d, _)| *d == key.difficulty)
        .map(|(_, name)| *name)
        .unwrap_or("medium");
    let examples = questions
        .iter()
        .enumerate()
        .map(|(i, q)| format!("Example {}: {}", i + 1, q))
        .collect::<Vec<_>>()
        .join("\n");
    let count = count.clamp(MIN_GENERATED, MAX_GENERATED).to_string();

    let system = fill(
        GENERATE_SYSTEM,
        &[
            ("type_instruction", key.question_type.instruction()),
            ("language_name", template.language_name),
        ],
    );
    let user = fill(
        GENERATE_USER,
        &[
            ("count", &count),
            ("difficulty", difficulty),
            ("questions_header", SectionKind::Questions.header(key.language)),
            ("answers_header", SectionKind::Answers.header(key.language)),
            ("steps", template.steps_marker),
            ("examples", &examples),
        ],
    );
    Prompt { system, user }
}
