//! Solve and generate requests
//!
//! Each request carries its own [`RequestContext`]; nothing is shared between
//! requests except the providers, which are borrowed. Network calls happen
//! only in [`solve`] and [`generate`]; the response handling that follows is
//! available separately as [`process_solve_response`] and
//! [`process_generate_response`].

use tracing::{info, warn};

use qbank_ir::{GeneratedDocument, Language};

use crate::bank::QuestionQueue;
use crate::completion::{CompletionProvider, CompletionRequest};
use crate::config::{CompletionConfig, ExportOptions};
use crate::core::latex::latex_to_markdown_math;
use crate::core::segment::segment;
use crate::prompt::{generate_prompt, solve_prompt, Difficulty, PromptKey, QuestionType};
use crate::render::{export_pdf, render_screen, screen_to_markdown, MathConvention, ScreenBlock};
use crate::translate::{translate_protected, TranslationProvider};
use crate::utils::error::{PipelineWarning, QbankError, QbankResult, Stage};

pub const NO_SELECTION: &str =
    "No questions selected to solve. Please select questions from the main page.";

/// Everything one request needs from the session, captured up front.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestContext {
    pub language: Language,
    pub questions: Vec<String>,
}

impl RequestContext {
    pub fn new(language: Language, questions: Vec<String>) -> Self {
        Self {
            language,
            questions,
        }
    }

    pub fn from_queue(queue: &QuestionQueue, language: Language) -> Self {
        Self::new(language, queue.snapshot())
    }

    fn require_questions(&self) -> QbankResult<()> {
        if self.questions.is_empty() {
            return Err(QbankError::invalid(NO_SELECTION));
        }
        Ok(())
    }
}

/// Options for similar-question generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateParams {
    pub question_type: QuestionType,
    pub difficulty: Difficulty,
    pub count: u32,
}

impl Default for GenerateParams {
    fn default() -> Self {
        Self {
            question_type: QuestionType::default(),
            difficulty: Difficulty::default(),
            count: 5,
        }
    }
}

/// Result of a request: the segmented document plus anything that degraded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    pub document: GeneratedDocument,
    pub convention: MathConvention,
    pub warnings: Vec<PipelineWarning>,
}

impl PipelineOutput {
    pub fn screen(&self) -> Vec<ScreenBlock> {
        render_screen(&self.document, self.convention)
    }

    pub fn markdown(&self) -> String {
        screen_to_markdown(&self.screen())
    }

    pub fn pdf(&self, options: &ExportOptions) -> QbankResult<Vec<u8>> {
        export_pdf(&self.document, options)
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Post-process a solution reply: translate when the request is not in
/// English, then segment for boxed-math display.
pub fn process_solve_response(
    raw: &str,
    language: Language,
    translator: Option<&dyn TranslationProvider>,
) -> PipelineOutput {
    let mut warnings = Vec::new();
    let text = match (language, translator) {
        (Language::English, _) => raw.to_string(),
        (_, Some(translator)) => {
            let output = translate_protected(translator, raw, language);
            warnings.extend(output.warnings);
            output.content
        }
        (_, None) => {
            warn!(language = %language, "no translation provider configured, answer left in English");
            warnings.push(PipelineWarning::new(
                Stage::Translate,
                "no translation provider configured",
            ));
            raw.to_string()
        }
    };
    let document = segment(&text);
    PipelineOutput {
        document,
        convention: MathConvention::Boxed,
        warnings,
    }
}

/// Post-process a generation reply: rewrite delimiters to `$`/`$$` and
/// segment.
pub fn process_generate_response(raw: &str) -> PipelineOutput {
    let document = segment(&latex_to_markdown_math(raw));
    PipelineOutput {
        document,
        convention: MathConvention::Dollar,
        warnings: Vec::new(),
    }
}

/// Ask for step-by-step solutions to the selected questions.
pub fn solve(
    ctx: &RequestContext,
    completion: &dyn CompletionProvider,
    translator: Option<&dyn TranslationProvider>,
    config: &CompletionConfig,
) -> QbankResult<PipelineOutput> {
    ctx.require_questions()?;
    let prompt = solve_prompt(&ctx.questions);
    let request = CompletionRequest {
        model: config.solve_model.clone(),
        messages: prompt.messages(),
        temperature: None,
    };
    let raw = completion.complete(&request)?;
    let output = process_solve_response(&raw, ctx.language, translator);
    info!(
        questions = ctx.questions.len(),
        items = output.document.item_count(),
        warnings = output.warnings.len(),
        "solve finished"
    );
    Ok(output)
}

/// Ask for new questions similar to the selected ones, written directly in
/// the request language.
pub fn generate(
    ctx: &RequestContext,
    params: &GenerateParams,
    completion: &dyn CompletionProvider,
    config: &CompletionConfig,
) -> QbankResult<PipelineOutput> {
    ctx.require_questions()?;
    let key = PromptKey {
        language: ctx.language,
        question_type: params.question_type,
        difficulty: params.difficulty,
    };
    let prompt = generate_prompt(&ctx.questions, key, params.count);
    let request = CompletionRequest {
        model: config.generate_model.clone(),
        messages: prompt.messages(),
        temperature: Some(config.temperature),
    };
    let raw = completion.complete(&request)?;
    let output = process_generate_response(&raw);
    info!(
        examples = ctx.questions.len(),
        items = output.document.item_count(),
        "generate finished"
    );
    Ok(output)
}
