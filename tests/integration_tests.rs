//! Integration tests for the qbank text pipeline

use qbank::{
    latex_document_to_plain, latex_to_markdown_math, latex_to_symbols, looks_like_math, protect,
    render_screen, restore, segment, translate, translate_protected, Language, MathConvention,
    MathSpanProtector, ScreenBlock, SectionKind, TranslateError, TranslationProvider,
};

// ============================================================================
// Math span protection
// ============================================================================

mod protection {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLES: &[&str] = &[
        "",
        "no math at all",
        "Area is \\[\\pi r^2\\] square units.",
        "Answer: \\boxed{42} and \\boxed{x = 3}",
        "multi\n\\[\na + b\n\\]\nline",
        "unterminated \\[ x + 1",
        "unterminated \\boxed{ x",
        "already has __MATH_0__ in it \\[y\\]",
        "Hindi: उत्तर \\[x=1\\] है",
        "\\boxed{\\frac{1}{2}}",
    ];

    #[test]
    fn test_round_trip() {
        for text in SAMPLES {
            let (protected, table) = protect(text);
            assert_eq!(restore(&protected, table), *text, "round trip of {:?}", text);
        }
    }

    #[test]
    fn test_placeholder_isolation() {
        let text = "First \\[a^2 + b^2 = c^2\\] then \\boxed{c = 5}.";
        let (protected, table) = protect(text);
        assert_eq!(table.len(), 2);
        assert!(!protected.contains("\\["));
        assert!(!protected.contains("\\]"));
        assert!(!protected.contains("\\boxed{"));
        for (_, original) in table.iter() {
            assert!(!protected.contains(original));
        }
    }

    #[test]
    fn test_unterminated_is_left_alone() {
        let (protected, table) = protect("unterminated \\[ x + 1");
        assert!(table.is_empty());
        assert_eq!(protected, "unterminated \\[ x + 1");
    }

    #[test]
    fn test_existing_placeholder_text_survives() {
        let text = "literal __MATH_0__ and \\[z\\]";
        let (protected, table) = protect(text);
        assert!(protected.starts_with("literal __MATH_0__ and "));
        assert_eq!(restore(&protected, table), text);
    }

    #[test]
    fn test_inline_protection_is_opt_in() {
        let text = "where \\(x > 0\\)";
        assert!(protect(text).1.is_empty());
        let (protected, table) = MathSpanProtector::new().with_inline(true).protect(text);
        assert_eq!(table.len(), 1);
        assert!(!protected.contains("\\("));
    }
}

// ============================================================================
// LaTeX normalisation and classification
// ============================================================================

mod normalisation {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_symbol_table() {
        assert_eq!(latex_to_symbols("\\frac{1}{2}"), "1/2");
        assert_eq!(latex_to_symbols("\\sqrt{4}"), "√4");
        assert_eq!(latex_to_symbols("x^{2}"), "x²");
        assert_eq!(latex_to_symbols("\\alpha"), "α");
    }

    #[test]
    fn test_unknown_commands_verbatim() {
        assert_eq!(latex_to_symbols("\\mathcal{F}"), "\\mathcal{F}");
    }

    #[test]
    fn test_markdown_delimiters() {
        assert_eq!(
            latex_to_markdown_math("\\(x^2\\) and \\[y\\]"),
            "$x²$ and $$y$$"
        );
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(latex_document_to_plain("Since $\\alpha \\leq 2$, done"), "Since α ≤ 2, done");
    }

    #[test]
    fn test_math_line_classification() {
        assert!(looks_like_math("\\frac{1}{2} + \\sqrt{3} = 2"));
        assert!(!looks_like_math("This problem tests fractions."));
    }
}

// ============================================================================
// Segmentation
// ============================================================================

mod segmentation {
    use super::*;
    use pretty_assertions::assert_eq;

    const SCENARIO: &str =
        "Questions:\n1. Solve $x+1=2$\nAnswers:\n1. Steps: subtract 1\nFinal Answer: 1";

    #[test]
    fn test_end_to_end_scenario() {
        let doc = segment(SCENARIO);
        assert_eq!(doc.sections.len(), 2);

        let questions = doc.section(SectionKind::Questions).unwrap();
        assert_eq!(questions.items.len(), 1);
        assert_eq!(questions.items[0].text(), "1. Solve $x+1=2$");

        let answers = doc.section(SectionKind::Answers).unwrap();
        assert_eq!(answers.items.len(), 1);
        assert_eq!(
            answers.items[0].lines,
            vec!["1. Steps: subtract 1", "Final Answer: 1"]
        );
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            SCENARIO,
            "Preface line\n\nQuestions:\n1. a\na) x\nb) y\n\n2. b\nAnswers:\n1. x\nSteps: do it\n2. y",
            "प्रश्न:\n1. हल करें\nउत्तर:\n1. चरण: घटाएँ\nQuestions:\n3. appended",
            "no headers\n1. still kept",
            "Questions:\nfoo\nAnswers:\nbar\nQuestions:\nbaz",
            "Questions:\n1. A\nAnswers:\n1. a\nQuestions:\nStill about A\nSteps: more\nAnswers:\nlate prose",
        ];
        for input in inputs {
            let doc = segment(input);
            let again = segment(&doc.to_text());
            assert_eq!(again, doc, "re-segmenting {:?}", input);
            assert_eq!(again.shape(), doc.shape());
        }
    }

    #[test]
    fn test_repeated_header_prose() {
        let doc = segment("Questions:\nfoo\nAnswers:\nbar\nQuestions:\nbaz");
        assert_eq!(
            doc.shape(),
            vec![(Some(SectionKind::Questions), 1), (Some(SectionKind::Answers), 1)]
        );
        assert_eq!(doc.section(SectionKind::Questions).unwrap().items[0].text(), "foo\nbaz");
    }

    #[test]
    fn test_missing_headers_preserved() {
        let doc = segment("Sure! Here you go.\n1. first\n2. second");
        assert_eq!(doc.sections.len(), 1);
        assert!(doc.unlabeled().is_some());
        assert_eq!(doc.item_count(), 3);
    }
}

// ============================================================================
// Translation
// ============================================================================

mod translation {
    use super::*;
    use pretty_assertions::assert_eq;
    use qbank::translate::interpret_response;
    use std::cell::RefCell;

    struct Status500;

    impl TranslationProvider for Status500 {
        fn translate(&self, _text: &str, _target: &str) -> Result<String, TranslateError> {
            interpret_response(500, r#"{"error":{"code":500}}"#)
        }
    }

    struct Recording {
        seen: RefCell<Vec<(String, String)>>,
    }

    impl TranslationProvider for Recording {
        fn translate(&self, text: &str, target: &str) -> Result<String, TranslateError> {
            self.seen
                .borrow_mut()
                .push((text.to_string(), target.to_string()));
            Ok(format!("[hi] {}", text.replace("Solve", "हल करें")))
        }
    }

    #[test]
    fn test_failure_fallback() {
        let out = translate(&Status500, "Solve x + 1 = 2", Language::Hindi);
        assert_eq!(out.content, "Solve x + 1 = 2");
        assert!(out.has_warnings());
    }

    #[test]
    fn test_protected_translation_keeps_math() {
        let provider = Recording {
            seen: RefCell::new(Vec::new()),
        };
        let text = "Solve \\[x + 1 = 2\\] so \\boxed{x = 1}";
        let out = translate_protected(&provider, text, Language::Hindi);
        assert_eq!(out.content, "[hi] हल करें \\[x + 1 = 2\\] so \\boxed{x = 1}");

        let seen = provider.seen.borrow();
        assert_eq!(seen[0].1, "hi");
        assert!(!seen[0].0.contains("\\["));
    }
}

// ============================================================================
// Rendering
// ============================================================================

mod rendering {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_screen_order_matches_document() {
        let doc = segment("Questions:\n1. a\n2. b\nAnswers:\n1. c\n2. d");
        let blocks = render_screen(&doc, MathConvention::Dollar);
        let texts: Vec<&str> = blocks
            .iter()
            .filter_map(|b| match b {
                ScreenBlock::Heading(t) | ScreenBlock::Markdown(t) => Some(t.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["Questions:", "1. a", "2. b", "Answers:", "1. c", "2. d"]);
    }

    #[test]
    fn test_pdf_has_pages() {
        let doc = segment(&"Questions:\n1. Find the HCF of 96 and 404 by prime factorisation.\n".repeat(120));
        let bytes = qbank::export_pdf(&doc, &qbank::ExportOptions::default()).unwrap();
        let pdf = lopdf::Document::load_mem(&bytes).unwrap();
        assert!(pdf.get_pages().len() > 1);
    }

    #[test]
    fn test_hindi_pdf_keeps_devanagari() {
        let doc = segment("प्रश्न:\n1. x का मान ज्ञात करें\nउत्तर:\n1. चरण: घटाएँ");
        let bytes = qbank::export_pdf(&doc, &qbank::ExportOptions::default()).unwrap();
        let pdf = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(pdf.get_pages().len(), 1);

        let needed = doc.to_text();
        match qbank_pdf_backend::fonts::find_system_font(&needed) {
            Some(found) if found.missing == 0 => {}
            _ => {
                eprintln!("no installed Devanagari font, skipping text extraction");
                return;
            }
        }
        let text: String = pdf_extract::extract_text_from_mem(&bytes)
            .unwrap()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        assert!(!text.contains('?'), "{text:?}");
        for word in ["प्रश्न:", "उत्तर:", "ज्ञात", "घटाएँ"] {
            assert!(text.contains(word), "{word} missing from {text:?}");
        }
    }
}
