//! Prompt builder for shayari generation.
//!
//! [`PromptBuilder::compose`] turns a [`GenerationRequest`] into the single
//! instruction string sent to the model. Sections, in order:
//!
//! 1. Language + theme instruction
//! 2. Inclusion clause for `custom_input` (only when it is not blank)
//! 3. Approximate line count
//! 4. Fixed closing instruction (tone + "only the text")

use super::request::GenerationRequest;

/// Closing instruction appended to every prompt. The line break, trailing
/// space and indent are part of the wording the model has always been sent.
const CLOSING_INSTRUCTION: &str = "The shayari should be poetic, emotional, and resonate with readers. \n    \
Please provide only the shayari text without any additional explanation or commentary.";

/// Builds the generation prompt.
///
/// # Example
/// ```rust
/// use shayari_studio::generate::{GenerationRequest, PromptBuilder};
///
/// let prompt = PromptBuilder::new().compose(&GenerationRequest::new("Rain"));
/// assert!(prompt.contains("on the theme of \"Rain\""));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn compose(&self, request: &GenerationRequest) -> String {
        let mut prompt = String::with_capacity(512);

        prompt.push_str(&format!(
            "Generate a beautiful and meaningful shayari in {} on the theme of \"{}\". ",
            request.language, request.theme
        ));

        if !request.custom_input.trim().is_empty() {
            prompt.push_str(&format!(
                "Include these words, sentences, or facts in the shayari: \"{}\". ",
                request.custom_input
            ));
        }

        prompt.push_str(&format!(
            "The shayari should have approximately {} lines. ",
            request.line_count
        ));

        prompt.push_str(CLOSING_INSTRUCTION);
        prompt
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const INCLUDE_CLAUSE: &str = "Include these words";

    fn request(custom_input: &str) -> GenerationRequest {
        GenerationRequest {
            custom_input: custom_input.into(),
            ..GenerationRequest::new("Love")
        }
    }

    #[test]
    fn names_language_and_theme_verbatim() {
        let req = GenerationRequest {
            language: "Urdu".into(),
            ..GenerationRequest::new("Old Age")
        };
        let prompt = PromptBuilder::new().compose(&req);
        assert!(prompt.starts_with(
            "Generate a beautiful and meaningful shayari in Urdu on the theme of \"Old Age\". "
        ));
    }

    #[test]
    fn blank_custom_input_adds_no_inclusion_clause() {
        for blank in ["", " ", "\t\n  "] {
            let prompt = PromptBuilder::new().compose(&request(blank));
            assert!(
                !prompt.contains(INCLUDE_CLAUSE),
                "blank input {blank:?} must not add the inclusion clause"
            );
        }
    }

    #[test]
    fn custom_input_appears_exactly_once_untrimmed() {
        let custom = "  baarish ki boondein  ";
        let prompt = PromptBuilder::new().compose(&request(custom));
        assert_eq!(prompt.matches(custom).count(), 1);
        assert!(prompt.contains(&format!("in the shayari: \"{custom}\". ")));
    }

    #[test]
    fn sections_appear_in_fixed_order() {
        let prompt = PromptBuilder::new().compose(&request("chai"));
        let theme = prompt.find("on the theme of").unwrap();
        let include = prompt.find(INCLUDE_CLAUSE).unwrap();
        let lines = prompt.find("approximately 4 lines").unwrap();
        let closing = prompt.find("poetic, emotional").unwrap();
        assert!(theme < include && include < lines && lines < closing);
        assert!(prompt.ends_with("without any additional explanation or commentary."));
    }

    #[test]
    fn line_count_is_interpolated_as_given() {
        let req = GenerationRequest {
            line_count: 13,
            ..GenerationRequest::new("Sea")
        };
        let prompt = PromptBuilder::new().compose(&req);
        assert!(prompt.contains("approximately 13 lines. "));
    }

    #[test]
    fn closing_instruction_keeps_its_exact_whitespace() {
        let prompt = PromptBuilder::new().compose(&request(""));
        assert!(prompt.ends_with(
            "approximately 4 lines. The shayari should be poetic, emotional, and resonate with readers. \n    Please provide only the shayari text without any additional explanation or commentary."
        ));
    }

    #[test]
    fn no_escaping_of_quotes() {
        let req = GenerationRequest::new("say \"hi\"");
        let prompt = PromptBuilder::new().compose(&req);
        assert!(prompt.contains("on the theme of \"say \"hi\"\". "));
    }
}
