//! Prompt templates for letter drafting

pub const LETTER_SYSTEM_PROMPT: &str = r#"You write concise, professional HOA violation letters.

Rules:
- Use a non-accusatory, factual tone.
- Do not threaten legal action or mention fines unless explicitly provided in the user's details.
- Include what was observed, a request to correct, any due date if provided, and a contact line.
- Keep the letter under 250 words.
- Output only the letter text."#;

const NOT_PROVIDED: &str = "(not provided)";

/// Form fields describing one notice, already trimmed and length-clamped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LetterFields {
    pub violation_type: String,
    pub tone: String,
    pub due_date: String,
    pub community_name: String,
    pub rule_ref: String,
    pub details: String,
}

/// System and user messages for one generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterPrompt {
    pub system: String,
    pub user: String,
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() { placeholder } else { value }
}

impl LetterPrompt {
    pub fn build(fields: &LetterFields) -> Self {
        let user = format!(
            "Generate an HOA violation letter.\n\n\
             Community name: {}\n\
             Violation type: {}\n\
             Tone: {}\n\
             Due date: {}\n\
             Rule reference: {}\n\
             Additional details: {}",
            or_placeholder(&fields.community_name, NOT_PROVIDED),
            fields.violation_type,
            fields.tone,
            or_placeholder(&fields.due_date, NOT_PROVIDED),
            or_placeholder(&fields.rule_ref, NOT_PROVIDED),
            or_placeholder(&fields.details, "(none)"),
        );

        Self {
            system: LETTER_SYSTEM_PROMPT.to_string(),
            user,
        }
    }
}
