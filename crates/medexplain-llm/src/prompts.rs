//! Prompt templates for answer generation and plain-English rewriting.
//!
//! The answer prompt wraps retrieved FDA label excerpts; the translation
//! prompt asks a (usually cheaper) model to simplify text that still carries
//! heavy medical vocabulary after dictionary substitution.

/// Persona and response rules for answer generation.
pub const SYSTEM_PROMPT: &str = r#"You are MedExplain, a friendly and helpful AI assistant that provides medication information in a conversational, user-friendly way.

RESPONSE STYLE:
- Be conversational, warm, and helpful (like talking to a knowledgeable friend)
- Give direct, clear answers without being overly formal
- Use "Yes" or "No" when appropriate instead of long disclaimers
- Make reasonable clinical assumptions based on available data
- NEVER start with "The FDA sources provided do not contain..." - instead make smart assumptions or give general guidance

SAFETY FIRST:
- Always include appropriate safety warnings
- Encourage consulting healthcare professionals for personalized advice
- Be clear about serious interactions or concerns"#;

/// Build the full answer prompt from assembled source context and the user question.
pub fn build_answer_prompt(context: &str, question: &str) -> String {
    format!(
        r#"{}

CONTEXT FROM MEDICAL SOURCES:
{}

USER QUESTION: {}

Provide a helpful, conversational response. If you don't have specific information, make reasonable assumptions based on drug classes and general medical knowledge, but always mention consulting a healthcare provider.

RESPONSE:"#,
        SYSTEM_PROMPT,
        context.trim(),
        question.trim()
    )
}

/// Worked examples shown to the rewriting model.
pub const TRANSLATION_EXAMPLES: &[(&str, &str)] = &[
    ("contraindication", "reason you shouldn't take this"),
    ("hepatotoxicity", "liver damage"),
    ("administered orally", "taken by mouth"),
    ("monitor renal function", "check your kidney health"),
];

/// Build the plain-English rewrite prompt.
pub fn build_translation_prompt(medical_text: &str) -> String {
    let examples = TRANSLATION_EXAMPLES
        .iter()
        .map(|(from, to)| format!("- \"{}\" → \"{}\"", from, to))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a medical translator that converts complex medical language into simple, plain English that anyone can understand.

RULES:
1. Use simple, everyday words
2. Explain medical terms in parentheses if needed
3. Keep the same meaning but make it accessible
4. Don't change dosages, drug names, or critical safety information
5. Use "you" instead of "patient"
6. Break up long sentences
7. Use bullet points for lists when helpful

EXAMPLES:
{}

Medical text to translate:
{}

Plain English version:"#,
        examples, medical_text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_prompt_contains_context_and_question() {
        let prompt = build_answer_prompt(
            "SOURCE 1:\nDrug: Ibuprofen\nSection: Warnings",
            "What are the side effects of ibuprofen?",
        );
        assert!(prompt.starts_with("You are MedExplain"));
        assert!(prompt.contains("CONTEXT FROM MEDICAL SOURCES:\nSOURCE 1:"));
        assert!(prompt.contains("USER QUESTION: What are the side effects of ibuprofen?"));
        assert!(prompt.ends_with("RESPONSE:"));
    }

    #[test]
    fn test_translation_prompt_lists_rules_and_examples() {
        let prompt = build_translation_prompt("Hepatotoxicity was observed.");
        assert!(prompt.contains("7. Use bullet points"));
        assert!(prompt.contains("\"hepatotoxicity\" → \"liver damage\""));
        assert!(prompt.contains("Medical text to translate:\nHepatotoxicity was observed."));
    }
}
