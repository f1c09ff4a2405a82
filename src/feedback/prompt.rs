//! Prompt builder for speech-rehearsal feedback.
//!
//! [`PromptBuilder`] produces the `(system_msg, user_msg)` pair sent to the
//! chat-completions endpoint.  The system instruction is fixed; the user
//! message embeds the reference text and the transcript verbatim under
//! `Original:` / `Transcribed:` labels.

// ---------------------------------------------------------------------------
// System instruction
// ---------------------------------------------------------------------------

/// Fixed instruction for the feedback model.
///
/// Weighted toward semantic coverage rather than exact wording: the
/// transcript comes from imperfect speech recognition, so what matters is
/// whether every point in the reference was actually delivered.
const SYSTEM_INSTRUCTION: &str = "\
You are a highly intelligent assistant. You give feedback on speeches: the \
original is what the person wanted to say, the transcribed is what they \
actually said. Give constructive feedback on the differences. Focus on \
semantics rather than exact wording, since the speech is transcribed and may \
contain recognition errors. What really matters is that all the points of \
the original are covered. Keep feedback relatively brief, with 1-2 sentences \
per point.";

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds comparison prompts in chat-message format.
///
/// # Example
/// ```rust
/// use rehearse::feedback::PromptBuilder;
///
/// let builder = PromptBuilder::new();
/// let (system, user) = builder.build_chat("hello there world", "hello world");
/// assert!(system.contains("feedback on speeches"));
/// assert!(user.contains("hello there world"));
/// ```
#[derive(Debug, Default, Clone)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the `(system_msg, user_msg)` pair for one comparison.
    ///
    /// Both texts are embedded verbatim; no escaping, trimming, or
    /// validation — an empty reference simply produces degenerate feedback,
    /// which is the service's problem, not this builder's.
    pub fn build_chat(&self, reference: &str, transcript: &str) -> (String, String) {
        let system_msg = SYSTEM_INSTRUCTION.to_string();

        let user_msg = format!(
            "Compare the following texts and provide feedback on differences:\n\
             Original: {reference}\n\
             Transcribed: {transcript}"
        );

        (system_msg, user_msg)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_msg_embeds_both_texts_verbatim() {
        let builder = PromptBuilder::new();
        let reference = "hello there world";
        let transcript = "hello world";
        let (_, user) = builder.build_chat(reference, transcript);

        assert!(user.contains(reference), "user msg must embed the reference");
        assert!(user.contains(transcript), "user msg must embed the transcript");
        assert!(user.contains("Original:"));
        assert!(user.contains("Transcribed:"));
    }

    #[test]
    fn system_instruction_targets_semantic_coverage() {
        let builder = PromptBuilder::new();
        let (system, _) = builder.build_chat("a", "b");

        assert!(system.contains("feedback on speeches"));
        assert!(
            system.contains("semantics"),
            "instruction must weight semantics over exact wording"
        );
        assert!(
            system.contains("covered"),
            "instruction must ask for point coverage"
        );
    }

    #[test]
    fn empty_reference_still_builds_a_prompt() {
        let builder = PromptBuilder::new();
        let (system, user) = builder.build_chat("", "something was said");

        assert!(!system.is_empty());
        assert!(user.contains("Original: \n"));
        assert!(user.contains("something was said"));
    }

    #[test]
    fn texts_are_not_modified() {
        let builder = PromptBuilder::new();
        let reference = "  spaced   and\nmultiline  ";
        let (_, user) = builder.build_chat(reference, "t");

        assert!(user.contains(reference), "no trimming or reflowing");
    }
}
