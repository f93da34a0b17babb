//! Prompt templates for grounded question answering

use crate::types::Segment;

/// Separator placed between stuffed segments
pub const DOCUMENT_SEPARATOR: &str = "\n\n";

/// Prompt builder for QA queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Stuff segments into one context string, in the order given
    pub fn build_context(segments: &[Segment]) -> String {
        segments
            .iter()
            .map(|s| s.content.as_str())
            .collect::<Vec<_>>()
            .join(DOCUMENT_SEPARATOR)
    }

    /// Build a question-answering prompt restricted to the context
    pub fn build_qa_prompt(question: &str, context: &str) -> String {
        format!(
            r#"Use the following pieces of context to answer the question at the end. If you don't know the answer, just say that you don't know, don't try to make up an answer.

{context}

Question: {question}
Helpful Answer:"#,
            context = context,
            question = question
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_keeps_retrieval_order() {
        let segments = vec![Segment::new(3, "third"), Segment::new(0, "first")];
        assert_eq!(PromptBuilder::build_context(&segments), "third\n\nfirst");
        assert_eq!(PromptBuilder::build_context(&[]), "");
    }

    #[test]
    fn test_prompt_contains_context_and_question() {
        let prompt =
            PromptBuilder::build_qa_prompt("What absorbs light?", "Chlorophyll absorbs light.");
        assert!(prompt.contains("Chlorophyll absorbs light.\n\nQuestion: What absorbs light?"));
        assert!(prompt.ends_with("Helpful Answer:"));
    }
}
