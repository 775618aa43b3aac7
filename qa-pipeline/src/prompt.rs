//! Prompt builder: document-grounded system message + labeled user segments.

use kb_retrieval::KbHit;

/// System instructions for document-grounded answers.
pub const SYSTEM_PROMPT: &str = r#"
You are a document query assistant. Answer questions strictly from the documents stored in the knowledge base.

1. Use only the knowledge base. If the answer is not in the documents, say:
   "I could not find this information in the available documents."
2. Do not guess. Never invent specifications or details missing from the documents.
3. Cite the document source, e.g. "Source: machine_files.pdf".
4. Be clear and concise. Use bullet points for technical specifications when helpful.
5. Decline personal information requests, passwords or access keys, financial advice, and off-topic questions with:
   "This request is outside the allowed scope. I can only help with questions about the uploaded documents."
6. If the question is unclear, ask for clarification.
"#;

/// Placeholder context when retrieval returned nothing.
pub const EMPTY_CONTEXT: &str = "No KB context found.";

const ANSWER_RULES: &str =
    "Answer ONLY from the knowledge base documents. Cite the document file name when possible.";

/// Joins hits as `Source: {title}\n{content}` blocks, clamped to `max_chars` bytes.
///
/// ```
/// # use qa_pipeline::prompt::{build_context, EMPTY_CONTEXT};
/// assert_eq!(build_context(&[], 100), EMPTY_CONTEXT);
/// ```
pub fn build_context(hits: &[KbHit], max_chars: usize) -> String {
    if hits.is_empty() {
        return EMPTY_CONTEXT.to_string();
    }
    let block = hits
        .iter()
        .map(|h| format!("Source: {}\n{}", h.title, h.content))
        .collect::<Vec<_>>()
        .join("\n\n");

    if block.len() <= max_chars {
        block
    } else {
        let mut out = safe_truncate(&block, max_chars).to_string();
        out.push('…');
        out
    }
}

/// User segments in send order: the question with answering rules, then the context.
pub fn user_segments(question: &str, context: &str) -> Vec<String> {
    vec![
        format!("User question: {}\n\n{ANSWER_RULES}", question.trim()),
        format!("Knowledge Base context:\n{context}"),
    ]
}

fn safe_truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        s
    } else {
        let mut end = max;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        &s[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(title: &str, content: &str) -> KbHit {
        KbHit {
            title: title.into(),
            content: content.into(),
            source: "s3://docs/documents/x.pdf".into(),
            score: 0.5,
        }
    }

    #[test]
    fn context_blocks_are_joined_by_blank_lines() {
        let ctx = build_context(
            &[hit("a.pdf", "Rated power: 3.5 kW"), hit("b.pdf", "Filters every 100 h")],
            8000,
        );
        assert_eq!(
            ctx,
            "Source: a.pdf\nRated power: 3.5 kW\n\nSource: b.pdf\nFilters every 100 h"
        );
    }

    #[test]
    fn context_is_clamped_on_char_boundary() {
        let ctx = build_context(&[hit("ä.pdf", &"ü".repeat(100))], 21);
        assert!(ctx.ends_with('…'));
        assert!(ctx.len() <= 21 + '…'.len_utf8());
    }

    #[test]
    fn segments_carry_rules_and_context() {
        let segs = user_segments("  What is the rated power?  ", "CTX");
        assert_eq!(segs.len(), 2);
        assert!(segs[0].starts_with("User question: What is the rated power?\n\n"));
        assert!(segs[0].ends_with("Cite the document file name when possible."));
        assert_eq!(segs[1], "Knowledge Base context:\nCTX");
    }
}
