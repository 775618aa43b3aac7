//! Lexical admission check run on every question before any network call.
//!
//! Rules are checked in a fixed order and the first match wins:
//! personal contact data, then personalized investment advice, then
//! wrongdoing. Anything else is admitted. Matching is best-effort and
//! purely lexical.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Reason attached to admitted questions.
pub const ADMITTED_REASON: &str = "OK";

const CONTACT_PATTERN_REASON: &str =
    "The request appears to ask for personal contact information; this is not allowed.";
const CONTACT_KEYWORD_REASON: &str =
    "The request asks for personal contact or address details; I cannot provide that.";
const INVESTMENT_REASON: &str = "I cannot give personalized investment advice.";
const HARM_REASON: &str = "I cannot assist with harmful or illegal activities.";

const CONTACT_KEYWORDS: &[&str] = &[
    "address",
    "home address",
    "phone number",
    "mobile number",
    "contact number",
];
const INVESTMENT_KEYWORDS: &[&str] = &[
    "should i buy",
    "stock",
    "buy shares",
    "investment advice",
    "which stock",
];
const HARM_KEYWORDS: &[&str] = &["how to hack", "how to steal", "illegal", "bomb", "explosive"];

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\+?\d{1,3}[\s-]?)?(\(?\d{3}\)?[\s-]?)?\d{3}[\s-]?\d{4}").unwrap()
});
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9.\-]+").unwrap());
static SSN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").unwrap());

/// Why a question was turned away.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionCategory {
    PersonalContact,
    InvestmentAdvice,
    HarmfulActivity,
}

/// Outcome of [`evaluate`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationVerdict {
    pub admitted: bool,
    pub reason: String,
    pub category: Option<RejectionCategory>,
}

impl ValidationVerdict {
    fn admit() -> Self {
        Self {
            admitted: true,
            reason: ADMITTED_REASON.to_string(),
            category: None,
        }
    }

    fn reject(category: RejectionCategory, reason: &str) -> Self {
        Self {
            admitted: false,
            reason: reason.to_string(),
            category: Some(category),
        }
    }
}

/// Classifies a raw user question.
///
/// Total and pure: every input, including empty or non-ASCII text, yields a
/// verdict.
pub fn evaluate(input: &str) -> ValidationVerdict {
    let text = input.trim().to_lowercase();

    if PHONE_RE.is_match(&text) || EMAIL_RE.is_match(&text) || SSN_RE.is_match(&text) {
        return ValidationVerdict::reject(
            RejectionCategory::PersonalContact,
            CONTACT_PATTERN_REASON,
        );
    }
    if contains_any(&text, CONTACT_KEYWORDS) {
        return ValidationVerdict::reject(
            RejectionCategory::PersonalContact,
            CONTACT_KEYWORD_REASON,
        );
    }
    if contains_any(&text, INVESTMENT_KEYWORDS) {
        return ValidationVerdict::reject(RejectionCategory::InvestmentAdvice, INVESTMENT_REASON);
    }
    if contains_any(&text, HARM_KEYWORDS) {
        return ValidationVerdict::reject(RejectionCategory::HarmfulActivity, HARM_REASON);
    }

    ValidationVerdict::admit()
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_sheet_question_is_admitted() {
        let v = evaluate("What is the rated power of the XR-220?");
        assert!(v.admitted);
        assert_eq!(v.reason, "OK");
        assert_eq!(v.category, None);
    }

    #[test]
    fn phone_and_email_are_rejected() {
        for q in [
            "Call the vendor at 555-123-4567",
            "send it to jane.doe@example.com please",
            "my ssn is 123-45-6789",
        ] {
            let v = evaluate(q);
            assert!(!v.admitted, "{q}");
            assert_eq!(v.category, Some(RejectionCategory::PersonalContact));
            assert_eq!(v.reason, CONTACT_PATTERN_REASON);
        }
    }

    #[test]
    fn contact_keywords_use_their_own_reason() {
        let v = evaluate("What is the HOME ADDRESS of the plant manager?");
        assert!(!v.admitted);
        assert_eq!(v.reason, CONTACT_KEYWORD_REASON);
    }

    #[test]
    fn investment_question_is_rejected() {
        let v = evaluate("What stock should I buy?");
        assert!(!v.admitted);
        assert!(v.reason.contains("investment advice"));
        assert_eq!(v.category, Some(RejectionCategory::InvestmentAdvice));
    }

    #[test]
    fn first_matching_category_wins() {
        // Both investment and harm keywords; investment is checked first.
        let v = evaluate("how to hack the stock exchange");
        assert_eq!(v.category, Some(RejectionCategory::InvestmentAdvice));

        let v = evaluate("Is it illegal to run the XR-220 without guards?");
        assert_eq!(v.category, Some(RejectionCategory::HarmfulActivity));
        assert_eq!(v.reason, HARM_REASON);
    }

    #[test]
    fn odd_inputs_are_admitted() {
        assert!(evaluate("").admitted);
        assert!(evaluate("   ").admitted);
        assert!(evaluate("Wie hoch ist die Nennleistung? Größe ✓").admitted);
        assert!(evaluate(&"maintenance interval ".repeat(10_000)).admitted);
    }
}
