//! Evidence Response Normalizer.
//!
//! Turns one raw webhook answer into a [`NormalizedAnswer`]:
//! - `answer`: the upstream `result` passed through as-is (`--` if empty);
//! - `evidence`: one `• content` line per citation, in upstream order;
//! - `source`: decoded, de-duplicated file names joined by `, `;
//! - `citations`: `(content, file name)` records ready for persistence.
//!
//! Only a `"Yes"` result reads `output`. Reading is two-staged: strict JSON
//! first ([`strict`]), regex salvage ([`salvage`]) only when the strict stage
//! cannot parse the payload or finds something other than an array. Nothing
//! here fails: malformed input degrades to "no evidence".
//!
//! The function is pure. Citation ids are UUIDv5 values derived from the
//! citation's position and text, so the same input always yields the same
//! output; [`NormalizedAnswer::assign_question`] re-derives them once the
//! owning question is known.

pub mod salvage;
pub mod strict;
pub mod text;

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use ai_webhook_service::RawAiResponse;
use audit_store::{Citation, NO_VALUE};

pub use text::decode_file_name;

/// Verdict that makes `output` meaningful.
pub const POSITIVE_RESULT: &str = "Yes";

/// Bullet prefixed to every evidence line.
pub const BULLET: &str = "• ";

/// Result of normalizing one webhook answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedAnswer {
    pub answer: String,
    pub evidence: String,
    pub source: String,
    pub citations: Vec<Citation>,
}

impl NormalizedAnswer {
    fn without_evidence(answer: String) -> Self {
        Self {
            answer,
            evidence: NO_VALUE.to_string(),
            source: NO_VALUE.to_string(),
            citations: Vec::new(),
        }
    }

    fn from_pairs(answer: String, pairs: Vec<(String, String)>) -> Self {
        let citations: Vec<Citation> = pairs
            .into_iter()
            .enumerate()
            .map(|(idx, (content, file_name))| Citation {
                id: citation_id("", idx, &file_name, &content),
                question_id: String::new(),
                content,
                file_name,
            })
            .collect();
        Self {
            answer,
            evidence: format_evidence(&citations),
            source: format_sources(&citations),
            citations,
        }
    }

    /// Attaches every citation to `question_id` and re-derives its id.
    pub fn assign_question(&mut self, question_id: &str) {
        for (idx, c) in self.citations.iter_mut().enumerate() {
            c.question_id = question_id.to_string();
            c.id = citation_id(question_id, idx, &c.file_name, &c.content);
        }
    }

    pub fn has_evidence(&self) -> bool {
        !self.citations.is_empty()
    }
}

/// Normalizes a raw webhook answer. Never fails.
pub fn normalize(raw: &RawAiResponse) -> NormalizedAnswer {
    let answer = match raw.result.as_deref() {
        Some(r) if !r.is_empty() => r.to_string(),
        _ => NO_VALUE.to_string(),
    };

    if raw.result.as_deref() != Some(POSITIVE_RESULT) {
        debug!("normalize: result={:?}, output ignored", raw.result);
        return NormalizedAnswer::without_evidence(answer);
    }

    let output = match raw.output.as_deref() {
        Some(o) if !o.trim().is_empty() => o,
        _ => {
            debug!("normalize: positive result without output");
            return NormalizedAnswer::without_evidence(answer);
        }
    };

    let pairs = match strict::parse_pairs(output) {
        Ok(pairs) => {
            debug!("normalize: strict stage produced {} citation(s)", pairs.len());
            pairs
        }
        Err(reason) => {
            warn!("normalize: strict stage rejected output ({reason}); trying salvage");
            match salvage::salvage_pairs(output) {
                Ok(pairs) => {
                    debug!("normalize: salvage produced {} citation(s)", pairs.len());
                    pairs
                }
                Err(reason) => {
                    warn!("normalize: salvage gave up ({reason})");
                    Vec::new()
                }
            }
        }
    };

    if pairs.is_empty() {
        return NormalizedAnswer::without_evidence(answer);
    }
    NormalizedAnswer::from_pairs(answer, pairs)
}

/// `• content` lines joined by `\n`, or `--` when there are none.
pub fn format_evidence(citations: &[Citation]) -> String {
    if citations.is_empty() {
        return NO_VALUE.to_string();
    }
    citations
        .iter()
        .map(|c| format!("{BULLET}{}", c.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Decoded file names, de-duplicated case-sensitively in first-seen order,
/// joined by `, `; `--` when there are none.
pub fn format_sources(citations: &[Citation]) -> String {
    let mut seen = HashSet::new();
    let names: Vec<String> = citations
        .iter()
        .map(|c| decode_file_name(&c.file_name))
        .filter(|n| seen.insert(n.clone()))
        .collect();
    if names.is_empty() {
        NO_VALUE.to_string()
    } else {
        names.join(", ")
    }
}

/// Deterministic UUIDv5 for a citation.
fn citation_id(question_id: &str, idx: usize, file_name: &str, content: &str) -> Uuid {
    let key = format!("citation\u{1f}{question_id}\u{1f}{idx}\u{1f}{file_name}\u{1f}{content}");
    Uuid::new_v5(&Uuid::NAMESPACE_URL, key.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yes(output: &str) -> RawAiResponse {
        RawAiResponse::new("Yes", Some(output.to_string()))
    }

    #[test]
    fn non_positive_results_never_read_output() {
        let output = Some(r#"[{"pageContent":"x","metadata":{"file_name":"f.pdf"}}]"#.to_string());
        for result in ["No", "yes", "Maybe", "Partially"] {
            let n = normalize(&RawAiResponse::new(result, output.clone()));
            assert_eq!(n.answer, result);
            assert_eq!(n.evidence, NO_VALUE);
            assert_eq!(n.source, NO_VALUE);
            assert!(n.citations.is_empty());
        }

        let n = normalize(&RawAiResponse::default());
        assert_eq!(n.answer, NO_VALUE);
        assert_eq!(n.evidence, NO_VALUE);

        let n = normalize(&RawAiResponse::new("", None));
        assert_eq!(n.answer, NO_VALUE);
    }

    #[test]
    fn whitespace_result_is_kept_verbatim() {
        let output = Some(r#"[{"pageContent":"x","metadata":{"file_name":"f.pdf"}}]"#.to_string());
        let n = normalize(&RawAiResponse::new("  ", output));
        assert_eq!(n.answer, "  ");
        assert_eq!(n.evidence, NO_VALUE);
        assert!(n.citations.is_empty());

        let n = normalize(&RawAiResponse::new(" Yes\n", None));
        assert_eq!(n.answer, " Yes\n");
    }

    #[test]
    fn positive_without_output_has_no_evidence() {
        for output in [None, Some(String::new()), Some("   ".to_string())] {
            let n = normalize(&RawAiResponse::new("Yes", output));
            assert_eq!(n.answer, "Yes");
            assert_eq!(n.evidence, NO_VALUE);
            assert!(n.citations.is_empty());
        }
    }

    #[test]
    fn end_to_end_single_citation() {
        let n = normalize(&yes(
            r#"[{"pageContent":"Backups run nightly","metadata":{"file_name":"backup%20policy.pdf"}}]"#,
        ));
        assert_eq!(n.answer, "Yes");
        assert_eq!(n.evidence, "• Backups run nightly");
        assert_eq!(n.source, "backup policy.pdf");
        assert_eq!(n.citations.len(), 1);
        assert_eq!(n.citations[0].content, "Backups run nightly");
        assert_eq!(n.citations[0].file_name, "backup%20policy.pdf");
        assert_eq!(n.citations[0].question_id, "");
    }

    #[test]
    fn many_citations_keep_order_and_dedup_sources() {
        let n = normalize(&yes(
            r#"[
              {"pageContent":"A","metadata":{"file_name":"Policy%20One.pdf"}},
              {"pageContent":"B","metadata":{"file_name":"policy one.pdf"}},
              {"pageContent":"C","metadata":{"file_name":"Policy One.pdf"}},
              {"pageContent":"D","metadata":{"file_name":"Policy%20One.pdf"}}
            ]"#,
        ));
        assert_eq!(n.citations.len(), 4);
        assert_eq!(n.evidence, "• A\n• B\n• C\n• D");
        // "Policy%20One.pdf" and "Policy One.pdf" decode to the same name.
        assert_eq!(n.source, "Policy One.pdf, policy one.pdf");
    }

    #[test]
    fn single_empty_content_leaves_no_evidence() {
        let n = normalize(&yes(r#"[{"pageContent":"","metadata":{"file_name":"a.pdf"}}]"#));
        assert_eq!(n.evidence, NO_VALUE);
        assert_eq!(n.source, NO_VALUE);
        assert!(n.citations.is_empty());
    }

    #[test]
    fn salvage_recovers_from_broken_json() {
        let n = normalize(&yes(
            r#"[{"pageContent":"Policy states X","file_name":"policy.pdf"}] trailing}"#,
        ));
        assert_eq!(n.citations.len(), 1);
        assert_eq!(n.citations[0].content, "Policy states X");
        assert_eq!(n.citations[0].file_name, "policy.pdf");
        assert_eq!(n.evidence, "• Policy states X");
        assert_eq!(n.source, "policy.pdf");
    }

    #[test]
    fn object_output_goes_through_salvage() {
        let n = normalize(&yes(
            r#"{"pageContent":"Keys rotate yearly","metadata":{"file_name":"crypto.pdf"}}"#,
        ));
        assert_eq!(n.citations.len(), 1);
        assert_eq!(n.source, "crypto.pdf");
    }

    #[test]
    fn unsalvageable_output_degrades_silently() {
        let n = normalize(&yes("the model could not find anything"));
        assert_eq!(n.answer, "Yes");
        assert_eq!(n.evidence, NO_VALUE);
        assert!(n.citations.is_empty());
    }

    #[test]
    fn normalization_is_deterministic() {
        let raw = yes(
            r#"[{"pageContent":"A","metadata":{"file_name":"a.pdf"}},{"pageContent":"A","metadata":{"file_name":"a.pdf"}}]"#,
        );
        let first = normalize(&raw);
        let second = normalize(&raw);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        // identical pairs at different positions still get distinct ids
        assert_ne!(first.citations[0].id, first.citations[1].id);
    }

    #[test]
    fn assigning_question_rekeys_citations() {
        let raw = yes(r#"[{"pageContent":"A","metadata":{"file_name":"a.pdf"}}]"#);
        let mut q1 = normalize(&raw);
        let mut q2 = normalize(&raw);
        q1.assign_question("q1");
        q2.assign_question("q2");
        assert_eq!(q1.citations[0].question_id, "q1");
        assert_ne!(q1.citations[0].id, q2.citations[0].id);
        assert!(q1.has_evidence());
    }
}
