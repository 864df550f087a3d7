//! Instructor side-channel.
//!
//! Critiques each accepted utterance through a fully separate provider
//! request with no shared context beyond the target text, so the crew never
//! sees the critique and no feedback loop can break immersion. Backend
//! failures are isolated: they are logged by the caller and never abort the
//! conversation loop.

use super::personas;
use crate::provider::{ChatMessage, ChatRequest, Provider, Result as ProviderResult};
use std::sync::Arc;

/// Evaluation snapshots are truncated to this many characters.
pub const EVAL_TEXT_LIMIT: usize = 1000;

/// The nine fixed scored criteria, in report order.
pub const CRITERIA: [&str; 9] = [
    "role compliance",
    "relevance",
    "decision quality",
    "collaboration",
    "information loop",
    "situational awareness",
    "psychological safety",
    "cognitive load",
    "terminology",
];

/// Closed vocabulary of emergent-pattern tags.
pub const PATTERN_TAGS: [&str; 10] = [
    "self-organized-backfill",
    "cross-rank-correction",
    "information-cascade",
    "cognitive-alignment",
    "conflict-sublimation",
    "dynamic-restructure",
    "distributed-sensing",
    "negative-feedback",
    "improvised-innovation",
    "negative-emergence",
];

/// One scored criterion with its short comment.
#[derive(Debug, Clone)]
pub struct CriterionScore {
    pub name: &'static str,
    pub score: u8,
    pub comment: String,
}

/// Instructor critique of a single accepted utterance. Immutable once
/// created; exactly one per distinct accepted utterance text.
#[derive(Debug, Clone)]
pub struct EvaluationRecord {
    pub target_role: String,
    pub scores: Vec<CriterionScore>,
    /// 0–2 tags from [`PATTERN_TAGS`].
    pub patterns: Vec<String>,
}

impl EvaluationRecord {
    /// Render the record as a report comment block.
    pub fn to_comment(&self) -> String {
        let mut out = format!("**{}**\n", self.target_role);
        for score in &self.scores {
            out.push_str(&format!(
                "   - {}: {}/10 | {}\n",
                score.name, score.score, score.comment
            ));
        }
        let patterns = if self.patterns.is_empty() {
            "routine".to_string()
        } else {
            self.patterns.join(", ")
        };
        out.push_str(&format!("   - patterns: {patterns}\n"));
        out
    }
}

/// The instructor: grades utterances out-of-band.
pub struct Evaluator {
    provider: Arc<dyn Provider>,
    temperature: f64,
    max_tokens: u32,
}

impl Evaluator {
    pub fn new(provider: Arc<dyn Provider>, temperature: f64, max_tokens: u32) -> Self {
        Self {
            provider,
            temperature,
            max_tokens,
        }
    }

    /// Critique one utterance. The request shares nothing with the
    /// conversation but the target text itself.
    pub async fn evaluate(&self, target_role: &str, text: &str) -> ProviderResult<EvaluationRecord> {
        let snapshot: String = text.chars().take(EVAL_TEXT_LIMIT).collect();
        let prompt = format!(
            "EVAL_TARGET_ROLE={target_role}\nEVAL_TARGET_TEXT={snapshot}\n\
             Note: a blocked role means the human speaks for it, not that the role is muted."
        );

        let mut request = ChatRequest::new(vec![ChatMessage::user(prompt)])
            .with_system(personas::instructor_prompt());
        request.temperature = Some(self.temperature);
        request.max_tokens = Some(self.max_tokens);

        let response = self.provider.complete(request).await?;
        Ok(parse_record(target_role, &response.text))
    }
}

/// Parse the instructor's reply into a full record.
///
/// Lenient: a missing or malformed criterion line degrades to a zero score
/// with an "unparsed" comment; the record is always complete.
pub fn parse_record(target_role: &str, reply: &str) -> EvaluationRecord {
    let lines: Vec<&str> = reply.lines().map(str::trim).collect();

    let scores = CRITERIA
        .iter()
        .map(|&name| {
            let parsed = lines.iter().find_map(|line| parse_criterion_line(line, name));
            match parsed {
                Some((score, comment)) => CriterionScore {
                    name,
                    score,
                    comment,
                },
                None => CriterionScore {
                    name,
                    score: 0,
                    comment: "unparsed".to_string(),
                },
            }
        })
        .collect();

    let patterns = lines
        .iter()
        .find_map(|line| strip_label(line, "patterns"))
        .map(|body| {
            body.split(',')
                .map(str::trim)
                .filter_map(|tag| {
                    PATTERN_TAGS
                        .iter()
                        .find(|&&known| tag.eq_ignore_ascii_case(known))
                        .map(|&t| t.to_string())
                })
                .take(2)
                .collect()
        })
        .unwrap_or_default();

    EvaluationRecord {
        target_role: target_role.to_string(),
        scores,
        patterns,
    }
}

fn strip_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let lower = line.to_lowercase();
    if !lower.starts_with(label) {
        return None;
    }
    line[label.len()..].trim_start().strip_prefix(':').map(str::trim)
}

/// Parse a `name: <score> | <comment>` line.
fn parse_criterion_line(line: &str, name: &str) -> Option<(u8, String)> {
    let body = strip_label(line, name)?;
    let (score_part, comment) = match body.split_once('|') {
        Some((s, c)) => (s, c.trim().to_string()),
        None => (body, String::new()),
    };
    let digits: String = score_part
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let score: u8 = digits.parse().ok()?;
    Some((score.min(10), comment))
}
