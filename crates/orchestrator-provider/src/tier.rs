use serde::{Deserialize, Serialize};

/// Coarse difficulty class driving provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskTier {
    Trivial,
    Simple,
    Moderate,
    Complex,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierResult {
    pub tier: TaskTier,
    pub confidence: f32,
    pub analysis: String,
}

const COMPLEXITY_HINTS: &[&str] = &[
    "architect",
    "refactor",
    "design a",
    "end-to-end",
    "comprehensive",
    "production-grade",
    "migrate",
    "security audit",
];

const REASONING_VERBS: &[&str] = &[
    "analyze", "compare", "evaluate", "explain why", "derive", "prove", "debug", "optimize",
];

/// Heuristic over message length, code fences, explicit complexity hints,
/// reasoning verbs and instruction count. `force_tier` always wins.
pub struct TaskClassifier;

impl TaskClassifier {
    pub fn classify(task_text: &str, force_tier: Option<TaskTier>) -> TierResult {
        if let Some(tier) = force_tier {
            return TierResult {
                tier,
                confidence: 1.0,
                analysis: "tier forced by caller".to_string(),
            };
        }

        let lower = task_text.to_lowercase();
        let len = task_text.chars().count();
        let has_code_fence = task_text.contains("```");
        let complexity_hits = COMPLEXITY_HINTS.iter().filter(|h| lower.contains(*h)).count();
        let reasoning_hits = REASONING_VERBS.iter().filter(|v| lower.contains(*v)).count();
        let instruction_count = count_instructions(task_text);

        let mut score: i32 = 0;
        let mut notes = Vec::new();

        score += match len {
            0..=20 => 0,
            21..=120 => 1,
            121..=400 => 2,
            _ => 3,
        };
        notes.push(format!("length={len}"));

        if has_code_fence {
            score += 2;
            notes.push("code_fence".to_string());
        }
        if complexity_hits > 0 {
            score += 2 * complexity_hits as i32;
            notes.push(format!("complexity_hints={complexity_hits}"));
        }
        if reasoning_hits > 0 {
            score += reasoning_hits as i32;
            notes.push(format!("reasoning_verbs={reasoning_hits}"));
        }
        if instruction_count > 1 {
            score += instruction_count as i32 - 1;
            notes.push(format!("instructions={instruction_count}"));
        }

        let (tier, confidence) = match score {
            0 => (TaskTier::Trivial, 0.9),
            1..=2 => (TaskTier::Simple, 0.8),
            3..=5 => (TaskTier::Moderate, 0.75),
            6..=9 => (TaskTier::Complex, 0.75),
            _ => (TaskTier::Critical, 0.7),
        };

        TierResult {
            tier,
            confidence,
            analysis: notes.join(", "),
        }
    }
}

/// Counts roughly how many distinct instructions a message asks for:
/// sentence-ending punctuation plus numbered/bulleted list markers.
fn count_instructions(text: &str) -> usize {
    let sentence_like = text
        .split(['.', '\n'])
        .filter(|s| !s.trim().is_empty())
        .count();
    let list_markers = text
        .lines()
        .filter(|l| {
            let t = l.trim_start();
            t.starts_with('-')
                || t.starts_with('*')
                || t.chars().next().is_some_and(|c| c.is_ascii_digit())
        })
        .count();
    sentence_like.max(list_markers).max(1)
}
