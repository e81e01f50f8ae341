use serde::{Deserialize, Serialize};

/// Message intent tier. Ordered `Skip < Passive < Active` so that
/// reclassification can only ever move a message "more active", never back
/// down — see [`Classification::upgrade_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Intent {
    Skip,
    Passive,
    Active,
}

/// Bounds a confidence value to `[0, 1]` on construction so downstream code
/// never has to re-validate it.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Confidence(f32);

impl Confidence {
    pub fn new(value: f32) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(&self) -> f32 {
        self.0
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self(0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub intent: Intent,
    pub reason: String,
    pub confidence: Confidence,
    pub source: String,
    #[serde(default)]
    pub signals: Vec<String>,
}

impl Classification {
    pub fn new(intent: Intent, reason: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            intent,
            reason: reason.into(),
            confidence: Confidence::new(0.5),
            source: source.into(),
            signals: Vec::new(),
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Confidence::new(confidence);
        self
    }

    pub fn with_signal(mut self, signal: impl Into<String>) -> Self {
        self.signals.push(signal.into());
        self
    }

    /// Reclassify, enforcing the monotonicity invariant: the result never
    /// has a less active intent than `self`. Downgrades are silently
    /// rejected by keeping `self`'s intent (the reason/signals still merge
    /// in, so the caller's evidence is not lost).
    pub fn upgrade_to(&mut self, candidate: Classification) {
        let intent = self.intent.max(candidate.intent);
        let confidence = if candidate.intent >= self.intent {
            candidate.confidence
        } else {
            self.confidence
        };
        self.signals.extend(candidate.signals);
        if candidate.intent > self.intent {
            self.reason = candidate.reason;
            self.source = candidate.source;
        }
        self.intent = intent;
        self.confidence = confidence;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_clamps() {
        assert_eq!(Confidence::new(1.5).value(), 1.0);
        assert_eq!(Confidence::new(-0.5).value(), 0.0);
    }

    #[test]
    fn upgrade_never_downgrades() {
        let mut c = Classification::new(Intent::Active, "direct", "source");
        let candidate = Classification::new(Intent::Passive, "broadcast body", "content");
        c.upgrade_to(candidate);
        assert_eq!(c.intent, Intent::Active);
    }

    #[test]
    fn upgrade_moves_passive_to_active() {
        let mut c = Classification::new(Intent::Passive, "newsletter suffix", "source");
        let candidate =
            Classification::new(Intent::Active, "leading slash command", "content").with_confidence(0.9);
        c.upgrade_to(candidate);
        assert_eq!(c.intent, Intent::Active);
        assert_eq!(c.confidence.value(), 0.9);
    }

    #[test]
    fn intent_ordering() {
        assert!(Intent::Skip < Intent::Passive);
        assert!(Intent::Passive < Intent::Active);
    }
}
