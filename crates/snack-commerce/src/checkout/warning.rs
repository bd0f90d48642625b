//! Reliability warning classification.
//!
//! Maps a [`ReliabilityScore`] to a [`ProductWarning`]. Pure functions only.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::checkout::ReliabilityScore;
use crate::ids::ProductId;

/// Scores below this are critical.
pub const CRITICAL_THRESHOLD: f64 = 0.4;

/// Scores at or above this produce no warning.
pub const WARNING_THRESHOLD: f64 = 0.7;

/// Severity tier of a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    /// Never produced by [`classify`] while info requires a score at or
    /// above [`WARNING_THRESHOLD`].
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }

    /// Headline prefix of the warning message.
    pub fn headline(&self) -> &'static str {
        match self {
            Severity::Critical => "High Risk",
            Severity::Warning => "Moderate Risk",
            Severity::Info => "Low Risk",
        }
    }

    /// Advice attached to warnings of this tier.
    pub fn advice(&self) -> &'static str {
        match self {
            Severity::Critical => {
                "This product has a history of delivery delays, stock shortages, or quality \
                 issues. Consider selecting an alternative product."
            }
            Severity::Warning => {
                "This product may experience occasional delays or availability issues. We \
                 recommend reviewing alternatives or adjusting your order timeline."
            }
            Severity::Info => "This product has a good track record.",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A purchase warning derived from a low reliability score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductWarning {
    pub product_id: ProductId,
    pub severity: Severity,
    /// The score the warning was derived from.
    pub score: f64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Severity tier for a score, ignoring the no-warning cutoff.
pub fn severity_for(score: f64) -> Severity {
    if score < CRITICAL_THRESHOLD {
        Severity::Critical
    } else if score < WARNING_THRESHOLD {
        Severity::Warning
    } else {
        Severity::Info
    }
}

/// Headline message, e.g. `High Risk - Reliability Score: 35%`.
pub fn message_for(score: f64, severity: Severity) -> String {
    let percentage = (score * 100.0).round() as i64;
    format!("{} - Reliability Score: {}%", severity.headline(), percentage)
}

/// Build the warning for one score.
///
/// Returns `None` for scores at or above [`WARNING_THRESHOLD`] and for
/// non-finite scores. Finite scores outside `[0, 1]` are clamped first.
pub fn classify(prediction: &ReliabilityScore) -> Option<ProductWarning> {
    if !prediction.score.is_finite() {
        return None;
    }
    let score = prediction.score.clamp(0.0, 1.0);
    if score >= WARNING_THRESHOLD {
        return None;
    }

    let severity = severity_for(score);
    Some(ProductWarning {
        product_id: prediction.product_id,
        severity,
        score,
        message: message_for(score, severity),
        details: Some(severity.advice().to_string()),
    })
}

/// Classify a batch, dropping scores that need no warning.
///
/// Output order follows input order.
pub fn classify_all(predictions: &[ReliabilityScore]) -> Vec<ProductWarning> {
    predictions.iter().filter_map(classify).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(id: u64, score: f64) -> ReliabilityScore {
        ReliabilityScore::new(id, score)
    }

    #[test]
    fn test_low_score_is_critical() {
        let w = classify(&score(101, 0.35)).unwrap();
        assert_eq!(w.severity, Severity::Critical);
        assert!(w.message.contains("35%"));
        assert!(w.message.starts_with("High Risk"));
        assert!(w.details.unwrap().contains("alternative"));
    }

    #[test]
    fn test_middle_score_is_warning() {
        let w = classify(&score(102, 0.55)).unwrap();
        assert_eq!(w.severity, Severity::Warning);
        assert_eq!(w.message, "Moderate Risk - Reliability Score: 55%");
    }

    #[test]
    fn test_good_score_has_no_warning() {
        assert!(classify(&score(103, 0.85)).is_none());
        assert!(classify(&score(103, WARNING_THRESHOLD)).is_none());
    }

    #[test]
    fn test_threshold_boundaries() {
        assert_eq!(classify(&score(1, 0.4)).unwrap().severity, Severity::Warning);
        assert_eq!(
            classify(&score(1, 0.399_999)).unwrap().severity,
            Severity::Critical
        );
        assert_eq!(classify(&score(1, 0.0)).unwrap().severity, Severity::Critical);
    }

    #[test]
    fn test_info_is_never_produced() {
        for step in 0..=100 {
            let s = f64::from(step) / 100.0;
            if let Some(w) = classify(&score(1, s)) {
                assert_ne!(w.severity, Severity::Info);
            }
        }
        assert_eq!(severity_for(0.9), Severity::Info);
    }

    #[test]
    fn test_out_of_range_scores() {
        assert!(classify(&score(1, f64::NAN)).is_none());
        assert!(classify(&score(1, 1.5)).is_none());

        let w = classify(&score(1, -0.2)).unwrap();
        assert_eq!(w.score, 0.0);
        assert!(w.message.ends_with(" 0%"));
    }

    #[test]
    fn test_percentage_rounds() {
        assert!(classify(&score(1, 0.256)).unwrap().message.contains("26%"));
        assert!(classify(&score(1, 0.694)).unwrap().message.contains("69%"));
    }

    #[test]
    fn test_batch_keeps_order_and_drops_good_scores() {
        let warnings = classify_all(&[
            score(103, 0.25),
            score(104, 0.9),
            score(101, 0.35),
            score(102, 0.55),
        ]);
        let ids: Vec<u64> = warnings.iter().map(|w| w.product_id.get()).collect();
        assert_eq!(ids, vec![103, 101, 102]);
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::Critical).unwrap(), r#""critical""#);
    }
}
