use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Denominator floor for the weight range.
pub const WEIGHT_RANGE_EPSILON: f64 = 1e-6;

/// A topic and its relative importance, as delivered by the keyword analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub word: String,
    pub weight: f64,
}

impl Keyword {
    pub fn new(word: impl Into<String>, weight: f64) -> Self {
        Self {
            word: word.into(),
            weight,
        }
    }
}

/// A sanitised keyword with its normalized weight.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedWord {
    pub word: String,
    /// Raw weight after clamping to `[0, 1]`.
    pub weight: f64,
    /// Weight rescaled against the min/max of the current set.
    pub normalized: f64,
}

pub fn clamp_weight(weight: f64) -> f64 {
    if weight.is_nan() {
        return 0.0;
    }
    weight.clamp(0.0, 1.0)
}

/// Trims words, drops empty ones, clamps weights and orders the result
/// heaviest first. Ties keep their input order.
pub fn sanitize_keywords(keywords: &[Keyword]) -> Vec<Keyword> {
    let mut kept: Vec<Keyword> = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        let word = keyword.word.trim();
        if word.is_empty() {
            debug!("dropping empty keyword (weight {})", keyword.weight);
            continue;
        }
        let weight = clamp_weight(keyword.weight);
        if weight != keyword.weight {
            warn!("keyword {word:?}: weight {} clamped to {weight}", keyword.weight);
        }
        kept.push(Keyword {
            word: word.to_string(),
            weight,
        });
    }
    kept.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(Ordering::Equal));
    kept
}

/// `(w - min) / max(max - min, eps)` clamped to `[0, 1]`.
pub fn normalize_weight(weight: f64, min: f64, max: f64) -> f64 {
    let range = (max - min).max(WEIGHT_RANGE_EPSILON);
    ((weight - min) / range).clamp(0.0, 1.0)
}

/// Sanitises `keywords` and attaches normalized weights.
pub fn weigh_keywords(keywords: &[Keyword]) -> Vec<WeightedWord> {
    let sanitized = sanitize_keywords(keywords);
    let (min, max) = sanitized
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), k| {
            (lo.min(k.weight), hi.max(k.weight))
        });
    sanitized
        .into_iter()
        .map(|k| WeightedWord {
            normalized: normalize_weight(k.weight, min, max),
            word: k.word,
            weight: k.weight,
        })
        .collect()
}
