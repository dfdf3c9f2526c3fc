//! Lexicon-based sentiment scoring
//!
//! Scores text against a small financial-news lexicon, producing a compound
//! polarity in [-1.0, 1.0]. A token hit directly preceded by a negator has
//! its polarity flipped ("not profitable" counts as negative).
//!
//! Scoring is a smoothed polarity ratio over lexicon hits:
//! `(positive - negative) / (positive + negative + 1)`, which is bounded
//! inside (-1, 1) by construction and returns 0 for text with no hits.

use once_cell::sync::Lazy;
use std::collections::HashSet;

static POSITIVE: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "advance", "advances", "advanced", "beat", "beats", "boost", "boosts", "boosted",
        "breakout", "bullish", "buy", "climb", "climbs", "climbed", "exceed", "exceeds",
        "exceeded", "gain", "gains", "gained", "growth", "improve", "improves", "improved",
        "improvement", "jump", "jumps", "jumped", "momentum", "optimistic", "outperform",
        "outperformed", "positive", "profit", "profitable", "profits", "rally", "rallies",
        "rallied", "rebound", "rebounds", "record", "recovery", "robust", "soar", "soars",
        "soared", "strong", "stronger", "strongest", "success", "successful", "surge",
        "surges", "surged", "upbeat", "upgrade", "upgraded", "upside", "win", "wins", "winner",
    ]
    .into_iter()
    .collect()
});

static NEGATIVE: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "bankruptcy", "bearish", "concern", "concerns", "crash", "crashes", "crashed", "cut",
        "cuts", "debt", "decline", "declines", "declined", "default", "disappointing",
        "disappointed", "downgrade", "downgraded", "downside", "downturn", "drop", "drops",
        "dropped", "fall", "falls", "fell", "fear", "fears", "fraud", "investigation",
        "lawsuit", "layoffs", "loss", "losses", "lost", "miss", "misses", "missed", "negative",
        "plunge", "plunges", "plunged", "probe", "recession", "risk", "risks", "risky", "sank",
        "sell", "selloff", "sink", "sinks", "slid", "slide", "slides", "slowdown", "slump",
        "slumps", "slumped", "tumble", "tumbles", "tumbled", "underperform", "volatile",
        "warn", "warning", "warns", "weak", "weaker", "weakness", "worried", "worries",
    ]
    .into_iter()
    .collect()
});

static NEGATORS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "not", "no", "never", "without", "hardly", "barely", "isn't", "wasn't", "aren't",
        "don't", "doesn't", "didn't", "won't", "can't", "couldn't",
    ]
    .into_iter()
    .collect()
});

/// Sentiment for one news article: title score, content score, and their
/// arithmetic mean. All three are present or all three are absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArticleSentiment {
    pub title: Option<f64>,
    pub content: Option<f64>,
    pub combined: Option<f64>,
}

impl ArticleSentiment {
    pub fn unavailable() -> Self {
        Self {
            title: None,
            content: None,
            combined: None,
        }
    }

    pub fn is_scored(&self) -> bool {
        self.combined.is_some()
    }
}

/// Compound sentiment of a text passage, in [-1.0, 1.0].
pub fn score(text: &str) -> f64 {
    let tokens: Vec<String> = text
        .split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect();

    let mut positive = 0i64;
    let mut negative = 0i64;

    for (idx, token) in tokens.iter().enumerate() {
        let polarity = if POSITIVE.contains(token.as_str()) {
            1
        } else if NEGATIVE.contains(token.as_str()) {
            -1
        } else {
            continue;
        };

        let negated = idx > 0 && NEGATORS.contains(tokens[idx - 1].as_str());
        let polarity = if negated { -polarity } else { polarity };

        if polarity > 0 {
            positive += 1;
        } else {
            negative += 1;
        }
    }

    if positive + negative == 0 {
        return 0.0;
    }

    let raw = (positive - negative) as f64 / (positive + negative + 1) as f64;
    raw.clamp(-1.0, 1.0)
}

/// Score a title/content pair. When either part is missing the whole
/// article counts as unavailable and every field is null, matching how
/// the accumulated files encode unfetchable articles.
pub fn score_article(title: &str, content: &str) -> ArticleSentiment {
    if title.trim().is_empty() || content.trim().is_empty() {
        return ArticleSentiment::unavailable();
    }

    let title_score = score(title);
    let content_score = score(content);
    ArticleSentiment {
        title: Some(title_score),
        content: Some(content_score),
        combined: Some((title_score + content_score) / 2.0),
    }
}
