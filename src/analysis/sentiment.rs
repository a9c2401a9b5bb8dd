use std::collections::HashSet;
use std::fmt;

/// Sentiment label attached to extracted content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn all() -> [Self; 3] {
        [Self::Positive, Self::Neutral, Self::Negative]
    }

    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "Positive" => Some(Self::Positive),
            "Neutral" => Some(Self::Neutral),
            "Negative" => Some(Self::Negative),
            _ => None,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

/// Assigns a sentiment label to a text
pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> Sentiment;
}

const POSITIVE_WORDS: &[&str] = &[
    "gain", "gains", "surge", "surges", "surged", "rally", "rallies", "rallied", "bull",
    "bullish", "growth", "grow", "grows", "rise", "rises", "rising", "rose", "soar", "soars",
    "soared", "record", "profit", "profits", "strong", "stronger", "boost", "boosts", "adoption",
    "approve", "approved", "approval", "breakthrough", "success", "successful", "optimism",
    "optimistic", "upgrade", "recover", "recovery", "win", "wins", "good", "great", "positive",
    "support", "partnership", "launch", "launches", "high", "higher", "outperform",
];

const NEGATIVE_WORDS: &[&str] = &[
    "loss", "losses", "drop", "drops", "dropped", "fall", "falls", "fell", "crash", "crashes",
    "crashed", "plunge", "plunges", "plunged", "bear", "bearish", "decline", "declines",
    "declined", "weak", "weaker", "hack", "hacked", "exploit", "scam", "fraud", "lawsuit", "sue",
    "sued", "ban", "banned", "risk", "risks", "fear", "fears", "sell-off", "selloff", "dump",
    "liquidation", "liquidations", "bad", "negative", "concern", "concerns", "warning", "low",
    "lower", "collapse", "collapsed", "volatile", "uncertainty",
];

/// Word-list sentiment scorer
///
/// Counts positive and negative lexicon hits; the sign of the difference decides
/// the label, a tie is neutral.
pub struct LexiconScorer {
    positive: HashSet<&'static str>,
    negative: HashSet<&'static str>,
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self {
            positive: POSITIVE_WORDS.iter().copied().collect(),
            negative: NEGATIVE_WORDS.iter().copied().collect(),
        }
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> Sentiment {
        let mut balance: i64 = 0;
        for token in tokenize(text) {
            if self.positive.contains(token.as_str()) {
                balance += 1;
            } else if self.negative.contains(token.as_str()) {
                balance -= 1;
            }
        }

        match balance {
            b if b > 0 => Sentiment::Positive,
            b if b < 0 => Sentiment::Negative,
            _ => Sentiment::Neutral,
        }
    }
}

/// Splits text into lowercase word tokens (letters, digits, inner hyphens)
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .map(|t| t.trim_matches('-'))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}
