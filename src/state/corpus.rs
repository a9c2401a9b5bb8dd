use crate::analysis::Sentiment;

/// Accumulated text and sentiment labels of every successfully extracted page
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    text: String,
    sentiments: Vec<Sentiment>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one page's content (newline terminated) and its sentiment
    pub fn push(&mut self, content: &str, sentiment: Sentiment) {
        self.text.push_str(content);
        self.text.push('\n');
        self.sentiments.push(sentiment);
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sentiments(&self) -> &[Sentiment] {
        &self.sentiments
    }
}
