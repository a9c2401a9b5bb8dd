//! Content analysis: sentiment scoring and visualization data

mod sentiment;
mod visual;

pub use sentiment::{tokenize, LexiconScorer, Sentiment, SentimentScorer};
pub use visual::{
    ChartSlice, SentimentChart, TallyVisualizer, VisualError, VisualizationBuilder, WordCloud,
};
