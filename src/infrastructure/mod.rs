pub mod extractor;

pub use extractor::{parse_trending_html, Extractor, TrendingExtractor};
