pub mod documents;
pub mod reindex;
pub mod search;
pub mod seed;
pub mod widgets;
