pub mod embeddings;
pub mod sqlite;
pub mod vector;
