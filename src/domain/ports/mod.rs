pub mod document_repository;
pub mod embedding_port;
pub mod vector_index;
pub mod widget_repository;
