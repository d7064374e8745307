pub mod device_runtime;
pub mod embedding_port;
pub mod feature_repository;
pub mod similarity_index;
