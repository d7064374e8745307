pub mod devices;
pub mod embeddings;
pub mod memory;
pub mod snapshot;
pub mod sqlite;
