pub mod codec;
pub mod file_repo;
