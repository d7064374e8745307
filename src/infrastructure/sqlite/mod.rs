pub mod feature_repo;
pub mod migrations;
