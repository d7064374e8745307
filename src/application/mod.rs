pub mod add_image;
pub mod encoding;
pub mod matching;
pub mod ranker;
pub mod session;
pub mod store;
