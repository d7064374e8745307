pub mod device;
pub mod feature_key;
pub mod feature_vector;
pub mod image;
pub mod score;
