pub mod feature_entry;
pub mod match_item;
