pub mod places;
pub mod search;
