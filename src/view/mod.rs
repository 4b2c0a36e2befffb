pub mod filter;
pub mod sort;
pub mod summary;
pub mod urgency;
