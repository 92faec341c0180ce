pub mod dashboard;
pub mod earnings;
pub mod error;
