pub mod catalog;
pub mod checkin;
pub mod config;
pub mod error;

// Re-export common error type
pub use error::CheckInError;
