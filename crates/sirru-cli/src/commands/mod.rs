pub mod breathe;
pub mod config;
pub mod faru;
pub mod koamas;
pub mod profile;
pub mod pulse;
