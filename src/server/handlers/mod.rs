pub mod details;
pub mod diagnose;
pub mod health;
