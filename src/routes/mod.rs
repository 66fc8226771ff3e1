pub mod cors;
pub mod user;
