pub mod account;
pub mod file;
