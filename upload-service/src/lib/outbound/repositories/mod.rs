pub mod account;
pub mod file;

pub use account::SqliteAccountRepository;
pub use file::SqliteFileRepository;
