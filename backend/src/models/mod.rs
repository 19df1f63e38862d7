pub mod journal_entry;
pub mod user;
