pub mod entry_reader;
pub mod payee_reader;
