//! Message handling - turning raw chat text into updates

pub mod parser;

pub use parser::MessageParser;
