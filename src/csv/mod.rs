//! CSV line scanning and field splitting

mod parser;
mod scanner;

pub use parser::CsvParser;
pub use scanner::LineScanner;
