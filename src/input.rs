pub mod parser;

pub use parser::{CommandLine, Keyword, parse_command_line};
