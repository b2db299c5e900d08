//! Line grammars and the report parser

pub mod line_grammar;
pub mod report_parser;

pub use report_parser::ReportParser;
