//! Feature modules

pub mod instruction;
pub mod report_parsing;
pub mod timeline;
