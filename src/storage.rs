mod data_file;
pub mod text;

pub use data_file::{DataFile, LoadError};
pub use text::{ImportSummary, MalformedRecord, Reason};
