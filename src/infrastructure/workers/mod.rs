//! Background compilation workers

mod stylesheet;

pub use stylesheet::{compile_stylesheet, StylesheetError, StylesheetWorkerPool};
