//! sheetjson - Spreadsheet workbook to JSON table converter for game editor tooling
//!
//! This crate reads a workbook (XLS, XLSX, XLSB or ODS), treats the first
//! non-blank row of each worksheet as a header, folds merged header cells into
//! multi-value fields and writes the rows as JSON records keyed by header name.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sheetjson::ConverterBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Writes `items_<sheet>.json` next to the workbook
//!     let converter = ConverterBuilder::new().build()?;
//!     converter.convert_path("data/items.xlsx")?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # One document per workbook
//!
//! ```rust,no_run
//! use sheetjson::{ConverterBuilder, OutputLayout};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new()
//!         .with_layout(OutputLayout::Workbook)
//!         .with_output_dir("json")
//!         .with_pretty(true)
//!         .build()?;
//!     converter.convert_path("data/items.xlsx")?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # In-memory conversion
//!
//! ```rust,no_run
//! use std::io::Cursor;
//! use sheetjson::ConverterBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let converter = ConverterBuilder::new().build()?;
//! let workbook: Vec<u8> = vec![]; // Your workbook bytes
//! for document in converter.convert(Cursor::new(workbook), "items.xlsx")? {
//!     println!("{}: {}", document.file_name, document.to_json(false)?);
//! }
//! # Ok(())
//! # }
//! ```

mod api;
mod builder;
mod error;
mod formatter;
mod grid;
mod output;
mod parser;
mod security;
mod table;
mod types;

// 公開API
pub use api::{DateMode, OutputLayout};
pub use builder::{Converter, ConverterBuilder};
pub use error::SheetJsonError;
pub use output::{DocumentBody, OutputDocument};
pub use types::{RowRecord, SheetTable, WorkbookTable};
