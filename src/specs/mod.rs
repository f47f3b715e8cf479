// src/specs/mod.rs
//! # Table reading
//!
//! Knows how to turn one located `<table>` into an [`ExtractedTable`](crate::data::ExtractedTable).
//!
//! ## What lives here
//! - **Header shaping**: single vs. multi-level headers, flattening each
//!   column's labels into one name, positional names when there is no header.
//! - **Cleanup**: trimming names, dropping placeholder (`Unnamed…`) columns,
//!   de-duplicating what is left.
//! - **Scalar typing** of cells (text / number / missing) per column.
//!
//! ## What does **not** live here
//! - Finding the table on the page (`core::html`).
//! - Row/col-span expansion and visible-text extraction (`core::grid`).
//! - Writing files or the database (`file`, `store`).
//!
//! ## Typical call chain
//! ```text
//! runner → core::net (markup) → core::html::select_table → specs::table::parse_table
//!                                                       ↘ ExtractedTable → file::write_outputs
//! ```
//!
//! ## Testing notes
//! Everything here runs offline against markup strings or fixture files.
pub mod table;
