//! Finreport - financial report dashboard
//!
//! Loads summary, income-statement and balance-sheet records from a SQLite
//! warehouse or a JSON/Excel file, shapes them into report models and renders
//! them in the terminal or as a static HTML report. Amounts are written with
//! the Korean scale units 조/억/만.

pub mod aggregate;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod importers;
pub mod normalize;
pub mod presenters;
pub mod records;
pub mod reports;
pub mod ui;
pub mod utils;
pub mod warehouse;
