//! Core module - Catalogs, templates, project creation and console helpers

pub mod catalog;
pub mod config;
pub mod error;
pub mod project;
pub mod report;
pub mod runner;
pub mod select;
pub mod template;

pub use error::{Error, Result};
