//! Folio Control - operator CLI for the experience-level table

pub mod commands;
pub mod display;
pub mod table_file;
