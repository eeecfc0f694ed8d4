//! Matchrate - agreement statistics between human and AI issue ratings
//!
//! - [`normalize`] maps raw ratings onto canonical labels
//! - [`aggregate`] computes match rates and cross-tabs for a rating table
//! - [`compare`] charts match rates from several runs

pub mod aggregate;
pub mod cli;
pub mod compare;
pub mod config;
pub mod models;
pub mod normalize;
pub mod reporters;
pub mod table;
