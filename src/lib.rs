#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! A room registration form: four fields, local persistence, and timed
//! feedback, rendered in the terminal.

pub mod config;
pub mod controller;
pub mod logging;
pub mod model;
pub mod storage;
pub mod tui;
