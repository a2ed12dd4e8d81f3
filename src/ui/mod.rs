//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! The launcher runs unattended: it never prompts. Every message it shows
//! goes through [`output`] so verbosity flags apply everywhere.

pub mod output;
