//! Seismic amplitude tuning core.
//!
//! * [`data`] – the trace grid model and the SEG-Y codec.
//! * [`amplify`] – window rasterization, transition masks and the
//!   amplitude engine that scales or aligns a selected window.
//!
//! Every operation is synchronous and stateless: inputs are borrowed,
//! outputs are freshly allocated.

pub mod amplify;
pub mod data;
pub mod error;

pub use error::{Error, Result};
