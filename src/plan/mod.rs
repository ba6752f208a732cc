//! The planning engine: recursive tree comparison (`walker`) and the
//! fixed-point duplicate-target resolution pass (`resolve`).

pub mod resolve;
pub mod walker;

pub use walker::Walker;
