//! Pointer analysis: an Andersen-style, on-the-fly points-to analysis with
//! one solver shared by both the context-insensitive (§4.7) and
//! context-sensitive (§4.8) variants, distinguished only by the
//! [`selector::ContextSelector`] passed in.

pub mod context;
pub mod pfg;
pub mod pointer;
pub mod result;
pub mod selector;
pub mod solver;

pub use result::PointsToResult;
pub use solver::analyze;
