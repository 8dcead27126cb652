#![warn(clippy::pedantic, future_incompatible, missing_debug_implementations)]
#![allow(clippy::module_name_repetitions)]

//! `flowcore` is the analytical core of a static-analysis toolkit for a
//! class-based intermediate representation: a generic monotone dataflow
//! solver, integer constant propagation, a dead-code detector, class-hierarchy
//! (CHA) call-graph construction, and context-insensitive/context-sensitive
//! pointer analysis sharing a single on-the-fly solver.
//!
//! IR parsing, class loading, CLI wiring, and result serialization are
//! outside this crate's scope. Callers construct a [`world::World`] directly
//! (see [`ir::builder`] for an ergonomic way to assemble one) and hand it to
//! the analyses in [`dataflow`], [`callgraph`], and [`pta`].

pub mod callgraph;
pub mod dataflow;
pub mod ir;
pub mod pta;
pub mod world;
