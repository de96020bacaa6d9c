//! Transport models shared by the solver and the HTTP service.
//!
//! These types carry no engine state; everything here is plain serde data.

pub mod chart;
pub mod wire;

pub use chart::{Font, Layout, Line, Marker, PlotData, Series, Shape, Trace, TraceKind};
pub use wire::{SolutionResponse, SolveRequest, StatusResponse};
