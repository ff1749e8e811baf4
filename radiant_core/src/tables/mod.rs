//! # Design Tables
//!
//! Immutable design data read by the solver. Everything here is static and
//! shared read-only, so any number of circuits can be evaluated concurrently
//! without locking.
//!
//! ## Tables
//!
//! - [`kh_coefficients`] - Heat-output coefficient KH by construction
//! - [`pipe_sizes`] - Pipe bore, maximum loop length, water content
//! - [`room_types`] - Comfort limits for floor surface temperature

pub mod kh_coefficients;
pub mod pipe_sizes;
pub mod room_types;

pub use kh_coefficients::{CoefficientTable, KhEntry, KhMatch};
pub use pipe_sizes::{PipeSpec, PIPE_SIZES};
pub use room_types::RoomType;
