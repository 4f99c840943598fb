//! Deep Adaptive Input Normalization (DAIN) for multivariate time-series
//! windows.
//!
//! Fixed per-window instance normalization subtracts the observed mean and
//! divides by the observed spread. DAIN instead passes both summaries through
//! learned per-channel linear maps before applying them, and optionally gates
//! each channel with a learned sigmoid. Three stages run in a fixed order,
//! selected by [`Mode`]:
//!
//! 1. [`CenteringStage`] - remove an adaptively estimated per-channel mean
//! 2. [`ScalingStage`] - divide by an adaptively estimated per-channel spread
//! 3. [`GatingStage`] - attenuate each channel by a sigmoid gate in (0, 1)
//!
//! Inputs are rank-3 tensors shaped `(batch, channel, time)`; the output of
//! every mode has exactly the input's shape. The layer is a pure forward
//! computation: weights are fixed at construction and read-only during
//! `forward`, so concurrent calls against one instance are safe.

pub mod centering;
pub mod dain;
pub mod gating;
pub mod linear_map;
pub mod scaling;

pub use centering::centering::CenteringStage;
pub use dain::config::{DainConfig, Mode};
pub use dain::layer::DainLayer;
pub use gating::gating::GatingStage;
pub use linear_map::summary_linear::SummaryLinear;
pub use scaling::scaling::ScalingStage;
