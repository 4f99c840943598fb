use core::fmt;
use std::str::FromStr;

use candle_core::{bail, Error};

/// Selects which correction stages run during a forward pass.
///
/// The stages always run in the fixed order centering, scaling, gating; a
/// mode never skips an earlier stage once a later one is selected. The mode
/// is fixed at construction, so the "unrecognized mode" failure of a
/// string-keyed configuration can only occur in [`Mode::from_str`], never
/// during a forward call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Identity: the input passes through untouched.
    None,
    /// Adaptive centering only.
    AdaptiveAverage,
    /// Adaptive centering, then adaptive scaling.
    AdaptiveScale,
    /// All three stages: centering, scaling, gating.
    #[default]
    Full,
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "none" => Ok(Mode::None),
            "adaptive_average" => Ok(Mode::AdaptiveAverage),
            "adaptive_scale" => Ok(Mode::AdaptiveScale),
            "full" => Ok(Mode::Full),
            _ => bail!("unrecognized normalization mode: {s:?}"),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Mode::None => "none",
            Mode::AdaptiveAverage => "adaptive_average",
            Mode::AdaptiveScale => "adaptive_scale",
            Mode::Full => "full",
        };
        write!(f, "{s}")
    }
}

/// Construction-time configuration for a [`DainLayer`].
///
/// [`DainLayer`]: crate::dain::layer::DainLayer
#[derive(Debug, Clone, Copy)]
pub struct DainConfig {
    /// Channel count; fixes the shape of every per-channel weight matrix and
    /// must match the channel axis of every input.
    pub input_dim: usize,
    /// Which stages run.
    pub mode: Mode,
    /// Floor for the spread estimate and threshold for the division clamp.
    pub eps: f64,
    /// Per-stage learning rate for the centering map. Carried for parity
    /// with the trained layer's constructor; no optimizer runs here.
    pub mean_lr: f64,
    /// Per-stage learning rate for the scaling map. Unused, see `mean_lr`.
    pub scale_lr: f64,
    /// Per-stage learning rate for the gating map. Unused, see `mean_lr`.
    pub gate_lr: f64,
}

impl DainConfig {
    /// Configuration with the reference defaults: full mode, `eps = 1e-8`.
    pub fn new(input_dim: usize) -> Self {
        DainConfig {
            input_dim,
            mode: Mode::Full,
            eps: 1e-8,
            mean_lr: 1e-5,
            scale_lr: 1e-5,
            gate_lr: 1e-3,
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }
}
