use candle_core::{bail, Device, Result, Tensor};

use crate::centering::centering::CenteringStage;
use crate::dain::config::{DainConfig, Mode};
use crate::gating::gating::GatingStage;
use crate::scaling::scaling::ScalingStage;

/// The Deep Adaptive Input Normalization layer.
///
/// Owns one map per stage (the only persistent state) and dispatches a
/// forward call through the stage chain selected by its [`Mode`]. Each stage
/// takes a tensor and returns a new one; nothing is retained between calls,
/// and weights are read-only during evaluation, so concurrent forward calls
/// against the same instance are safe.
#[derive(Debug)]
pub struct DainLayer {
    mode: Mode,
    input_dim: usize,
    centering: CenteringStage,
    scaling: ScalingStage,
    gating: GatingStage,
}

impl DainLayer {
    /// Creates a layer from a validated configuration. Centering and scaling
    /// maps start at the identity; the gating map starts normal-initialized.
    pub fn new(config: &DainConfig, device: &Device) -> Result<Self> {
        if config.input_dim == 0 {
            bail!("input_dim must be positive");
        }
        if config.eps <= 0. {
            bail!("eps must be positive, got {}", config.eps);
        }
        Ok(DainLayer {
            mode: config.mode,
            input_dim: config.input_dim,
            centering: CenteringStage::new(config.input_dim, device)?,
            scaling: ScalingStage::new(config.input_dim, config.eps, device)?,
            gating: GatingStage::new(config.input_dim, device)?,
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    /// Runs the stage chain for this layer's mode.
    /// (Batch, Channel, Time) --> (Batch, Channel, Time)
    pub fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let (_batch, channels, _time) = xs.dims3()?;
        if channels != self.input_dim {
            bail!(
                "input has {channels} channels, layer was built for {}",
                self.input_dim
            );
        }
        match self.mode {
            Mode::None => Ok(xs.clone()),
            Mode::AdaptiveAverage => self.centering.forward(xs),
            Mode::AdaptiveScale => {
                let xs = self.centering.forward(xs)?;
                self.scaling.forward(&xs)
            }
            Mode::Full => {
                let xs = self.centering.forward(xs)?;
                let xs = self.scaling.forward(&xs)?;
                self.gating.forward(&xs)
            }
        }
    }
}
