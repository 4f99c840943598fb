use candle_core::{Device, Result, Tensor, D};

use crate::linear_map::summary_linear::SummaryLinear;

/// Divides a window by an adaptively estimated per-channel spread.
///
/// The spread summary is the root-mean-square of the (already centered)
/// window, floored by `eps` so a constant channel yields `sqrt(eps)` rather
/// than zero. The summary then passes through a learned per-channel map; any
/// mapped value at or below `eps` divides as `1` instead, so a degenerate
/// learned weight can never blow the division up or propagate NaN.
#[derive(Debug)]
pub struct ScalingStage {
    map: SummaryLinear,
    eps: f64,
}

impl ScalingStage {
    /// Creates a scaling stage with an identity-initialized map.
    pub fn new(input_dim: usize, eps: f64, device: &Device) -> Result<Self> {
        let map = SummaryLinear::identity(input_dim, device)?;
        Ok(ScalingStage { map, eps })
    }

    /// Creates a scaling stage around an existing map, e.g. trained weights.
    pub fn from_map(map: SummaryLinear, eps: f64) -> Self {
        ScalingStage { map, eps }
    }

    /// Divides out the adaptive per-channel spread.
    /// (Batch, Channel, Time) --> (Batch, Channel, Time)
    pub fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        // (Batch, Channel, Time) --> (Batch, Channel)
        let mean_sq = xs.sqr()?.mean(D::Minus1)?;
        let std = mean_sq.affine(1., self.eps)?.sqrt()?;
        let adaptive_scale = self.map.apply(&std)?;

        // divisors at or below eps are replaced with 1
        let degenerate = adaptive_scale.le(self.eps)?;
        let adaptive_scale = degenerate.where_cond(&adaptive_scale.ones_like()?, &adaptive_scale)?;

        xs.broadcast_div(&adaptive_scale.unsqueeze(D::Minus1)?)
    }
}
