use candle_core::{Device, Result, Tensor, D};
use candle_nn::ops::sigmoid;

use crate::linear_map::summary_linear::SummaryLinear;

/// Attenuates each channel by a learned sigmoid gate.
///
/// The gate is computed from the time-mean of the normalized window through
/// an affine map (this is the only stage whose map carries a bias) and a
/// sigmoid, so it lies strictly in (0, 1): a channel can be suppressed but
/// never amplified beyond its incoming magnitude.
#[derive(Debug)]
pub struct GatingStage {
    map: SummaryLinear,
}

impl GatingStage {
    /// Creates a gating stage with a normal-initialized affine map.
    pub fn new(input_dim: usize, device: &Device) -> Result<Self> {
        let map = SummaryLinear::affine(input_dim, device)?;
        Ok(GatingStage { map })
    }

    /// Creates a gating stage around an existing map, e.g. trained weights.
    pub fn from_map(map: SummaryLinear) -> Self {
        GatingStage { map }
    }

    /// Multiplies each channel by its gate.
    /// (Batch, Channel, Time) --> (Batch, Channel, Time)
    pub fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        // (Batch, Channel, Time) --> (Batch, Channel)
        let avg = xs.mean(D::Minus1)?;
        let gate = sigmoid(&self.map.apply(&avg)?)?;
        xs.broadcast_mul(&gate.unsqueeze(D::Minus1)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::DType;

    #[test]
    fn verify_gate_attenuates_only() {
        let device = Device::Cpu;
        let stage = GatingStage::new(3, &device).unwrap();
        let xs = Tensor::new(
            &[[[1f32, -2., 3., -4.], [0.5, 0.5, 0.5, 0.5], [-1., 1., -1., 1.]]],
            &device,
        )
        .unwrap();

        let out = stage.forward(&xs).unwrap();
        assert_eq!(out.dims(), xs.dims());

        let out = out.to_vec3::<f32>().unwrap();
        let inp = xs.to_vec3::<f32>().unwrap();
        for (row_out, row_in) in out[0].iter().zip(inp[0].iter()) {
            for (o, i) in row_out.iter().zip(row_in.iter()) {
                assert!(o.abs() < i.abs(), "gate amplified {i} to {o}");
                // a sigmoid gate preserves sign
                assert_eq!(o.signum(), i.signum());
            }
        }
    }

    #[test]
    fn verify_gate_strictly_positive() {
        let device = Device::Cpu;
        let stage = GatingStage::new(2, &device).unwrap();
        let xs = Tensor::ones((1, 2, 4), DType::F32, &device).unwrap();
        let out = stage.forward(&xs).unwrap().to_vec3::<f32>().unwrap();
        // on an all-ones input the output is the gate itself
        for row in &out[0] {
            for g in row {
                assert!(*g > 0. && *g < 1., "gate out of range: {g}");
            }
        }
    }
}
