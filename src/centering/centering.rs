use candle_core::{Device, Result, Tensor, D};

use crate::linear_map::summary_linear::SummaryLinear;

/// Removes an adaptively estimated per-channel mean from a window.
///
/// Instead of subtracting the observed time-mean directly, the stage passes
/// it through a learned per-channel map and subtracts the mapped value. With
/// the map at its identity initialization this is exactly plain mean removal.
#[derive(Debug)]
pub struct CenteringStage {
    map: SummaryLinear,
}

impl CenteringStage {
    /// Creates a centering stage with an identity-initialized map.
    pub fn new(input_dim: usize, device: &Device) -> Result<Self> {
        let map = SummaryLinear::identity(input_dim, device)?;
        Ok(CenteringStage { map })
    }

    /// Creates a centering stage around an existing map, e.g. trained weights.
    pub fn from_map(map: SummaryLinear) -> Self {
        CenteringStage { map }
    }

    /// Subtracts the adaptive per-channel mean.
    /// (Batch, Channel, Time) --> (Batch, Channel, Time)
    pub fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        // (Batch, Channel, Time) --> (Batch, Channel)
        let avg = xs.mean(D::Minus1)?;
        let adaptive_bias = self.map.apply(&avg)?;
        // broadcast the bias back over the time axis
        xs.broadcast_sub(&adaptive_bias.unsqueeze(D::Minus1)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_identity_map_centers_exactly() {
        let device = Device::Cpu;
        let stage = CenteringStage::new(2, &device).unwrap();
        let xs = Tensor::new(
            &[[[0f32, 1., 2., 3., 4.], [5., 6., 7., 8., 9.]]],
            &device,
        )
        .unwrap();

        let out = stage.forward(&xs).unwrap();
        assert_eq!(out.dims(), xs.dims());

        let means = out.mean(D::Minus1).unwrap().to_vec2::<f32>().unwrap();
        for m in &means[0] {
            assert!(m.abs() < 1e-6, "time-mean not removed: {m}");
        }
    }

    #[test]
    fn verify_centered_values() {
        let device = Device::Cpu;
        let stage = CenteringStage::new(1, &device).unwrap();
        let xs = Tensor::new(&[[[10f32, 20., 30.]]], &device).unwrap();
        let out = stage.forward(&xs).unwrap().to_vec3::<f32>().unwrap();
        assert_eq!(out[0][0], vec![-10., 0., 10.]);
    }
}
