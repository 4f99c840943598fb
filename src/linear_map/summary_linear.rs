use candle_core::{DType, Device, Module, Result, Tensor};
use candle_nn::{init, Init, Linear, VarBuilder, VarMap};

/// A square per-channel linear map applied to a summary vector.
///
/// Each normalization stage reduces its input over the time axis to a
/// `(Batch, Channel)` summary (a mean, or a root-mean-square spread) and then
/// passes that summary through one of these maps to obtain the adaptive
/// correction it applies. The weight matrix is always `(Channel, Channel)`;
/// the bias is optional and only the gating stage carries one.
#[derive(Debug)]
pub struct SummaryLinear(Linear);

impl SummaryLinear {
    /// Creates a bias-free map whose weight starts as the identity matrix.
    ///
    /// With an identity weight the map passes the summary through unchanged,
    /// so an untrained centering or scaling stage reduces to the plain
    /// per-window mean/spread computed directly from the data.
    pub fn identity(dim: usize, device: &Device) -> Result<Self> {
        let weight = Tensor::eye(dim, DType::F32, device)?;
        Ok(SummaryLinear(Linear::new(weight, None)))
    }

    /// Creates an affine map with a normal-initialized weight and a
    /// uniform-initialized bias. We use a `VarMap` to initialize the tensors
    /// using a config (configs here refers to a distribution, ex: uniform
    /// distribution). In this case the weight uses the Kaiming distribution.
    /// See [`Init`] for more details.
    pub fn affine(dim: usize, device: &Device) -> Result<Self> {
        let vmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&vmap, DType::F32, device);

        let ws = vb.get_with_hints((dim, dim), "weight", init::DEFAULT_KAIMING_NORMAL)?;
        let bound = 1. / (dim as f64).sqrt();
        let init_bs = Init::Uniform {
            lo: -bound,
            up: bound,
        };
        let bs = vb.get_with_hints(dim, "bias", init_bs)?;
        Ok(SummaryLinear(Linear::new(ws, Some(bs))))
    }

    /// Wraps an explicit weight matrix and optional bias, e.g. parameters
    /// trained elsewhere and loaded into memory.
    pub fn from_weights(weight: Tensor, bias: Option<Tensor>) -> Self {
        SummaryLinear(Linear::new(weight, bias))
    }

    /// Applies the map to a `(Batch, Channel)` summary, computing
    /// `summary · weightᵀ (+ bias)`. The result keeps the input's shape.
    pub fn apply(&self, summary: &Tensor) -> Result<Tensor> {
        self.0.forward(summary)
    }
}
