pub mod gating;
