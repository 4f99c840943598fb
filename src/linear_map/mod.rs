pub mod summary_linear;
