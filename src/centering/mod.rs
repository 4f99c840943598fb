pub mod centering;
