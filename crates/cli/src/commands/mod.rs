pub mod analyze;
pub mod gpu;
pub mod optimize;
pub mod visualize;
