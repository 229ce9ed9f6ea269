//! FIR kernel design and streaming overlap-add filtering

pub mod design;
pub mod fir;

pub use design::{design_kernel, TransitionBandwidth};
pub use fir::FirFilter;
