pub mod bai;
pub mod bdi;
pub mod smi;
pub mod ysq;
