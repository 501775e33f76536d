pub mod composite;
pub(crate) mod cpu;

pub use cpu::MAX_SIDE;
