pub mod module;
pub mod port;

pub use module::Module;
pub use port::{Reg, Wire};
