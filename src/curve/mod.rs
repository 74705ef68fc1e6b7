//! Curve construction: tenor ordering, anchor dates and assembly.

pub mod anchor;
pub mod assemble;
pub mod tenor;

pub use anchor::*;
pub use assemble::*;
pub use tenor::*;
