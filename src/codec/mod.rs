//! Wire codec: frame assembly/parsing and the primitives they build on.

pub mod address;
pub mod bits;
pub mod frame;
pub mod parser;
pub mod primitive;
