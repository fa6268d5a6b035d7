pub mod sequence;
pub mod source;
pub mod transform;
