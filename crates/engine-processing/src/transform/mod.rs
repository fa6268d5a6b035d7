pub mod follow;
pub mod map;
