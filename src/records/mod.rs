pub mod degree;
pub mod edge;
