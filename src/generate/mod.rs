pub mod edges;
pub mod normalizer;
pub mod sampler;
