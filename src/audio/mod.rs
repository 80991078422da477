pub mod analysis;
pub mod decode;
pub mod descriptors;
pub mod envelope;
pub mod features;
pub mod signal;
pub mod spectrum;
