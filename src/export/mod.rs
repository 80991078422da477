pub mod plot;
pub mod xml;
