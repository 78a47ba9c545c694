//! Common value types shared by decoders and applications

pub mod errors;
pub mod transactions;
pub mod values;
