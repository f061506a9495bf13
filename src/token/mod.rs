//! Bearer token codec

pub mod maker;
pub mod payload;

pub use maker::TokenMaker;
pub use payload::Payload;
