pub mod ecdaa;
pub mod rng;
#[macro_use]
pub mod serialization;
