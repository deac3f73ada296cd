use ark_std::rand::{Error, RngCore};
use std::num::NonZeroU32;

/// Randomness source which is always unavailable. Only `try_fill_bytes` reports the failure, the infallible
/// methods panic.
pub struct FailingRng;

impl RngCore for FailingRng {
    fn next_u32(&mut self) -> u32 {
        panic!("FailingRng has no randomness")
    }

    fn next_u64(&mut self) -> u64 {
        panic!("FailingRng has no randomness")
    }

    fn fill_bytes(&mut self, _dest: &mut [u8]) {
        panic!("FailingRng has no randomness")
    }

    fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), Error> {
        Err(Error::from(NonZeroU32::new(Error::CUSTOM_START).unwrap()))
    }
}
