//! Sampling and hashing helpers shared by the protocols

use crate::error::EcdaaError;
use ark_ec::AffineRepr;
use ark_ff::PrimeField;
use ark_serialize::CanonicalSerialize;
use ark_std::{rand::RngCore, vec, vec::Vec, Zero};
use digest::Digest;
use dock_crypto_utils::{concat_slices, hashing_utils::affine_group_elem_from_try_and_incr};
use schnorr_pok::compute_random_oracle_challenge;
use zeroize::Zeroize;

/// Domain separation for hashing a basename to a point in G1
pub const BASENAME_LABEL: &[u8] = b"ECDAA-BASENAME-TO-G1";

/// Number of bytes in the big-endian encoding of a scalar
pub fn scalar_byte_len<F: PrimeField>() -> usize {
    (F::MODULUS_BIT_SIZE as usize + 7) / 8
}

/// Sample a uniformly random non-zero scalar. Reads 16 bytes more than the scalar size so that the
/// modular reduction is statistically close to uniform. A zero sample is discarded and drawn again.
pub fn random_nonzero_scalar<F: PrimeField, R: RngCore>(rng: &mut R) -> Result<F, EcdaaError> {
    let mut bytes = vec![0u8; scalar_byte_len::<F>() + 16];
    loop {
        rng.try_fill_bytes(&mut bytes)
            .map_err(|_| EcdaaError::RandomnessFailure)?;
        let s = F::from_le_bytes_mod_order(&bytes);
        if !s.is_zero() {
            bytes.zeroize();
            return Ok(s);
        }
    }
}

/// Hash the basename to a point in the prime order subgroup of `G`. Variable time but the basename is public.
pub fn hash_basename<G: AffineRepr, D: Digest>(basename: &[u8]) -> G {
    affine_group_elem_from_try_and_incr::<G, D>(&concat_slices!(BASENAME_LABEL, basename))
}

/// `p * order == 0`, i.e. `p` lies in the prime order subgroup. Only needed for points that did not come
/// through a validating deserializer.
pub fn is_in_prime_order_subgroup<G: AffineRepr>(p: &G) -> bool {
    p.mul_bigint(G::ScalarField::MODULUS).is_zero()
}

/// Transcript that proof challenges are computed over
#[derive(Default)]
pub struct Transcript(Vec<u8>);

impl Transcript {
    pub fn new(label: &[u8]) -> Self {
        let mut t = Self(Vec::new());
        t.append_bytes(label);
        t
    }

    /// Appends the length as u64 big-endian followed by the bytes so that adjacent variable length
    /// fields can't be shifted into each other
    pub fn append_bytes(&mut self, bytes: &[u8]) {
        self.0.extend_from_slice(&(bytes.len() as u64).to_be_bytes());
        self.0.extend_from_slice(bytes);
    }

    pub fn append<T: CanonicalSerialize>(&mut self, elem: &T) -> Result<(), EcdaaError> {
        elem.serialize_compressed(&mut self.0)?;
        Ok(())
    }

    pub fn challenge<F: PrimeField, D: Digest>(&self) -> F {
        compute_random_oracle_challenge::<F, D>(&self.0)
    }
}
