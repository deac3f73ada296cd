//! Schnorr proof of knowledge of a discrete log in the compact `(c, s)` form.
//!
//! Given public `y` and `g`, prove knowledge of `x` in `g * x = y`, bound to some context bytes like a nonce:
//! 1. Prover chooses a random `r` and computes `t = g * r`
//! 2. Computes challenge `c = H(g || y || t || context)`.
//! 3. Computes response `s = r + c*x` and sends `(c, s)` to the verifier.
//! 4. Verifier computes `t' = g * s - y * c` and checks `c == H(g || y || t' || context)`
//!
//! Unlike [`schnorr_pok::discrete_log::PokDiscreteLog`], the commitment `t` isn't sent as the verifier recomputes it.

use crate::{
    error::EcdaaError,
    util::{random_nonzero_scalar, Transcript},
};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::rand::RngCore;
use digest::Digest;
use dock_crypto_utils::serde_utils::ArkObjectBytes;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

const SCHNORR_LABEL: &[u8] = b"ECDAA-SCHNORR";

#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct SchnorrProof<F: PrimeField> {
    /// Challenge
    #[serde_as(as = "ArkObjectBytes")]
    pub c: F,
    /// Response
    #[serde_as(as = "ArkObjectBytes")]
    pub s: F,
}

impl<F: PrimeField> SchnorrProof<F> {
    /// Prove knowledge of `witness` such that `base * witness = y`
    pub fn new<G: AffineRepr<ScalarField = F>, D: Digest, R: RngCore>(
        rng: &mut R,
        witness: &F,
        base: &G,
        y: &G,
        context: &[u8],
    ) -> Result<Self, EcdaaError> {
        let mut r = random_nonzero_scalar::<F, _>(rng)?;
        let t = (*base * r).into_affine();
        let c = Self::challenge::<G, D>(base, y, &t, context)?;
        let s = r + c * witness;
        r.zeroize();
        Ok(Self { c, s })
    }

    pub fn verify<G: AffineRepr<ScalarField = F>, D: Digest>(
        &self,
        base: &G,
        y: &G,
        context: &[u8],
    ) -> Result<(), EcdaaError> {
        let t = (*base * self.s - *y * self.c).into_affine();
        if Self::challenge::<G, D>(base, y, &t, context)? != self.c {
            return Err(EcdaaError::InvalidProof);
        }
        Ok(())
    }

    fn challenge<G: AffineRepr<ScalarField = F>, D: Digest>(
        base: &G,
        y: &G,
        t: &G,
        context: &[u8],
    ) -> Result<F, EcdaaError> {
        let mut transcript = Transcript::new(SCHNORR_LABEL);
        transcript.append(base)?;
        transcript.append(y)?;
        transcript.append(t)?;
        transcript.append_bytes(context);
        Ok(transcript.challenge::<F, D>())
    }
}
