//! Revocation of members.
//!
//! Two independent policies which the verifier can apply in any combination:
//! - [`SecretKeyRevocationList`]: secret keys of compromised members. A signature's pseudonym `K = J*sk` is
//!   checked against `J*sk'` for each revoked `sk'`, where `J` is the basename hash or, without a basename, the
//!   signature's `R`.
//! - [`PseudonymRevocationList`]: pseudonyms `(basename, K)` flagged as malicious. Only signatures made with a basename
//!   can match.
//!
//! A policy is anything implementing [`RevocationCheck`]. `()` means no revocation, and `Option`s, references and
//! pairs of policies are policies too, so `(&sk_list, &pseudonym_list)` applies both lists.

use crate::error::EcdaaError;
use ark_ec::{pairing::Pairing, CurveGroup};
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{cfg_iter, vec::Vec};
use dock_crypto_utils::serde_utils::ArkObjectBytes;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The pseudonym of a signature and what it was derived from
#[derive(Clone, Copy, Debug)]
pub struct Pseudonym<'a, E: Pairing> {
    /// `K = J*sk`
    pub K: &'a E::G1Affine,
    /// `J`, the basename hash or the signature's `R`
    pub base: &'a E::G1Affine,
    pub basename: Option<&'a [u8]>,
}

pub trait RevocationCheck<E: Pairing> {
    /// Return `Err(EcdaaError::Revoked)` if the pseudonym belongs to a revoked member
    fn check(&self, pseudonym: &Pseudonym<E>) -> Result<(), EcdaaError>;
}

/// Secret keys of revoked members. Order and duplicates don't matter.
#[serde_as]
#[derive(
    Clone,
    PartialEq,
    Eq,
    Debug,
    Default,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
)]
pub struct SecretKeyRevocationList<F: PrimeField>(#[serde_as(as = "Vec<ArkObjectBytes>")] pub Vec<F>);

#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct RevokedPseudonym<E: Pairing> {
    pub basename: Vec<u8>,
    #[serde_as(as = "ArkObjectBytes")]
    pub K: E::G1Affine,
}

/// Pseudonyms of revoked members. Order and duplicates don't matter.
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct PseudonymRevocationList<E: Pairing>(pub Vec<RevokedPseudonym<E>>);

impl<F: PrimeField> SecretKeyRevocationList<F> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn revoke(&mut self, sk: F) {
        self.0.push(sk)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_pseudonym<E: Pairing<ScalarField = F>>(&self, pseudonym: &Pseudonym<E>) -> bool {
        let base = *pseudonym.base;
        let K = *pseudonym.K;
        cfg_iter!(self.0).any(|sk| (base * sk).into_affine() == K)
    }
}

impl<E: Pairing> PseudonymRevocationList<E> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn revoke(&mut self, basename: Vec<u8>, K: E::G1Affine) {
        self.0.push(RevokedPseudonym { basename, K })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_pseudonym(&self, pseudonym: &Pseudonym<E>) -> bool {
        match pseudonym.basename {
            Some(basename) => cfg_iter!(self.0)
                .any(|entry| entry.K == *pseudonym.K && entry.basename.as_slice() == basename),
            None => false,
        }
    }
}

impl<E: Pairing> Default for PseudonymRevocationList<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Pairing> RevocationCheck<E> for SecretKeyRevocationList<E::ScalarField> {
    fn check(&self, pseudonym: &Pseudonym<E>) -> Result<(), EcdaaError> {
        if self.contains_pseudonym(pseudonym) {
            return Err(EcdaaError::Revoked);
        }
        Ok(())
    }
}

impl<E: Pairing> RevocationCheck<E> for PseudonymRevocationList<E> {
    fn check(&self, pseudonym: &Pseudonym<E>) -> Result<(), EcdaaError> {
        if self.contains_pseudonym(pseudonym) {
            return Err(EcdaaError::Revoked);
        }
        Ok(())
    }
}

/// No revocation
impl<E: Pairing> RevocationCheck<E> for () {
    fn check(&self, _pseudonym: &Pseudonym<E>) -> Result<(), EcdaaError> {
        Ok(())
    }
}

impl<E: Pairing, T: RevocationCheck<E> + ?Sized> RevocationCheck<E> for &T {
    fn check(&self, pseudonym: &Pseudonym<E>) -> Result<(), EcdaaError> {
        (**self).check(pseudonym)
    }
}

impl<E: Pairing, T: RevocationCheck<E>> RevocationCheck<E> for Option<T> {
    fn check(&self, pseudonym: &Pseudonym<E>) -> Result<(), EcdaaError> {
        match self {
            Some(policy) => policy.check(pseudonym),
            None => Ok(()),
        }
    }
}

impl<E: Pairing, A: RevocationCheck<E>, B: RevocationCheck<E>> RevocationCheck<E> for (A, B) {
    fn check(&self, pseudonym: &Pseudonym<E>) -> Result<(), EcdaaError> {
        self.0.check(pseudonym)?;
        self.1.check(pseudonym)
    }
}
