//! Member's keys and the request a member sends to the issuer to join the group.
//!
//! The member proves possession of its secret key with a Schnorr proof bound to a nonce chosen by the issuer which
//! prevents replaying another member's public key. An empty nonce means no proof is created or expected.

use crate::{
    error::EcdaaError,
    schnorr::SchnorrProof,
    util::{is_in_prime_order_subgroup, random_nonzero_scalar},
};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{end_timer, rand::RngCore, start_timer};
use digest::Digest;
use dock_crypto_utils::serde_utils::ArkObjectBytes;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Largest nonce the issuer accepts in a join request, 1 MiB
pub const MAX_NONCE_LENGTH: usize = 1 << 20;

#[serde_as]
#[derive(
    Clone,
    PartialEq,
    Eq,
    Debug,
    CanonicalSerialize,
    CanonicalDeserialize,
    Zeroize,
    ZeroizeOnDrop,
    Serialize,
    Deserialize,
)]
pub struct MemberSecretKey<F: PrimeField>(#[serde_as(as = "ArkObjectBytes")] pub F);

/// `Q = G1 * sk`
#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct MemberPublicKey<E: Pairing>(#[serde_as(as = "ArkObjectBytes")] pub E::G1Affine);

/// Member's secret key kept together with its public key
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct MemberKeyPair<E: Pairing> {
    pub public_key: MemberPublicKey<E>,
    pub secret_key: MemberSecretKey<E::ScalarField>,
}

/// Proof of possession of the member's secret key, bound to the issuer's nonce
pub type MemberKeyProof<F> = SchnorrProof<F>;

/// Member's public key along with the proof of possession, sent to the issuer
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct JoinRequest<E: Pairing> {
    pub public_key: MemberPublicKey<E>,
    pub proof: Option<MemberKeyProof<E::ScalarField>>,
}

impl<F: PrimeField> MemberSecretKey<F> {
    pub fn new<R: RngCore>(rng: &mut R) -> Result<Self, EcdaaError> {
        Ok(Self(random_nonzero_scalar(rng)?))
    }
}

impl<F: PrimeField> AsRef<F> for MemberSecretKey<F> {
    fn as_ref(&self) -> &F {
        &self.0
    }
}

impl<E: Pairing> MemberPublicKey<E> {
    pub fn new(sk: &MemberSecretKey<E::ScalarField>) -> Self {
        Self((E::G1Affine::generator() * sk.0).into_affine())
    }

    /// Public key must not be the identity and must lie in the prime order subgroup
    pub fn is_valid(&self) -> bool {
        !self.0.is_zero() && is_in_prime_order_subgroup(&self.0)
    }

    /// Check the proof of possession against the issuer's nonce. With an empty nonce there must be no proof.
    pub fn validate<D: Digest>(
        &self,
        nonce: &[u8],
        proof: Option<&MemberKeyProof<E::ScalarField>>,
    ) -> Result<(), EcdaaError> {
        if self.0.is_zero() {
            return Err(EcdaaError::InvalidPublicKey);
        }
        match proof {
            Some(proof) => proof.verify::<E::G1Affine, D>(&E::G1Affine::generator(), &self.0, nonce),
            None if nonce.is_empty() => Ok(()),
            None => Err(EcdaaError::InvalidProof),
        }
    }
}

impl<E: Pairing> MemberKeyPair<E> {
    pub fn new(secret_key: MemberSecretKey<E::ScalarField>) -> Self {
        Self {
            public_key: MemberPublicKey::new(&secret_key),
            secret_key,
        }
    }

    /// `Q = G1 * sk`
    pub fn is_consistent(&self) -> bool {
        MemberPublicKey::new(&self.secret_key) == self.public_key
    }
}

impl<E: Pairing> AsRef<E::G1Affine> for MemberPublicKey<E> {
    fn as_ref(&self) -> &E::G1Affine {
        &self.0
    }
}

impl<E: Pairing> JoinRequest<E> {
    /// Create a join request for the given key pair answering the issuer's `nonce`
    pub fn new<D: Digest, R: RngCore>(
        rng: &mut R,
        sk: &MemberSecretKey<E::ScalarField>,
        public_key: MemberPublicKey<E>,
        nonce: &[u8],
    ) -> Result<Self, EcdaaError> {
        let proof = prove_possession::<E, D, R>(rng, sk, &public_key, nonce)?;
        Ok(Self { public_key, proof })
    }

    /// Validate the request against the nonce this issuer handed out
    pub fn validate<D: Digest>(&self, nonce: &[u8]) -> Result<(), EcdaaError> {
        if nonce.len() > MAX_NONCE_LENGTH {
            return Err(EcdaaError::NonceTooLong(nonce.len()));
        }
        self.public_key.validate::<D>(nonce, self.proof.as_ref())
    }
}

/// Generate the member's key pair and, for a non-empty `nonce`, a proof of possession of the secret key
/// bound to that nonce.
pub fn generate_member_keypair<E: Pairing, D: Digest, R: RngCore>(
    rng: &mut R,
    nonce: &[u8],
) -> Result<
    (
        MemberSecretKey<E::ScalarField>,
        MemberPublicKey<E>,
        Option<MemberKeyProof<E::ScalarField>>,
    ),
    EcdaaError,
> {
    let keygen_time = start_timer!(|| "ECDAA member keygen");
    let sk = MemberSecretKey::new(rng)?;
    let pk = MemberPublicKey::new(&sk);
    let proof = prove_possession::<E, D, R>(rng, &sk, &pk, nonce)?;
    end_timer!(keygen_time);
    Ok((sk, pk, proof))
}

pub fn validate_member_public_key<E: Pairing, D: Digest>(
    pk: &MemberPublicKey<E>,
    nonce: &[u8],
    proof: Option<&MemberKeyProof<E::ScalarField>>,
) -> Result<(), EcdaaError> {
    pk.validate::<D>(nonce, proof)
}

fn prove_possession<E: Pairing, D: Digest, R: RngCore>(
    rng: &mut R,
    sk: &MemberSecretKey<E::ScalarField>,
    pk: &MemberPublicKey<E>,
    nonce: &[u8],
) -> Result<Option<MemberKeyProof<E::ScalarField>>, EcdaaError> {
    if nonce.is_empty() {
        return Ok(None);
    }
    SchnorrProof::new::<E::G1Affine, D, R>(rng, &sk.0, &E::G1Affine::generator(), &pk.0, nonce)
        .map(Some)
}
