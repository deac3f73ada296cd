//! Credential issued to a member and the issuer's proof that it was correctly formed.
//!
//! For member public key `Q = G1*sk`, the issuer picks a random `l` and creates
//! `A = G1*l, B = A*y, D = Q*(l*y), C = (A + D)*x`. This satisfies
//! - `e(A, Y) == e(B, G2)` as both are `e(G1, G2)*(l*y)`
//! - `e(A + D, X) == e(C, G2)`
//! - `D == B*sk` which only the member can check and which lets it later prove knowledge of `sk` without revealing it.
//!
//! The credential signature is a proof of knowledge of the issuer's `x, y` such that `X = G2*x, Y = G2*y, B = A*y`
//! and `C = (A + D)*x`:
//! 1. Issuer picks random `rx, ry` and computes `Ux = G2*rx, Uy = G2*ry, Ub = A*ry, Uc = (A + D)*rx`
//! 2. Challenge `c = H(X || Y || Q || A || B || C || D || Ux || Uy || Ub || Uc)`
//! 3. Responses `sx = rx + c*x, sy = ry + c*y`
//!
//! The verifier recomputes `Ux = G2*sx - X*c, Uy = G2*sy - Y*c, Ub = A*sy - B*c, Uc = (A + D)*sx - C*c` and the challenge.
//! As `Q` is part of the challenge, the signature does not verify for any other member's public key.

use crate::{
    error::EcdaaError,
    issuer::{GroupPublicKey, IssuerSecretKey},
    member::{MemberPublicKey, MemberSecretKey},
    util::{random_nonzero_scalar, Transcript},
};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{end_timer, ops::Neg, rand::RngCore, start_timer, Zero};
use digest::Digest;
use dock_crypto_utils::serde_utils::ArkObjectBytes;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::Zeroize;

const CREDENTIAL_PROOF_LABEL: &[u8] = b"ECDAA-CREDENTIAL";

#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Credential<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub A: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub B: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub C: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub D: E::G1Affine,
}

#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct CredentialSignature<F: PrimeField> {
    #[serde_as(as = "ArkObjectBytes")]
    pub c: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub sx: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub sy: F,
}

impl<E: Pairing> Credential<E> {
    /// Create a credential for the member's public key `Q` and the proof of its correctness
    pub fn new<D: Digest, R: RngCore>(
        rng: &mut R,
        sk: &IssuerSecretKey<E::ScalarField>,
        member_pk: &MemberPublicKey<E>,
    ) -> Result<(Self, CredentialSignature<E::ScalarField>), EcdaaError> {
        if !member_pk.is_valid() {
            return Err(EcdaaError::InvalidPublicKey);
        }
        let mut l = random_nonzero_scalar::<E::ScalarField, _>(rng)?;
        let mut rx = random_nonzero_scalar::<E::ScalarField, _>(rng)?;
        let mut ry = random_nonzero_scalar::<E::ScalarField, _>(rng)?;

        let A = (E::G1Affine::generator() * l).into_affine();
        let B = (A * sk.y).into_affine();
        let D = (member_pk.0 * (l * sk.y)).into_affine();
        let A_plus_D = (A + D).into_affine();
        let C = (A_plus_D * sk.x).into_affine();
        let cred = Self { A, B, C, D };

        let g2 = E::G2Affine::generator();
        let Ux = (g2 * rx).into_affine();
        let Uy = (g2 * ry).into_affine();
        let Ub = (A * ry).into_affine();
        let Uc = (A_plus_D * rx).into_affine();
        let gpk = GroupPublicKey::<E>::new(sk);
        let c =
            CredentialSignature::challenge::<E, D>(&cred, member_pk, &gpk, &Ux, &Uy, &Ub, &Uc)?;
        let sig = CredentialSignature {
            c,
            sx: rx + c * sk.x,
            sy: ry + c * sk.y,
        };
        l.zeroize();
        rx.zeroize();
        ry.zeroize();
        Ok((cred, sig))
    }

    /// None of the credential's points is the identity
    pub fn is_non_zero(&self) -> bool {
        !(self.A.is_zero() || self.B.is_zero() || self.C.is_zero() || self.D.is_zero())
    }

    /// Member's check of the credential before its first use: `D == B*sk`, `e(A, Y) == e(B, G2)` and
    /// `e(A + D, X) == e(C, G2)`
    pub fn validate(
        &self,
        member_sk: &MemberSecretKey<E::ScalarField>,
        gpk: &GroupPublicKey<E>,
    ) -> Result<(), EcdaaError> {
        if !self.is_non_zero() {
            return Err(EcdaaError::MalformedCredential);
        }
        if (self.B * member_sk.0).into_affine() != self.D {
            return Err(EcdaaError::InvalidCredential);
        }
        if !pairing_relations_hold::<E>(
            &self.A,
            &self.B,
            &self.C,
            &self.D,
            &E::G2Prepared::from(gpk.X),
            &E::G2Prepared::from(gpk.Y),
            &E::G2Prepared::from(E::G2Affine::generator()),
        ) {
            return Err(EcdaaError::InvalidCredential);
        }
        Ok(())
    }
}

impl<F: PrimeField> CredentialSignature<F> {
    /// Verify that the credential was created for `member_pk` by the issuer owning `gpk`
    pub fn verify<E: Pairing<ScalarField = F>, D: Digest>(
        &self,
        cred: &Credential<E>,
        member_pk: &MemberPublicKey<E>,
        gpk: &GroupPublicKey<E>,
    ) -> Result<(), EcdaaError> {
        if !cred.is_non_zero() {
            return Err(EcdaaError::MalformedCredential);
        }
        if !member_pk.is_valid() {
            return Err(EcdaaError::InvalidPublicKey);
        }
        let g2 = E::G2Affine::generator();
        let Ux = (g2 * self.sx - gpk.X * self.c).into_affine();
        let Uy = (g2 * self.sy - gpk.Y * self.c).into_affine();
        let Ub = (cred.A * self.sy - cred.B * self.c).into_affine();
        let Uc = ((cred.A + cred.D) * self.sx - cred.C * self.c).into_affine();
        let c = Self::challenge::<E, D>(cred, member_pk, gpk, &Ux, &Uy, &Ub, &Uc)?;
        if c != self.c {
            return Err(EcdaaError::CredentialProofInvalid);
        }
        Ok(())
    }

    fn challenge<E: Pairing<ScalarField = F>, D: Digest>(
        cred: &Credential<E>,
        member_pk: &MemberPublicKey<E>,
        gpk: &GroupPublicKey<E>,
        Ux: &E::G2Affine,
        Uy: &E::G2Affine,
        Ub: &E::G1Affine,
        Uc: &E::G1Affine,
    ) -> Result<F, EcdaaError> {
        let mut transcript = Transcript::new(CREDENTIAL_PROOF_LABEL);
        transcript.append(&gpk.X)?;
        transcript.append(&gpk.Y)?;
        transcript.append(&member_pk.0)?;
        transcript.append(&cred.A)?;
        transcript.append(&cred.B)?;
        transcript.append(&cred.C)?;
        transcript.append(&cred.D)?;
        transcript.append(Ux)?;
        transcript.append(Uy)?;
        transcript.append(Ub)?;
        transcript.append(Uc)?;
        Ok(transcript.challenge::<F, D>())
    }
}

/// Checks `e(A, Y) == e(B, G2)` and `e(A + D, X) == e(C, G2)` as `e(A, Y) * e(-B, G2) == 1` and
/// `e(A + D, X) * e(-C, G2) == 1`. Used for the credential and its randomized copy in a signature.
pub(crate) fn pairing_relations_hold<E: Pairing>(
    A: &E::G1Affine,
    B: &E::G1Affine,
    C: &E::G1Affine,
    D: &E::G1Affine,
    X: &E::G2Prepared,
    Y: &E::G2Prepared,
    g2: &E::G2Prepared,
) -> bool {
    E::multi_pairing(
        [
            E::G1Prepared::from(*A),
            E::G1Prepared::from(B.into_group().neg()),
        ],
        [Y.clone(), g2.clone()],
    )
    .is_zero()
        && E::multi_pairing(
            [
                E::G1Prepared::from(*A + *D),
                E::G1Prepared::from(C.into_group().neg()),
            ],
            [X.clone(), g2.clone()],
        )
        .is_zero()
}

/// Issuer creates the credential for the member's public key `Q`. Fails if `Q` is the identity or outside the
/// prime order subgroup.
pub fn generate_credential<E: Pairing, D: Digest, R: RngCore>(
    rng: &mut R,
    issuer_sk: &IssuerSecretKey<E::ScalarField>,
    member_pk: &MemberPublicKey<E>,
) -> Result<(Credential<E>, CredentialSignature<E::ScalarField>), EcdaaError> {
    let issuance_time = start_timer!(|| "ECDAA credential issuance");
    let result = Credential::new::<D, R>(rng, issuer_sk, member_pk);
    end_timer!(issuance_time);
    result
}

pub fn verify_credential_signature<E: Pairing, D: Digest>(
    cred: &Credential<E>,
    sig: &CredentialSignature<E::ScalarField>,
    member_pk: &MemberPublicKey<E>,
    gpk: &GroupPublicKey<E>,
) -> Result<(), EcdaaError> {
    sig.verify::<E, D>(cred, member_pk, gpk)
}
