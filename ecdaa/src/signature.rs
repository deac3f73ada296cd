//! Member's signature over a message, optionally scoped to a basename.
//!
//! The member randomizes its credential with a random `r` as `R = A*r, S = B*r, T = C*r, W = D*r` which keeps the
//! pairing relations intact and keeps `W = S*sk`. The pseudonym is `K = J*sk` where `J` is the hash of the basename
//! or `R` when signing without one. The member then proves knowledge of `sk` in both relations:
//! 1. Picks a random `rr` and computes `U = S*rr, L = J*rr`
//! 2. Challenge `c = H(message || basename || R || S || T || W || K || U || L)`
//! 3. Response `s = rr + c*sk`
//!
//! The verifier recomputes `U = S*s - W*c, L = J*s - K*c` and the challenge, then checks the pairing relations
//! `e(R, Y) == e(S, G2)` and `e(R + W, X) == e(T, G2)` and finally the revocation lists.

use crate::{
    credential::{pairing_relations_hold, Credential},
    error::EcdaaError,
    issuer::PreparedGroupPublicKey,
    member::MemberSecretKey,
    revocation::{Pseudonym, RevocationCheck},
    serialization::{AffineCoordinates, WireFormat},
    util::{hash_basename, random_nonzero_scalar, Transcript},
};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{end_timer, rand::RngCore, start_timer, vec::Vec};
use digest::Digest;
use dock_crypto_utils::serde_utils::ArkObjectBytes;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::Zeroize;

const SIGNATURE_LABEL: &[u8] = b"ECDAA-SIGNATURE";

/// Largest basename accepted when signing or decoding a signature, 1 MiB
pub const MAX_BASENAME_LENGTH: usize = 1 << 20;

#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Signature<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub R: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub S: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub T: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub W: E::G1Affine,
    /// Pseudonym
    #[serde_as(as = "ArkObjectBytes")]
    pub K: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub c: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub s: E::ScalarField,
    pub basename: Option<Vec<u8>>,
}

impl<E: Pairing> Signature<E> {
    pub fn new<D: Digest, R: RngCore>(
        rng: &mut R,
        message: &[u8],
        basename: Option<&[u8]>,
        sk: &MemberSecretKey<E::ScalarField>,
        cred: &Credential<E>,
    ) -> Result<Self, EcdaaError> {
        if let Some(b) = basename {
            if b.len() > MAX_BASENAME_LENGTH {
                return Err(EcdaaError::BasenameTooLong(b.len()));
            }
        }
        let mut r = random_nonzero_scalar::<E::ScalarField, _>(rng)?;
        let mut rr = random_nonzero_scalar::<E::ScalarField, _>(rng)?;

        let R = (cred.A * r).into_affine();
        if R.is_zero() {
            return Err(EcdaaError::InvalidCredential);
        }
        let S = (cred.B * r).into_affine();
        let T = (cred.C * r).into_affine();
        let W = (cred.D * r).into_affine();
        r.zeroize();

        let J = Self::pseudonym_base::<D>(basename, &R);
        let K = (J * sk.0).into_affine();

        let U = (S * rr).into_affine();
        let L = (J * rr).into_affine();
        let c = Self::challenge::<D>(message, basename, &R, &S, &T, &W, &K, &U, &L)?;
        let s = rr + c * sk.0;
        rr.zeroize();

        Ok(Self {
            R,
            S,
            T,
            W,
            K,
            c,
            s,
            basename: basename.map(|b| b.to_vec()),
        })
    }

    /// Verify the signature over `message` made with `basename`. `revocations` decides whether the signer was
    /// revoked, pass `()` to skip revocation.
    pub fn verify<D: Digest, C: RevocationCheck<E>>(
        &self,
        message: &[u8],
        basename: Option<&[u8]>,
        gpk: impl Into<PreparedGroupPublicKey<E>>,
        revocations: &C,
    ) -> Result<(), EcdaaError> {
        if self.R.is_zero()
            || self.S.is_zero()
            || self.T.is_zero()
            || self.W.is_zero()
            || self.K.is_zero()
        {
            return Err(EcdaaError::MalformedSignature);
        }
        if self.basename.as_deref() != basename {
            return Err(EcdaaError::InvalidProof);
        }

        let J = Self::pseudonym_base::<D>(basename, &self.R);
        let U = (self.S * self.s - self.W * self.c).into_affine();
        let L = (J * self.s - self.K * self.c).into_affine();
        let c = Self::challenge::<D>(
            message, basename, &self.R, &self.S, &self.T, &self.W, &self.K, &U, &L,
        )?;
        if c != self.c {
            return Err(EcdaaError::InvalidProof);
        }

        let gpk = gpk.into();
        if !pairing_relations_hold::<E>(
            &self.R,
            &self.S,
            &self.T,
            &self.W,
            &gpk.X_prepared,
            &gpk.Y_prepared,
            &gpk.g2_prepared,
        ) {
            return Err(EcdaaError::InvalidCredential);
        }

        revocations.check(&Pseudonym {
            K: &self.K,
            base: &J,
            basename,
        })
    }

    /// `J`, the point the pseudonym `K` is created over
    pub fn pseudonym_base<D: Digest>(basename: Option<&[u8]>, R: &E::G1Affine) -> E::G1Affine {
        match basename {
            Some(b) => hash_basename::<E::G1Affine, D>(b),
            None => *R,
        }
    }

    fn challenge<D: Digest>(
        message: &[u8],
        basename: Option<&[u8]>,
        R: &E::G1Affine,
        S: &E::G1Affine,
        T: &E::G1Affine,
        W: &E::G1Affine,
        K: &E::G1Affine,
        U: &E::G1Affine,
        L: &E::G1Affine,
    ) -> Result<E::ScalarField, EcdaaError> {
        let mut transcript = Transcript::new(SIGNATURE_LABEL);
        transcript.append_bytes(message);
        // Distinguishes a missing basename from an empty one
        match basename {
            Some(b) => {
                transcript.append_bytes(&[1]);
                transcript.append_bytes(b);
            }
            None => transcript.append_bytes(&[0]),
        }
        for p in [R, S, T, W, K, U, L] {
            transcript.append(p)?;
        }
        Ok(transcript.challenge::<E::ScalarField, D>())
    }
}

/// Sign `message` with the member's secret key and credential. Signatures with the same `basename` by the same
/// member are linkable through their pseudonym `K`, signatures without a basename are not.
pub fn sign<E: Pairing, D: Digest, R: RngCore>(
    rng: &mut R,
    message: &[u8],
    basename: Option<&[u8]>,
    sk: &MemberSecretKey<E::ScalarField>,
    cred: &Credential<E>,
) -> Result<Signature<E>, EcdaaError> {
    let sign_time = start_timer!(|| "ECDAA sign");
    let sig = Signature::new::<D, R>(rng, message, basename, sk, cred);
    end_timer!(sign_time);
    sig
}

pub fn verify<E: Pairing, D: Digest, C: RevocationCheck<E>>(
    sig: &Signature<E>,
    message: &[u8],
    basename: Option<&[u8]>,
    gpk: impl Into<PreparedGroupPublicKey<E>>,
    revocations: &C,
) -> Result<(), EcdaaError> {
    let verify_time = start_timer!(|| "ECDAA verify");
    let result = sig.verify::<D, C>(message, basename, gpk, revocations);
    end_timer!(verify_time);
    result
}

/// Decode a signature from its wire format, with all checks, and verify it
pub fn verify_serialized<E: Pairing, D: Digest, C: RevocationCheck<E>>(
    bytes: &[u8],
    message: &[u8],
    basename: Option<&[u8]>,
    gpk: impl Into<PreparedGroupPublicKey<E>>,
    revocations: &C,
) -> Result<(), EcdaaError>
where
    E::G1Affine: AffineCoordinates,
{
    let sig = Signature::<E>::from_bytes(bytes)?;
    verify::<E, D, C>(&sig, message, basename, gpk, revocations)
}
