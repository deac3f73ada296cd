//! Issuer's keys.
//!
//! The group public key is `X = G2*x, Y = G2*y`. The issuer publishes it along with a proof of knowledge of `x, y`:
//! 1. Issuer picks random `rx, ry` and computes `Ux = G2*rx, Uy = G2*ry`
//! 2. Challenge `c = H(G2 || X || Y || Ux || Uy)`
//! 3. Responses `sx = rx + c*x, sy = ry + c*y`
//!
//! Anyone can check it by computing `Ux = G2*sx - X*c, Uy = G2*sy - Y*c` and comparing the challenge.

use crate::{
    credential::{generate_credential, Credential, CredentialSignature},
    error::EcdaaError,
    member::JoinRequest,
    util::{random_nonzero_scalar, Transcript},
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

const ISSUER_PROOF_LABEL: &[u8] = b"ECDAA-ISSUER-KEY";

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
pub struct IssuerSecretKey<F: PrimeField> {
    #[serde_as(as = "ArkObjectBytes")]
    pub x: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub y: F,
}

/// Public key of the group. Signatures are verified against this.
#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct GroupPublicKey<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub X: E::G2Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub Y: E::G2Affine,
}

/// Proof of knowledge of the issuer's secret key `(x, y)`
#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct IssuerProof<F: PrimeField> {
    #[serde_as(as = "ArkObjectBytes")]
    pub c: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub sx: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub sy: F,
}

/// Group public key along with the proof that the issuer knows the corresponding secret key
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct IssuerPublicKey<E: Pairing> {
    pub gpk: GroupPublicKey<E>,
    pub proof: IssuerProof<E::ScalarField>,
}

/// Group public key with precomputation for the pairings done during verification
#[derive(Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize)]
pub struct PreparedGroupPublicKey<E: Pairing> {
    pub X: E::G2Affine,
    pub Y: E::G2Affine,
    pub X_prepared: E::G2Prepared,
    pub Y_prepared: E::G2Prepared,
    pub g2_prepared: E::G2Prepared,
}

impl<F: PrimeField> IssuerSecretKey<F> {
    pub fn new<R: RngCore>(rng: &mut R) -> Result<Self, EcdaaError> {
        Ok(Self {
            x: random_nonzero_scalar(rng)?,
            y: random_nonzero_scalar(rng)?,
        })
    }

    pub fn group_public_key<E: Pairing<ScalarField = F>>(&self) -> GroupPublicKey<E> {
        GroupPublicKey::new(self)
    }
}

impl<E: Pairing> GroupPublicKey<E> {
    pub fn new(sk: &IssuerSecretKey<E::ScalarField>) -> Self {
        let g2 = E::G2Affine::generator();
        Self {
            X: (g2 * sk.x).into_affine(),
            Y: (g2 * sk.y).into_affine(),
        }
    }

    /// Public key shouldn't be the identity. A verifier receiving a group public key must check this.
    pub fn is_valid(&self) -> bool {
        !(self.X.is_zero() || self.Y.is_zero())
    }
}

impl<F: PrimeField> IssuerProof<F> {
    pub fn new<E: Pairing<ScalarField = F>, D: Digest, R: RngCore>(
        rng: &mut R,
        sk: &IssuerSecretKey<F>,
        gpk: &GroupPublicKey<E>,
    ) -> Result<Self, EcdaaError> {
        let mut rx = random_nonzero_scalar::<F, _>(rng)?;
        let mut ry = random_nonzero_scalar::<F, _>(rng)?;
        let g2 = E::G2Affine::generator();
        let Ux = (g2 * rx).into_affine();
        let Uy = (g2 * ry).into_affine();
        let c = Self::challenge::<E, D>(gpk, &Ux, &Uy)?;
        let proof = Self {
            c,
            sx: rx + c * sk.x,
            sy: ry + c * sk.y,
        };
        rx.zeroize();
        ry.zeroize();
        Ok(proof)
    }

    pub fn verify<E: Pairing<ScalarField = F>, D: Digest>(
        &self,
        gpk: &GroupPublicKey<E>,
    ) -> Result<(), EcdaaError> {
        let g2 = E::G2Affine::generator();
        let Ux = (g2 * self.sx - gpk.X * self.c).into_affine();
        let Uy = (g2 * self.sy - gpk.Y * self.c).into_affine();
        if Self::challenge::<E, D>(gpk, &Ux, &Uy)? != self.c {
            return Err(EcdaaError::InvalidProof);
        }
        Ok(())
    }

    fn challenge<E: Pairing<ScalarField = F>, D: Digest>(
        gpk: &GroupPublicKey<E>,
        Ux: &E::G2Affine,
        Uy: &E::G2Affine,
    ) -> Result<F, EcdaaError> {
        let mut transcript = Transcript::new(ISSUER_PROOF_LABEL);
        transcript.append(&E::G2Affine::generator())?;
        transcript.append(&gpk.X)?;
        transcript.append(&gpk.Y)?;
        transcript.append(Ux)?;
        transcript.append(Uy)?;
        Ok(transcript.challenge::<F, D>())
    }
}

impl<E: Pairing> IssuerPublicKey<E> {
    pub fn new<D: Digest, R: RngCore>(
        rng: &mut R,
        sk: &IssuerSecretKey<E::ScalarField>,
    ) -> Result<Self, EcdaaError> {
        let gpk = GroupPublicKey::new(sk);
        let proof = IssuerProof::new::<E, D, R>(rng, sk, &gpk)?;
        Ok(Self { gpk, proof })
    }

    /// Check that the group public key isn't the identity and that the issuer knows its secret key
    pub fn validate<D: Digest>(&self) -> Result<(), EcdaaError> {
        if !self.gpk.is_valid() {
            return Err(EcdaaError::InvalidPublicKey);
        }
        self.proof.verify::<E, D>(&self.gpk)
    }
}

impl<E: Pairing> AsRef<GroupPublicKey<E>> for IssuerPublicKey<E> {
    fn as_ref(&self) -> &GroupPublicKey<E> {
        &self.gpk
    }
}

impl<E: Pairing> From<GroupPublicKey<E>> for PreparedGroupPublicKey<E> {
    fn from(gpk: GroupPublicKey<E>) -> Self {
        Self {
            X_prepared: E::G2Prepared::from(gpk.X),
            Y_prepared: E::G2Prepared::from(gpk.Y),
            g2_prepared: E::G2Prepared::from(E::G2Affine::generator()),
            X: gpk.X,
            Y: gpk.Y,
        }
    }
}

impl<E: Pairing> From<&GroupPublicKey<E>> for PreparedGroupPublicKey<E> {
    fn from(gpk: &GroupPublicKey<E>) -> Self {
        Self::from(gpk.clone())
    }
}

impl<E: Pairing> From<&IssuerPublicKey<E>> for PreparedGroupPublicKey<E> {
    fn from(ipk: &IssuerPublicKey<E>) -> Self {
        Self::from(ipk.gpk.clone())
    }
}

impl<E: Pairing> From<&PreparedGroupPublicKey<E>> for PreparedGroupPublicKey<E> {
    fn from(prepared: &PreparedGroupPublicKey<E>) -> Self {
        prepared.clone()
    }
}

/// Create the issuer's secret key and the public key with the proof of knowledge of the secret key
pub fn generate_issuer_keypair<E: Pairing, D: Digest, R: RngCore>(
    rng: &mut R,
) -> Result<(IssuerSecretKey<E::ScalarField>, IssuerPublicKey<E>), EcdaaError> {
    let keygen_time = start_timer!(|| "ECDAA issuer keygen");
    let sk = IssuerSecretKey::new(rng)?;
    let pk = IssuerPublicKey::new::<D, R>(rng, &sk)?;
    end_timer!(keygen_time);
    Ok((sk, pk))
}

/// Issuer's side of the join protocol. Checks the member's proof of possession against the nonce the issuer
/// gave that member and only then creates the credential.
pub fn process_join_request<E: Pairing, D: Digest, R: RngCore>(
    rng: &mut R,
    sk: &IssuerSecretKey<E::ScalarField>,
    request: &JoinRequest<E>,
    nonce: &[u8],
) -> Result<(Credential<E>, CredentialSignature<E::ScalarField>), EcdaaError> {
    request.validate::<D>(nonce)?;
    generate_credential::<E, D, R>(rng, sk, &request.public_key)
}
