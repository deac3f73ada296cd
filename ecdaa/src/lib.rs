#![cfg_attr(not(feature = "std"), no_std)]
#![allow(non_snake_case)]

//! # Elliptic-curve Direct Anonymous Attestation
//!
//! Implements the ECDAA scheme used by FIDO attestation, built on the Camenisch-Lysyanskaya style credential
//! of [Brickell, Chen and Li](https://eprint.iacr.org/2007/438) as simplified in the
//! [FIDO ECDAA algorithm](https://fidoalliance.org/specs/fido-v2.0-id-20180227/fido-ecdaa-algorithm-v2.0-id-20180227.html).
//!
//! - Setup: generators `G1 ∈ G1, G2 ∈ G2`, chosen as the curve's standard generators.
//! - Issuer keys: secret `x, y ∈ Z_p`, public `X = G2*x, Y = G2*y` along with a proof of knowledge of `x, y`.
//! - Member keys: secret `sk ∈ Z_p`, public `Q = G1*sk` along with a proof of possession of `sk` bound to an
//!   issuer supplied nonce.
//! - Credential: issuer picks a random `l` and creates `A = G1*l, B = A*y, D = Q*(l*y), C = (A + D)*x` and a proof
//!   that `x, y` in `B, C` are the ones in its public key. Note that `D = B*sk`.
//! - Signature: member picks a random `r` and randomizes the credential as `R = A*r, S = B*r, T = C*r, W = D*r`.
//!   It then creates a pseudonym `K = J*sk` where `J` is the hash of the basename (when signing with one) or `R`
//!   otherwise, and proves knowledge of `sk` such that `W = S*sk` and `K = J*sk`.
//! - Verification: checks the proof and `e(R, Y) == e(S, G2)` and `e(R + W, X) == e(T, G2)`, then the revocation lists.
//!
//! Signatures with the same basename by the same member share `K` and hence are linkable. Signatures without a basename
//! are unlinkable. A member can be revoked by its leaked secret key or, for a given basename, by its pseudonym.
//!
//! All types are generic over an arkworks [`Pairing`](ark_ec::pairing::Pairing) and all hashes over a [`Digest`](digest::Digest).

pub mod credential;
pub mod error;
pub mod issuer;
pub mod member;
pub mod revocation;
pub mod schnorr;
pub mod serialization;
pub mod signature;
pub mod util;

pub mod prelude {
    pub use crate::{
        credential::{
            generate_credential, verify_credential_signature, Credential, CredentialSignature,
        },
        error::EcdaaError,
        issuer::{
            generate_issuer_keypair, process_join_request, GroupPublicKey, IssuerPublicKey,
            IssuerSecretKey, PreparedGroupPublicKey,
        },
        member::{
            generate_member_keypair, validate_member_public_key, JoinRequest, MemberKeyPair,
            MemberKeyProof, MemberPublicKey, MemberSecretKey,
        },
        revocation::{
            Pseudonym, PseudonymRevocationList, RevocationCheck, RevokedPseudonym,
            SecretKeyRevocationList,
        },
        serialization::{AffineCoordinates, WireFormat},
        signature::{sign, verify, Signature},
    };
}
