use ark_bls12_381::Bls12_381;
use ark_bn254::Bn254;
use ark_ec::pairing::Pairing;
use ark_std::{
    rand::{rngs::StdRng, SeedableRng},
    UniformRand,
};
use blake2::Blake2b512;
use digest::Digest;
use ecdaa::prelude::{
    sign, verify, AffineCoordinates, EcdaaError, IssuerPublicKey, PreparedGroupPublicKey,
    PseudonymRevocationList, SecretKeyRevocationList, Signature, WireFormat,
};
use ecdaa::signature::verify_serialized;
use sha3::Sha3_512;
use test_utils::ecdaa::{ecdaa_setup, join, revocation_lists};

/// Full lifecycle of a group on the given curve: setup, join, sign, verify and revoke
fn group_lifecycle<E: Pairing, D: Digest>()
where
    E::G1Affine: AffineCoordinates,
    E::G2Affine: AffineCoordinates,
{
    let mut rng = StdRng::seed_from_u64(0u64);
    let basename = b"relying party".as_slice();
    let message = b"attestation challenge".as_slice();

    let (isk, ipk, sk1, _, cred1) = ecdaa_setup::<E, D, _>(&mut rng);
    let (sk2, _, cred2) = join::<E, D, _>(&mut rng, &isk, &ipk);

    // Verifier only receives the issuer's public key as bytes and checks it before use
    let ipk = IssuerPublicKey::<E>::from_bytes(&ipk.to_bytes().unwrap()).unwrap();
    ipk.validate::<D>().unwrap();
    let prepared = PreparedGroupPublicKey::from(&ipk);

    let sig1 = sign::<E, D, _>(&mut rng, message, None, &sk1, &cred1).unwrap();
    let sig2 = sign::<E, D, _>(&mut rng, message, None, &sk2, &cred2).unwrap();
    let sig1_bsn = sign::<E, D, _>(&mut rng, message, Some(basename), &sk1, &cred1).unwrap();
    let sig2_bsn = sign::<E, D, _>(&mut rng, message, Some(basename), &sk2, &cred2).unwrap();

    for sig in [&sig1, &sig2] {
        verify::<E, D, _>(sig, message, None, &prepared, &()).unwrap();
        verify_serialized::<E, D, _>(&sig.to_bytes().unwrap(), message, None, &prepared, &())
            .unwrap();
    }
    for sig in [&sig1_bsn, &sig2_bsn] {
        verify::<E, D, _>(sig, message, Some(basename), &prepared, &()).unwrap();
        verify_serialized::<E, D, _>(
            &sig.to_bytes().unwrap(),
            message,
            Some(basename),
            &prepared,
            &(),
        )
        .unwrap();
    }
    assert_ne!(sig1_bsn.K, sig2_bsn.K);

    // Revoking member 1 by secret key rejects all its signatures but not member 2's
    let (mut sk_list, mut pseudonym_list) = revocation_lists::<E, _>(&mut rng, 20, basename);
    sk_list.revoke(sk1.0);
    let sk_list =
        SecretKeyRevocationList::<E::ScalarField>::from_bytes(&sk_list.to_bytes().unwrap())
            .unwrap();
    assert!(matches!(
        verify::<E, D, _>(&sig1, message, None, &prepared, &sk_list),
        Err(EcdaaError::Revoked)
    ));
    assert!(matches!(
        verify::<E, D, _>(&sig1_bsn, message, Some(basename), &prepared, &sk_list),
        Err(EcdaaError::Revoked)
    ));
    verify::<E, D, _>(&sig2, message, None, &prepared, &sk_list).unwrap();
    verify::<E, D, _>(&sig2_bsn, message, Some(basename), &prepared, &sk_list).unwrap();

    // Revoking member 2's pseudonym for this basename only rejects its signatures with that basename
    pseudonym_list.revoke(basename.to_vec(), sig2_bsn.K);
    let pseudonym_list =
        PseudonymRevocationList::<E>::from_bytes(&pseudonym_list.to_bytes().unwrap()).unwrap();
    let policies = (&sk_list, &pseudonym_list);
    assert!(matches!(
        verify::<E, D, _>(&sig2_bsn, message, Some(basename), &prepared, &policies),
        Err(EcdaaError::Revoked)
    ));
    verify::<E, D, _>(&sig2, message, None, &prepared, &policies).unwrap();
    let sig2_other = sign::<E, D, _>(&mut rng, message, Some(b"other".as_slice()), &sk2, &cred2)
        .unwrap();
    verify::<E, D, _>(
        &sig2_other,
        message,
        Some(b"other".as_slice()),
        &prepared,
        &policies,
    )
    .unwrap();

    // Signature of a member of another group
    let (_, _, other_sk, _, other_cred) = ecdaa_setup::<E, D, _>(&mut rng);
    let other_sig = sign::<E, D, _>(&mut rng, message, None, &other_sk, &other_cred).unwrap();
    assert!(matches!(
        verify::<E, D, _>(&other_sig, message, None, &prepared, &()),
        Err(EcdaaError::InvalidCredential)
    ));

    // Signature with a random pseudonym doesn't verify
    let mut tampered = sig1.clone();
    tampered.K = E::G1Affine::rand(&mut rng);
    assert!(matches!(
        verify::<E, D, _>(&tampered, message, None, &prepared, &()),
        Err(EcdaaError::InvalidProof)
    ));
}

#[test]
fn group_lifecycle_bls12_381() {
    group_lifecycle::<Bls12_381, Blake2b512>();
}

#[test]
fn group_lifecycle_bn254() {
    group_lifecycle::<Bn254, Sha3_512>();
}

#[test]
fn signature_from_bytes() {
    let mut rng = StdRng::seed_from_u64(1u64);
    let (_, ipk, sk, _, cred) = ecdaa_setup::<Bls12_381, Blake2b512, _>(&mut rng);
    let sig =
        sign::<Bls12_381, Blake2b512, _>(&mut rng, b"msg", Some(b"bsn".as_slice()), &sk, &cred)
            .unwrap();
    let bytes = sig.to_bytes().unwrap();
    assert_eq!(Signature::<Bls12_381>::from_bytes(&bytes).unwrap(), sig);

    // Flipping a bit anywhere in the signature makes it fail, either decoding or verification
    for i in 0..bytes.len() {
        let mut altered = bytes.clone();
        altered[i] ^= 1;
        assert!(verify_serialized::<Bls12_381, Blake2b512, _>(
            &altered,
            b"msg",
            Some(b"bsn".as_slice()),
            &ipk.gpk,
            &()
        )
        .is_err());
    }
}
