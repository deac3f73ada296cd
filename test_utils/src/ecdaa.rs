use ark_ec::pairing::Pairing;
use ark_std::{rand::RngCore, UniformRand};
use digest::Digest;
use ecdaa::prelude::{
    generate_issuer_keypair, generate_member_keypair, process_join_request, Credential,
    IssuerPublicKey, IssuerSecretKey, JoinRequest, MemberPublicKey, MemberSecretKey,
    PseudonymRevocationList, SecretKeyRevocationList,
};

/// Issuer keys and a member that joined with a nonce. The credential is checked by both sides.
pub fn ecdaa_setup<E: Pairing, D: Digest, R: RngCore>(
    rng: &mut R,
) -> (
    IssuerSecretKey<E::ScalarField>,
    IssuerPublicKey<E>,
    MemberSecretKey<E::ScalarField>,
    MemberPublicKey<E>,
    Credential<E>,
) {
    let (isk, ipk) = generate_issuer_keypair::<E, D, _>(rng).unwrap();
    ipk.validate::<D>().unwrap();
    let (sk, pk, cred) = join::<E, D, R>(rng, &isk, &ipk);
    (isk, ipk, sk, pk, cred)
}

/// A new member joins the group of the given issuer
pub fn join<E: Pairing, D: Digest, R: RngCore>(
    rng: &mut R,
    isk: &IssuerSecretKey<E::ScalarField>,
    ipk: &IssuerPublicKey<E>,
) -> (
    MemberSecretKey<E::ScalarField>,
    MemberPublicKey<E>,
    Credential<E>,
) {
    let mut nonce = [0u8; 32];
    rng.fill_bytes(&mut nonce);
    let (sk, pk, _) = generate_member_keypair::<E, D, _>(rng, &nonce).unwrap();
    let request = JoinRequest::new::<D, _>(rng, &sk, pk.clone(), &nonce).unwrap();
    let (cred, cred_sig) = process_join_request::<E, D, _>(rng, isk, &request, &nonce).unwrap();
    cred_sig.verify::<E, D>(&cred, &pk, &ipk.gpk).unwrap();
    cred.validate(&sk, &ipk.gpk).unwrap();
    (sk, pk, cred)
}

/// Revocation lists of the given size with random entries for `basename`
pub fn revocation_lists<E: Pairing, R: RngCore>(
    rng: &mut R,
    size: usize,
    basename: &[u8],
) -> (
    SecretKeyRevocationList<E::ScalarField>,
    PseudonymRevocationList<E>,
) {
    let mut sk_list = SecretKeyRevocationList::new();
    let mut pseudonym_list = PseudonymRevocationList::new();
    for _ in 0..size {
        sk_list.revoke(E::ScalarField::rand(rng));
        pseudonym_list.revoke(basename.to_vec(), E::G1Affine::rand(rng));
    }
    (sk_list, pseudonym_list)
}
