/// Sizes of the revocation lists the verifier is benchmarked with
pub const REVOCATION_LIST_SIZES: [usize; 6] = [0, 10, 100, 500, 1000, 5000];

#[macro_export]
macro_rules! setup_ecdaa {
    ($rng: ident, $ipk: ident, $prepared: ident, $sk: ident, $cred: ident) => {
        let (_, $ipk, $sk, _, $cred) =
            test_utils::ecdaa::ecdaa_setup::<Bls12_381, Blake2b512, _>(&mut $rng);
        let $prepared = PreparedGroupPublicKey::from(&$ipk);
    };
}
