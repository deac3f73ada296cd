use ark_bls12_381::Bls12_381;
use ark_std::rand::{rngs::StdRng, SeedableRng};
use benches::{setup_ecdaa, REVOCATION_LIST_SIZES};
use blake2::Blake2b512;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ecdaa::{
    prelude::{sign, verify, PreparedGroupPublicKey, WireFormat},
    signature::verify_serialized,
};
use test_utils::ecdaa::revocation_lists;

const MESSAGE: &[u8] = b"Message to be signed";
const BASENAME: &[u8] = b"Verifier's basename";

fn sign_verify(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0u64);
    setup_ecdaa!(rng, ipk, prepared, sk, cred);

    c.bench_function("Sign without basename", |b| {
        b.iter(|| {
            sign::<Bls12_381, Blake2b512, _>(&mut rng, black_box(MESSAGE), None, &sk, &cred)
                .unwrap()
        })
    });
    c.bench_function("Sign with basename", |b| {
        b.iter(|| {
            sign::<Bls12_381, Blake2b512, _>(
                &mut rng,
                black_box(MESSAGE),
                Some(BASENAME),
                &sk,
                &cred,
            )
            .unwrap()
        })
    });

    let sig = sign::<Bls12_381, Blake2b512, _>(&mut rng, MESSAGE, None, &sk, &cred).unwrap();
    let sig_bsn =
        sign::<Bls12_381, Blake2b512, _>(&mut rng, MESSAGE, Some(BASENAME), &sk, &cred).unwrap();

    c.bench_function("Verify without basename", |b| {
        b.iter(|| {
            verify::<Bls12_381, Blake2b512, _>(
                black_box(&sig),
                MESSAGE,
                None,
                &prepared,
                &(),
            )
            .unwrap()
        })
    });
    c.bench_function("Verify with unprepared group public key", |b| {
        b.iter(|| {
            verify::<Bls12_381, Blake2b512, _>(black_box(&sig), MESSAGE, None, &ipk.gpk, &())
                .unwrap()
        })
    });

    let bytes = sig_bsn.to_bytes().unwrap();
    c.bench_function("Deserialize and verify", |b| {
        b.iter(|| {
            verify_serialized::<Bls12_381, Blake2b512, _>(
                black_box(&bytes),
                MESSAGE,
                Some(BASENAME),
                &prepared,
                &(),
            )
            .unwrap()
        })
    });

    let mut sk_rev_group = c.benchmark_group("Verify with secret key revocation list");
    for size in REVOCATION_LIST_SIZES {
        let (sk_list, _) = revocation_lists::<Bls12_381, _>(&mut rng, size, BASENAME);
        sk_rev_group.bench_with_input(BenchmarkId::from_parameter(size), &sk_list, |b, list| {
            b.iter(|| {
                verify::<Bls12_381, Blake2b512, _>(
                    black_box(&sig),
                    MESSAGE,
                    None,
                    &prepared,
                    black_box(list),
                )
                .unwrap()
            })
        });
    }
    sk_rev_group.finish();

    let mut both_rev_group = c.benchmark_group("Verify with both revocation lists");
    for size in REVOCATION_LIST_SIZES {
        let lists = revocation_lists::<Bls12_381, _>(&mut rng, size, BASENAME);
        both_rev_group.bench_with_input(BenchmarkId::from_parameter(size), &lists, |b, lists| {
            b.iter(|| {
                verify::<Bls12_381, Blake2b512, _>(
                    black_box(&sig_bsn),
                    MESSAGE,
                    Some(BASENAME),
                    &prepared,
                    black_box(lists),
                )
                .unwrap()
            })
        });
    }
    both_rev_group.finish();
}

criterion_group!(benches, sign_verify);
criterion_main!(benches);
