use ark_bls12_381::Bls12_381;
use ark_ec::{pairing::Pairing, CurveGroup};
use ark_std::{
    rand::{rngs::StdRng, SeedableRng},
    UniformRand,
};
use blake2::Blake2b512;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ecdaa::schnorr::SchnorrProof;

type Fr = <Bls12_381 as Pairing>::ScalarField;

macro_rules! bench_proof {
    ($group_affine:ident, $c: ident) => {
        let mut rng = StdRng::seed_from_u64(0u64);
        let base = <Bls12_381 as Pairing>::$group_affine::rand(&mut rng);
        let witness = Fr::rand(&mut rng);
        let y = (base * witness).into_affine();
        let nonce = b"nonce";

        $c.bench_function(concat!("Generate proof in ", stringify!($group_affine)), |b| {
            b.iter(|| {
                SchnorrProof::new::<_, Blake2b512, _>(
                    &mut rng,
                    black_box(&witness),
                    black_box(&base),
                    black_box(&y),
                    nonce,
                )
                .unwrap()
            })
        });

        let proof =
            SchnorrProof::new::<_, Blake2b512, _>(&mut rng, &witness, &base, &y, nonce).unwrap();
        $c.bench_function(concat!("Verify proof in ", stringify!($group_affine)), |b| {
            b.iter(|| {
                proof
                    .verify::<_, Blake2b512>(black_box(&base), black_box(&y), nonce)
                    .unwrap()
            })
        });
    };
}

fn schnorr_benchmark(c: &mut Criterion) {
    bench_proof!(G1Affine, c);
    bench_proof!(G2Affine, c);
}

criterion_group!(benches, schnorr_benchmark);
criterion_main!(benches);
