//! Fixed layout byte encoding of keys, credentials, signatures and revocation lists, for exchange with other ECDAA
//! implementations.
//!
//! Everything is big-endian. Scalars take `ceil(bits/8)` bytes, lengths and counts are u32. A point is written
//! uncompressed as in SEC1, `0x04 || x || y`, each coordinate in as many bytes as the base field needs. A G2
//! coordinate in `Fp2 = c0 + c1*u` is written `c0 || c1`. The identity, which is never accepted by the checked
//! decoder, is written as all zeros of the same width. Fields are written in declaration order:
//!
//! | Entity | Layout |
//! |---|---|
//! | `MemberSecretKey` | `sk` |
//! | `MemberPublicKey` | `Q` |
//! | `MemberKeyPair` | `Q, sk` |
//! | `MemberKeyProof` | `c, s` |
//! | `JoinRequest` | `Q, flag, [c, s]` |
//! | `IssuerSecretKey` | `x, y` |
//! | `GroupPublicKey` | `X, Y` |
//! | `IssuerPublicKey` | `X, Y, c, sx, sy` |
//! | `Credential` | `A, B, C, D` |
//! | `CredentialSignature` | `c, sx, sy` |
//! | `Signature` | `R, S, T, W, K, c, s, [length, basename]` |
//! | `SecretKeyRevocationList` | `count, sk...` |
//! | `PseudonymRevocationList` | `count, (length, basename, K)...` |
//!
//! [`WireFormat::from_bytes`] checks that points are in the prime order subgroup and not the identity, that scalars
//! are reduced and secret scalars non-zero. [`WireFormat::from_bytes_unchecked`] only parses and must only be used
//! for bytes from a trusted source, like the caller's own storage.

use crate::{
    credential::{Credential, CredentialSignature},
    error::EcdaaError,
    issuer::{GroupPublicKey, IssuerProof, IssuerPublicKey, IssuerSecretKey},
    member::{JoinRequest, MemberKeyPair, MemberPublicKey, MemberSecretKey},
    revocation::{PseudonymRevocationList, RevokedPseudonym, SecretKeyRevocationList},
    schnorr::SchnorrProof,
    signature::{Signature, MAX_BASENAME_LENGTH},
    util::scalar_byte_len,
};
use ark_ec::{
    pairing::Pairing,
    short_weierstrass::{Affine, SWCurveConfig},
    AffineRepr,
};
use ark_ff::{BigInteger, Field, PrimeField};
use ark_serialize::{SerializationError, Validate};
use ark_std::{vec, vec::Vec};

/// Leading byte of an uncompressed point
const UNCOMPRESSED: u8 = 0x04;
/// Leading byte of the identity
const IDENTITY: u8 = 0x00;

pub trait WireFormat: Sized {
    /// Number of bytes in the encoding
    fn length(&self) -> usize;

    /// Write the fields in order. `encoder` has exactly `self.length()` bytes.
    fn encode(&self, encoder: &mut Encoder) -> Result<(), EcdaaError>;

    fn decode(decoder: &mut Decoder) -> Result<Self, EcdaaError>;

    fn to_bytes(&self) -> Result<Vec<u8>, EcdaaError> {
        let mut bytes = vec![0u8; self.length()];
        self.serialize_into(&mut bytes)?;
        Ok(bytes)
    }

    /// Write the encoding at the start of `buf` and return the number of bytes written
    fn serialize_into(&self, buf: &mut [u8]) -> Result<usize, EcdaaError> {
        let needed = self.length();
        if buf.len() < needed {
            return Err(EcdaaError::BufferTooSmall(needed, buf.len()));
        }
        let mut encoder = Encoder::new(&mut buf[..needed]);
        self.encode(&mut encoder)?;
        Ok(needed)
    }

    /// Decode with all checks. `bytes` must contain exactly one encoding.
    fn from_bytes(bytes: &[u8]) -> Result<Self, EcdaaError> {
        Decoder::new(bytes, Validate::Yes).decode_all()
    }

    /// Decode without any checks. Only for bytes from a trusted source.
    fn from_bytes_unchecked(bytes: &[u8]) -> Result<Self, EcdaaError> {
        Decoder::new(bytes, Validate::No).decode_all()
    }
}

/// Affine points that can be rebuilt from their coordinates
pub trait AffineCoordinates: AffineRepr {
    /// Point `(x, y)` without checking that it is on the curve
    fn from_xy_unchecked(x: Self::BaseField, y: Self::BaseField) -> Self;

    fn on_curve(&self) -> bool;

    /// Only meaningful for a point on the curve
    fn in_prime_order_subgroup(&self) -> bool;
}

impl<P: SWCurveConfig> AffineCoordinates for Affine<P> {
    fn from_xy_unchecked(x: Self::BaseField, y: Self::BaseField) -> Self {
        Self::new_unchecked(x, y)
    }

    fn on_curve(&self) -> bool {
        self.is_on_curve()
    }

    fn in_prime_order_subgroup(&self) -> bool {
        self.is_in_correct_subgroup_assuming_on_curve()
    }
}

/// Bytes of one coordinate, `extension degree * ceil(bits/8)` of the base prime field
pub fn coordinate_byte_len<F: Field>() -> usize {
    F::extension_degree() as usize * scalar_byte_len::<F::BasePrimeField>()
}

pub fn point_byte_len<G: AffineRepr>() -> usize {
    1 + 2 * coordinate_byte_len::<G::BaseField>()
}

/// `f` in exactly `ceil(bits/8)` big-endian bytes
fn prime_field_to_be<F: PrimeField>(f: &F) -> Vec<u8> {
    let len = scalar_byte_len::<F>();
    let mut bytes = f.into_bigint().to_bytes_be();
    // Big integer can have more bytes than the field needs, those are all zero
    let start = bytes.len() - len;
    bytes.split_off(start)
}

/// Inverse of [`prime_field_to_be`]. `None` for values not less than the modulus.
fn prime_field_from_be<F: PrimeField>(bytes: &[u8]) -> Option<F> {
    let f = F::from_be_bytes_mod_order(bytes);
    (prime_field_to_be(&f) == bytes).then_some(f)
}

/// Writes fields into a buffer that was sized with [`WireFormat::length`]
pub struct Encoder<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> Encoder<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn slot(&mut self, n: usize) -> Result<&mut [u8], EcdaaError> {
        let available = self.buf.len() - self.pos;
        if available < n {
            return Err(EcdaaError::BufferTooSmall(self.pos + n, self.buf.len()));
        }
        let start = self.pos;
        self.pos += n;
        Ok(&mut self.buf[start..start + n])
    }

    pub fn bytes(&mut self, bytes: &[u8]) -> Result<(), EcdaaError> {
        self.slot(bytes.len())?.copy_from_slice(bytes);
        Ok(())
    }

    pub fn byte(&mut self, b: u8) -> Result<(), EcdaaError> {
        self.bytes(&[b])
    }

    pub fn u32(&mut self, n: usize) -> Result<(), EcdaaError> {
        let n = u32::try_from(n).map_err(|_| SerializationError::InvalidData)?;
        self.bytes(&n.to_be_bytes())
    }

    pub fn scalar<F: PrimeField>(&mut self, f: &F) -> Result<(), EcdaaError> {
        self.bytes(&prime_field_to_be(f))
    }

    fn coordinate<F: Field>(&mut self, f: &F) -> Result<(), EcdaaError> {
        for c in f.to_base_prime_field_elements() {
            self.scalar(&c)?;
        }
        Ok(())
    }

    pub fn point<G: AffineRepr>(&mut self, p: &G) -> Result<(), EcdaaError> {
        match p.xy() {
            Some((x, y)) => {
                self.byte(UNCOMPRESSED)?;
                self.coordinate(x)?;
                self.coordinate(y)
            }
            None => {
                self.slot(point_byte_len::<G>())?.fill(IDENTITY);
                Ok(())
            }
        }
    }

    pub fn basename(&mut self, basename: &[u8]) -> Result<(), EcdaaError> {
        if basename.len() > MAX_BASENAME_LENGTH {
            return Err(EcdaaError::BasenameTooLong(basename.len()));
        }
        self.u32(basename.len())?;
        self.bytes(basename)
    }
}

/// Reads fields from a byte slice, validating them if asked to
pub struct Decoder<'a> {
    bytes: &'a [u8],
    pos: usize,
    validate: Validate,
}

impl<'a> Decoder<'a> {
    pub fn new(bytes: &'a [u8], validate: Validate) -> Self {
        Self {
            bytes,
            pos: 0,
            validate,
        }
    }

    /// Decode a `T` which must consume all the bytes
    pub fn decode_all<T: WireFormat>(mut self) -> Result<T, EcdaaError> {
        let t = T::decode(&mut self)?;
        if self.remaining() != 0 {
            return Err(EcdaaError::UnexpectedLength(self.pos, self.bytes.len()));
        }
        Ok(t)
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn take(&mut self, n: usize) -> Result<&'a [u8], EcdaaError> {
        if self.remaining() < n {
            return Err(EcdaaError::UnexpectedLength(
                self.pos.saturating_add(n),
                self.bytes.len(),
            ));
        }
        let bytes = self.bytes;
        let start = self.pos;
        self.pos += n;
        Ok(&bytes[start..start + n])
    }

    pub fn byte(&mut self) -> Result<u8, EcdaaError> {
        Ok(self.take(1)?[0])
    }

    pub fn u32(&mut self) -> Result<usize, EcdaaError> {
        let mut n = [0u8; 4];
        n.copy_from_slice(self.take(4)?);
        Ok(u32::from_be_bytes(n) as usize)
    }

    /// Reduced scalar. Encodings of values not less than the field order are rejected even when not validating as
    /// such scalars have no unique encoding.
    pub fn scalar<F: PrimeField>(&mut self) -> Result<F, EcdaaError> {
        let bytes = self.take(scalar_byte_len::<F>())?;
        prime_field_from_be(bytes).ok_or(EcdaaError::NonCanonicalScalar)
    }

    /// Coordinate with every base prime field element reduced
    fn coordinate<F: Field>(&mut self) -> Result<F, EcdaaError> {
        let degree = F::extension_degree() as usize;
        let mut elems = Vec::with_capacity(degree);
        for _ in 0..degree {
            let bytes = self.take(scalar_byte_len::<F::BasePrimeField>())?;
            elems.push(
                prime_field_from_be::<F::BasePrimeField>(bytes)
                    .ok_or(SerializationError::InvalidData)?,
            );
        }
        Ok(F::from_base_prime_field_elems(&elems).ok_or(SerializationError::InvalidData)?)
    }

    /// Scalar of a secret key which must be non-zero when validating
    pub fn secret_scalar<F: PrimeField>(&mut self) -> Result<F, EcdaaError> {
        let f = self.scalar::<F>()?;
        if self.validate == Validate::Yes && f.is_zero() {
            return Err(EcdaaError::InvalidSecretKey);
        }
        Ok(f)
    }

    /// Point in the prime order subgroup other than the identity when validating
    pub fn point<G: AffineCoordinates>(&mut self) -> Result<G, EcdaaError> {
        match self.byte()? {
            UNCOMPRESSED => {
                let x = self.coordinate::<G::BaseField>()?;
                let y = self.coordinate::<G::BaseField>()?;
                let p = G::from_xy_unchecked(x, y);
                if self.validate == Validate::Yes && !(p.on_curve() && p.in_prime_order_subgroup()) {
                    return Err(SerializationError::InvalidData.into());
                }
                Ok(p)
            }
            IDENTITY => {
                let rest = self.take(2 * coordinate_byte_len::<G::BaseField>())?;
                if rest.iter().any(|b| *b != 0) {
                    return Err(SerializationError::InvalidData.into());
                }
                if self.validate == Validate::Yes {
                    return Err(EcdaaError::PointAtInfinity);
                }
                Ok(G::zero())
            }
            _ => Err(SerializationError::UnexpectedFlags.into()),
        }
    }

    pub fn basename(&mut self) -> Result<Vec<u8>, EcdaaError> {
        let len = self.u32()?;
        if len > MAX_BASENAME_LENGTH {
            return Err(EcdaaError::BasenameTooLong(len));
        }
        Ok(self.take(len)?.to_vec())
    }
}

impl<F: PrimeField> WireFormat for MemberSecretKey<F> {
    fn length(&self) -> usize {
        scalar_byte_len::<F>()
    }

    fn encode(&self, encoder: &mut Encoder) -> Result<(), EcdaaError> {
        encoder.scalar(&self.0)
    }

    fn decode(decoder: &mut Decoder) -> Result<Self, EcdaaError> {
        Ok(Self(decoder.secret_scalar()?))
    }
}

impl<E: Pairing> WireFormat for MemberPublicKey<E>
where
    E::G1Affine: AffineCoordinates,
{
    fn length(&self) -> usize {
        point_byte_len::<E::G1Affine>()
    }

    fn encode(&self, encoder: &mut Encoder) -> Result<(), EcdaaError> {
        encoder.point(&self.0)
    }

    fn decode(decoder: &mut Decoder) -> Result<Self, EcdaaError> {
        Ok(Self(decoder.point()?))
    }
}

impl<F: PrimeField> WireFormat for SchnorrProof<F> {
    fn length(&self) -> usize {
        2 * scalar_byte_len::<F>()
    }

    fn encode(&self, encoder: &mut Encoder) -> Result<(), EcdaaError> {
        encoder.scalar(&self.c)?;
        encoder.scalar(&self.s)
    }

    fn decode(decoder: &mut Decoder) -> Result<Self, EcdaaError> {
        Ok(Self {
            c: decoder.scalar()?,
            s: decoder.scalar()?,
        })
    }
}

impl<E: Pairing> WireFormat for MemberKeyPair<E>
where
    E::G1Affine: AffineCoordinates,
{
    fn length(&self) -> usize {
        self.public_key.length() + self.secret_key.length()
    }

    fn encode(&self, encoder: &mut Encoder) -> Result<(), EcdaaError> {
        self.public_key.encode(encoder)?;
        self.secret_key.encode(encoder)
    }

    /// When validating, `Q` must also be the public key of `sk`
    fn decode(decoder: &mut Decoder) -> Result<Self, EcdaaError> {
        let key_pair = Self {
            public_key: MemberPublicKey::decode(decoder)?,
            secret_key: MemberSecretKey::decode(decoder)?,
        };
        if decoder.validate == Validate::Yes && !key_pair.is_consistent() {
            return Err(EcdaaError::InvalidPublicKey);
        }
        Ok(key_pair)
    }
}

impl<E: Pairing> WireFormat for JoinRequest<E>
where
    E::G1Affine: AffineCoordinates,
{
    fn length(&self) -> usize {
        self.public_key.length() + 1 + self.proof.as_ref().map_or(0, |p| p.length())
    }

    fn encode(&self, encoder: &mut Encoder) -> Result<(), EcdaaError> {
        self.public_key.encode(encoder)?;
        match &self.proof {
            Some(proof) => {
                encoder.byte(1)?;
                proof.encode(encoder)
            }
            None => encoder.byte(0),
        }
    }

    fn decode(decoder: &mut Decoder) -> Result<Self, EcdaaError> {
        let public_key = MemberPublicKey::decode(decoder)?;
        let proof = match decoder.byte()? {
            0 => None,
            1 => Some(SchnorrProof::decode(decoder)?),
            _ => return Err(SerializationError::UnexpectedFlags.into()),
        };
        Ok(Self { public_key, proof })
    }
}

impl<F: PrimeField> WireFormat for IssuerSecretKey<F> {
    fn length(&self) -> usize {
        2 * scalar_byte_len::<F>()
    }

    fn encode(&self, encoder: &mut Encoder) -> Result<(), EcdaaError> {
        encoder.scalar(&self.x)?;
        encoder.scalar(&self.y)
    }

    fn decode(decoder: &mut Decoder) -> Result<Self, EcdaaError> {
        Ok(Self {
            x: decoder.secret_scalar()?,
            y: decoder.secret_scalar()?,
        })
    }
}

impl<E: Pairing> WireFormat for GroupPublicKey<E>
where
    E::G2Affine: AffineCoordinates,
{
    fn length(&self) -> usize {
        2 * point_byte_len::<E::G2Affine>()
    }

    fn encode(&self, encoder: &mut Encoder) -> Result<(), EcdaaError> {
        encoder.point(&self.X)?;
        encoder.point(&self.Y)
    }

    fn decode(decoder: &mut Decoder) -> Result<Self, EcdaaError> {
        Ok(Self {
            X: decoder.point()?,
            Y: decoder.point()?,
        })
    }
}

impl<F: PrimeField> WireFormat for IssuerProof<F> {
    fn length(&self) -> usize {
        3 * scalar_byte_len::<F>()
    }

    fn encode(&self, encoder: &mut Encoder) -> Result<(), EcdaaError> {
        encoder.scalar(&self.c)?;
        encoder.scalar(&self.sx)?;
        encoder.scalar(&self.sy)
    }

    fn decode(decoder: &mut Decoder) -> Result<Self, EcdaaError> {
        Ok(Self {
            c: decoder.scalar()?,
            sx: decoder.scalar()?,
            sy: decoder.scalar()?,
        })
    }
}

impl<E: Pairing> WireFormat for IssuerPublicKey<E>
where
    E::G2Affine: AffineCoordinates,
{
    fn length(&self) -> usize {
        self.gpk.length() + self.proof.length()
    }

    fn encode(&self, encoder: &mut Encoder) -> Result<(), EcdaaError> {
        self.gpk.encode(encoder)?;
        self.proof.encode(encoder)
    }

    fn decode(decoder: &mut Decoder) -> Result<Self, EcdaaError> {
        Ok(Self {
            gpk: GroupPublicKey::decode(decoder)?,
            proof: IssuerProof::decode(decoder)?,
        })
    }
}

impl<E: Pairing> WireFormat for Credential<E>
where
    E::G1Affine: AffineCoordinates,
{
    fn length(&self) -> usize {
        4 * point_byte_len::<E::G1Affine>()
    }

    fn encode(&self, encoder: &mut Encoder) -> Result<(), EcdaaError> {
        for p in [&self.A, &self.B, &self.C, &self.D] {
            encoder.point(p)?;
        }
        Ok(())
    }

    fn decode(decoder: &mut Decoder) -> Result<Self, EcdaaError> {
        Ok(Self {
            A: decoder.point()?,
            B: decoder.point()?,
            C: decoder.point()?,
            D: decoder.point()?,
        })
    }
}

impl<F: PrimeField> WireFormat for CredentialSignature<F> {
    fn length(&self) -> usize {
        3 * scalar_byte_len::<F>()
    }

    fn encode(&self, encoder: &mut Encoder) -> Result<(), EcdaaError> {
        encoder.scalar(&self.c)?;
        encoder.scalar(&self.sx)?;
        encoder.scalar(&self.sy)
    }

    fn decode(decoder: &mut Decoder) -> Result<Self, EcdaaError> {
        Ok(Self {
            c: decoder.scalar()?,
            sx: decoder.scalar()?,
            sy: decoder.scalar()?,
        })
    }
}

impl<E: Pairing> WireFormat for Signature<E>
where
    E::G1Affine: AffineCoordinates,
{
    fn length(&self) -> usize {
        5 * point_byte_len::<E::G1Affine>()
            + 2 * scalar_byte_len::<E::ScalarField>()
            + self.basename.as_ref().map_or(0, |b| 4 + b.len())
    }

    fn encode(&self, encoder: &mut Encoder) -> Result<(), EcdaaError> {
        for p in [&self.R, &self.S, &self.T, &self.W, &self.K] {
            encoder.point(p)?;
        }
        encoder.scalar(&self.c)?;
        encoder.scalar(&self.s)?;
        match &self.basename {
            Some(b) => encoder.basename(b),
            None => Ok(()),
        }
    }

    fn decode(decoder: &mut Decoder) -> Result<Self, EcdaaError> {
        let R = decoder.point()?;
        let S = decoder.point()?;
        let T = decoder.point()?;
        let W = decoder.point()?;
        let K = decoder.point()?;
        let c = decoder.scalar()?;
        let s = decoder.scalar()?;
        let basename = if decoder.remaining() > 0 {
            Some(decoder.basename()?)
        } else {
            None
        };
        Ok(Self {
            R,
            S,
            T,
            W,
            K,
            c,
            s,
            basename,
        })
    }
}

impl<F: PrimeField> WireFormat for SecretKeyRevocationList<F> {
    fn length(&self) -> usize {
        4 + self.0.len() * scalar_byte_len::<F>()
    }

    fn encode(&self, encoder: &mut Encoder) -> Result<(), EcdaaError> {
        encoder.u32(self.0.len())?;
        for sk in &self.0 {
            encoder.scalar(sk)?;
        }
        Ok(())
    }

    fn decode(decoder: &mut Decoder) -> Result<Self, EcdaaError> {
        let count = decoder.u32()?;
        // Capacity bounded by the input so a forged count can't cause a large allocation
        let mut sks = Vec::with_capacity(count.min(decoder.remaining() / scalar_byte_len::<F>()));
        for _ in 0..count {
            sks.push(decoder.secret_scalar()?);
        }
        Ok(Self(sks))
    }
}

impl<E: Pairing> WireFormat for PseudonymRevocationList<E>
where
    E::G1Affine: AffineCoordinates,
{
    fn length(&self) -> usize {
        4 + self
            .0
            .iter()
            .map(|entry| 4 + entry.basename.len() + point_byte_len::<E::G1Affine>())
            .sum::<usize>()
    }

    fn encode(&self, encoder: &mut Encoder) -> Result<(), EcdaaError> {
        encoder.u32(self.0.len())?;
        for entry in &self.0 {
            encoder.basename(&entry.basename)?;
            encoder.point(&entry.K)?;
        }
        Ok(())
    }

    fn decode(decoder: &mut Decoder) -> Result<Self, EcdaaError> {
        let count = decoder.u32()?;
        let min_entry_len = 4 + point_byte_len::<E::G1Affine>();
        let mut entries = Vec::with_capacity(count.min(decoder.remaining() / min_entry_len));
        for _ in 0..count {
            let basename = decoder.basename()?;
            let K = decoder.point()?;
            entries.push(RevokedPseudonym { basename, K });
        }
        Ok(Self(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        credential::generate_credential,
        issuer::generate_issuer_keypair,
        member::generate_member_keypair,
        signature::sign,
    };
    use ark_bls12_381::{Bls12_381, Fq, Fr};
    use ark_bn254::Bn254;
    use ark_std::{
        fmt::Debug,
        rand::{rngs::StdRng, SeedableRng},
        UniformRand, Zero,
    };
    use blake2::Blake2b512;

    type G1 = <Bls12_381 as Pairing>::G1Affine;

    const G1_LEN: usize = 1 + 2 * 48;
    const G2_LEN: usize = 1 + 4 * 48;
    const FR_LEN: usize = 32;

    /// Encoding has `expected_len` bytes and decodes to the same value. When `has_points`, an all zero buffer
    /// of the same length is rejected.
    fn check<T: WireFormat + PartialEq + Debug>(t: &T, expected_len: usize, has_points: bool) {
        assert_eq!(t.length(), expected_len);
        let bytes = t.to_bytes().unwrap();
        assert_eq!(bytes.len(), expected_len);
        assert_eq!(&T::from_bytes(&bytes).unwrap(), t);
        assert_eq!(&T::from_bytes_unchecked(&bytes).unwrap(), t);

        let mut buf = vec![0xffu8; expected_len + 10];
        assert_eq!(t.serialize_into(&mut buf).unwrap(), expected_len);
        assert_eq!(&buf[..expected_len], bytes.as_slice());
        assert!(buf[expected_len..].iter().all(|b| *b == 0xff));

        if expected_len > 0 {
            let mut short = vec![0u8; expected_len - 1];
            assert!(matches!(
                t.serialize_into(&mut short),
                Err(EcdaaError::BufferTooSmall(n, m)) if n == expected_len && m == expected_len - 1
            ));
            assert!(T::from_bytes(&bytes[..expected_len - 1]).is_err());
        }

        let mut long = bytes.clone();
        long.push(0);
        assert!(T::from_bytes(&long).is_err());

        if has_points {
            assert!(T::from_bytes(&vec![0u8; expected_len]).is_err());
        }
    }

    #[test]
    fn encodings() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let nonce = b"nonce";
        let (isk, ipk) = generate_issuer_keypair::<Bls12_381, Blake2b512, _>(&mut rng).unwrap();
        let (sk, pk, proof) =
            generate_member_keypair::<Bls12_381, Blake2b512, _>(&mut rng, nonce).unwrap();
        let proof = proof.unwrap();
        let (cred, cred_sig) =
            generate_credential::<Bls12_381, Blake2b512, _>(&mut rng, &isk, &pk).unwrap();

        check(&sk, FR_LEN, false);
        check(&pk, G1_LEN, true);
        check(&MemberKeyPair::<Bls12_381>::new(sk.clone()), G1_LEN + FR_LEN, true);
        check(&proof, 2 * FR_LEN, false);
        check(&isk, 2 * FR_LEN, false);
        check(&ipk.gpk, 2 * G2_LEN, true);
        check(&ipk.proof, 3 * FR_LEN, false);
        check(&ipk, 2 * G2_LEN + 3 * FR_LEN, true);
        check(&cred, 4 * G1_LEN, true);
        check(&cred_sig, 3 * FR_LEN, false);

        let request = JoinRequest {
            public_key: pk.clone(),
            proof: Some(proof),
        };
        check(&request, G1_LEN + 1 + 2 * FR_LEN, true);
        let request = JoinRequest {
            public_key: pk.clone(),
            proof: None,
        };
        check(&request, G1_LEN + 1, true);

        let sig = sign::<Bls12_381, Blake2b512, _>(&mut rng, b"msg", None, &sk, &cred).unwrap();
        check(&sig, 5 * G1_LEN + 2 * FR_LEN, true);
        let sig = sign::<Bls12_381, Blake2b512, _>(&mut rng, b"msg", Some(b"bsn".as_slice()), &sk, &cred)
            .unwrap();
        check(&sig, 5 * G1_LEN + 2 * FR_LEN + 4 + 3, true);
        let sig = sign::<Bls12_381, Blake2b512, _>(&mut rng, b"msg", Some(b"".as_slice()), &sk, &cred)
            .unwrap();
        check(&sig, 5 * G1_LEN + 2 * FR_LEN + 4, true);

        let mut sk_list = SecretKeyRevocationList::<Fr>::new();
        check(&sk_list, 4, false);
        sk_list.revoke(Fr::rand(&mut rng));
        sk_list.revoke(sk.0);
        check(&sk_list, 4 + 2 * FR_LEN, false);

        let mut pseudonym_list = PseudonymRevocationList::<Bls12_381>::new();
        check(&pseudonym_list, 4, false);
        pseudonym_list.revoke(b"basename".to_vec(), G1::rand(&mut rng));
        pseudonym_list.revoke(Vec::new(), G1::rand(&mut rng));
        check(&pseudonym_list, 4 + (4 + 8 + G1_LEN) + (4 + G1_LEN), true);
    }

    #[test]
    fn checked_decoding() {
        let mut rng = StdRng::seed_from_u64(0u64);

        // Identity is rejected only by the checked decoder
        let identity = MemberPublicKey::<Bls12_381>(G1::zero()).to_bytes().unwrap();
        assert_eq!(identity, vec![0u8; G1_LEN]);
        assert!(matches!(
            MemberPublicKey::<Bls12_381>::from_bytes(&identity),
            Err(EcdaaError::PointAtInfinity)
        ));
        assert!(MemberPublicKey::<Bls12_381>::from_bytes_unchecked(&identity)
            .unwrap()
            .0
            .is_zero());

        // Zero secret key is rejected only by the checked decoder
        let zero = vec![0u8; FR_LEN];
        assert!(matches!(
            MemberSecretKey::<Fr>::from_bytes(&zero),
            Err(EcdaaError::InvalidSecretKey)
        ));
        assert!(MemberSecretKey::<Fr>::from_bytes_unchecked(&zero)
            .unwrap()
            .0
            .is_zero());
        assert!(matches!(
            IssuerSecretKey::<Fr>::from_bytes(&vec![0u8; 2 * FR_LEN]),
            Err(EcdaaError::InvalidSecretKey)
        ));

        // Scalar not less than the field order has no valid encoding
        let max = vec![0xffu8; FR_LEN];
        assert!(matches!(
            MemberSecretKey::<Fr>::from_bytes(&max),
            Err(EcdaaError::NonCanonicalScalar)
        ));
        assert!(matches!(
            MemberSecretKey::<Fr>::from_bytes_unchecked(&max),
            Err(EcdaaError::NonCanonicalScalar)
        ));

        // Wrong sizes
        let sk = MemberSecretKey::<Fr>::new(&mut rng).unwrap();
        let mut bytes = sk.to_bytes().unwrap();
        bytes.push(1);
        assert!(matches!(
            MemberSecretKey::<Fr>::from_bytes(&bytes),
            Err(EcdaaError::UnexpectedLength(32, 33))
        ));
        assert!(matches!(
            MemberSecretKey::<Fr>::from_bytes(&bytes[..31]),
            Err(EcdaaError::UnexpectedLength(32, 31))
        ));

        // Forged counts and lengths
        let mut bytes = 1000u32.to_be_bytes().to_vec();
        bytes.extend_from_slice(&Fr::from(1u64).into_bigint().to_bytes_be());
        assert!(matches!(
            SecretKeyRevocationList::<Fr>::from_bytes(&bytes),
            Err(EcdaaError::UnexpectedLength(_, _))
        ));
        let mut bytes = 1u32.to_be_bytes().to_vec();
        bytes.extend_from_slice(&u32::MAX.to_be_bytes());
        assert!(matches!(
            PseudonymRevocationList::<Bls12_381>::from_bytes(&bytes),
            Err(EcdaaError::BasenameTooLong(_))
        ));

        // Unknown proof flag in a join request
        let pk = MemberPublicKey::<Bls12_381>::new(&sk);
        let mut bytes = pk.to_bytes().unwrap();
        bytes.push(2);
        assert!(JoinRequest::<Bls12_381>::from_bytes(&bytes).is_err());

        // Key pair whose public key belongs to another secret key
        let mut bytes = pk.to_bytes().unwrap();
        bytes.extend_from_slice(&MemberSecretKey::<Fr>::new(&mut rng).unwrap().to_bytes().unwrap());
        assert!(matches!(
            MemberKeyPair::<Bls12_381>::from_bytes(&bytes),
            Err(EcdaaError::InvalidPublicKey)
        ));
        assert!(!MemberKeyPair::<Bls12_381>::from_bytes_unchecked(&bytes)
            .unwrap()
            .is_consistent());
    }

    #[test]
    fn invalid_points() {
        let pk = MemberPublicKey::<Bls12_381>(G1::generator());
        let bytes = pk.to_bytes().unwrap();
        assert_eq!(bytes[0], 0x04);

        // Unknown leading byte, compressed forms included
        for prefix in [0x01, 0x02, 0x03, 0x05] {
            let mut altered = bytes.clone();
            altered[0] = prefix;
            assert!(MemberPublicKey::<Bls12_381>::from_bytes(&altered).is_err());
            assert!(MemberPublicKey::<Bls12_381>::from_bytes_unchecked(&altered).is_err());
        }

        // Identity with trailing garbage
        let mut identity = vec![0u8; G1_LEN];
        identity[G1_LEN - 1] = 1;
        assert!(MemberPublicKey::<Bls12_381>::from_bytes_unchecked(&identity).is_err());

        // Off the curve
        let mut off_curve = bytes.clone();
        off_curve[G1_LEN - 1] ^= 1;
        assert!(MemberPublicKey::<Bls12_381>::from_bytes(&off_curve).is_err());
        assert!(MemberPublicKey::<Bls12_381>::from_bytes_unchecked(&off_curve).is_ok());

        // Coordinate not less than the field modulus
        let mut unreduced = bytes.clone();
        unreduced[1..49].fill(0xff);
        assert!(MemberPublicKey::<Bls12_381>::from_bytes_unchecked(&unreduced).is_err());

        // On the curve but outside the prime order subgroup
        let outside = (1u64..)
            .filter_map(|i| G1::get_point_from_x_unchecked(Fq::from(i), false))
            .find(|p| !p.is_in_correct_subgroup_assuming_on_curve())
            .unwrap();
        let bytes = MemberPublicKey::<Bls12_381>(outside).to_bytes().unwrap();
        assert!(matches!(
            MemberPublicKey::<Bls12_381>::from_bytes(&bytes),
            Err(EcdaaError::Serialization(SerializationError::InvalidData))
        ));
        assert_eq!(
            MemberPublicKey::<Bls12_381>::from_bytes_unchecked(&bytes)
                .unwrap()
                .0,
            outside
        );
    }

    #[test]
    fn bn254_points_are_big_endian() {
        type G1 = <Bn254 as Pairing>::G1Affine;
        type G2 = <Bn254 as Pairing>::G2Affine;
        const G1_LEN: usize = 1 + 2 * 32;
        const G2_LEN: usize = 1 + 4 * 32;

        // Generator is (1, 2)
        let mut expected = vec![0u8; G1_LEN];
        expected[0] = 0x04;
        expected[32] = 1;
        expected[64] = 2;
        let pk = MemberPublicKey::<Bn254>(G1::generator());
        assert_eq!(pk.to_bytes().unwrap(), expected);
        assert_eq!(MemberPublicKey::<Bn254>::from_bytes(&expected).unwrap(), pk);

        // Each Fp2 coordinate is c0 then c1
        let g2 = G2::generator();
        let (x, y) = g2.xy().unwrap();
        let mut expected = vec![0x04];
        for c in [x.c0, x.c1, y.c0, y.c1] {
            expected.extend_from_slice(&c.into_bigint().to_bytes_be());
        }
        let gpk = GroupPublicKey::<Bn254> { X: g2, Y: g2 };
        let bytes = gpk.to_bytes().unwrap();
        assert_eq!(bytes.len(), 2 * G2_LEN);
        assert_eq!(&bytes[..G2_LEN], expected.as_slice());
        assert_eq!(GroupPublicKey::<Bn254>::from_bytes(&bytes).unwrap(), gpk);

        let mut rng = StdRng::seed_from_u64(0u64);
        let (isk, ipk) = generate_issuer_keypair::<Bn254, Blake2b512, _>(&mut rng).unwrap();
        let (sk, pk, _) = generate_member_keypair::<Bn254, Blake2b512, _>(&mut rng, &[]).unwrap();
        let (cred, _) = generate_credential::<Bn254, Blake2b512, _>(&mut rng, &isk, &pk).unwrap();
        let sig = sign::<Bn254, Blake2b512, _>(&mut rng, b"msg", None, &sk, &cred).unwrap();
        check(&pk, G1_LEN, true);
        check(&MemberKeyPair::<Bn254>::new(sk), G1_LEN + 32, true);
        check(&ipk.gpk, 2 * G2_LEN, true);
        check(&ipk, 2 * G2_LEN + 3 * 32, true);
        check(&cred, 4 * G1_LEN, true);
        check(&sig, 5 * G1_LEN + 2 * 32, true);
    }
}
