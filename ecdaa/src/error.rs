use ark_serialize::SerializationError;
use dock_crypto_utils::serde_utils::ArkSerializationError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub enum EcdaaError {
    /// The randomness source could not supply bytes
    RandomnessFailure,
    InvalidPublicKey,
    InvalidSecretKey,
    MalformedSignature,
    MalformedCredential,
    InvalidProof,
    /// The credential (or its randomized copy in a signature) does not satisfy the pairing relations
    InvalidCredential,
    Revoked,
    PointAtInfinity,
    CredentialProofInvalid,
    /// (needed, available)
    BufferTooSmall(usize, usize),
    /// (expected, found)
    UnexpectedLength(usize, usize),
    NonCanonicalScalar,
    NonceTooLong(usize),
    BasenameTooLong(usize),
    #[serde(with = "ArkSerializationError")]
    Serialization(SerializationError),
}

impl From<SerializationError> for EcdaaError {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(e)
    }
}
