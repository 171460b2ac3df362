//! ECDSA signature with lax DER parsing.
//!
//! Signatures found in unlocking scripts are parsed leniently: leading zero
//! padding on R and S is tolerated, bytes after the sequence are ignored, and
//! high-S values are accepted and normalized before verification.

use k256::ecdsa;
use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::FieldBytes;

use crate::ec::private_key::PrivateKey;
use crate::ec::public_key::PublicKey;
use crate::util::ByteReader;
use crate::PrimitivesError;

const SEQUENCE_TAG: u8 = 0x30;
const INTEGER_TAG: u8 = 0x02;

/// An ECDSA signature over secp256k1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    inner: ecdsa::Signature,
}

impl Signature {
    /// Build a signature from big-endian R and S.
    ///
    /// # Returns
    /// An error if either scalar is zero or not below the curve order.
    pub fn from_scalars(r: [u8; 32], s: [u8; 32]) -> Result<Self, PrimitivesError> {
        let inner = ecdsa::Signature::from_scalars(FieldBytes::from(r), FieldBytes::from(s))
            .map_err(|_| malformed("scalar out of range"))?;
        Ok(Signature { inner })
    }

    /// R and S as big-endian bytes.
    pub fn scalars(&self) -> ([u8; 32], [u8; 32]) {
        let (r, s) = self.inner.split_bytes();
        (r.into(), s.into())
    }

    /// Parse a DER-encoded signature, leniently.
    ///
    /// Layout: `30 <len> 02 <r_len> <r> 02 <s_len> <s>`. The lengths must fit
    /// the input; anything after S or after the sequence is ignored.
    ///
    /// # Arguments
    /// * `bytes` - Signature bytes with the sighash byte already removed.
    pub fn from_der(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let mut reader = ByteReader::new(bytes);
        if reader.read_u8().ok() != Some(SEQUENCE_TAG) {
            return Err(malformed("no sequence tag"));
        }
        let len = reader.read_u8().map_err(|_| malformed("no sequence length"))?;
        let body = reader
            .read_bytes(len as usize)
            .map_err(|_| malformed("sequence longer than input"))?;

        let mut body = ByteReader::new(body);
        let r = read_integer(&mut body, "R")?;
        let s = read_integer(&mut body, "S")?;
        Self::from_scalars(r, s)
    }

    /// Strict DER with S in the lower half of the order.
    pub fn to_der(&self) -> Vec<u8> {
        let (r, s) = self.low_s().split_bytes();
        let r = der_integer(&r);
        let s = der_integer(&s);
        let mut out = Vec::with_capacity(2 + r.len() + s.len());
        out.push(SEQUENCE_TAG);
        out.push((r.len() + s.len()) as u8);
        out.extend(r);
        out.extend(s);
        out
    }

    /// Check whether S lies in the upper half of the curve order.
    pub fn is_high_s(&self) -> bool {
        self.inner.normalize_s().is_some()
    }

    fn low_s(&self) -> ecdsa::Signature {
        self.inner.normalize_s().unwrap_or_else(|| self.inner.clone())
    }

    /// Sign a 32-byte digest with an RFC6979 deterministic nonce.
    ///
    /// # Returns
    /// A low-S signature, or an error for a digest of the wrong length.
    pub fn sign(hash: &[u8], priv_key: &PrivateKey) -> Result<Self, PrimitivesError> {
        if hash.len() != 32 {
            return Err(PrimitivesError::InvalidSignature(format!(
                "digest must be 32 bytes, got {}",
                hash.len()
            )));
        }
        let (inner, _) = priv_key
            .signing_key()
            .sign_prehash_recoverable(hash)
            .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;
        let inner = inner.normalize_s().unwrap_or(inner);
        Ok(Signature { inner })
    }

    /// Verify against a 32-byte digest; high-S signatures verify too.
    pub fn verify(&self, hash: &[u8], pub_key: &PublicKey) -> bool {
        pub_key
            .verifying_key()
            .verify_prehash(hash, &self.low_s())
            .is_ok()
    }
}

fn malformed(reason: &str) -> PrimitivesError {
    PrimitivesError::InvalidSignature(format!("malformed signature: {}", reason))
}

/// Minimal DER integer: no leading zeros except one before a set high bit.
fn der_integer(scalar: &[u8]) -> Vec<u8> {
    let first = scalar
        .iter()
        .position(|b| *b != 0)
        .unwrap_or(scalar.len().saturating_sub(1));
    let digits = &scalar[first..];
    let pad = digits.first().map_or(false, |b| b & 0x80 != 0);
    let mut out = Vec::with_capacity(digits.len() + 3);
    out.push(INTEGER_TAG);
    out.push((digits.len() + usize::from(pad)) as u8);
    if pad {
        out.push(0x00);
    }
    out.extend_from_slice(digits);
    out
}

/// Read one DER integer as a 32-byte big-endian scalar.
fn read_integer(reader: &mut ByteReader<'_>, name: &str) -> Result<[u8; 32], PrimitivesError> {
    if reader.read_u8().ok() != Some(INTEGER_TAG) {
        return Err(malformed(&format!("no {} marker", name)));
    }
    let len = reader
        .read_u8()
        .map_err(|_| malformed(&format!("no {} length", name)))?;
    let bytes = reader
        .read_bytes(len as usize)
        .map_err(|_| malformed(&format!("{} longer than input", name)))?;

    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    let digits = &bytes[first..];
    if bytes.is_empty() || digits.len() > 32 {
        return Err(malformed(&format!("bad {} length {}", name, len)));
    }
    let mut out = [0u8; 32];
    out[32 - digits.len()..].copy_from_slice(digits);
    Ok(out)
}
