//! ECDSA signature encoding transcoding.
//!
//! JOSE (RFC 7518) requires ECDSA signatures as the raw concatenation
//! `r || s` with fixed-width components, but several client JWT libraries
//! emit the ASN.1 DER form `SEQUENCE { INTEGER r, INTEGER s }` instead.
//! The stub accepts both: DER signatures are transcoded to the
//! concatenated form before verification, so heterogeneous clients
//! interoperate.
//!
//! For ES256 (P-256) the component length is 32 bytes.

use thiserror::Error;

/// Error type for signature transcoding.
#[derive(Debug, Error)]
pub enum EcdsaError {
    /// The signature bytes are neither valid DER nor the expected
    /// concatenated length.
    #[error("malformed ECDSA signature: {0}")]
    Malformed(String),

    /// An integer component does not fit the curve's component width.
    #[error("signature component of {got} bytes exceeds component length {expected}")]
    ComponentTooLong {
        /// Actual component length after stripping the sign padding.
        got: usize,
        /// Fixed component width for the curve.
        expected: usize,
    },
}

/// Converts a DER-encoded ECDSA signature to raw concatenated `r || s`.
///
/// `component_len` is the fixed component width for the curve (32 for
/// P-256). Components shorter than the width are left-padded with zeros;
/// a leading zero sign byte is stripped.
///
/// # Errors
///
/// Returns [`EcdsaError`] if the input is not a DER sequence of exactly
/// two integers, or if a component exceeds `component_len`.
pub fn der_to_concat(der: &[u8], component_len: usize) -> Result<Vec<u8>, EcdsaError> {
    let mut pos = 0;

    if der.first() != Some(&0x30) {
        return Err(EcdsaError::Malformed("expected SEQUENCE tag".to_string()));
    }
    pos += 1;

    let seq_len = read_length(der, &mut pos)?;
    if der.len() - pos != seq_len {
        return Err(EcdsaError::Malformed(format!(
            "sequence length {} does not match remaining {} bytes",
            seq_len,
            der.len() - pos
        )));
    }

    let r = read_integer(der, &mut pos)?;
    let s = read_integer(der, &mut pos)?;

    if pos != der.len() {
        return Err(EcdsaError::Malformed(
            "trailing bytes after signature integers".to_string(),
        ));
    }

    let mut out = vec![0u8; component_len * 2];
    write_padded(&mut out[..component_len], r, component_len)?;
    write_padded(&mut out[component_len..], s, component_len)?;
    Ok(out)
}

/// Converts a raw concatenated `r || s` signature to DER.
///
/// Provided for clients and tests that need to exercise the DER path; the
/// verification side only ever normalizes towards the concatenated form.
///
/// # Errors
///
/// Returns [`EcdsaError`] if the input length is odd.
pub fn concat_to_der(concat: &[u8]) -> Result<Vec<u8>, EcdsaError> {
    if concat.is_empty() || concat.len() % 2 != 0 {
        return Err(EcdsaError::Malformed(format!(
            "concatenated signature must have even length, got {}",
            concat.len()
        )));
    }

    let half = concat.len() / 2;
    let r = encode_integer(&concat[..half]);
    let s = encode_integer(&concat[half..]);

    let body_len = r.len() + s.len();
    let mut out = Vec::with_capacity(body_len + 3);
    out.push(0x30);
    if body_len < 128 {
        #[allow(clippy::cast_possible_truncation)]
        out.push(body_len as u8);
    } else {
        out.push(0x81);
        #[allow(clippy::cast_possible_truncation)]
        out.push(body_len as u8);
    }
    out.extend_from_slice(&r);
    out.extend_from_slice(&s);
    Ok(out)
}

/// Accepts a signature in either encoding and returns the concatenated form.
///
/// A signature of exactly `2 * component_len` bytes is taken as already
/// concatenated; anything starting with a SEQUENCE tag is transcoded from
/// DER.
///
/// # Errors
///
/// Returns [`EcdsaError`] if the signature is neither encoding.
pub fn normalize_signature(sig: &[u8], component_len: usize) -> Result<Vec<u8>, EcdsaError> {
    if sig.len() == component_len * 2 {
        return Ok(sig.to_vec());
    }
    if sig.first() == Some(&0x30) {
        return der_to_concat(sig, component_len);
    }
    Err(EcdsaError::Malformed(format!(
        "{} bytes is neither concatenated nor DER",
        sig.len()
    )))
}

/// Reads a DER length octet (short form, or single-byte long form).
fn read_length(buf: &[u8], pos: &mut usize) -> Result<usize, EcdsaError> {
    let first = *buf
        .get(*pos)
        .ok_or_else(|| EcdsaError::Malformed("truncated length".to_string()))?;
    *pos += 1;

    if first < 0x80 {
        return Ok(first as usize);
    }
    if first == 0x81 {
        let len = *buf
            .get(*pos)
            .ok_or_else(|| EcdsaError::Malformed("truncated long-form length".to_string()))?;
        *pos += 1;
        return Ok(len as usize);
    }
    Err(EcdsaError::Malformed(format!(
        "unsupported length octet 0x{first:02x}"
    )))
}

/// Reads a DER INTEGER and strips its sign padding.
fn read_integer<'a>(buf: &'a [u8], pos: &mut usize) -> Result<&'a [u8], EcdsaError> {
    if buf.get(*pos) != Some(&0x02) {
        return Err(EcdsaError::Malformed("expected INTEGER tag".to_string()));
    }
    *pos += 1;

    let len = read_length(buf, pos)?;
    if len == 0 || buf.len() - *pos < len {
        return Err(EcdsaError::Malformed("truncated INTEGER".to_string()));
    }

    let mut bytes = &buf[*pos..*pos + len];
    *pos += len;

    // Strip leading zero sign bytes, keeping at least one octet.
    while bytes.len() > 1 && bytes[0] == 0x00 {
        bytes = &bytes[1..];
    }
    Ok(bytes)
}

/// Left-pads a stripped integer into a fixed-width component slot.
fn write_padded(slot: &mut [u8], bytes: &[u8], component_len: usize) -> Result<(), EcdsaError> {
    if bytes.len() > component_len {
        return Err(EcdsaError::ComponentTooLong {
            got: bytes.len(),
            expected: component_len,
        });
    }
    slot[component_len - bytes.len()..].copy_from_slice(bytes);
    Ok(())
}

/// Encodes a fixed-width component as a minimal DER INTEGER.
fn encode_integer(bytes: &[u8]) -> Vec<u8> {
    let mut value = bytes;
    while value.len() > 1 && value[0] == 0x00 {
        value = &value[1..];
    }

    let sign_pad = usize::from(value[0] & 0x80 != 0);
    let mut out = Vec::with_capacity(value.len() + sign_pad + 2);
    out.push(0x02);
    #[allow(clippy::cast_possible_truncation)]
    out.push((value.len() + sign_pad) as u8);
    if sign_pad == 1 {
        out.push(0x00);
    }
    out.extend_from_slice(value);
    out
}
