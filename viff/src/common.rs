use crate::consts::{VIFF_COMMENT_LENGTH, VIFF_HEADER_LENGTH};
use crate::{RasterDimensions, Result, StorageType, ViffError, ViffErrorCode};

pub(crate) fn expected_payload_length(
    dimensions: RasterDimensions,
    storage_type: StorageType,
) -> Result<usize> {
    let total_samples = dimensions.total_samples()?;
    let byte_len = total_samples
        .checked_mul(storage_type.byte_size() as u64)
        .ok_or_else(|| {
            ViffError::new(
                ViffErrorCode::InvalidDimensions,
                "Payload length overflow.",
            )
        })?;

    usize::try_from(byte_len).map_err(|_| {
        ViffError::new(
            ViffErrorCode::InvalidDimensions,
            "Payload length exceeds platform usize.",
        )
    })
}

pub(crate) fn read_array<const N: usize>(bytes: &[u8], offset: usize) -> Result<[u8; N]> {
    let field = bytes.get(offset..offset + N).ok_or_else(|| {
        ViffError::new(
            ViffErrorCode::TruncatedHeader,
            format!("Could not read {N}-byte field at offset {offset}."),
        )
    })?;
    field.try_into().map_err(|_| {
        ViffError::new(
            ViffErrorCode::TruncatedHeader,
            format!("Could not parse {N}-byte field at offset {offset}."),
        )
    })
}

pub(crate) fn read_u32_le(bytes: &[u8], offset: usize) -> Result<u32> {
    Ok(u32::from_le_bytes(read_array(bytes, offset)?))
}

pub(crate) fn read_f32_le(bytes: &[u8], offset: usize) -> Result<f32> {
    Ok(f32::from_le_bytes(read_array(bytes, offset)?))
}

pub(crate) fn write_u32_le(header: &mut [u8; VIFF_HEADER_LENGTH], offset: usize, value: u32) {
    header[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// Decodes the comment field as ASCII. Non-ASCII bytes are dropped and
/// trailing NULs trimmed.
pub(crate) fn decode_comment(raw: &[u8]) -> String {
    let text: String = raw
        .iter()
        .filter(|byte| byte.is_ascii())
        .map(|byte| char::from(*byte))
        .collect();
    let dropped = raw.len() - text.len();
    if dropped > 0 {
        log::warn!("Dropped {dropped} non-ASCII byte(s) from VIFF comment.");
    }
    text.trim_end_matches('\0').to_string()
}

pub(crate) fn encode_comment(comment: &str) -> [u8; VIFF_COMMENT_LENGTH] {
    let mut out = [0_u8; VIFF_COMMENT_LENGTH];
    let ascii: Vec<u8> = comment.bytes().filter(u8::is_ascii).collect();
    if ascii.len() != comment.len() {
        log::warn!("Dropped non-ASCII characters from VIFF comment.");
    }
    if ascii.len() > VIFF_COMMENT_LENGTH {
        log::warn!(
            "VIFF comment truncated from {} to {VIFF_COMMENT_LENGTH} bytes.",
            ascii.len()
        );
    }
    let len = ascii.len().min(VIFF_COMMENT_LENGTH);
    out[..len].copy_from_slice(&ascii[..len]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_drops_non_ascii_and_trailing_nuls() {
        let mut raw = [0_u8; VIFF_COMMENT_LENGTH];
        raw[..7].copy_from_slice(&[b'l', b'u', 0xc3, 0xa9, b'n', b'a', b'r']);
        assert_eq!(decode_comment(&raw), "lunar");
    }

    #[test]
    fn comment_encoding_truncates_to_field_length() {
        let long = "x".repeat(VIFF_COMMENT_LENGTH + 40);
        let encoded = encode_comment(&long);
        assert!(encoded.iter().all(|byte| *byte == b'x'));

        let encoded = encode_comment("caf\u{e9} scan");
        assert_eq!(&encoded[..8], b"caf scan");
        assert!(encoded[8..].iter().all(|byte| *byte == 0));
    }

    #[test]
    fn expected_length_scales_with_storage_width() {
        let dimensions = RasterDimensions {
            images: 2,
            bands: 3,
            columns: 4,
            rows: 5,
        };
        assert_eq!(
            expected_payload_length(dimensions, StorageType::Uint8).expect("length"),
            120
        );
        assert_eq!(
            expected_payload_length(dimensions, StorageType::Complex64).expect("length"),
            1920
        );
    }

    #[test]
    fn short_reads_are_truncated_header_errors() {
        let bytes = [0_u8; 6];
        let error = read_u32_le(&bytes, 4).expect_err("should fail");
        assert_eq!(error.code, ViffErrorCode::TruncatedHeader);
    }
}
