use base64::{Engine as _, engine::general_purpose};

use crate::error::DecodeError;

/// Decode a body payload as delivered by the provider (padded URL-safe base64).
pub fn decode(encoded: &str) -> Result<Vec<u8>, DecodeError> {
    Ok(general_purpose::URL_SAFE.decode(encoded)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_url_safe_alphabet() {
        // 0xfb 0xff encodes to "-_8=" in the URL-safe alphabet, "+/8=" in the standard one
        assert_eq!(decode("-_8=").unwrap(), vec![0xfb, 0xff]);
        assert!(decode("+/8=").is_err());
    }

    #[test]
    fn round_trips_arbitrary_bytes() {
        let samples: [&[u8]; 4] = [b"", b"hi", b"<p>hey</p>", &[0, 1, 2, 250, 251, 252, 253, 254, 255]];
        for bytes in samples {
            let encoded = general_purpose::URL_SAFE.encode(bytes);
            assert_eq!(decode(&encoded).unwrap(), bytes);
        }
    }

    #[test]
    fn rejects_non_base64() {
        for bad in ["not base64!", "aGk", "a===", "%%%%"] {
            assert!(decode(bad).is_err(), "{bad:?} should not decode");
        }
    }

    #[test]
    fn empty_payload_is_empty_bytes() {
        assert!(decode("").unwrap().is_empty());
    }
}
