//! Checksum calculations for network packets
//!
//! This module provides the Internet Checksum (RFC 1071) used by the IP, TCP
//! and UDP headers. It knows nothing about any protocol: callers assemble the
//! bytes to be covered (including pseudo-headers) and pass them in.

/// Calculates the Internet Checksum as defined in RFC 1071.
///
/// The data is treated as a sequence of big-endian 16-bit words which are
/// added to `seed` with end-around carry. An odd trailing byte is the high
/// byte of a final word padded with zero. The one's complement of the folded
/// sum is returned.
///
/// # Arguments
///
/// * `seed` - Initial partial sum, normally 0
/// * `data` - The data to calculate the checksum for
///
/// # Examples
///
/// ```
/// use framecraft_packet::checksum::internet_checksum;
///
/// let data = [0x00, 0x01, 0xf2, 0x03, 0xf4, 0xf5, 0xf6, 0xf7];
/// assert_eq!(internet_checksum(0, &data), 0x220d);
/// ```
pub fn internet_checksum(seed: u32, data: &[u8]) -> u16 {
    !checksum_accumulate(seed, data)
}

/// Accumulates the folded one's-complement sum without the final complement.
///
/// Useful when a checksum is computed over several discontiguous ranges: the
/// result of one call can be passed as the `seed` of the next.
pub fn checksum_accumulate(seed: u32, data: &[u8]) -> u16 {
    let mut sum: u64 = seed as u64;

    // Process 16-bit words
    let mut chunks = data.chunks_exact(2);
    for chunk in &mut chunks {
        sum += u16::from_be_bytes([chunk[0], chunk[1]]) as u64;
    }

    // Handle odd byte if present
    if let Some(&byte) = chunks.remainder().first() {
        sum += (byte as u64) << 8;
    }

    // Fold to 16 bits
    while (sum >> 16) != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }

    sum as u16
}

/// Validates an Internet checksum.
///
/// Summing data that already contains its checksum yields 0 (or 0xFFFF, the
/// other one's complement zero).
pub fn validate_checksum(data: &[u8]) -> bool {
    let result = internet_checksum(0, data);
    result == 0 || result == 0xFFFF
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internet_checksum_empty() {
        assert_eq!(internet_checksum(0, &[]), 0xFFFF);
    }

    #[test]
    fn test_internet_checksum_rfc1071_vector() {
        let data = [0x00, 0x01, 0xf2, 0x03, 0xf4, 0xf5, 0xf6, 0xf7];
        assert_eq!(internet_checksum(0, &data), 0x220d);
    }

    #[test]
    fn test_internet_checksum_odd_length() {
        // 0x0001 + 0x0200 = 0x0201
        assert_eq!(internet_checksum(0, &[0x00, 0x01, 0x02]), !0x0201);
    }

    #[test]
    fn test_internet_checksum_seed() {
        let data = [0x00, 0x01, 0xf2, 0x03];
        let tail = [0xf4, 0xf5, 0xf6, 0xf7];
        let partial = checksum_accumulate(0, &data);
        assert_eq!(internet_checksum(partial as u32, &tail), 0x220d);
    }

    #[test]
    fn test_checksum_accumulate_carry() {
        assert_eq!(checksum_accumulate(0, &[0xff, 0xff, 0x00, 0x01]), 0x0001);
        assert_eq!(checksum_accumulate(0, &[0x00, 0x01, 0x00, 0x02]), 0x0003);
    }

    #[test]
    fn test_validate_checksum() {
        let data = vec![0x45, 0x00, 0x00, 0x3c];
        let checksum = internet_checksum(0, &data);

        let mut data_with_checksum = data.clone();
        data_with_checksum.extend_from_slice(&checksum.to_be_bytes());

        assert!(validate_checksum(&data_with_checksum));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_appended_checksum_validates(
                mut data in proptest::collection::vec(any::<u8>(), 0..256)
            ) {
                // Keep the checksum word aligned
                if data.len() % 2 == 1 {
                    data.push(0);
                }
                let checksum = internet_checksum(0, &data);
                data.extend_from_slice(&checksum.to_be_bytes());
                prop_assert!(validate_checksum(&data));
            }
        }
    }
}
