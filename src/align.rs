use crate::crypto::BLOCK_LEN;

/// Rounds a byte count up to a length the chain engine can consume.
///
/// Non-zero multiples of 128 pass through unchanged; anything else is
/// rounded up to the next power of two, with a floor of one block.
/// Every value this returns is divisible by [`BLOCK_LEN`].
///
/// The extra bytes are not PKCS#7 padding: callers encrypt a zero-filled
/// buffer of the aligned size and recover the true length out-of-band.
pub fn align(n: usize) -> usize {
    if n != 0 && n % 128 == 0 {
        return n;
    }

    n.next_power_of_two().max(BLOCK_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rounds_up_to_one_block() {
        assert_eq!(align(0), 16);
    }

    #[test]
    fn multiples_of_128_pass_through() {
        assert_eq!(align(128), 128);
        assert_eq!(align(256), 256);
        assert_eq!(align(8192), 8192);
    }

    #[test]
    fn rounds_up_to_next_power_of_two() {
        assert_eq!(align(1), 16);
        assert_eq!(align(16), 16);
        assert_eq!(align(17), 32);
        assert_eq!(align(33), 64);
        assert_eq!(align(100), 128);
        assert_eq!(align(129), 256);
    }

    #[test]
    fn align_is_idempotent() {
        for n in 0..=4096 {
            assert_eq!(align(align(n)), align(n), "n = {n}");
        }
    }

    #[test]
    fn align_is_divisible_by_block_len() {
        for n in 0..=4096 {
            assert_eq!(align(n) % BLOCK_LEN, 0, "n = {n}");
        }
    }

    #[test]
    fn align_never_shrinks() {
        for n in 0..=4096 {
            assert!(align(n) >= n.max(16), "n = {n}");
        }
    }
}
