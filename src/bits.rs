/// Extract `n` bits of `x` ending at bit position `p` (K&R `getbits`).
/// `get_bits(0b1101_0000, 7, 3) == 0b110`.
#[inline]
pub fn get_bits(x: u32, p: u32, n: u32) -> u32 {
    if n == 0 {
        return 0;
    }
    debug_assert!(p + 1 >= n && p < u32::BITS);
    let shifted = x >> (p + 1 - n);
    if n >= u32::BITS {
        shifted
    } else {
        shifted & ((1 << n) - 1)
    }
}

/// Exact base-2 logarithm. Returns `None` unless `x` is a power of two.
#[inline]
pub fn log_2(x: u32) -> Option<u32> {
    if x.is_power_of_two() {
        Some(x.trailing_zeros())
    } else {
        None
    }
}

#[inline]
pub fn pow_2(pow: u32) -> u64 {
    1u64 << pow
}
