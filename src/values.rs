use crate::random::Rand;

/// Process-wide pool of numeric literals chosen to hit boundary behavior
/// in the target engine: small-integer cache edges, 31/32-bit overflow
/// points, the float-precision cliff, and sub-integral values that force
/// the slow paths of integer fast cases.
pub const INTERESTING_VALUES: &[f64] = &[
    0.0,
    -0.0,
    1.0,
    -1.0,
    2.0,
    16.0,
    64.0,
    127.0,
    128.0,
    255.0,
    256.0,
    1024.0,
    32767.0,
    32768.0,
    65535.0,
    65536.0,
    1073741823.0,  // 2^30 - 1, smi boundary in common engines
    1073741824.0,  // 2^30
    2147483647.0,  // i32::MAX
    -2147483648.0, // i32::MIN
    4294967295.0,  // u32::MAX
    4294967296.0,  // 2^32
    9007199254740991.0, // Number.MAX_SAFE_INTEGER
    0.5,
    -0.5,
    1e-9,
    1e9,
];

/// Draw one value from the pool.
pub fn interesting_value(rng: &mut Rand) -> f64 {
    INTERESTING_VALUES[rng.below(INTERESTING_VALUES.len())]
}
