/// Multiplier of the positional hash.
const PRIME: u32 = 37;

/// Positional hash of an occupancy bitstring.
///
/// `hash = Σ code(ch) * 37^(i + 1)` over the characters, with every step reduced
/// mod 2^32. Not collision resistant: equal shapes always match, distinct shapes
/// usually differ.
pub fn fingerprint(bits: &str) -> u32 {
    let mut hash: u32 = 0;
    let mut power: u32 = 1;
    for ch in bits.chars() {
        power = power.wrapping_mul(PRIME);
        hash = hash.wrapping_add((ch as u32).wrapping_mul(power));
    }
    hash
}
