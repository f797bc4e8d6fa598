//! Template hashing and similarity scoring.

/// Wyhash of `data` with the given 64-bit seed.
///
/// A compact, public-domain non-cryptographic hash; used here purely as
/// a deterministic identity key for pattern templates within this
/// process, not as a cross-language wire format.
pub fn wyhash(data: &[u8], seed: u64) -> u64 {
    const P0: u64 = 0xa0761d6478bd642f;
    const P1: u64 = 0xe7037ed1a0b428db;
    const P2: u64 = 0x8ebc6af09c88c6e3;
    const P3: u64 = 0x589965cc75374cc3;

    fn mix(a: u64, b: u64) -> u64 {
        let r = (a as u128).wrapping_mul(b as u128);
        ((r >> 64) as u64) ^ (r as u64)
    }

    fn read_bytes(chunk: &[u8]) -> u64 {
        let mut buf = [0u8; 8];
        buf[..chunk.len()].copy_from_slice(chunk);
        u64::from_le_bytes(buf)
    }

    let mut seed = seed ^ P0;
    let mut chunks = data.chunks_exact(16);
    for chunk in &mut chunks {
        let a = read_bytes(&chunk[0..8]);
        let b = read_bytes(&chunk[8..16]);
        seed = mix(seed ^ P1, a ^ P2) ^ mix(seed, b ^ P3);
    }

    let rem = chunks.remainder();
    let (a, b) = match rem.len() {
        0 => (0, 0),
        1..=8 => (read_bytes(rem), 0),
        _ => (read_bytes(&rem[0..8]), read_bytes(&rem[8..])),
    };

    mix(seed ^ P1 ^ data.len() as u64, a ^ P2) ^ mix(seed, b ^ P3)
}

/// Jaccard similarity over the distinct-byte sets of `a` and `b` — a
/// deliberately cheap proxy metric. Both empty yields 1.0.
pub fn similarity(a: &str, b: &str) -> f32 {
    let set_a: std::collections::HashSet<u8> = a.bytes().collect();
    let set_b: std::collections::HashSet<u8> = b.bytes().collect();

    if set_a.is_empty() && set_b.is_empty() {
        return 1.0;
    }

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        1.0
    } else {
        intersection as f32 / union as f32
    }
}
