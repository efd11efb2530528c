//! Sequence primitives shared by the emitters.
use rand::Rng;

const fn revcmp_table() -> [u8; 256] {
    let mut table = [0; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = i as u8;
        i += 1;
    }
    let pairs: [(u8, u8); 6] = [
        (b'A', b'T'),
        (b'C', b'G'),
        (b'R', b'Y'),
        (b'K', b'M'),
        (b'B', b'V'),
        (b'D', b'H'),
    ];
    let mut j = 0;
    while j < pairs.len() {
        let (x, y) = pairs[j];
        table[x as usize] = y;
        table[y as usize] = x;
        table[x.to_ascii_lowercase() as usize] = y.to_ascii_lowercase();
        table[y.to_ascii_lowercase() as usize] = x.to_ascii_lowercase();
        j += 1;
    }
    table
}

// An involution. U, S, W, N and anything unknown are their own complement.
const REVCMP: [u8; 256] = revcmp_table();

pub fn revcmp(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&x| REVCMP[x as usize]).collect()
}

pub fn revcmp_str(seq: &str) -> String {
    String::from_utf8_lossy(&revcmp(seq.as_bytes())).to_string()
}

/// Return the sequence as is or its reverse complement with probability 1/2 each.
pub fn random_flip<R: Rng>(seq: String, rng: &mut R) -> String {
    if rng.gen_bool(0.5) {
        seq
    } else {
        revcmp_str(&seq)
    }
}

/// Pick a `len`-long substring of `seq`, starting at an offset drawn uniformly from `[0, seq.len() - len]`.
/// If `seq` is shorter than `len`, return None without consuming any randomness.
pub fn random_fragment<'a, R: Rng>(seq: &'a [u8], len: usize, rng: &mut R) -> Option<&'a [u8]> {
    if seq.len() < len {
        return None;
    }
    let start = rng.gen_range(0..=seq.len() - len);
    Some(&seq[start..start + len])
}
