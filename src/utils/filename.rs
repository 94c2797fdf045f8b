use sha2::{Digest, Sha256};

const BASE36_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the hash portion of a derived filename.
const HASH_LEN: usize = 15;

/// Derives the stored filename for an upload from the client-supplied name
/// and the remote address. Deterministic: the same (name, address) pair always
/// maps to the same file, so a repeat upload overwrites the previous one.
///
/// The result is the first 15 base-36 characters of
/// `sha256("<name> <remote_addr>")`, a `.` separator, and the extension taken
/// from `name` (possibly empty).
pub fn derive_filename(name: &str, remote_addr: &str) -> String {
    let digest = Sha256::digest(format!("{name} {remote_addr}"));
    let mut hash = base36_encode(&digest);
    hash.truncate(HASH_LEN);
    format!("{hash}.{}", extension_of(name))
}

/// Extension of the final path component of `name`: the part after the last
/// `.` in that component, or empty when it has none. Taking the basename
/// first keeps path separators out of derived filenames.
pub fn extension_of(name: &str) -> &str {
    let basename = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match basename.rsplit_once('.') {
        Some((_, ext)) => ext,
        None => "",
    }
}

/// Lowercase base-36 rendering of a big-endian byte string.
fn base36_encode(bytes: &[u8]) -> String {
    let mut quotient = bytes.to_vec();
    let mut digits: Vec<char> = Vec::new();

    while quotient.iter().any(|&b| b != 0) {
        let mut rem = 0u32;
        for b in &mut quotient {
            let acc = (rem << 8) | u32::from(*b);
            *b = (acc / 36) as u8;
            rem = acc % 36;
        }
        digits.push(BASE36_ALPHABET[rem as usize] as char);
    }

    if digits.is_empty() {
        digits.push('0');
    }

    digits.iter().rev().collect()
}
