const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Sorted set of uppercase letters used across `words`.
///
/// Characters outside `A..=Z` are ignored.
pub fn unique_letters<S: AsRef<str>>(words: &[S]) -> String {
    let mut present = [false; 26];
    for c in words.iter().flat_map(|w| w.as_ref().chars()) {
        if c.is_ascii_uppercase() {
            present[(c as u8 - b'A') as usize] = true;
        }
    }

    ALPHABET
        .chars()
        .zip(present)
        .filter_map(|(ch, p)| p.then_some(ch))
        .collect()
}
