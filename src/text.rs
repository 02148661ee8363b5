// 🔤 Turkish case mapping
//
// Rust's default case mapping turns 'İ' into "i̇" (i + combining dot) and 'i'
// into 'I'. Official letters are written in Turkish, so keyword matching and
// upper-cased headings use the Turkish dotted/dotless pairs instead.

/// Lower-case with Turkish rules: `İ → i`, `I → ı`.
pub fn to_turkish_lowercase(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            'İ' => out.push('i'),
            'I' => out.push('ı'),
            _ => out.extend(c.to_lowercase()),
        }
    }
    out
}

/// True when any token occurs in `s` under either Turkish or plain lower-casing.
///
/// Text typed without Turkish capitals ("KIMLIK", "VERGI DAIRESI") only matches
/// its tokens under plain lower-casing, while "VALİLİĞİ" only matches under the
/// Turkish rules.
pub fn contains_any_folded<T: AsRef<str>>(s: &str, tokens: &[T]) -> bool {
    let turkish = to_turkish_lowercase(s);
    if tokens.iter().any(|t| turkish.contains(t.as_ref())) {
        return true;
    }
    let plain = s.to_lowercase();
    tokens.iter().any(|t| plain.contains(t.as_ref()))
}

/// Upper-case with Turkish rules: `i → İ`, `ı → I`.
pub fn to_turkish_uppercase(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            'i' => out.push('İ'),
            'ı' => out.push('I'),
            _ => out.extend(c.to_uppercase()),
        }
    }
    out
}
