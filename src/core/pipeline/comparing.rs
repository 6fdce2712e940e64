/// Result of checking produced output against the reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Comparison {
    Match,
    Mismatch {
        token_idx: usize,
        expected: Option<String>,
        actual: Option<String>,
    },
}

fn tokens(bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
    bytes
        .split(|b| b.is_ascii_whitespace())
        .filter(|token| !token.is_empty())
}

/// Whitespace-insensitive structural equality: both sides are split into
/// whitespace-separated tokens and the token sequences must be identical.
pub fn compare_outputs(actual: &[u8], expected: &[u8]) -> Comparison {
    let mut actual_tokens = tokens(actual);
    let mut expected_tokens = tokens(expected);
    let mut token_idx = 0;

    loop {
        match (actual_tokens.next(), expected_tokens.next()) {
            (None, None) => return Comparison::Match,
            (Some(a), Some(e)) if a == e => token_idx += 1,
            (a, e) => {
                return Comparison::Mismatch {
                    token_idx,
                    expected: e.map(|t| String::from_utf8_lossy(t).into_owned()),
                    actual: a.map(|t| String::from_utf8_lossy(t).into_owned()),
                };
            }
        }
    }
}
