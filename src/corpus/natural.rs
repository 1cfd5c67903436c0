//! corpus::natural
//!
//! Numeric-aware path ordering.
//!
//! Runs of ASCII digits compare by value, everything else compares by
//! character, so `mn9.json` sorts before `mn10.json`. This order is the
//! corpus order the sequence check walks, so it must match human
//! numbering of files and sections.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

#[derive(Debug, PartialEq, Eq)]
enum Chunk<'a> {
    Digits(&'a str),
    Text(&'a str),
}

fn chunks(s: &str) -> Vec<Chunk<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_digits = None;

    for (i, c) in s.char_indices() {
        let digit = c.is_ascii_digit();
        match in_digits {
            Some(prev) if prev != digit => {
                out.push(chunk(&s[start..i], prev));
                start = i;
            }
            _ => {}
        }
        in_digits = Some(digit);
    }
    if let Some(digit) = in_digits {
        out.push(chunk(&s[start..], digit));
    }
    out
}

fn chunk(s: &str, digit: bool) -> Chunk<'_> {
    if digit {
        Chunk::Digits(s)
    } else {
        Chunk::Text(s)
    }
}

fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a_trim = a.trim_start_matches('0');
    let b_trim = b.trim_start_matches('0');
    a_trim
        .len()
        .cmp(&b_trim.len())
        .then_with(|| a_trim.cmp(b_trim))
        .then_with(|| a.len().cmp(&b.len()))
}

/// Compare two strings in natural order.
///
/// # Example
///
/// ```
/// use std::cmp::Ordering;
/// use bilara_check::corpus::natural::natural_cmp;
///
/// assert_eq!(natural_cmp("mn9", "mn10"), Ordering::Less);
/// assert_eq!(natural_cmp("an1.2", "an1.10"), Ordering::Less);
/// assert_eq!(natural_cmp("dn2", "mn1"), Ordering::Less);
/// ```
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let left = chunks(a);
    let right = chunks(b);

    for (l, r) in left.iter().zip(right.iter()) {
        let ord = match (l, r) {
            (Chunk::Digits(x), Chunk::Digits(y)) => cmp_digits(x, y),
            (Chunk::Text(x), Chunk::Text(y)) => x.cmp(y),
            (Chunk::Digits(_), Chunk::Text(_)) => Ordering::Less,
            (Chunk::Text(_), Chunk::Digits(_)) => Ordering::Greater,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    left.len().cmp(&right.len()).then_with(|| a.cmp(b))
}

/// Compare two paths in natural order, component by component.
pub fn natural_path_cmp(a: &Path, b: &Path) -> Ordering {
    let mut left = a.components();
    let mut right = b.components();
    loop {
        match (left.next(), right.next()) {
            (Some(l), Some(r)) => {
                let ord = natural_cmp(
                    &l.as_os_str().to_string_lossy(),
                    &r.as_os_str().to_string_lossy(),
                );
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
        }
    }
}

/// Sort paths in place in natural order.
pub fn sort_paths(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| natural_path_cmp(a, b));
}
