//! Password strength rating shown at the prompt
//!
//! Advisory only: the cipher accepts any non-empty password.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Strength {
    Weak,
    Medium,
    Strong,
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strength::Weak => "weak",
            Strength::Medium => "medium",
            Strength::Strong => "strong",
        })
    }
}

/// Score 0..=5: length ≥ 8, length ≥ 12, mixed case, a digit, a symbol.
pub fn score(password: &str) -> u8 {
    let len = password.chars().count();
    let (mut upper, mut lower, mut digit, mut other) = (false, false, false, false);
    for c in password.chars() {
        if c.is_uppercase() {
            upper = true;
        } else if c.is_lowercase() {
            lower = true;
        } else if c.is_ascii_digit() {
            digit = true;
        } else {
            other = true;
        }
    }

    [len >= 8, len >= 12, upper && lower, digit, other]
        .into_iter()
        .filter(|&hit| hit)
        .count() as u8
}

pub fn rate(password: &str) -> Strength {
    match score(password) {
        0..=1 => Strength::Weak,
        2..=3 => Strength::Medium,
        _ => Strength::Strong,
    }
}
