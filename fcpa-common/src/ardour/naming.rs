//! Route name allocation
//!
//! Route names must be unique in a session. A colliding candidate gets its
//! trailing number bumped until it is free: `Audio` → `Audio1` → `Audio2`,
//! `Seq.1` → `Seq.2`. The bumped number is written without padding, so a
//! colliding `Take007` continues as `Take8`.

use std::collections::HashSet;

/// Registry of route names in one session document
#[derive(Debug, Clone, Default)]
pub struct RouteNamer {
    used: HashSet<String>,
}

impl RouteNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a name found in the document
    pub fn reserve(&mut self, name: &str) {
        self.used.insert(name.to_string());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    /// Reserve and return `candidate`, or the first free bumped variant
    pub fn make_route_name(&mut self, candidate: &str) -> String {
        if self.used.insert(candidate.to_string()) {
            return candidate.to_string();
        }

        let (stem, mut n) = split_numeric_suffix(candidate);
        loop {
            n += 1;
            let name = format!("{}{}", stem, n);
            if self.used.insert(name.clone()) {
                return name;
            }
        }
    }
}

/// Split a name into the text before its trailing ASCII digits and their value
///
/// An empty digit run counts as 0. Runs too long for `u64` are treated as
/// part of the stem.
pub fn split_numeric_suffix(name: &str) -> (&str, u64) {
    let digits = name
        .bytes()
        .rev()
        .take_while(|b| b.is_ascii_digit())
        .count();
    let split = name.len() - digits;

    match name[split..].parse::<u64>() {
        Ok(n) => (&name[..split], n),
        Err(_) => (name, 0),
    }
}
