//! Environment variable validation
//!
//! Invalid `KILN_*` values never abort a run: the validator warns, suggests
//! the closest valid spelling and falls back to the current setting.

use std::io::Write;

/// Validator for one environment variable
pub struct EnvVarValidator<'a> {
    var_name: &'a str,
    valid_values: &'a [&'a str],
}

impl<'a> EnvVarValidator<'a> {
    pub fn new(var_name: &'a str, valid_values: &'a [&'a str]) -> Self {
        Self {
            var_name,
            valid_values,
        }
    }

    /// Parse `value`, warning on stderr and returning `fallback` if it is invalid
    pub fn parse<T>(&self, value: &str, parser: impl Fn(&str) -> Option<T>, fallback: T) -> T {
        self.parse_with_writer(value, parser, fallback, &mut std::io::stderr())
    }

    /// Parse with a custom writer (for testing)
    pub fn parse_with_writer<T, W: Write>(
        &self,
        value: &str,
        parser: impl Fn(&str) -> Option<T>,
        fallback: T,
        writer: &mut W,
    ) -> T {
        if let Some(parsed) = parser(value) {
            return parsed;
        }

        let hint = self
            .suggest(value)
            .map(|valid| format!(". Did you mean '{}'?", valid))
            .unwrap_or_default();
        let _ = writeln!(
            writer,
            "Warning: Invalid {} value '{}'{}",
            self.var_name, value, hint
        );
        let _ = writeln!(writer, "Valid values: {}", self.valid_values.join(", "));
        fallback
    }

    /// Closest valid value within two edits
    fn suggest(&self, value: &str) -> Option<&'a str> {
        let input = value.trim().to_lowercase();
        self.valid_values
            .iter()
            .map(|&valid| (valid, levenshtein(&input, valid)))
            .filter(|&(_, dist)| dist > 0 && dist <= 2)
            .min_by_key(|&(_, dist)| dist)
            .map(|(valid, _)| valid)
    }
}

/// Edit distance between two strings, by character
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ac) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, bc) in b.iter().enumerate() {
            let cost = usize::from(ac != bc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
