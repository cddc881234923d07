use crate::core::{Alias, AliasPrecedence};

/// Find the canonical name whose key occurs (case-insensitively) in `value`.
///
/// With [`AliasPrecedence::LongestKey`] the most specific key wins and equal
/// lengths fall back to table order; with [`AliasPrecedence::TableOrder`] the
/// first matching entry wins.
pub fn resolve_alias<'a>(
    value: &str,
    aliases: &'a [Alias],
    precedence: AliasPrecedence,
) -> Option<&'a str> {
    let haystack = value.to_lowercase();
    let mut matches = aliases
        .iter()
        .filter(|a| !a.key.is_empty() && haystack.contains(a.key.as_str()));

    let winner = match precedence {
        AliasPrecedence::TableOrder => matches.next(),
        // max_by_key returns the last maximum; iterate in reverse to keep table order on ties.
        AliasPrecedence::LongestKey => matches
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .max_by_key(|a| a.key.chars().count()),
    };
    winner.map(|a| a.canonical.as_str())
}
