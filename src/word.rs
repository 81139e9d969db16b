//! Enumeration of finite words, which is used to compare languages on all short words.

use itertools::Itertools;

/// Iterates over all words over `alphabet` of length at most `max_len` in length-lexicographic
/// order, i.e. shorter words come first and words of the same length are ordered by the position
/// of their symbols in `alphabet`. The empty word is always the first item.
///
/// # Example
/// ```
/// use automata_kernel::prelude::*;
///
/// let words: Vec<String> = words_up_to(&['a', 'b'], 2).collect();
/// assert_eq!(words, ["", "a", "b", "aa", "ab", "ba", "bb"]);
/// ```
pub fn words_up_to(alphabet: &[char], max_len: usize) -> impl Iterator<Item = String> + '_ {
    std::iter::once(String::new()).chain((1..=max_len).flat_map(move |len| {
        (0..len)
            .map(|_| alphabet.iter())
            .multi_cartesian_product()
            .map(|word| word.into_iter().collect::<String>())
    }))
}

#[cfg(test)]
mod tests {
    use super::words_up_to;

    #[test_log::test]
    fn counts_and_order() {
        assert_eq!(words_up_to(&['0', '1'], 4).count(), 1 + 2 + 4 + 8 + 16);
        assert_eq!(words_up_to(&['x'], 0).collect::<Vec<_>>(), [""]);
        assert_eq!(words_up_to(&[], 3).collect::<Vec<_>>(), [""]);

        let words: Vec<String> = words_up_to(&['b', 'a'], 2).collect();
        assert_eq!(words, ["", "b", "a", "bb", "ba", "ab", "aa"]);
    }
}
