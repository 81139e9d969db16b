//! A small collection of well-known automata. They serve as examples in the documentation, as
//! fixtures in tests and as starting points for experiments.

use crate::automaton::{
    Automaton, AutomatonBuilder, HeadMove, Letter, PushdownOperation, TuringOperation,
};

/// DFA over `{0, 1}` accepting all words of length at least two. Its states are labelled `A`
/// to `D`, and `C` and `D` are equivalent, which makes it the standard example for minimization.
pub fn dfa_length_at_least_two() -> Automaton {
    AutomatonBuilder::finite()
        .with_edges([
            (0, "01", 1),
            (1, "01", 2),
            (2, "01", 3),
            (3, "01", 3),
        ])
        .with_final([2, 3])
        .with_labels([(0, "A"), (1, "B"), (2, "C"), (3, "D")])
        .into_automaton(0)
}

/// DFA over `{0, 1}` accepting all words that end with `01`.
pub fn dfa_ending_in_01() -> Automaton {
    AutomatonBuilder::finite()
        .with_edges([
            (0, '0', 1),
            (0, '1', 0),
            (1, '0', 1),
            (1, '1', 2),
            (2, '0', 1),
            (2, '1', 0),
        ])
        .with_final([2])
        .into_automaton(0)
}

/// DFA over `{0, 1}` accepting all words with an even number of zeros and an odd number of ones.
/// State `q0` tracks (even, even), `q1` (odd, even), `q2` (even, odd) and `q3` (odd, odd).
pub fn dfa_even_zeros_odd_ones() -> Automaton {
    AutomatonBuilder::finite()
        .with_edges([
            (0, '0', 1),
            (0, '1', 2),
            (1, '0', 0),
            (1, '1', 3),
            (2, '0', 3),
            (2, '1', 0),
            (3, '0', 2),
            (3, '1', 1),
        ])
        .with_final([2])
        .into_automaton(0)
}

/// NFA over `{a, b}` accepting all words whose third to last symbol is `a`. Its determinization
/// needs eight states.
pub fn nfa_third_last_is_a() -> Automaton {
    AutomatonBuilder::finite()
        .with_edges([
            (0, "ab", 0),
            (0, "a", 1),
            (1, "ab", 2),
            (2, "ab", 3),
        ])
        .with_final([3])
        .into_automaton(0)
}

/// ε-NFA over `{a, b}` accepting `a*b*`.
pub fn enfa_a_star_b_star() -> Automaton {
    AutomatonBuilder::finite()
        .with_edges([
            (0, Letter::Symbol('a'), 0),
            (0, Letter::Epsilon, 1),
            (1, Letter::Symbol('b'), 1),
        ])
        .with_final([1])
        .into_automaton(0)
}

/// PDA accepting `aⁿbⁿ` for `n ≥ 1` by final state. Every `a` pushes an `A`, every `b` pops one
/// and once only the bottom symbol `Z` is left the automaton moves to its final state.
pub fn pda_an_bn() -> Automaton {
    AutomatonBuilder::pushdown()
        .with_edges([
            (0, PushdownOperation::push('a', 'Z', 'A'), 0),
            (0, PushdownOperation::push('a', 'A', 'A'), 0),
            (0, PushdownOperation::pop('b', 'A'), 1),
            (1, PushdownOperation::pop('b', 'A'), 1),
            (1, PushdownOperation::noop(Letter::Epsilon, 'Z'), 2),
        ])
        .with_final([2])
        .into_automaton(0)
}

/// PDA accepting the palindromes of even length over `{a, b}` by empty stack, so it should be
/// explored with [`crate::simulation::PushdownAcceptance::EmptyStack`]. The first half is pushed,
/// the middle is guessed by an ε-transition and the second half is matched against the stack.
pub fn pda_even_palindromes() -> Automaton {
    let mut edges = vec![];
    for symbol in ['a', 'b'] {
        for top in ['Z', 'a', 'b'] {
            edges.push((0, PushdownOperation::push(symbol, top, symbol), 0));
        }
        edges.push((1, PushdownOperation::pop(symbol, symbol), 1));
    }
    for top in ['Z', 'a', 'b'] {
        edges.push((0, PushdownOperation::noop(Letter::Epsilon, top), 1));
    }
    AutomatonBuilder::pushdown().with_edges(edges).into_automaton(0)
}

/// Deterministic Turing machine which adds one to a number in unary notation: it moves to the
/// right end of the input, replaces the first blank by a `1` and halts in its final state.
pub fn dtm_unary_increment() -> Automaton {
    AutomatonBuilder::turing()
        .with_edges([
            (0, TuringOperation::new('1', '1', HeadMove::Right), 0),
            (0, TuringOperation::new('_', '1', HeadMove::Right), 1),
        ])
        .with_final([1])
        .into_automaton(0)
}

/// Deterministic Turing machine that bounces between two cells forever, although one of its
/// two states is final. It never halts, so it is only accepted when entering a final state
/// suffices.
pub fn dtm_infinite_loop_final_state() -> Automaton {
    AutomatonBuilder::turing()
        .with_edges([
            (0, TuringOperation::new('_', '_', HeadMove::Right), 1),
            (1, TuringOperation::new('_', '_', HeadMove::Left), 0),
        ])
        .with_final([1])
        .into_automaton(0)
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test_log::test]
    fn library_kinds() {
        assert_eq!(library::dfa_length_at_least_two().kind(), Kind::Dfa);
        assert_eq!(library::dfa_ending_in_01().kind(), Kind::Dfa);
        assert_eq!(library::dfa_even_zeros_odd_ones().kind(), Kind::Dfa);
        assert_eq!(library::nfa_third_last_is_a().kind(), Kind::Nfa);
        assert_eq!(library::enfa_a_star_b_star().kind(), Kind::EpsilonNfa);
        assert_eq!(library::pda_an_bn().kind(), Kind::Pda);
        assert_eq!(library::pda_even_palindromes().kind(), Kind::Pda);
        assert_eq!(library::dtm_unary_increment().kind(), Kind::Tm);
    }

    #[test_log::test]
    fn even_zeros_odd_ones() {
        let dfa = library::dfa_even_zeros_odd_ones();
        for word in words_up_to(&['0', '1'], 6) {
            let zeros = word.chars().filter(|c| *c == '0').count();
            let ones = word.len() - zeros;
            assert_eq!(dfa.accepts(&word), zeros % 2 == 0 && ones % 2 == 1, "{word}");
        }
    }

    #[test_log::test]
    fn third_last_is_a() {
        let nfa = library::nfa_third_last_is_a();
        for word in words_up_to(&['a', 'b'], 6) {
            let expected = word.len() >= 3 && word.as_bytes()[word.len() - 3] == b'a';
            assert_eq!(nfa.accepts(&word), expected, "{word}");
        }
    }
}
