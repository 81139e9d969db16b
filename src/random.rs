//! Generation of random automata and words, mainly used for testing and benchmarking. All
//! functions take the random number generator as an argument so that results can be reproduced
//! by seeding it.

use fastrand::Rng;
use tracing::trace;

use crate::automaton::{Automaton, AutomatonBuilder, Letter, StateId};

/// The first `symbols` lowercase letters, starting at `a`.
pub fn alphabet_of_size(symbols: usize) -> Vec<char> {
    ('a'..='z').take(symbols).collect()
}

/// Generates a random DFA with `size` states over an alphabet of `symbols` letters by drawing a
/// target for every state and symbol, so the result is total. State 0 is initial and each state
/// is final with probability one half. If no state was drawn to be final, a random one is made
/// final. Depending on the drawn transitions some states may be inaccessible.
pub fn generate_random_dfa(rng: &mut Rng, symbols: usize, size: usize) -> Automaton {
    let size = size.max(1) as StateId;
    let alphabet = alphabet_of_size(symbols);

    let mut edges = Vec::with_capacity(size as usize * alphabet.len());
    for q in 0..size {
        for &symbol in &alphabet {
            edges.push((q, symbol, rng.u32(..size)));
        }
    }
    let mut accepting: Vec<StateId> = (0..size).filter(|_| rng.bool()).collect();
    if accepting.is_empty() {
        accepting.push(rng.u32(..size));
    }
    trace!("drew random dfa with {size} states and final states {accepting:?}");

    AutomatonBuilder::finite()
        .with_states(size)
        .with_edges(edges)
        .with_final(accepting)
        .into_automaton(0)
}

/// Generates a random ε-NFA with `size` states over an alphabet of `symbols` letters. Every
/// possible transition `(p, a, q)` is inserted with the given `probability`, every ε-transition
/// between two distinct states with half of it. State 0 is initial and at least one state is final.
pub fn generate_random_nfa(
    rng: &mut Rng,
    symbols: usize,
    size: usize,
    probability: f64,
) -> Automaton {
    let size = size.max(1) as StateId;
    let alphabet = alphabet_of_size(symbols);

    let mut edges = vec![];
    for p in 0..size {
        for q in 0..size {
            for &symbol in &alphabet {
                if rng.f64() < probability {
                    edges.push((p, Letter::Symbol(symbol), q));
                }
            }
            if p != q && rng.f64() < probability / 2.0 {
                edges.push((p, Letter::Epsilon, q));
            }
        }
    }
    let mut accepting: Vec<StateId> = (0..size).filter(|_| rng.bool()).collect();
    if accepting.is_empty() {
        accepting.push(rng.u32(..size));
    }
    trace!("drew random nfa with {} transitions", edges.len());

    AutomatonBuilder::finite()
        .with_states(size)
        .with_edges(edges)
        .with_final(accepting)
        .into_automaton(0)
}

/// Generates a random word over `alphabet` whose length is drawn uniformly from
/// `min_len..=max_len`.
pub fn generate_random_word(
    rng: &mut Rng,
    alphabet: &[char],
    min_len: usize,
    max_len: usize,
) -> String {
    if alphabet.is_empty() {
        return String::new();
    }
    let length = rng.usize(min_len..=max_len.max(min_len));
    (0..length)
        .map(|_| alphabet[rng.usize(..alphabet.len())])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{generate_random_dfa, generate_random_nfa, generate_random_word};
    use crate::prelude::*;
    use fastrand::Rng;

    #[test_log::test]
    fn random_dfas_are_total() {
        let mut rng = Rng::with_seed(42);
        for size in 1..8 {
            let dfa = generate_random_dfa(&mut rng, 3, size);
            assert_eq!(dfa.size(), size);
            assert_eq!(dfa.kind(), Kind::Dfa);
            assert_eq!(dfa.initial(), Some(0));
            assert!(dfa.final_states().next().is_some());
            for q in dfa.state_ids() {
                for symbol in ['a', 'b', 'c'] {
                    assert!(dfa.delta().successor(q, Letter::Symbol(symbol)).is_some());
                }
            }
        }
    }

    #[test_log::test]
    fn random_nfas_agree_with_their_determinization() {
        let mut rng = Rng::with_seed(3);
        for _ in 0..10 {
            let nfa = generate_random_nfa(&mut rng, 2, 4, 0.3);
            if nfa.alphabet().is_empty() {
                continue;
            }
            let dfa = determinize(&nfa).unwrap();
            for _ in 0..50 {
                let word = generate_random_word(&mut rng, &['a', 'b'], 0, 8);
                assert_eq!(nfa.accepts(&word), dfa.accepts(&word), "{word}");
            }
        }
    }
}
