//! Algorithms that construct, validate, transform, minimize and simulate automata.
//!
//! An [`Automaton`] is an ordered arena of [`automaton::State`]s together with a list of
//! [`automaton::Transition`]s that refer to states by their stable integer id. What a transition
//! carries depends on the [`automaton::Model`] of the automaton: finite automata label their
//! transitions with sets of letters (possibly containing ε), pushdown automata with a
//! [`automaton::PushdownOperation`] and Turing machines with a [`automaton::TuringOperation`].
//!
//! Every algorithm in this crate is non-destructive. It validates its input with the guards from
//! [`validation`], works on its own clone and hands back a fresh automaton. The state reducer and
//! the minimizer may detect that nothing changes, in that case they return
//! [`reduction::Outcome::Unchanged`] which borrows the input instead of copying it.
//!
//! The most important entry points are
//! - [`reduction::reduce`] which removes inaccessible and useless states,
//! - [`determinization::determinize`] which applies the subset construction,
//! - `minimization::minimize` which computes the minimal DFA by table filling (feature `minimize`),
//! - the regular operations in [`operations`],
//! - the configuration trees in [`simulation`] that explore pushdown automata and Turing machines.
//!
//! Ready-made automata for experiments and tests live in [`library`].
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use automata_kernel::prelude::*;` should be enough to use the package.
pub mod prelude {
    #[cfg(feature = "minimize")]
    pub use super::minimization::{distinguishing_word, minimize};
    pub use super::{
        automaton::{
            Automaton, AutomatonBuilder, FiniteDelta, Graph, HeadMove, Kind, Letter, Model,
            PushdownDelta, PushdownOperation, StackAction, State, StateId, Transition,
            TransitionKind, TuringDelta, TuringOperation,
        },
        determinization::determinize,
        library,
        math::{Bijection, Map, Partition, Set},
        operations::{
            complement, complement_over, concatenation, intersection, kleene_star, totalize, union,
        },
        reduction::{reduce, Outcome},
        show::Show,
        simulation::{
            ConfigurationTree, NodeStatus, PushdownAcceptance, PushdownConfiguration,
            SimulationConfig, Tape, TuringAcceptance, TuringConfiguration,
        },
        validation::{Side, StructuralError},
        word::words_up_to,
    };
}

/// Type aliases and small mathematical structures that are used throughout the crate.
pub mod math;

/// Human readable rendering of letters, labels and sets of states.
pub mod show;

/// The automaton data model: states, transitions, the delta index and a builder.
pub mod automaton;
pub use automaton::Automaton;

/// Preflight checks that guard every algorithm.
pub mod validation;
pub use validation::StructuralError;

/// Removal of inaccessible and useless states.
pub mod reduction;

/// Subset construction turning (ε-)NFAs into DFAs.
pub mod determinization;

/// Contains the Myhill-Nerode table filling minimization. This is feature gated behind the `minimize` feature.
#[cfg(feature = "minimize")]
pub mod minimization;

/// Regular operations on finite automata.
pub mod operations;

/// Nondeterministic simulation of pushdown automata and Turing machines.
pub mod simulation;

/// A collection of ready-made automata.
pub mod library;

/// Implements the generation of random finite automata.
#[cfg(feature = "random")]
pub mod random;

/// Enumeration of finite words.
pub mod word;
