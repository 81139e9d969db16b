//! Simulation of pushdown automata and Turing machines. Both are nondeterministic in general, so
//! instead of a single run the simulators build a [`ConfigurationTree`] which holds every branch
//! of the computation. The size of the tree is bounded by a [`SimulationConfig`].

mod tree;
pub use tree::{ConfigurationTree, Node, NodeStatus};

pub mod pushdown;
pub use pushdown::PushdownConfiguration;

pub mod turing;
pub use turing::{Tape, TuringConfiguration};

/// Default bound on the number of steps of a single branch.
pub const DEFAULT_STEP_LIMIT: usize = 1000;
/// Default bound on the number of configurations in a tree.
pub const DEFAULT_NODE_LIMIT: usize = 10_000;
/// Default symbol at the bottom of the stack of a pushdown automaton.
pub const DEFAULT_BOTTOM: char = 'Z';
/// Default blank symbol of a Turing machine tape.
pub const DEFAULT_BLANK: char = '_';

/// When a pushdown automaton accepts its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PushdownAcceptance {
    /// The input is consumed and the current state is final.
    #[default]
    FinalState,
    /// The input is consumed and the stack is empty or holds only the bottom symbol.
    EmptyStack,
}

/// When a Turing machine accepts its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TuringAcceptance {
    /// The machine enters a final state, the computation stops right there.
    FinalState,
    /// No transition applies any more and the current state is final.
    #[default]
    Halt,
}

/// Bounds and conventions used when exploring configuration trees.
///
/// # Example
/// ```
/// use automata_kernel::prelude::*;
///
/// let config = SimulationConfig::default()
///     .with_step_limit(50)
///     .with_pushdown_acceptance(PushdownAcceptance::EmptyStack);
/// assert_eq!(config.step_limit(), 50);
/// assert_eq!(config.bottom(), 'Z');
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SimulationConfig {
    step_limit: usize,
    node_limit: usize,
    bottom: char,
    blank: char,
    pushdown_acceptance: PushdownAcceptance,
    turing_acceptance: TuringAcceptance,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            step_limit: DEFAULT_STEP_LIMIT,
            node_limit: DEFAULT_NODE_LIMIT,
            bottom: DEFAULT_BOTTOM,
            blank: DEFAULT_BLANK,
            pushdown_acceptance: PushdownAcceptance::default(),
            turing_acceptance: TuringAcceptance::default(),
        }
    }
}

impl SimulationConfig {
    /// Sets the maximal number of steps along a single branch.
    pub fn with_step_limit(mut self, step_limit: usize) -> Self {
        self.step_limit = step_limit;
        self
    }

    /// Sets the maximal number of configurations in a tree, which is at least one.
    pub fn with_node_limit(mut self, node_limit: usize) -> Self {
        self.node_limit = node_limit.max(1);
        self
    }

    /// Sets the initial stack symbol of pushdown automata.
    pub fn with_bottom(mut self, bottom: char) -> Self {
        self.bottom = bottom;
        self
    }

    /// Sets the blank symbol of Turing machines.
    pub fn with_blank(mut self, blank: char) -> Self {
        self.blank = blank;
        self
    }

    /// Sets the acceptance policy of pushdown automata.
    pub fn with_pushdown_acceptance(mut self, acceptance: PushdownAcceptance) -> Self {
        self.pushdown_acceptance = acceptance;
        self
    }

    /// Sets the acceptance policy of Turing machines.
    pub fn with_turing_acceptance(mut self, acceptance: TuringAcceptance) -> Self {
        self.turing_acceptance = acceptance;
        self
    }

    /// The maximal number of steps along a single branch.
    pub fn step_limit(&self) -> usize {
        self.step_limit
    }

    /// The maximal number of configurations in a tree.
    pub fn node_limit(&self) -> usize {
        self.node_limit
    }

    /// The initial stack symbol.
    pub fn bottom(&self) -> char {
        self.bottom
    }

    /// The blank symbol.
    pub fn blank(&self) -> char {
        self.blank
    }

    /// The acceptance policy of pushdown automata.
    pub fn pushdown_acceptance(&self) -> PushdownAcceptance {
        self.pushdown_acceptance
    }

    /// The acceptance policy of Turing machines.
    pub fn turing_acceptance(&self) -> TuringAcceptance {
        self.turing_acceptance
    }
}
