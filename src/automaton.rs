use std::{cell::OnceCell, collections::BTreeSet};

use itertools::Itertools;
use tracing::trace;

use crate::{
    math::{Bijection, Map},
    show::Show,
    simulation::{self, SimulationConfig},
    validation::StructuralError,
};

mod state;
pub use state::{State, StateId};

mod transition;
pub use transition::{
    HeadMove, Letter, PushdownOperation, StackAction, Transition, TransitionKind, TuringOperation,
};

mod delta;
pub use delta::{Delta, FiniteDelta, Graph, PushdownDelta, TuringDelta};

mod builder;
pub use builder::AutomatonBuilder;

/// The model of an automaton determines which payload its transitions carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Model {
    /// Finite automata whose transitions read sets of letters.
    Finite,
    /// Pushdown automata.
    Pushdown,
    /// Turing machines.
    Turing,
}

/// The kind of an automaton as it is derived from its transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// A finite automaton with at most one successor per state and symbol and no ε-transitions.
    Dfa,
    /// A finite automaton without ε-transitions that is not deterministic.
    Nfa,
    /// A finite automaton with at least one ε-transition.
    EpsilonNfa,
    /// A pushdown automaton.
    Pda,
    /// A Turing machine.
    Tm,
}

/// An automaton is an ordered sequence of states together with a list of transitions between
/// them. The order of the states is significant, algorithms number their output in that order.
///
/// Fresh ids are drawn from a counter that belongs to the automaton, so they never collide with
/// ids of states that exist (or existed) in it.
#[derive(Clone)]
pub struct Automaton {
    model: Model,
    states: Vec<State>,
    transitions: Vec<Transition>,
    next_id: StateId,
    delta: OnceCell<FiniteDelta>,
}

impl Automaton {
    /// Creates an empty automaton of the given model.
    pub fn new(model: Model) -> Self {
        Self {
            model,
            states: vec![],
            transitions: vec![],
            next_id: 0,
            delta: OnceCell::new(),
        }
    }

    /// Returns a builder for finite automata.
    pub fn builder() -> AutomatonBuilder {
        AutomatonBuilder::finite()
    }

    /// The model of the automaton.
    pub fn model(&self) -> Model {
        self.model
    }

    /// Derives the kind of the automaton from its transitions.
    pub fn kind(&self) -> Kind {
        match self.model {
            Model::Pushdown => Kind::Pda,
            Model::Turing => Kind::Tm,
            Model::Finite => {
                let delta = self.delta();
                let has_epsilon = self.states.iter().any(|q| {
                    delta
                        .get(q.id(), &Letter::Epsilon)
                        .is_some_and(|targets| !targets.is_empty())
                });
                if has_epsilon {
                    Kind::EpsilonNfa
                } else if delta.has_conflicts() {
                    Kind::Nfa
                } else {
                    Kind::Dfa
                }
            }
        }
    }

    /// Number of states.
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// The states in their significant order.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Iterates over the ids of all states in order.
    pub fn state_ids(&self) -> impl Iterator<Item = StateId> + Clone + '_ {
        self.states.iter().map(State::id)
    }

    /// All transitions.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Returns the state with the given id.
    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.iter().find(|q| q.id() == id)
    }

    /// Returns the state with the given id for modification. Note that the initial flag can
    /// only be changed through [`Automaton::set_initial`].
    pub fn state_mut(&mut self, id: StateId) -> Option<&mut State> {
        self.states.iter_mut().find(|q| q.id() == id)
    }

    /// Returns true if a state with the given id exists.
    pub fn contains(&self, id: StateId) -> bool {
        self.state(id).is_some()
    }

    /// Position of the state with the given id in the state list.
    pub fn position(&self, id: StateId) -> Option<usize> {
        self.states.iter().position(|q| q.id() == id)
    }

    /// The id of the initial state, if there is one.
    pub fn initial(&self) -> Option<StateId> {
        self.states.iter().find(|q| q.is_initial()).map(State::id)
    }

    /// Iterates over the ids of the final states, in state order.
    pub fn final_states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.states
            .iter()
            .filter(|q| q.is_final())
            .map(State::id)
    }

    /// Returns true if the state with the given id exists and is final.
    pub fn is_final(&self, id: StateId) -> bool {
        self.state(id).is_some_and(State::is_final)
    }

    /// Adds a fresh state and returns its id.
    pub fn add_state(&mut self) -> StateId {
        let id = self.next_id;
        self.next_id += 1;
        self.states.push(State::new(id));
        id
    }

    /// Makes `id` the only initial state.
    pub fn set_initial(&mut self, id: StateId) -> Result<(), StructuralError> {
        if !self.contains(id) {
            return Err(StructuralError::UnknownState(id));
        }
        for q in self.states.iter_mut() {
            q.set_initial_flag(q.id() == id);
        }
        Ok(())
    }

    /// Removes the initial designation from whatever state carries it.
    pub fn clear_initial(&mut self) {
        for q in self.states.iter_mut() {
            q.set_initial_flag(false);
        }
    }

    /// Marks the state with the given id as final or non-final.
    pub fn set_final(&mut self, id: StateId, accepting: bool) -> Result<(), StructuralError> {
        self.state_mut(id)
            .ok_or(StructuralError::UnknownState(id))?
            .set_final(accepting);
        Ok(())
    }

    /// Adds a transition, checking that both endpoints exist and that the payload fits the model.
    pub fn add_transition<K: Into<TransitionKind>>(
        &mut self,
        origin: StateId,
        kind: K,
        target: StateId,
    ) -> Result<(), StructuralError> {
        let kind = kind.into();
        if kind.model() != self.model {
            return Err(StructuralError::ModelMismatch {
                expected: self.model,
                found: kind.model(),
            });
        }
        for endpoint in [origin, target] {
            if !self.contains(endpoint) {
                return Err(StructuralError::UnknownState(endpoint));
            }
        }
        self.transitions.push(Transition::new(origin, kind, target));
        self.invalidate();
        Ok(())
    }

    /// Shorthand for adding a finite ε-transition.
    pub fn add_epsilon(&mut self, origin: StateId, target: StateId) -> Result<(), StructuralError> {
        self.add_transition(origin, TransitionKind::epsilon(), target)
    }

    /// Keeps only the states for which `keep` returns true together with the transitions
    /// between them. The order of the remaining states is unchanged.
    pub fn retain_states<F: Fn(&State) -> bool>(&mut self, keep: F) {
        self.states.retain(|q| keep(q));
        let remaining: BTreeSet<StateId> = self.state_ids().collect();
        self.transitions
            .retain(|t| remaining.contains(&t.origin()) && remaining.contains(&t.target()));
        self.invalidate();
    }

    /// Drops the cached delta index, it is rebuilt on the next access.
    fn invalidate(&mut self) {
        self.delta = OnceCell::new();
    }

    /// The delta index of a finite automaton. It is built once and cached until the transitions
    /// change.
    pub fn delta(&self) -> &FiniteDelta {
        self.delta.get_or_init(|| FiniteDelta::build(self))
    }

    /// Builds the delta index of a pushdown automaton.
    pub fn pushdown_delta(&self) -> PushdownDelta {
        PushdownDelta::build(self)
    }

    /// Builds the delta index of a Turing machine.
    pub fn turing_delta(&self) -> TuringDelta {
        TuringDelta::build(self)
    }

    /// The alphabet of the automaton. For finite automata these are all symbols that appear on
    /// some transition (ε is not part of the alphabet), for pushdown automata the input alphabet
    /// and for Turing machines the tape alphabet.
    pub fn alphabet(&self) -> BTreeSet<char> {
        match self.model {
            Model::Finite | Model::Pushdown => self.input_alphabet(),
            Model::Turing => self.tape_alphabet(),
        }
    }

    fn input_alphabet(&self) -> BTreeSet<char> {
        self.transitions
            .iter()
            .flat_map(|t| match t.kind() {
                TransitionKind::Finite(letters) => {
                    letters.iter().filter_map(Letter::symbol).collect_vec()
                }
                TransitionKind::Pushdown(op) => op.input.symbol().into_iter().collect_vec(),
                TransitionKind::Turing(_) => vec![],
            })
            .collect()
    }

    /// The symbols a pushdown automaton reads from or writes to its stack.
    pub fn stack_alphabet(&self) -> BTreeSet<char> {
        self.transitions
            .iter()
            .filter_map(|t| match t.kind() {
                TransitionKind::Pushdown(op) => Some(op),
                _ => None,
            })
            .flat_map(|op| match op.action {
                StackAction::Push(s) => vec![op.top, s],
                StackAction::Pop | StackAction::NoOp => vec![op.top],
            })
            .collect()
    }

    /// The symbols a Turing machine reads from or writes to its tape.
    pub fn tape_alphabet(&self) -> BTreeSet<char> {
        self.transitions
            .iter()
            .filter_map(|t| match t.kind() {
                TransitionKind::Turing(op) => Some([op.read, op.write]),
                _ => None,
            })
            .flatten()
            .collect()
    }

    /// Decides whether `word` is accepted. Finite automata are simulated on sets of states, pushdown
    /// automata and Turing machines are explored with the default [`SimulationConfig`] and their
    /// default acceptance policy. An automaton without initial state accepts nothing.
    pub fn accepts<W: AsRef<str>>(&self, word: W) -> bool {
        let word = word.as_ref();
        let Some(initial) = self.initial() else {
            return false;
        };
        match self.model {
            Model::Finite => self.accepts_from(initial, word),
            Model::Pushdown => {
                simulation::pushdown::explore(self, word, &SimulationConfig::default())
                    .is_ok_and(|tree| tree.accepts())
            }
            Model::Turing => simulation::turing::explore(self, word, &SimulationConfig::default())
                .is_ok_and(|tree| tree.accepts()),
        }
    }

    /// Runs a finite automaton on `word` using `start` as a custom start state.
    pub fn accepts_from<W: AsRef<str>>(&self, start: StateId, word: W) -> bool {
        let delta = self.delta();
        let mut current = delta.epsilon_closure([start]);
        for symbol in word.as_ref().chars() {
            if current.is_empty() {
                return false;
            }
            current = delta.epsilon_closure(delta.step(&current, symbol));
        }
        current.iter().any(|q| self.is_final(*q))
    }

    /// Merges all states and transitions of `other` into `self`. The states of `other` receive
    /// fresh ids from the counter of `self` and keep their flags and labels. Returns the mapping
    /// from the ids in `other` to the new ids.
    pub fn absorb(&mut self, other: Automaton) -> Result<Map<StateId, StateId>, StructuralError> {
        if other.model != self.model {
            return Err(StructuralError::ModelMismatch {
                expected: self.model,
                found: other.model,
            });
        }
        let mut mapping = Map::default();
        for mut q in other.states {
            let id = self.next_id;
            self.next_id += 1;
            mapping.insert(q.id(), id);
            q.reassign(id);
            self.states.push(q);
        }
        for mut t in other.transitions {
            let origin = mapping[&t.origin()];
            let target = mapping[&t.target()];
            t.remap(origin, target);
            self.transitions.push(t);
        }
        self.invalidate();
        Ok(mapping)
    }

    /// Assigns new ids to all states: the initial state becomes `0` and is moved to the front, all
    /// other states are numbered consecutively in list order. Generated names follow the new ids,
    /// custom labels are kept. Returns the bijection between old and new ids.
    pub fn renumber(&mut self) -> Bijection<StateId, StateId> {
        if let Some(pos) = self.states.iter().position(State::is_initial) {
            let initial = self.states.remove(pos);
            self.states.insert(0, initial);
        }

        let mut mapping = Bijection::new();
        for (new, q) in self.states.iter_mut().enumerate() {
            let new = new as StateId;
            mapping.insert(q.id(), new);
            q.reassign(new);
        }
        for t in self.transitions.iter_mut() {
            let origin = *mapping
                .get_by_left(&t.origin())
                .expect("transition must start in a known state");
            let target = *mapping
                .get_by_left(&t.target())
                .expect("transition must end in a known state");
            t.remap(origin, target);
        }
        self.next_id = self.states.len() as StateId;
        self.invalidate();
        trace!("renumbered automaton\n{}", self.build_transition_table());
        mapping
    }

    /// Adds a non-final sink state for all missing combinations of state and symbol from `alphabet`
    /// and returns its id. The sink loops on every symbol. If nothing is missing, the automaton is
    /// left untouched and `None` is returned.
    ///
    /// Unlike the algorithms in this crate, this method modifies `self`.
    pub fn totalize(&mut self, alphabet: &BTreeSet<char>) -> Option<StateId> {
        let missing: Vec<(StateId, char)> = {
            let delta = self.delta();
            self.states
                .iter()
                .cartesian_product(alphabet.iter())
                .filter(|(q, a)| delta.get(q.id(), &Letter::Symbol(**a)).is_none())
                .map(|(q, a)| (q.id(), *a))
                .collect()
        };
        if missing.is_empty() {
            return None;
        }

        let sink = self.add_state();
        if let Some(q) = self.state_mut(sink) {
            q.set_label(Some("∅"));
        }
        let all: BTreeSet<Letter> = alphabet.iter().copied().map(Letter::Symbol).collect();
        self.transitions
            .push(Transition::new(sink, TransitionKind::Finite(all), sink));
        for (origin, group) in &missing.into_iter().group_by(|(q, _)| *q) {
            let letters = group.map(|(_, a)| Letter::Symbol(a)).collect();
            self.transitions
                .push(Transition::new(origin, TransitionKind::Finite(letters), sink));
        }
        self.invalidate();
        trace!("added sink state {sink}");
        Some(sink)
    }

    /// Builds a table with one row per state and one column per symbol of the alphabet (plus ε
    /// if used). The initial state is marked with `→`, final states with `*`.
    pub fn build_transition_table(&self) -> String {
        let mut builder = tabled::builder::Builder::default();
        match self.model {
            Model::Finite => {
                let mut letters: Vec<Letter> = Vec::new();
                if self.kind() == Kind::EpsilonNfa {
                    letters.push(Letter::Epsilon);
                }
                letters.extend(self.alphabet().into_iter().map(Letter::Symbol));
                builder.push_record(
                    std::iter::once("State".to_string()).chain(letters.iter().map(Show::show)),
                );
                let delta = self.delta();
                for q in &self.states {
                    let mut row = vec![self.decorate(q)];
                    for letter in &letters {
                        row.push(match delta.get(q.id(), letter) {
                            Some(targets) => targets.show(),
                            None => "-".to_string(),
                        });
                    }
                    builder.push_record(row);
                }
            }
            Model::Pushdown | Model::Turing => {
                builder.push_record(["State", "Transitions"].map(String::from));
                for q in &self.states {
                    let outgoing = self
                        .transitions
                        .iter()
                        .filter(|t| t.origin() == q.id())
                        .map(|t| format!("{} → {}", t.kind().show(), t.target()))
                        .join("\n");
                    builder.push_record([self.decorate(q), outgoing]);
                }
            }
        }

        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }

    fn decorate(&self, q: &State) -> String {
        use owo_colors::OwoColorize;

        let marker = match (q.is_initial(), q.is_final()) {
            (true, true) => "→*",
            (true, false) => "→",
            (false, true) => "*",
            (false, false) => "",
        };
        let text = format!("{marker}{} [{}]", q.id(), q.display_label());
        if q.is_final() {
            text.bold().to_string()
        } else {
            text
        }
    }
}

impl std::fmt::Debug for Automaton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} automaton\n{}", self.kind(), self.build_transition_table())
    }
}

impl std::fmt::Display for Automaton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.build_transition_table())
    }
}

/// Two automata are equal if they consist of the same states in the same order and of the
/// same transitions in the same order. The cached delta index is not compared.
impl PartialEq for Automaton {
    fn eq(&self, other: &Self) -> bool {
        self.model == other.model
            && self.states == other.states
            && self.transitions == other.transitions
    }
}
impl Eq for Automaton {}
