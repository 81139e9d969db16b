/// The stable integer identity of a state. Transitions refer to states exclusively through
/// their id, which keeps the (possibly cyclic) graph free of ownership cycles.
pub type StateId = u32;

/// A single state of an automaton.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct State {
    id: StateId,
    name: String,
    label: Option<String>,
    initial: bool,
    accepting: bool,
}

impl State {
    pub(crate) fn new(id: StateId) -> Self {
        Self {
            id,
            name: Self::auto_name(id),
            label: None,
            initial: false,
            accepting: false,
        }
    }

    fn auto_name(id: StateId) -> String {
        format!("q{id}")
    }

    /// Returns the id of the state.
    pub fn id(&self) -> StateId {
        self.id
    }

    /// The automatically generated name, which is `q` followed by the id.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The custom label, if one was assigned.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the custom label if present and the generated name otherwise.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// Whether this is the initial state.
    pub fn is_initial(&self) -> bool {
        self.initial
    }

    /// Whether this is a final (accepting) state.
    pub fn is_final(&self) -> bool {
        self.accepting
    }

    /// Sets or clears the custom label.
    pub fn set_label<S: Into<String>>(&mut self, label: Option<S>) {
        self.label = label.map(Into::into);
    }

    /// Marks the state as final or non-final.
    pub fn set_final(&mut self, accepting: bool) {
        self.accepting = accepting;
    }

    /// Only the automaton may change this flag since at most one state can be initial.
    pub(crate) fn set_initial_flag(&mut self, initial: bool) {
        self.initial = initial;
    }

    /// Changes the identity and regenerates the name.
    pub(crate) fn reassign(&mut self, id: StateId) {
        self.id = id;
        self.name = Self::auto_name(id);
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_label())
    }
}
