use std::collections::BTreeSet;

use itertools::Itertools;

use crate::show::Show;

use super::{Model, StateId};

/// A letter read by a transition, which is either a proper input symbol or the empty word ε.
/// The empty word is ordered before every symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Letter {
    /// The empty word, a transition reading it does not consume input.
    Epsilon,
    /// An actual input symbol.
    Symbol(char),
}

impl Letter {
    /// Returns true if `self` is ε.
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Letter::Epsilon)
    }

    /// Returns the symbol, or `None` for ε.
    pub fn symbol(&self) -> Option<char> {
        match self {
            Letter::Epsilon => None,
            Letter::Symbol(c) => Some(*c),
        }
    }
}

impl From<char> for Letter {
    fn from(value: char) -> Self {
        Letter::Symbol(value)
    }
}

impl Show for Letter {
    fn show(&self) -> String {
        match self {
            Letter::Epsilon => "ε".to_string(),
            Letter::Symbol(c) => c.to_string(),
        }
    }
}

/// What a pushdown transition does to the stack after it has read the top symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StackAction {
    /// Keeps the top symbol and places the given symbol above it.
    Push(char),
    /// Removes the top symbol.
    Pop,
    /// Leaves the stack as it is.
    NoOp,
}

/// The payload of a pushdown transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PushdownOperation {
    /// The input letter that is consumed, ε does not consume anything.
    pub input: Letter,
    /// The symbol that must be on top of the stack.
    pub top: char,
    /// The modification of the stack.
    pub action: StackAction,
}

impl PushdownOperation {
    /// Creates a new operation.
    pub fn new<L: Into<Letter>>(input: L, top: char, action: StackAction) -> Self {
        Self {
            input: input.into(),
            top,
            action,
        }
    }

    /// Reads `input` with `top` on the stack and pushes `symbol`.
    pub fn push<L: Into<Letter>>(input: L, top: char, symbol: char) -> Self {
        Self::new(input, top, StackAction::Push(symbol))
    }

    /// Reads `input` with `top` on the stack and pops it.
    pub fn pop<L: Into<Letter>>(input: L, top: char) -> Self {
        Self::new(input, top, StackAction::Pop)
    }

    /// Reads `input` with `top` on the stack and leaves the stack untouched.
    pub fn noop<L: Into<Letter>>(input: L, top: char) -> Self {
        Self::new(input, top, StackAction::NoOp)
    }
}

impl Show for PushdownOperation {
    fn show(&self) -> String {
        let action = match self.action {
            StackAction::Push(s) => format!("push {s}"),
            StackAction::Pop => "pop".to_string(),
            StackAction::NoOp => "nop".to_string(),
        };
        format!("{}, {}; {}", self.input.show(), self.top, action)
    }
}

/// The direction in which the head of a Turing machine moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HeadMove {
    /// One cell to the left.
    Left,
    /// One cell to the right.
    Right,
}

/// The payload of a Turing machine transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TuringOperation {
    /// The symbol that must be under the head.
    pub read: char,
    /// The symbol written into the cell under the head.
    pub write: char,
    /// Where the head moves after writing.
    pub movement: HeadMove,
}

impl TuringOperation {
    /// Creates a new operation.
    pub fn new(read: char, write: char, movement: HeadMove) -> Self {
        Self {
            read,
            write,
            movement,
        }
    }
}

impl Show for TuringOperation {
    fn show(&self) -> String {
        let movement = match self.movement {
            HeadMove::Left => 'L',
            HeadMove::Right => 'R',
        };
        format!("{}/{}, {}", self.read, self.write, movement)
    }
}

/// The payload of a transition, which depends on the kind of automaton it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// A finite automaton transition on a set of letters.
    Finite(BTreeSet<Letter>),
    /// A pushdown transition.
    Pushdown(PushdownOperation),
    /// A Turing machine transition.
    Turing(TuringOperation),
}

impl TransitionKind {
    /// A finite transition on the single letter ε.
    pub fn epsilon() -> Self {
        TransitionKind::Finite(BTreeSet::from([Letter::Epsilon]))
    }

    /// The model of automaton to which transitions of this kind belong.
    pub fn model(&self) -> Model {
        match self {
            TransitionKind::Finite(_) => Model::Finite,
            TransitionKind::Pushdown(_) => Model::Pushdown,
            TransitionKind::Turing(_) => Model::Turing,
        }
    }

    /// Returns the letters of a finite transition.
    pub fn letters(&self) -> Option<&BTreeSet<Letter>> {
        match self {
            TransitionKind::Finite(letters) => Some(letters),
            _ => None,
        }
    }
}

impl From<char> for TransitionKind {
    fn from(value: char) -> Self {
        TransitionKind::Finite(BTreeSet::from([Letter::Symbol(value)]))
    }
}

impl From<Letter> for TransitionKind {
    fn from(value: Letter) -> Self {
        TransitionKind::Finite(BTreeSet::from([value]))
    }
}

/// Every character of the string becomes a symbol of one finite transition, the empty
/// string stands for ε.
impl From<&str> for TransitionKind {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            return TransitionKind::epsilon();
        }
        TransitionKind::Finite(value.chars().map(Letter::Symbol).collect())
    }
}

impl From<PushdownOperation> for TransitionKind {
    fn from(value: PushdownOperation) -> Self {
        TransitionKind::Pushdown(value)
    }
}

impl From<TuringOperation> for TransitionKind {
    fn from(value: TuringOperation) -> Self {
        TransitionKind::Turing(value)
    }
}

impl Show for TransitionKind {
    fn show(&self) -> String {
        match self {
            TransitionKind::Finite(letters) => letters.iter().map(Show::show).join(","),
            TransitionKind::Pushdown(op) => op.show(),
            TransitionKind::Turing(op) => op.show(),
        }
    }
}

/// A transition leads from an origin to a target state and carries a payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transition {
    origin: StateId,
    target: StateId,
    kind: TransitionKind,
}

impl Transition {
    pub(crate) fn new(origin: StateId, kind: TransitionKind, target: StateId) -> Self {
        Self {
            origin,
            target,
            kind,
        }
    }

    /// The state in which the transition starts.
    pub fn origin(&self) -> StateId {
        self.origin
    }

    /// The state in which the transition ends.
    pub fn target(&self) -> StateId {
        self.target
    }

    /// The payload of the transition.
    pub fn kind(&self) -> &TransitionKind {
        &self.kind
    }

    pub(crate) fn remap(&mut self, origin: StateId, target: StateId) {
        self.origin = origin;
        self.target = target;
    }
}

impl Show for Transition {
    fn show(&self) -> String {
        format!("({}, {}, {})", self.origin, self.kind.show(), self.target)
    }
}
