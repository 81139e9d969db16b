use std::collections::BTreeSet;

use itertools::Itertools;

/// Helper trait which can be used to display states, transitions and such.
pub trait Show {
    /// Returns a human readable representation of `self`, for a state that should be
    /// for example q0, q1, q2, ... and for a letter either the symbol itself or ε.
    /// Just use something that makes sense. This is mainly used for debugging purposes.
    fn show(&self) -> String;
}

impl Show for char {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for u32 {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for usize {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for String {
    fn show(&self) -> String {
        self.clone()
    }
}

impl Show for bool {
    fn show(&self) -> String {
        match self {
            true => "+",
            false => "-",
        }
        .to_string()
    }
}

impl<S: Show> Show for &S {
    fn show(&self) -> String {
        S::show(*self)
    }
}

impl<S: Show> Show for Option<S> {
    fn show(&self) -> String {
        match self {
            None => "-".to_string(),
            Some(x) => x.show(),
        }
    }
}

/// Sets are shown as comma separated lists in braces, the empty set is shown as `∅`.
impl<S: Show> Show for BTreeSet<S> {
    fn show(&self) -> String {
        if self.is_empty() {
            "∅".to_string()
        } else {
            format!("{{{}}}", self.iter().map(Show::show).join(", "))
        }
    }
}

/// A slice of symbols is shown as the word it spells, the empty word as `ε`.
impl Show for [char] {
    fn show(&self) -> String {
        if self.is_empty() {
            "ε".to_string()
        } else {
            self.iter().collect()
        }
    }
}

impl Show for Vec<char> {
    fn show(&self) -> String {
        self.as_slice().show()
    }
}
