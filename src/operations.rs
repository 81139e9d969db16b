//! Every operation validates its operands, clones them and returns a new automaton. The operands
//! themselves are never modified. Results are renumbered so that the initial state has id `0`.

mod complement;
pub use complement::{complement, complement_over, totalize};

mod concatenation;
pub use concatenation::concatenation;

mod union;
pub use union::union;

mod kleene;
pub use kleene::kleene_star;

mod intersection;
pub use intersection::intersection;
