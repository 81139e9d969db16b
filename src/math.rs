use std::{collections::BTreeSet, hash::Hash};

/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;

/// Represents a bijective mapping between `L` and `R`, that is a mapping which associates
/// each `L` with precisely one `R` and vice versa.
pub type Bijection<L, R> = bimap::BiBTreeMap<L, R>;

/// A partition groups elements of type `I` into disjoint classes. The classes are kept in the
/// order in which they were created.
#[derive(Debug, Clone)]
pub struct Partition<I: Hash + Eq>(Vec<BTreeSet<I>>);

impl<I: Hash + Eq> std::ops::Deref for Partition<I> {
    type Target = Vec<BTreeSet<I>>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a, I: Hash + Eq> IntoIterator for &'a Partition<I> {
    type Item = &'a BTreeSet<I>;
    type IntoIter = std::slice::Iter<'a, BTreeSet<I>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<I: Hash + Eq> PartialEq for Partition<I> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|o| other.contains(o))
    }
}
impl<I: Hash + Eq> Eq for Partition<I> {}

impl<I: Hash + Eq + Ord + Copy> Partition<I> {
    /// Returns the size of the partition, i.e. the number of classes.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Builds a partition from an iterator that yields iterators which yield elements of type `I`.
    /// The given classes are assumed to be disjoint.
    pub fn new<X: IntoIterator<Item = I>, Y: IntoIterator<Item = X>>(iter: Y) -> Self {
        Self(
            iter.into_iter()
                .map(|it| it.into_iter().collect::<BTreeSet<_>>())
                .collect(),
        )
    }

    /// Incrementally unites classes from a sequence of related pairs. For each pair, every class
    /// that already contains one of its members is merged into the first such class together with
    /// the pair, otherwise the pair opens a new class. Elements that never occur in a pair do not
    /// appear in the partition at all.
    ///
    /// No path compression takes place, but merging all touched classes guarantees that the result
    /// is a proper partition regardless of the order in which pairs arrive.
    pub fn from_pairs<P: IntoIterator<Item = (I, I)>>(pairs: P) -> Self {
        let mut classes: Vec<BTreeSet<I>> = Vec::new();
        for (p, q) in pairs {
            let touched: Vec<usize> = classes
                .iter()
                .enumerate()
                .filter(|(_, class)| class.contains(&p) || class.contains(&q))
                .map(|(i, _)| i)
                .collect();

            match touched.split_first() {
                None => classes.push(BTreeSet::from([p, q])),
                Some((&first, rest)) => {
                    // remove from the back so that the remaining positions stay valid
                    for &other in rest.iter().rev() {
                        let absorbed = classes.remove(other);
                        classes[first].extend(absorbed);
                    }
                    classes[first].insert(p);
                    classes[first].insert(q);
                }
            }
        }
        Self(classes)
    }

    /// Returns the class that contains `element`, if any.
    pub fn class_of(&self, element: &I) -> Option<&BTreeSet<I>> {
        self.0.iter().find(|class| class.contains(element))
    }
}

impl<I: Hash + Eq + Ord> From<Vec<BTreeSet<I>>> for Partition<I> {
    fn from(value: Vec<BTreeSet<I>>) -> Self {
        Self(value)
    }
}
