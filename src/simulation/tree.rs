use std::{collections::VecDeque, fmt::Debug};

use tracing::{debug, trace};

use super::SimulationConfig;

/// The state of a node in a [`ConfigurationTree`] after exploration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeStatus {
    /// The configuration satisfies the acceptance condition, the branch ends here.
    Accepted,
    /// No transition applies and the configuration is not accepting, the branch ends here.
    Rejected,
    /// The configuration has successors, which are the children of the node.
    Expanded,
    /// Exploration stopped because the step limit or the node limit was reached. The branch
    /// might have continued.
    Truncated,
}

/// A node of a [`ConfigurationTree`].
#[derive(Debug, Clone)]
pub struct Node<C> {
    configuration: C,
    parent: Option<usize>,
    children: Vec<usize>,
    depth: usize,
    status: NodeStatus,
}

impl<C> Node<C> {
    /// The configuration (instantaneous description) of this node.
    pub fn configuration(&self) -> &C {
        &self.configuration
    }

    /// Index of the parent node, `None` for the root.
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Indices of the child nodes.
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    /// Number of steps from the root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// How exploration ended at this node.
    pub fn status(&self) -> NodeStatus {
        self.status
    }
}

/// Something that can be explored by the configuration tree, i.e. a machine together with its
/// acceptance policy.
pub(crate) trait Machine {
    type Configuration: Clone + Debug;

    /// All configurations reachable in one step, in a deterministic order.
    fn successors(&self, configuration: &Self::Configuration) -> Vec<Self::Configuration>;

    /// Whether the configuration is accepting before any further step is taken.
    fn accepts(&self, configuration: &Self::Configuration) -> bool;

    /// Whether a configuration without successors is accepting.
    fn accepts_halted(&self, configuration: &Self::Configuration) -> bool;
}

/// The tree of all computations of a nondeterministic machine on some input. Each node holds a
/// configuration, its children are the configurations reachable in one step. Every branch is kept,
/// so all accepting computations can be reported and not just whether one exists.
///
/// Exploration is breadth-first and bounded by the step limit (depth of the tree) and the node
/// limit (size of the tree) of the [`SimulationConfig`]. It therefore terminates even for
/// machines that loop forever.
#[derive(Debug, Clone)]
pub struct ConfigurationTree<C> {
    nodes: Vec<Node<C>>,
}

impl<C: Clone + Debug> ConfigurationTree<C> {
    pub(crate) fn explore<M>(machine: &M, root: C, config: &SimulationConfig) -> Self
    where
        M: Machine<Configuration = C>,
    {
        let mut nodes = vec![Node {
            configuration: root,
            parent: None,
            children: vec![],
            depth: 0,
            status: NodeStatus::Expanded,
        }];
        let mut queue = VecDeque::from([0usize]);

        while let Some(index) = queue.pop_front() {
            let configuration = nodes[index].configuration.clone();
            let depth = nodes[index].depth;

            if machine.accepts(&configuration) {
                trace!("accepting configuration at depth {depth}: {configuration:?}");
                nodes[index].status = NodeStatus::Accepted;
                continue;
            }

            let successors = machine.successors(&configuration);
            if successors.is_empty() {
                nodes[index].status = if machine.accepts_halted(&configuration) {
                    NodeStatus::Accepted
                } else {
                    NodeStatus::Rejected
                };
                continue;
            }

            if depth >= config.step_limit() || nodes.len() + successors.len() > config.node_limit()
            {
                trace!("truncating branch at depth {depth}: {configuration:?}");
                nodes[index].status = NodeStatus::Truncated;
                continue;
            }

            nodes[index].status = NodeStatus::Expanded;
            for successor in successors {
                let child = nodes.len();
                nodes.push(Node {
                    configuration: successor,
                    parent: Some(index),
                    children: vec![],
                    depth: depth + 1,
                    status: NodeStatus::Expanded,
                });
                nodes[index].children.push(child);
                queue.push_back(child);
            }
        }

        let tree = Self { nodes };
        debug!(
            "explored {} configurations, {} accepting, truncated: {}",
            tree.len(),
            tree.accepting().count(),
            tree.is_truncated()
        );
        tree
    }
}

impl<C> ConfigurationTree<C> {
    /// The root node, which holds the initial configuration.
    pub fn root(&self) -> &Node<C> {
        &self.nodes[0]
    }

    /// Returns the node with the given index.
    pub fn node(&self, index: usize) -> Option<&Node<C>> {
        self.nodes.get(index)
    }

    /// All nodes in the order in which they were created (breadth-first).
    pub fn nodes(&self) -> &[Node<C>] {
        &self.nodes
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always contains at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Indices of all accepting nodes.
    pub fn accepting(&self) -> impl Iterator<Item = usize> + '_ {
        self.with_status(NodeStatus::Accepted)
    }

    /// Indices of all nodes with the given status.
    pub fn with_status(&self, status: NodeStatus) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, node)| node.status == status)
            .map(|(i, _)| i)
    }

    /// Returns true if some branch is accepting. Truncated branches never count as accepting.
    pub fn accepts(&self) -> bool {
        self.accepting().next().is_some()
    }

    /// Returns true if some branch was cut by a limit.
    pub fn is_truncated(&self) -> bool {
        self.with_status(NodeStatus::Truncated).next().is_some()
    }

    /// The sequence of configurations from the root to the node with the given index.
    pub fn computation(&self, index: usize) -> Vec<&C> {
        let mut path = vec![];
        let mut current = Some(index);
        while let Some(i) = current {
            let Some(node) = self.nodes.get(i) else {
                break;
            };
            path.push(&node.configuration);
            current = node.parent;
        }
        path.reverse();
        path
    }

    /// All accepting computations, each as a sequence of configurations starting at the root.
    pub fn accepting_computations(&self) -> Vec<Vec<&C>> {
        self.accepting().map(|i| self.computation(i)).collect()
    }
}
