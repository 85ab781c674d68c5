use crate::information::{majority, ValueCounts};
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

/// Decision tree node
///
/// Each internal node owns its children, keyed by the attribute value that
/// routes a record into them.
#[derive(Clone, Debug, PartialEq)]
pub enum TreeNode {
    Leaf {
        label: String,
        /// Number of records the leaf was built (or collapsed) from.
        samples: usize,
        depth: usize,
    },
    Internal {
        attribute: String,
        /// Gain ratio of the split, rounded to 6 decimals.
        gain_ratio: f64,
        children: BTreeMap<String, TreeNode>,
        depth: usize,
    },
}

impl TreeNode {
    pub fn leaf(label: impl Into<String>, samples: usize, depth: usize) -> Self {
        TreeNode::Leaf {
            label: label.into(),
            samples,
            depth,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }

    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { depth, .. } | TreeNode::Internal { depth, .. } => *depth,
        }
    }

    /// The predicted label of a leaf, `None` for internal nodes.
    pub fn label(&self) -> Option<&str> {
        match self {
            TreeNode::Leaf { label, .. } => Some(label.as_str()),
            TreeNode::Internal { .. } => None,
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Internal { children, .. } => children.values().map(TreeNode::leaf_count).sum(),
        }
    }

    pub fn node_count(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Internal { children, .. } => {
                1 + children.values().map(TreeNode::node_count).sum::<usize>()
            }
        }
    }

    /// Deepest node depth in this subtree.
    pub fn max_depth(&self) -> usize {
        match self {
            TreeNode::Leaf { depth, .. } => *depth,
            TreeNode::Internal {
                children, depth, ..
            } => children
                .values()
                .map(TreeNode::max_depth)
                .max()
                .unwrap_or(*depth),
        }
    }

    /// Adds one vote per leaf in this subtree to `votes`, keyed by the leaf's label.
    pub fn leaf_votes(&self, votes: &mut ValueCounts) {
        match self {
            TreeNode::Leaf { label, .. } => *votes.entry(label.clone()).or_insert(0) += 1,
            TreeNode::Internal { children, .. } => {
                children.values().for_each(|child| child.leaf_votes(votes))
            }
        }
    }

    /// Label held by the most leaves below this node; ties go to the smallest label.
    pub fn majority_vote(&self) -> Option<String> {
        let mut votes = ValueCounts::new();
        self.leaf_votes(&mut votes);
        majority(&votes).map(|(label, _)| label.to_string())
    }

    fn render(&self, f: &mut Formatter<'_>, indent: usize) -> fmt::Result {
        match self {
            TreeNode::Leaf { label, .. } => writeln!(f, "Decyzja: {}", label),
            TreeNode::Internal {
                attribute,
                children,
                ..
            } => {
                for (value, child) in children {
                    write!(f, "{:width$}{} = {} ->", "", attribute, value, width = indent * 2)?;
                    if child.is_leaf() {
                        write!(f, " ")?;
                    } else {
                        writeln!(f)?;
                    }
                    child.render(f, indent + 1)?;
                }
                Ok(())
            }
        }
    }
}

/// Indented text form: `attribute = value -> subtree`, leaves as `Decyzja: label`.
impl Display for TreeNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.render(f, 0)
    }
}
