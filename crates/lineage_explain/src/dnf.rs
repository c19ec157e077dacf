//! Disjunctive normal form of explanation graphs.
//!
//! [`as_dnf`] reads an explanation as a boolean formula over its leaves and
//! rewrites it as an OR of [`Clause`]s, each clause an AND of leaf facts
//! that on its own accounts for the root:
//!
//! - a leaf (childless part node, or unknown node) is a singleton clause;
//! - an OR contributes the union of its children's clauses;
//! - an AND, and a part node with several children, contribute the
//!   cartesian merge of their children's clauses;
//! - a part node with one child contributes that child's clauses.
//!
//! Duplicate clauses collapse, and a clause that contains another clause is
//! dropped, so every remaining clause is minimal.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use lineage_foundation::Part;

use crate::node::{ExplanationGraph, NodeIndex, NodeKind};
use crate::subject::Subject;

/// One leaf fact of a clause.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Literal {
    /// A part of a subject.
    Fact {
        /// The designated part.
        part: Part,
        /// What the part belongs to.
        subject: Subject,
    },
    /// An unresolved cause.
    Unknown,
}

impl Literal {
    /// Creates a fact literal.
    #[must_use]
    pub fn fact(part: Part, subject: Subject) -> Self {
        Self::Fact { part, subject }
    }

    /// Returns the literal a leaf node stands for.
    fn of(kind: &NodeKind) -> Self {
        match kind {
            NodeKind::Part { part, subject } => Self::fact(part.clone(), subject.clone()),
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fact { part, subject } => write!(f, "{part} of {subject}"),
            Self::Unknown => write!(f, "?"),
        }
    }
}

/// A set of leaf facts that together account for an explanation root.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Clause(BTreeSet<Literal>);

impl Clause {
    /// Creates an empty clause.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of literals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the clause has no literals.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if the clause contains `literal`.
    #[must_use]
    pub fn contains(&self, literal: &Literal) -> bool {
        self.0.contains(literal)
    }

    /// Iterates over the literals in order.
    pub fn iter(&self) -> impl Iterator<Item = &Literal> {
        self.0.iter()
    }

    /// Returns true if every literal of `self` is in `other`.
    #[must_use]
    pub fn is_subset(&self, other: &Clause) -> bool {
        self.0.is_subset(&other.0)
    }

    fn union(&self, other: &Clause) -> Clause {
        Clause(self.0.union(&other.0).cloned().collect())
    }
}

impl FromIterator<Literal> for Clause {
    fn from_iter<I: IntoIterator<Item = Literal>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, literal) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{literal}")?;
        }
        write!(f, "}}")
    }
}

/// An OR of minimal clauses.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dnf {
    clauses: Vec<Clause>,
}

impl Dnf {
    /// Returns the clauses in sorted order.
    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Returns the number of clauses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Returns true if there are no clauses (the formula is unsatisfiable).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Returns true if some clause lies entirely within `assignment`.
    #[must_use]
    pub fn is_satisfied_by(&self, assignment: &HashSet<Literal>) -> bool {
        self.clauses
            .iter()
            .any(|clause| clause.iter().all(|l| assignment.contains(l)))
    }

    /// Evaluates the formula with `true_literals` true and every other literal false.
    #[must_use]
    pub fn evaluate(&self, true_literals: &[Literal]) -> bool {
        let assignment: HashSet<Literal> = true_literals.iter().cloned().collect();
        self.is_satisfied_by(&assignment)
    }

    fn minimal(clauses: Vec<Clause>) -> Self {
        let mut unique: Vec<Clause> = clauses.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
        unique.sort_by_key(Clause::len);
        let mut kept: Vec<Clause> = Vec::with_capacity(unique.len());
        for clause in unique {
            if !kept.iter().any(|smaller| smaller.is_subset(&clause)) {
                kept.push(clause);
            }
        }
        kept.sort();
        Self { clauses: kept }
    }
}

impl fmt::Display for Dnf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                write!(f, " OR ")?;
            }
            write!(f, "{clause}")?;
        }
        Ok(())
    }
}

/// Converts the explanation below `root` into disjunctive normal form.
#[must_use]
pub fn as_dnf(graph: &ExplanationGraph, root: NodeIndex) -> Dnf {
    let mut memo = HashMap::new();
    Dnf::minimal(clauses_of(graph, root, &mut memo))
}

fn clauses_of(
    graph: &ExplanationGraph,
    index: NodeIndex,
    memo: &mut HashMap<NodeIndex, Vec<Clause>>,
) -> Vec<Clause> {
    if let Some(done) = memo.get(&index) {
        return done.clone();
    }
    let Some(node) = graph.get(index) else {
        return Vec::new();
    };
    // revisits through a malformed cycle see an unsatisfiable branch
    memo.insert(index, Vec::new());
    let children: Vec<NodeIndex> = node.children().collect();
    let clauses = match node.kind() {
        _ if children.is_empty() && node.connective().is_none() => {
            vec![Clause::from_iter([Literal::of(node.kind())])]
        }
        NodeKind::Or => {
            let mut all = Vec::new();
            for child in children {
                all.extend(clauses_of(graph, child, memo));
            }
            Dnf::minimal(all).clauses
        }
        NodeKind::Part { .. } if children.len() == 1 => clauses_of(graph, children[0], memo),
        _ => {
            let mut product = vec![Clause::new()];
            for child in children {
                let options = clauses_of(graph, child, memo);
                product = product
                    .iter()
                    .flat_map(|left| options.iter().map(move |right| left.union(right)))
                    .collect();
                product = Dnf::minimal(product).clauses;
            }
            product
        }
    };
    memo.insert(index, clauses.clone());
    clauses
}

/// Evaluates the explanation below `root` directly, with `assignment` giving
/// the leaf facts that hold.
///
/// Agrees with [`Dnf::is_satisfied_by`] on the DNF of the same root.
#[must_use]
pub fn holds(graph: &ExplanationGraph, root: NodeIndex, assignment: &HashSet<Literal>) -> bool {
    let Some(node) = graph.get(root) else {
        return false;
    };
    let mut children = node.children();
    match node.kind() {
        _ if node.is_leaf() && node.connective().is_none() => {
            assignment.contains(&Literal::of(node.kind()))
        }
        NodeKind::Or => children.any(|c| holds(graph, c, assignment)),
        _ => children.all(|c| holds(graph, c, assignment)),
    }
}
