//! Local explanation fragments.
//!
//! A [`Cause`] describes why an output of one function has its value, in
//! terms of parts of that function's own inputs. Rendering it onto a
//! [`Tracer`] produces explanation nodes whose subject is the function
//! being explained (the owner).
//!
//! Functions that delegate to inner functions (per-element copies of a
//! condition, say) use [`Cause::Through`] to trace the inner function and
//! rewire whatever the inner explanation says about the inner function's
//! inputs into parts of the owner's inputs.

use lineage_explain::{Connective, Explainable, NodeIndex, Subject, Tracer};
use lineage_foundation::{Part, Result};

use crate::function::Function;

/// A local explanation of one output part.
#[derive(Debug)]
pub enum Cause<'a> {
    /// A part of the owner, normally an input part.
    Part(Part),
    /// All causes jointly.
    All(Vec<Cause<'a>>),
    /// Any one of the causes.
    Any(Vec<Cause<'a>>),
    /// A cause that cannot be named.
    Unknown,
    /// `part` of an inner function, with the inner function's input `i`
    /// standing for `inputs[i]` of the owner.
    Through {
        /// The inner function.
        function: &'a dyn Function,
        /// The part of the inner function to trace.
        part: Part,
        /// Owner parts feeding each inner input.
        inputs: Vec<Part>,
    },
    /// A witness element of the owner's input together with the reason it
    /// witnesses. The witness leaf ends up beneath the reason wherever the
    /// reason depends on its input.
    Witness {
        /// The witness part of the owner.
        part: Part,
        /// Why that part is a witness.
        because: Box<Cause<'a>>,
    },
}

impl<'a> Cause<'a> {
    /// Creates a conjunction, unwrapping a single cause.
    #[must_use]
    pub fn all(mut causes: Vec<Cause<'a>>) -> Self {
        if causes.len() == 1 {
            causes.remove(0)
        } else {
            Self::All(causes)
        }
    }

    /// Creates a disjunction, unwrapping a single cause.
    #[must_use]
    pub fn any(mut causes: Vec<Cause<'a>>) -> Self {
        if causes.len() == 1 {
            causes.remove(0)
        } else {
            Self::Any(causes)
        }
    }

    /// Creates an input part cause.
    #[must_use]
    pub fn input(index: usize) -> Self {
        Self::Part(Part::Input(index))
    }

    /// Creates a cause for part `rest` of input `index`.
    #[must_use]
    pub fn input_part(index: usize, rest: Part) -> Self {
        Self::Part(Part::Input(index).then(rest))
    }

    /// Renders this cause as explanation nodes about `owner`.
    ///
    /// Returns `None` for causes with nothing to say, such as an empty
    /// conjunction.
    ///
    /// # Errors
    ///
    /// Propagates errors from tracing inner functions.
    pub fn render(&self, owner: &Subject, tracer: &mut Tracer) -> Result<Option<NodeIndex>> {
        match self {
            Self::Part(part) => Ok(Some(tracer.leaf(part.clone(), owner.clone()))),
            Self::Unknown => Ok(Some(tracer.unknown())),
            Self::All(causes) => Self::join(Connective::And, causes, owner, tracer),
            Self::Any(causes) => Self::join(Connective::Or, causes, owner, tracer),
            Self::Through {
                function,
                part,
                inputs,
            } => Self::through(*function, part, inputs, owner, tracer).map(Some),
            Self::Witness { part, because } => {
                let Some(reason) = because.render(owner, tracer)? else {
                    return Ok(Some(tracer.leaf(part.clone(), owner.clone())));
                };
                // Tree mode copies leaves, so match by part and subject.
                let graph = tracer.graph();
                let beneath = graph.reachable(reason).into_iter().any(|n| {
                    graph[n].is_leaf()
                        && graph[n].part() == Some(part)
                        && graph[n].subject() == Some(owner)
                });
                if beneath {
                    return Ok(Some(reason));
                }
                let witness = tracer.leaf(part.clone(), owner.clone());
                Ok(tracer.connective(Connective::And, &[witness, reason]))
            }
        }
    }

    fn join(
        connective: Connective,
        causes: &[Cause<'_>],
        owner: &Subject,
        tracer: &mut Tracer,
    ) -> Result<Option<NodeIndex>> {
        let mut children = Vec::with_capacity(causes.len());
        for cause in causes {
            if let Some(child) = cause.render(owner, tracer)? {
                children.push(child);
            }
        }
        Ok(tracer.connective(connective, &children))
    }

    fn through(
        function: &dyn Function,
        part: &Part,
        inputs: &[Part],
        owner: &Subject,
        tracer: &mut Tracer,
    ) -> Result<NodeIndex> {
        let inner = function.subject();
        let (node, fresh) = tracer.trace_fresh(part, function.as_explainable())?;
        if fresh {
            for leaf in tracer.frontier(node, &inner) {
                let Some(leaf_part) = tracer.graph()[leaf].part().cloned() else {
                    continue;
                };
                let mapped = leaf_part
                    .mentioned_input()
                    .and_then(|i| inputs.get(i))
                    .cloned();
                let child = match mapped {
                    Some(outer) => tracer.leaf(outer.then(leaf_part.tail()), owner.clone()),
                    None => tracer.unknown(),
                };
                tracer.add_child(leaf, child);
            }
        }
        Ok(node)
    }
}
