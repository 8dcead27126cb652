//! The IN/OUT fact table a [`crate::dataflow::solve`] run produces.

use crate::dataflow::Lattice;
use crate::ir::StmtIndex;

/// Per-statement IN and OUT facts for one method, as computed by
/// [`crate::dataflow::solve`].
#[derive(Debug, Clone)]
pub struct DataflowResult<F: Lattice> {
    in_facts: Vec<F>,
    out_facts: Vec<F>,
}

impl<F: Lattice> DataflowResult<F> {
    pub(crate) fn new(node_count: usize) -> Self {
        Self {
            in_facts: (0..node_count).map(|_| F::bottom()).collect(),
            out_facts: (0..node_count).map(|_| F::bottom()).collect(),
        }
    }

    /// The fact flowing into `node`.
    #[must_use]
    pub fn in_fact(&self, node: StmtIndex) -> &F {
        &self.in_facts[node.index()]
    }

    /// The fact flowing out of `node`.
    #[must_use]
    pub fn out_fact(&self, node: StmtIndex) -> &F {
        &self.out_facts[node.index()]
    }

    pub(crate) fn set_in_fact(&mut self, node: StmtIndex, fact: F) {
        self.in_facts[node.index()] = fact;
    }

    pub(crate) fn set_out_fact(&mut self, node: StmtIndex, fact: F) {
        self.out_facts[node.index()] = fact;
    }
}
