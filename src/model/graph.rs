use std::fmt;

use itertools::Itertools;

use super::*;
use crate::internal::*;

/// A graph of operations on typed values.
///
/// Used both for the original model being partitioned and for each block's
/// private sub-graph. Nodes live in an arena indexed by their id; values are
/// addressed as [`OutletId`] handles.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    /// all nodes in the graph
    pub nodes: Vec<Node>,
    /// graph inputs
    pub inputs: Vec<OutletId>,
    /// graph outputs
    pub outputs: Vec<OutletId>,
}

impl Graph {
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        op: impl Into<Box<dyn Op>>,
        output_facts: TVec<TensorFact>,
    ) -> GraphResult<usize> {
        let id = self.nodes.len();
        let outputs =
            output_facts.into_iter().map(|fact| Outlet { fact, successors: tvec!() }).collect();
        self.nodes.push(Node { id, name: name.into(), op: op.into(), inputs: vec![], outputs });
        Ok(id)
    }

    /// Adds a source op to the graph and declare it as a graph input.
    pub fn add_source(&mut self, name: impl Into<String>, fact: TensorFact) -> GraphResult<OutletId> {
        let id = self.add_node(name, Source::new(), tvec!(fact))?;
        let id = OutletId::new(id, 0);
        self.inputs.push(id);
        Ok(id)
    }

    /// Connect a node outlet to a node inlet. Input slots of a node must be
    /// wired in order; rewiring an already-wired slot replaces the edge.
    pub fn add_edge(&mut self, outlet: OutletId, inlet: InletId) -> GraphResult<()> {
        self.outlet_fact(outlet)?;
        ensure!(
            inlet.slot <= self.nodes[inlet.node].inputs.len(),
            "Input slots must be wired consecutively: slot {} of node {} is not the next free one",
            inlet.slot,
            inlet.node
        );
        if let Some(previous) = self.nodes[inlet.node].inputs.get(inlet.slot).copied() {
            self.nodes[previous.node].outputs[previous.slot]
                .successors
                .retain(|&mut succ| succ != inlet);
        }
        self.nodes[outlet.node].outputs[outlet.slot].successors.push(inlet);
        let wired = &mut self.nodes[inlet.node].inputs;
        if inlet.slot == wired.len() {
            wired.push(outlet);
        } else {
            wired[inlet.slot] = outlet;
        }
        Ok(())
    }

    /// Guess outputs from the topology: node or nodes with no successors.
    pub fn auto_outputs(&mut self) -> GraphResult<()> {
        let outputs = self
            .nodes
            .iter()
            .flat_map(|n| {
                let id = n.id;
                n.outputs.iter().enumerate().map(move |(ix, output_fact)| {
                    (OutletId::new(id, ix), output_fact.successors.len())
                })
            })
            .filter(|(_f, succs)| *succs == 0)
            .map(|(f, _)| f)
            .collect();
        self.outputs = outputs;
        Ok(())
    }

    /// Find a node by its id.
    pub fn node(&self, id: usize) -> GraphResult<&Node> {
        self.nodes.get(id).with_context(|| format!("No node {id} in graph"))
    }

    /// Access the nodes table.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Get tensor information for a single outlet.
    pub fn outlet_fact(&self, outlet: OutletId) -> GraphResult<&TensorFact> {
        ensure!(outlet.node < self.nodes.len(), "Invalid outlet for graph");
        let outlets = &self.nodes[outlet.node].outputs;
        outlets
            .get(outlet.slot)
            .map(|o| &o.fact)
            .with_context(|| format!("Invalid outlet reference: {outlet:?}"))
    }

    pub fn outlet_successors(&self, outlet: OutletId) -> &[InletId] {
        &self.nodes[outlet.node].outputs[outlet.slot].successors
    }

    /// Computes an evaluation order for the graph inputs and outputs.
    pub fn eval_order(&self) -> GraphResult<Vec<usize>> {
        super::order::eval_order(self)
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        for node in &self.nodes {
            writeln!(
                fmt,
                "{:5} | {:15} {:25} | {:15} => {}",
                node.id,
                node.op().name(),
                node.name,
                node.inputs.iter().map(|o| format!("{}/{}", o.node, o.slot)).join(", "),
                node.outputs.iter().map(|o| format!("{:?}", o.fact)).join(" ; "),
            )?;
        }
        writeln!(
            fmt,
            "inputs: {}",
            self.inputs.iter().map(|o| format!("{}/{}", o.node, o.slot)).join(", ")
        )?;
        writeln!(
            fmt,
            "outputs: {}",
            self.outputs.iter().map(|o| format!("{}/{}", o.node, o.slot)).join(", ")
        )?;
        Ok(())
    }
}
