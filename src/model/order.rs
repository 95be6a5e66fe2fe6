use super::Graph;
use crate::GraphResult;

/// Topological order over the nodes needed to compute the graph outputs.
///
/// Depth-first from the outputs; a node is emitted once all its operands
/// are. Each stack entry carries the index of the next operand to satisfy,
/// so a node shared by several consumers is walked once.
pub fn eval_order(graph: &Graph) -> GraphResult<Vec<usize>> {
    let mut visited = bit_set::BitSet::with_capacity(graph.nodes.len());
    let mut order: Vec<usize> = vec![];
    let mut stack: Vec<(usize, usize)> =
        graph.outputs.iter().rev().map(|o| (o.node, 0)).collect();
    while let Some((node, operand)) = stack.pop() {
        if visited.contains(node) {
            continue;
        }
        match graph.nodes[node].inputs.get(operand) {
            Some(input) => {
                stack.push((node, operand + 1));
                if !visited.contains(input.node) {
                    stack.push((input.node, 0));
                }
            }
            None => {
                visited.insert(node);
                order.push(node);
            }
        }
    }
    Ok(order)
}

#[cfg(test)]
mod tests {
    use crate::internal::*;

    fn fact() -> TensorFact {
        TensorFact::dt_shape(DatumType::F32, &[1])
    }

    #[test]
    fn simple() {
        let mut model = Graph::default();
        let a = model.add_source("a", fact()).unwrap();
        let add = model.add_node("add", Opaque::new("add"), tvec!(fact())).unwrap();
        model.add_edge(a, InletId::new(add, 0)).unwrap();
        let b = model.add_source("b", fact()).unwrap();
        model.add_edge(b, InletId::new(add, 1)).unwrap();
        model.auto_outputs().unwrap();
        assert_eq!(model.eval_order().unwrap(), vec!(0, 2, 1));
    }

    #[test]
    fn diamond() {
        let mut model = Graph::default();
        let a = model.add_source("a", fact()).unwrap();
        let add = model.add_node("add", Opaque::new("add"), tvec!(fact())).unwrap();
        model.add_edge(a, InletId::new(add, 0)).unwrap();
        model.add_edge(a, InletId::new(add, 1)).unwrap();
        model.auto_outputs().unwrap();
        assert_eq!(model.eval_order().unwrap(), vec!(0, 1));
    }
}
