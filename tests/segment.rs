//! End-to-end scenario: partition a three-node chain the way the
//! boundary-decision pass drives a block, then resolve shape profiles for
//! engine construction.

use blockgraph::internal::*;

fn chain() -> Graph {
    let fact = TensorFact::dt_shape(DatumType::F32, &[1, 3, 224, 224]);
    let mut model = Graph::default();
    let a = model.add_source("a", fact.clone()).unwrap();
    let b = model.add_node("b", Opaque::new("conv2d"), tvec!(fact.clone())).unwrap();
    model.add_edge(a, InletId::new(b, 0)).unwrap();
    let c = model.add_node("c", Opaque::new("softmax"), tvec!(fact.clone())).unwrap();
    model.add_edge(OutletId::new(b, 0), InletId::new(c, 0)).unwrap();
    model.auto_outputs().unwrap();
    model
}

#[test]
fn single_node_block() {
    let model = chain();

    let mut block = Block::from_nodes(0, Target::Accelerator, &model, &[1]).unwrap();
    block.register_output(OutletId::new(1, 0)).unwrap();

    // exactly one boundary crossing each way
    assert_eq!(block.raw_inputs(), &[OutletId::new(0, 0)]);
    assert_eq!(block.raw_outputs(), &[OutletId::new(1, 0)]);
    assert_eq!(block.raw_nodes(), &[1]);

    // private graph: 1 computing node, 1 input, 1 output
    assert_eq!(block.graph().nodes().iter().filter(|n| !n.is_source()).count(), 1);
    assert_eq!(block.inputs().len(), 1);
    assert_eq!(block.outputs().len(), 1);

    // the block input carries the original value's type information
    let input_fact = block.graph().outlet_fact(block.inputs()[0]).unwrap();
    assert_eq!(input_fact, model.outlet_fact(OutletId::new(0, 0)).unwrap());
}

/// What the boundary-decision pass does once a block's nodes are cloned:
/// expose every value consumed outside the block, or escaping as a model
/// output, as a block output.
fn register_boundary_outputs(block: &mut Block, model: &Graph) {
    for node in block.raw_nodes().to_vec() {
        for slot in 0..model.node(node).unwrap().outputs.len() {
            let outlet = OutletId::new(node, slot);
            let crosses = model
                .outlet_successors(outlet)
                .iter()
                .any(|succ| !block.raw_nodes().contains(&succ.node))
                || model.outputs.contains(&outlet);
            if crosses {
                block.register_output(outlet).unwrap();
            }
        }
    }
}

#[test]
fn two_blocks_share_a_boundary_value() {
    let model = chain();
    let order = eval_order(&model).unwrap();
    assert_eq!(order, vec![0, 1, 2]);

    // accelerator gets {b}, host gets {c}
    let mut accel = Block::from_nodes(0, Target::Accelerator, &model, &[1]).unwrap();
    register_boundary_outputs(&mut accel, &model);
    let mut host = Block::from_nodes(1, Target::Host, &model, &[2]).unwrap();
    register_boundary_outputs(&mut host, &model);

    // b's output crosses the boundary: accel output, host input
    assert_eq!(accel.raw_outputs(), &[OutletId::new(1, 0)]);
    assert_eq!(host.raw_inputs(), &[OutletId::new(1, 0)]);
    assert_eq!(host.raw_outputs(), &[OutletId::new(2, 0)]);
}

#[test]
fn profile_registration_and_resolution() {
    let model = chain();
    let mut block = Block::from_nodes(0, Target::Accelerator, &model, &[1]).unwrap();
    block.register_output(OutletId::new(1, 0)).unwrap();

    // min snapshot seeds the profiles, opt and max overwrite their component
    block.register_in_shapes(vec![ShapeProfile::fixed(&[1, 3, 224, 224])]);
    block.register_opt_shapes(&[tvec!(1, 3, 224, 224)]);
    block.register_max_shapes(&[tvec!(4, 3, 224, 224)]);
    block.register_in_types(vec![DatumType::F32]);
    block.resolve_dynamic_shapes();

    let profile = &block.in_shapes()[0];
    assert_eq!(profile.shape(), &[-1, 3, 224, 224]);
    assert!(profile.is_dynamic());
    assert_eq!(profile.min(), &[1, 3, 224, 224]);
    assert_eq!(profile.max(), &[4, 3, 224, 224]);
    assert_eq!(block.in_types(), &[DatumType::F32]);
}
