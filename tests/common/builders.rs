//! Test graph builders

use fyre_pipeline::pipeline::{ConstantElement, MatrixMultiplyElement, NodeId, Pipeline};
use fyre_pipeline::TypeDescriptor;

/// A chain of Matrix Multiply stages fed by a vector constant.
///
/// ```text
/// [v] ──► [stage 0] ──► [stage 1] ──► ...
///  [M0] ──►┘    [M1] ──►┘
/// ```
pub struct ChainBuilder {
    vector: TypeDescriptor,
    matrices: Vec<TypeDescriptor>,
}

/// Node ids of a built chain.
pub struct Chain {
    pub pipeline: Pipeline,
    pub source: NodeId,
    pub matrices: Vec<NodeId>,
    pub stages: Vec<NodeId>,
}

impl ChainBuilder {
    pub fn new(vector: TypeDescriptor) -> Self {
        Self {
            vector,
            matrices: Vec::new(),
        }
    }

    /// Append a stage multiplying by a constant of type `matrix`.
    pub fn stage(mut self, matrix: TypeDescriptor) -> Self {
        self.matrices.push(matrix);
        self
    }

    pub fn build(self) -> Chain {
        let mut pipeline = Pipeline::new();
        let source = pipeline
            .add_node(ConstantElement::with_type(self.vector))
            .unwrap();

        let mut matrices = Vec::new();
        let mut stages = Vec::new();
        let mut upstream = source;
        for ty in self.matrices {
            let m = pipeline.add_node(ConstantElement::with_type(ty)).unwrap();
            let stage = pipeline.add_node(MatrixMultiplyElement::new()).unwrap();
            pipeline.add_edge(upstream, 0, stage, 0).unwrap();
            pipeline.add_edge(m, 0, stage, 1).unwrap();
            matrices.push(m);
            stages.push(stage);
            upstream = stage;
        }

        Chain {
            pipeline,
            source,
            matrices,
            stages,
        }
    }
}
