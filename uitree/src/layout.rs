use crate::geometry::SizeF;
use crate::node::{NodeArena, NodeId};

/// Size bounds handed from a parent to a child during measure.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutConstraint {
    pub max_size: SizeF,
    pub percent_reference: SizeF,
}

impl LayoutConstraint {
    pub fn new(max_size: SizeF) -> Self {
        Self {
            max_size,
            percent_reference: max_size,
        }
    }
}

/// A node-specific layout pass.
///
/// `measure` sets the node's frame size and the constraints its children
/// see; `layout` places the node and its children.
pub trait Measurable<P> {
    fn measure(&mut self, arena: &mut NodeArena<P>, node: NodeId, constraint: LayoutConstraint);

    fn layout(&mut self, arena: &mut NodeArena<P>, node: NodeId);
}
