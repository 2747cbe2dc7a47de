//! Retained node tree, animation and task primitives for overlay surfaces.

pub mod animation;
pub mod color;
pub mod curve;
pub mod dimension;
pub mod executor;
pub mod focus;
pub mod geometry;
pub mod layout;
pub mod node;

pub use animation::{
    AnimatedProperty, AnimationId, AnimationOption, AnimationTarget, Animator, Finished,
};
pub use color::{Color, ColorParseError};
pub use curve::Curve;
pub use dimension::{Dimension, DimensionParseError, DimensionUnit};
pub use executor::{DelayedTaskId, TaskExecutor, TaskSender};
pub use focus::{FocusHub, FocusState};
pub use geometry::{OffsetF, RectF, SizeF};
pub use layout::{LayoutConstraint, Measurable};
pub use node::{GestureHub, LayoutProps, Node, NodeArena, NodeId, RenderProps, Visibility};
