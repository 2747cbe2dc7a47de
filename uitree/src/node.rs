//! Retained node arena.
//!
//! Nodes live in generational slots. Handles ([`NodeId`]) are plain indices
//! and never own a node: once a node is destroyed every handle to it misses,
//! which callers treat as "already gone". Each node also carries a stable
//! element id that is never reused, so registries keyed by element id can
//! outlive the slot.

use std::collections::HashMap;
use std::fmt;

use crate::color::Color;
use crate::focus::FocusHub;
use crate::geometry::{OffsetF, RectF, SizeF};

/// Generational handle into a [`NodeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Visible,
    Invisible,
    Gone,
}

/// Paint-time properties; animations write these directly.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderProps {
    pub opacity: f32,
    pub translate: OffsetF,
    pub scale: f32,
    /// Absolute position override, relative to the parent.
    pub position: Option<OffsetF>,
    pub background: Option<Color>,
    pub clip_path: Option<String>,
}

impl Default for RenderProps {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            translate: OffsetF::ZERO,
            scale: 1.0,
            position: None,
            background: None,
            clip_path: None,
        }
    }
}

/// Layout inputs the overlay layer may adjust.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutProps {
    pub visibility: Visibility,
    pub ideal_size: Option<SizeF>,
    pub min_size: Option<SizeF>,
    pub scroll_enabled: bool,
    pub scroll_position: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureHub {
    pub clickable: bool,
    pub response_region: Vec<RectF>,
}

#[derive(Debug)]
pub struct Node<P> {
    element_id: i32,
    tag: &'static str,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    removing: bool,
    dirty: bool,
    pub pattern: P,
    /// Offset relative to the parent, and measured size.
    pub frame: RectF,
    pub render: RenderProps,
    pub layout: LayoutProps,
    pub gesture: GestureHub,
    pub focus: FocusHub,
}

impl<P> Node<P> {
    pub fn element_id(&self) -> i32 {
        self.element_id
    }

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_removing(&self) -> bool {
        self.removing
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

struct Slot<P> {
    generation: u32,
    node: Option<Node<P>>,
}

/// Owner of every node of one surface.
pub struct NodeArena<P> {
    slots: Vec<Slot<P>>,
    free: Vec<u32>,
    by_element: HashMap<i32, NodeId>,
    next_element_id: i32,
}

impl<P> Default for NodeArena<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> NodeArena<P> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            by_element: HashMap::new(),
            next_element_id: 1,
        }
    }

    pub fn create(&mut self, tag: &'static str, pattern: P) -> NodeId {
        let element_id = self.next_element_id;
        self.next_element_id += 1;
        let node = Node {
            element_id,
            tag,
            parent: None,
            children: Vec::new(),
            removing: false,
            dirty: true,
            pattern,
            frame: RectF::default(),
            render: RenderProps::default(),
            layout: LayoutProps::default(),
            gesture: GestureHub::default(),
            focus: FocusHub::default(),
        };
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index: (self.slots.len() - 1) as u32,
                    generation: 0,
                }
            }
        };
        self.by_element.insert(element_id, id);
        log::trace!("create node {} ({tag}) element {element_id}", id);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node<P>> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<P>> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn pattern(&self, id: NodeId) -> Option<&P> {
        self.get(id).map(|node| &node.pattern)
    }

    pub fn pattern_mut(&mut self, id: NodeId) -> Option<&mut P> {
        self.get_mut(id).map(|node| &mut node.pattern)
    }

    /// Resolve a live node by its element id.
    pub fn find(&self, element_id: i32) -> Option<NodeId> {
        let id = *self.by_element.get(&element_id)?;
        self.contains(id).then_some(id)
    }

    pub fn element_id(&self, id: NodeId) -> Option<i32> {
        self.get(id).map(|node| node.element_id)
    }

    pub fn len(&self) -> usize {
        self.by_element.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_element.is_empty()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|node| node.children.as_slice()).unwrap_or(&[])
    }

    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.get(id)?.children.get(index).copied()
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.child_at(id, 0)
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.children.last().copied()
    }

    pub fn is_child_of(&self, child: NodeId, parent: NodeId) -> bool {
        self.parent(child) == Some(parent)
    }

    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|c| *c == id)
    }

    /// Append `child` under `parent`, detaching it from any previous parent.
    pub fn mount(&mut self, child: NodeId, parent: NodeId) -> bool {
        if child == parent || !self.contains(child) || !self.contains(parent) {
            return false;
        }
        self.detach(child);
        if let Some(node) = self.get_mut(parent) {
            node.children.push(child);
            node.dirty = true;
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
            node.dirty = true;
        }
        true
    }

    /// Detach `child` from its parent. The node stays alive.
    pub fn detach(&mut self, child: NodeId) -> bool {
        let Some(parent) = self.parent(child) else {
            return false;
        };
        if let Some(node) = self.get_mut(parent) {
            node.children.retain(|c| *c != child);
            node.dirty = true;
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = None;
        }
        true
    }

    /// Detach every child of `parent` without destroying them.
    pub fn clean(&mut self, parent: NodeId) -> Vec<NodeId> {
        let children = self.children(parent).to_vec();
        for child in &children {
            self.detach(*child);
        }
        children
    }

    /// Detach and free `id` together with its whole subtree.
    pub fn destroy(&mut self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.detach(id);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let slot = &mut self.slots[current.index as usize];
            let Some(node) = slot.node.take() else {
                continue;
            };
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(current.index);
            self.by_element.remove(&node.element_id);
            stack.extend(node.children);
        }
        true
    }

    pub fn mark_removing(&mut self, id: NodeId, removing: bool) {
        if let Some(node) = self.get_mut(id) {
            node.removing = removing;
        }
    }

    pub fn is_removing(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|node| node.removing)
    }

    pub fn mark_dirty(&mut self, id: NodeId) {
        if let Some(node) = self.get_mut(id) {
            node.dirty = true;
        }
    }

    pub fn clear_dirty(&mut self, id: NodeId) {
        if let Some(node) = self.get_mut(id) {
            node.dirty = false;
        }
    }

    pub fn frame_size(&self, id: NodeId) -> SizeF {
        self.get(id).map(|node| node.frame.size()).unwrap_or_default()
    }

    /// Offset of `id` from the arena root, following frame offsets,
    /// position overrides and translations.
    pub fn paint_offset(&self, id: NodeId) -> OffsetF {
        let mut offset = OffsetF::ZERO;
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.get(node_id) else {
                break;
            };
            offset += node.render.position.unwrap_or(node.frame.offset());
            offset += node.render.translate;
            current = node.parent;
        }
        offset
    }

    /// Depth-first walk of the subtree under `id`, including `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !self.contains(current) {
                continue;
            }
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }
}
