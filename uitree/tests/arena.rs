use uitree::{Dimension, DimensionParseError, NodeArena, OffsetF, RectF};

fn arena() -> NodeArena<&'static str> {
    NodeArena::new()
}

// =============================================================================
// Mount / Detach Tests
// =============================================================================

#[test]
fn test_mount_appends_child() {
    let mut arena = arena();
    let root = arena.create("root", "root");
    let a = arena.create("a", "a");
    let b = arena.create("b", "b");
    assert!(arena.mount(a, root));
    assert!(arena.mount(b, root));
    assert_eq!(arena.children(root), &[a, b]);
    assert_eq!(arena.parent(a), Some(root));
    assert_eq!(arena.last_child(root), Some(b));
    assert_eq!(arena.index_in_parent(b), Some(1));
}

#[test]
fn test_mount_moves_between_parents() {
    let mut arena = arena();
    let first = arena.create("p", "first");
    let second = arena.create("p", "second");
    let child = arena.create("c", "child");
    arena.mount(child, first);
    arena.mount(child, second);
    assert!(arena.children(first).is_empty());
    assert_eq!(arena.children(second), &[child]);
}

#[test]
fn test_mount_rejects_self() {
    let mut arena = arena();
    let node = arena.create("n", "n");
    assert!(!arena.mount(node, node));
}

#[test]
fn test_detach_keeps_node_alive() {
    let mut arena = arena();
    let root = arena.create("root", "root");
    let child = arena.create("c", "c");
    arena.mount(child, root);
    assert!(arena.detach(child));
    assert!(arena.contains(child));
    assert!(arena.parent(child).is_none());
    assert!(!arena.detach(child));
}

#[test]
fn test_clean_detaches_all_children() {
    let mut arena = arena();
    let root = arena.create("root", "root");
    let a = arena.create("a", "a");
    let b = arena.create("b", "b");
    arena.mount(a, root);
    arena.mount(b, root);
    let removed = arena.clean(root);
    assert_eq!(removed, vec![a, b]);
    assert!(arena.children(root).is_empty());
    assert!(arena.contains(a));
}

// =============================================================================
// Destroy / Generation Tests
// =============================================================================

#[test]
fn test_destroy_frees_subtree() {
    let mut arena = arena();
    let root = arena.create("root", "root");
    let parent = arena.create("p", "p");
    let child = arena.create("c", "c");
    arena.mount(parent, root);
    arena.mount(child, parent);
    assert!(arena.destroy(parent));
    assert!(!arena.contains(parent));
    assert!(!arena.contains(child));
    assert!(arena.children(root).is_empty());
    assert_eq!(arena.len(), 1);
}

#[test]
fn test_stale_handle_misses_after_reuse() {
    let mut arena = arena();
    let old = arena.create("a", "a");
    arena.destroy(old);
    let new = arena.create("b", "b");
    assert!(arena.get(old).is_none());
    assert_eq!(arena.pattern(new), Some(&"b"));
    assert_ne!(old, new);
}

#[test]
fn test_element_ids_are_never_reused() {
    let mut arena = arena();
    let a = arena.create("a", "a");
    let first = arena.element_id(a).unwrap();
    arena.destroy(a);
    let b = arena.create("b", "b");
    let second = arena.element_id(b).unwrap();
    assert_ne!(first, second);
    assert!(arena.find(first).is_none());
    assert_eq!(arena.find(second), Some(b));
}

#[test]
fn test_destroy_missing_node_is_noop() {
    let mut arena = arena();
    let a = arena.create("a", "a");
    assert!(arena.destroy(a));
    assert!(!arena.destroy(a));
}

// =============================================================================
// Geometry Tests
// =============================================================================

#[test]
fn test_paint_offset_accumulates() {
    let mut arena = arena();
    let root = arena.create("root", "root");
    let child = arena.create("c", "c");
    arena.mount(child, root);
    arena.get_mut(root).unwrap().frame = RectF::new(10.0, 20.0, 100.0, 100.0);
    arena.get_mut(child).unwrap().frame = RectF::new(5.0, 5.0, 10.0, 10.0);
    arena.get_mut(child).unwrap().render.translate = OffsetF::new(0.0, 30.0);
    assert_eq!(arena.paint_offset(child), OffsetF::new(15.0, 55.0));
}

#[test]
fn test_descendants_preorder() {
    let mut arena = arena();
    let root = arena.create("root", "root");
    let a = arena.create("a", "a");
    let a1 = arena.create("a1", "a1");
    let b = arena.create("b", "b");
    arena.mount(a, root);
    arena.mount(a1, a);
    arena.mount(b, root);
    assert_eq!(arena.descendants(root), vec![root, a, a1, b]);
}

// =============================================================================
// Dimension Tests
// =============================================================================

#[test]
fn test_dimension_parse_units() {
    assert_eq!("12px".parse::<Dimension>().unwrap(), Dimension::px(12.0));
    assert_eq!("8vp".parse::<Dimension>().unwrap(), Dimension::vp(8.0));
    assert_eq!("8".parse::<Dimension>().unwrap(), Dimension::vp(8.0));
    assert_eq!("50%".parse::<Dimension>().unwrap(), Dimension::percent(0.5));
}

#[test]
fn test_dimension_parse_errors() {
    assert_eq!("".parse::<Dimension>(), Err(DimensionParseError::Empty));
    assert!(matches!("abc".parse::<Dimension>(), Err(DimensionParseError::InvalidNumber(_))));
    assert!(matches!("4em".parse::<Dimension>(), Err(DimensionParseError::UnknownUnit(_))));
}

#[test]
fn test_dimension_to_px() {
    assert_eq!(Dimension::vp(8.0).to_px(2.0), 16.0);
    assert_eq!(Dimension::px(8.0).to_px(2.0), 8.0);
    assert_eq!(Dimension::percent(0.5).to_px(2.0), 0.0);
    assert_eq!(Dimension::percent(0.5).to_px_with_size(800.0, 2.0), 400.0);
}
