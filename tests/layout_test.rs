//! Layout engine: widths, placement, collapse/expand behaviour

use rstest::{fixture, rstest};

use treeflow::domain::layout::{LEVEL_GAP, NODE_HEIGHT, NODE_WIDTH, SIBLING_GAP};
use treeflow::domain::{
    compute_layout, subtree_width, Layout, LayoutSpec, SubtreeWidths, TreeArena, TreeBuilder,
    TreeNode, VisibilitySet,
};
use treeflow::util::testing::{init_test_setup, sample_tree};

const EPS: f64 = 1e-9;

#[fixture]
fn sample() -> TreeArena {
    init_test_setup();
    TreeBuilder::new().build_from_tree(&sample_tree()).unwrap()
}

fn visible(ids: &[&str]) -> VisibilitySet {
    ids.iter().copied().collect()
}

fn layout(tree: &TreeArena, ids: &[&str]) -> Layout {
    compute_layout(tree, &visible(ids), &LayoutSpec::default()).unwrap()
}

fn ids(layout: &Layout) -> Vec<&str> {
    layout.nodes.iter().map(|n| n.id.as_str()).collect()
}

// ============================================================
// Scenarios
// ============================================================

#[test]
fn given_root_with_two_leaves_when_root_expanded_then_three_nodes_two_connectors() {
    let root = TreeNode::leaf("root", "Root", "").with_children(vec![
        TreeNode::leaf("A", "A", ""),
        TreeNode::leaf("B", "B", ""),
    ]);
    let tree = TreeBuilder::new().build_from_tree(&root).unwrap();

    let result = layout(&tree, &["root"]);

    assert_eq!(result.nodes.len(), 3);
    assert_eq!(result.connectors.len(), 2);
    let root = result.node("root").unwrap();
    let a = result.node("A").unwrap();
    let b = result.node("B").unwrap();
    assert!(a.x < b.x);
    assert_eq!(a.y, root.y + NODE_HEIGHT + LEVEL_GAP);
    assert_eq!(b.y, root.y + NODE_HEIGHT + LEVEL_GAP);
    assert!(a.is_leaf && b.is_leaf && !root.is_leaf);
    assert_eq!(result.connectors[0].source_id, "root");
    assert_eq!(result.connectors[0].target_id, "A");
    assert_eq!(result.connectors[1].target_id, "B");
}

#[test]
fn given_root_with_two_leaves_when_root_collapsed_then_only_root() {
    let root = TreeNode::leaf("root", "Root", "").with_children(vec![
        TreeNode::leaf("A", "A", ""),
        TreeNode::leaf("B", "B", ""),
    ]);
    let tree = TreeBuilder::new().build_from_tree(&root).unwrap();

    let result = layout(&tree, &[]);

    assert_eq!(ids(&result), vec!["root"]);
    assert!(result.connectors.is_empty());
}

#[rstest]
fn given_initial_visibility_when_laying_out_then_exact_positions(sample: TreeArena) {
    let result = layout(&sample, &["root", "A", "B"]);

    assert_eq!(ids(&result), vec!["root", "A", "A1", "A2", "B", "B1", "B2"]);
    let pos = |id: &str| {
        let n = result.node(id).unwrap();
        (n.x, n.y)
    };
    assert_eq!(pos("root"), (520.0, 40.0));
    assert_eq!(pos("A"), (330.0, 220.0));
    assert_eq!(pos("B"), (710.0, 220.0));
    assert_eq!(pos("A1"), (235.0, 400.0));
    assert_eq!(pos("A2"), (425.0, 400.0));
    assert_eq!(pos("B1"), (615.0, 400.0));
    assert_eq!(pos("B2"), (805.0, 400.0));
    assert_eq!(result.connectors.len(), 6);
    assert!(result.nodes.iter().all(|n| n.width == NODE_WIDTH));
}

#[rstest]
fn given_expanded_service_when_laying_out_then_module_widens(sample: TreeArena) {
    let visibility = visible(&["root", "A", "B", "A1"]);
    let spec = LayoutSpec::default();

    let a = sample.find("A").unwrap();
    let root = sample.find("root").unwrap();
    assert_eq!(subtree_width(&sample, a, &visibility, &spec), 540.0);
    assert_eq!(subtree_width(&sample, root, &visibility, &spec), 920.0);

    let result = compute_layout(&sample, &visibility, &spec).unwrap();
    assert!(result.contains("A1-1"));
    assert!(result.contains("A1-2"));
    assert!(!result.contains("A1-1-1"), "A1-1 is collapsed");
}

// ============================================================
// Properties
// ============================================================

#[rstest]
#[case::nothing(&[])]
#[case::root_only(&["root"])]
#[case::initial(&["root", "A", "B"])]
#[case::mixed(&["root", "A", "B", "A1", "A1-1", "B2"])]
#[case::hidden_members(&["root", "B", "A1", "A1-1"])]
#[case::everything(&["root", "A", "A1", "A1-1", "A1-1-1", "A1-2", "A2", "A2-1", "B", "B1", "B1-1", "B2", "B2-1", "B2-2"])]
fn given_any_visibility_then_layout_invariants_hold(sample: TreeArena, #[case] expanded: &[&str]) {
    let spec = LayoutSpec::default();
    let visibility = visible(expanded);
    let widths = SubtreeWidths::compute(&sample, &visibility, &spec);
    let result = compute_layout(&sample, &visibility, &spec).unwrap();

    // Root at the anchor
    let root = &result.nodes[0];
    assert_eq!(root.id, "root");
    assert_eq!((root.x, root.y), (spec.anchor_x - spec.node_width / 2.0, spec.anchor_y));

    // Memoized widths agree with the recursive definition and never shrink below a box
    for (idx, _) in sample.iter() {
        let w = widths.get(idx, &spec);
        assert_eq!(w, subtree_width(&sample, idx, &visibility, &spec));
        assert!(w >= NODE_WIDTH);
    }

    // One connector per non-root node
    assert_eq!(result.connectors.len(), result.nodes.len() - 1);

    for parent in &result.nodes {
        let node = sample.get_node(sample.find(&parent.id).unwrap()).unwrap();
        let children: Vec<_> = node
            .children
            .iter()
            .filter_map(|&c| {
                let id = &sample.get_node(c)?.data.id;
                result.node(id).map(|n| (n, widths.get(c, &spec)))
            })
            .collect();

        if !visibility.is_expanded(&parent.id) {
            assert!(children.is_empty(), "{} is collapsed", parent.id);
            continue;
        }
        assert_eq!(children.len(), node.children.len());
        if children.is_empty() {
            continue;
        }

        // Span of children equals the parent's width and is centered under it
        let span: f64 = children.iter().map(|(_, w)| w).sum::<f64>()
            + (children.len() - 1) as f64 * SIBLING_GAP;
        let parent_width = widths.get(sample.find(&parent.id).unwrap(), &spec);
        assert!((span - parent_width).abs() < EPS);
        let (first, first_w) = children[0];
        let (last, last_w) = children[children.len() - 1];
        let left = first.center_x() - first_w / 2.0;
        let right = last.center_x() + last_w / 2.0;
        assert!(((left + right) / 2.0 - parent.center_x()).abs() < EPS);

        // Left to right, disjoint subtree intervals
        for pair in children.windows(2) {
            let ((a, aw), (b, bw)) = (pair[0], pair[1]);
            assert!(a.center_x() < b.center_x());
            let a_right = a.center_x() + aw / 2.0;
            let b_left = b.center_x() - bw / 2.0;
            assert!(b_left - a_right >= SIBLING_GAP - EPS);
            assert_eq!(a.y, parent.y + spec.level_step());
        }
    }
}

#[rstest]
fn given_collapse_then_expand_when_laying_out_then_identical_layout(sample: TreeArena) {
    let base = ["root", "A", "B", "A1", "B2"];
    let before = layout(&sample, &base);

    let collapsed = layout(&sample, &["root", "B", "A1", "B2"]);
    assert!(!collapsed.contains("A1"));
    assert!(!collapsed.contains("A2"));
    assert!(collapsed.connectors.iter().all(|c| c.source_id != "A"));

    let after = layout(&sample, &base);
    assert_eq!(before, after);
}

#[rstest]
fn given_collapsed_node_when_laying_out_then_descendants_removed(sample: TreeArena) {
    let open = layout(&sample, &["root", "A", "B", "A1", "A1-1"]);
    let closed = layout(&sample, &["root", "A", "B", "A1-1"]);

    for hidden in ["A1-1", "A1-2", "A1-1-1"] {
        assert!(open.contains(hidden));
        assert!(!closed.contains(hidden));
        assert!(closed.connectors.iter().all(|c| c.target_id != hidden));
    }
    // A1-1 stays a member but is unreachable
    assert!(closed.contains("A1"));
}

#[rstest]
#[case("A1")]
#[case("B")]
#[case("B2")]
#[case("A")]
fn given_toggle_when_laying_out_then_sibling_order_elsewhere_preserved(
    sample: TreeArena,
    #[case] toggled: &str,
) {
    let base = visible(&["root", "A", "B", "A1", "B1"]);
    let mut changed = base.clone();
    changed.toggle(toggled);

    let spec = LayoutSpec::default();
    let before = compute_layout(&sample, &base, &spec).unwrap();
    let after = compute_layout(&sample, &changed, &spec).unwrap();

    for (_, node) in sample.iter() {
        let siblings: Vec<&str> = node
            .children
            .iter()
            .filter_map(|&c| sample.get_node(c).map(|n| n.data.id.as_str()))
            .filter(|id| before.contains(id) && after.contains(id))
            .collect();
        for pair in siblings.windows(2) {
            let b = |l: &Layout, id: &str| l.node(id).unwrap().x;
            assert!(b(&before, pair[0]) < b(&before, pair[1]));
            assert!(b(&after, pair[0]) < b(&after, pair[1]));
        }
    }
}

#[rstest]
fn given_leaf_member_when_laying_out_then_positions_unchanged(sample: TreeArena) {
    let without = layout(&sample, &["root", "A", "B", "A2"]);
    let with_leaf = layout(&sample, &["root", "A", "B", "A2", "A2-1"]);

    assert_eq!(ids(&without), ids(&with_leaf));
    assert_eq!(without.connectors, with_leaf.connectors);
    for (a, b) in without.nodes.iter().zip(&with_leaf.nodes) {
        assert_eq!((a.x, a.y), (b.x, b.y), "{}", a.id);
    }
    assert!(with_leaf.node("A2-1").unwrap().is_leaf);
}

#[rstest]
fn given_custom_spec_when_laying_out_then_anchor_and_gaps_follow(sample: TreeArena) {
    let spec = LayoutSpec {
        node_width: 100.0,
        node_height: 40.0,
        level_gap: 20.0,
        sibling_gap: 10.0,
        anchor_x: 0.0,
        anchor_y: 0.0,
        ..LayoutSpec::default()
    };
    let result = compute_layout(&sample, &visible(&["root"]), &spec).unwrap();

    let a = result.node("A").unwrap();
    let b = result.node("B").unwrap();
    assert_eq!((a.x, a.y), (-105.0, 60.0));
    assert_eq!((b.x, b.y), (5.0, 60.0));
    assert_eq!(result.node("root").unwrap().x, -50.0);
}
