use std::rc::Rc;

use anyhow::Result as AnyhowResult;
use flex_layout::{
    AlignContent, AlignItems, AlignSelf, Direction, Edge, FlexDirection, FlexTree, FlexWrap, JustifyContent, NodeId,
    PositionType, Rect, Size, StyleValue,
};

fn row(tree: &mut FlexTree, width: f64, height: f64) -> AnyhowResult<NodeId> {
    let id = tree.new_node();
    tree.set_flex_direction(id, FlexDirection::Row)?;
    tree.set_width(id, StyleValue::Length(width))?;
    tree.set_height(id, StyleValue::from(height))?;
    Ok(id)
}

fn sized_child(tree: &mut FlexTree, parent: NodeId, width: f64, height: f64) -> AnyhowResult<NodeId> {
    let child = tree.new_node();
    tree.set_width(child, StyleValue::Length(width))?;
    tree.set_height(child, StyleValue::Length(height))?;
    tree.append(parent, child)?;
    Ok(child)
}

fn lefts(tree: &FlexTree, ids: &[NodeId]) -> AnyhowResult<Vec<f64>> {
    ids.iter().map(|&id| Ok(tree.layout(id)?.left())).collect()
}

/// Free space goes before, between or around items depending on `justify-content`.
#[test]
fn justify_content_distribution() -> AnyhowResult<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let cases = [
        (JustifyContent::Start, vec![0.0, 50.0]),
        (JustifyContent::Center, vec![100.0, 150.0]),
        (JustifyContent::End, vec![200.0, 250.0]),
        (JustifyContent::SpaceBetween, vec![0.0, 250.0]),
        (JustifyContent::SpaceAround, vec![50.0, 200.0]),
        (JustifyContent::SpaceEvenly, vec![67.0, 183.0]),
    ];
    for (justify, expected) in cases {
        let mut tree = FlexTree::new();
        let root = row(&mut tree, 300.0, 50.0)?;
        tree.set_justify_content(root, justify)?;
        let first = sized_child(&mut tree, root, 50.0, 20.0)?;
        let second = sized_child(&mut tree, root, 50.0, 20.0)?;
        tree.calculate(root, f64::NAN, f64::NAN, Direction::Ltr)?;
        assert_eq!(lefts(&tree, &[first, second])?, expected, "{justify:?}");
    }
    Ok(())
}

/// Auto margins on the main axis soak up the free space before justification does.
#[test]
fn auto_margins_center_on_main_axis() -> AnyhowResult<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut tree = FlexTree::new();
    let root = row(&mut tree, 300.0, 50.0)?;
    tree.set_justify_content(root, JustifyContent::End)?;
    let child = sized_child(&mut tree, root, 50.0, 20.0)?;
    tree.set_margin(child, Some(StyleValue::Auto), Edge::HORIZONTAL)?;

    tree.calculate(root, f64::NAN, f64::NAN, Direction::Ltr)?;
    assert_eq!(tree.frame(child, 0.0, 0.0)?, Rect::new(125.0, 0.0, 50.0, 20.0));
    Ok(())
}

/// `align-items` positions items on the cross axis; `align-self` overrides it per item.
#[test]
fn align_items_and_self() -> AnyhowResult<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut tree = FlexTree::new();
    let root = row(&mut tree, 300.0, 100.0)?;
    tree.set_align_items(root, AlignItems::Center)?;
    let centered = sized_child(&mut tree, root, 50.0, 20.0)?;
    let ended = sized_child(&mut tree, root, 50.0, 20.0)?;
    tree.set_align_self(ended, AlignSelf::End)?;
    let stretched = tree.new_node();
    tree.set_width(stretched, StyleValue::Length(50.0))?;
    tree.set_align_self(stretched, AlignSelf::Stretch)?;
    tree.append(root, stretched)?;

    tree.calculate(root, f64::NAN, f64::NAN, Direction::Ltr)?;
    assert_eq!(tree.frame(centered, 0.0, 0.0)?, Rect::new(0.0, 40.0, 50.0, 20.0));
    assert_eq!(tree.frame(ended, 0.0, 0.0)?, Rect::new(50.0, 80.0, 50.0, 20.0));
    assert_eq!(tree.frame(stretched, 0.0, 0.0)?, Rect::new(100.0, 0.0, 50.0, 100.0));
    Ok(())
}

/// A right-to-left row starts at the right edge.
#[test]
fn rtl_row_starts_on_the_right() -> AnyhowResult<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut tree = FlexTree::new();
    let root = row(&mut tree, 300.0, 50.0)?;
    let first = sized_child(&mut tree, root, 50.0, 20.0)?;
    let second = sized_child(&mut tree, root, 50.0, 20.0)?;

    tree.calculate(root, f64::NAN, f64::NAN, Direction::Rtl)?;
    assert_eq!(lefts(&tree, &[first, second])?, vec![250.0, 200.0]);
    assert_eq!(tree.layout(root)?.direction(), Direction::Rtl);

    // An explicit direction on the node wins over the one passed in.
    tree.set_direction(root, Direction::Ltr)?;
    tree.calculate(root, f64::NAN, f64::NAN, Direction::Rtl)?;
    assert_eq!(lefts(&tree, &[first, second])?, vec![0.0, 50.0]);
    Ok(())
}

/// A reversed row lays items out from the right edge in reverse order.
#[test]
fn row_reverse_mirrors_main_axis() -> AnyhowResult<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut tree = FlexTree::new();
    let root = row(&mut tree, 300.0, 50.0)?;
    tree.set_flex_direction(root, FlexDirection::RowReverse)?;
    let first = sized_child(&mut tree, root, 50.0, 20.0)?;
    let second = sized_child(&mut tree, root, 60.0, 20.0)?;

    tree.calculate(root, f64::NAN, f64::NAN, Direction::Ltr)?;
    assert_eq!(lefts(&tree, &[first, second])?, vec![250.0, 190.0]);
    Ok(())
}

/// With `wrap-reverse` the first line sits at the far end of the cross axis.
#[test]
fn wrap_reverse_stacks_lines_upwards() -> AnyhowResult<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut tree = FlexTree::new();
    let root = row(&mut tree, 100.0, f64::NAN)?;
    tree.set_flex_wrap(root, FlexWrap::WrapReverse)?;
    let first = sized_child(&mut tree, root, 60.0, 20.0)?;
    let second = sized_child(&mut tree, root, 60.0, 20.0)?;

    tree.calculate(root, f64::NAN, f64::NAN, Direction::Ltr)?;
    assert_eq!(tree.frame(first, 0.0, 0.0)?, Rect::new(0.0, 20.0, 60.0, 20.0));
    assert_eq!(tree.frame(second, 0.0, 0.0)?, Rect::new(0.0, 0.0, 60.0, 20.0));
    assert_eq!(tree.frame(root, 0.0, 0.0)?, Rect::new(0.0, 0.0, 100.0, 40.0));
    Ok(())
}

/// Absolute children are placed by their insets and take no room in the line.
#[test]
fn absolute_children_use_insets() -> AnyhowResult<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut tree = FlexTree::new();
    let root = tree.new_node();
    tree.set_width(root, StyleValue::Length(200.0))?;
    tree.set_height(root, StyleValue::Length(200.0))?;

    let corner = sized_child(&mut tree, root, 50.0, 40.0)?;
    tree.set_position_type(corner, PositionType::Absolute)?;
    tree.set_position(corner, Some(StyleValue::Length(10.0)), Edge::RIGHT)?;
    tree.set_position(corner, Some(StyleValue::Length(20.0)), Edge::BOTTOM)?;

    let spanning = tree.new_node();
    tree.set_position_type(spanning, PositionType::Absolute)?;
    tree.set_position(spanning, Some(StyleValue::Length(10.0)), Edge::LEFT)?;
    tree.set_position(spanning, Some(StyleValue::Length(30.0)), Edge::RIGHT)?;
    tree.set_position(spanning, Some(StyleValue::Length(5.0)), Edge::TOP)?;
    tree.set_height(spanning, StyleValue::Length(10.0))?;
    tree.append(root, spanning)?;

    let in_flow = sized_child(&mut tree, root, 30.0, 30.0)?;

    tree.calculate(root, f64::NAN, f64::NAN, Direction::Ltr)?;
    assert_eq!(tree.frame(corner, 0.0, 0.0)?, Rect::new(140.0, 140.0, 50.0, 40.0));
    assert_eq!(tree.frame(spanning, 0.0, 0.0)?, Rect::new(10.0, 5.0, 160.0, 10.0));
    assert_eq!(tree.frame(in_flow, 0.0, 0.0)?, Rect::new(0.0, 0.0, 30.0, 30.0));
    Ok(())
}

/// Relative insets shift an item after layout without moving its siblings.
#[test]
fn relative_offsets_shift_only_the_item() -> AnyhowResult<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut tree = FlexTree::new();
    let root = row(&mut tree, 200.0, 50.0)?;
    let shifted = sized_child(&mut tree, root, 40.0, 20.0)?;
    tree.set_position_type(shifted, PositionType::Relative)?;
    tree.set_position(shifted, Some(StyleValue::Length(5.0)), Edge::LEFT)?;
    tree.set_position(shifted, Some(StyleValue::Length(3.0)), Edge::TOP)?;
    let sibling = sized_child(&mut tree, root, 40.0, 20.0)?;

    tree.calculate(root, f64::NAN, f64::NAN, Direction::Ltr)?;
    assert_eq!(tree.frame(shifted, 0.0, 0.0)?, Rect::new(5.0, 3.0, 40.0, 20.0));
    assert_eq!(tree.frame(sibling, 0.0, 0.0)?, Rect::new(40.0, 0.0, 40.0, 20.0));
    Ok(())
}

/// Baseline alignment lines items up on the first baseline each one reports.
#[test]
fn baseline_alignment_uses_callbacks() -> AnyhowResult<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut tree = FlexTree::new();
    let root = row(&mut tree, 200.0, f64::NAN)?;
    tree.set_align_items(root, AlignItems::Baseline)?;
    let short = tree.new_leaf(|_, _, _, _| Size::new(20.0, 20.0));
    tree.set_baseline(short, Some(Rc::new(|_: f64, height: f64| height * 0.75)))?;
    let tall = tree.new_leaf(|_, _, _, _| Size::new(20.0, 40.0));
    tree.append(root, short)?;
    tree.append(root, tall)?;

    tree.calculate(root, f64::NAN, f64::NAN, Direction::Ltr)?;
    assert_eq!(tree.frame(short, 0.0, 0.0)?, Rect::new(0.0, 25.0, 20.0, 20.0));
    assert_eq!(tree.frame(tall, 0.0, 0.0)?, Rect::new(20.0, 0.0, 20.0, 40.0));
    assert!((tree.layout(root)?.height() - 45.0).abs() < 0.001);
    Ok(())
}

/// `align-content` spreads wrapped lines over the container's cross size.
#[test]
fn align_content_spreads_lines() -> AnyhowResult<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut tree = FlexTree::new();
    let root = row(&mut tree, 100.0, 100.0)?;
    tree.set_flex_wrap(root, FlexWrap::Wrap)?;
    tree.set_align_content(root, AlignContent::SpaceBetween)?;
    let first = sized_child(&mut tree, root, 60.0, 20.0)?;
    let second = sized_child(&mut tree, root, 60.0, 20.0)?;

    tree.calculate(root, f64::NAN, f64::NAN, Direction::Ltr)?;
    assert!((tree.layout(first)?.top() - 0.0).abs() < 0.001);
    assert!((tree.layout(second)?.top() - 80.0).abs() < 0.001);
    Ok(())
}
