use wgsl_common::position::{LineMap, Position};
use wgsl_common::Span;

#[test]
fn span_len_and_containment_are_half_open() {
    let span = Span::new(4, 9);
    assert_eq!(span.len(), 5);
    assert!(span.contains(4));
    assert!(!span.contains(9));
}

#[test]
fn span_merge_across_a_gap_covers_both() {
    let lhs = Span::new(0, 3);
    let rhs = Span::new(10, 12);
    assert_eq!(lhs.merge(rhs), Span::new(0, 12));
}

#[test]
fn line_map_tracks_multi_line_offsets() {
    let source = "struct S {\n  x: f32,\n}\n";
    let map = LineMap::build(source);
    let brace_offset = source.find('{').unwrap() as u32;
    assert_eq!(map.offset_to_position(brace_offset, source), Position::new(1, 11));

    let field_offset = source.find('x').unwrap() as u32;
    assert_eq!(map.offset_to_position(field_offset, source).line, 2);
}
