use line_chunked_core::path::command_count;
use line_chunked_core::{Accessor, ChunkGeometry, IsNext, LineChunked, RunKind, attr_map};

type Sample = (f64, Option<f64>);

fn sparse() -> Vec<Sample> {
    vec![
        (0.0, Some(1.0)),
        (1.0, Some(2.0)),
        (2.0, None),
        (3.0, None),
        (4.0, Some(1.0)),
        (5.0, None),
        (6.0, Some(2.0)),
        (7.0, Some(3.0)),
    ]
}

fn chunked(stroke_width: f64) -> LineChunked<Sample> {
    LineChunked::new()
        .with_line_attrs(attr_map([("stroke-width", stroke_width)]))
        .with_defined(Accessor::new(|d: &Sample, _| d.1.is_some()))
}

fn rects(geometry: &ChunkGeometry) -> Vec<(f64, f64, f64, f64)> {
    geometry
        .clip_rects
        .iter()
        .map(|r| (r.x, r.width, r.y, r.height))
        .collect()
}

#[test]
fn empty_data() {
    let geometry = LineChunked::<Sample>::new().compute(&[]);
    assert_eq!(command_count(&geometry.defined_path), 0);
    assert_eq!(command_count(&geometry.gap_path), 0);
    assert!(geometry.markers.is_empty());
    assert!(geometry.clip_rects.is_empty());
    assert!(geometry.runs.is_empty());
}

#[test]
fn one_data_point() {
    let geometry = LineChunked::<Sample>::new().compute(&[(0.0, Some(1.0))]);
    assert_eq!(command_count(&geometry.defined_path), 1);
    assert_eq!(command_count(&geometry.gap_path), 1);
    assert_eq!(geometry.markers.len(), 1);
    assert_eq!(geometry.clip_rects.len(), 1);
}

#[test]
fn many_data_points() {
    let data = vec![(0.0, Some(1.0)), (1.0, Some(2.0)), (2.0, Some(1.0))];
    let geometry = chunked(0.0).compute(&data);
    assert_eq!(command_count(&geometry.defined_path), 3);
    assert_eq!(command_count(&geometry.gap_path), 3);
    assert!(geometry.markers.is_empty());
    assert_eq!(rects(&geometry), vec![(0.0, 2.0, 1.0, 1.0)]);
}

#[test]
fn many_data_points_some_undefined() {
    let geometry = chunked(0.0).compute(&sparse());
    assert_eq!(command_count(&geometry.defined_path), 5);
    assert_eq!(command_count(&geometry.gap_path), 5);
    assert_eq!(geometry.markers.len(), 1);
    assert_eq!(
        rects(&geometry),
        vec![(0.0, 1.0, 1.0, 2.0), (4.0, 0.0, 1.0, 2.0), (6.0, 1.0, 1.0, 2.0)]
    );
}

#[test]
fn stroke_width_clipping_adjustments() {
    let geometry = chunked(2.0).compute(&sparse());
    assert_eq!(
        rects(&geometry),
        vec![
            (-2.0, 3.0, -1.0, 6.0),
            (4.0, 0.0, -1.0, 6.0),
            (6.0, 3.0, -1.0, 6.0)
        ]
    );
}

#[test]
fn defined_and_is_next_find_the_same_gaps() {
    let by_defined = chunked(0.0).compute(&sparse());

    let filtered: Vec<Sample> = sparse().into_iter().filter(|d| d.1.is_some()).collect();
    let by_is_next = LineChunked::<Sample>::new()
        .with_line_attrs(attr_map([("stroke-width", 0)]))
        .with_is_next(IsNext::new(|prev: &Sample, curr: &Sample| {
            curr.0 == prev.0 + 1.0
        }))
        .compute(&filtered);

    assert_eq!(by_defined.clip_rects, by_is_next.clip_rects);
    assert_eq!(by_defined.markers.len(), by_is_next.markers.len());
    assert_eq!(by_defined.defined_path, by_is_next.defined_path);
    assert_eq!(by_defined.gap_path, by_is_next.gap_path);

    let gaps = |g: &ChunkGeometry| {
        g.runs
            .iter()
            .filter(|r| matches!(r.kind, RunKind::Gap { .. }))
            .count()
    };
    assert_eq!(gaps(&by_defined), 2);
    assert_eq!(gaps(&by_is_next), 2);
}

#[test]
fn geometry_serializes_with_camel_case_keys() {
    let geometry = chunked(0.0).compute(&sparse());
    let json = serde_json::to_value(&geometry).expect("json");
    assert_eq!(json["clipRects"][1]["x"], 4.0);
    assert_eq!(json["runs"][1]["type"], "gap");
    assert_eq!(json["runs"][1]["before"], 1);
    assert_eq!(json["runs"][0]["startIndex"], 0);
    assert_eq!(json["definedPath"], "M0,1L1,2M4,1ZM6,2L7,3");
}
