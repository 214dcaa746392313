use line_chunked_core::path::command_count;
use line_chunked_core::{Accessor, AttrValue, IsNext, LineChunked, attr_map};
use line_chunked_render::{
    ChunkedLineBinding, DEFINED_CLASS, DEFINED_POINT_CLASS, SvgElement, UNDEFINED_CLASS,
};

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

fn render(chunked: &LineChunked<Sample>, data: &[Sample]) -> SvgElement {
    let mut container = SvgElement::new("g");
    ChunkedLineBinding::new().render(chunked, &mut container, data);
    container
}

fn num(node: roxmltree::Node<'_, '_>, name: &str) -> f64 {
    node.attribute(name)
        .unwrap_or_else(|| panic!("missing {name}"))
        .parse()
        .expect("numeric attribute")
}

/// `(x, width, y, height)` of every clip rectangle.
fn rects(container: &SvgElement) -> Vec<(f64, f64, f64, f64)> {
    let svg = container.to_svg();
    let doc = roxmltree::Document::parse(&svg).expect("svg parses");
    doc.descendants()
        .filter(|n| n.has_tag_name("rect"))
        .map(|n| (num(n, "x"), num(n, "width"), num(n, "y"), num(n, "height")))
        .collect()
}

fn count_class(container: &SvgElement, class: &str) -> usize {
    let svg = container.to_svg();
    let doc = roxmltree::Document::parse(&svg).expect("svg parses");
    doc.descendants()
        .filter(|n| n.attribute("class") == Some(class))
        .count()
}

fn path_d(container: &SvgElement, class: &str) -> String {
    let svg = container.to_svg();
    let doc = roxmltree::Document::parse(&svg).expect("svg parses");
    doc.descendants()
        .find(|n| n.has_tag_name("path") && n.attribute("class") == Some(class))
        .and_then(|n| n.attribute("d"))
        .unwrap_or_else(|| panic!("no {class} path"))
        .to_string()
}

#[test]
fn empty_data() {
    let container = render(&LineChunked::new(), &[]);
    assert_eq!(command_count(&path_d(&container, DEFINED_CLASS)), 0);
    assert_eq!(command_count(&path_d(&container, UNDEFINED_CLASS)), 0);
    assert_eq!(count_class(&container, DEFINED_POINT_CLASS), 0);
    assert!(rects(&container).is_empty());
}

#[test]
fn one_data_point() {
    let container = render(&LineChunked::new(), &[(0.0, Some(1.0))]);
    assert_eq!(command_count(&path_d(&container, DEFINED_CLASS)), 1);
    assert_eq!(command_count(&path_d(&container, UNDEFINED_CLASS)), 1);
    assert_eq!(count_class(&container, DEFINED_POINT_CLASS), 1);
    assert_eq!(rects(&container).len(), 1);
}

#[test]
fn many_data_points() {
    let data = [(0.0, Some(1.0)), (1.0, Some(2.0)), (2.0, Some(1.0))];
    let container = render(&chunked(0.0), &data);
    assert_eq!(command_count(&path_d(&container, DEFINED_CLASS)), 3);
    assert_eq!(command_count(&path_d(&container, UNDEFINED_CLASS)), 3);
    assert_eq!(count_class(&container, DEFINED_POINT_CLASS), 0);
    assert_eq!(rects(&container), vec![(0.0, 2.0, 1.0, 1.0)]);
}

#[test]
fn many_data_points_some_undefined() {
    let container = render(&chunked(0.0), &sparse());
    assert_eq!(command_count(&path_d(&container, DEFINED_CLASS)), 5);
    assert_eq!(command_count(&path_d(&container, UNDEFINED_CLASS)), 5);
    assert_eq!(count_class(&container, DEFINED_POINT_CLASS), 1);
    assert_eq!(
        rects(&container),
        vec![(0.0, 1.0, 1.0, 2.0), (4.0, 0.0, 1.0, 2.0), (6.0, 1.0, 1.0, 2.0)]
    );
}

#[test]
fn stroke_width_clipping_adjustments() {
    let container = render(&chunked(2.0), &sparse());
    assert_eq!(
        rects(&container),
        vec![
            (-2.0, 3.0, -1.0, 6.0),
            (4.0, 0.0, -1.0, 6.0),
            (6.0, 3.0, -1.0, 6.0)
        ]
    );
}

#[test]
fn markup_structure_and_clip_reference() {
    let mut container = SvgElement::new("g");
    let mut binding = ChunkedLineBinding::with_clip_path_id("clip-a");
    binding.render(&LineChunked::new(), &mut container, &sparse()[..2]);

    let svg = container.to_svg();
    let doc = roxmltree::Document::parse(&svg).expect("svg parses");
    let tags: Vec<&str> = doc
        .root_element()
        .children()
        .filter(|n| n.is_element())
        .map(|n| n.tag_name().name())
        .collect();
    assert_eq!(tags, vec!["defs", "path", "path"]);

    let clip = doc
        .descendants()
        .find(|n| n.has_tag_name("clipPath"))
        .expect("clipPath");
    assert_eq!(clip.attribute("id"), Some("clip-a"));
    assert_eq!(clip.parent_element().map(|p| p.tag_name().name()), Some("defs"));

    let defined = doc
        .descendants()
        .find(|n| n.attribute("class") == Some(DEFINED_CLASS))
        .expect("defined path");
    assert_eq!(defined.attribute("clip-path"), Some("url(#clip-a)"));
    assert_eq!(defined.attribute("stroke"), Some("#222"));
    assert_eq!(defined.attribute("stroke-width"), Some("1.5"));
    assert_eq!(defined.attribute("fill"), Some("none"));

    let gap = doc
        .descendants()
        .find(|n| n.attribute("class") == Some(UNDEFINED_CLASS))
        .expect("gap path");
    assert_eq!(gap.attribute("clip-path"), None);
    assert_eq!(gap.attribute("stroke"), Some("#222"));
    assert_eq!(gap.attribute("stroke-dasharray"), Some("2 2"));
    assert_eq!(gap.attribute("stroke-opacity"), Some("0.2"));
}

#[test]
fn styles_land_in_the_style_attribute() {
    let chunked = LineChunked::<Sample>::new()
        .with_line_styles(attr_map([("stroke", "steelblue")]))
        .with_gap_styles(attr_map([("stroke", "gray")]));
    let container = render(&chunked, &sparse()[..2]);
    let svg = container.to_svg();
    let doc = roxmltree::Document::parse(&svg).expect("svg parses");
    let style_of = |class: &str| {
        doc.descendants()
            .find(|n| n.attribute("class") == Some(class))
            .and_then(|n| n.attribute("style"))
            .map(str::to_string)
    };
    assert_eq!(style_of(DEFINED_CLASS).as_deref(), Some("stroke: steelblue;"));
    assert_eq!(style_of(UNDEFINED_CLASS).as_deref(), Some("stroke: gray;"));
}

#[test]
fn point_markers_follow_the_line_stroke_unless_overridden() {
    let container = render(&LineChunked::new(), &[(3.0, Some(4.0))]);
    let svg = container.to_svg();
    let doc = roxmltree::Document::parse(&svg).expect("svg parses");
    let circle = doc
        .descendants()
        .find(|n| n.has_tag_name("circle"))
        .expect("marker");
    assert_eq!(circle.attribute("class"), Some(DEFINED_POINT_CLASS));
    assert_eq!(num(circle, "cx"), 3.0);
    assert_eq!(num(circle, "cy"), 4.0);
    assert_eq!(num(circle, "r"), 2.5);
    assert_eq!(circle.attribute("fill"), Some("#222"));

    let overridden = LineChunked::<Sample>::new().with_point_attrs(attr_map([
        ("fill", AttrValue::from("red")),
        ("r", AttrValue::from(4.0)),
    ]));
    let container = render(&overridden, &[(3.0, Some(4.0))]);
    let svg = container.to_svg();
    let doc = roxmltree::Document::parse(&svg).expect("svg parses");
    let circle = doc
        .descendants()
        .find(|n| n.has_tag_name("circle"))
        .expect("marker");
    assert_eq!(num(circle, "r"), 4.0);
    assert_eq!(circle.attribute("fill"), Some("red"));
}

#[test]
fn rendering_twice_gives_identical_markup() {
    let chunked = chunked(2.0);
    let mut container = SvgElement::new("g");
    let mut binding = ChunkedLineBinding::new();
    binding.render(&chunked, &mut container, &sparse());
    let first = container.to_svg();
    binding.render(&chunked, &mut container, &sparse());
    assert_eq!(container.to_svg(), first);
    assert_eq!(binding.state().renders(), 2);
}

#[test]
fn re_rendering_with_fewer_runs_removes_shapes_immediately() {
    let chunked = chunked(0.0);
    let mut container = SvgElement::new("g");
    let mut binding = ChunkedLineBinding::new();
    binding.render(&chunked, &mut container, &sparse());
    binding.render(&chunked, &mut container, &sparse()[..2]);
    assert_eq!(rects(&container), vec![(0.0, 1.0, 1.0, 1.0)]);
    assert_eq!(count_class(&container, DEFINED_POINT_CLASS), 0);
    assert_eq!(path_d(&container, DEFINED_CLASS), "M0,1L1,2");
}

#[test]
fn defined_and_is_next_produce_the_same_clip_path() {
    let mut by_defined = SvgElement::new("g");
    ChunkedLineBinding::new().render(&chunked(0.0), &mut by_defined, &sparse());

    let filtered: Vec<Sample> = sparse().into_iter().filter(|d| d.1.is_some()).collect();
    let by_is_next_chunked = LineChunked::<Sample>::new()
        .with_line_attrs(attr_map([("stroke-width", 0)]))
        .with_is_next(IsNext::new(|prev: &Sample, curr: &Sample| {
            curr.0 == prev.0 + 1.0
        }));
    let mut by_is_next = SvgElement::new("g");
    ChunkedLineBinding::new().render(&by_is_next_chunked, &mut by_is_next, &filtered);

    let clip_inner = |container: &SvgElement| {
        container.descendants_by_tag("clipPath")[0].inner_svg()
    };
    assert!(!clip_inner(&by_defined).is_empty());
    assert_eq!(clip_inner(&by_defined), clip_inner(&by_is_next));
}

#[test]
fn moving_to_another_container_starts_fresh() {
    let chunked = chunked(0.0);
    let mut binding = ChunkedLineBinding::new();
    let mut first = SvgElement::new("g");
    let mut second = SvgElement::new("g");
    binding.render(&chunked, &mut first, &sparse());
    binding.render(&chunked, &mut second, &sparse());
    assert_eq!(binding.state().renders(), 1);
    assert_eq!(binding.state().container(), Some(second.node_id()));
    assert_eq!(first.to_svg(), second.to_svg());
}

#[test]
fn default_clip_path_id_carries_the_binding_id() {
    let binding = ChunkedLineBinding::new();
    assert_eq!(
        binding.clip_path_id(),
        format!("line-chunked-clip-path-{}", binding.id())
    );
    let other = ChunkedLineBinding::new();
    assert_ne!(other.id(), binding.id());
    assert_ne!(other.clip_path_id(), binding.clip_path_id());
}
