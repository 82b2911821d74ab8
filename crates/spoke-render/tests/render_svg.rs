mod support;

use spoke_core::RenderConfig;
use spoke_render::Scene;
use spoke_render::scene::Layer;

#[test]
fn layers_paint_back_to_front() {
    let config = RenderConfig::default();
    let svg = Scene::build(&support::layout(&config), &config).to_svg();
    let expected: Vec<&str> = Layer::PAINT_ORDER.iter().map(|l| l.class()).collect();
    assert_eq!(support::layer_order(&svg), expected);
}

#[test]
fn every_element_class_is_emitted() {
    let config = RenderConfig::default();
    let svg = Scene::build(&support::layout(&config), &config).to_svg();
    let doc = roxmltree::Document::parse(&svg).unwrap();
    let count = |class: &str| {
        doc.descendants()
            .filter(|n| n.attribute("class") == Some(class))
            .count()
    };
    assert_eq!(count("wedge"), 9);
    assert_eq!(count("ring"), 5);
    assert_eq!(count("ring-label"), 5);
    assert_eq!(count("spoke"), 9);
    assert_eq!(count("axis-label"), 9);
    assert_eq!(count("fill"), 2);
    assert_eq!(count("outline"), 2);
    assert_eq!(count("marker"), 18);
    assert_eq!(count("hit-target"), 18);
    assert_eq!(count("legend-item"), 5);
}

#[test]
fn long_axis_labels_wrap_into_tspans() {
    let config = RenderConfig::default();
    let svg = Scene::build(&support::layout(&config), &config).to_svg();
    let doc = roxmltree::Document::parse(&svg).unwrap();
    let label = doc
        .descendants()
        .filter(|n| n.attribute("class") == Some("axis-label"))
        .find(|n| {
            n.children()
                .filter_map(|t| t.text())
                .any(|t| t.starts_with("Evidence"))
        })
        .expect("label present");
    let lines: Vec<&str> = label.children().filter_map(|t| t.text()).collect();
    assert_eq!(lines, ["Evidence-Backed", "Strategies"]);
}

#[test]
fn ring_labels_use_the_configured_format() {
    let layer: spoke_core::ConfigOverrides =
        serde_json::from_value(serde_json::json!({ "format": ".1f", "levels": 4 })).unwrap();
    let config = RenderConfig::resolve([&layer]).unwrap();
    let svg = Scene::build(&support::layout(&config), &config).to_svg();
    for label in ["2.0", "4.0", "6.0", "8.0"] {
        assert!(svg.contains(&format!(">{label}</text>")), "missing {label}");
    }
}

#[test]
fn dashed_series_carry_a_dasharray() {
    let layer: spoke_core::ConfigOverrides =
        serde_json::from_value(serde_json::json!({ "styles": ["dashed", "solid"] })).unwrap();
    let config = RenderConfig::resolve([&layer]).unwrap();
    let svg = Scene::build(&support::layout(&config), &config).to_svg();
    let doc = roxmltree::Document::parse(&svg).unwrap();
    let dashes: Vec<Option<&str>> = doc
        .descendants()
        .filter(|n| n.attribute("class") == Some("outline"))
        .map(|n| n.attribute("stroke-dasharray"))
        .collect();
    assert_eq!(dashes, [Some("6,4"), None]);
}
