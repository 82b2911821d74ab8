use spoke_core::{AxisDefinition, Dataset, GroupColors, RenderConfig, Rgb, Score};
use spoke_render::RadarLayout;
use spoke_render::text::DeterministicTextMeasurer;

pub fn pillars() -> (Vec<AxisDefinition>, GroupColors) {
    let mut groups = GroupColors::new();
    groups.insert("Powerful Practice".to_string(), Rgb::new(0xf3, 0x46, 0x7c));
    groups.insert("Streamlined Systems".to_string(), Rgb::new(0x00, 0xad, 0xbb));
    groups.insert("Intentional Growth".to_string(), Rgb::new(0xff, 0xc7, 0x28));
    let axes = [
        ("Thematic Units", "Powerful Practice"),
        ("Session Structure", "Powerful Practice"),
        ("Evidence-Backed Strategies", "Powerful Practice"),
        ("Paperwork", "Streamlined Systems"),
        ("Data Collection", "Streamlined Systems"),
        ("Therapy Planning", "Streamlined Systems"),
        ("Individual Growth", "Intentional Growth"),
        ("School Collaboration", "Intentional Growth"),
        ("Community Impact", "Intentional Growth"),
    ]
    .into_iter()
    .map(|(a, g)| AxisDefinition::new(a, g))
    .collect();
    (axes, groups)
}

pub fn datasets() -> Vec<Dataset> {
    vec![
        Dataset::new("Baseline")
            .with_point("Thematic Units", 2.0)
            .with_point("Paperwork", 3.0)
            .with_point("Community Impact", 1.0),
        Dataset::new("Current")
            .with_point(
                "Thematic Units",
                Score::new(6.0).with_explanation("Weekly themes in place"),
            )
            .with_point("Paperwork", 5.5)
            .with_point("Community Impact", 7.0),
    ]
}

pub fn layout(config: &RenderConfig) -> RadarLayout {
    let (axes, groups) = pillars();
    spoke_render::compute_layout(
        &axes,
        &datasets(),
        &groups,
        config,
        &DeterministicTextMeasurer::default(),
    )
    .expect("layout")
}

/// Classes of every `<g>` that is a paint layer, in document order.
#[allow(dead_code)]
pub fn layer_order(svg: &str) -> Vec<String> {
    let doc = roxmltree::Document::parse(svg).expect("svg parses");
    doc.descendants()
        .filter(|n| n.has_tag_name("g"))
        .filter_map(|n| n.attribute("class"))
        .filter(|c| {
            spoke_render::scene::Layer::PAINT_ORDER
                .iter()
                .any(|l| l.class() == *c)
        })
        .map(str::to_string)
        .collect()
}
