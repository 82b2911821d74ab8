mod support;

use spoke_core::RenderConfig;
use spoke_render::MountPoint;
use spoke_render::animate::SweepPhase;
use spoke_render::geom::Point;

fn marker_canvas_point(mount: &MountPoint, series: usize, vertex: usize) -> Point {
    let scene = mount.scene().unwrap();
    let c = scene.series[series].markers[vertex].center;
    Point::new(c.x + scene.center.x, c.y + scene.center.y)
}

#[test]
fn rerender_leaves_exactly_one_chart() {
    let config = RenderConfig::default();
    let layout = support::layout(&config);
    let mut mount = MountPoint::new("radar-root");
    mount.render(&layout, &config);
    mount.render(&layout, &config);

    let markup = mount.to_markup();
    let doc = roxmltree::Document::parse(&markup).unwrap();
    let svgs = doc.descendants().filter(|n| n.has_tag_name("svg")).count();
    let tooltips = doc
        .descendants()
        .filter(|n| n.attribute("class") == Some("tooltip"))
        .count();
    assert_eq!(svgs, 1);
    assert_eq!(tooltips, 1);
}

#[test]
fn animation_settles_with_full_clips() {
    let config = RenderConfig::default();
    let layout = support::layout(&config);
    let mut mount = MountPoint::new("radar-root");
    let handle = mount.render_animated(&layout, &config);

    let mut frames = 0;
    while !mount.advance(handle, 1.0 / 60.0) {
        frames += 1;
        assert!(frames < 600, "reveal never settled");
    }
    assert_eq!(mount.phase(), Some(SweepPhase::Settled));
    let scene = mount.scene().unwrap();
    let reveal = scene.reveal.as_ref().unwrap();
    assert!(reveal.is_fully_revealed());
    assert!(!reveal.sweep.visible);

    let svg = mount.svg().unwrap();
    let doc = roxmltree::Document::parse(&svg).unwrap();
    let clips: Vec<&str> = doc
        .descendants()
        .filter(|n| n.has_tag_name("clipPath"))
        .filter_map(|n| n.first_element_child())
        .filter_map(|p| p.attribute("d"))
        .collect();
    assert_eq!(clips.len(), 2);
    for d in clips {
        assert_eq!(d.matches('A').count(), 2, "expected a full disc, got {d}");
    }
}

#[test]
fn hover_emphasises_and_shows_the_tooltip() {
    let config = RenderConfig::default();
    let layout = support::layout(&config);
    let mut mount = MountPoint::new("radar-root");
    mount.render(&layout, &config);

    let at = marker_canvas_point(&mount, 1, 0);
    let hit = mount.pointer_move(at).expect("marker under pointer");
    assert_eq!((hit.series, hit.vertex), (1, 0));

    let fills: Vec<f64> = mount
        .scene()
        .unwrap()
        .series
        .iter()
        .map(|s| s.fill_opacity)
        .collect();
    assert_eq!(fills, [0.1, 0.7]);

    let tooltip = mount.tooltip().unwrap();
    assert!(tooltip.is_visible());
    assert_eq!(tooltip.position, Point::new(at.x + 10.0, at.y - 10.0));
    let html = tooltip.to_markup();
    assert!(html.contains("<strong>Thematic Units</strong>"));
    assert!(html.contains("Score: 6"));
    assert!(html.contains("<em>Weekly themes in place</em>"));

    mount.pointer_out();
    assert!(!mount.tooltip().unwrap().is_visible());
    assert!(
        mount
            .scene()
            .unwrap()
            .series
            .iter()
            .all(|s| s.fill_opacity == config.opacity_area)
    );
}

#[test]
fn moving_off_a_marker_hides_the_tooltip() {
    let config = RenderConfig::default();
    let layout = support::layout(&config);
    let mut mount = MountPoint::new("radar-root");
    mount.render(&layout, &config);

    mount.pointer_move(marker_canvas_point(&mount, 0, 3));
    assert!(mount.tooltip().unwrap().is_visible());
    assert_eq!(mount.pointer_move(Point::new(1.0, 1.0)), None);
    assert!(!mount.tooltip().unwrap().is_visible());
}
