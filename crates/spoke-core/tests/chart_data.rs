use spoke_core::{
    ChartData, ConfigOverrides, Error, LevelFormat, RenderConfig, Rgb, SeriesEncoding,
    SeriesStyle, StrokeStyle,
};

const PILLARS: &str = r##"
groups:
  - name: Powerful Practice
    color: "#F3467C"
    axes: [Thematic Units, Session Structure, Evidence-Backed Strategies]
  - name: Streamlined Systems
    color: "#00ADBB"
    axes: [Paperwork, Data Collection, Therapy Planning]
datasets:
  - name: Baseline
    points:
      Thematic Units: 2
      Paperwork: { value: 7, explanation: Templates adopted }
"##;

#[test]
fn yaml_chart_data_flattens_into_ordered_axes() {
    let data: ChartData = serde_yaml::from_str(PILLARS).unwrap();
    let axes = data.axes().unwrap();
    let names: Vec<&str> = axes.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "Thematic Units",
            "Session Structure",
            "Evidence-Backed Strategies",
            "Paperwork",
            "Data Collection",
            "Therapy Planning",
        ]
    );
    assert_eq!(axes[4].group, "Streamlined Systems");

    let colors = data.group_colors();
    assert_eq!(colors["Streamlined Systems"], Rgb::new(0x00, 0xad, 0xbb));

    let baseline = &data.datasets[0];
    assert_eq!(baseline.value_for("Session Structure"), 0.0);
    assert_eq!(
        baseline.point("Paperwork").and_then(|s| s.explanation.as_deref()),
        Some("Templates adopted")
    );
}

#[test]
fn bad_group_color_is_an_invalid_color_error() {
    let err = Rgb::parse("#12345").unwrap_err();
    assert!(matches!(err, Error::InvalidColor { .. }), "{err}");
    let parsed: Result<ChartData, _> =
        serde_yaml::from_str("groups: [{ name: G, color: nope, axes: [A] }]");
    assert!(parsed.is_err());
}

#[test]
fn programmatic_layers_override_file_layers() {
    let file: ConfigOverrides =
        serde_yaml::from_str("colors: ['#111111']\nformat: .1f\nlevels: 3\n").unwrap();
    let code = ConfigOverrides {
        encoding: Some(SeriesEncoding::custom(|i| SeriesStyle {
            color: Rgb::new(i as u8, 0, 0),
            stroke: if i % 2 == 0 {
                StrokeStyle::Solid
            } else {
                StrokeStyle::Dashed
            },
        })),
        level_format: Some(LevelFormat::custom(|v| format!("{v}pt"))),
        ..ConfigOverrides::default()
    };
    let cfg = RenderConfig::resolve([&file, &code]).unwrap();
    assert_eq!(cfg.levels, 3);
    assert_eq!(cfg.encoding.style(3).stroke, StrokeStyle::Dashed);
    assert_eq!(cfg.encoding.style(3).color, Rgb::new(3, 0, 0));
    assert_eq!(cfg.format.format(2.0), "2pt");
}

#[test]
fn empty_chart_has_no_axes() {
    let data: ChartData = serde_yaml::from_str("datasets: []").unwrap();
    assert!(matches!(data.axes(), Err(Error::NoAxes)));
}
