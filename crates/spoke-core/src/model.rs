use crate::color::Rgb;
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Group name → wedge/legend color, in group order.
pub type GroupColors = IndexMap<String, Rgb>;

/// One scored category. Its position in the axis list fixes its angle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisDefinition {
    pub name: String,
    pub group: String,
}

impl AxisDefinition {
    pub fn new(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
        }
    }
}

/// A named cluster of axes sharing a color ("pillar").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub color: Rgb,
    #[serde(default)]
    pub axes: Vec<String>,
}

impl Group {
    pub fn new<I, S>(name: impl Into<String>, color: Rgb, axes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            color,
            axes: axes.into_iter().map(Into::into).collect(),
        }
    }
}

/// A single axis score with an optional explanation for the hover tooltip.
///
/// Deserializes from either a bare number or `{ value, explanation }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ScoreRepr", into = "ScoreRepr")]
pub struct Score {
    pub value: f64,
    pub explanation: Option<String>,
}

impl Score {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            explanation: None,
        }
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }
}

impl From<f64> for Score {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum ScoreRepr {
    Bare(f64),
    Detailed {
        value: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        explanation: Option<String>,
    },
}

impl From<ScoreRepr> for Score {
    fn from(value: ScoreRepr) -> Self {
        match value {
            ScoreRepr::Bare(value) => Score::new(value),
            ScoreRepr::Detailed { value, explanation } => Score { value, explanation },
        }
    }
}

impl From<Score> for ScoreRepr {
    fn from(value: Score) -> Self {
        match value.explanation {
            None => ScoreRepr::Bare(value.value),
            Some(explanation) => ScoreRepr::Detailed {
                value: value.value,
                explanation: Some(explanation),
            },
        }
    }
}

/// One named series of scores keyed by axis name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub name: String,
    #[serde(default)]
    pub points: IndexMap<String, Score>,
}

impl Dataset {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: IndexMap::new(),
        }
    }

    pub fn with_point(mut self, axis: impl Into<String>, score: impl Into<Score>) -> Self {
        self.points.insert(axis.into(), score.into());
        self
    }

    pub fn point(&self, axis: &str) -> Option<&Score> {
        self.points.get(axis)
    }

    /// Score for `axis`; axes without a point count as zero.
    pub fn value_for(&self, axis: &str) -> f64 {
        self.points.get(axis).map(|s| s.value).unwrap_or(0.0)
    }

    /// Point keys that do not name any of `axes`.
    pub fn unknown_axes<'a>(&'a self, axes: &[AxisDefinition]) -> Vec<&'a str> {
        self.points
            .keys()
            .filter(|k| !axes.iter().any(|a| &a.name == *k))
            .map(String::as_str)
            .collect()
    }
}

/// Groups plus datasets: everything the engine draws besides configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub datasets: Vec<Dataset>,
}

impl ChartData {
    /// Flattens the groups into the ordered axis list.
    ///
    /// Group names must be unique and every axis must belong to exactly one group.
    pub fn axes(&self) -> Result<Vec<AxisDefinition>> {
        let mut groups: HashSet<&str> = HashSet::new();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut axes = Vec::new();
        for group in &self.groups {
            if !groups.insert(group.name.as_str()) {
                return Err(Error::DuplicateGroup {
                    group: group.name.clone(),
                });
            }
            for axis in &group.axes {
                if !seen.insert(axis.as_str()) {
                    return Err(Error::DuplicateAxis { axis: axis.clone() });
                }
                axes.push(AxisDefinition::new(axis.clone(), group.name.clone()));
            }
        }
        if axes.is_empty() {
            return Err(Error::NoAxes);
        }
        Ok(axes)
    }

    pub fn group_colors(&self) -> GroupColors {
        self.groups
            .iter()
            .map(|g| (g.name.clone(), g.color))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pillars() -> ChartData {
        ChartData {
            groups: vec![
                Group::new(
                    "Powerful Practice",
                    Rgb::new(0xf3, 0x46, 0x7c),
                    ["Thematic Units", "Session Structure"],
                ),
                Group::new("Streamlined Systems", Rgb::new(0x00, 0xad, 0xbb), ["Paperwork"]),
            ],
            datasets: vec![Dataset::new("Baseline").with_point("Paperwork", 7.0)],
        }
    }

    #[test]
    fn axes_follow_group_order() {
        let axes = pillars().axes().unwrap();
        let names: Vec<_> = axes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["Thematic Units", "Session Structure", "Paperwork"]);
        assert_eq!(axes[2].group, "Streamlined Systems");
    }

    #[test]
    fn overlapping_groups_are_rejected() {
        let mut data = pillars();
        data.groups[1].axes.push("Session Structure".to_string());
        let err = data.axes().unwrap_err();
        assert!(
            matches!(err, Error::DuplicateAxis { ref axis } if axis == "Session Structure"),
            "{err}"
        );
    }

    #[test]
    fn repeated_group_names_are_rejected() {
        let mut data = pillars();
        data.groups.push(Group::new(
            "Powerful Practice",
            Rgb::new(0, 0, 0),
            ["Community Impact"],
        ));
        let err = data.axes().unwrap_err();
        assert!(
            matches!(err, Error::DuplicateGroup { ref group } if group == "Powerful Practice"),
            "{err}"
        );
    }

    #[test]
    fn empty_groups_have_no_axes() {
        let data = ChartData::default();
        assert!(matches!(data.axes(), Err(Error::NoAxes)));
    }

    #[test]
    fn missing_points_default_to_zero() {
        let data = pillars();
        let ds = &data.datasets[0];
        assert_eq!(ds.value_for("Paperwork"), 7.0);
        assert_eq!(ds.value_for("Thematic Units"), 0.0);
    }

    #[test]
    fn scores_accept_numbers_and_objects() {
        let ds: Dataset = serde_json::from_value(serde_json::json!({
            "name": "Current",
            "points": {
                "A": 3,
                "B": { "value": 4.5, "explanation": "weekly review" }
            }
        }))
        .unwrap();
        assert_eq!(ds.point("A"), Some(&Score::new(3.0)));
        assert_eq!(
            ds.point("B"),
            Some(&Score::new(4.5).with_explanation("weekly review"))
        );
        let keys: Vec<_> = ds.points.keys().map(String::as_str).collect();
        assert_eq!(keys, ["A", "B"]);
    }

    #[test]
    fn unknown_axes_are_reported() {
        let data = pillars();
        let axes = data.axes().unwrap();
        let ds = Dataset::new("x").with_point("Nope", 1.0).with_point("Paperwork", 2.0);
        assert_eq!(ds.unknown_axes(&axes), ["Nope"]);
    }
}
