// Chart data for the subgroup generated by one origin.
// Rendering is left to an external tool, this only lays out markers,
// segments and arrows, and serializes them as TOML.
use crate::common::EcError;
use crate::curve::Curve;
use crate::field::PrimeField;
use crate::point::{GroupElement, Point};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Blue,
    Red,
    Green,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Marker {
    pub x: i64,
    pub y: i64,
    pub label: String,
}

/// Arrow head drawn at the middle of a segment.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Arrow {
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Segment {
    pub color: Color,
    pub from: [i64; 2],
    pub to: [i64; 2],
    pub arrow: Arrow,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Plot {
    pub title: String,
    pub order: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub markers: Vec<Marker>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub segments: Vec<Segment>,
}

/// Blue for the first half of the walk, green for the second, red around
/// the middle. `m` is the number of finite points.
fn segment_color(k: i64, m: usize) -> Color {
    let mid = (m as i64 + 1) / 2;
    let blue_below = if m % 2 == 1 { mid } else { mid + 1 };
    if k < blue_below {
        Color::Blue
    } else if k > mid + 1 {
        Color::Green
    } else {
        Color::Red
    }
}

fn label(k: i64) -> String {
    if k == 1 {
        "1 Origin".to_owned()
    } else {
        k.to_string()
    }
}

impl Plot {
    pub fn build(field: &PrimeField, curve: &Curve, origin: Point) -> Result<Self, EcError> {
        let origin_el = GroupElement::origin(origin, field, curve)?;
        let (sequence, order) = curve.cyclic_subgroup(&origin_el, field)?;
        let xy: Vec<(i64, i64, i64)> = sequence
            .iter()
            .filter_map(|e| e.point().coords().map(|(x, y)| (x, y, e.k())))
            .collect();

        let markers = xy
            .iter()
            .map(|&(x, y, k)| Marker { x, y, label: label(k) })
            .collect();

        // Each point is joined to the one generated before it.
        let segments = xy
            .windows(2)
            .map(|w| {
                let (ox, oy, _) = w[0];
                let (x, y, k) = w[1];
                let (fx, fy) = ((x - ox) as f64, (y - oy) as f64);
                let n = 10.0 * (fx * fx + fy * fy).sqrt();
                Segment {
                    color: segment_color(k, xy.len()),
                    from: [ox, oy],
                    to: [x, y],
                    arrow: Arrow {
                        x: (x + ox) as f64 / 2.0,
                        y: (y + oy) as f64 / 2.0,
                        dx: fx / n,
                        dy: fy / n,
                    },
                }
            })
            .collect();

        Ok(Self {
            title: format!(
                "{} [{}] with origin {} : order is {}",
                curve,
                field.modulus(),
                origin,
                order
            ),
            order,
            markers,
            segments,
        })
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}

#[test]
fn test_segment_color() {
    // 11 finite points: 2..=5 blue, 6 and 7 red, 8.. green.
    assert_eq!(segment_color(5, 11), Color::Blue);
    assert_eq!(segment_color(6, 11), Color::Red);
    assert_eq!(segment_color(7, 11), Color::Red);
    assert_eq!(segment_color(8, 11), Color::Green);
    // 6 finite points: mid is 3, blue below 4.
    assert_eq!(segment_color(3, 6), Color::Blue);
    assert_eq!(segment_color(4, 6), Color::Red);
    assert_eq!(segment_color(5, 6), Color::Green);
}

#[test]
fn test_build_plot() {
    let field = PrimeField::new(11).unwrap();
    let curve = Curve::new(0, 7);
    let plot = Plot::build(&field, &curve, Point::new(4, 4)).unwrap();
    assert_eq!(
        plot.title,
        "ECCurve : y^2 = x^3 + 7 [11] with origin (4,4) : order is 12"
    );
    assert_eq!(plot.order, 12);
    assert_eq!(plot.markers.len(), 11);
    assert_eq!(plot.markers[0].label, "1 Origin");
    assert_eq!(plot.markers[1].label, "2");
    assert_eq!(plot.segments.len(), 10);

    let first = &plot.segments[0];
    assert_eq!(first.from, [4, 4]);
    assert_eq!(first.to, [6, 6]);
    assert_eq!(first.color, Color::Blue);
    assert_eq!(first.arrow.x, 5.0);
    assert_eq!(first.arrow.y, 5.0);
    let expected = 2.0 / (10.0 * 8f64.sqrt());
    assert!((first.arrow.dx - expected).abs() < 1e-12);
    assert!((first.arrow.dy - expected).abs() < 1e-12);
    assert_eq!(plot.segments[9].color, Color::Green);
}

#[test]
fn test_plot_toml() {
    let field = PrimeField::new(11).unwrap();
    let curve = Curve::new(0, 7);
    let text = Plot::build(&field, &curve, Point::new(5, 0))
        .unwrap()
        .to_toml()
        .unwrap();
    assert!(text.contains("order = 2"));
    assert!(text.contains("[[markers]]"));
    assert!(!text.contains("segments"));

    let text = Plot::build(&field, &curve, Point::new(4, 4))
        .unwrap()
        .to_toml()
        .unwrap();
    assert!(text.contains("[[segments]]"));
    assert!(text.contains("color = \"blue\""));
}

#[test]
fn test_plot_infinity() {
    let field = PrimeField::new(11).unwrap();
    let curve = Curve::new(0, 7);
    let plot = Plot::build(&field, &curve, Point::Infinity).unwrap();
    assert_eq!(plot.order, 1);
    assert!(plot.markers.is_empty());
    assert!(plot.segments.is_empty());
}
