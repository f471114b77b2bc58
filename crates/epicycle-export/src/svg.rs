//! SVG export serializer.
//!
//! Draws the input path and its Fourier reconstruction into one SVG
//! document using the [`svg`] crate for document construction, XML
//! escaping, and path data formatting.
//!
//! Drawing coordinates are y-up (the series works in the complex plane),
//! so y is negated on output and the `viewBox` is the padded bounding box
//! of both polylines in that flipped space.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Description, Path, Title};
use svg::node::{Text, Value};

use epicycle_series::{Point, Polyline};

/// Fraction of the larger bounding-box side added as margin on each edge.
const MARGIN_RATIO: f64 = 0.05;

/// Stroke colour of the input path.
const INPUT_STROKE: &str = "#bbbbbb";

/// Stroke colour of the reconstruction.
const RECONSTRUCTION_STROKE: &str = "black";

/// Metadata to embed in the SVG document.
///
/// When present, a `<title>` and/or `<desc>` element is emitted
/// immediately after the opening `<svg>` tag. Text values are
/// XML-escaped automatically by the `svg` crate.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Document title, emitted as `<title>`.
    pub title: Option<&'a str>,

    /// Document description, emitted as `<desc>`.
    ///
    /// Typically the series configuration so exported files are
    /// distinguishable.
    pub description: Option<&'a str>,
}

/// Build an SVG path `d` attribute string from a polyline.
///
/// Uses `M` for the first point and `L` for subsequent points.
/// Returns an empty string for polylines with fewer than 2 points.
///
/// # Examples
///
/// ```
/// use epicycle_series::{Point, Polyline};
/// use epicycle_export::build_path_data;
///
/// let polyline = Polyline::new(vec![
///     Point::new(10.0, 20.0),
///     Point::new(30.0, 40.0),
/// ]);
/// let d = build_path_data(&polyline);
/// assert_eq!(d, "M10,20 L30,40");
/// ```
#[must_use]
pub fn build_path_data(polyline: &Polyline) -> String {
    build_path_data_mapped(polyline, |p| (p.x, p.y))
}

/// Like [`build_path_data`] but passes every point through `map` first.
fn build_path_data_mapped(polyline: &Polyline, map: impl Fn(&Point) -> (f64, f64)) -> String {
    let points = polyline.points();
    let Some((first, rest)) = points.split_first() else {
        return String::new();
    };
    if rest.is_empty() {
        return String::new();
    }

    let mut data = Data::new().move_to(map(first));
    for p in rest {
        data = data.line_to(map(p));
    }
    String::from(Value::from(data))
}

/// Axis-aligned bounds in y-up drawing coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Bounds {
    /// Bounds of all points, or `None` if there are none.
    fn of<'a>(points: impl Iterator<Item = &'a Point>) -> Option<Self> {
        points.fold(None, |acc, p| {
            Some(acc.map_or(
                Self {
                    min_x: p.x,
                    min_y: p.y,
                    max_x: p.x,
                    max_y: p.y,
                },
                |b: Self| Self {
                    min_x: b.min_x.min(p.x),
                    min_y: b.min_y.min(p.y),
                    max_x: b.max_x.max(p.x),
                    max_y: b.max_y.max(p.y),
                },
            ))
        })
    }

    /// `viewBox` as `(x, y, width, height)` in the flipped (y-down) space.
    fn view_box(self) -> (f64, f64, f64, f64) {
        let width = self.max_x - self.min_x;
        let height = self.max_y - self.min_y;
        let margin = (width.max(height) * MARGIN_RATIO).max(1.0);
        (
            self.min_x - margin,
            -self.max_y - margin,
            2.0f64.mul_add(margin, width),
            2.0f64.mul_add(margin, height),
        )
    }
}

/// Serialize the input path and its reconstruction as an SVG document.
///
/// The input is drawn as a thin light-grey stroke underneath the black
/// reconstruction. Polylines with fewer than 2 points are skipped.
#[must_use]
pub fn to_svg(input: &Polyline, reconstruction: &Polyline, metadata: &SvgMetadata<'_>) -> String {
    let view_box = Bounds::of(input.points().iter().chain(reconstruction.points()))
        .map_or((0.0, 0.0, 1.0, 1.0), Bounds::view_box);

    let (x, y, width, height) = view_box;
    let mut doc = Document::new()
        .set("viewBox", format!("{x} {y} {width} {height}"))
        .set("preserveAspectRatio", "xMidYMid meet");

    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }

    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }

    let flip = |p: &Point| (p.x, 0.0 - p.y);
    let layers = [
        (input, INPUT_STROKE, "input"),
        (reconstruction, RECONSTRUCTION_STROKE, "reconstruction"),
    ];
    for (polyline, stroke, class) in layers {
        let d = build_path_data_mapped(polyline, flip);
        if d.is_empty() {
            continue;
        }
        let path = Path::new()
            .set("class", class)
            .set("d", d)
            .set("fill", "none")
            .set("stroke", stroke)
            .set("stroke-width", 1)
            .set("vector-effect", "non-scaling-stroke");
        doc = doc.add(path);
    }

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}
