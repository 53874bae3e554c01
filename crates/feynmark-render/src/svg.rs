use crate::model::Bounds;
use crate::text::{DeterministicTextMeasurer, TextMeasurer, TextStyle};
use crate::{Error, Result};
use feynmark_core::defs::{ArrowMarkerDef, DefsStore, PatternDef, VertexMarkerDef, VertexShape};
use feynmark_core::geom::Point;
use feynmark_core::plan::{DecorationPlan, LabelPlan, StrokePlan};
use feynmark_core::{CubicBezier, Definition, DiagramPlan, EdgeCurve};
use std::fmt::Write as _;

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Adds extra space around the computed viewBox.
    pub viewbox_padding: f64,
    pub stroke: String,
    pub stroke_width: f64,
    pub label_style: TextStyle,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            viewbox_padding: 8.0,
            stroke: "black".to_string(),
            stroke_width: 1.0,
            label_style: TextStyle::default(),
        }
    }
}

const GHOST_STROKE_WIDTH: f64 = 0.1;
const FLOW_STROKE_WIDTH: f64 = 0.7;

/// Per-document counters for the helper elements attached to an edge.
#[derive(Debug, Default)]
struct ElementIds {
    ghost: usize,
    flow: usize,
    label: usize,
}

impl ElementIds {
    fn next(counter: &mut usize, prefix: &str) -> String {
        let id = format!("{prefix}-{counter}");
        *counter += 1;
        id
    }
}

/// Renders every planned edge with its decorations.
///
/// Pattern strokes (photon, gluon, boson) are not expanded into wave geometry: the main path stays
/// a plain line and carries `data-feynman-pattern`, `data-feynman-pattern-width` and
/// `data-feynman-pattern-offset`, with the pattern itself emitted under `<defs>`. Applying the
/// pattern along the path is left to the consumer.
pub fn render_diagram_svg(
    plan: &DiagramPlan,
    defs: &DefsStore,
    options: &SvgRenderOptions,
) -> Result<String> {
    let measurer = DeterministicTextMeasurer::default();
    let mut bounds: Option<Bounds> = None;
    for edge in &plan.edges {
        let points = edge_curve_points(&edge.curve);
        extend_bounds(&mut bounds, points, &edge.decorations, &measurer, options);
    }

    let mut out = String::new();
    open_svg(&mut out, bounds, options);
    write_defs(&mut out, defs);

    let mut ids = ElementIds::default();
    out.push_str(r#"<g class="edges">"#);
    out.push('\n');
    for edge in &plan.edges {
        tracing::trace!(edge = %edge.id, "rendering edge");
        write_edge(
            &mut out,
            &mut ids,
            &edge_curve_path(&edge.curve),
            Some(&edge.id),
            &edge.decorations,
            defs,
            options,
        )?;
    }
    out.push_str("</g>\n");
    out.push_str("</svg>\n");
    Ok(out)
}

/// Renders one annotated curve together with its decorations.
///
/// Pattern strokes are recorded as attributes only, as in [`render_diagram_svg`].
pub fn render_annotation_svg(
    curve: &CubicBezier,
    plan: &DecorationPlan,
    defs: &DefsStore,
    options: &SvgRenderOptions,
) -> Result<String> {
    let measurer = DeterministicTextMeasurer::default();
    let mut bounds: Option<Bounds> = None;
    extend_bounds(
        &mut bounds,
        vec![curve.p0, curve.c0, curve.c1, curve.p1],
        plan,
        &measurer,
        options,
    );

    let mut out = String::new();
    open_svg(&mut out, bounds, options);
    write_defs(&mut out, defs);
    let mut ids = ElementIds::default();
    write_edge(
        &mut out,
        &mut ids,
        &cubic_path(curve),
        None,
        plan,
        defs,
        options,
    )?;
    out.push_str("</svg>\n");
    Ok(out)
}

fn open_svg(out: &mut String, bounds: Option<Bounds>, options: &SvgRenderOptions) {
    let bounds = bounds.unwrap_or(Bounds {
        min_x: 0.0,
        min_y: 0.0,
        max_x: 100.0,
        max_y: 100.0,
    });
    let pad = options.viewbox_padding.max(0.0);
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">"#,
        fmt(bounds.min_x - pad),
        fmt(bounds.min_y - pad),
        fmt((bounds.width() + pad * 2.0).max(1.0)),
        fmt((bounds.height() + pad * 2.0).max(1.0))
    );
}

fn extend_bounds(
    bounds: &mut Option<Bounds>,
    points: Vec<Point>,
    plan: &DecorationPlan,
    measurer: &dyn TextMeasurer,
    options: &SvgRenderOptions,
) {
    let mut points = points;
    if let Some(momentum) = &plan.momentum {
        points.push(momentum.from);
        points.push(momentum.to);
    }
    let Some(mut b) = Bounds::from_points(points) else {
        return;
    };
    if let Some(label) = &plan.label {
        let metrics = measurer.measure(&label.text, &options.label_style);
        // Rotation is ignored; the larger extent covers any angle.
        let r = metrics.width.max(metrics.height) / 2.0;
        b.include_rect(
            label.anchor.x - r,
            label.anchor.y - r,
            label.anchor.x + r,
            label.anchor.y + r,
        );
    }
    match bounds {
        Some(acc) => acc.include_rect(b.min_x, b.min_y, b.max_x, b.max_y),
        None => *bounds = Some(b),
    }
}

fn write_defs(out: &mut String, defs: &DefsStore) {
    if defs.is_empty() {
        return;
    }
    out.push_str("<defs>\n");
    for (id, def) in defs.iter() {
        match def {
            Definition::Pattern(p) => write_pattern(out, id, p),
            Definition::VertexMarker(m) => write_vertex_marker(out, id, m),
            Definition::ArrowMarker(a) => write_arrow_marker(out, id, a),
        }
    }
    out.push_str("</defs>\n");
}

fn write_pattern(out: &mut String, id: &str, pattern: &PatternDef) {
    let _ = writeln!(
        out,
        r#"<path id="{}" d="{}" fill="none" data-feynman-particle="{}" data-feynman-normal-offset="{}" />"#,
        escape_attr(id),
        pattern.d,
        pattern.particle,
        fmt(pattern.normal_offset)
    );
}

fn write_vertex_marker(out: &mut String, id: &str, marker: &VertexMarkerDef) {
    let (extent, shape) = match marker.shape() {
        VertexShape::Circle { r } => (r, format!(r#"<circle cx="0" cy="0" r="{}" />"#, fmt(r))),
        VertexShape::Square { half } => (
            half,
            format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" />"#,
                fmt(-half),
                fmt(-half),
                fmt(half * 2.0),
                fmt(half * 2.0)
            ),
        ),
    };
    let _ = writeln!(
        out,
        r#"<marker id="{}" viewBox="{} {} {} {}" refX="0" refY="0" markerWidth="{}" markerHeight="{}" markerUnits="userSpaceOnUse" orient="auto">{}</marker>"#,
        escape_attr(id),
        fmt(-extent),
        fmt(-extent),
        fmt(extent * 2.0),
        fmt(extent * 2.0),
        fmt(extent * 2.0),
        fmt(extent * 2.0),
        shape
    );
}

fn write_arrow_marker(out: &mut String, id: &str, arrow: &ArrowMarkerDef) {
    let _ = writeln!(
        out,
        r#"<marker id="{}" viewBox="0 0 {} {}" refX="{}" refY="{}" markerWidth="{}" markerHeight="{}" orient="auto"><path d="{}" /></marker>"#,
        escape_attr(id),
        fmt(ArrowMarkerDef::WIDTH),
        fmt(ArrowMarkerDef::HEIGHT),
        fmt(ArrowMarkerDef::REF_X),
        fmt(ArrowMarkerDef::REF_Y),
        fmt(ArrowMarkerDef::WIDTH),
        fmt(ArrowMarkerDef::HEIGHT),
        arrow.head_path()
    );
}

fn marker_url(defs: &DefsStore, id: &str) -> Result<String> {
    if !defs.contains(id) {
        return Err(Error::MissingDefinition { id: id.to_string() });
    }
    Ok(format!("url(#{})", escape_attr(id)))
}

fn write_edge(
    out: &mut String,
    ids: &mut ElementIds,
    d: &str,
    edge_id: Option<&str>,
    plan: &DecorationPlan,
    defs: &DefsStore,
    options: &SvgRenderOptions,
) -> Result<()> {
    let ghost_id = plan
        .arrow
        .as_ref()
        .map(|_| ElementIds::next(&mut ids.ghost, "ghost"));
    let flow_id = plan
        .momentum
        .as_ref()
        .map(|_| ElementIds::next(&mut ids.flow, "flow"));
    let label_id = plan
        .label
        .as_ref()
        .map(|_| ElementIds::next(&mut ids.label, "label"));

    out.push_str("<path");
    if let Some(id) = edge_id {
        let _ = write!(out, r#" data-edge-id="{}""#, escape_attr(id));
    }
    let _ = write!(
        out,
        r#" d="{}" fill="none" stroke="{}" stroke-width="{}""#,
        d,
        escape_attr(&options.stroke),
        fmt(options.stroke_width)
    );
    match &plan.stroke {
        Some(StrokePlan::Pattern {
            pattern_id,
            width,
            normal_offset,
        }) => {
            if !defs.contains(pattern_id) {
                return Err(Error::MissingDefinition {
                    id: pattern_id.clone(),
                });
            }
            let _ = write!(
                out,
                r#" data-feynman-pattern="{}" data-feynman-pattern-width="{}" data-feynman-pattern-offset="{}""#,
                escape_attr(pattern_id),
                fmt(*width),
                fmt(*normal_offset)
            );
        }
        Some(StrokePlan::Dashed { dash }) => {
            let _ = write!(out, r#" stroke-dasharray="{dash}""#);
        }
        Some(StrokePlan::Plain) => out.push_str(r#" stroke-dasharray="none""#),
        None => {}
    }
    if let Some(vertices) = &plan.vertices {
        let url = marker_url(defs, &vertices.marker_id)?;
        if vertices.endpoints.start {
            let _ = write!(out, r#" marker-start="{url}""#);
        }
        if vertices.endpoints.end {
            let _ = write!(out, r#" marker-end="{url}""#);
        }
    }
    for (attr, id) in [
        ("data-feynman-ghost", &ghost_id),
        ("data-feynman-ghost-arrow", &flow_id),
        ("data-feynman-label", &label_id),
    ] {
        if let Some(id) = id {
            let _ = write!(out, r#" {attr}="{id}""#);
        }
    }
    out.push_str(" />\n");

    if let (Some(arrow), Some(id)) = (&plan.arrow, &ghost_id) {
        let url = marker_url(defs, &arrow.marker_id)?;
        let p = arrow.points();
        let _ = writeln!(
            out,
            r#"<path id="{}" d="M {} C {} {} {} C {} {} {}" fill="none" stroke="{}" stroke-width="{}" stroke-opacity="0" marker-mid="{}" />"#,
            id,
            fmt_point(p[0]),
            fmt_point(p[1]),
            fmt_point(p[2]),
            fmt_point(p[3]),
            fmt_point(p[4]),
            fmt_point(p[5]),
            fmt_point(p[6]),
            escape_attr(&options.stroke),
            fmt(GHOST_STROKE_WIDTH),
            url
        );
    }

    if let (Some(momentum), Some(id)) = (&plan.momentum, &flow_id) {
        let url = marker_url(defs, &momentum.marker_id)?;
        let _ = writeln!(
            out,
            r#"<path id="{}" d="M {} L {}" fill="none" stroke="{}" stroke-width="{}" marker-end="{}" />"#,
            id,
            fmt_point(momentum.from),
            fmt_point(momentum.to),
            escape_attr(&options.stroke),
            fmt(FLOW_STROKE_WIDTH),
            url
        );
    }

    if let (Some(label), Some(id)) = (&plan.label, &label_id) {
        write_label(out, id, label, options);
    }
    Ok(())
}

fn write_label(out: &mut String, id: &str, label: &LabelPlan, options: &SvgRenderOptions) {
    let _ = write!(
        out,
        r#"<text id="{}" transform="translate({},{}) rotate({})" font-family="{}" font-size="{}px" text-anchor="middle" dominant-baseline="middle""#,
        id,
        fmt(label.anchor.x),
        fmt(label.anchor.y),
        fmt(label.angle),
        escape_attr(&options.label_style.font_family),
        fmt(options.label_style.font_size)
    );
    if label.typeset {
        out.push_str(r#" data-feynman-typeset="true""#);
    }
    let _ = writeln!(out, ">{}</text>", escape_xml(&label.text));
}

fn edge_curve_points(curve: &EdgeCurve) -> Vec<Point> {
    match curve.control {
        Some(ctrl) => vec![curve.start, ctrl, curve.end],
        None => vec![curve.start, curve.end],
    }
}

fn edge_curve_path(curve: &EdgeCurve) -> String {
    match curve.control {
        Some(ctrl) => format!(
            "M {} Q {} {}",
            fmt_point(curve.start),
            fmt_point(ctrl),
            fmt_point(curve.end)
        ),
        None => format!("M {} L {}", fmt_point(curve.start), fmt_point(curve.end)),
    }
}

fn cubic_path(curve: &CubicBezier) -> String {
    format!(
        "M {} C {} {} {}",
        fmt_point(curve.p0),
        fmt_point(curve.c0),
        fmt_point(curve.c1),
        fmt_point(curve.p1)
    )
}

fn fmt_point(p: Point) -> String {
    format!("{},{}", fmt(p.x), fmt(p.y))
}

fn fmt(v: f64) -> String {
    // Round-trippable decimal without `-0` or float noise from our own arithmetic.
    if !v.is_finite() {
        return "0".to_string();
    }

    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    let s = v.to_string();
    if s == "-0" { "0".to_string() } else { s }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(text: &str) -> String {
    escape_xml(text)
}
