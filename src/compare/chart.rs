//! Grouped bar chart rendered as standalone SVG
//!
//! One group per measurement, one bar per attribute inside each group, and a
//! dashed reference line per attribute at its mean across measurements.
//! Layout is computed first ([`ChartLayout`]) so geometry can be checked
//! without parsing SVG.

use super::ComparisonTable;
use crate::config::ChartConfig;
use crate::models::Attribute;

const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 200.0;
const MARGIN_TOP: f64 = 70.0;
const MARGIN_BOTTOM: f64 = 90.0;

/// Share of each group's slot taken by bars
const GROUP_FILL: f64 = 0.8;

const Y_MAX: f64 = 100.0;

fn attribute_color(attribute: Attribute) -> &'static str {
    match attribute {
        Attribute::Severity => "#3b528b",
        Attribute::Occurrence => "#21918c",
        Attribute::Priority => "#5ec962",
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub attribute: Attribute,
    pub value: f64,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarGroup {
    pub label: String,
    pub center_x: f64,
    pub bars: Vec<Bar>,
}

/// Horizontal line at an attribute's cross-measurement mean
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceLine {
    pub attribute: Attribute,
    pub value: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub title: String,
    pub plot: Rect,
    pub groups: Vec<BarGroup>,
    pub reference_lines: Vec<ReferenceLine>,
}

impl ChartLayout {
    pub fn new(table: &ComparisonTable, config: &ChartConfig) -> Self {
        let width = f64::from(config.width);
        let height = f64::from(config.height);
        let plot = Rect {
            x: MARGIN_LEFT,
            y: MARGIN_TOP,
            width: (width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
            height: (height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
        };

        let attributes = Attribute::all();
        let measurements = table.measurements();
        let slot = plot.width / measurements.len() as f64;
        let bar_width = slot * GROUP_FILL / attributes.len() as f64;

        let groups = measurements
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let start = plot.x + slot * i as f64 + slot * (1.0 - GROUP_FILL) / 2.0;
                let bars = attributes
                    .iter()
                    .enumerate()
                    .map(|(j, attribute)| {
                        let value = m.rate(*attribute);
                        let top = value_to_y(&plot, value);
                        Bar {
                            attribute: *attribute,
                            value,
                            rect: Rect {
                                x: start + bar_width * j as f64,
                                y: top,
                                width: bar_width,
                                height: plot.y + plot.height - top,
                            },
                        }
                    })
                    .collect();
                BarGroup {
                    label: m.label.clone(),
                    center_x: plot.x + slot * (i as f64 + 0.5),
                    bars,
                }
            })
            .collect();

        let reference_lines = attributes
            .iter()
            .map(|attribute| {
                let value = table.average(*attribute);
                ReferenceLine {
                    attribute: *attribute,
                    value,
                    y: value_to_y(&plot, value),
                }
            })
            .collect();

        Self {
            width,
            height,
            title: config.title.clone(),
            plot,
            groups,
            reference_lines,
        }
    }

    pub fn reference_line(&self, attribute: Attribute) -> Option<&ReferenceLine> {
        self.reference_lines.iter().find(|l| l.attribute == attribute)
    }
}

/// Map a percentage onto the plot, clamped to the 0-100 axis
fn value_to_y(plot: &Rect, value: f64) -> f64 {
    let clamped = value.clamp(0.0, Y_MAX);
    plot.y + plot.height * (1.0 - clamped / Y_MAX)
}

/// Render the chart as a standalone SVG document
pub fn render_svg(layout: &ChartLayout) -> String {
    let mut svg = String::new();
    let plot = &layout.plot;
    let bottom = plot.y + plot.height;
    let right = plot.x + plot.width;

    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">
<rect width="100%" height="100%" fill="white"/>
<text x="{cx:.1}" y="36" text-anchor="middle" font-size="20">{title}</text>
"#,
        w = layout.width,
        h = layout.height,
        cx = layout.width / 2.0,
        title = svg_escape(&layout.title),
    ));

    // Grid and y axis ticks
    for tick in (0..=100).step_by(20) {
        let y = value_to_y(plot, f64::from(tick));
        svg.push_str(&format!(
            r##"<line x1="{x1:.1}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="#e5e7eb"/>
<text x="{tx:.1}" y="{ty:.1}" text-anchor="end" font-size="12">{tick}</text>
"##,
            x1 = plot.x,
            x2 = right,
            tx = plot.x - 8.0,
            ty = y + 4.0,
        ));
    }
    svg.push_str(&format!(
        r##"<line x1="{x:.1}" y1="{top:.1}" x2="{x:.1}" y2="{bottom:.1}" stroke="#374151"/>
<line x1="{x:.1}" y1="{bottom:.1}" x2="{right:.1}" y2="{bottom:.1}" stroke="#374151"/>
<text x="24" y="{my:.1}" text-anchor="middle" font-size="14" transform="rotate(-90 24 {my:.1})">Match Rate (%)</text>
<text x="{mx:.1}" y="{ly:.1}" text-anchor="middle" font-size="14">Measurement</text>
"##,
        x = plot.x,
        top = plot.y,
        my = plot.y + plot.height / 2.0,
        mx = plot.x + plot.width / 2.0,
        ly = layout.height - 24.0,
    ));

    // Bars with value labels
    for group in &layout.groups {
        for bar in &group.bars {
            let r = &bar.rect;
            svg.push_str(&format!(
                r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>
<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="10">{:.1}%</text>
"#,
                r.x,
                r.y,
                r.width,
                r.height,
                attribute_color(bar.attribute),
                r.x + r.width / 2.0,
                r.y - 4.0,
                bar.value,
            ));
        }
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12">{}</text>
"#,
            group.center_x,
            bottom + 20.0,
            svg_escape(&group.label),
        ));
    }

    // Average reference lines
    for line in &layout.reference_lines {
        let color = attribute_color(line.attribute);
        svg.push_str(&format!(
            r#"<line x1="{:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="{color}" stroke-width="1.5" stroke-dasharray="6 4"/>
<text x="{:.1}" y="{:.1}" font-size="11" fill="{color}">{} Avg: {:.1}%</text>
"#,
            plot.x,
            right,
            right + 8.0,
            line.y + 4.0,
            line.attribute.title(),
            line.value,
            y = line.y,
        ));
    }

    // Legend, in a row between title and plot
    for (i, attribute) in Attribute::all().iter().enumerate() {
        let x = plot.x + 120.0 * i as f64;
        let y = MARGIN_TOP - 22.0;
        svg.push_str(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="12" height="12" fill="{}"/>
<text x="{:.1}" y="{:.1}" font-size="12">{}</text>
"#,
            x,
            y,
            attribute_color(*attribute),
            x + 18.0,
            y + 10.0,
            attribute.title(),
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

fn svg_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
