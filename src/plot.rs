use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::column::{Cell, Column};
use crate::portfolio::{format_pct, Portfolio, PortfolioRow};

pub const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

#[derive(Debug, Clone)]
pub struct PlotOptions {
    pub x: Column,
    pub y: Column,
    pub z: Column,
    /// Marker diameters are scaled so the most diversified holding is
    /// drawn `size_scalar²` pixels across
    pub size_scalar: f64,
    pub title: String,
}

impl Default for PlotOptions {
    fn default() -> PlotOptions {
        PlotOptions {
            x: Column::Category,
            y: Column::Cost,
            z: Column::TotalReturn,
            size_scalar: 10.0,
            title: "Examining My Portfolios Return and Change Over Category".to_string(),
        }
    }
}

/// plotly.js figure, serialized as-is into the page
#[derive(Debug, Serialize)]
pub struct Figure {
    pub data: Vec<Scatter3d>,
    pub layout: Layout,
}

#[derive(Debug, Serialize)]
pub struct Scatter3d {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub mode: &'static str,
    pub x: Vec<Cell>,
    pub y: Vec<Cell>,
    pub z: Vec<Cell>,
    pub hoverinfo: &'static str,
    pub text: Vec<String>,
    pub marker: Marker,
}

#[derive(Debug, Serialize)]
pub struct Marker {
    pub sizemode: &'static str,
    pub sizeref: f64,
    pub size: Vec<f64>,
    pub color: Vec<f64>,
    pub colorscale: &'static str,
    pub colorbar: ColorBar,
    pub line: Line,
}

#[derive(Debug, Serialize)]
pub struct ColorBar {
    pub title: Title,
}

#[derive(Debug, Serialize)]
pub struct Line {
    pub color: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Title {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

#[derive(Debug, Serialize)]
pub struct Font {
    pub color: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Layout {
    pub height: u32,
    pub width: u32,
    pub title: Title,
    pub scene: Scene,
}

#[derive(Debug, Serialize)]
pub struct Scene {
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub zaxis: Axis,
}

#[derive(Debug, Serialize)]
pub struct Axis {
    pub title: Title,
}

impl Axis {
    fn new(column: Column) -> Axis {
        Axis {
            title: Title {
                text: column.to_string(),
                font: Some(Font { color: "black" }),
            },
        }
    }
}

pub fn figure(portfolio: &Portfolio, options: &PlotOptions) -> Figure {
    let rows = portfolio.rows();

    let column = |c: Column| rows.iter().map(|row| c.cell(row)).collect::<Vec<_>>();

    let size = rows
        .iter()
        .map(|row| row.portfolio_diversity)
        .collect::<Vec<_>>();
    let max_size = size.iter().copied().fold(0.0, f64::max);

    let sizeref = if max_size > 0.0 {
        max_size / options.size_scalar.powi(2)
    } else {
        1.0
    };

    Figure {
        data: vec![Scatter3d {
            kind: "scatter3d",
            mode: "markers",
            x: column(options.x),
            y: column(options.y),
            z: column(options.z),
            hoverinfo: "text",
            text: rows.iter().map(hover_text).collect(),
            marker: Marker {
                sizemode: "diameter",
                sizeref,
                size,
                color: rows.iter().map(|row| row.percent_change).collect(),
                colorscale: "RdYlGn",
                colorbar: ColorBar {
                    title: Title {
                        text: "Percent<br>Change %".to_string(),
                        font: None,
                    },
                },
                line: Line {
                    color: "rgb(140, 140, 170)",
                },
            },
        }],
        layout: Layout {
            height: 800,
            width: 800,
            title: Title {
                text: options.title.clone(),
                font: None,
            },
            scene: Scene {
                xaxis: Axis::new(options.x),
                yaxis: Axis::new(options.y),
                zaxis: Axis::new(options.z),
            },
        },
    }
}

pub fn hover_text(row: &PortfolioRow) -> String {
    format!(
        "<b>{}</b><br>Change:{:.2}({})<br>Current Price:{:.2}<br>Average Cost:{:.2}<br>Todays Return:{:.2}<br>Total Return:{:.2}<br>Portfolio Diversity:{:.2}%",
        row.name,
        row.change,
        format_pct(row.percent_change),
        row.current_price,
        row.average_cost,
        row.todays_return,
        row.total_return,
        row.portfolio_diversity * 100.0
    )
}

pub fn render_html(figure: &Figure) -> Result<String> {
    let figure = serde_json::to_string(figure).context("Failed to serialize figure")?;

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Portfolio</title>
<script src="{}"></script>
</head>
<body>
<div id="portfolio"></div>
<script>
const figure = {};
Plotly.newPlot("portfolio", figure.data, figure.layout);
</script>
</body>
</html>
"#,
        PLOTLY_JS, figure
    ))
}

pub fn write_html(path: &Path, portfolio: &Portfolio, options: &PlotOptions) -> Result<()> {
    let html = render_html(&figure(portfolio, options))?;

    fs::write(path, html).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holding::Holding;
    use crate::mock::{position, quote};

    fn portfolio() -> Portfolio {
        Portfolio::from_holdings(vec![
            Holding::new(
                position("AAA", 3.0, 10.0, "Tech"),
                quote("AAA", 11.0, 10.0, 1.0, 10.0),
            ),
            Holding::new(
                position("BBB", 7.0, 10.0, "Energy"),
                quote("BBB", 9.0, 10.0, -1.0, -10.0),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_hover_text() {
        let rows = portfolio().rows();

        assert_eq!(
            hover_text(&rows[0]),
            "<b>AAA</b><br>Change:1.00(+10.00%)<br>Current Price:11.00<br>Average Cost:10.00<br>Todays Return:3.00<br>Total Return:3.00<br>Portfolio Diversity:30.00%"
        );
    }

    #[test]
    fn test_figure() {
        let figure = figure(&portfolio(), &PlotOptions::default());
        let trace = &figure.data[0];

        assert_eq!(
            trace.x,
            vec![Cell::Text("Tech".into()), Cell::Text("Energy".into())]
        );
        assert_eq!(trace.y, vec![Cell::Number(30.0), Cell::Number(70.0)]);
        assert_eq!(trace.z, vec![Cell::Number(3.0), Cell::Number(-7.0)]);
        assert_eq!(trace.marker.color, vec![10.0, -10.0]);
        assert!((trace.marker.sizeref - 0.7 / 100.0).abs() < 1e-12);
        assert_eq!(figure.layout.scene.zaxis.title.text, "Total Return");
    }

    #[test]
    fn test_largest_marker_diameter() {
        let options = PlotOptions {
            size_scalar: 6.0,
            ..PlotOptions::default()
        };

        let marker = figure(&portfolio(), &options).data.remove(0).marker;
        let diameters = marker
            .size
            .iter()
            .map(|size| size / marker.sizeref)
            .collect::<Vec<_>>();

        assert!((diameters[1] - 36.0).abs() < 1e-9);
        assert!((diameters[0] - 36.0 * 3.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_custom_axes() {
        let options = PlotOptions {
            x: Column::Name,
            y: Column::MarketValue,
            z: Column::PercentChange,
            ..PlotOptions::default()
        };

        let figure = figure(&portfolio(), &options);
        let trace = &figure.data[0];

        assert_eq!(trace.x[1], Cell::Text("BBB".into()));
        assert_eq!(trace.y, vec![Cell::Number(33.0), Cell::Number(63.0)]);
        assert_eq!(figure.layout.scene.xaxis.title.text, "Name");
    }

    #[test]
    fn test_render_html() {
        let html = render_html(&figure(&portfolio(), &PlotOptions::default())).unwrap();

        assert!(html.contains(PLOTLY_JS));
        assert!(html.contains(r#""type":"scatter3d""#));
        assert!(html.contains(r#""colorscale":"RdYlGn""#));
        assert!(html.contains(r#"Plotly.newPlot("portfolio""#));
    }
}
