use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::{info, trace, warn};

use crate::error::{Error, Result};
use crate::render::{Figure, OutputFormat, Page};

type DrawResult<DB> = std::result::Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

/// Above this many pixels a PNG page buffer gets expensive to hold in memory.
const PNG_PIXEL_WARN: u64 = 50_000_000;

fn png_is_large(size: (u32, u32)) -> bool {
    u64::from(size.0) * u64::from(size.1) > PNG_PIXEL_WARN
}

fn rgb(c: [u8; 3]) -> RGBColor {
    RGBColor(c[0], c[1], c[2])
}

/// Write every page of `figure` into one document, pages stacked top to bottom.
pub fn write_document(path: &Path, figure: &Figure) -> Result<()> {
    let pages = figure.pages();
    let size = (
        figure.style.page_width,
        figure.style.page_height.saturating_mul(pages.len() as u32),
    );

    let drawn = match OutputFormat::from_path(path)? {
        OutputFormat::Svg => render_to(SVGBackend::new(path, size).into_drawing_area(), figure),
        OutputFormat::Png => {
            if png_is_large(size) {
                warn!(
                    "{} page(s) make a {}x{} PNG; consider .svg output for large runs",
                    pages.len(),
                    size.0,
                    size.1
                );
            }
            render_to(BitMapBackend::new(path, size).into_drawing_area(), figure)
        }
    };
    drawn.map_err(Error::Render)?;

    info!("wrote {} page(s) to {}", pages.len(), path.display());
    Ok(())
}

fn render_to<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    figure: &Figure,
) -> std::result::Result<(), String> {
    draw_pages(&root, figure)
        .and_then(|_| root.present())
        .map_err(|e| e.to_string())
}

fn draw_pages<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, figure: &Figure) -> DrawResult<DB> {
    let pages = figure.pages();
    root.fill(&rgb(figure.style.background()))?;
    let areas = root.split_evenly((pages.len(), 1));
    for (n, (area, page)) in areas.iter().zip(pages).enumerate() {
        trace!("page {n}: {page:?}");
        match *page {
            Page::Bars => draw_bars(area, figure)?,
            Page::Distribution { series, label } => draw_distribution(area, figure, page, series, label)?,
        }
    }
    Ok(())
}

fn draw_bars<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, figure: &Figure) -> DrawResult<DB> {
    let style = figure.style;
    let agg = figure.aggregation;
    let fg = rgb(style.foreground());
    let bg = rgb(style.background());
    let font = ("sans-serif", style.font_size).into_font().color(&fg);

    let mut builder = ChartBuilder::on(area);
    builder.margin(20).x_label_area_size(60).y_label_area_size(90);
    if style.show_title {
        builder.caption(&style.title, ("sans-serif", style.font_size + 8.0).into_font().color(&fg));
    }
    let mut chart = builder.build_cartesian_2d(0f64..agg.labels.len() as f64, 0f64..figure.y_max())?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .light_line_style(fg.mix(0.05))
        .bold_line_style(fg.mix(0.15))
        .axis_style(fg)
        .label_style(font.clone())
        .axis_desc_style(font.clone())
        .x_label_formatter(&|_| String::new())
        .y_label_formatter(&|y| format!("{y:.0}"))
        .y_desc(style.y_title.as_str())
        .draw()?;

    // Case labels centred under each bar group.
    let base = area.get_base_pixel();
    let label_font = font.clone().pos(Pos::new(HPos::Center, VPos::Top));
    for (i, label) in agg.labels.iter().enumerate() {
        let (px, py) = chart.plotting_area().map_coordinate(&(i as f64 + 0.5, 0.0));
        area.draw(&Text::new(
            label.clone(),
            (px - base.0, py - base.1 + 8),
            label_font.clone(),
        ))?;
    }

    let value_font = ("sans-serif", (style.font_size - 4.0).max(8.0))
        .into_font()
        .color(&fg)
        .pos(Pos::new(HPos::Center, VPos::Bottom));

    for (s_idx, summary) in agg.series.iter().enumerate() {
        let color = rgb(style.color_for_index(s_idx));
        let bars: Vec<(f64, f64, f64, Option<f64>)> = summary
            .buckets
            .iter()
            .enumerate()
            .filter_map(|(l_idx, b)| {
                let (x0, x1) = figure.bar_span(l_idx, s_idx);
                Some((x0, x1, b.mean?, b.stderr))
            })
            .collect();

        let anno = chart.draw_series(
            bars.iter()
                .map(|&(x0, x1, mean, _)| Rectangle::new([(x0, 0.0), (x1, mean)], color.filled())),
        )?;
        if figure.legend {
            anno.label(summary.name.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 14, y + 6)], color.filled()));
        }

        chart.draw_series(bars.iter().filter_map(|&(x0, x1, mean, err)| {
            let err = err?;
            Some(ErrorBar::new_vertical(
                (x0 + x1) / 2.0,
                mean - err,
                mean,
                mean + err,
                fg.stroke_width(1),
                8,
            ))
        }))?;

        if style.show_values {
            chart.draw_series(bars.iter().map(|&(x0, x1, mean, err)| {
                let top = mean + err.unwrap_or(0.0);
                EmptyElement::at(((x0 + x1) / 2.0, top))
                    + Text::new(style.format_value(mean), (0, -4), value_font.clone())
            }))?;
        }
    }

    if figure.legend {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(bg.mix(0.8))
            .border_style(fg)
            .label_font(font)
            .draw()?;
    }
    Ok(())
}

fn draw_distribution<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    figure: &Figure,
    page: &Page,
    series: usize,
    label: usize,
) -> DrawResult<DB> {
    let style = figure.style;
    let fg = rgb(style.foreground());
    let color = rgb(style.color_for_index(series));
    let font = ("sans-serif", style.font_size).into_font().color(&fg);
    let hist = figure.histogram(series, label);
    let y_max = (hist.max_count() as f64 * 1.15).max(1.0);

    let mut chart = ChartBuilder::on(area)
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .caption(
            figure.page_title(page),
            ("sans-serif", style.font_size + 4.0).into_font().color(&fg),
        )
        .build_cartesian_2d(hist.low..hist.high, 0f64..y_max)?;

    chart
        .configure_mesh()
        .light_line_style(fg.mix(0.05))
        .bold_line_style(fg.mix(0.15))
        .axis_style(fg)
        .label_style(font.clone())
        .axis_desc_style(font.clone())
        .x_desc(style.y_title.as_str())
        .y_desc("entries")
        .y_label_formatter(&|y| format!("{y:.0}"))
        .draw()?;

    chart.draw_series(
        hist.bins()
            .filter(|&(_, _, c)| c > 0)
            .map(|(x0, x1, c)| Rectangle::new([(x0, 0.0), (x1, c as f64)], color.filled())),
    )?;

    let stats = figure
        .aggregation
        .bucket(series, label)
        .copied()
        .unwrap_or_default();
    let lines = [
        format!("entries {}", hist.entries()),
        format!(
            "mean {}",
            stats.mean.map_or_else(|| "-".to_string(), |m| style.format_value(m))
        ),
        format!(
            "std err {}",
            stats.stderr.map_or_else(|| "-".to_string(), |e| format!("{e:.3}"))
        ),
        format!("underflow {} overflow {}", hist.underflow, hist.overflow),
    ];
    let (width, _) = area.dim_in_pixel();
    let x = width as i32 - 280;
    for (i, line) in lines.into_iter().enumerate() {
        area.draw(&Text::new(line, (x, 50 + 20 * i as i32), font.clone()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn large_png_documents_are_flagged() {
        assert!(!png_is_large((1200, 800)));
        assert!(!png_is_large((1200, 800 * 40)));
        assert!(png_is_large((1200, 800 * 60)));
        assert!(png_is_large((u32::MAX, u32::MAX)));
    }
}
