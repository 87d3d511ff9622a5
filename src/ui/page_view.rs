use egui::{Align2, Color32, RichText};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoint, PlotPoints, Text};

use crate::render::{Figure, Page};

fn color32(c: [u8; 3]) -> Color32 {
    Color32::from_rgb(c[0], c[1], c[2])
}

/// Draw one page of `figure` into the remaining space of `ui`.
pub fn show_page(ui: &mut egui::Ui, figure: &Figure, page: &Page, page_index: usize) {
    match *page {
        Page::Bars => show_bars(ui, figure, page_index),
        Page::Distribution { series, label } => {
            show_distribution(ui, figure, page, series, label, page_index)
        }
    }
}

fn show_bars(ui: &mut egui::Ui, figure: &Figure, page_index: usize) {
    let style = figure.style;
    let agg = figure.aggregation;
    let fg = color32(style.foreground());
    let n_labels = agg.labels.len();

    let mut charts = Vec::with_capacity(agg.series.len());
    let mut error_bars = Vec::new();
    let mut values = Vec::new();

    for (s_idx, summary) in agg.series.iter().enumerate() {
        let mut bars = Vec::new();
        for (l_idx, bucket) in summary.buckets.iter().enumerate() {
            let Some(mean) = bucket.mean else { continue };
            let (x0, x1) = figure.bar_span(l_idx, s_idx);
            let x = (x0 + x1) / 2.0;
            bars.push(
                Bar::new(x, mean)
                    .width(x1 - x0)
                    .name(format!("{}\n{}\nn = {}", summary.name, agg.labels[l_idx], bucket.count)),
            );
            let mut top = mean;
            if let Some(err) = bucket.stderr {
                error_bars.push(Line::new(PlotPoints::from(vec![[x, mean - err], [x, mean + err]])).color(fg));
                top += err;
            }
            if style.show_values {
                values.push(
                    Text::new(PlotPoint::new(x, top), RichText::new(style.format_value(mean)).color(fg))
                        .anchor(Align2::CENTER_BOTTOM),
                );
            }
        }
        charts.push(
            BarChart::new(bars)
                .name(&summary.name)
                .color(color32(style.color_for_index(s_idx))),
        );
    }

    let labels = agg.labels.clone();
    let mut plot = Plot::new(("bars", page_index))
        .y_axis_label(style.y_title.as_str())
        .include_x(0.0)
        .include_x(n_labels as f64)
        .include_y(0.0)
        .include_y(figure.y_max())
        .x_grid_spacer(move |_| {
            (0..n_labels)
                .map(|i| GridMark {
                    value: i as f64 + 0.5,
                    step_size: 1.0,
                })
                .collect()
        })
        .x_axis_formatter(move |mark, _range| {
            let i = (mark.value - 0.5).round();
            if i >= 0.0 && (i as usize) < labels.len() {
                labels[i as usize].clone()
            } else {
                String::new()
            }
        });
    if figure.legend {
        plot = plot.legend(Legend::default());
    }

    plot.show(ui, |plot_ui| {
        for chart in charts {
            plot_ui.bar_chart(chart);
        }
        for line in error_bars {
            plot_ui.line(line);
        }
        for text in values {
            plot_ui.text(text);
        }
    });
}

fn show_distribution(
    ui: &mut egui::Ui,
    figure: &Figure,
    page: &Page,
    series: usize,
    label: usize,
    page_index: usize,
) {
    let style = figure.style;
    let hist = figure.histogram(series, label);
    let width = hist.bin_width();

    let bars: Vec<Bar> = hist
        .bins()
        .map(|(x0, x1, count)| Bar::new((x0 + x1) / 2.0, count as f64).width(width))
        .collect();
    let chart = BarChart::new(bars)
        .name(figure.page_title(page))
        .color(color32(style.color_for_index(series)));

    ui.label(
        RichText::new(format!(
            "{}    entries {}    underflow {}    overflow {}",
            figure.page_title(page),
            hist.entries(),
            hist.underflow,
            hist.overflow
        ))
        .strong(),
    );
    Plot::new(("distribution", page_index))
        .x_axis_label(style.y_title.as_str())
        .y_axis_label("entries")
        .include_y(0.0)
        .include_x(hist.low)
        .include_x(hist.high)
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}
