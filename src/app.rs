use eframe::egui;
use tracing::info;

use crate::error::{Error, Result};
use crate::processing::aggregate::Aggregation;
use crate::render::style::RenderStyle;
use crate::render::{Figure, PageOptions};
use crate::ui::page_view;

/// Interactive page viewer. Any key, a double click or "Next" advances;
/// leaving the last page closes the window.
pub struct ViewerApp {
    aggregation: Aggregation,
    style: RenderStyle,
    options: PageOptions,
    current: usize,
}

impl ViewerApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        aggregation: Aggregation,
        style: RenderStyle,
        options: PageOptions,
    ) -> Self {
        cc.egui_ctx.set_visuals(if style.dark {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });
        Self {
            aggregation,
            style,
            options,
            current: 0,
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let figure = Figure::new(&self.aggregation, &self.style, self.options);
        let pages = figure.pages();

        let mut advance = ctx.input(|i| {
            i.pointer.button_double_clicked(egui::PointerButton::Primary)
                || i.events.iter().any(|e| {
                    matches!(
                        e,
                        egui::Event::Key {
                            pressed: true,
                            repeat: false,
                            ..
                        }
                    )
                })
        });

        egui::TopBottomPanel::top("pager").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("Page {} / {}", self.current + 1, pages.len()));
                ui.separator();
                ui.label(figure.page_title(&pages[self.current.min(pages.len() - 1)]));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Close").clicked() {
                        self.current = pages.len();
                    }
                    if ui.button("Next").clicked() {
                        advance = true;
                    }
                });
            });
        });

        if advance {
            self.current += 1;
        }
        if self.current >= pages.len() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        let page = pages[self.current];
        let index = self.current;
        egui::CentralPanel::default().show(ctx, |ui| {
            page_view::show_page(ui, &figure, &page, index);
        });
    }
}

/// Show the pages in a native window, returning when it is closed.
pub fn run_viewer(aggregation: Aggregation, style: RenderStyle, options: PageOptions) -> Result<()> {
    let pages = crate::render::plan_pages(&aggregation, options.distributions).len();
    info!("showing {pages} page(s); press any key or double-click to continue");

    let native = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("timeplot")
            .with_inner_size([style.page_width as f32, style.page_height as f32])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "timeplot",
        native,
        Box::new(move |cc| Ok(Box::new(ViewerApp::new(cc, aggregation, style, options)))),
    )
    .map_err(|e| Error::Viewer(e.to_string()))
}
