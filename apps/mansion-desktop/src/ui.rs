use crate::app::{AppState, Pick, View};
use egui::{Color32, Context as EguiContext};
use mansion_common::{BlockKind, CellCoord, Rgb};
use mansion_input::{Action, JOYSTICK_INNER_RADIUS, JOYSTICK_OUTER_RADIUS};
use mansion_tools::LayoutInspector;

const CELL_SIZE: f32 = 60.0;
const EMPTY_CELL: Color32 = Color32::from_gray(0xdd);

fn color32(rgb: Rgb) -> Color32 {
    let [r, g, b] = rgb.to_rgb8();
    Color32::from_rgb(r, g, b)
}

fn text_color(kind: BlockKind) -> Color32 {
    if kind.is_dark() {
        Color32::WHITE
    } else {
        Color32::BLACK
    }
}

impl AppState {
    pub fn draw_ui(&mut self, ctx: &EguiContext) {
        ctx.set_visuals(if self.theme().is_dark() {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });

        let mut actions = Vec::new();
        self.draw_toolbar(ctx, &mut actions);
        self.draw_status(ctx);
        match self.view {
            View::Scene => self.draw_scene_overlay(ctx),
            View::Grid => self.draw_grid(ctx, &mut actions),
        }
        self.draw_notice(ctx);

        for action in actions {
            self.act(action);
        }
    }

    fn draw_toolbar(&mut self, ctx: &EguiContext, actions: &mut Vec<Action>) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.selectable_value(&mut self.view, View::Scene, "3D Scene");
                ui.selectable_value(&mut self.view, View::Grid, "Floor Plan");
                ui.separator();

                let mut kind = self.session.kind();
                egui::ComboBox::from_id_salt("block_type")
                    .selected_text(kind.name())
                    .show_ui(ui, |ui| {
                        for option in BlockKind::ALL {
                            ui.selectable_value(&mut kind, option, option.name());
                        }
                    });
                if kind != self.session.kind() {
                    actions.push(Action::SelectKind(kind));
                }

                if ui
                    .button(format!("Rotate ({})", self.session.rotation()))
                    .clicked()
                {
                    actions.push(Action::Rotate);
                }
                if ui.button("Reset").clicked() {
                    actions.push(self.view.reset_action());
                }
                if ui.button("Save").clicked() {
                    actions.push(self.view.save_action());
                }
                if ui.button("Load").clicked() {
                    actions.push(self.view.load_action());
                }
                if ui.button("Toggle Theme").clicked() {
                    actions.push(Action::ToggleTheme);
                }
            });
        });
        if self.view != View::Scene {
            self.cursor_captured = false;
        }
    }

    fn draw_status(&self, ctx: &EguiContext) {
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| match self.view {
                View::Scene => {
                    let summary = LayoutInspector::summary(self.session.layout());
                    let p = self.walker.camera.position;
                    ui.label(format!(
                        "Blocks: {} ({} placed)",
                        summary.blocks, summary.placed
                    ));
                    ui.separator();
                    ui.label(format!("Camera: ({:.1}, {:.1}, {:.1})", p.x, p.y, p.z));
                    ui.separator();
                    ui.small("Tab: look | WASD: move | Space: up | LMB: place | RMB: remove");
                }
                View::Grid => {
                    ui.label(LayoutInspector::grid_summary(self.session.grid()).to_string());
                }
            });
        });
    }

    fn draw_grid(&self, ctx: &EguiContext, actions: &mut Vec<Action>) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::Grid::new("floor_plan")
                .spacing([2.0, 2.0])
                .show(ui, |ui| {
                    for row in self.session.grid().rows() {
                        for (coord, cell) in row {
                            let button = match cell.kind {
                                Some(kind) => egui::Button::new(
                                    egui::RichText::new(format!(
                                        "{}\n{}",
                                        kind.label(),
                                        cell.rotation.arrow()
                                    ))
                                    .color(text_color(kind)),
                                )
                                .fill(color32(kind.color())),
                                None => egui::Button::new("").fill(EMPTY_CELL),
                            };
                            let response = ui.add(button.min_size(egui::vec2(CELL_SIZE, CELL_SIZE)));
                            if response.clicked() {
                                actions.push(Action::PaintCell(coord));
                            }
                            response.on_hover_text(cell_tooltip(coord, cell.kind));
                        }
                        ui.end_row();
                    }
                });
            ui.small(format!(
                "{} x {} cells. Click a cell to paint it with the selected type.",
                mansion_kernel::GRID_COLUMNS,
                mansion_kernel::GRID_ROWS
            ));
        });
    }

    fn draw_scene_overlay(&mut self, ctx: &EguiContext) {
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("hud"),
        ));
        let screen = ctx.screen_rect();

        if self.cursor_captured {
            let c = screen.center();
            let stroke = egui::Stroke::new(2.0, Color32::from_white_alpha(200));
            painter.line_segment([c - egui::vec2(8.0, 0.0), c + egui::vec2(8.0, 0.0)], stroke);
            painter.line_segment([c - egui::vec2(0.0, 8.0), c + egui::vec2(0.0, 8.0)], stroke);
        }

        let stick = self.walker.joystick;
        if stick.is_active() {
            // Joystick positions are logical pixels, same as egui points at
            // the default zoom.
            let center = egui::pos2(stick.center().x, stick.center().y);
            let knob = center + egui::vec2(stick.offset().x, stick.offset().y);
            painter.circle_filled(center, JOYSTICK_OUTER_RADIUS, Color32::from_white_alpha(77));
            painter.circle_filled(knob, JOYSTICK_INNER_RADIUS, Color32::from_white_alpha(153));
        }

        let mut pick = None;
        egui::Area::new(egui::Id::new("touch_buttons"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -48.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let size = egui::vec2(72.0, 48.0);
                    if ui.add(egui::Button::new("Place").min_size(size)).clicked() {
                        pick = Some(Pick::Place);
                    }
                    if ui.add(egui::Button::new("Remove").min_size(size)).clicked() {
                        pick = Some(Pick::Remove);
                    }
                });
            });
        if let Some(pick) = pick {
            let ray = self.center_ray();
            self.pick(pick, &ray);
        }
    }

    fn draw_notice(&self, ctx: &EguiContext) {
        let Some(notice) = self.notice() else {
            return;
        };
        egui::Area::new(egui::Id::new("notice"))
            .anchor(egui::Align2::CENTER_TOP, egui::vec2(0.0, 48.0))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.label(notice.to_string());
                });
            });
    }
}

fn cell_tooltip(coord: CellCoord, kind: Option<BlockKind>) -> String {
    match kind {
        Some(kind) => format!("{coord} {kind}"),
        None => format!("{coord} empty"),
    }
}
