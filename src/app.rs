//! egui 主界面：计数、年度进度条、日历网格、右键菜单与目标日期输入

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::Datelike;
use eframe::egui;
use log::{debug, info, warn};

use crate::calendar::{DayCell, DayClass, MonthGrid, ViewMode};
use crate::error::TargetDateError;
use crate::settings::Settings;
use crate::widget::{self, RefreshSchedule, WidgetState, WidgetView};

/// 单月模式窗口尺寸
pub const SINGLE_MONTH_SIZE: [f32; 2] = [280.0, 480.0];
/// 六个月模式窗口尺寸
pub const SIX_MONTH_SIZE: [f32; 2] = [1300.0, 260.0];

/// 进度条尺寸
const PROGRESS_WIDTH: f32 = 240.0;
const PROGRESS_HEIGHT: f32 = 6.0;
/// 日期格边长
const DAY_CELL_SIZE: f32 = 22.0;

/// 深色半透明主题
mod sentinel_theme {
    use eframe::egui::Color32;

    /// 强调色 #00ffcc：标题、进度、今天
    pub const ACCENT: Color32 = Color32::from_rgb(0x00, 0xff, 0xcc);
    /// rgba(18, 18, 18, 230)
    pub const BG: Color32 = Color32::from_rgba_premultiplied(16, 16, 16, 230);
    pub const TEXT_WHITE: Color32 = Color32::WHITE;
    pub const COUNTER_LABEL: Color32 = Color32::from_rgb(0x88, 0x88, 0x88);
    pub const MONTH_LABEL: Color32 = Color32::from_rgb(0x55, 0x55, 0x55);
    pub const PROGRESS_TRACK: Color32 = Color32::from_rgb(0x22, 0x22, 0x22);
    pub const PAST_DAY: Color32 = Color32::from_rgb(0x44, 0x44, 0x44);
    pub const FUTURE_BORDER: Color32 = Color32::from_rgb(0x22, 0x22, 0x22);
    pub const BUTTON_BG: Color32 = Color32::from_rgb(0x25, 0x25, 0x25);
    pub const BUTTON_BORDER: Color32 = Color32::from_rgb(0x33, 0x33, 0x33);
    pub const BUTTON_TEXT: Color32 = Color32::from_rgb(0xbb, 0xbb, 0xbb);
    pub const ERROR: Color32 = Color32::from_rgb(0xff, 0x66, 0x66);
}

/// 运行时指定字体文件（如 Segoe UI Variable）
const FONT_PATH_ENV: &str = "PROGRESS_SENTINEL_FONT_PATH";

/// 优先使用 Segoe UI；未找到时保留 egui 内置字体
fn setup_fonts(ctx: &egui::Context) {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(path) = std::env::var_os(FONT_PATH_ENV) {
        candidates.push(PathBuf::from(path));
    }
    #[cfg(windows)]
    candidates.extend(
        [
            r"C:\Windows\Fonts\SegUIVar.ttf", // Segoe UI Variable
            r"C:\Windows\Fonts\segoeui.ttf",
        ]
        .map(PathBuf::from),
    );

    for path in candidates {
        let Ok(bytes) = std::fs::read(&path) else {
            continue;
        };
        let mut fonts = egui::FontDefinitions::default();
        fonts
            .font_data
            .insert("sentinel".to_owned(), Arc::new(egui::FontData::from_owned(bytes)));
        fonts
            .families
            .entry(egui::FontFamily::Proportional)
            .or_default()
            .insert(0, "sentinel".to_owned());
        ctx.set_fonts(fonts);
        info!("using font {}", path.display());
        return;
    }
}

/// Windows：把窗口压回 z 序底部（置底窗口被点击后会浮上来）
#[cfg(windows)]
fn try_send_to_bottom(frame: &eframe::Frame) -> bool {
    use raw_window_handle::{HasWindowHandle, RawWindowHandle};
    use std::ffi::c_void;
    use windows_sys::Win32::UI::WindowsAndMessaging::{
        HWND_BOTTOM, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOSIZE, SetWindowPos,
    };

    let opt = frame.window_handle().ok();
    let handle = match opt.as_ref() {
        Some(h) => h.as_ref(),
        None => return false,
    };
    let hwnd: isize = match handle {
        RawWindowHandle::Win32(w) => w.hwnd.get(),
        _ => return false,
    };
    if hwnd == 0 {
        return false;
    }
    let ok = unsafe {
        SetWindowPos(
            hwnd as *mut c_void,
            HWND_BOTTOM,
            0,
            0,
            0,
            0,
            SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE,
        )
    };
    ok != 0
}

#[cfg(not(windows))]
fn try_send_to_bottom(_frame: &eframe::Frame) -> bool {
    false
}

fn size_for(mode: ViewMode) -> egui::Vec2 {
    let [w, h] = match mode {
        ViewMode::SingleMonth => SINGLE_MONTH_SIZE,
        ViewMode::SixMonth => SIX_MONTH_SIZE,
    };
    egui::vec2(w, h)
}

/// 界面发回的用户操作
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum UserAction {
    ToggleView,
    OpenTargetDialog,
    Quit,
}

/// 「设置目标日期」对话框的输入状态
struct TargetDialog {
    input: String,
    error: Option<String>,
    focus_requested: bool,
}

enum DialogOutcome {
    Open,
    Submit,
    Cancel,
}

pub struct SentinelApp {
    state: WidgetState,
    view: WidgetView,
    schedule: RefreshSchedule,
    settings: Settings,
    settings_path: PathBuf,
    target_dialog: Option<TargetDialog>,
    /// 已按哪种模式设置过窗口尺寸
    applied_mode: Option<ViewMode>,
    was_focused: bool,
}

impl SentinelApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings, settings_path: PathBuf) -> Self {
        setup_fonts(&cc.egui_ctx);
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let mut state = WidgetState::new(settings.target_date);
        let view = state.tick(widget::today());
        let mut schedule = RefreshSchedule::default();
        schedule.mark(Instant::now());

        Self {
            state,
            view,
            schedule,
            settings,
            settings_path,
            target_dialog: None,
            applied_mode: None,
            was_focused: false,
        }
    }

    /// 到期或状态变化时重算
    fn refresh_if_due(&mut self) {
        let now = Instant::now();
        if self.state.is_refresh_due() || self.schedule.is_due(now) {
            self.view = self.state.tick(widget::today());
            self.schedule.mark(now);
            debug!(
                "refreshed for {}: {} days left in year, {} until target",
                self.view.today,
                self.view.counters.days_remaining_in_year,
                self.view.counters.days_until_target
            );
        }
    }

    /// 设置目标日期并写回设置文件；保存失败只记日志
    fn apply_target_input(&mut self, raw: &str) -> Result<(), TargetDateError> {
        self.state
            .set_target_date(raw)
            .inspect_err(|e| warn!("rejected target date: {e}"))?;

        let target = self.state.target_date();
        info!("target date set to {target}");
        self.settings.target_date = target;
        if let Err(e) = self.settings.save_to(&self.settings_path) {
            warn!("failed to save settings to {}: {e}", self.settings_path.display());
        }
        Ok(())
    }

    fn handle_action(&mut self, ctx: &egui::Context, action: UserAction) {
        match action {
            UserAction::ToggleView => {
                self.state.toggle_view_mode();
                info!("view mode: {:?}", self.state.view_mode());
            }
            UserAction::OpenTargetDialog => {
                self.target_dialog = Some(TargetDialog {
                    input: self.state.target_date().to_string(),
                    error: None,
                    focus_requested: false,
                });
            }
            UserAction::Quit => {
                info!("exit requested");
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
    }
}

impl eframe::App for SentinelApp {
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        egui::Rgba::TRANSPARENT.to_array()
    }

    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.refresh_if_due();

        // 切换视图后调整窗口尺寸（只发一次）
        let mode = self.state.view_mode();
        if self.applied_mode != Some(mode) {
            ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(size_for(mode)));
            self.applied_mode = Some(mode);
        }

        // 失去焦点时沉回底部
        let focused = ctx.input(|i| i.viewport().focused.unwrap_or(false));
        if self.was_focused && !focused {
            if !try_send_to_bottom(frame) {
                debug!("could not move window to the bottom of the z-order");
            }
        }
        self.was_focused = focused;

        let action = self.ui_main(ctx);
        self.ui_target_dialog(ctx);
        if let Some(action) = action {
            self.handle_action(ctx, action);
        }

        if self.state.is_refresh_due() {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(self.schedule.time_until_due(Instant::now()));
        }
    }
}

impl SentinelApp {
    fn ui_main(&self, ctx: &egui::Context) -> Option<UserAction> {
        use sentinel_theme::BG;

        let mut action = None;
        let frame = egui::Frame::NONE
            .fill(BG)
            .corner_radius(egui::CornerRadius::same(15))
            .inner_margin(egui::Margin::same(12));

        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            // 背景：左键拖动窗口，右键菜单；先注册，子控件优先响应
            let background = ui.interact(
                ui.max_rect(),
                ui.id().with("background"),
                egui::Sense::click_and_drag(),
            );
            if background.drag_started_by(egui::PointerButton::Primary) {
                ctx.send_viewport_cmd(egui::ViewportCommand::StartDrag);
            }
            background.context_menu(|ui| {
                if ui.button("Set Target Date (YYYY-MM-DD)").clicked() {
                    action = Some(UserAction::OpenTargetDialog);
                    ui.close();
                }
                if ui.button("Exit Widget").clicked() {
                    action = Some(UserAction::Quit);
                    ui.close();
                }
            });

            if ui_header(ui) {
                action = Some(UserAction::ToggleView);
            }
            ui.add_space(6.0);

            match self.view.view_mode {
                ViewMode::SingleMonth => {
                    ui_counters(ui, &self.view);
                    ui.add_space(10.0);
                    ui_calendar(ui, &self.view.months);
                }
                ViewMode::SixMonth => {
                    ui.horizontal_top(|ui| {
                        ui.vertical(|ui| {
                            ui.set_width(PROGRESS_WIDTH);
                            ui_counters(ui, &self.view);
                        });
                        ui.add_space(16.0);
                        ui_calendar(ui, &self.view.months);
                    });
                }
            }
        });

        action
    }

    fn ui_target_dialog(&mut self, ctx: &egui::Context) {
        let Some(mut dialog) = self.target_dialog.take() else {
            return;
        };

        let mut outcome = DialogOutcome::Open;
        egui::Window::new("Target")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Enter Target Date:");
                let input = ui.add(egui::TextEdit::singleline(&mut dialog.input).desired_width(160.0));
                if !dialog.focus_requested {
                    input.request_focus();
                    dialog.focus_requested = true;
                }
                if input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    outcome = DialogOutcome::Submit;
                }
                if let Some(error) = &dialog.error {
                    ui.label(egui::RichText::new(error).size(10.0).color(sentinel_theme::ERROR));
                }
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        outcome = DialogOutcome::Submit;
                    }
                    if ui.button("Cancel").clicked() {
                        outcome = DialogOutcome::Cancel;
                    }
                });
            });

        match outcome {
            DialogOutcome::Open => self.target_dialog = Some(dialog),
            DialogOutcome::Cancel => {}
            DialogOutcome::Submit => {
                if let Err(e) = self.apply_target_input(&dialog.input) {
                    // 解析失败：保留对话框并显示错误
                    dialog.error = Some(e.to_string());
                    self.target_dialog = Some(dialog);
                }
            }
        }
    }
}

/// 标题行；返回是否点击了「Toggle View」
fn ui_header(ui: &mut egui::Ui) -> bool {
    use sentinel_theme::{ACCENT, BUTTON_BG, BUTTON_BORDER, BUTTON_TEXT};

    let mut clicked = false;
    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new("PROGRESS SENTINEL")
                .size(11.0)
                .strong()
                .color(ACCENT),
        );
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let button = egui::Button::new(
                egui::RichText::new("Toggle View").size(10.0).color(BUTTON_TEXT),
            )
            .fill(BUTTON_BG)
            .stroke(egui::Stroke::new(1.0, BUTTON_BORDER));
            clicked = ui
                .add(button)
                .on_hover_cursor(egui::CursorIcon::PointingHand)
                .clicked();
        });
    });
    clicked
}

fn ui_counters(ui: &mut egui::Ui, view: &WidgetView) {
    use sentinel_theme::{COUNTER_LABEL, TEXT_WHITE};

    let counters = &view.counters;
    let rows = [
        (
            format!("YEAR {} REMAINING", counters.year),
            counters.days_remaining_in_year,
        ),
        (
            format!("UNTIL {}", view.target_date),
            counters.display_days_until_target(),
        ),
    ];
    for (label, days) in rows {
        ui.label(
            egui::RichText::new(label)
                .size(10.0)
                .strong()
                .color(COUNTER_LABEL),
        );
        ui.label(
            egui::RichText::new(format!("{days}D"))
                .size(36.0)
                .strong()
                .color(TEXT_WHITE),
        );
    }
    ui.add_space(4.0);
    paint_year_progress(ui, counters.year_progress_fraction as f32);
}

/// 年度进度条：暗色底 + 强调色填充
fn paint_year_progress(ui: &mut egui::Ui, fraction: f32) {
    use sentinel_theme::{ACCENT, PROGRESS_TRACK};

    let (rect, _) = ui.allocate_exact_size(
        egui::vec2(PROGRESS_WIDTH, PROGRESS_HEIGHT),
        egui::Sense::hover(),
    );
    let painter = ui.painter();
    let radius = egui::CornerRadius::same(3);
    painter.rect_filled(rect, radius, PROGRESS_TRACK);

    let fill_width = (PROGRESS_WIDTH * fraction.clamp(0.0, 1.0)).floor();
    if fill_width > 0.0 {
        let fill = egui::Rect::from_min_size(rect.min, egui::vec2(fill_width, PROGRESS_HEIGHT));
        painter.rect_filled(fill, radius, ACCENT);
    }
}

/// 多个月份横向排列
fn ui_calendar(ui: &mut egui::Ui, months: &[MonthGrid]) {
    ui.horizontal_top(|ui| {
        for month in months {
            ui.vertical(|ui| ui_month(ui, month));
            ui.add_space(8.0);
        }
    });
}

fn ui_month(ui: &mut egui::Ui, month: &MonthGrid) {
    ui.vertical_centered(|ui| {
        ui.label(
            egui::RichText::new(month.label())
                .size(9.0)
                .strong()
                .color(sentinel_theme::MONTH_LABEL),
        );
    });
    egui::Grid::new(("month", month.year, month.month))
        .spacing([2.0, 2.0])
        .show(ui, |ui| {
            for cell in &month.days {
                let (row, col) = cell.grid_position();
                if col == 0 && row > 0 {
                    ui.end_row();
                }
                paint_day_cell(ui, cell);
            }
        });
}

/// 日期格：过去（暗色划线）、今天（强调色填充）、未来（细边框）
fn paint_day_cell(ui: &mut egui::Ui, cell: &DayCell) {
    use sentinel_theme::{ACCENT, FUTURE_BORDER, PAST_DAY, TEXT_WHITE};

    let (rect, _) = ui.allocate_exact_size(egui::vec2(DAY_CELL_SIZE, DAY_CELL_SIZE), egui::Sense::hover());
    let painter = ui.painter();
    let radius = egui::CornerRadius::same(4);
    let font = egui::FontId::proportional(10.0);
    let center = rect.center();
    let text = cell.date.day().to_string();

    match cell.class {
        DayClass::Past => {
            let galley = painter.layout_no_wrap(text, font, PAST_DAY);
            let half = galley.size().x / 2.0 + 1.0;
            painter.galley(center - galley.size() / 2.0, galley, PAST_DAY);
            painter.line_segment(
                [egui::pos2(center.x - half, center.y), egui::pos2(center.x + half, center.y)],
                egui::Stroke::new(1.0, PAST_DAY),
            );
        }
        DayClass::Current => {
            painter.rect_filled(rect, radius, ACCENT);
            painter.text(center, egui::Align2::CENTER_CENTER, text, font, egui::Color32::BLACK);
        }
        DayClass::Future => {
            painter.rect_stroke(
                rect,
                radius,
                egui::Stroke::new(1.0, FUTURE_BORDER),
                egui::StrokeKind::Inside,
            );
            painter.text(center, egui::Align2::CENTER_CENTER, text, font, TEXT_WHITE);
        }
    }
}
