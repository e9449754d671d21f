//! Progress Sentinel — 年度/目标日期倒计时桌面小部件（Rust + egui）

mod app;
mod calendar;
mod counter;
mod error;
mod logging;
mod settings;
mod widget;

fn main() -> eframe::Result<()> {
    let data_dir = settings::data_dir();
    // 日志初始化失败不影响小部件运行
    let _logger = match logging::init_logging(&data_dir) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("progress-sentinel: logging disabled: {e}");
            None
        }
    };

    let settings_path = settings::settings_path();
    log::info!("starting, settings at {}", settings_path.display());
    let settings = settings::Settings::load_or_default(&settings_path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(app::SINGLE_MONTH_SIZE)
            .with_title("Progress Sentinel")
            .with_decorations(false) // 无边框，拖动背景移动窗口
            .with_transparent(true)
            .with_resizable(false)
            .with_window_level(egui::viewport::WindowLevel::AlwaysOnBottom)
            .with_taskbar(false)
            .with_icon(egui::IconData::default()),
        ..Default::default()
    };
    eframe::run_native(
        "Progress Sentinel",
        options,
        Box::new(move |cc| Ok(Box::new(app::SentinelApp::new(cc, settings, settings_path)))),
    )
}
