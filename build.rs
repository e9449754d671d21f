//! 构建时生成应用图标 icon.ico（进度环）并嵌入 Windows 可执行文件

/// 强调色 #00ffcc
const ACCENT: [u8; 4] = [0x00, 0xff, 0xcc, 0xff];
/// 未完成部分的暗色环
const TRACK: [u8; 4] = [0x33, 0x33, 0x33, 0xff];
/// 已完成比例（约四分之三圈）
const FILLED: f32 = 0.75;

#[cfg_attr(not(windows), allow(dead_code))]
fn make_rgba_ring(size: u32) -> Vec<u8> {
    let c = (size as f32) * 0.5;
    let outer = (size as f32) * 0.46;
    let inner = outer * 0.62;
    let mut rgba = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let dx = (x as f32) + 0.5 - c;
            let dy = (y as f32) + 0.5 - c;
            let d = (dx * dx + dy * dy).sqrt();
            if d < inner || d > outer {
                rgba.extend_from_slice(&[0, 0, 0, 0]);
                continue;
            }
            // 自 12 点方向顺时针的角度比例
            let turn = (dx.atan2(-dy) / std::f32::consts::TAU).rem_euclid(1.0);
            rgba.extend_from_slice(if turn <= FILLED { &ACCENT } else { &TRACK });
        }
    }
    rgba
}

fn main() {
    #[cfg(windows)]
    {
        let manifest_dir = std::path::PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap());
        let icon_path = manifest_dir.join("icon.ico");

        let mut icon_dir = ico::IconDir::new(ico::ResourceType::Icon);
        for &size in &[16u32, 32u32, 48u32] {
            let rgba = make_rgba_ring(size);
            let image = ico::IconImage::from_rgba_data(size, size, rgba);
            let entry = ico::IconDirEntry::encode(&image).expect("encode icon entry");
            icon_dir.add_entry(entry);
        }

        let mut file = std::fs::File::create(&icon_path).expect("create icon.ico");
        icon_dir.write(&mut file).expect("write icon.ico");

        let mut res = winres::WindowsResource::new();
        res.set_icon("icon.ico");
        if let Err(e) = res.compile() {
            eprintln!("winres: {} (no Windows SDK/rc.exe, icon not embedded)", e);
        }
    }
}
