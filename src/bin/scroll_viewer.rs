//! Scroll-driven showcase; the mouse wheel scrubs the sequence:
//! `scroll-viewer [path/to/model.glb]`

use scrollscene::viewer::{ScrollMode, Viewer, ViewerConfig};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = ViewerConfig::default();
    if let Some(path) = std::env::args().nth(1) {
        config = config.with_model_path(path);
    }

    if let Err(err) = Viewer::new(config, ScrollMode::default()).run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}
