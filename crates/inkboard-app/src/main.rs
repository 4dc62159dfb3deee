//! Main application entry point.

fn main() {
    env_logger::init();
    log::info!("Starting Inkboard");

    inkboard_app::App::run();
}
