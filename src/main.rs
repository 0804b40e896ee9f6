mod api;
mod control;
mod domain;
mod infrastructure;
mod probe;

use domain::settings::SettingsService;
use tracing::info;

const USAGE: &str = "usage: roomctl <serve|control|probe>

  serve    run the bulb HTTP service
  control  run the gesture control session
  probe    find the bulb and exercise its channels";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings_service = SettingsService::new()?;
    let settings = settings_service.get().clone();

    let _logging_guard = infrastructure::logging::init_logger(&settings.log_settings)?;
    info!("Starting roomctl");

    match std::env::args().nth(1).as_deref() {
        Some("serve") => api::server::run_bulb_service(&settings).await,
        Some("control") => control::run_control_loop(&settings).await,
        Some("probe") => probe::run_probe(&settings).await,
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }
}
