use std::io::Write;

use chrono::Local;
use env_logger::Builder;
use log::LevelFilter;

/// Line format: `2024-01-31 12:00:00 [INFO] fetcher - message`.
/// Defaults to `Info` for this crate and `Warn` for dependencies; `RUST_LOG` overrides both.
pub fn init() {
    let initialized = Builder::new()
        .format(|buf, record| {
            let target = record.target();
            let module = target.rsplit("::").next().unwrap_or(target);
            writeln!(
                buf,
                "{} [{}] {} - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                module,
                record.args()
            )
        })
        .filter(None, LevelFilter::Warn)
        .filter(Some("directory_scraper_lib"), LevelFilter::Info)
        .filter(Some("directory_scraper"), LevelFilter::Info)
        .parse_default_env()
        .try_init()
        .is_ok();

    if initialized {
        log::info!("Logger initialized.");
    }
}
