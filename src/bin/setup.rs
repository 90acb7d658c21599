//! Prepares a database: applies migrations and seeds the faculty listed in the configuration.
//!
//! Running it again is harmless. Existing faculty are left as they are.

use class_attendance::logging::init_logging;
use class_attendance::{config::Settings, display, manager::AttendanceManager};
use std::env;
use std::path::PathBuf;
use tracing::info;

pub fn main() -> anyhow::Result<()> {
    let config_path = env::args_os().nth(1).map(PathBuf::from);

    let settings = Settings::load(config_path.as_deref())?;
    let _guard = init_logging(&settings.logging)?;

    // Connecting applies any pending migrations.
    let manager = AttendanceManager::connect(&settings.database)?;

    for seed in &settings.faculty {
        let member = manager.ensure_faculty(&seed.name, &seed.subject)?;
        info!(faculty_id = member.id, name = %member.name, "faculty ready");
    }

    let faculty = manager.list_faculty()?;
    println!("Database ready at {}", settings.database.url);
    println!("{}", display::faculty_table(&faculty));

    Ok(())
}
