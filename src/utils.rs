use std::{env, io::Write};

use chrono::Local;
use env_logger::{Builder, Target};
use log::LevelFilter;

/// Logs to stderr, leaving stdout to the protocol. With `systemd` the
/// timestamps are left to the journal.
pub fn init_logger(systemd: bool) {
    let mut builder = Builder::new();
    builder.target(Target::Stderr);

    if systemd {
        builder.format(|formatter, record| {
            writeln!(formatter, "[{}]: {}", record.level(), record.args())
        });
    } else {
        builder.format(|formatter, record| {
            writeln!(
                formatter,
                "{} {:<5} {}: {}",
                Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        });
    }

    match env::var("RUST_LOG") {
        Ok(filters) => {
            builder.parse_filters(&filters);
        }
        Err(_) => {
            builder.filter(None, LevelFilter::Info);
        }
    }

    builder.init();
}
