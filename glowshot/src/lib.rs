//! Glowshot
//!
//! Command line front end for the photo effects pipeline. It plays the part
//! of the upload form: files and form fields come in, parameters are resolved
//! against the preset store, and the edited JPEGs go out as loose files or a
//! single archive.
//!
//! # Architecture
//! - `config`: toml application settings
//! - `request`: one batch request, from form fields to processed outputs
//! - `archive`: writing the outputs to disk
//! - `cli` / `commands`: argument parsing and subcommand dispatch

#[macro_use]
extern crate derivative;

pub mod archive;
pub mod cli;
pub mod commands;
pub mod config;
pub mod request;

/// Initializes the logger.
///
/// Format: timestamp, log level, file name, line number and message.
/// Defaults to `info`, `RUST_LOG` overrides it.
pub fn init_logger() {
    use std::io::Write;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            let ts = chrono::Local::now().format("%H:%M:%S");

            writeln!(
                buf,
                "[{} {style}{}{style:#} {} {}] {}",
                ts,
                record.level(),
                record
                    .file()
                    .unwrap_or("None")
                    .split('/')
                    .next_back()
                    .unwrap_or("None"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}
