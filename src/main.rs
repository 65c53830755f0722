mod app;
mod audio;
mod config;
mod library;
mod logging;
mod mpris;
mod prefs;
mod runtime;
mod ui;

fn main() -> anyhow::Result<()> {
    runtime::run()
}
