mod audio;
mod config;
mod display;
mod library;
mod mpris;
mod playback;
mod runtime;
mod sync;
mod timeline;
mod ui;

#[cfg(test)]
mod testing;

fn main() -> anyhow::Result<()> {
    runtime::run()
}
