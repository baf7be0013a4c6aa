mod app;
mod audio;
mod config;
mod cover;
mod library;
mod mpris;
mod playback;
mod playlist;
mod runtime;
mod session;
#[cfg(test)]
mod testing;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
