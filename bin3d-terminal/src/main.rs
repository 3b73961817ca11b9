/// bin3d Terminal Demo - Smart Bin Scene
///
/// Renders the rotating bin scene with half-block characters.
/// Controls:
///   - Mouse drag / WASD / Arrow Keys: Rotate
///   - Mouse wheel / +/-: Zoom
///   - Q/ESC: Quit
///
/// Set `RUST_LOG` to write diagnostics to `bin3d-terminal.log`.
use std::fs::File;
use std::io;
use std::sync::Mutex;

use bin3d_terminal::{TerminalApp, TerminalConfig};
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "bin3d-terminal.log";

fn init_logging() -> io::Result<()> {
    // The terminal is owned by the scene, so logs only go to a file and
    // only when asked for
    let Ok(filter) = EnvFilter::try_from_default_env() else {
        return Ok(());
    };
    let file = File::create(LOG_FILE)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> io::Result<()> {
    init_logging()?;
    tracing::info!("bin3d-terminal v{} starting", env!("CARGO_PKG_VERSION"));

    let mut app = TerminalApp::new(TerminalConfig::default())?;
    app.run()?;

    println!("Thank you for using the bin3d terminal renderer!");
    Ok(())
}
