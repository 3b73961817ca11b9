/// Tracing events written to the browser console
use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::JsValue;
use web_sys::console;

/// Install a subscriber that prints INFO and above to the console.
///
/// A second call leaves the first subscriber in place.
pub fn init_logging() {
    let installed = tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter)
        .with_max_level(Level::INFO)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .try_init();
    if let Err(err) = installed {
        console::warn_1(&JsValue::from_str(&format!("bin3d logging not installed: {}", err)));
    }
}

/// Hands out one [`ConsoleWriter`] per event.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// Buffers one formatted event and sends it to the console method matching
/// its level when dropped.
#[derive(Debug)]
pub struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        Self {
            level,
            buffer: Vec::new(),
        }
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if let Some(message) = take_message(&mut self.buffer) {
            emit(self.level, &message);
        }
    }
}

/// Drain the buffer into a line without the trailing newline.
fn take_message(buffer: &mut Vec<u8>) -> Option<String> {
    let message = String::from_utf8_lossy(buffer).trim_end().to_string();
    buffer.clear();
    (!message.is_empty()).then_some(message)
}

fn emit(level: Level, message: &str) {
    let value = JsValue::from_str(message);
    if level == Level::ERROR {
        console::error_1(&value);
    } else if level == Level::WARN {
        console::warn_1(&value);
    } else if level == Level::INFO {
        console::info_1(&value);
    } else {
        console::debug_1(&value);
    }
}
