//! `tracing` output routed to the browser console.
//!
//! Each formatted event is buffered and handed to `console.log` (or
//! `console.warn`/`console.error` for those levels) in one call when the
//! writer is dropped. Off wasm the same lines go to stderr.

use std::io;

use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleMakeWriter;

pub struct ConsoleWriter {
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let line = String::from_utf8_lossy(&self.buf);
        emit(line.trim_end());
    }
}

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter { buf: Vec::new() }
    }
}

#[cfg(target_arch = "wasm32")]
fn emit(line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    let level = line.trim_start();
    if level.starts_with("ERROR") {
        web_sys::console::error_1(&value);
    } else if level.starts_with("WARN") {
        web_sys::console::warn_1(&value);
    } else {
        web_sys::console::log_1(&value);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(line: &str) {
    eprintln!("{line}");
}

/// Install the global subscriber. Calling it again is harmless.
pub fn init() {
    let installed = tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter)
        .without_time()
        .with_target(false)
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
    if installed.is_err() {
        tracing::debug!("subscriber already installed");
    }
}
