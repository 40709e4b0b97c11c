//! Terminal rendering of the display state.
//!
//! [`Renderer`] is the rendering layer used by the binary: it follows a
//! [`DisplayState`](crate::state::DisplayState) subscription and writes every
//! new value as JSON, one document per assignment.

use std::io::Write;

use serde_json::Value;
use tokio::sync::watch;

/// Writes display state values to an output sink.
#[derive(Debug)]
pub struct Renderer<W> {
    out: W,
    pretty: bool,
}

impl<W: Write> Renderer<W> {
    /// Creates a renderer writing to `out`.
    pub fn new(out: W, pretty: bool) -> Self {
        Self { out, pretty }
    }

    /// Writes a single value followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the underlying writer.
    pub fn render(&mut self, value: &Value) -> std::io::Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.out, value)?;
        } else {
            serde_json::to_writer(&mut self.out, value)?;
        }
        writeln!(self.out)?;
        self.out.flush()
    }

    /// Renders the current value, then every subsequent assignment until the
    /// state is dropped.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the underlying writer.
    pub async fn follow(&mut self, mut rx: watch::Receiver<Value>) -> std::io::Result<()> {
        // Blocking writes on the worker thread; output is small terminal text.
        let current = rx.borrow_and_update().clone();
        self.render(&current)?;
        while rx.changed().await.is_ok() {
            let value = rx.borrow_and_update().clone();
            self.render(&value)?;
        }
        Ok(())
    }

    /// Consumes the renderer, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::state::DisplayState;

    fn output(renderer: Renderer<Vec<u8>>) -> String {
        let Ok(s) = String::from_utf8(renderer.into_inner()) else {
            panic!("renderer wrote invalid utf-8");
        };
        s
    }

    #[test]
    fn compact_render_is_one_line() {
        let mut r = Renderer::new(Vec::new(), false);
        let Ok(()) = r.render(&json!({"a": 1})) else {
            panic!("render failed");
        };
        assert_eq!(output(r), "{\"a\":1}\n");
    }

    #[test]
    fn pretty_render_indents() {
        let mut r = Renderer::new(Vec::new(), true);
        let Ok(()) = r.render(&json!({"a": 1})) else {
            panic!("render failed");
        };
        assert_eq!(output(r), "{\n  \"a\": 1\n}\n");
    }

    #[test]
    fn initial_state_renders_as_empty_string() {
        let mut r = Renderer::new(Vec::new(), false);
        let Ok(()) = r.render(&DisplayState::initial_value()) else {
            panic!("render failed");
        };
        assert_eq!(output(r), "\"\"\n");
    }

    #[tokio::test]
    async fn follow_renders_until_state_dropped() {
        let state = DisplayState::new();
        let rx = state.subscribe();

        let handle = tokio::spawn(async move {
            let mut r = Renderer::new(Vec::new(), false);
            let result = r.follow(rx).await;
            (result, r)
        });

        state.apply_message(r#"{"b":2}"#);
        drop(state);

        let Ok((result, r)) = handle.await else {
            panic!("render task panicked");
        };
        tokio_test::assert_ok!(result);
        let text = output(r);
        assert!(text.starts_with("\"\"\n") || text.starts_with("{\"b\":2}\n"));
        assert!(text.ends_with("{\"b\":2}\n"));
    }
}
