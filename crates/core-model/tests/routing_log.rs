//! Routing decisions are traced under the `model` target.

use core_model::EditorModel;
use core_state::OpenRequest;
use core_trailing::ToggleArg;
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::Level;
use tracing::subscriber::with_default;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone)]
struct BufferWriter {
    inner: Arc<Mutex<Vec<u8>>>,
}

struct LockedWriter<'a> {
    guard: MutexGuard<'a, Vec<u8>>,
}

impl<'a> Write for LockedWriter<'a> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for BufferWriter {
    type Writer = LockedWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LockedWriter {
            guard: self.inner.lock().expect("log buffer poisoned"),
        }
    }
}

#[test]
fn routed_events_report_delivery_counts() {
    let buf = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_target(true)
        .with_ansi(false)
        .without_time()
        .with_writer(BufferWriter { inner: buf.clone() })
        .finish();

    with_default(subscriber, || {
        let mut m = EditorModel::default();
        let doc = m.open(OpenRequest::scratch("t", "a")).unwrap();
        m.append(doc, "\n");
        m.toggle_trailing(doc, ToggleArg::Enable);
        m.append(doc, "b\n");
        m.set_mode(doc, "rust");
    });

    let out = String::from_utf8(buf.lock().unwrap().clone()).unwrap();
    let routed: Vec<&str> = out.lines().filter(|l| l.contains("event_routed")).collect();
    assert!(routed.iter().all(|l| l.contains("TRACE model:")));
    assert!(routed.iter().any(|l| l.contains("content_changed") && l.contains("deliveries=0")));
    assert!(routed.iter().any(|l| l.contains("content_changed") && l.contains("deliveries=1")));
    assert!(routed.iter().any(|l| l.contains("mode_changed") && l.contains("deliveries=1")));
}
