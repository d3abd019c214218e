//! Concurrent use and logging.

use std::io;
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use safe_json_stringify::{decycle_with_stats, stringify, ArrayRef, ObjectRef, Thrown, Value};
use tracing_subscriber::EnvFilter;

fn cyclic_graph() -> Value {
    let root = ObjectRef::new();
    let children = ArrayRef::new();
    for i in 0..4 {
        let child = ObjectRef::new();
        child.set("i", i);
        child.set("parent", root.clone());
        child.define_getter("flaky", move || {
            if i % 2 == 0 {
                Ok(Value::from("ok"))
            } else {
                Err(Thrown::new(format!("child {i} failed")))
            }
        });
        children.push(child);
    }
    root.set("children", children);
    Value::Object(root)
}

#[test]
fn test_concurrent_calls_have_independent_state() {
    let graph = cyclic_graph();
    let expected = stringify(&graph);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let graph = graph.clone();
            thread::spawn(move || (0..100).map(|_| stringify(&graph)).collect::<Vec<_>>())
        })
        .collect();

    for handle in handles {
        for text in handle.join().unwrap() {
            assert_eq!(text, expected);
        }
    }
    assert!(expected.contains(r#""parent":"[Circular]""#));
    assert!(expected.contains(r#""flaky":"[Throws: child 1 failed]""#));
}

#[test]
fn test_stats_count_substitutions() {
    let (_, stats) = decycle_with_stats(&cyclic_graph());
    assert_eq!(stats.circular, 4);
    assert_eq!(stats.throws, 2);
}

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_trace_summary_emitted() {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("safe_json_stringify=trace"))
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let text = tracing::subscriber::with_default(subscriber, || stringify(&cyclic_graph()));
    assert!(text.starts_with('{'));

    let logs = String::from_utf8(captured.0.lock().clone()).unwrap();
    assert!(logs.contains("Decycled value graph"), "logs: {logs}");
    assert!(logs.contains("circular=4"), "logs: {logs}");
    assert!(logs.contains("throws=2"), "logs: {logs}");
}
