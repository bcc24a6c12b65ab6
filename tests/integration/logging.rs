//! Tests for diagnostics emitted through `tracing`

use std::io;
use std::sync::{Arc, Mutex};

use artlink_schema::{boolean, record};
use artlink_wire::{construct, restore_or_else};
use artlink_foundation::Value;
use tracing::Level;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

fn capture<T>(f: impl FnOnce() -> T) -> (T, String) {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, captured.text())
}

#[test]
fn fallback_is_logged_as_warning() {
    let codec = construct(&record([("on", boolean())])).unwrap();
    let (restored, logs) = capture(|| {
        restore_or_else(&codec, "data=@@", || {
            Ok(Value::Record(artlink_foundation::Record::new().with("on", Value::Bool(true))))
        })
    });
    assert!(restored.is_ok());
    assert!(logs.contains("WARN"), "{logs}");
    assert!(logs.contains("using fallback"), "{logs}");
}

#[test]
fn rejections_are_logged_at_debug() {
    let codec = construct(&boolean()).unwrap();
    let (result, logs) = capture(|| codec.encode(&Value::Num(1.0)));
    assert!(result.is_err());
    assert!(logs.contains("rejected value"), "{logs}");
}

#[test]
fn successful_roundtrip_is_quiet_at_warn() {
    let codec = construct(&boolean()).unwrap();
    let (result, logs) = capture(|| codec.decode(&codec.encode(&Value::Bool(true)).unwrap()));
    assert_eq!(result.unwrap(), Value::Bool(true));
    assert!(!logs.contains("WARN"), "{logs}");
}
