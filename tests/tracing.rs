#![allow(missing_docs)]
#![cfg(feature = "tracing")]

use std::{io::Write, sync::{Arc, Mutex}};
use tracing::Level;
use wireup::{Declarations, DynTarget, Injector, InjectorConfig, Target};

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

struct Config;

struct Settings;

impl Target for Settings {
    fn declare(decl: &mut Declarations<Self>) {
        decl.provide("config", |_| Arc::new(Config));
    }
}

#[derive(Default)]
struct Service {
    config: Option<Arc<Config>>
}

impl Target for Service {
    fn declare(decl: &mut Declarations<Self>) {
        decl.field("config", |s| &mut s.config);
    }
}

fn capture(f: impl FnOnce()) -> String {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, f);
    captured.text()
}

#[test]
fn it_traces_setup_cycle() {
    let output = capture(|| {
        let mut injector = Injector::new(vec![
            Box::new(Settings) as Box<dyn DynTarget>,
            Box::new(Service::default())
        ]);
        injector.setup().unwrap();
    });

    assert!(output.contains("registered"));
    assert!(output.contains("injected"));
    assert!(output.contains("setup completed: 2 targets, 1 provided, 1 registered, 1 injected"));
}

#[test]
fn it_traces_skipped_slots() {
    let output = capture(|| {
        let mut injector = Injector::new(vec![
            Box::new(Settings) as Box<dyn DynTarget>,
            Box::new(Service { config: Some(Arc::new(Config)) })
        ]);
        injector.setup().unwrap();
    });

    assert!(output.contains("TRACE"));
    assert!(output.contains("already set"));
}

#[test]
fn it_traces_setup_failure() {
    let output = capture(|| {
        let mut injector = Injector::new(vec![Box::new(Service::default()) as Box<dyn DynTarget>]);
        assert!(injector.setup().is_err());
    });

    assert!(output.contains("ERROR"));
    assert!(output.contains("setup failed: Injection Error: failed to inject"));
}

#[test]
fn it_warns_on_strict_validation_misses() {
    let output = capture(|| {
        let mut injector = Injector::with_config(
            vec![Box::new(Service::default()) as Box<dyn DynTarget>],
            InjectorConfig::new().with_strict_validation()
        );
        assert!(injector.setup().is_err());
    });

    assert!(output.contains("WARN"));
    assert!(output.contains("[Validation]"));
}
