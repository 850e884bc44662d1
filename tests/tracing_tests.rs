//! Tests for tracing instrumentation.
//!
//! These tests verify that tracing spans and events are emitted correctly
//! when the tracing feature is enabled.

#![cfg(feature = "tracing")]

use kmer_hash::run::{assemble, AssemblyOptions};
use kmer_hash::table::TableKind;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn options() -> AssemblyOptions {
    AssemblyOptions {
        ranks: 2,
        expect_k: None,
        table: TableKind::Segmented,
    }
}

/// A simple layer that counts events at INFO level or above.
struct EventCounter {
    count: Arc<AtomicUsize>,
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCounter {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        if event.metadata().level() <= &Level::INFO {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// A layer that records the names of spans as they are created.
struct SpanNames {
    names: Arc<Mutex<Vec<String>>>,
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for SpanNames {
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        self.names
            .lock()
            .unwrap()
            .push(attrs.metadata().name().to_string());
    }
}

#[test]
fn assemble_emits_tracing_events() {
    let event_count = Arc::new(AtomicUsize::new(0));
    let layer = EventCounter {
        count: Arc::clone(&event_count),
    };

    let subscriber = tracing_subscriber::registry().with(layer);

    tracing::subscriber::with_default(subscriber, || {
        assemble(fixture_path("small.txt"), &options()).expect("should assemble");
    });

    // Starting, finished inserting and complete.
    assert!(
        event_count.load(Ordering::SeqCst) >= 3,
        "should emit tracing events"
    );
}

#[test]
fn assemble_enters_one_span_per_phase() {
    let names = Arc::new(Mutex::new(Vec::new()));
    let layer = SpanNames {
        names: Arc::clone(&names),
    };

    let subscriber = tracing_subscriber::registry().with(layer);

    tracing::subscriber::with_default(subscriber, || {
        assemble(fixture_path("small.txt"), &options()).expect("should assemble");
    });

    let names = names.lock().unwrap();
    assert_eq!(
        names.as_slice(),
        ["read_kmers", "insert_kmers", "assemble_contigs"]
    );
}

#[tracing_test::traced_test]
#[test]
fn failed_run_still_logs_start() {
    let result = assemble(fixture_path("broken.txt"), &options());
    assert!(result.is_err());
    assert!(logs_contain("Starting assembly"));
    assert!(!logs_contain("Assembly complete"));
}

#[tracing_test::traced_test]
#[test]
fn completion_event_reports_final_progress() {
    let report = assemble(fixture_path("small.txt"), &options()).expect("should assemble");
    assert_eq!(report.total_kmers(), 65);
    assert!(logs_contain("Assembly complete"));
    assert!(logs_contain("kmers_inserted=65"));
    assert!(logs_contain("contigs_assembled=5"));
}
