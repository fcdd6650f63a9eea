//! End-to-end demo flow: driver launches, consumer registers, tokio runs
//! the deferred settlement task.
//!
//! This is the original demo — "resolve 'foo' or reject 'request rejected'
//! after a zero-delay timer" — rebuilt against the public entry points.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use opensettle_driver::RandomSettleDriver;
use opensettle_types::{DriverConfig, SettlePhase};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[tokio::test]
async fn success_biased_launch_delivers_payload() {
    init_tracing();
    let mut driver = RandomSettleDriver::new(DriverConfig::always_succeeding()).unwrap();

    let cell = driver.launch();
    let results = Arc::new(Mutex::new(Vec::new()));
    let failures = Arc::new(AtomicUsize::new(0));

    let r = Arc::clone(&results);
    let f = Arc::clone(&failures);
    cell.register(
        move |v| r.lock().unwrap().push(v),
        move |_| {
            f.fetch_add(1, Ordering::SeqCst);
        },
    );

    // Registration beat the zero-delay task on the current-thread runtime.
    assert_eq!(cell.phase(), SettlePhase::Undetermined);

    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(*results.lock().unwrap(), vec!["foo".to_string()]);
    assert_eq!(failures.load(Ordering::SeqCst), 0);
    assert_eq!(cell.phase(), SettlePhase::Succeeded);
}

#[tokio::test]
async fn failure_biased_launch_delivers_reason() {
    init_tracing();
    let mut driver = RandomSettleDriver::new(DriverConfig::always_failing()).unwrap();

    let cell = driver.launch();
    let errors = Arc::new(Mutex::new(Vec::new()));
    let successes = Arc::new(AtomicUsize::new(0));

    let e = Arc::clone(&errors);
    let s = Arc::clone(&successes);
    cell.register(
        move |_| {
            s.fetch_add(1, Ordering::SeqCst);
        },
        move |err| e.lock().unwrap().push(err),
    );

    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(*errors.lock().unwrap(), vec!["request rejected".to_string()]);
    assert_eq!(successes.load(Ordering::SeqCst), 0);
    assert_eq!(cell.phase(), SettlePhase::Failed);
}

#[tokio::test]
async fn delayed_launch_stays_undetermined_until_timer_fires() {
    init_tracing();
    let config = DriverConfig {
        settle_delay: Duration::from_millis(30),
        ..DriverConfig::always_succeeding()
    };
    let mut driver = RandomSettleDriver::new(config).unwrap();

    let cell = driver.launch();
    tokio::time::sleep(Duration::from_millis(5)).await;
    assert_eq!(cell.phase(), SettlePhase::Undetermined);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(cell.phase(), SettlePhase::Succeeded);
    assert_eq!(cell.try_success(), Some("foo".to_string()));
}

#[tokio::test]
async fn seeded_launches_settle_deterministically() {
    init_tracing();
    let config = DriverConfig {
        seed: Some(7),
        ..DriverConfig::default()
    };
    let mut first = RandomSettleDriver::new(config.clone()).unwrap();
    let mut second = RandomSettleDriver::new(config).unwrap();

    let cells_a: Vec<_> = (0..10).map(|_| first.launch()).collect();
    let cells_b: Vec<_> = (0..10).map(|_| second.launch()).collect();

    tokio::time::sleep(Duration::from_millis(50)).await;

    let phases_a: Vec<_> = cells_a.iter().map(opensettle_core::Settlable::phase).collect();
    let phases_b: Vec<_> = cells_b.iter().map(opensettle_core::Settlable::phase).collect();

    assert_eq!(phases_a, phases_b);
    assert!(phases_a.iter().all(|p| p.is_terminal()));
}

#[tokio::test]
async fn failing_init_feeds_the_init_error_channel() {
    init_tracing();
    let driver = RandomSettleDriver::new(DriverConfig::always_failing()).unwrap();

    let cell = driver.launch_failing_init();
    let caught = Arc::new(Mutex::new(None));
    let c = Arc::clone(&caught);
    cell.on_init_error(move |e| *c.lock().unwrap() = Some(e));

    assert_eq!(*caught.lock().unwrap(), Some("request rejected".to_string()));
    // The initializer error never settles the cell.
    assert_eq!(cell.phase(), SettlePhase::Undetermined);
}
