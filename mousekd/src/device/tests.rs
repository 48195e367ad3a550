use super::*;
use crate::event_sink::recording_sink::{Recorded, RecordingSink};
use std::io;
use std::sync::Arc;
use std::thread;
use uinput_ioctls::codes::{BTN_LEFT, BTN_RIGHT, KEY_UP, REL_WHEEL};

/// Started service plus a handle on the log of its sink
fn started_service() -> (MousekService<RecordingSink>, RecordingSink) {
    let service = MousekService::new();
    let sink = RecordingSink::new();
    let registered = sink.clone();
    service.start(move || Ok(registered)).unwrap();
    (service, sink)
}

fn opened_service() -> (MousekService<RecordingSink>, RecordingSink) {
    let (service, sink) = started_service();
    service.open().unwrap();
    (service, sink)
}

//
// 1. Lifecycle transitions
//
#[test]
fn test_start_open_release() {
    let service = MousekService::<RecordingSink>::new();
    assert_eq!(service.lifecycle_state(), LifecycleState::Uninitialized);

    let sink = RecordingSink::new();
    let registered = sink.clone();
    service.start(move || Ok(registered)).unwrap();
    assert_eq!(service.lifecycle_state(), LifecycleState::Registered);

    service.open().unwrap();
    assert_eq!(service.lifecycle_state(), LifecycleState::Open);

    service.release().unwrap();
    assert_eq!(service.lifecycle_state(), LifecycleState::Closed);
    assert_eq!(sink.unregister_count(), 1);

    // shutting down after the release must not unregister again
    service.stop().unwrap();
    assert_eq!(service.lifecycle_state(), LifecycleState::Destroyed);
    assert_eq!(sink.unregister_count(), 1);
}

#[test]
fn test_failed_registration_aborts_start() {
    let service = MousekService::<RecordingSink>::new();
    let err = service
        .start(|| Err(io::Error::from(io::ErrorKind::PermissionDenied)))
        .unwrap_err();

    match err {
        DeviceError::Registration(e) => assert_eq!(e.kind(), io::ErrorKind::PermissionDenied),
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(service.lifecycle_state(), LifecycleState::Uninitialized);
    assert!(matches!(
        service.open(),
        Err(DeviceError::Unavailable(LifecycleState::Uninitialized))
    ));
}

#[test]
fn test_start_twice_is_rejected() {
    let (service, _sink) = started_service();
    let err = service.start(|| Ok(RecordingSink::new())).unwrap_err();
    assert!(matches!(
        err,
        DeviceError::AlreadyStarted(LifecycleState::Registered)
    ));
}

//
// 2. Shutdown
//
#[test]
fn test_stop_is_idempotent() {
    let (service, sink) = opened_service();

    service.stop().unwrap();
    assert_eq!(service.lifecycle_state(), LifecycleState::Destroyed);
    assert_eq!(sink.unregister_count(), 1);

    service.stop().unwrap();
    assert_eq!(service.lifecycle_state(), LifecycleState::Destroyed);
    assert_eq!(sink.log(), vec![Recorded::Unregistered]);
}

#[test]
fn test_stop_without_start() {
    let service = MousekService::<RecordingSink>::new();
    service.stop().unwrap();
    service.stop().unwrap();
    assert_eq!(service.lifecycle_state(), LifecycleState::Destroyed);
}

//
// 3. Usage errors
//
#[test]
fn test_write_before_open() {
    let (service, sink) = started_service();
    let err = service.write(b"i_q").unwrap_err();
    assert!(matches!(err, DeviceError::NotOpen(LifecycleState::Registered)));
    assert!(sink.log().is_empty());
}

#[test]
fn test_second_open_is_rejected() {
    let (service, _sink) = opened_service();
    assert!(matches!(service.open(), Err(DeviceError::AlreadyOpen)));
    assert_eq!(service.lifecycle_state(), LifecycleState::Open);
}

#[test]
fn test_no_reuse_after_release() {
    let (service, sink) = opened_service();
    service.release().unwrap();

    assert!(matches!(
        service.write(b"i_q"),
        Err(DeviceError::NotOpen(LifecycleState::Closed))
    ));
    assert!(matches!(
        service.open(),
        Err(DeviceError::Unavailable(LifecycleState::Closed))
    ));
    assert!(matches!(
        service.release(),
        Err(DeviceError::NotOpen(LifecycleState::Closed))
    ));
    assert_eq!(sink.log(), vec![Recorded::Unregistered]);
}

#[test]
fn test_write_after_stop() {
    let (service, _sink) = opened_service();
    service.stop().unwrap();
    assert!(matches!(
        service.write(b"i_q"),
        Err(DeviceError::NotOpen(LifecycleState::Destroyed))
    ));
}

//
// 4. Writes
//
#[test]
fn test_write_reports_full_length() {
    let (service, sink) = opened_service();

    let buf = b"i_qQqQqQqQqQqQqQwWwW";
    assert_eq!(buf.len(), 20);
    assert_eq!(service.write(buf).unwrap(), 20);

    // 14 instructions of 6 events each, then the trailer
    let log = sink.log();
    assert_eq!(log.len(), 14 * 6 + 3);
    assert!(log.ends_with(&[
        Recorded::Key(BTN_RIGHT, 1),
        Recorded::Key(BTN_RIGHT, 0),
        Recorded::Sync,
    ]));
    // the right clicks past offset 16 were cut off, only the trailer remains
    assert_eq!(
        log.iter()
            .filter(|r| matches!(r, Recorded::Key(BTN_RIGHT, _)))
            .count(),
        2
    );
}

#[test]
fn test_write_with_unknown_mode() {
    let (service, sink) = opened_service();
    assert_eq!(service.write(b"hello").unwrap(), 5);
    assert_eq!(
        sink.log(),
        vec![
            Recorded::Key(BTN_RIGHT, 1),
            Recorded::Key(BTN_RIGHT, 0),
            Recorded::Sync
        ]
    );
}

#[test]
fn test_empty_write_runs_trailer() {
    let (service, sink) = opened_service();
    assert_eq!(service.write(b"").unwrap(), 0);
    assert_eq!(sink.log().len(), 3);
}

#[test]
fn test_sink_failure_is_reported() {
    let service = MousekService::new();
    service
        .start(|| Ok(RecordingSink::failing_after(0)))
        .unwrap();
    service.open().unwrap();

    assert!(matches!(service.write(b"i_q"), Err(DeviceError::Sink(_))));
    // the session survives a failed write
    assert_eq!(service.lifecycle_state(), LifecycleState::Open);
}

#[test]
fn test_read_returns_nothing_in_every_state() {
    let service = MousekService::<RecordingSink>::new();
    let mut buf = [0u8; 32];
    assert_eq!(service.read(&mut buf), 0);

    service.start(|| Ok(RecordingSink::new())).unwrap();
    assert_eq!(service.read(&mut buf), 0);
    service.open().unwrap();
    assert_eq!(service.read(&mut buf), 0);
    service.release().unwrap();
    assert_eq!(service.read(&mut buf), 0);
    service.stop().unwrap();
    assert_eq!(service.read(&mut buf), 0);
    assert_eq!(buf, [0u8; 32]);
}

//
// 5. Concurrent writers never interleave their events
//
#[test]
fn test_concurrent_writes_are_serialized() {
    let (service, sink) = opened_service();
    let service = Arc::new(service);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let service = service.clone();
            thread::spawn(move || {
                for _ in 0..10 {
                    service.write(b"i_q").unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let expected = vec![
        Recorded::Key(KEY_UP, 1),
        Recorded::Key(KEY_UP, 0),
        Recorded::Key(BTN_LEFT, 1),
        Recorded::Sync,
        Recorded::Rel(REL_WHEEL, 1),
        Recorded::Sync,
        Recorded::Key(BTN_RIGHT, 1),
        Recorded::Key(BTN_RIGHT, 0),
        Recorded::Sync,
    ];
    let log = sink.log();
    assert_eq!(log.len(), 40 * expected.len());
    for chunk in log.chunks(expected.len()) {
        assert_eq!(chunk, expected.as_slice());
    }
}
