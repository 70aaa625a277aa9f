use super::*;
use crate::capture::artifact::ArtifactKind;
use crate::encode::sink::InMemoryEncoder;
use crate::foundation::core::{Canvas, Fps};
use std::time::Duration;

fn cfg() -> EncoderConfig {
    EncoderConfig {
        width: 2,
        height: 2,
        fps: Fps::CAPTURE,
    }
}

fn frame() -> Arc<FrameRGBA> {
    Arc::new(FrameRGBA::transparent(Canvas::new(2, 2).unwrap()))
}

fn completion() -> (Completion, mpsc::Receiver<EncodeOutcome>) {
    let (tx, rx) = mpsc::channel();
    (
        Box::new(move |o| {
            let _ = tx.send(o);
        }),
        rx,
    )
}

const WAIT: Duration = Duration::from_secs(5);

#[test]
fn finish_drains_the_queue_in_order() {
    let enc = InMemoryEncoder::new(ArtifactKind::Video);
    let captured = enc.captured();
    let (done, rx) = completion();
    let mut worker = ThreadedEncoder::spawn(Box::new(enc), cfg(), 64, done).unwrap();
    for i in 0..10 {
        assert_eq!(worker.offer(FrameIndex(i), frame()).unwrap(), Handoff::Queued);
    }
    worker.finish();

    match rx.recv_timeout(WAIT).unwrap() {
        EncodeOutcome::Finished(stream) => assert_eq!(stream.frames, 10),
        other => panic!("unexpected outcome: {other:?}"),
    }
    let expected: Vec<_> = (0..10).map(FrameIndex).collect();
    assert_eq!(captured.indices(), expected);
}

#[test]
fn abort_reports_aborted_and_releases_the_encoder() {
    let enc = InMemoryEncoder::new(ArtifactKind::PaletteAnimation);
    let captured = enc.captured();
    let (done, rx) = completion();
    let mut worker = ThreadedEncoder::spawn(Box::new(enc), cfg(), 4, done).unwrap();
    worker.offer(FrameIndex(0), frame()).unwrap();
    worker.abort();

    assert!(matches!(rx.recv_timeout(WAIT).unwrap(), EncodeOutcome::Aborted));
    assert!(captured.aborted());
}

#[test]
fn dropping_without_finish_aborts() {
    let enc = InMemoryEncoder::new(ArtifactKind::Video);
    let captured = enc.captured();
    let (done, rx) = completion();
    let mut worker = ThreadedEncoder::spawn(Box::new(enc), cfg(), 16, done).unwrap();
    for i in 0..5 {
        worker.offer(FrameIndex(i), frame()).unwrap();
    }
    drop(worker);

    assert!(matches!(rx.recv_timeout(WAIT).unwrap(), EncodeOutcome::Aborted));
    assert!(captured.aborted());
}

#[test]
fn encoder_errors_surface_as_failed() {
    let enc = InMemoryEncoder::new(ArtifactKind::Video).failing_at(2);
    let (done, rx) = completion();
    let mut worker = ThreadedEncoder::spawn(Box::new(enc), cfg(), 16, done).unwrap();
    for i in 0..4 {
        let _ = worker.offer(FrameIndex(i), frame());
    }
    match rx.recv_timeout(WAIT).unwrap() {
        EncodeOutcome::Failed(PrismError::EncoderFailure(_)) => {}
        other => panic!("unexpected outcome: {other:?}"),
    }
    // The worker is gone; further offers fail instead of blocking.
    assert!(worker.offer(FrameIndex(10), frame()).is_err());
}
