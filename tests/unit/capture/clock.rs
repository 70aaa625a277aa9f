use super::*;

#[test]
fn manual_clock_is_shared_between_clones() {
    let a = ManualClock::new();
    let b = a.clone();
    a.advance(Duration::from_millis(250));
    assert_eq!(b.now(), Duration::from_millis(250));
    b.set(Duration::from_secs(3));
    assert_eq!(a.now(), Duration::from_secs(3));
}

#[test]
fn monotonic_clock_never_goes_backwards() {
    let c = MonotonicClock::new();
    let first = c.now();
    let second = c.now();
    assert!(second >= first);
}
