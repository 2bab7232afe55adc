// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn system_clock_is_non_decreasing() {
    let clock = SystemClock;
    let t1 = clock.epoch_ms();
    let t2 = clock.epoch_ms();
    assert!(t2 >= t1);
}

#[test]
fn fake_clock_can_be_advanced() {
    let clock = FakeClock::new();
    let t1 = clock.epoch_ms();
    clock.advance(Duration::from_secs(60));
    assert_eq!(clock.epoch_ms(), t1 + 60_000);
}

#[test]
fn fake_clock_is_cloneable_and_shared() {
    let clock1 = FakeClock::new();
    let clock2 = clock1.clone();
    clock2.set_epoch_ms(42);
    assert_eq!(clock1.epoch_ms(), 42);
}
