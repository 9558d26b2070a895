//! Countdown and timer behaviour under paused Tokio time.
//!
//! `start_paused = true` auto-advances the clock whenever every task is
//! idle, so a one-second sleep completes instantly but `Instant::now()`
//! still moves by exactly one second.

use std::time::Duration;

use scrawl_tick::{Countdown, CountdownConfig, TickPolicy, Timers};
use tokio::time::Instant;

// =========================================================================
// Countdown
// =========================================================================

#[test]
fn test_default_config_is_one_second_skip() {
    let cfg = CountdownConfig::default();
    assert_eq!(cfg.period, Duration::from_secs(1));
    assert_eq!(cfg.policy, TickPolicy::Skip);
}

#[tokio::test(start_paused = true)]
async fn test_stopped_countdown_never_fires() {
    let mut countdown = Countdown::default();
    assert!(!countdown.is_running());

    let result = tokio::time::timeout(Duration::from_secs(5), countdown.wait_for_tick()).await;
    assert!(result.is_err(), "a stopped countdown should pend forever");
}

#[tokio::test(start_paused = true)]
async fn test_ticks_once_per_period() {
    let mut countdown = Countdown::default();
    countdown.start();
    let begin = Instant::now();

    for expected in 1..=3 {
        let info = countdown.wait_for_tick().await;
        assert_eq!(info.tick, expected);
        assert!(!info.overrun);
        assert_eq!(info.ticks_skipped, 0);
    }
    assert_eq!(begin.elapsed(), Duration::from_secs(3));
    assert_eq!(countdown.tick_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_double_start_does_not_double_the_rate() {
    let mut countdown = Countdown::default();
    countdown.start();
    tokio::time::sleep(Duration::from_millis(500)).await;
    countdown.start();
    let restarted = Instant::now();

    let first = countdown.wait_for_tick().await;
    assert_eq!(first.tick, 1);
    assert_eq!(restarted.elapsed(), Duration::from_secs(1));

    countdown.wait_for_tick().await;
    assert_eq!(restarted.elapsed(), Duration::from_secs(2));
    assert_eq!(countdown.tick_count(), 2);
    assert_eq!(countdown.generation(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_stop_then_start_resets_tick_count() {
    let mut countdown = Countdown::default();
    countdown.start();
    countdown.wait_for_tick().await;
    countdown.wait_for_tick().await;

    countdown.stop();
    assert!(!countdown.is_running());
    let result = tokio::time::timeout(Duration::from_secs(3), countdown.wait_for_tick()).await;
    assert!(result.is_err());

    countdown.start();
    let info = countdown.wait_for_tick().await;
    assert_eq!(info.tick, 1);
}

#[tokio::test(start_paused = true)]
async fn test_skip_policy_reports_missed_periods() {
    let mut countdown = Countdown::default();
    countdown.start();
    // Nobody polls for 3.5 s: the tick due at 1 s fires late.
    tokio::time::advance(Duration::from_millis(3_500)).await;

    let info = countdown.wait_for_tick().await;
    assert!(info.overrun);
    assert_eq!(info.ticks_skipped, 2);
}

#[tokio::test(start_paused = true)]
async fn test_drop_policy_keeps_cadence() {
    let mut countdown = Countdown::new(CountdownConfig {
        policy: TickPolicy::Drop,
        ..Default::default()
    });
    let begin = Instant::now();
    countdown.start();
    tokio::time::advance(Duration::from_millis(1_500)).await;

    let info = countdown.wait_for_tick().await;
    assert!(info.overrun);
    assert_eq!(info.ticks_skipped, 0);

    // Next deadline stays on the 1 s grid.
    countdown.wait_for_tick().await;
    assert_eq!(begin.elapsed(), Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn test_countdown_in_select_does_not_starve_other_branches() {
    let mut countdown = Countdown::default();
    let (tx, mut rx) = tokio::sync::mpsc::channel::<u32>(4);
    tx.send(7).await.unwrap();

    let got = tokio::select! {
        v = rx.recv() => v,
        _ = countdown.wait_for_tick() => None,
    };
    assert_eq!(got, Some(7));
}

// =========================================================================
// Timers
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_empty_timers_pend_forever() {
    let mut timers: Timers<&'static str> = Timers::new();
    let result = tokio::time::timeout(Duration::from_secs(60), timers.next_fired()).await;
    assert!(result.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_timers_fire_in_deadline_order() {
    let mut timers = Timers::new();
    let begin = Instant::now();
    timers.schedule("grace", Duration::from_secs(30), 1);
    timers.schedule("next-turn", Duration::from_secs(5), 4);

    let first = timers.next_fired().await;
    assert_eq!(first.key, "next-turn");
    assert_eq!(first.generation, 4);
    assert_eq!(begin.elapsed(), Duration::from_secs(5));

    let second = timers.next_fired().await;
    assert_eq!(second.key, "grace");
    assert_eq!(begin.elapsed(), Duration::from_secs(30));
    assert!(timers.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_rescheduling_a_key_replaces_it() {
    let mut timers = Timers::new();
    let begin = Instant::now();
    timers.schedule("settle", Duration::from_secs(1), 1);
    timers.schedule("settle", Duration::from_secs(3), 2);
    assert_eq!(timers.len(), 1);
    assert_eq!(timers.deadline(&"settle"), Some(begin + Duration::from_secs(3)));

    let fired = timers.next_fired().await;
    assert_eq!(fired.generation, 2);
    assert_eq!(begin.elapsed(), Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_timer_does_not_fire() {
    let mut timers = Timers::new();
    timers.schedule(1u64, Duration::from_secs(1), 0);
    timers.schedule(2u64, Duration::from_secs(2), 0);
    assert!(timers.cancel(&1));
    assert!(!timers.cancel(&1));

    let fired = timers.next_fired().await;
    assert_eq!(fired.key, 2);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_where_and_clear() {
    let mut timers = Timers::new();
    for key in 0..6u64 {
        timers.schedule(key, Duration::from_secs(key + 1), 0);
    }
    timers.cancel_where(|k| k % 2 == 0);
    assert_eq!(timers.len(), 3);
    assert!(!timers.is_scheduled(&0));
    assert!(timers.is_scheduled(&1));
    assert!(timers.deadline(&5).is_some());

    timers.clear();
    assert!(timers.is_empty());
    assert!(timers.deadline(&5).is_none());
}

#[tokio::test(start_paused = true)]
async fn test_same_deadline_fires_in_schedule_order() {
    let mut timers = Timers::new();
    timers.schedule("b", Duration::from_secs(2), 0);
    timers.schedule("a", Duration::from_secs(2), 0);

    assert_eq!(timers.next_fired().await.key, "b");
    assert_eq!(timers.next_fired().await.key, "a");
}
