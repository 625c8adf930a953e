use std::time::Duration;
use tickwatch::app::scheduler::Scheduler;

#[test]
fn runs_until_stopped_from_tick() {
    let scheduler = Scheduler::new(Duration::ZERO);
    let handle = scheduler.handle();
    let mut ticks = 0;
    scheduler.run(|| {
        ticks += 1;
        if ticks == 3 {
            handle.stop();
        }
    });
    assert_eq!(ticks, 3);
}

#[test]
fn stopped_scheduler_never_ticks() {
    let scheduler = Scheduler::new(Duration::ZERO);
    scheduler.handle().stop();
    let mut ticks = 0;
    scheduler.run(|| ticks += 1);
    assert_eq!(ticks, 0);
}

#[test]
fn stop_handle_reports_state() {
    let scheduler = Scheduler::new(Duration::from_secs(1));
    let handle = scheduler.handle();
    assert!(!handle.is_stopped());
    handle.stop();
    assert!(handle.is_stopped());
}

#[test]
fn stop_during_wait_interrupts_promptly() {
    let scheduler = Scheduler::new(Duration::from_secs(3600));
    let handle = scheduler.handle();
    let mut ticks = 0;
    // Stopping inside the first tick means the hour-long wait never starts.
    scheduler.run(|| {
        ticks += 1;
        handle.stop();
    });
    assert_eq!(ticks, 1);
}
