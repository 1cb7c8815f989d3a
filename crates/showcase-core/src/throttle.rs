use crate::host::Clock;

/// Rate gate: accepts at most one call per `interval_ms`.
///
/// The first call is always accepted. Rejected calls do not move the window,
/// so a steady stream of events still gets through once per interval.
#[derive(Clone, Debug)]
pub struct Throttle {
    interval_ms: f64,
    last_call_ms: Option<f64>,
}

impl Throttle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_call_ms: None,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Returns true and records `now_ms` when the call may proceed.
    pub fn try_accept(&mut self, now_ms: f64) -> bool {
        if let Some(last) = self.last_call_ms {
            if now_ms - last < self.interval_ms {
                return false;
            }
        }
        self.last_call_ms = Some(now_ms);
        true
    }
}

/// Wrap `callback` so it runs at most once per `interval_ms` of `clock` time.
///
/// Every wrapper owns its own gate; throttling one handler never delays another.
pub fn throttle<A, C, F>(clock: C, interval_ms: f64, mut callback: F) -> impl FnMut(A)
where
    C: Clock,
    F: FnMut(A),
{
    let mut gate = Throttle::new(interval_ms);
    move |arg: A| {
        if gate.try_accept(clock.now_ms()) {
            callback(arg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct StepClock(Rc<Cell<f64>>);

    impl Clock for StepClock {
        fn now_ms(&self) -> f64 {
            self.0.get()
        }
    }

    #[test]
    fn first_call_passes_and_window_drops_the_rest() {
        let mut gate = Throttle::new(200.0);
        assert!(gate.try_accept(1_000.0));
        assert!(!gate.try_accept(1_050.0));
        assert!(!gate.try_accept(1_199.9));
        assert!(gate.try_accept(1_200.0));
    }

    #[test]
    fn rejected_calls_do_not_extend_the_window() {
        let mut gate = Throttle::new(20.0);
        assert!(gate.try_accept(0.0));
        for t in 1..20 {
            assert!(!gate.try_accept(t as f64));
        }
        assert!(gate.try_accept(20.0));
    }

    #[test]
    fn wrappers_keep_independent_timestamps() {
        let now = Rc::new(Cell::new(0.0));
        let hits = Rc::new(Cell::new((0, 0)));

        let h1 = hits.clone();
        let mut a = throttle(StepClock(now.clone()), 100.0, move |_: ()| {
            let (x, y) = h1.get();
            h1.set((x + 1, y));
        });
        let h2 = hits.clone();
        let mut b = throttle(StepClock(now.clone()), 100.0, move |_: ()| {
            let (x, y) = h2.get();
            h2.set((x, y + 1));
        });

        a(());
        now.set(50.0);
        b(());
        a(());
        now.set(120.0);
        a(());
        b(());
        now.set(151.0);
        b(());

        assert_eq!(hits.get(), (2, 2));
    }

    #[test]
    fn forwards_the_argument() {
        let seen = Rc::new(Cell::new(0));
        let s = seen.clone();
        let mut f = throttle(StepClock(Rc::new(Cell::new(5.0))), 10.0, move |v: i32| s.set(v));
        f(42);
        f(7);
        assert_eq!(seen.get(), 42);
    }
}
