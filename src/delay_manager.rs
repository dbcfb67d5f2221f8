use std::ops::RangeInclusive;
use std::thread;
use std::time::Duration;

use log::info;
use rand::Rng;

/// Blocking pause. Swapped for a recording fake in tests.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Uniform draw from `range`, millisecond resolution.
pub fn random_delay<R: Rng + ?Sized>(rng: &mut R, range: &RangeInclusive<Duration>) -> Duration {
    let low = range.start().as_millis() as u64;
    let high = range.end().as_millis() as u64;
    if high <= low {
        return *range.start();
    }
    Duration::from_millis(rng.gen_range(low..=high))
}

/// Owns the run's randomness and the way it sleeps.
pub struct DelayManager<S, R> {
    sleeper: S,
    rng: R,
}

impl<S: Sleeper, R: Rng> DelayManager<S, R> {
    pub fn new(sleeper: S, rng: R) -> Self {
        DelayManager { sleeper, rng }
    }

    /// Sleeps for a random duration in `range` and returns it.
    pub fn pause(&mut self, range: &RangeInclusive<Duration>, reason: &str) -> Duration {
        let delay = random_delay(&mut self.rng, range);
        info!("Waiting for {:.2} seconds ({})...", delay.as_secs_f64(), reason);
        self.sleeper.sleep(delay);
        delay
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Default)]
    struct Recorder(Vec<Duration>);

    impl Sleeper for Recorder {
        fn sleep(&mut self, duration: Duration) {
            self.0.push(duration);
        }
    }

    #[test]
    fn delay_stays_inside_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let range = Duration::from_secs(5)..=Duration::from_secs(15);
        for _ in 0..500 {
            let d = random_delay(&mut rng, &range);
            assert!(range.contains(&d), "{d:?} outside range");
        }
    }

    #[test]
    fn degenerate_range_returns_start() {
        let mut rng = StdRng::seed_from_u64(1);
        let range = Duration::from_secs(2)..=Duration::from_secs(2);
        assert_eq!(random_delay(&mut rng, &range), Duration::from_secs(2));
    }

    #[test]
    fn pause_sleeps_for_the_returned_duration() {
        let mut delays = DelayManager::new(Recorder::default(), StdRng::seed_from_u64(9));
        let range = Duration::from_secs(1)..=Duration::from_secs(5);
        let slept = delays.pause(&range, "test");
        assert_eq!(delays.sleeper().0, vec![slept]);
    }
}
