use std::sync::LazyLock;
use std::time::Instant;

static START: LazyLock<Instant> = LazyLock::new(Instant::now);

pub(crate) fn initialize() {
    let _ = &*START;
}

/// Seconds since the window was started.
pub fn elapsed_time() -> f32 {
    Instant::now().duration_since(*START).as_secs_f32()
}

/// Where animated values read the current time from.
pub trait TimeSource {
    fn seconds(&self) -> f32;
}

/// Wall-clock time since startup, see [elapsed_time].
#[derive(Debug, Default, Clone, Copy)]
pub struct Elapsed;

impl TimeSource for Elapsed {
    fn seconds(&self) -> f32 {
        elapsed_time()
    }
}

/// Always reports the same time.
#[derive(Debug, Clone, Copy)]
pub struct Fixed(pub f32);

impl TimeSource for Fixed {
    fn seconds(&self) -> f32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_time_is_monotonic() {
        initialize();
        let a = Elapsed.seconds();
        let b = Elapsed.seconds();
        assert!(b >= a);
    }

    #[test]
    fn fixed_time_never_advances() {
        let clock = Fixed(1.5);
        assert_eq!(clock.seconds(), 1.5);
        assert_eq!(clock.seconds(), 1.5);
    }
}
