use glitter::TimeSource;

/// Green channel at `t` seconds: `sin(t) / 2 + 0.5`, always within `[0, 1]`.
pub fn green_channel(t: f32) -> f32 {
    t.sin() / 2.0 + 0.5
}

/// A color whose green channel oscillates with time.
pub struct Pulse<C: TimeSource> {
    clock: C,
}

impl<C: TimeSource> Pulse<C> {
    pub fn new(clock: C) -> Self {
        Pulse { clock }
    }

    pub fn color(&self) -> [f32; 4] {
        let green = green_channel(self.clock.seconds());
        log::trace!("pulse green {green:.3}");
        [0.0, green, 0.0, 1.0]
    }
}
