use panel_core::state::{Alpha, Visibility};
use std::f64::consts::PI;
use std::time::{Duration, Instant};
use tracing::debug;

/// Sine ease-in-out: maps elapsed fraction `t ∈ [0, 1]` to progress `s ∈ [0, 1]`.
pub fn sine_ease(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    (1.0 - (PI * t).cos()) / 2.0
}

/// One in-flight opacity animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    start:    Instant,
    duration: Duration,
    from:     Alpha,
    to:       Alpha,
}

impl Transition {
    pub fn new(start: Instant, duration: Duration, from: Alpha, to: Alpha) -> Self {
        Self { start, duration, from, to }
    }

    /// Elapsed fraction in `[0, 1]`.
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start).as_secs_f64();
        (elapsed / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    /// Alpha at `now`; exactly `to` once finished.
    pub fn sample(&self, now: Instant) -> Alpha {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to;
        }
        let s = sine_ease(t);
        let lerp = |a: f32, b: f32| (f64::from(a) + (f64::from(b) - f64::from(a)) * s) as f32;
        Alpha {
            background: lerp(self.from.background, self.to.background),
            shadow:     lerp(self.from.shadow, self.to.shadow),
        }
    }

    pub fn target(&self) -> Alpha {
        self.to
    }
}

/// Drives the panel between Opaque and Translucent from fullscreen polls.
///
/// A flip while a transition is still running cancels it and restarts from
/// the current interpolated alpha towards the new target, over the full
/// duration.  At most one transition exists at a time.
#[derive(Debug)]
pub struct VisibilityController {
    alpha:      Alpha,
    target:     Visibility,
    transition: Option<Transition>,
    duration:   Duration,
}

impl VisibilityController {
    /// Starts at rest: Opaque, no fullscreen window.
    pub fn new(duration: Duration) -> Self {
        Self {
            alpha:      Alpha::OPAQUE,
            target:     Visibility::Opaque,
            transition: None,
            duration,
        }
    }

    pub fn alpha(&self) -> Alpha {
        self.alpha
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Feed one poll result.  Returns `true` when a transition was started.
    pub fn observe(&mut self, fullscreen: bool, now: Instant) -> bool {
        let desired = Visibility::for_fullscreen(fullscreen);
        if desired == self.target {
            return false;
        }

        if self.transition.is_some() {
            debug!("superseding fade towards {:?}", self.target);
        }
        debug!("fading {:?} -> {desired:?} (fullscreen={fullscreen})", self.target);

        self.target = desired;
        self.transition = Some(Transition::new(now, self.duration, self.alpha, desired.alpha()));
        true
    }

    /// Step the running transition.  Returns the new alpha, or `None` when idle.
    pub fn advance(&mut self, now: Instant) -> Option<Alpha> {
        let (alpha, finished) = {
            let transition = self.transition.as_ref()?;
            (transition.sample(now), transition.is_finished(now))
        };

        self.alpha = alpha;
        if finished {
            self.alpha = self.target.alpha();
            self.transition = None;
        }
        Some(self.alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FADE: Duration = Duration::from_millis(500);

    fn run(controller: &mut VisibilityController, start: Instant) -> Vec<Alpha> {
        (0..=60)
            .filter_map(|ms| controller.advance(start + Duration::from_millis(ms * 10)))
            .collect()
    }

    #[test]
    fn ease_is_pinned_and_monotonic() {
        assert_eq!(sine_ease(0.0), 0.0);
        assert_eq!(sine_ease(1.0), 1.0);
        let samples: Vec<f64> = (0..=100).map(|i| sine_ease(f64::from(i) / 100.0)).collect();
        assert!(samples.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn fullscreen_fades_to_translucent_monotonically() {
        let start = Instant::now();
        let mut c = VisibilityController::new(FADE);
        assert!(c.observe(true, start));

        let steps = run(&mut c, start);
        assert!(steps.windows(2).all(|w| w[1].background <= w[0].background));
        assert!(steps.windows(2).all(|w| w[1].shadow >= w[0].shadow));
        assert_eq!(*steps.last().unwrap(), Alpha::TRANSLUCENT);
        assert_eq!(c.alpha(), Alpha::TRANSLUCENT);
        assert!(!c.is_animating());
    }

    #[test]
    fn leaving_fullscreen_fades_back_to_opaque() {
        let start = Instant::now();
        let mut c = VisibilityController::new(FADE);
        c.observe(true, start);
        run(&mut c, start);

        let later = start + Duration::from_secs(1);
        assert!(c.observe(false, later));
        let steps = run(&mut c, later);
        assert!(steps.windows(2).all(|w| w[1].background >= w[0].background));
        assert!(steps.windows(2).all(|w| w[1].shadow <= w[0].shadow));
        assert_eq!(c.alpha(), Alpha::OPAQUE);
    }

    #[test]
    fn repeated_polls_do_not_restart() {
        let start = Instant::now();
        let mut c = VisibilityController::new(FADE);
        assert!(!c.observe(false, start));
        assert!(c.observe(true, start));
        assert!(!c.observe(true, start + Duration::from_millis(200)));
        assert!(c.is_animating());
    }

    #[test]
    fn flip_mid_fade_restarts_from_current_alpha() {
        let start = Instant::now();
        let mut c = VisibilityController::new(FADE);
        c.observe(true, start);
        let mid = c.advance(start + Duration::from_millis(250)).unwrap();
        assert_eq!(mid, Alpha { background: 0.75, shadow: 0.5 });

        let flip = start + Duration::from_millis(250);
        assert!(c.observe(false, flip));
        // No jump: the new fade begins where the old one was.
        assert_eq!(c.advance(flip).unwrap(), mid);

        let end = c.advance(flip + FADE).unwrap();
        assert_eq!(end, Alpha::OPAQUE);
        assert!(!c.is_animating());
    }

    #[test]
    fn idle_controller_reports_nothing() {
        let mut c = VisibilityController::new(FADE);
        assert_eq!(c.advance(Instant::now()), None);
    }
}
