//! Animation curves.
//!
//! Bezier curves map normalized time to progress. Springs are physical and
//! carry their own settle time; the animator samples them against elapsed
//! wall time rather than against a normalized fraction.

use std::time::Duration;

/// Displacement below which a spring counts as settled.
const SPRING_REST_THRESHOLD: f32 = 0.001;
/// Upper bound on how long a spring may run.
const SPRING_MAX_SECONDS: f32 = 10.0;
const SPRING_SCAN_STEP: f32 = 1.0 / 240.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    Linear,
    CubicBezier {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
    },
    /// Damped spring; `velocity` is the initial progress per second.
    InterpolatingSpring {
        velocity: f32,
        mass: f32,
        stiffness: f32,
        damping: f32,
    },
    /// Spring described by its period and damping ratio.
    ResponsiveSpring {
        response: f32,
        damping_fraction: f32,
    },
}

impl Default for Curve {
    fn default() -> Self {
        Curve::EASE
    }
}

impl Curve {
    pub const EASE: Curve = Curve::cubic(0.25, 0.1, 0.25, 1.0);
    pub const SHARP: Curve = Curve::cubic(0.33, 0.0, 0.67, 1.0);
    pub const FRICTION: Curve = Curve::cubic(0.2, 0.0, 0.2, 1.0);
    pub const FAST_OUT_SLOW_IN: Curve = Curve::cubic(0.4, 0.0, 0.2, 1.0);
    pub const FAST_OUT_LINEAR_IN: Curve = Curve::cubic(0.4, 0.0, 1.0, 1.0);

    pub const fn cubic(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Curve::CubicBezier { x1, y1, x2, y2 }
    }

    pub const fn spring(velocity: f32, mass: f32, stiffness: f32, damping: f32) -> Self {
        Curve::InterpolatingSpring {
            velocity,
            mass,
            stiffness,
            damping,
        }
    }

    pub const fn responsive(response: f32, damping_fraction: f32) -> Self {
        Curve::ResponsiveSpring {
            response,
            damping_fraction,
        }
    }

    pub fn is_spring(&self) -> bool {
        matches!(
            self,
            Curve::InterpolatingSpring { .. } | Curve::ResponsiveSpring { .. }
        )
    }

    /// Progress at normalized time `t` in `[0, 1]`.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Curve::Linear => t,
            Curve::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(x1, y1, x2, y2, t),
            _ => match self.spring_model() {
                Some(spring) => {
                    if t >= 1.0 {
                        return 1.0;
                    }
                    1.0 - spring.displacement(t * spring.settle_seconds())
                }
                None => t,
            },
        }
    }

    /// Progress after `elapsed` of an animation lasting `duration`.
    pub fn sample(&self, elapsed: Duration, duration: Duration) -> f32 {
        if elapsed >= duration {
            return 1.0;
        }
        match self.spring_model() {
            Some(spring) => 1.0 - spring.displacement(elapsed.as_secs_f32()),
            None => {
                let total = duration.as_secs_f32();
                if total <= 0.0 {
                    return 1.0;
                }
                self.apply(elapsed.as_secs_f32() / total)
            }
        }
    }

    /// Settle time for springs; bezier curves have none.
    pub fn intrinsic_duration(&self) -> Option<Duration> {
        self.spring_model()
            .map(|spring| Duration::from_secs_f32(spring.settle_seconds()))
    }

    fn spring_model(&self) -> Option<SpringModel> {
        match *self {
            Curve::InterpolatingSpring {
                velocity,
                mass,
                stiffness,
                damping,
            } => SpringModel::new(velocity, mass, stiffness, damping),
            Curve::ResponsiveSpring {
                response,
                damping_fraction,
            } => {
                if response <= 0.0 {
                    return None;
                }
                let omega = 2.0 * std::f32::consts::PI / response;
                let stiffness = omega * omega;
                let damping = 4.0 * std::f32::consts::PI * damping_fraction / response;
                SpringModel::new(0.0, 1.0, stiffness, damping)
            }
            _ => None,
        }
    }
}

/// Closed-form damped oscillator, displacement starting at 1.
#[derive(Debug, Clone, Copy)]
struct SpringModel {
    omega: f32,
    zeta: f32,
    /// Initial displacement velocity (negated progress velocity).
    x_prime: f32,
}

impl SpringModel {
    fn new(velocity: f32, mass: f32, stiffness: f32, damping: f32) -> Option<Self> {
        if mass <= 0.0 || stiffness <= 0.0 || damping < 0.0 {
            return None;
        }
        let omega = (stiffness / mass).sqrt();
        let zeta = damping / (2.0 * (stiffness * mass).sqrt());
        Some(Self {
            omega,
            zeta,
            x_prime: -velocity,
        })
    }

    fn displacement(&self, t: f32) -> f32 {
        let SpringModel {
            omega,
            zeta,
            x_prime,
        } = *self;
        if (zeta - 1.0).abs() < 1e-4 {
            let b = x_prime + omega;
            (1.0 + b * t) * (-omega * t).exp()
        } else if zeta < 1.0 {
            let omega_d = omega * (1.0 - zeta * zeta).sqrt();
            let b = (zeta * omega + x_prime) / omega_d;
            (-zeta * omega * t).exp() * ((omega_d * t).cos() + b * (omega_d * t).sin())
        } else {
            let root = (zeta * zeta - 1.0).sqrt();
            let r1 = -omega * (zeta - root);
            let r2 = -omega * (zeta + root);
            let c2 = (x_prime - r1) / (r2 - r1);
            let c1 = 1.0 - c2;
            c1 * (r1 * t).exp() + c2 * (r2 * t).exp()
        }
    }

    fn settle_seconds(&self) -> f32 {
        let mut last_active = 0.0;
        let mut t = 0.0;
        while t <= SPRING_MAX_SECONDS {
            if self.displacement(t).abs() >= SPRING_REST_THRESHOLD {
                last_active = t;
            }
            t += SPRING_SCAN_STEP;
        }
        (last_active + SPRING_SCAN_STEP).min(SPRING_MAX_SECONDS)
    }
}

fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, x: f32) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let s = solve_curve_x(x1, x2, x);
    bezier_component(y1, y2, s)
}

fn bezier_component(p1: f32, p2: f32, s: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn bezier_component_derivative(p1: f32, p2: f32, s: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Find the parameter whose x equals `x`: Newton first, bisection if it stalls.
fn solve_curve_x(x1: f32, x2: f32, x: f32) -> f32 {
    let mut s = x;
    for _ in 0..8 {
        let error = bezier_component(x1, x2, s) - x;
        if error.abs() < 1e-6 {
            return s;
        }
        let slope = bezier_component_derivative(x1, x2, s);
        if slope.abs() < 1e-6 {
            break;
        }
        s -= error / slope;
    }
    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    s = x;
    while hi - lo > 1e-6 {
        let value = bezier_component(x1, x2, s);
        if (value - x).abs() < 1e-6 {
            return s;
        }
        if value < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    s
}
