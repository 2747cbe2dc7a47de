//! Property animations driven by an explicit clock.
//!
//! The animator owns no timer. The host advances it once per frame with the
//! elapsed time; values are written straight into node render properties and
//! completions come back as data, carrying whatever payload the caller
//! attached when starting the animation.

use std::fmt;
use std::time::Duration;

use crate::color::Color;
use crate::curve::Curve;
use crate::geometry::OffsetF;
use crate::node::{Node, NodeArena, NodeId};

/// Unique identifier of a started animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(u64);

impl fmt::Display for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "anim-{}", self.0)
    }
}

/// Which render property an animation drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimatedProperty {
    Opacity,
    Translate,
    Scale,
    Position,
    Background,
}

/// End value of one animated property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationTarget {
    Opacity(f32),
    Translate(OffsetF),
    Scale(f32),
    Position(OffsetF),
    Background(Color),
}

impl AnimationTarget {
    pub fn property(&self) -> AnimatedProperty {
        match self {
            AnimationTarget::Opacity(_) => AnimatedProperty::Opacity,
            AnimationTarget::Translate(_) => AnimatedProperty::Translate,
            AnimationTarget::Scale(_) => AnimatedProperty::Scale,
            AnimationTarget::Position(_) => AnimatedProperty::Position,
            AnimationTarget::Background(_) => AnimatedProperty::Background,
        }
    }

    fn read<P>(node: &Node<P>, property: AnimatedProperty) -> AnimationTarget {
        match property {
            AnimatedProperty::Opacity => AnimationTarget::Opacity(node.render.opacity),
            AnimatedProperty::Translate => AnimationTarget::Translate(node.render.translate),
            AnimatedProperty::Scale => AnimationTarget::Scale(node.render.scale),
            AnimatedProperty::Position => {
                AnimationTarget::Position(node.render.position.unwrap_or(node.frame.offset()))
            }
            AnimatedProperty::Background => {
                AnimationTarget::Background(node.render.background.unwrap_or(Color::TRANSPARENT))
            }
        }
    }

    /// Write this value into the node without animating.
    pub fn apply_to<P>(self, node: &mut Node<P>) {
        match self {
            AnimationTarget::Opacity(v) => node.render.opacity = v,
            AnimationTarget::Translate(v) => node.render.translate = v,
            AnimationTarget::Scale(v) => node.render.scale = v,
            AnimationTarget::Position(v) => node.render.position = Some(v),
            AnimationTarget::Background(v) => node.render.background = Some(v),
        }
    }

    fn interpolate(from: AnimationTarget, to: AnimationTarget, t: f32) -> AnimationTarget {
        match (from, to) {
            (AnimationTarget::Opacity(a), AnimationTarget::Opacity(b)) => {
                AnimationTarget::Opacity(a + (b - a) * t)
            }
            (AnimationTarget::Scale(a), AnimationTarget::Scale(b)) => {
                AnimationTarget::Scale(a + (b - a) * t)
            }
            (AnimationTarget::Translate(a), AnimationTarget::Translate(b)) => {
                AnimationTarget::Translate(a.lerp(b, t))
            }
            (AnimationTarget::Position(a), AnimationTarget::Position(b)) => {
                AnimationTarget::Position(a.lerp(b, t))
            }
            (AnimationTarget::Background(a), AnimationTarget::Background(b)) => {
                AnimationTarget::Background(a.lerp(b, t))
            }
            (_, to) => to,
        }
    }
}

/// Timing of an animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationOption {
    pub duration: Duration,
    pub curve: Curve,
    pub delay: Duration,
}

impl Default for AnimationOption {
    fn default() -> Self {
        Self::new(Duration::from_millis(300), Curve::EASE)
    }
}

impl AnimationOption {
    pub fn new(duration: Duration, curve: Curve) -> Self {
        Self {
            duration,
            curve,
            delay: Duration::ZERO,
        }
    }

    pub fn millis(ms: u64, curve: Curve) -> Self {
        Self::new(Duration::from_millis(ms), curve)
    }

    /// Springs run for their own settle time.
    pub fn spring(curve: Curve) -> Self {
        Self::new(Duration::ZERO, curve)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Effective run time: a spring's settle time, otherwise the duration.
    pub fn resolved_duration(&self) -> Duration {
        self.curve.intrinsic_duration().unwrap_or(self.duration)
    }
}

/// Emitted when an animation with a payload runs to its end.
#[derive(Debug, Clone, PartialEq)]
pub struct Finished<T> {
    pub id: AnimationId,
    pub node: NodeId,
    pub payload: T,
}

#[derive(Debug)]
struct Track {
    from: AnimationTarget,
    to: AnimationTarget,
}

#[derive(Debug)]
struct Animation<T> {
    id: AnimationId,
    node: NodeId,
    option: AnimationOption,
    duration: Duration,
    elapsed: Duration,
    tracks: Vec<Track>,
    on_finish: Option<T>,
}

/// Runs every animation of one surface.
#[derive(Debug)]
pub struct Animator<T> {
    animations: Vec<Animation<T>>,
    ready: Vec<Finished<T>>,
    next_id: u64,
    reduced_motion: bool,
}

impl<T> Default for Animator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Animator<T> {
    pub fn new() -> Self {
        Self {
            animations: Vec::new(),
            ready: Vec::new(),
            next_id: 1,
            reduced_motion: false,
        }
    }

    /// Enable or disable reduced motion (accessibility).
    /// When enabled, animations jump to their end values.
    pub fn set_reduced_motion(&mut self, enabled: bool) {
        self.reduced_motion = enabled;
    }

    /// Start animating `node` toward `targets`.
    ///
    /// Start values are read from the node. Any running animation already
    /// driving one of the same properties on the node loses that property;
    /// an animation left with nothing to drive is interrupted and will never
    /// report completion. Completion is never synchronous: even an instant
    /// animation reports on the next [`Animator::advance`].
    pub fn animate<P>(
        &mut self,
        arena: &mut NodeArena<P>,
        node: NodeId,
        option: AnimationOption,
        targets: impl IntoIterator<Item = AnimationTarget>,
        on_finish: Option<T>,
    ) -> AnimationId {
        let id = AnimationId(self.next_id);
        self.next_id += 1;

        let targets: Vec<AnimationTarget> = targets.into_iter().collect();
        for target in &targets {
            self.release_property(node, target.property());
        }

        let tracks: Vec<Track> = targets
            .into_iter()
            .map(|to| {
                let from = arena
                    .get(node)
                    .map(|n| AnimationTarget::read(n, to.property()))
                    .unwrap_or(to);
                Track { from, to }
            })
            .collect();

        let duration = option.resolved_duration();
        if (self.reduced_motion || duration.is_zero()) && option.delay.is_zero() {
            if let Some(n) = arena.get_mut(node) {
                for track in &tracks {
                    track.to.apply_to(n);
                }
            }
            if let Some(payload) = on_finish {
                self.ready.push(Finished { id, node, payload });
            }
            return id;
        }

        log::trace!("start {id} on {node} for {duration:?}");
        self.animations.push(Animation {
            id,
            node,
            option,
            duration,
            elapsed: Duration::ZERO,
            tracks,
            on_finish,
        });
        id
    }

    /// Advance every animation by `dt` and collect completions, in start order.
    pub fn advance<P>(&mut self, arena: &mut NodeArena<P>, dt: Duration) -> Vec<Finished<T>> {
        let mut finished = std::mem::take(&mut self.ready);
        let mut done = Vec::new();

        for (index, animation) in self.animations.iter_mut().enumerate() {
            animation.elapsed += dt;
            let Some(active) = animation.elapsed.checked_sub(animation.option.delay) else {
                continue;
            };
            let complete = active >= animation.duration;
            let progress = if complete {
                1.0
            } else {
                animation.option.curve.sample(active, animation.duration)
            };
            if let Some(node) = arena.get_mut(animation.node) {
                for track in &animation.tracks {
                    AnimationTarget::interpolate(track.from, track.to, progress).apply_to(node);
                }
            }
            if complete {
                done.push(index);
            }
        }

        for index in done.into_iter().rev() {
            let animation = self.animations.remove(index);
            if let Some(payload) = animation.on_finish {
                finished.push(Finished {
                    id: animation.id,
                    node: animation.node,
                    payload,
                });
            }
        }
        finished.sort_by_key(|f| f.id);
        finished
    }

    /// Stop an animation where it is. Its completion is dropped.
    pub fn stop(&mut self, id: AnimationId) -> bool {
        let before = self.animations.len();
        self.animations.retain(|a| a.id != id);
        self.ready.retain(|f| f.id != id);
        let stopped = self.animations.len() != before;
        if stopped {
            log::debug!("stopped {id}");
        }
        stopped
    }

    /// Stop everything running on `node`.
    pub fn stop_node(&mut self, node: NodeId) {
        self.animations.retain(|a| a.node != node);
    }

    pub fn is_running(&self, id: AnimationId) -> bool {
        self.animations.iter().any(|a| a.id == id) || self.ready.iter().any(|f| f.id == id)
    }

    /// Returns true if any animation or pending completion exists.
    pub fn has_active(&self) -> bool {
        !self.animations.is_empty() || !self.ready.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.animations.len()
    }

    /// Count animations currently driving `node`.
    pub fn running_on(&self, node: NodeId) -> usize {
        self.animations.iter().filter(|a| a.node == node).count()
    }

    /// Time until the earliest running animation ends.
    pub fn next_completion_in(&self) -> Option<Duration> {
        if !self.ready.is_empty() {
            return Some(Duration::ZERO);
        }
        self.animations
            .iter()
            .map(|a| (a.option.delay + a.duration).saturating_sub(a.elapsed))
            .min()
    }

    fn release_property(&mut self, node: NodeId, property: AnimatedProperty) {
        let mut emptied = Vec::new();
        for animation in self.animations.iter_mut().filter(|a| a.node == node) {
            let before = animation.tracks.len();
            animation.tracks.retain(|t| t.to.property() != property);
            if before > 0 && animation.tracks.is_empty() {
                emptied.push(animation.id);
            }
        }
        for id in &emptied {
            log::debug!("{id} interrupted on {node}");
        }
        self.animations.retain(|a| !emptied.contains(&a.id));
    }
}
