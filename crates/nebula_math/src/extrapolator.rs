//! Dead reckoning for remotely updated values
//!
//! An [`Extrapolator`] is fed timestamped samples of one quantity, usually
//! a remote entity's position, and produces smooth guesses for any later
//! time. It keeps running estimates of the sender's latency and update
//! interval, and assumes the entity stopped when samples stop arriving.
//! All times come from one globally synchronized clock; clock skew is not
//! handled.

use crate::error::MathError;
use crate::scalar::TINY;
use core::ops::{Add, Mul, Sub};

/// Seconds on the shared clock
pub type Time = f64;

/// Values that can be extrapolated linearly
pub trait Extrapolate: Copy + Default + Add<Output = Self> + Sub<Output = Self> + Mul<f32, Output = Self> {}

impl<T> Extrapolate for T where T: Copy + Default + Add<Output = T> + Sub<Output = T> + Mul<f32, Output = T> {}

/// Result of [`Extrapolator::read_value`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Estimate<T> {
    pub position: T,
    pub velocity: T,
    /// `false` when the requested time was clamped into the valid window.
    pub in_range: bool,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extrapolator<T> {
    snap_pos: T,
    snap_vel: T,
    aim_pos: T,
    last_packet_pos: T,
    snap_time: Time,
    aim_time: Time,
    last_packet_time: Time,
    latency: Time,
    update_time: Time,
}

impl<T: Extrapolate> Default for Extrapolator<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Extrapolate> Extrapolator<T> {
    /// Resting at `pos` at time zero.
    pub fn new(pos: T) -> Self {
        Self {
            snap_pos: pos,
            snap_vel: T::default(),
            aim_pos: pos,
            last_packet_pos: pos,
            snap_time: 0.0,
            aim_time: 0.0,
            last_packet_time: 0.0,
            latency: 0.0,
            update_time: 0.0,
        }
    }

    /// Add a sample, deriving the velocity from the previous one.
    ///
    /// Returns `false` and ignores the sample unless `packet_time` is
    /// strictly newer than every sample seen so far.
    pub fn add_sample(&mut self, packet_time: Time, cur_time: Time, pos: T) -> bool {
        let mut vel = T::default();
        let dt = packet_time - self.last_packet_time;
        if dt.abs() > f64::from(TINY) {
            vel = (pos - self.last_packet_pos) * (1.0 / dt) as f32;
        }
        self.add_sample_with_velocity(packet_time, cur_time, pos, vel)
    }

    /// Add a sample with a known velocity at `packet_time`.
    pub fn add_sample_with_velocity(&mut self, packet_time: Time, cur_time: Time, pos: T, vel: T) -> bool {
        if !self.estimates(packet_time, cur_time) {
            log::trace!(
                "dropping stale sample at {packet_time} (last {})",
                self.last_packet_time
            );
            return false;
        }
        self.last_packet_pos = pos;
        self.last_packet_time = packet_time;
        self.snap_pos = self.read_value(cur_time).position;
        self.snap_time = cur_time;
        self.aim_time = cur_time + self.update_time;
        self.aim_pos = pos + vel * (self.aim_time - packet_time) as f32;

        // head from where we appear to be now toward where the sample says
        // we will be one update from now
        let span = self.aim_time - self.snap_time;
        self.snap_vel = if span.abs() < f64::from(TINY) {
            vel
        } else {
            (self.aim_pos - self.snap_pos) * (1.0 / span) as f32
        };
        true
    }

    /// Forget all history and rest at `pos`.
    pub fn reset(&mut self, packet_time: Time, cur_time: Time, pos: T) -> crate::Result<()> {
        self.reset_with_velocity(packet_time, cur_time, pos, T::default())
    }

    /// Forget all history and move from `pos` with `vel`. The gap between
    /// the two times seeds both the latency and the update interval.
    pub fn reset_with_velocity(&mut self, packet_time: Time, cur_time: Time, pos: T, vel: T) -> crate::Result<()> {
        if packet_time > cur_time {
            log::warn!("extrapolator reset with packet time {packet_time} after current time {cur_time}");
            return Err(MathError::InvalidTimestamps {
                packet: packet_time,
                current: cur_time,
            });
        }
        self.last_packet_time = packet_time;
        self.last_packet_pos = pos;
        self.snap_time = cur_time;
        self.snap_pos = pos;
        self.update_time = cur_time - packet_time;
        self.latency = self.update_time;
        self.aim_time = cur_time + self.update_time;
        self.snap_vel = vel;
        self.aim_pos = pos + vel * self.update_time as f32;
        Ok(())
    }

    /// Estimated value at `for_time`.
    ///
    /// Times before the last snapshot, or more than one update interval
    /// past the aim point, are clamped and reported as out of range.
    pub fn read_value(&self, for_time: Time) -> Estimate<T> {
        let max_range = self.aim_time + self.update_time;
        let t = for_time.max(self.snap_time).min(max_range);
        let in_range = for_time >= self.snap_time && for_time <= max_range;
        Estimate {
            position: self.snap_pos + self.snap_vel * (t - self.snap_time) as f32,
            velocity: self.snap_vel,
            in_range,
        }
    }

    #[inline]
    pub fn estimate_latency(&self) -> Time {
        self.latency
    }

    #[inline]
    pub fn estimate_update_time(&self) -> Time {
        self.update_time
    }

    /// Fold a packet's timing into the latency and update interval
    /// estimates. Rising values are tracked quickly, falling ones slowly.
    /// Returns `false` for a packet that is not newer than the last one.
    pub fn estimates(&mut self, packet_time: Time, cur_time: Time) -> bool {
        if packet_time <= self.last_packet_time {
            return false;
        }

        let lat = (cur_time - packet_time).max(0.0);
        self.latency = if lat > self.latency {
            (self.latency + lat) * 0.5
        } else {
            (self.latency * 7.0 + lat) * 0.125
        };

        let tick = packet_time - self.last_packet_time;
        self.update_time = if tick > self.update_time {
            (self.update_time + tick) * 0.5
        } else {
            (self.update_time * 7.0 + tick) * 0.125
        };
        true
    }
}
