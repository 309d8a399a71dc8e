//! Cosmetic particle bursts
//!
//! Particles never affect gameplay. Each one drifts outward, slows down by a
//! fixed damping factor and disappears when its life counter runs out.

use glam::Vec2;
use rand::Rng;

use super::entities::{Color, Particle};
use crate::config::ParticleTuning;

/// Owns all live particles
#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `count` particles at `pos` with random heading, speed, size and life
    pub fn emit<R: Rng>(
        &mut self,
        pos: Vec2,
        color: Color,
        count: u32,
        tuning: &ParticleTuning,
        rng: &mut R,
    ) {
        let room = match tuning.max_particles {
            Some(cap) => cap.saturating_sub(self.particles.len()),
            None => count as usize,
        };
        let count = (count as usize).min(room);

        self.particles.reserve(count);
        for _ in 0..count {
            let angle = rng.random::<f32>() * std::f32::consts::TAU;
            let speed = lerp(tuning.min_speed, tuning.max_speed, rng.random::<f32>());
            self.particles.push(Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                radius: lerp(tuning.min_radius, tuning.max_radius, rng.random::<f32>()),
                color,
                active: true,
                life: lerp(tuning.min_life, tuning.max_life, rng.random::<f32>()),
                max_life: tuning.max_life,
                size: rng.random::<f32>() * tuning.max_size,
            });
        }
    }

    /// Advance one tick and cull dead particles. Returns how many were culled.
    pub fn update(&mut self, tuning: &ParticleTuning) -> usize {
        for p in self.particles.iter_mut() {
            p.pos += p.vel;
            p.life -= 1.0;
            p.vel *= tuning.damping;
            if p.life <= 0.0 {
                p.active = false;
            }
        }
        let before = self.particles.len();
        self.particles.retain(|p| p.active);
        before - self.particles.len()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
