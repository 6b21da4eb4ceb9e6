//! The world: every emitter, the frame clock, and input routing.
//!
//! The controllable emitter is tracked by index from the moment it is added,
//! so input events never search for it. With no controllable emitter,
//! input events are ignored.

use drift_core::animation::Animation;
use drift_core::error::DriftError;
use drift_core::prng::Xorshift64;
use drift_core::run_loop::{FrameScheduler, RunLoop};
use drift_core::surface::Surface;
use serde_json::{json, Value};

use crate::config::{EmitterConfig, SceneConfig, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::input::{InputEvent, WheelInput};
use crate::system::ParticleSystem;
use crate::vector::Vector;

/// Owns all particle systems and drives them frame by frame.
#[derive(Debug, Clone)]
pub struct World {
    width: f64,
    height: f64,
    systems: Vec<ParticleSystem>,
    controllable: Option<usize>,
    rng: Xorshift64,
    frame: u64,
}

impl World {
    /// Creates an empty world. A zero width or height falls back to the
    /// 500-pixel default.
    pub fn new(width: u32, height: u32, seed: u64) -> Self {
        let width = if width == 0 { DEFAULT_WIDTH } else { width };
        let height = if height == 0 { DEFAULT_HEIGHT } else { height };
        Self {
            width: f64::from(width),
            height: f64::from(height),
            systems: Vec::new(),
            controllable: None,
            rng: Xorshift64::new(seed),
            frame: 0,
        }
    }

    /// Validates `scene` and builds a world with its emitters, in order.
    pub fn from_scene(scene: &SceneConfig) -> Result<Self, DriftError> {
        scene.validate()?;
        let mut world = Self::new(scene.width, scene.height, scene.seed);
        for emitter in &scene.emitters {
            world.add_particle_system(emitter);
        }
        Ok(world)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn systems(&self) -> &[ParticleSystem] {
        &self.systems
    }

    /// Total particles across all systems.
    pub fn particle_count(&self) -> usize {
        self.systems.iter().map(ParticleSystem::live_count).sum()
    }

    /// Appends a new system and returns its index.
    ///
    /// The first controllable system added becomes the input target. A later
    /// system flagged controllable while one is already registered is added
    /// but does not receive input.
    pub fn add_particle_system(&mut self, config: &EmitterConfig) -> usize {
        let index = self.systems.len();
        self.systems.push(ParticleSystem::new(config));
        if config.controllable {
            match self.controllable {
                None => self.controllable = Some(index),
                Some(existing) => log::warn!(
                    "system {index} is flagged controllable but system {existing} already \
                     receives input; keeping {existing}"
                ),
            }
        }
        index
    }

    /// Index of the system receiving input, if any.
    pub fn controllable_index(&self) -> Option<usize> {
        self.controllable
    }

    pub fn controllable(&self) -> Option<&ParticleSystem> {
        self.controllable.map(|i| &self.systems[i])
    }

    fn controllable_mut(&mut self) -> Option<&mut ParticleSystem> {
        let index = self.controllable?;
        self.systems.get_mut(index)
    }

    /// Makes system `index` the input target, clearing the flag on the
    /// previous one.
    pub fn set_controllable(&mut self, index: usize) -> Result<(), DriftError> {
        if index >= self.systems.len() {
            return Err(DriftError::SystemNotFound {
                index,
                count: self.systems.len(),
            });
        }
        if let Some(previous) = self.controllable.replace(index) {
            self.systems[previous].set_controllable(false);
        }
        self.systems[index].set_controllable(true);
        Ok(())
    }

    /// Stops routing input to any system.
    pub fn clear_controllable(&mut self) {
        if let Some(previous) = self.controllable.take() {
            self.systems[previous].set_controllable(false);
        }
    }

    /// Updates every system once, in insertion order.
    pub fn update_world(&mut self) {
        for system in &mut self.systems {
            system.update(&mut self.rng);
        }
        self.frame += 1;
    }

    /// Clears the whole canvas, then draws every system in insertion order.
    pub fn draw_world(&self, surface: &mut dyn Surface) -> Result<(), DriftError> {
        surface.clear_rect(0.0, 0.0, self.width, self.height);
        self.systems.iter().try_for_each(|s| s.draw(surface))
    }

    /// Drives this world on `surface` until `run_loop` is stopped or reaches
    /// its frame limit. Returns the number of frames produced.
    pub fn start<S, T>(&mut self, run_loop: &mut RunLoop<S>, surface: &mut T) -> Result<u64, DriftError>
    where
        S: FrameScheduler,
        T: Surface,
    {
        log::info!(
            "starting world: {}x{}, {} systems",
            self.width,
            self.height,
            self.systems.len()
        );
        run_loop.run(self, surface, |_, _| Ok(()))
    }

    /// Moves the controllable system's anchor to the pointer.
    ///
    /// Returns `false`, changing nothing, when no system is controllable.
    pub fn handle_pointer_move(&mut self, x: f64, y: f64) -> bool {
        let Some(system) = self.controllable_mut() else {
            log::debug!("pointer move ignored: no controllable system");
            return false;
        };
        system.set_coords(Vector::new(x, y));
        true
    }

    /// Applies a wheel event to the controllable system: shift adjusts
    /// particle size, alt adjusts scatter, and both may apply at once.
    ///
    /// Returns `false`, changing nothing, when no system is controllable.
    pub fn handle_wheel(&mut self, wheel: &WheelInput) -> bool {
        let Some(system) = self.controllable_mut() else {
            log::debug!("wheel ignored: no controllable system");
            return false;
        };
        if wheel.modifiers.shift {
            system.adjust_particle_size(wheel.delta);
        }
        if wheel.modifiers.alt {
            system.adjust_scatter(wheel.delta);
        }
        true
    }

    /// Routes any input event. See [`World::handle_pointer_move`] and
    /// [`World::handle_wheel`].
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerMove { x, y } => self.handle_pointer_move(*x, *y),
            InputEvent::Wheel(wheel) => self.handle_wheel(wheel),
        }
    }
}

impl Animation for World {
    fn update(&mut self) {
        self.update_world();
    }

    fn draw(&self, surface: &mut dyn Surface) -> Result<(), DriftError> {
        self.draw_world(surface)
    }

    fn frame(&self) -> u64 {
        self.frame
    }

    fn params(&self) -> Value {
        json!({
            "width": self.width,
            "height": self.height,
            "frame": self.frame,
            "controllable": self.controllable,
            "particles": self.particle_count(),
            "systems": self.systems.iter().map(ParticleSystem::params).collect::<Vec<_>>(),
        })
    }
}
