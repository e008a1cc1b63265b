//! Configuration of [`GridWorld`](super::GridWorld).
use anyhow::{Context, Result};
use gridmdp_core::error::MdpError;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Names accepted by [`GridWorldConfig::named`].
pub const WORLD_NAMES: [&str; 3] = ["world1", "world2", "world3"];

/// Configuration of [`GridWorld`](super::GridWorld).
///
/// `layout` holds one string per row with whitespace-separated cells: `_` for
/// an empty cell, `s` for a start cell, `o` for an obstacle and a number for a
/// terminal cell paying that reward on entry.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct GridWorldConfig {
    /// Rows of the grid.
    pub layout: Vec<String>,

    /// Probability of slipping to one of the two perpendicular directions,
    /// split evenly between them.
    pub noise: f64,

    /// Reward of every move, added to the reward of a terminal cell entered.
    pub step_reward: f64,
}

impl Default for GridWorldConfig {
    fn default() -> Self {
        Self::world1()
    }
}

impl GridWorldConfig {
    /// The classic 3x4 world with one obstacle and two exits.
    pub fn world1() -> Self {
        Self::from_rows(&["_ _ _ 1", "_ o _ -1", "s _ _ _"])
    }

    /// A bridge between a near small exit and a far large one, above a cliff.
    pub fn world2() -> Self {
        Self::from_rows(&["10 s s s 1", "-10 -10 -10 -10 -10"])
    }

    /// A 5x5 world with two obstacles, two exits and a cliff on the bottom row.
    pub fn world3() -> Self {
        Self::from_rows(&[
            "_ _ _ _ _",
            "_ o _ _ _",
            "_ o 1 _ 10",
            "s _ _ _ _",
            "-10 -10 -10 -10 -10",
        ])
    }

    /// Returns the built-in world of the given name, see [`WORLD_NAMES`].
    pub fn named(name: &str) -> Result<Self> {
        match name {
            "world1" => Ok(Self::world1()),
            "world2" => Ok(Self::world2()),
            "world3" => Ok(Self::world3()),
            _ => Err(MdpError::InvalidConfig(format!(
                "unknown world {:?}, expected one of {:?}",
                name, WORLD_NAMES
            ))
            .into()),
        }
    }

    fn from_rows(rows: &[&str]) -> Self {
        Self {
            layout: rows.iter().map(|r| r.to_string()).collect(),
            noise: 0.0,
            step_reward: 0.0,
        }
    }

    /// Sets the layout.
    pub fn layout<S: Into<String>>(mut self, rows: impl IntoIterator<Item = S>) -> Self {
        self.layout = rows.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the noise.
    pub fn noise(mut self, v: f64) -> Self {
        self.noise = v;
        self
    }

    /// Sets the reward of a move.
    pub fn step_reward(mut self, v: f64) -> Self {
        self.step_reward = v;
        self
    }

    pub(crate) fn check(&self) -> Result<(), MdpError> {
        if !(0.0..=1.0).contains(&self.noise) {
            return Err(MdpError::InvalidConfig(format!(
                "noise must be in [0, 1], got {}",
                self.noise
            )));
        }
        if !self.step_reward.is_finite() {
            return Err(MdpError::InvalidConfig(format!(
                "step_reward must be finite, got {}",
                self.step_reward
            )));
        }
        Ok(())
    }

    /// Constructs [`GridWorldConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`GridWorldConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
