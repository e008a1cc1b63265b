//! Grid world environment.
use crate::{
    layout::{Cell, Layout},
    GridWorldConfig,
};
use anyhow::Result;
use gridmdp_core::{
    error::MdpError, Env, EpisodicEnv, ModelBasedEnv, Step, Transition, TransitionModel,
};
use itertools::iproduct;
use log::{info, trace};
use rand::{distributions::WeightedIndex, prelude::Distribution, rngs::StdRng, Rng, SeedableRng};

/// Moves towards row `0`.
pub const UP: usize = 0;

/// Moves towards the last column.
pub const RIGHT: usize = 1;

/// Moves towards the last row.
pub const DOWN: usize = 2;

/// Moves towards column `0`.
pub const LEFT: usize = 3;

/// The number of actions.
pub const N_ACTIONS: usize = 4;

/// A grid world with four movement actions.
///
/// Every cell is a state, including obstacles, which only loop to themselves
/// and cannot be entered. A move goes in the intended direction with
/// probability `1 - noise` and slips to each perpendicular direction with
/// probability `noise / 2`. Moving off the grid or into an obstacle leaves
/// the agent in place. Entering a terminal cell pays its reward on top of the
/// step reward and ends the episode; terminal cells loop to themselves with
/// reward zero.
///
/// The transition model is built once in [`Env::build`], which rejects
/// layouts where some start cell cannot reach a terminal cell, so every
/// episode can end. Episodes start at a
/// uniformly chosen start cell and outcomes of [`EpisodicEnv::step`] are drawn
/// from the transition model with a random number generator seeded at build
/// time.
pub struct GridWorld {
    layout: Layout,
    model: TransitionModel,
    starts: Vec<usize>,
    rng: StdRng,
    state: Option<usize>,
}

impl Env for GridWorld {
    type Config = GridWorldConfig;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        config.check()?;
        let layout = Layout::parse(config.layout.as_slice())?;
        let starts = layout.start_states();
        if starts.is_empty() {
            return Err(MdpError::InvalidLayout("no free cell to start from".to_string()).into());
        }
        let model = transition_model(&layout, config.noise, config.step_reward)?;
        check_terminal_reachable(&layout, &model, &starts)?;
        info!(
            "Built a {}x{} grid world with noise {}",
            layout.rows(),
            layout.cols(),
            config.noise
        );

        Ok(Self {
            layout,
            model,
            starts,
            rng: StdRng::seed_from_u64(seed as u64),
            state: None,
        })
    }

    fn n_states(&self) -> usize {
        self.layout.len()
    }

    fn n_actions(&self) -> usize {
        N_ACTIONS
    }
}

impl ModelBasedEnv for GridWorld {
    fn transition_model(&self) -> &TransitionModel {
        &self.model
    }
}

impl EpisodicEnv for GridWorld {
    type Info = ();

    fn reset(&mut self) -> Result<usize> {
        let s = self.starts[self.rng.gen_range(0..self.starts.len())];
        self.state = Some(s);
        Ok(s)
    }

    fn step(&mut self, act: usize) -> Result<Step<Self>> {
        let s = self.state.ok_or(MdpError::EpisodeNotStarted)?;
        if act >= N_ACTIONS {
            return Err(MdpError::ActionOutOfRange {
                action: act,
                n_actions: N_ACTIONS,
            }
            .into());
        }

        let outcomes = self.model.get(s, act);
        let dist = WeightedIndex::new(outcomes.iter().map(|t| t.probability))?;
        let t = outcomes[dist.sample(&mut self.rng)];
        trace!("{} --{}--> {} (r = {})", s, act, t.next_state, t.reward);

        self.state = if t.is_terminal { None } else { Some(t.next_state) };
        Ok(Step::new(act, t.next_state, t.reward, t.is_terminal, ()))
    }
}

impl GridWorld {
    /// The layout of the world.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The current state, `None` outside of an episode.
    pub fn state(&self) -> Option<usize> {
        self.state
    }
}

/// The cell reached by moving from `(row, col)` in direction `act`.
fn move_to(layout: &Layout, row: usize, col: usize, act: usize) -> usize {
    let (rows, cols) = (layout.rows(), layout.cols());
    let target = match act {
        UP if row > 0 => Some((row - 1, col)),
        RIGHT if col + 1 < cols => Some((row, col + 1)),
        DOWN if row + 1 < rows => Some((row + 1, col)),
        LEFT if col > 0 => Some((row, col - 1)),
        _ => None,
    };
    let here = layout.state(row, col);
    match target.map(|(r, c)| layout.state(r, c)) {
        Some(s) if layout.cell(s) != Cell::Obstacle => s,
        _ => here,
    }
}

fn transition_model(layout: &Layout, noise: f64, step_reward: f64) -> Result<TransitionModel> {
    let mut model = TransitionModel::new(layout.len(), N_ACTIONS);

    for ((row, col), act) in iproduct!(iproduct!(0..layout.rows(), 0..layout.cols()), 0..N_ACTIONS) {
        let s = layout.state(row, col);
        let transitions = match layout.cell(s) {
            Cell::Obstacle => vec![Transition::new(1.0, s, 0.0, false)],
            Cell::Terminal(_) => vec![Transition::new(1.0, s, 0.0, true)],
            Cell::Empty | Cell::Start => {
                let slips = [
                    (act, 1.0 - noise),
                    ((act + 1) % N_ACTIONS, noise / 2.0),
                    ((act + 3) % N_ACTIONS, noise / 2.0),
                ];
                let mut transitions: Vec<Transition> = Vec::with_capacity(3);
                for (dir, p) in slips.into_iter().filter(|(_, p)| *p > 0.0) {
                    let next = move_to(layout, row, col, dir);
                    if let Some(t) = transitions.iter_mut().find(|t| t.next_state == next) {
                        t.probability += p;
                        continue;
                    }
                    let (reward, is_terminal) = match layout.cell(next) {
                        Cell::Terminal(r) => (step_reward + r, true),
                        _ => (step_reward, false),
                    };
                    transitions.push(Transition::new(p, next, reward, is_terminal));
                }
                transitions
            }
        };
        model.set(s, act, transitions)?;
    }

    Ok(model)
}

/// Fails unless a terminal cell is reachable from every start cell.
fn check_terminal_reachable(
    layout: &Layout,
    model: &TransitionModel,
    starts: &[usize],
) -> Result<(), MdpError> {
    // states that can reach a terminal cell, grown backwards from the exits
    let mut reaches = layout
        .cells()
        .map(|cell| matches!(cell, Cell::Terminal(_)))
        .collect::<Vec<_>>();
    let mut grown = true;
    while grown {
        grown = false;
        for s in 0..layout.len() {
            if reaches[s] {
                continue;
            }
            let leads_out = (0..N_ACTIONS).any(|a| {
                model
                    .get(s, a)
                    .iter()
                    .any(|t| t.probability > 0.0 && reaches[t.next_state])
            });
            if leads_out {
                reaches[s] = true;
                grown = true;
            }
        }
    }

    match starts.iter().find(|&&s| !reaches[s]) {
        Some(&s) => Err(MdpError::InvalidLayout(format!(
            "no terminal cell is reachable from the start cell at {:?}",
            layout.position(s)
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world(rows: &[&str], noise: f64, step_reward: f64) -> GridWorld {
        let config = GridWorldConfig::default()
            .layout(rows.iter().copied())
            .noise(noise)
            .step_reward(step_reward);
        GridWorld::build(&config, 0).unwrap()
    }

    #[test]
    fn test_builtin_models_are_valid() -> Result<()> {
        for config in [
            GridWorldConfig::world1(),
            GridWorldConfig::world2(),
            GridWorldConfig::world3().noise(0.2),
        ] {
            let env = GridWorld::build(&config, 42)?;
            env.transition_model().validate(1e-9)?;
        }
        Ok(())
    }

    #[test]
    fn test_deterministic_moves() {
        let env = world(&["_ _ _ 1", "_ o _ -1", "s _ _ _"], 0.0, 0.0);
        let model = env.transition_model();

        // off the grid
        assert_eq!(model.get(0, UP), &[Transition::new(1.0, 0, 0.0, false)]);
        // into the obstacle
        assert_eq!(model.get(4, RIGHT), &[Transition::new(1.0, 4, 0.0, false)]);
        // into an exit
        assert_eq!(model.get(2, RIGHT), &[Transition::new(1.0, 3, 1.0, true)]);
        assert_eq!(model.get(11, UP), &[Transition::new(1.0, 7, -1.0, true)]);
        // exits and obstacles loop
        assert_eq!(model.get(3, LEFT), &[Transition::new(1.0, 3, 0.0, true)]);
        assert_eq!(model.get(5, DOWN), &[Transition::new(1.0, 5, 0.0, false)]);
    }

    #[test]
    fn test_noise_and_merged_outcomes() {
        let env = world(&["_ _", "_ 1"], 0.2, -0.1);
        let model = env.transition_model();

        // from the top-left corner, up stays; slipping left also stays
        let ts = model.get(0, UP);
        assert_eq!(ts.len(), 2);
        assert_eq!(ts[0].next_state, 0);
        assert!((ts[0].probability - 0.9).abs() < 1e-12);
        assert_eq!(ts[1].next_state, 1);
        assert!((ts[1].probability - 0.1).abs() < 1e-12);

        // down from the top-right corner enters the exit
        let t = model.get(1, DOWN)[0];
        assert_eq!((t.next_state, t.is_terminal), (3, true));
        assert!((t.probability - 0.8).abs() < 1e-12);
        assert!((t.reward - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_step_before_reset_fails() {
        let mut env = world(&["s 1"], 0.0, 0.0);
        assert!(env.step(RIGHT).is_err());
    }

    #[test]
    fn test_episode() -> Result<()> {
        let mut env = world(&["s _ 1"], 0.0, -1.0);
        assert_eq!(env.reset()?, 0);
        let step = env.step(RIGHT)?;
        assert_eq!((step.next_state, step.reward, step.is_terminated), (1, -1.0, false));
        let step = env.step(RIGHT)?;
        assert_eq!((step.next_state, step.reward, step.is_terminated), (2, 0.0, true));
        assert_eq!(env.state(), None);
        assert!(env.step(RIGHT).is_err());
        assert!(env.step(N_ACTIONS).is_err());
        Ok(())
    }

    #[test]
    fn test_reset_is_uniform_over_start_cells() -> Result<()> {
        let mut env = GridWorld::build(&GridWorldConfig::world2(), 7)?;
        let mut counts = [0usize; 5];
        for _ in 0..3000 {
            counts[env.reset()?] += 1;
        }
        assert_eq!(counts[0], 0);
        assert_eq!(counts[4], 0);
        for c in &counts[1..4] {
            assert!(*c > 850 && *c < 1150, "{:?}", counts);
        }
        Ok(())
    }

    #[test]
    fn test_same_seed_same_episode() -> Result<()> {
        let config = GridWorldConfig::world3().noise(0.3);
        let run = |seed| -> Result<Vec<usize>> {
            let mut env = GridWorld::build(&config, seed)?;
            let mut states = vec![env.reset()?];
            for _ in 0..20 {
                let step = env.step(RIGHT)?;
                states.push(step.next_state);
                if step.is_terminated {
                    break;
                }
            }
            Ok(states)
        };
        assert_eq!(run(3)?, run(3)?);
        Ok(())
    }

    #[test]
    fn test_no_start_cell() {
        let config = GridWorldConfig::default().layout(["o 1"]);
        assert!(GridWorld::build(&config, 0).is_err());
    }

    #[test]
    fn test_unreachable_terminal() {
        for rows in [vec!["s o 1"], vec!["s _"], vec!["1 o _", "o _ _"]] {
            let config = GridWorldConfig::default().layout(rows.clone());
            let err = GridWorld::build(&config, 0).err();
            assert!(
                matches!(
                    err.as_ref().and_then(|e| e.downcast_ref::<MdpError>()),
                    Some(MdpError::InvalidLayout(_))
                ),
                "{:?}: {:?}",
                rows,
                err
            );
        }
    }

    #[test]
    fn test_terminal_reachable_around_an_obstacle() -> Result<()> {
        let config = GridWorldConfig::default().layout(["_ _ 1", "_ o _", "_ _ _"]);
        GridWorld::build(&config.clone().noise(0.2), 0)?;
        GridWorld::build(&config, 0)?;
        Ok(())
    }
}
