// Copyright 2023 The Regents of the University of California
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@berkeley.edu>

use super::configuration::{ConfigSet, Configuration};
use crate::ir::*;
use std::fmt::{Display, Formatter};

/// Reasons for which a run cannot be started.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum StartError {
    NoStartState,
    MissingEmptyStackSymbol,
}

impl Display for StartError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StartError::NoStartState => write!(f, "no start state"),
            StartError::MissingEmptyStackSymbol => {
                write!(f, "provide a symbol for empty stacks")
            }
        }
    }
}

impl std::error::Error for StartError {}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum SimError {
    Start(StartError),
    /// The epsilon-closure was still growing after the maximum number of rounds.
    /// `symbol` is the input symbol consumed before the closure, `None` for the initial closure.
    ClosureDivergence {
        symbol: Option<char>,
        rounds: usize,
        configurations: usize,
    },
}

impl Display for SimError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SimError::Start(e) => write!(f, "failed to start: {e}"),
            SimError::ClosureDivergence {
                symbol,
                rounds,
                configurations,
            } => {
                let symbol = symbol.unwrap_or(EPSILON_GLYPH);
                write!(
                    f,
                    "epsilon-closure after `{symbol}` did not converge within {rounds} rounds \
                     ({configurations} configurations)"
                )
            }
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Start(e) => Some(e),
            SimError::ClosureDivergence { .. } => None,
        }
    }
}

impl From<StartError> for SimError {
    fn from(value: StartError) -> Self {
        SimError::Start(value)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct SimOptions {
    /// Maximum number of growing epsilon-closure rounds per step. `None` never gives up.
    pub max_closure_rounds: Option<usize>,
    /// Compute the epsilon-closure of the start configurations.
    pub close_initial: bool,
}

impl SimOptions {
    pub fn with_max_closure_rounds(mut self, rounds: usize) -> Self {
        self.max_closure_rounds = Some(rounds);
        self
    }

    pub fn with_initial_closure(mut self, enabled: bool) -> Self {
        self.close_initial = enabled;
        self
    }
}

/// All configurations that are active before consuming `remaining`.
#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    automaton: &'a Automaton,
    configs: ConfigSet,
    remaining: &'a str,
}

impl<'a> Snapshot<'a> {
    pub fn automaton(&self) -> &'a Automaton {
        self.automaton
    }

    pub fn configurations(&self) -> &ConfigSet {
        &self.configs
    }

    pub fn remaining_input(&self) -> &'a str {
        self.remaining
    }

    /// The state of every configuration, in order. A state shows up once per stack.
    pub fn active_states(&self) -> impl Iterator<Item = StateRef> + '_ {
        self.configs.iter().map(|c| c.state)
    }

    pub fn stacks(&self) -> impl Iterator<Item = (StateRef, &str)> + '_ {
        self.configs.iter().map(|c| (c.state, c.stack.as_str()))
    }

    /// Text shown next to the automaton while stepping.
    pub fn message(&self) -> &'a str {
        self.remaining
    }

    /// Whether the run would accept if the input ended here.
    pub fn is_accepting(&self) -> bool {
        self.active_states().any(|s| self.automaton.get(s).is_accept)
    }
}

impl PartialEq for Snapshot<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.automaton, other.automaton)
            && self.remaining == other.remaining
            && self.configs.same_contents(&other.configs)
    }
}

impl Eq for Snapshot<'_> {}

impl Display for Snapshot<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "remaining: {:?}", self.remaining)?;
        for (state, stack) in self.stacks() {
            writeln!(f, "  {} [{stack}]", self.automaton.get(state).name)?;
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum RunState<'a> {
    Running(Snapshot<'a>),
    Accepted,
    Rejected,
}

impl<'a> RunState<'a> {
    /// `Some(accepted)` once the run is over.
    pub fn verdict(&self) -> Option<bool> {
        match self {
            RunState::Running(_) => None,
            RunState::Accepted => Some(true),
            RunState::Rejected => Some(false),
        }
    }

    pub fn snapshot(&self) -> Option<&Snapshot<'a>> {
        match self {
            RunState::Running(s) => Some(s),
            _ => None,
        }
    }
}

/// Creates the initial snapshot. No epsilon transitions are followed yet.
pub fn start<'a>(automaton: &'a Automaton, input: &'a str) -> Result<Snapshot<'a>, StartError> {
    Ok(Snapshot {
        automaton,
        configs: start_configurations(automaton)?,
        remaining: input,
    })
}

/// Consumes the next input symbol, or decides acceptance once the input is exhausted.
/// The epsilon-closure is unbounded and may not terminate for automata whose epsilon
/// transitions grow the stack forever; use a [`Simulator`] with a round limit for those.
pub fn step<'a>(current: &Snapshot<'a>) -> RunState<'a> {
    match advance(current, None) {
        Ok(next) => next,
        Err(e) => unreachable!("unbounded closure cannot fail: {e}"),
    }
}

/// Simulator with configurable closure behavior that counts consumed symbols.
pub struct Simulator<'a> {
    automaton: &'a Automaton,
    options: SimOptions,
    step_count: u64,
}

impl<'a> Simulator<'a> {
    pub fn new(automaton: &'a Automaton, options: SimOptions) -> Self {
        Self {
            automaton,
            options,
            step_count: 0,
        }
    }

    pub fn options(&self) -> &SimOptions {
        &self.options
    }

    pub fn start(&mut self, input: &'a str) -> Result<Snapshot<'a>, SimError> {
        let mut configs = start_configurations(self.automaton)?;
        if self.options.close_initial {
            epsilon_closure(self.automaton, &mut configs, self.options.max_closure_rounds)
                .map_err(|rounds| SimError::ClosureDivergence {
                    symbol: None,
                    rounds,
                    configurations: configs.len(),
                })?;
        }
        self.step_count = 0;
        Ok(Snapshot {
            automaton: self.automaton,
            configs,
            remaining: input,
        })
    }

    pub fn step(&mut self, current: &Snapshot<'a>) -> Result<RunState<'a>, SimError> {
        assert!(
            std::ptr::eq(current.automaton, self.automaton),
            "snapshot was produced for a different automaton"
        );
        let next = advance(current, self.options.max_closure_rounds)?;
        if matches!(next, RunState::Running(_)) {
            self.step_count += 1;
        }
        Ok(next)
    }

    /// Starts a run and steps it to completion.
    pub fn run(&mut self, input: &'a str) -> Result<bool, SimError> {
        let mut current = self.start(input)?;
        loop {
            match self.step(&current)? {
                RunState::Running(next) => current = next,
                RunState::Accepted => return Ok(true),
                RunState::Rejected => return Ok(false),
            }
        }
    }

    /// Number of input symbols consumed since the last `start`.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }
}

fn start_configurations(automaton: &Automaton) -> Result<ConfigSet, StartError> {
    let starts: Vec<StateRef> = automaton.start_states().collect();
    if starts.is_empty() {
        return Err(StartError::NoStartState);
    }
    if automaton.empty_stack.is_empty() {
        return Err(StartError::MissingEmptyStackSymbol);
    }
    Ok(starts
        .into_iter()
        .map(|s| Configuration::new(s, automaton.empty_stack.clone()))
        .collect())
}

fn advance<'a>(
    current: &Snapshot<'a>,
    max_rounds: Option<usize>,
) -> Result<RunState<'a>, SimError> {
    let mut chars = current.remaining.chars();
    let Some(symbol) = chars.next() else {
        return Ok(if current.is_accepting() {
            RunState::Accepted
        } else {
            RunState::Rejected
        });
    };
    let rest = chars.as_str();

    let automaton = current.automaton;
    let mut next = apply_transitions(automaton, &current.configs, Some(symbol));
    epsilon_closure(automaton, &mut next, max_rounds).map_err(|rounds| {
        SimError::ClosureDivergence {
            symbol: Some(symbol),
            rounds,
            configurations: next.len(),
        }
    })?;

    if next.is_empty() {
        Ok(RunState::Rejected)
    } else {
        Ok(RunState::Running(Snapshot {
            automaton,
            configs: next,
            remaining: rest,
        }))
    }
}

/// Fires every transition that matches `symbol` (`None` for epsilon) and the top of stack.
fn apply_transitions(
    automaton: &Automaton,
    configs: &ConfigSet,
    symbol: Option<char>,
) -> ConfigSet {
    let mut out = ConfigSet::new();
    for config in configs {
        let top = config.top_of_stack();
        for transition in automaton.get(config.state).transitions() {
            if transition.matches(symbol, top) {
                out.add(config.follow(transition));
            }
        }
    }
    out
}

/// Merges epsilon successors into `configs` until a round adds nothing new.
/// On failure, returns the number of growing rounds that were executed.
fn epsilon_closure(
    automaton: &Automaton,
    configs: &mut ConfigSet,
    max_rounds: Option<usize>,
) -> Result<(), usize> {
    let mut rounds = 0;
    loop {
        let previous_len = configs.len();
        let successors = apply_transitions(automaton, configs, None);
        configs.extend(successors);
        if configs.len() == previous_len {
            return Ok(());
        }
        rounds += 1;
        if max_rounds.is_some_and(|max| rounds > max) {
            return Err(rounds);
        }
    }
}
