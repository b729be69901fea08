// Copyright 2023 The Regents of the University of California
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@berkeley.edu>

use smallvec::SmallVec;
use std::fmt::{Debug, Display, Formatter};
use std::num::NonZeroU32;

/// Placeholder printed for an epsilon input or an empty stack write.
pub const EPSILON_GLYPH: char = 'λ';

/// Handle to a state inside an [`Automaton`]. Two configurations refer to the same state
/// iff their handles are equal, independent of the state's name or flags.
#[derive(PartialEq, Eq, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct StateRef(NonZeroU32);

impl Debug for StateRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // we need a custom implementation in order to show the zero based index
        write!(f, "StateRef({})", self.index())
    }
}

impl StateRef {
    pub(crate) fn from_index(index: usize) -> Self {
        StateRef(NonZeroU32::new((index + 1) as u32).unwrap())
    }

    pub fn index(&self) -> usize {
        (self.0.get() - 1) as usize
    }
}

/// Edge of the automaton. Owned by its source state.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Transition {
    /// Symbol consumed from the input, `None` for an epsilon transition.
    pub on_input: Option<char>,
    /// Symbol that needs to be on top of the stack. It is always popped.
    pub on_stack: char,
    /// Pushed in place of the popped symbol. The first character ends up on top.
    pub write_stack: String,
    pub destination: StateRef,
}

impl Transition {
    pub fn new(
        on_input: char,
        on_stack: char,
        write_stack: impl Into<String>,
        destination: StateRef,
    ) -> Self {
        Self {
            on_input: Some(on_input),
            on_stack,
            write_stack: write_stack.into(),
            destination,
        }
    }

    pub fn epsilon(on_stack: char, write_stack: impl Into<String>, destination: StateRef) -> Self {
        Self {
            on_input: None,
            on_stack,
            write_stack: write_stack.into(),
            destination,
        }
    }

    pub fn is_epsilon(&self) -> bool {
        self.on_input.is_none()
    }

    /// Checks whether the transition can fire. `symbol` is `None` while computing the
    /// epsilon-closure and `Some` while consuming an input symbol.
    pub(crate) fn matches(&self, symbol: Option<char>, top_of_stack: Option<char>) -> bool {
        self.on_input == symbol && top_of_stack == Some(self.on_stack)
    }
}

/// Renders the edge label, e.g., `a, Z; AZ` or `λ, Z; λ`.
impl Display for Transition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let input = self.on_input.unwrap_or(EPSILON_GLYPH);
        if self.write_stack.is_empty() {
            write!(f, "{input}, {}; {EPSILON_GLYPH}", self.on_stack)
        } else {
            write!(f, "{input}, {}; {}", self.on_stack, self.write_stack)
        }
    }
}

/// Which combination of start and accept flags a state carries.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum StateMarker {
    Plain,
    Start,
    Accept,
    StartAccept,
}

impl StateMarker {
    /// Icon used by the visualizer to draw the state.
    pub fn icon(&self) -> Option<&'static str> {
        match self {
            StateMarker::Plain => None,
            StateMarker::Start => Some("start_state.svg"),
            StateMarker::Accept => Some("accept_state.svg"),
            StateMarker::StartAccept => Some("start_accept_state.svg"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct State {
    pub name: String,
    pub is_start: bool,
    pub is_accept: bool,
    pub(crate) transitions: SmallVec<[Transition; 4]>,
}

impl State {
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn marker(&self) -> StateMarker {
        match (self.is_start, self.is_accept) {
            (true, true) => StateMarker::StartAccept,
            (true, false) => StateMarker::Start,
            (false, true) => StateMarker::Accept,
            (false, false) => StateMarker::Plain,
        }
    }
}

/// A nondeterministic pushdown automaton. States are stored in a table and referred to
/// through [`StateRef`] handles.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Automaton {
    pub(crate) states: Vec<State>,
    /// Initial stack content of every start configuration.
    pub empty_stack: String,
}

impl Automaton {
    pub fn new(empty_stack: impl Into<String>) -> Self {
        Automaton {
            states: Vec::default(),
            empty_stack: empty_stack.into(),
        }
    }

    pub fn add_state(&mut self, name: &str, is_start: bool, is_accept: bool) -> StateRef {
        let id = self.states.len();
        self.states.push(State {
            name: name.to_string(),
            is_start,
            is_accept,
            transitions: SmallVec::new(),
        });
        StateRef::from_index(id)
    }

    pub fn add_transition(&mut self, from: StateRef, transition: Transition) {
        assert!(
            transition.destination.index() < self.states.len(),
            "destination {:?} does not belong to this automaton",
            transition.destination
        );
        self.modify_state(from, |s| s.transitions.push(transition));
    }

    pub fn modify_state<F>(&mut self, reference: StateRef, modify: F)
    where
        F: FnOnce(&mut State),
    {
        let state = self
            .states
            .get_mut(reference.index())
            .unwrap_or_else(|| panic!("{reference:?} does not belong to this automaton"));
        modify(state)
    }

    pub fn set_empty_stack(&mut self, empty_stack: impl Into<String>) {
        self.empty_stack = empty_stack.into();
    }

    pub fn get(&self, reference: StateRef) -> &State {
        &self.states[reference.index()]
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn states(&self) -> impl Iterator<Item = (StateRef, &State)> {
        self.states
            .iter()
            .enumerate()
            .map(|(ii, s)| (StateRef::from_index(ii), s))
    }

    pub fn start_states(&self) -> impl Iterator<Item = StateRef> + '_ {
        self.states().filter(|(_, s)| s.is_start).map(|(r, _)| r)
    }

    /// Returns the first state with the given name.
    pub fn get_state_by_name(&self, name: &str) -> Option<StateRef> {
        self.states().find(|(_, s)| s.name == name).map(|(r, _)| r)
    }
}
