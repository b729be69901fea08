// Copyright 2023 The Regents of the University of California
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@berkeley.edu>
mod automaton;
mod serialize;

pub use automaton::{Automaton, State, StateMarker, StateRef, Transition, EPSILON_GLYPH};
pub use serialize::SerializableIrNode;
