// Copyright 2023 The Regents of the University of California
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@berkeley.edu>

mod configuration;
pub mod interpreter;

pub use configuration::{ConfigSet, Configuration};
pub use interpreter::{
    start, step, RunState, SimError, SimOptions, Simulator, Snapshot, StartError,
};
