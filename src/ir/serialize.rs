// Copyright 2023 The Regents of the University of California
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@berkeley.edu>

use super::{Automaton, State, Transition};
use std::io::Write;

/// Nodes whose text form refers to other states by name and thus need the automaton.
pub trait SerializableIrNode {
    fn serialize<W: Write>(&self, automaton: &Automaton, writer: &mut W) -> std::io::Result<()>;
    fn serialize_to_str(&self, automaton: &Automaton) -> String {
        let mut buf = Vec::new();
        self.serialize(automaton, &mut buf)
            .expect("Failed to write to string!");
        String::from_utf8(buf).expect("Failed to read string we wrote!")
    }
}

impl SerializableIrNode for Transition {
    fn serialize<W: Write>(&self, automaton: &Automaton, writer: &mut W) -> std::io::Result<()> {
        write!(writer, "{self} -> {}", automaton.get(self.destination).name)
    }
}

impl SerializableIrNode for State {
    fn serialize<W: Write>(&self, automaton: &Automaton, writer: &mut W) -> std::io::Result<()> {
        write!(writer, "state {}", self.name)?;
        match (self.is_start, self.is_accept) {
            (true, true) => writeln!(writer, " : start, accept")?,
            (true, false) => writeln!(writer, " : start")?,
            (false, true) => writeln!(writer, " : accept")?,
            (false, false) => writeln!(writer)?,
        }
        for transition in self.transitions() {
            write!(writer, "  ")?;
            transition.serialize(automaton, writer)?;
            writeln!(writer)?;
        }
        Ok(())
    }
}

impl Automaton {
    pub fn serialize<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "stack {}", self.empty_stack)?;
        for (_, state) in self.states() {
            state.serialize(self, writer)?;
        }
        Ok(())
    }

    pub fn serialize_to_str(&self) -> String {
        let mut buf = Vec::new();
        self.serialize(&mut buf)
            .expect("Failed to write to string!");
        String::from_utf8(buf).expect("Failed to read string we wrote!")
    }
}
