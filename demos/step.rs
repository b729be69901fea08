// Copyright 2023 The Regents of the University of California
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@berkeley.edu>

use clap::{Parser, ValueEnum};
use pdasim::ir::*;
use pdasim::sim::*;

#[derive(Parser, Debug)]
#[command(name = "step")]
#[command(author = "Kevin Laeufer <laeufer@berkeley.edu>")]
#[command(version)]
#[command(about = "Steps a built-in pushdown automaton through an input.", long_about = None)]
struct Args {
    #[arg(short, long)]
    verbose: bool,
    #[arg(long, value_enum, default_value = "anbn", help = "Automaton to simulate.")]
    automaton: Builtin,
    #[arg(long, help = "Give up when an epsilon-closure grows for more rounds.")]
    max_closure_rounds: Option<usize>,
    #[arg(long, help = "Follow epsilon transitions out of the start states.")]
    close_initial: bool,
    #[arg(value_name = "INPUT", index = 1, default_value = "")]
    input: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Builtin {
    /// a^n b^n
    Anbn,
    /// even length palindromes over {a, b}
    Palindrome,
    /// words over {a, b} with an even number of a's
    EvenA,
}

fn main() {
    let args = Args::parse();
    let aut = match args.automaton {
        Builtin::Anbn => anbn(),
        Builtin::Palindrome => palindrome(),
        Builtin::EvenA => even_a(),
    };
    if args.verbose {
        println!("{}", aut.serialize_to_str());
    }

    let mut options = SimOptions::default().with_initial_closure(args.close_initial);
    options.max_closure_rounds = args.max_closure_rounds;

    let start_time = std::time::Instant::now();
    let mut sim = Simulator::new(&aut, options);
    let mut current = match sim.start(&args.input) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };
    let accepted = loop {
        if args.verbose {
            print!("{current}");
        }
        match sim.step(&current) {
            Ok(RunState::Running(next)) => current = next,
            Ok(RunState::Accepted) => break true,
            Ok(RunState::Rejected) => break false,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(2);
            }
        }
    };
    let delta = std::time::Instant::now() - start_time;
    println!("{}", if accepted { "accepted" } else { "rejected" });
    println!("Executed {} steps in {:?}", sim.step_count(), delta);
    if !accepted {
        std::process::exit(1);
    }
}

fn anbn() -> Automaton {
    let mut aut = Automaton::new("Z");
    let q0 = aut.add_state("q0", true, true);
    let q1 = aut.add_state("q1", false, false);
    let q2 = aut.add_state("q2", false, false);
    let q3 = aut.add_state("q3", false, true);
    aut.add_transition(q0, Transition::new('a', 'Z', "AZ", q1));
    aut.add_transition(q1, Transition::new('a', 'A', "AA", q1));
    aut.add_transition(q1, Transition::new('b', 'A', "", q2));
    aut.add_transition(q2, Transition::new('b', 'A', "", q2));
    aut.add_transition(q2, Transition::epsilon('Z', "Z", q3));
    aut
}

fn palindrome() -> Automaton {
    let mut aut = Automaton::new("Z");
    let p = aut.add_state("p", true, false);
    let q = aut.add_state("q", false, false);
    let f = aut.add_state("f", false, true);
    for input in ['a', 'b'] {
        for top in ['Z', 'a', 'b'] {
            aut.add_transition(p, Transition::new(input, top, format!("{input}{top}"), p));
        }
        aut.add_transition(q, Transition::new(input, input, "", q));
    }
    for top in ['Z', 'a', 'b'] {
        aut.add_transition(p, Transition::epsilon(top, top.to_string(), q));
    }
    aut.add_transition(q, Transition::epsilon('Z', "Z", f));
    aut
}

/// Only uses the stack to carry the bottom symbol.
fn even_a() -> Automaton {
    let mut aut = Automaton::new("Z");
    let even = aut.add_state("even", true, true);
    let odd = aut.add_state("odd", false, false);
    aut.add_transition(even, Transition::new('a', 'Z', "Z", odd));
    aut.add_transition(even, Transition::new('b', 'Z', "Z", even));
    aut.add_transition(odd, Transition::new('a', 'Z', "Z", even));
    aut.add_transition(odd, Transition::new('b', 'Z', "Z", odd));
    aut
}
