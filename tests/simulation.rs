// Copyright 2023 The Regents of the University of California
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@berkeley.edu>

use pdasim::ir::*;
use pdasim::sim::*;

/// `S` is start and accept state with a single `a, Z; Z` self loop.
fn single_loop() -> (Automaton, StateRef) {
    let mut aut = Automaton::new("Z");
    let s = aut.add_state("S", true, true);
    aut.add_transition(s, Transition::new('a', 'Z', "Z", s));
    (aut, s)
}

/// Recognizes a^n b^n for n >= 0.
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

/// Recognizes even length palindromes over {a, b}. Guesses the middle with epsilon transitions.
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

fn run(aut: &Automaton, input: &str) -> bool {
    let mut current = start(aut, input).unwrap();
    loop {
        match step(&current) {
            RunState::Running(next) => current = next,
            done => return done.verdict().unwrap(),
        }
    }
}

#[test]
fn start_creates_one_configuration_per_start_state() {
    let mut aut = Automaton::new("Z");
    let a = aut.add_state("a", true, false);
    let _b = aut.add_state("b", false, false);
    let c = aut.add_state("c", true, true);
    let snapshot = start(&aut, "xyz").unwrap();
    assert_eq!(snapshot.remaining_input(), "xyz");
    assert_eq!(snapshot.message(), "xyz");
    assert_eq!(snapshot.configurations().len(), 2);
    assert!(snapshot.configurations().contains(&Configuration::new(a, "Z")));
    assert!(snapshot.configurations().contains(&Configuration::new(c, "Z")));
    assert_eq!(snapshot.active_states().collect::<Vec<_>>(), [a, c]);
}

#[test]
fn start_errors() {
    let mut aut = Automaton::new("Z");
    aut.add_state("a", false, true);
    assert_eq!(start(&aut, "a"), Err(StartError::NoStartState));

    // the start state check comes first
    aut.set_empty_stack("");
    assert_eq!(start(&aut, "a"), Err(StartError::NoStartState));

    aut.modify_state(aut.get_state_by_name("a").unwrap(), |s| s.is_start = true);
    assert_eq!(start(&aut, "a"), Err(StartError::MissingEmptyStackSymbol));

    let mut sim = Simulator::new(&aut, SimOptions::default());
    assert_eq!(
        sim.run("a"),
        Err(SimError::Start(StartError::MissingEmptyStackSymbol))
    );
}

#[test]
fn single_path_acceptance() {
    let (aut, s) = single_loop();
    let snapshot = start(&aut, "a").unwrap();
    assert_eq!(
        snapshot.stacks().collect::<Vec<_>>(),
        [(s, "Z")],
        "initial configuration"
    );

    let next = step(&snapshot);
    let next = next.snapshot().unwrap();
    assert_eq!(next.stacks().collect::<Vec<_>>(), [(s, "Z")]);
    assert_eq!(next.remaining_input(), "");

    assert_eq!(step(next), RunState::Accepted);
}

#[test]
fn rejection_without_matching_transition() {
    let (aut, _) = single_loop();
    let snapshot = start(&aut, "b").unwrap();
    assert_eq!(step(&snapshot), RunState::Rejected);
    assert_eq!(step(&snapshot).verdict(), Some(false));
}

#[test]
fn step_does_not_modify_its_input() {
    let (aut, _) = single_loop();
    let snapshot = start(&aut, "aa").unwrap();
    let copy = snapshot.clone();
    let _ = step(&snapshot);
    assert_eq!(snapshot, copy);
    assert_eq!(snapshot.remaining_input(), "aa");
}

#[test]
fn closure_starts_from_consumed_configurations() {
    let mut aut = Automaton::new("Z");
    let s = aut.add_state("S", true, false);
    let a = aut.add_state("A", false, false);
    let b = aut.add_state("B", false, true);
    aut.add_transition(s, Transition::epsilon('Z', "Z", a));
    aut.add_transition(s, Transition::new('a', 'Z', "Z", b));

    let snapshot = start(&aut, "a").unwrap();
    let next = step(&snapshot);
    let next = next.snapshot().unwrap();
    let states: Vec<_> = next.active_states().collect();
    assert_eq!(states, [b]);
    assert!(!states.contains(&a));
    assert_eq!(step(next), RunState::Accepted);
}

#[test]
fn closure_follows_chains_of_epsilon_transitions() {
    let mut aut = Automaton::new("Z");
    let s = aut.add_state("s", true, false);
    let t = aut.add_state("t", false, false);
    let u = aut.add_state("u", false, false);
    let v = aut.add_state("v", false, true);
    aut.add_transition(s, Transition::new('x', 'Z', "YZ", t));
    aut.add_transition(t, Transition::epsilon('Y', "", u));
    aut.add_transition(u, Transition::epsilon('Z', "Z", v));
    // cycle back to the start of the chain
    aut.add_transition(v, Transition::epsilon('Z', "YZ", t));

    let snapshot = start(&aut, "x").unwrap();
    let next = step(&snapshot);
    let next = next.snapshot().unwrap();
    assert_eq!(
        next.stacks().collect::<Vec<_>>(),
        [(t, "YZ"), (u, "Z"), (v, "Z")]
    );
    assert!(next.is_accepting());
}

#[test]
fn stack_grows_below_the_written_symbols() {
    let mut aut = Automaton::new("XY");
    let s = aut.add_state("s", true, false);
    let t = aut.add_state("t", false, true);
    aut.add_transition(s, Transition::new('a', 'X', "PQ", t));
    let snapshot = start(&aut, "a").unwrap();
    let next = step(&snapshot);
    assert_eq!(
        next.snapshot().unwrap().stacks().collect::<Vec<_>>(),
        [(t, "PQY")]
    );
}

#[test]
fn anbn_language() {
    let aut = anbn();
    for accepted in ["", "ab", "aabb", "aaaabbbb"] {
        assert!(run(&aut, accepted), "{accepted:?} should be accepted");
    }
    for rejected in ["a", "b", "ba", "aab", "abb", "abab"] {
        assert!(!run(&aut, rejected), "{rejected:?} should be rejected");
    }
}

#[test]
fn palindrome_language() {
    let aut = palindrome();
    for accepted in ["aa", "abba", "babbab", "aabbaa"] {
        assert!(run(&aut, accepted), "{accepted:?} should be accepted");
    }
    for rejected in ["a", "ab", "aba", "abab", "bbaa"] {
        assert!(!run(&aut, rejected), "{rejected:?} should be rejected");
    }
}

#[test]
fn palindrome_snapshots() {
    let aut = palindrome();
    let mut current = start(&aut, "abba").unwrap();
    insta::assert_snapshot!(current.to_string(), @r#"
    remaining: "abba"
      p [Z]
    "#);
    for _ in 0..3 {
        current = step(&current).snapshot().unwrap().clone();
    }
    insta::assert_snapshot!(current.to_string(), @r#"
    remaining: "a"
      p [bbaZ]
      q [aZ]
      q [bbaZ]
    "#);
    current = step(&current).snapshot().unwrap().clone();
    insta::assert_snapshot!(current.to_string(), @r#"
    remaining: ""
      p [abbaZ]
      q [Z]
      q [abbaZ]
      f [Z]
    "#);
    assert_eq!(step(&current), RunState::Accepted);
}

#[test]
fn leading_epsilon_needs_initial_closure() {
    // p reaches the accept state f through epsilon transitions only
    let aut = palindrome();
    assert!(!run(&aut, ""));

    let mut sim = Simulator::new(&aut, SimOptions::default());
    assert_eq!(sim.run(""), Ok(false));

    let mut sim = Simulator::new(&aut, SimOptions::default().with_initial_closure(true));
    let snapshot = sim.start("").unwrap();
    assert_eq!(snapshot.configurations().len(), 3);
    assert_eq!(sim.step(&snapshot), Ok(RunState::Accepted));
    assert_eq!(sim.run(""), Ok(true));
}

#[test]
fn simulator_counts_consumed_symbols() {
    let aut = anbn();
    let mut sim = Simulator::new(&aut, SimOptions::default().with_max_closure_rounds(16));
    assert_eq!(sim.run("aabb"), Ok(true));
    assert_eq!(sim.step_count(), 4);
    assert_eq!(sim.run("aab"), Ok(false));
    assert_eq!(sim.step_count(), 3);
    // rejected while consuming the second symbol
    assert_eq!(sim.run("abab"), Ok(false));
    assert_eq!(sim.step_count(), 2);
}

#[test]
fn diverging_closure_is_reported() {
    let mut aut = Automaton::new("Z");
    let s = aut.add_state("s", true, true);
    aut.add_transition(s, Transition::new('a', 'Z', "Z", s));
    aut.add_transition(s, Transition::epsilon('Z', "XZ", s));
    aut.add_transition(s, Transition::epsilon('X', "XX", s));
    let mut sim = Simulator::new(&aut, SimOptions::default().with_max_closure_rounds(100));
    let err = sim.run("a").unwrap_err();
    assert!(matches!(
        err,
        SimError::ClosureDivergence {
            symbol: Some('a'),
            rounds: 101,
            ..
        }
    ));
    insta::assert_snapshot!(err.to_string(), @"epsilon-closure after `a` did not converge within 101 rounds (102 configurations)");
}

#[test]
fn serialize_palindrome() {
    insta::assert_snapshot!(palindrome().serialize_to_str(), @r"
    stack Z
    state p : start
      a, Z; aZ -> p
      a, a; aa -> p
      a, b; ab -> p
      b, Z; bZ -> p
      b, a; ba -> p
      b, b; bb -> p
      λ, Z; Z -> q
      λ, a; a -> q
      λ, b; b -> q
    state q
      a, a; λ -> q
      b, b; λ -> q
      λ, Z; Z -> f
    state f : accept
    ");
}

#[test]
fn runs_are_independent() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Automaton>();
    assert_send_sync::<Snapshot<'static>>();

    let aut = anbn();
    let aut = &aut;
    let results: Vec<bool> = std::thread::scope(|scope| {
        let handles: Vec<_> = ["ab", "aabb", "abb"]
            .into_iter()
            .map(|input| scope.spawn(move || run(aut, input)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(results, [true, true, false]);
}
