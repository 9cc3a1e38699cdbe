//! Property-based tests for state enumeration and evaluation.

use std::collections::HashSet;

use proptest::prelude::*;

use cmos_ic::{dsl, Graph, Ic, Level};

// ============================================================================
// Helper functions
// ============================================================================

/// An IC with `n` inputs and nothing else.
fn bare_ic(n: usize) -> Ic {
    let mut graph = Graph::new();
    let inputs = (0..n).map(|i| graph.add_input(format!("I{}", i))).collect();
    Ic::new("BARE", graph, inputs, Vec::new(), Vec::new()).unwrap()
}

/// A chain of `stages` inverters from input A to output Q.
fn inverter_chain(stages: usize) -> String {
    let mut netlist = String::from(".input A\n.output Q\n");
    for s in 0..stages {
        let (p, n) = (2 * s + 1, 2 * s + 2);
        if s == 0 {
            netlist.push_str(&format!(".cascade S0\nP{p} A\nN{n} A\n.ends\n"));
        } else {
            netlist.push_str(&format!(".cascade S{s}\n.in x {p} {n}\nP{p}\nN{n}\n.ends\n"));
            netlist.push_str(&format!(".link S{} -> S{}.x\n", s - 1, s));
        }
    }
    netlist.push_str(&format!(".link S{} -> Q\n", stages - 1));
    netlist
}

// ============================================================================
// Enumeration properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_state_count_is_power_of_two(n in 0usize..=10) {
        let ic = bare_ic(n);
        let states = ic.all_states();
        prop_assert_eq!(states.len(), 1usize << n);
        prop_assert_eq!(states.count(), 1usize << n);
    }

    #[test]
    fn prop_states_are_distinct_and_ordered(n in 1usize..=8) {
        let ic = bare_ic(n);
        let mut seen = HashSet::new();
        for (index, state) in ic.all_states().enumerate() {
            prop_assert_eq!(state.index(), index as u64);
            for (i, (_, level)) in state.iter().enumerate() {
                let bit = (index >> (n - 1 - i)) & 1 == 1;
                prop_assert_eq!(level, Level::from(bit));
            }
            let levels: Vec<Level> = state.iter().map(|(_, l)| l).collect();
            prop_assert!(seen.insert(levels));
        }
    }

    #[test]
    fn prop_enumeration_restarts(n in 0usize..=6) {
        let ic = bare_ic(n);
        let first: Vec<_> = ic.all_states().collect();
        let second: Vec<_> = ic.all_states().collect();
        prop_assert_eq!(first, second);
    }
}

// ============================================================================
// Evaluation properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_inverter_chain_parity(stages in 1usize..=6, input: bool) {
        let mut ic = Ic::from_ast(&dsl::parse(&inverter_chain(stages)).unwrap()).unwrap();
        ic.change_state([("A", Level::from(input))]).unwrap();
        let expected = if stages % 2 == 0 { input } else { !input };
        prop_assert_eq!(ic.output_level("Q"), Some(Level::from(expected)));
    }

    #[test]
    fn prop_change_state_only_touches_named_inputs(
        first in proptest::collection::vec(any::<bool>(), 4),
        name in 0usize..4,
        value: bool,
    ) {
        let mut ic = bare_ic(4);
        let names = ["I0", "I1", "I2", "I3"];
        ic.change_state(names.iter().zip(&first).map(|(n, b)| (*n, Level::from(*b)))).unwrap();
        ic.change_state([(names[name], Level::from(value))]).unwrap();
        for (i, n) in names.iter().enumerate() {
            let expected = if i == name { value } else { first[i] };
            prop_assert_eq!(ic.input_level(n), Some(Level::from(expected)));
        }
    }
}
