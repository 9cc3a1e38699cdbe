//! End-to-end checks on the bundled full adder netlist.

use cmos_ic::circuit::{Designator, Polarity};
use cmos_ic::{dsl, ContentionPolicy, Ic, Level, ResolveConfig, TransistorFilter, FULL_ADDER};

fn full_adder() -> Ic {
    Ic::from_ast(&dsl::parse(FULL_ADDER).unwrap()).unwrap()
}

fn designators(list: &[(Polarity, u32)]) -> Vec<Designator> {
    list.iter().map(|&(p, n)| Designator::new(p, n)).collect()
}

#[test]
fn test_structure() {
    let ic = full_adder();
    assert_eq!(ic.name(), "FULL_ADDER");
    assert_eq!(ic.input_names().collect::<Vec<_>>(), vec!["X", "Y", "C"]);
    assert_eq!(ic.output_names().collect::<Vec<_>>(), vec!["S", "P"]);
    assert_eq!(ic.cascades().len(), 4);
    assert_eq!(ic.graph().transistors().len(), 28);

    assert!(ic.cascade("I").unwrap().is_autonomous());
    assert!(!ic.cascade("II").unwrap().is_autonomous());
    assert_eq!(ic.cascade("III").unwrap().input_names().collect::<Vec<_>>(), vec!["x"]);
}

#[test]
fn test_sum_and_carry() {
    let mut ic = full_adder();
    let table = ic.get_table().unwrap();
    assert_eq!(table.len(), 8);

    for (index, row) in table.rows.iter().enumerate() {
        let x = index & 0b100 != 0;
        let y = index & 0b010 != 0;
        let c = index & 0b001 != 0;
        assert_eq!(
            row.inputs,
            vec![Level::from(x), Level::from(y), Level::from(c)]
        );

        let sum = x ^ y ^ c;
        let carry = (x && y) || (x && c) || (y && c);
        assert_eq!(row.outputs, vec![Level::from(sum), Level::from(carry)], "state {:03b}", index);
    }
}

#[test]
fn test_open_and_active_transistors() {
    use Polarity::{N, P};

    let mut ic = full_adder();
    let table = ic.get_table().unwrap();

    let first = &table.rows[0];
    assert_eq!(
        first.open,
        designators(&[
            (P, 1),
            (P, 2),
            (P, 3),
            (P, 4),
            (P, 5),
            (P, 10),
            (P, 11),
            (P, 12),
            (N, 13),
            (N, 14),
        ])
    );
    assert_eq!(first.active, designators(&[(N, 13), (N, 14)]));

    let last = &table.rows[7];
    assert_eq!(last.active, designators(&[(P, 13), (P, 14)]));

    for row in &table.rows {
        assert!(row.active.iter().all(|d| row.open.contains(d)));
    }
}

#[test]
fn test_table_is_repeatable() {
    let mut ic = full_adder();
    let first = ic.get_table().unwrap();
    let second = ic.get_table().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_reject_policy_agrees_with_wired_or() {
    let config = ResolveConfig::new().with_contention(ContentionPolicy::Reject);
    let mut strict = Ic::from_ast_with_config(&dsl::parse(FULL_ADDER).unwrap(), config).unwrap();
    let mut relaxed = full_adder();
    assert_eq!(strict.get_table().unwrap(), relaxed.get_table().unwrap());
}

#[test]
fn test_output_loads() {
    let ic = full_adder();
    let loads: Vec<(&str, u32, u32)> = ic
        .cascades()
        .iter()
        .map(|c| (c.name(), c.out_capacity(ic.graph()), c.gate_load(ic.graph())))
        .collect();
    // Stage outputs only ever reach gates, so no source is loaded.
    assert_eq!(
        loads,
        vec![("I", 0, 24), ("II", 0, 12), ("III", 0, 0), ("IV", 0, 0)]
    );
}

#[test]
fn test_single_state() {
    let mut ic = full_adder();
    ic.change_state([("X", Level::High), ("C", Level::High)]).unwrap();
    assert_eq!(ic.output_level("S"), Some(Level::Low));
    assert_eq!(ic.output_level("P"), Some(Level::High));

    let active = ic
        .transistors(&TransistorFilter::any().open().active())
        .unwrap();
    let active: Vec<Designator> = active.iter().map(|t| t.designator()).collect();
    assert_eq!(active, designators(&[(Polarity::N, 13), (Polarity::P, 14)]));

    // Unnamed inputs keep their levels.
    ic.change_state([("Y", Level::High)]).unwrap();
    assert_eq!(ic.input_level("X"), Some(Level::High));
    assert_eq!(ic.output_level("S"), Some(Level::High));
}
