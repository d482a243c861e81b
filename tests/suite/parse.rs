//! Manual parsing tests

use switchyard_engine::{Bits, ParseError, SystemError, parse_manual};

use crate::common::SAMPLE_MANUAL;

#[test]
fn sample_manual_has_three_machines() {
    let machines = parse_manual(SAMPLE_MANUAL).unwrap();
    assert_eq!(machines.len(), 3);

    let first = &machines[0];
    assert_eq!(first.toggle.lamp_count(), 4);
    assert_eq!(first.toggle.target(), Bits::new(0b0110));
    assert_eq!(first.toggle.switches().len(), 6);

    let counter = first.counter.as_ref().unwrap();
    assert_eq!(counter.targets(), &[3, 5, 4, 7]);
    assert_eq!(counter.buttons()[1].indices(), &[1, 3]);
}

#[test]
fn blank_lines_are_skipped() {
    let text = format!("\n\n{SAMPLE_MANUAL}\n   \n");
    assert_eq!(parse_manual(&text).unwrap().len(), 3);
}

#[test]
fn errors_carry_the_line_number() {
    let text = "[.#] (0)\n\n[.x] (1)\n";
    let err = parse_manual(text).unwrap_err();
    assert!(matches!(err, ParseError::Line { line: 3, .. }));
    assert_eq!(
        err.to_string(),
        "line 3: lamp diagram may only contain '.' and '#', found 'x'"
    );
}

#[test]
fn out_of_range_wiring_is_rejected() {
    let err = parse_manual("[..] (0,2)").unwrap_err();
    let ParseError::Line { source, .. } = err else {
        panic!("expected a line error, got {err:?}");
    };
    assert!(matches!(
        *source,
        ParseError::Invalid(SystemError::SwitchOutOfRange { .. })
    ));
}

#[test]
fn counter_targets_are_optional() {
    let machines = parse_manual("[#.] (0) (0,1)").unwrap();
    assert!(machines[0].counter.is_none());
}
