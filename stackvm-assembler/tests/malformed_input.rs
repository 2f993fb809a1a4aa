//! Rejection paths for malformed assembly source.

use stackvm_assembler::{assemble, AssemblerError};

#[test]
fn test_unknown_mnemonic() {
    assert!(matches!(
        assemble("frobnicate"),
        Err(AssemblerError::UnknownInstruction(name)) if name == "frobnicate"
    ));
}

#[test]
fn test_load_is_not_an_instruction() {
    // The 0x80 selector was never assigned an operation.
    assert!(matches!(
        assemble("load 0x100"),
        Err(AssemblerError::UnknownInstruction(_))
    ));
}

#[test]
fn test_missing_operand() {
    assert!(matches!(
        assemble("loadi"),
        Err(AssemblerError::MissingOperand(name)) if name == "loadi"
    ));
}

#[test]
fn test_operand_on_bare_instruction() {
    assert!(matches!(
        assemble("halt 3"),
        Err(AssemblerError::UnexpectedOperand(name)) if name == "halt"
    ));
}

#[test]
fn test_duplicate_label() {
    assert!(matches!(
        assemble("a: nop\na: halt"),
        Err(AssemblerError::DuplicateLabel(name)) if name == "a"
    ));
}

#[test]
fn test_undefined_label() {
    assert!(matches!(
        assemble("jump nowhere\nhalt"),
        Err(AssemblerError::UndefinedLabel(name)) if name == "nowhere"
    ));
}

#[test]
fn test_label_as_byte_operand() {
    assert!(matches!(
        assemble("x: hvcall x"),
        Err(AssemblerError::InvalidImmediate(_))
    ));
}

#[test]
fn test_host_call_number_out_of_range() {
    assert!(matches!(
        assemble("hvcall 256"),
        Err(AssemblerError::InvalidImmediate(_))
    ));
    assert!(matches!(
        assemble("hvcall -1"),
        Err(AssemblerError::InvalidImmediate(_))
    ));
}

#[test]
fn test_word_operand_out_of_range() {
    assert!(matches!(
        assemble("loadi 0x7FFFFFFFFFFFF"),
        Err(AssemblerError::InvalidImmediate(_))
    ));
}

#[test]
fn test_unknown_directive() {
    assert!(matches!(
        assemble(".data 1 2 3"),
        Err(AssemblerError::InvalidDirective(name)) if name == "data"
    ));
}

#[test]
fn test_trailing_garbage() {
    assert!(matches!(
        assemble("loadi 1 2"),
        Err(AssemblerError::SyntaxError { line: 1, .. })
    ));
}

#[test]
fn test_error_reports_line_number() {
    let result = assemble("nop\nloadi 1 extra junk");
    match result {
        Err(AssemblerError::SyntaxError { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected syntax error, got {other:?}"),
    }
}
