use avx512_iform::{classify_operand, instruction_form, parse_line, Classifier, InstructionLine, MemoryPolicyKind, OperandClass};

fn line(op: &str, args: &[&str]) -> InstructionLine {
    InstructionLine {
        mnemonic: op.to_string(),
        operands: args.iter().map(|s| s.to_string()).collect(),
        raw_text: String::new(),
    }
}

#[test]
fn instruction_forms() {
    let cases: &[(&str, &[&str], &str)] = &[
        ("KANDW", &["K4", "K4", "K6"], "KANDW K, K, K"),
        ("KMOVW", &["K5", "-17(BP)(SI*4)"], "KMOVW K, mem"),
        ("VCMPPD", &["$65", "X9", "X7", "K4", "K4"], "VCMPPD imm, X, X, K, K"),
        ("VCMPPD", &["$0", "-17(BP)(SI*2)", "Z0", "K5", "K6"], "VCMPPD imm, mem, Z, K, K"),
        ("VCMPPS", &["$81", "99(R15)(R15*2)", "Y16", "K4", "K1"], "VCMPPS imm, mem, Y, K, K"),
        ("VCVTSD2USIQ", &["(CX)", "R13"], "VCVTSD2USIQ mem, reg"),
    ];
    for (i, (op, args, want)) in cases.iter().enumerate() {
        let have = instruction_form(&line(op, args));
        assert_eq!(have, *want, "[{i}]");
    }
}

#[test]
fn zero_operands_form_is_mnemonic() {
    for op in ["RET", "VZEROUPPER", "VZEROALL"] {
        assert_eq!(instruction_form(&line(op, &[])), op);
    }
}

#[test]
fn different_values_same_classes_collapse() {
    let a = instruction_form(&line("VADDPD", &["X1", "X2", "X3"]));
    let b = instruction_form(&line("VADDPD", &["X29", "X0", "X17"]));
    assert_eq!(a, b);
    let c = instruction_form(&line("VADDPD", &["(AX)", "X2", "X3"]));
    assert_ne!(a, c);
}

#[test]
fn reserved_letters_ignore_rest_of_token() {
    assert_eq!(classify_operand("K0(AX)"), OperandClass::Opmask);
    assert_eq!(classify_operand("Zsym(SB)").to_string(), "Z");
    assert_eq!(classify_operand("$-1").to_string(), "imm");
    assert_eq!(classify_operand("8(SP)").to_string(), "mem");
    assert_eq!(classify_operand("CX").to_string(), "reg");
}

#[test]
fn classifier_is_repeatable() {
    let l = parse_line("\tVCMPPD $0, -17(BP)(SI*2), Z0, K5, K6").unwrap();
    let c = Classifier::with_policy(MemoryPolicyKind::VectorIndexed);
    let first = c.instruction_form(&l);
    for _ in 0..3 {
        assert_eq!(c.instruction_form(&l), first);
    }
    let classified = c.classify_line(l.clone());
    assert_eq!(classified.form, first);
    assert_eq!(classified.line, l);
}
