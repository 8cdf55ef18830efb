use rcpu_asm::{encode, Architecture, AsmError, Encoder, Mnemonic};

fn enc(mn: &str, ops: &[&str]) -> u16 {
    encode(mn, ops).unwrap()
}

#[test]
fn two_register_layouts() {
    // opcode | (D | S << 2) << 4
    assert_eq!(enc("MOV", &["A", "B"]), 0x0040);
    assert_eq!(enc("MOV", &["D", "C"]), 0x00B0);
    assert_eq!(enc("LDR", &["B", "C"]), 0x0094);
    assert_eq!(enc("LDP", &["C", "A"]), 0x0025);
    assert_eq!(enc("JLT", &["D", "D"]), 0x00F9);
}

#[test]
fn all_register_layouts_match_field_table() {
    let arch = Architecture::rcpu();
    let names: Vec<&str> = arch.register_names().collect();
    for m in [Mnemonic::Mov, Mnemonic::Ldr, Mnemonic::Ldp, Mnemonic::Jlt] {
        let op = arch.opcode(m).unwrap();
        for (d, dn) in names.iter().enumerate() {
            for (s, sn) in names.iter().enumerate() {
                let want = op | (((d | (s << 2)) as u16) << arch.opcode_width);
                assert_eq!(encode(m.name(), &[*dn, *sn]).unwrap(), want, "{m} {dn}, {sn}");
            }
        }
    }
}

#[test]
fn mnemonic_and_registers_are_case_insensitive() {
    assert_eq!(enc("mov", &["a", "b"]), enc("MOV", &["A", "B"]));
    assert_eq!(enc("Psh", &["c"]), 0x008A);
}

#[test]
fn single_register_layouts() {
    assert_eq!(enc("CAL", &["D"]), 0x0037);
    assert_eq!(enc("POP", &["B"]), 0x001B);
    // PSH/JMR place S above the empty D slot
    assert_eq!(enc("PSH", &["C"]), 0x008A);
    assert_eq!(enc("JMR", &["A"]), 0x000F);
    assert_eq!(enc("JMR", &["D"]), 0x00CF);
}

#[test]
fn no_operand_instructions_are_bare_opcodes() {
    assert_eq!(enc("RET", &[]), 0x0008);
    assert_eq!(enc("SYS", &[]), 0x000C);
    assert_eq!(enc("HLT", &[]), 0x000D);
}

#[test]
fn ldv_limit_boundaries() {
    let max = Architecture::rcpu().limits.ldv;
    assert_eq!(max, 1023);
    assert_eq!(enc("LDV", &["A", "0"]), 0x0001);
    assert_eq!(enc("LDV", &["C", "1023"]), 0xFFE1);
    let err = encode("LDV", &["C", "1024"]).unwrap_err();
    assert_eq!(
        err,
        AsmError::EncodingRange {
            mnemonic: Mnemonic::Ldv,
            field: "V",
            value: 1024,
            max: 1023
        }
    );
}

#[test]
fn memory_and_jump_literals() {
    assert_eq!(enc("LDA", &["B", "5"]), 0x0152);
    assert_eq!(enc("LDM", &["D", "7"]), 0x01F3);
    assert_eq!(enc("JMP", &["3"]), 0x00CE);
    assert_eq!(enc("JMP", &["1023"]), 0xFFCE);
    for mn in ["LDA", "LDM"] {
        assert!(matches!(
            encode(mn, &["A", "1024"]),
            Err(AsmError::EncodingRange { field: "M", .. })
        ));
    }
    assert!(matches!(
        encode("JMP", &["1024"]),
        Err(AsmError::EncodingRange { mnemonic: Mnemonic::Jmp, .. })
    ));
}

#[test]
fn negative_literals_are_rejected() {
    assert!(matches!(
        encode("LDV", &["A", "-1"]),
        Err(AsmError::EncodingRange { value: -1, .. })
    ));
    assert!(matches!(
        encode("JMP", &["-5"]),
        Err(AsmError::EncodingRange { value: -5, .. })
    ));
}

#[test]
fn literals_beyond_i64_are_out_of_range() {
    assert_eq!(
        encode("LDV", &["A", "99999999999999999999"]).unwrap_err(),
        AsmError::EncodingRange {
            mnemonic: Mnemonic::Ldv,
            field: "V",
            value: i64::MAX,
            max: 1023
        }
    );
    assert!(matches!(
        encode("JMP", &["-99999999999999999999"]),
        Err(AsmError::EncodingRange { mnemonic: Mnemonic::Jmp, value: i64::MIN, .. })
    ));
    assert!(matches!(
        encode("ATH", &["A", "B", "99999999999999999999", "0", "0"]),
        Err(AsmError::EncodingRange { field: "OP", .. })
    ));
    assert!(matches!(
        encode("LDV", &["A", "9e99"]),
        Err(AsmError::InvalidLiteral { .. })
    ));
}

#[test]
fn arity_matches_layout() {
    assert_eq!(Mnemonic::Ath.arity(), 5);
    assert_eq!(Mnemonic::Psh.arity(), 1);
    assert_eq!(Mnemonic::Hlt.arity(), 0);
    for m in Mnemonic::ALL {
        let too_many = vec!["A"; m.arity() + 1];
        assert_eq!(
            encode(m.name(), &too_many).unwrap_err(),
            AsmError::OperandCount {
                mnemonic: m,
                expected: m.arity(),
                found: m.arity() + 1
            }
        );
    }
}

#[test]
fn ath_fields() {
    assert_eq!(enc("ATH", &["A", "B", "15", "1", "7"]), 0xFF46);
    assert_eq!(enc("ATH", &["C", "D", "2", "0", "3"]), 0x62E6);
    assert_eq!(enc("ATH", &["A", "A", "0", "0", "0"]), 0x0006);

    let cases = [
        (["A", "B", "16", "0", "0"], "OP"),
        (["A", "B", "0", "2", "0"], "M"),
        (["A", "B", "0", "0", "8"], "B"),
    ];
    for (ops, field) in cases {
        match encode("ATH", &ops) {
            Err(AsmError::EncodingRange { mnemonic: Mnemonic::Ath, field: f, .. }) => assert_eq!(f, field),
            other => panic!("expected range error on {field}, got {other:?}"),
        }
    }
}

#[test]
fn unknown_register_names_the_token() {
    assert_eq!(
        encode("MOV", &["A", "E"]).unwrap_err(),
        AsmError::UnknownRegister { token: "E".into() }
    );
    assert_eq!(
        encode("ATH", &["X", "B", "0", "0", "0"]).unwrap_err().to_string(),
        "Unknown register: X"
    );
}

#[test]
fn unused_register_token_encodes_as_zero() {
    assert_eq!(enc("MOV", &["0", "B"]), enc("MOV", &["A", "B"]));
    assert_eq!(enc("ATH", &["C", "0", "1", "0", "0"]), enc("ATH", &["C", "A", "1", "0", "0"]));
}

#[test]
fn malformed_literals_and_arity() {
    assert!(matches!(
        encode("LDV", &["A", "0x10"]),
        Err(AsmError::InvalidLiteral { field: "V", .. })
    ));
    assert_eq!(
        encode("MOV", &["A"]).unwrap_err(),
        AsmError::OperandCount {
            mnemonic: Mnemonic::Mov,
            expected: 2,
            found: 1
        }
    );
    assert!(matches!(encode("RET", &["A"]), Err(AsmError::OperandCount { .. })));
    assert!(matches!(
        encode("NOP", &[] as &[&str]),
        Err(AsmError::UnknownMnemonic { .. })
    ));
}

#[test]
fn encoding_is_repeatable() {
    let e = Encoder::rcpu();
    let ops = ["B", "C", "9", "1", "4"];
    let first = e.encode(Mnemonic::Ath, &ops).unwrap();
    assert_eq!(e.encode(Mnemonic::Ath, &ops).unwrap(), first);
    assert_eq!(encode("ath", &ops).unwrap(), first);
}

#[test]
fn owned_operand_tokens() {
    let ops: Vec<String> = vec!["D".into(), "100".into()];
    assert_eq!(Encoder::default().encode(Mnemonic::Ldv, &ops).unwrap(), 0x1931);
}
