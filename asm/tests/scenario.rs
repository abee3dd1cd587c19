use tpasm::{assemble, error::Error, line::from_source, macros, record::Operand, Assembly};

const PROGRAM: &str = "\
START 100
A DS 3
L1: MOVER AREG, B
ADD AREG, C
MOVEM AREG, D
D EQU A + 1
L2: PRINT D
ORIGIN A - 1
C  DC '=5'
ORIGIN L2 + 1
STOP
B DC '=19'
END";

fn run(src: &str) -> Assembly {
    assemble(&from_source("test.asm", src))
}

#[test]
fn full_program_listing() {
    let asm = run(PROGRAM);
    for msg in asm.msgs.iter() {
        println!("{:?}: {}", msg.level, msg.text);
    }
    assert!(asm.msgs.is_empty());

    let rows = asm.rows();
    let expect = [
        ("START 100", "(AD,01) - (C,100)", "01 - 100"),
        ("A DS 3", "100 (DL,02) - (C,3)", "100 02 - 003"),
        ("L1: MOVER AREG, B", "103 (IS,04) 01 (S,3)", "103 04 01 108"),
        ("ADD AREG, C", "104 (IS,01) 01 (S,4)", "104 01 01 099"),
        ("MOVEM AREG, D", "105 (IS,05) 01 (S,5)", "105 05 01 101"),
        ("D EQU A + 1", "", ""),
        ("L2: PRINT D", "106 (IS,10) - (S,5)", "106 10 - 101"),
        ("ORIGIN A - 1", "", ""),
        ("C  DC '=5'", "99 (DL,01) - (L,1)", "99 01 - 109"),
        ("ORIGIN L2 + 1", "", ""),
        ("STOP", "107 (IS,00) - -", "107 00 - -"),
        ("B DC '=19'", "108 (DL,01) - (L,2)", "108 01 - 110"),
        (
            "END",
            "109 (AD,02) - (C,5)\n110 (AD,02) - (C,19)",
            "109 02 - 005\n110 02 - 019",
        ),
    ];
    assert_eq!(rows.len(), expect.len());
    for (row, (source, inter, machine)) in rows.iter().zip(expect) {
        assert_eq!(row.0, source);
        assert_eq!(row.1, inter, "intermediate of `{source}`");
        assert_eq!(row.2, machine, "machine code of `{source}`");
    }
}

#[test]
fn full_program_tables() {
    let asm = run(PROGRAM);
    let symbols: Vec<(usize, &str, Option<i64>)> = asm
        .ctx
        .symbols
        .iter()
        .map(|(idx, name, sym)| (idx, name, sym.address))
        .collect();
    assert_eq!(
        symbols,
        vec![
            (1, "A", Some(100)),
            (2, "L1", Some(103)),
            (3, "B", Some(108)),
            (4, "C", Some(99)),
            (5, "D", Some(101)),
            (6, "L2", Some(106)),
        ]
    );

    let literals: Vec<(usize, &str, Option<i64>)> = asm
        .ctx
        .literals
        .literals()
        .map(|(idx, lit)| (idx, lit.text.as_str(), lit.address))
        .collect();
    assert_eq!(
        literals,
        vec![(1, "'=5'", Some(109)), (2, "'=19'", Some(110))]
    );
    assert_eq!(asm.ctx.literals.pools(), &[1]);
}

#[test]
fn duplicate_literal_shares_one_slot() {
    let asm = run("START 0\nMOVER AREG, '=5'\nMOVER BREG, '=5'\nLTORG\nSTOP\nEND");
    assert_eq!(asm.ctx.literals.len(), 1);
    let refs: Vec<Operand> = asm.lines[1..3]
        .iter()
        .map(|a| a.intermediate[0].operand)
        .collect();
    assert_eq!(refs, vec![Operand::Literal(1), Operand::Literal(1)]);
    assert_eq!(
        asm.machine_code(),
        vec!["01 - 000", "0 04 01 002", "1 04 02 002", "2 05 - 005", "3 00 - -", "4 02 - -"]
    );
}

#[test]
fn unresolved_reference_is_reported_per_statement() {
    let asm = run("START 0\nMOVER AREG, X\nADD AREG, MISSING\nMOVEM AREG, X\nX DS 1\nEND");
    assert!(asm.has_error());
    assert!(matches!(
        &asm.lines[2].resolved,
        Err(Error::UnresolvedReference(name)) if name == "MISSING"
    ));
    assert!(asm.lines[1].resolved.is_ok());
    assert!(asm.lines[3].resolved.is_ok());
    assert_eq!(asm.rows()[2].2, "");
    assert_eq!(asm.rows()[3].2, "2 05 01 003");
}

#[test]
fn every_literal_gets_an_address() {
    let asm = run(concat!(
        "START 0\nMOVER AREG, '=1'\nLTORG\nLTORG\n",
        "ADD AREG, '=2'\nSUB AREG, '=3'\nLTORG\nMULT AREG, '=4'\nEND",
    ));
    assert!(asm.ctx.literals.literals().all(|(_, lit)| lit.address.is_some()));
    // Three flush points had pending literals; the second LTORG had none.
    assert_eq!(asm.ctx.literals.pools(), &[1, 2, 4]);
}

#[test]
fn counter_is_monotonic_between_origins() {
    let asm = run("START 10\nA DS 5\nB DC '1'\nREAD A\nC DS 0\nPRINT B\nORIGIN 3\nSTOP\nEND");
    let mut prev: Option<(i64, i64)> = None;
    for a in &asm.lines {
        if a.line.code().starts_with("ORIGIN") {
            prev = None;
            continue;
        }
        for rec in &a.intermediate {
            let Some(lc) = rec.lc else { continue };
            let size = match (rec.class.tag(), rec.operand) {
                ("DL", Operand::Const(n)) if rec.class.code() == 2 => n,
                ("AD", _) if rec.operand == Operand::None => 0,
                _ => 1,
            };
            if let Some((prev_lc, prev_size)) = prev {
                assert_eq!(lc, prev_lc + prev_size, "at `{}`", a.line.raw());
            }
            prev = Some((lc, size));
        }
    }
}

#[test]
fn forward_reference_keeps_its_index() {
    let asm = run("START 0\nBC ANY, LATER\nSTOP\nLATER: PRINT LATER\nEND");
    assert_eq!(asm.lines[1].intermediate[0].operand, Operand::Symbol(1));
    assert_eq!(asm.lines[3].intermediate[0].operand, Operand::Symbol(1));
    assert_eq!(asm.rows()[1].2, "0 07 06 002");
}

#[test]
fn macros_feed_the_assembler() {
    let src = "\
MACRO
INCR &V, &BY
MOVER AREG, &V
ADD AREG, &BY
MOVEM AREG, &V
MEND
START 0
INCR N, '=1'
STOP
N DS 1
END";
    let exp = macros::expand(&from_source("m.asm", src));
    assert!(exp.msgs.is_empty());
    let asm = assemble(&exp.lines);
    assert!(!asm.has_error());
    assert_eq!(
        asm.machine_code(),
        vec![
            "01 - 000",
            "0 04 01 004",
            "1 01 01 005",
            "2 05 01 004",
            "3 00 - -",
            "4 02 - 001",
            "5 02 - 001",
        ]
    );
}

#[test]
fn malformed_origin_is_reported_and_skipped() {
    let asm = run("START 100\nA DS 1\nORIGIN A + 1 + 2\nSTOP\nB DC '=4'\nEND");
    assert!(asm.has_error());
    assert!(asm
        .msgs
        .iter()
        .any(|m| m.text == Error::MalformedExpression("A + 1 + 2".into()).to_string()));
    let rows = asm.rows();
    assert_eq!(rows[2], ("ORIGIN A + 1 + 2".into(), "".into(), "".into()));
    assert_eq!(rows[3].2, "101 00 - -");
    assert_eq!(rows[4].2, "102 01 - 103");
}

#[test]
fn address_overflow_is_a_diagnostic() {
    let asm = run("START 9223372036854775807\nA DS 1\nEND");
    assert!(asm.has_error());
    assert_eq!(asm.rows()[1].1, "");

    let asm = run("START 0\nORIGIN 9223372036854775807 + 1\nSTOP\nEND");
    assert!(asm.has_error());
    assert_eq!(asm.rows()[2].2, "0 00 - -");
}
