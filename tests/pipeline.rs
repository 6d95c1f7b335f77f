use fraigkit::{Aig, AigEdge, NodeId, SimOptions};
use pretty_assertions::assert_eq;
use test_case::test_case;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn load(name: &str) -> Aig {
    init_logger();
    let path = format!("{}/assets/circuits/{}", env!("CARGO_MANIFEST_DIR"), name);
    Aig::from_file(path).unwrap()
}

fn signatures(aig: &Aig, ids: &[NodeId]) -> Vec<String> {
    ids.iter()
        .map(|&id| aig.get_node(id).unwrap().get_signature_str())
        .collect()
}

fn output_signatures(aig: &Aig) -> Vec<String> {
    signatures(aig, aig.get_outputs())
}

fn options(seed: u64) -> SimOptions {
    SimOptions {
        seed,
        pattern_count: Some(64),
    }
}

/// Optimizes, strashes and sweeps `redundant.aag`.
fn cleaned_redundant() -> Aig {
    let mut aig = load("redundant.aag");
    aig.optimize().unwrap();
    aig.strash().unwrap();
    aig.sweep().unwrap();
    aig
}

#[test]
fn load_redundant() {
    let aig = load("redundant.aag");
    assert_eq!(aig.get_inputs(), &[1, 2, 3]);
    assert_eq!(aig.get_outputs(), &[21, 22, 23, 24, 25, 26, 27, 28]);
    assert_eq!(aig.get_ands().len(), 17);
    assert!(aig.get_undefined().is_empty());
    assert_eq!(aig.get_node(28).unwrap().get_name(), Some("a_and_b_or_c_alt"));
    assert_eq!(
        aig.summary(),
        "Circuit Statistics\n\
         ==================\n\
         \x20 PI           3\n\
         \x20 PO           8\n\
         \x20 AIG         17\n\
         ------------------\n\
         \x20 Total       28\n"
    );
}

#[test_case("and2.aag" ; "and2")]
#[test_case("const_out.aag" ; "constant output")]
#[test_case("de_morgan.aag" ; "de morgan")]
#[test_case("redundant.aag" ; "redundant")]
fn round_trip(name: &str) {
    let mut aig = load(name);
    let mut first = Vec::new();
    aig.write_aag(&mut first).unwrap();

    let mut reloaded = Aig::from_ascii(first.as_slice()).unwrap();
    assert_eq!(reloaded, aig);

    let mut second = Vec::new();
    reloaded.write_aag(&mut second).unwrap();
    assert_eq!(String::from_utf8(second).unwrap(), String::from_utf8(first).unwrap());
}

#[test]
fn optimize_is_idempotent() {
    let mut aig = load("redundant.aag");
    assert_eq!(
        aig.optimize().unwrap(),
        vec![(8, AigEdge::new(1, false)), (15, AigEdge::new(0, false))]
    );
    assert_eq!(aig.get_output_fanin(26).unwrap(), AigEdge::new(0, false));
    assert!(aig.check_integrity().is_ok());
    assert!(aig.optimize().unwrap().is_empty());
}

#[test]
fn strash_after_optimize() {
    let mut aig = load("redundant.aag");
    aig.optimize().unwrap();
    assert_eq!(aig.strash().unwrap(), vec![(5, 4), (7, 6), (9, 4)]);
    assert_eq!(aig.get_output_fanin(22).unwrap(), AigEdge::new(6, false));
    assert_eq!(aig.get_output_fanin(23).unwrap(), AigEdge::new(4, false));
    assert!(aig.check_integrity().is_ok());

    assert_eq!(aig.sweep().unwrap(), vec![5, 7, 8, 9, 15]);
    assert!(aig.check_integrity().is_ok());
    assert!(aig.sweep().unwrap().is_empty());
}

#[test]
fn passes_preserve_outputs() {
    let mut reference = load("redundant.aag");
    reference.random_sim(&options(11), None).unwrap();
    let expected = output_signatures(&reference);

    let mut aig = load("redundant.aag");
    aig.optimize().unwrap();
    aig.random_sim(&options(11), None).unwrap();
    assert_eq!(output_signatures(&aig), expected);

    aig.strash().unwrap();
    aig.random_sim(&options(11), None).unwrap();
    assert_eq!(output_signatures(&aig), expected);

    aig.sweep().unwrap();
    aig.random_sim(&options(11), None).unwrap();
    assert_eq!(output_signatures(&aig), expected);
}

#[test]
fn simulation_is_deterministic() {
    let mut aig = load("redundant.aag");
    let ids: Vec<NodeId> = (1..=28).collect();

    aig.random_sim(&SimOptions::default(), None).unwrap();
    let first = signatures(&aig, &ids);
    // Twice the number of inputs
    assert_eq!(first[0].len(), 6);

    aig.random_sim(&SimOptions::default(), None).unwrap();
    assert_eq!(signatures(&aig, &ids), first);
    assert_eq!(aig.report_fec_pairs().unwrap(), {
        let mut again = load("redundant.aag");
        again.random_sim(&SimOptions::default(), None).unwrap();
        again.report_fec_pairs().unwrap()
    });
}

#[test]
fn fraig_is_sound() {
    let mut aig = cleaned_redundant();
    aig.random_sim(&options(1), None).unwrap();
    let report = aig.fraig().unwrap();
    // a & (b | c), written twice
    assert_eq!(report.merges, vec![(20, 17)]);
    assert_eq!(aig.get_output_fanin(28).unwrap(), AigEdge::new(17, false));
    assert!(aig.check_integrity().is_ok());
    assert_eq!(aig.sweep().unwrap(), vec![18, 19, 20]);

    // Another seed than the one the candidates came from
    let mut reference = load("redundant.aag");
    reference.random_sim(&options(99), None).unwrap();
    aig.random_sim(&options(99), None).unwrap();
    assert_eq!(output_signatures(&aig), output_signatures(&reference));
}

#[test]
fn and_gate_simulation() {
    let mut aig = load("and2.aag");
    let options = SimOptions {
        seed: 5,
        pattern_count: Some(8),
    };
    let report = aig.random_sim(&options, None).unwrap();
    assert_eq!(report.patterns, 8);

    let in1 = aig.get_node(1).unwrap().get_signature().clone();
    let in2 = aig.get_node(2).unwrap().get_signature().clone();
    let and: Vec<bool> = in1.iter().zip(in2.iter()).map(|(a, b)| *a && *b).collect();
    let signature: Vec<bool> = aig.get_node(3).unwrap().get_signature().iter().map(|b| *b).collect();
    assert_eq!(signature.len(), 8);
    assert_eq!(signature, and);
    assert_eq!(
        aig.get_node(4).unwrap().get_signature(),
        aig.get_node(3).unwrap().get_signature()
    );
}

#[test]
fn inverted_constant_output() {
    let mut aig = load("const_out.aag");
    assert_eq!(aig.get_output_fanin(2).unwrap(), AigEdge::new(0, true));
    let options = SimOptions {
        seed: 3,
        pattern_count: Some(5),
    };
    aig.random_sim(&options, None).unwrap();
    assert_eq!(aig.get_node(2).unwrap().get_signature_str(), "11111");
    assert_eq!(
        aig.get_node(3).unwrap().get_signature(),
        aig.get_node(1).unwrap().get_signature()
    );
}

#[test]
fn de_morgan_is_merged() {
    let mut aig = load("de_morgan.aag");
    let mut log = Vec::new();
    let report = aig
        .file_sim("00\n01\n10\n11\n".as_bytes(), Some(&mut log))
        .unwrap();
    assert_eq!(report.patterns, 4);
    assert_eq!(
        String::from_utf8(log).unwrap(),
        "00 00\n01 00\n10 00\n11 11\n"
    );
    assert_eq!(aig.report_fec_pairs().unwrap(), "[0] 3 5\n");

    assert_eq!(aig.fraig().unwrap().merges, vec![(5, 3)]);
    assert_eq!(aig.get_output_fanin(7).unwrap(), AigEdge::new(3, false));
    assert_eq!(aig.sweep().unwrap(), vec![4, 5]);
    assert_eq!(aig.report_floating().unwrap(), "");
    assert!(aig.check_integrity().is_ok());
}

#[test]
fn rejected_patterns_are_skipped() {
    let mut aig = load("and2.aag");
    let report = aig
        .file_sim("01\n0\n2x\n11\n".as_bytes(), None)
        .unwrap();
    assert_eq!(report.patterns, 2);
    assert_eq!(
        report.skipped.iter().map(|(line, _)| *line).collect::<Vec<_>>(),
        vec![2, 3]
    );
    assert_eq!(aig.get_node(4).unwrap().get_signature_str(), "01");
}
