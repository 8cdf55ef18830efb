use rcpu_asm::scratch::free_count;
use rcpu_asm::{select_free, select_free_many, Architecture};

#[test]
fn picks_lowest_free_register() {
    let arch = Architecture::rcpu();
    assert_eq!(select_free(arch, &["A", "B", "C"]), Some("D"));
    assert_eq!(select_free(arch, &["B", "A", "D"]), Some("C"));
    assert_eq!(select_free(arch, &["B", "D"]), Some("A"));
    assert_eq!(select_free(arch, &["A", "A"]), Some("B"));
    assert_eq!(select_free::<&str>(arch, &[]), Some("A"));
}

#[test]
fn exhaustion_is_none() {
    let arch = Architecture::rcpu();
    assert_eq!(select_free(arch, &["A", "B", "C", "D"]), None);
    assert_eq!(select_free(arch, &["D", "C", "B", "A", "A"]), None);
}

#[test]
fn selection_is_stable() {
    let arch = Architecture::rcpu();
    let used = vec![String::from("B"), String::from("D")];
    let first = select_free(arch, &used);
    for _ in 0..8 {
        assert_eq!(select_free(arch, &used), first);
    }
}

#[test]
fn membership_is_exact_match() {
    // lowercase "a" does not occupy A
    let arch = Architecture::rcpu();
    assert_eq!(select_free(arch, &["a"]), Some("A"));
    assert_eq!(select_free(arch, &["0", "A"]), Some("B"));
}

#[test]
fn many_in_canonical_order() {
    let arch = Architecture::rcpu();
    assert_eq!(select_free_many(arch, &["B"], 2), Some(vec!["A", "C"]));
    assert_eq!(select_free_many(arch, &["A", "C"], 2), Some(vec!["B", "D"]));
    assert_eq!(select_free_many(arch, &["A", "C"], 3), None);
    assert_eq!(select_free_many(arch, &["A", "B", "C", "D"], 0), Some(vec![]));
    assert_eq!(free_count(arch, &["A", "C"]), 2);
}

#[test]
fn custom_table_order_drives_selection() {
    let arch = Architecture {
        registers: ["D", "C", "B", "A"].map(String::from).to_vec(),
        ..Architecture::default()
    };
    assert_eq!(select_free(&arch, &["D"]), Some("C"));
}
