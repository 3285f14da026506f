use std::str::FromStr;

use super::*;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// -----------------------------------------------------------------------
// normalize_text
// -----------------------------------------------------------------------

#[test]
fn normalize_text_strips_markup_artifacts() {
    assert_eq!(
        normalize_text("  Сыр\u{a0}«Российский»\t\n"),
        "СырРоссийский"
    );
    assert_eq!(normalize_text("Молоко&nbsp 3,2%"), "Молоко 3,2%");
    assert_eq!(normalize_text(r#"Сок "Добрый" \ 1 л"#), "Сок Добрый 1 л");
}

#[test]
fn normalize_text_replaces_semicolons() {
    assert_eq!(normalize_text("соль; перец;сахар"), "соль, перец,сахар");
}

#[test]
fn normalize_text_collapses_space_runs() {
    assert_eq!(normalize_text("a     b  c"), "a b c");
}

#[test]
fn normalize_text_removes_artifacts_revealed_by_removal() {
    // Deleting the tab joins "&nb" and "sp" into a new artifact.
    assert_eq!(normalize_text("x&nb\tsp y"), "x y");
}

#[test]
fn normalize_text_output_has_no_denylisted_substrings() {
    let inputs = [
        "“Кофе” ; зерно\r\n",
        "\\\\\"\"«»",
        "плюс\u{c2}\u{a0}минус",
        "",
    ];
    for input in inputs {
        let out = normalize_text(input);
        for artifact in TEXT_DENYLIST {
            assert!(!out.contains(artifact), "{input:?} -> {out:?} kept {artifact:?}");
        }
        assert!(!out.contains("  "), "{input:?} -> {out:?} has a double space");
        assert!(!out.contains(';'));
    }
}

// -----------------------------------------------------------------------
// normalize_number
// -----------------------------------------------------------------------

#[test]
fn normalize_number_keeps_integers() {
    let n = normalize_number("100").unwrap();
    assert_eq!(n, dec("100"));
    assert_eq!(n.scale(), 0);
}

#[test]
fn normalize_number_drops_all_zero_fraction() {
    let n = normalize_number("250,000").unwrap();
    assert_eq!(n, dec("250"));
    assert_eq!(n.scale(), 0);
    assert_eq!(normalize_number("12.").unwrap().scale(), 0);
}

#[test]
fn normalize_number_trims_trailing_zeros_of_small_fraction() {
    assert_eq!(normalize_number("12,50").unwrap().to_string(), "12.5");
    assert_eq!(normalize_number("12.05").unwrap().to_string(), "12.05");
    assert_eq!(normalize_number("0.9").unwrap().to_string(), "0.9");
}

#[test]
fn normalize_number_keeps_leading_fraction_zero() {
    assert_eq!(normalize_number("12,0700").unwrap().to_string(), "12.07");
}

#[test]
fn normalize_number_rounds_long_fraction_to_two_places() {
    assert_eq!(normalize_number("1.23456").unwrap().to_string(), "1.23");
    assert_eq!(normalize_number("0.999").unwrap().to_string(), "1");
    assert_eq!(normalize_number("99.129").unwrap().to_string(), "99.13");
}

#[test]
fn normalize_number_fraction_of_exactly_100_stays_short() {
    // "100" strips to "1", which needs no rounding.
    assert_eq!(normalize_number("5.100").unwrap().to_string(), "5.1");
}

#[test]
fn normalize_number_accepts_negative_values() {
    assert_eq!(normalize_number("-3,50").unwrap().to_string(), "-3.5");
}

#[test]
fn normalize_number_is_idempotent() {
    for raw in ["12,50", "100", "12,0700", "1.23456", "0.999", "7.001", "-2,10"] {
        let once = normalize_number(raw).unwrap();
        let twice = normalize_decimal(once).unwrap();
        assert_eq!(once, twice, "not idempotent for {raw}");
        assert_eq!(once.to_string(), twice.to_string(), "scale drift for {raw}");
    }
}

#[test]
fn normalize_number_rejects_garbage() {
    for raw in ["", "abc", "1.2.3", "12 кг", ".5", "1,5e3"] {
        let result = normalize_number(raw);
        assert!(
            matches!(result, Err(ScraperError::InvalidNumber { ref value }) if value == raw),
            "expected InvalidNumber for {raw:?}, got: {result:?}"
        );
    }
}
