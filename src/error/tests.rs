use super::*;

fn line_order(line: usize) -> MzTabError {
    MzTabError::new(logical::LINE_ORDER, line, &[&"MTD", &"PRT"])
}

#[test]
fn test_fill_template() {
    let error = MzTabError::new(format::COUNT_MATCH, 7, &[&3, &5]);
    assert_eq!(error.message, "Line has 3 fields but 5 were expected");
    assert_eq!(
        error.to_string(),
        "[Error-1002] line 7: Line has 3 fields but 5 were expected"
    );
}

#[test]
fn test_fill_keeps_placeholders_in_arguments() {
    let error = MzTabError::new(format::COUNT_MATCH, 2, &[&"{1}", &5]);
    assert_eq!(error.message, "Line has {1} fields but 5 were expected");

    // Missing arguments leave their placeholder in place
    let error = MzTabError::new(format::COUNT_MATCH, 2, &[&3]);
    assert_eq!(error.message, "Line has 3 fields but {1} were expected");
}

#[test]
fn test_record_below_level_is_ignored() {
    let mut list = ErrorList::new(Level::Error, 10);
    let warning = MzTabError::new(format::UNDECLARED_INDEX, 3, &[&"x", &"assay", &4]);
    assert_eq!(list.record(warning), Ok(false));
    assert!(list.is_empty());
}

#[test]
fn test_record_deduplicates_type_and_message() {
    let mut list = ErrorList::new(Level::Info, 10);
    assert_eq!(list.record(line_order(4)), Ok(true));
    // Same type and message on another line is still a duplicate
    assert_eq!(list.record(line_order(9)), Ok(false));
    assert_eq!(list.len(), 1);
}

#[test]
fn test_overflow_on_the_insert_past_capacity() {
    let mut list = ErrorList::new(Level::Info, 3);
    for i in 0..3 {
        let error = MzTabError::new(format::INTEGER, i + 1, &[&"taxid", &format!("x{}", i)]);
        assert_eq!(list.record(error), Ok(true));
    }
    let error = MzTabError::new(format::INTEGER, 4, &[&"taxid", &"x3"]);
    assert_eq!(list.record(error), Err(ErrorListOverflow { capacity: 3 }));
    assert_eq!(list.len(), 3);

    // A duplicate is still a no-op on a full list
    let duplicate = MzTabError::new(format::INTEGER, 9, &[&"taxid", &"x0"]);
    assert_eq!(list.record(duplicate), Ok(false));
}

#[test]
fn test_render_empty_list() {
    let list = ErrorList::default();
    let mut out = Vec::new();
    list.render(&mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "No errors found.\n");
}

#[test]
fn test_render_and_parse_back() {
    let mut list = ErrorList::default();
    list.record(line_order(12)).unwrap();
    list.record(MzTabError::new(format::DOUBLE, 15, &[&"mass_to_charge", &"abc"]))
        .unwrap();
    list.record(MzTabError::new(
        logical::OPTIONAL_COLUMN_SCOPE,
        20,
        &[&"opt_foo[1]_bar", &"foo[1]"],
    ))
    .unwrap();

    let mut out = Vec::new();
    list.render(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    let parsed = ErrorList::parse_rendered(&text, ErrorCatalog::standard());
    let original: Vec<_> = list.iter().cloned().collect();
    assert_eq!(parsed, original);
}

#[test]
fn test_from_rendered_rejects_mismatched_level() {
    let catalog = ErrorCatalog::standard();
    assert!(MzTabError::from_rendered("[Warn-2001] line 3: whatever", catalog).is_none());
    assert!(MzTabError::from_rendered("[Error-9999] line 3: whatever", catalog).is_none());
    assert!(MzTabError::from_rendered("No errors found.", catalog).is_none());
}

#[test]
fn test_catalog_codes_are_unique() {
    let catalog = ErrorCatalog::standard();
    assert_eq!(catalog.len(), super::catalog::ALL.len());
    let codes: Vec<u16> = catalog.types().iter().map(|t| t.code).collect();
    let mut sorted = codes.clone();
    sorted.dedup();
    assert_eq!(codes, sorted);
}

#[test]
fn test_level_ordering_and_parsing() {
    assert!(Level::Info < Level::Warn);
    assert!(Level::Warn < Level::Error);
    assert_eq!("WARNING".parse::<Level>().unwrap(), Level::Warn);
    assert!("fatal".parse::<Level>().is_err());
}
