//! Property tests for the section state machine, the error list and the parser

use mztab::config::ValidatorConfig;
use mztab::error::{format, logical, ErrorList, ErrorType, Level, MzTabError};
use mztab::parser::{Abort, MzTabParser, NoProgress, ParseOutcome};
use mztab::section::{Section, SectionTracker};
use proptest::prelude::*;

fn any_section() -> impl Strategy<Value = Section> {
    prop::sample::select(Section::ALL.to_vec())
}

fn any_error_type() -> impl Strategy<Value = ErrorType> {
    prop::sample::select(vec![
        format::COUNT_MATCH,
        format::DOUBLE,
        format::UNDECLARED_INDEX,
        logical::OPTIONAL_COLUMN_SCOPE,
        logical::DUPLICATE_DEFINITION,
    ])
}

fn any_level() -> impl Strategy<Value = Level> {
    prop::sample::select(vec![Level::Info, Level::Warn, Level::Error])
}

proptest! {
    /// Accepted lines never move backwards, and every data line follows its header
    #[test]
    fn test_accepted_sections_are_ordered(sections in prop::collection::vec(any_section(), 0..40)) {
        let mut tracker = SectionTracker::new();
        let mut mark = Section::Metadata.level();
        let mut headers_seen = Vec::new();

        for (i, section) in sections.iter().copied().enumerate() {
            let before = tracker.highest();
            match tracker.advance(section, i + 1) {
                Ok(()) if section == Section::Comment => {}
                Ok(()) => {
                    prop_assert!(section.level() >= mark);
                    if section.is_header() {
                        prop_assert!(!headers_seen.contains(&section));
                        headers_seen.push(section);
                    }
                    if let Some(table) = section.table() {
                        prop_assert!(headers_seen.contains(&table.header()));
                        mark = table.data().level();
                    } else {
                        mark = section.level();
                    }
                }
                Err(error) => {
                    prop_assert_eq!(error.line, i + 1);
                    prop_assert_eq!(error.level(), Level::Error);
                    prop_assert_eq!(tracker.highest(), before);
                }
            }
        }
    }

    /// A line of a lower section after a higher one is a LineOrder error,
    /// unless it repeats a header that was already seen
    #[test]
    fn test_backwards_line_is_line_order(
        later in any_section().prop_filter("not a comment", |s| *s != Section::Comment),
        earlier in any_section().prop_filter("not a comment", |s| *s != Section::Comment),
    ) {
        prop_assume!(later.level() > earlier.level());

        // Every section up to `later`, so every header below it has been seen
        let mut tracker = SectionTracker::new();
        let prefix = Section::ALL
            .iter()
            .copied()
            .filter(|s| *s != Section::Comment && s.level() <= later.level());
        for (i, section) in prefix.enumerate() {
            prop_assert!(tracker.advance(section, i + 1).is_ok());
        }

        let error = tracker.advance(earlier, 100).unwrap_err();
        prop_assert_eq!(error.line, 100);
        if earlier.is_header() {
            prop_assert_eq!(error.error_type, logical::HEADER_LINE);
        } else {
            prop_assert_eq!(error.error_type, logical::LINE_ORDER);
        }
        prop_assert_eq!(tracker.highest(), later);
    }

    /// Comments are accepted anywhere
    #[test]
    fn test_comments_always_accepted(sections in prop::collection::vec(any_section(), 0..20)) {
        let mut tracker = SectionTracker::new();
        for (i, section) in sections.iter().copied().enumerate() {
            let _ = tracker.advance(section, i + 1);
            prop_assert!(tracker.advance(Section::Comment, i + 1).is_ok());
        }
    }

    /// The error list respects its level, its capacity and never holds duplicates
    #[test]
    fn test_error_list_bounds(
        min_level in any_level(),
        capacity in 0usize..12,
        entries in prop::collection::vec((any_error_type(), 1usize..5, 0u8..4), 0..40),
    ) {
        let mut list = ErrorList::new(min_level, capacity);
        let mut overflowed = false;

        for (error_type, line, variant) in entries {
            let error = MzTabError::new(error_type, line, &[&"column", &variant]);
            let before = list.len();
            match list.record(error) {
                Ok(true) => prop_assert_eq!(list.len(), before + 1),
                Ok(false) => prop_assert_eq!(list.len(), before),
                Err(overflow) => {
                    prop_assert_eq!(overflow.capacity, capacity);
                    prop_assert_eq!(list.len(), capacity);
                    overflowed = true;
                }
            }
        }

        prop_assert!(list.len() <= capacity);
        prop_assert!(list.iter().all(|e| e.level() >= min_level));
        let mut keys: Vec<_> = list.iter().map(|e| (e.error_type.code, e.message.clone())).collect();
        keys.sort();
        keys.dedup();
        prop_assert_eq!(keys.len(), list.len());
        if overflowed {
            prop_assert_eq!(list.len(), capacity);
        }
    }

    /// Arbitrary tab-separated input is always classified, never a read failure
    #[test]
    fn test_parser_never_fails_on_text(
        lines in prop::collection::vec(
            (
                prop::sample::select(vec!["MTD", "COM", "PRH", "PRT", "PSH", "PSM", "SMH", "SML", "XYZ", ""]),
                prop::collection::vec("[a-z_\\[\\]0-9:. -]{0,12}", 0..6),
            ),
            0..30,
        ),
    ) {
        let text: String = lines
            .iter()
            .map(|(prefix, fields)| {
                let mut line = prefix.to_string();
                for field in fields {
                    line.push('\t');
                    line.push_str(field);
                }
                line.push('\n');
                line
            })
            .collect();

        let outcome = MzTabParser::new(ValidatorConfig::default().with_max_errors(50))
            .parse_str(&text, &NoProgress);
        prop_assert!(outcome.is_ok());
        match outcome.unwrap() {
            ParseOutcome::Valid(_) => {}
            ParseOutcome::Invalid { errors } => prop_assert!(!errors.is_empty()),
            ParseOutcome::Aborted { reason, errors } => {
                prop_assert!(errors.len() <= 50);
                if let Abort::Structural(error) = reason {
                    prop_assert!(errors.iter().any(|e| *e == error) || errors.len() == 50);
                }
            }
        }
    }
}
