//! Property-based tests for reply validation

use agentflow::response::{excerpt, RequestOutcome, ResponseValidator};
use agentflow::{ErrorKind, Field, RequestMode};
use proptest::prelude::*;
use serde_json::json;

/// Any structured reply yields exactly the values it carries.
#[test]
fn test_structured_reply_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(".{0,60}", ".{0,60}", ".{0,60}"),
            |(listing, caption, subject)| {
                let content =
                    json!({ "listing": listing, "caption": caption, "subject": subject })
                        .to_string();
                let raw = json!({ "content": content });

                match ResponseValidator::validate(&raw, RequestMode::Full) {
                    RequestOutcome::Success(patch) => {
                        prop_assert_eq!(patch.len(), 3);
                        prop_assert_eq!(&patch[&Field::Listing], &listing);
                        prop_assert_eq!(&patch[&Field::Caption], &caption);
                        prop_assert_eq!(&patch[&Field::Subject], &subject);
                    }
                    other => prop_assert!(false, "unexpected outcome {:?}", other),
                }

                match ResponseValidator::validate(&raw, RequestMode::Targeted(Field::Caption)) {
                    RequestOutcome::Success(patch) => {
                        prop_assert_eq!(patch.len(), 1);
                        prop_assert_eq!(&patch[&Field::Caption], &caption);
                    }
                    other => prop_assert!(false, "unexpected outcome {:?}", other),
                }

                Ok(())
            },
        )
        .unwrap();
}

/// A present error member always wins over content.
#[test]
fn test_error_precedence_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(".{1,40}", ".{0,40}"), |(message, content)| {
            let raw = json!({ "error": message, "content": content });
            let outcome = ResponseValidator::validate(&raw, RequestMode::Full);
            prop_assert_eq!(
                outcome,
                RequestOutcome::Failure {
                    kind: ErrorKind::Service,
                    detail: message,
                }
            );
            Ok(())
        })
        .unwrap();
}

/// Excerpts never exceed the limit plus the ellipsis.
#[test]
fn test_excerpt_bound_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&".{0,400}", |text| {
            let cut = excerpt(&text);
            prop_assert!(cut.chars().count() <= 201);
            if text.chars().count() <= 200 {
                prop_assert_eq!(cut, text);
            }
            Ok(())
        })
        .unwrap();
}
