//! Characterization tests for the recursive merge rule.

#[cfg(test)]
mod tests {
    use crate::merge::merge_values;
    use crate::value::{from_json, to_json};
    use pretty_assertions::assert_eq;

    /// Test case for a merge of two JSON documents.
    struct MergeTestCase {
        name: &'static str,
        lhs: &'static str,
        rhs: &'static str,
        out: &'static str,
    }

    fn run_merge_test_cases(cases: &[MergeTestCase]) {
        for tc in cases {
            let lhs = from_json(tc.lhs)
                .unwrap_or_else(|e| panic!("Failed to parse lhs for {}: {}", tc.name, e));
            let rhs = from_json(tc.rhs)
                .unwrap_or_else(|e| panic!("Failed to parse rhs for {}: {}", tc.name, e));
            let expected = from_json(tc.out)
                .unwrap_or_else(|e| panic!("Failed to parse out for {}: {}", tc.name, e));

            let merged = merge_values(&lhs, &rhs);
            assert_eq!(
                to_json(&merged).unwrap(),
                to_json(&expected).unwrap(),
                "Merge result mismatch for {}",
                tc.name
            );
        }
    }

    #[test]
    fn test_merge_scalar_collisions() {
        run_merge_test_cases(&[
            MergeTestCase {
                name: "scalar vs scalar",
                lhs: r#"{"x": 2}"#,
                rhs: r#"{"x": 1}"#,
                out: r#"{"x": [2, 1]}"#,
            },
            MergeTestCase {
                name: "sequence vs scalar",
                lhs: r#"{"x": [1, 2]}"#,
                rhs: r#"{"x": 3}"#,
                out: r#"{"x": [1, 2, 3]}"#,
            },
            MergeTestCase {
                name: "scalar vs sequence",
                lhs: r#"{"x": 0}"#,
                rhs: r#"{"x": [1, 2]}"#,
                out: r#"{"x": [0, 1, 2]}"#,
            },
            MergeTestCase {
                name: "scalar vs map",
                lhs: r#"{"x": 5}"#,
                rhs: r#"{"x": {"a": 1}}"#,
                out: r#"{"x": {"0": 5, "a": 1}}"#,
            },
            MergeTestCase {
                name: "null collides like any scalar",
                lhs: r#"{"x": null}"#,
                rhs: r#"{"x": "v"}"#,
                out: r#"{"x": [null, "v"]}"#,
            },
        ]);
    }

    #[test]
    fn test_merge_nested_maps() {
        run_merge_test_cases(&[
            MergeTestCase {
                name: "disjoint nested keys",
                lhs: r#"{"a": {"b": 1}}"#,
                rhs: r#"{"a": {"c": 2}, "d": 3}"#,
                out: r#"{"a": {"b": 1, "c": 2}, "d": 3}"#,
            },
            MergeTestCase {
                name: "deep collision",
                lhs: r#"{"a": {"b": {"c": 1}}}"#,
                rhs: r#"{"a": {"b": {"c": 2}}}"#,
                out: r#"{"a": {"b": {"c": [1, 2]}}}"#,
            },
        ]);
    }

    #[test]
    fn test_merge_sequences_append() {
        run_merge_test_cases(&[
            MergeTestCase {
                name: "top level sequences",
                lhs: r#"["a", "b"]"#,
                rhs: r#"["c"]"#,
                out: r#"["a", "b", "c"]"#,
            },
            MergeTestCase {
                name: "nested sequences",
                lhs: r#"{"roles": ["admin"]}"#,
                rhs: r#"{"roles": ["editor"]}"#,
                out: r#"{"roles": ["admin", "editor"]}"#,
            },
            MergeTestCase {
                name: "sparse integer keys are renumbered",
                lhs: r#"{"5": "a", "k": 1}"#,
                rhs: r#"{"9": "b"}"#,
                out: r#"{"0": "a", "k": 1, "1": "b"}"#,
            },
            MergeTestCase {
                name: "largest and negative integer keys are renumbered",
                lhs: r#"{"9223372036854775807": "a"}"#,
                rhs: r#"{"9223372036854775807": "b", "-3": "c"}"#,
                out: r#"["a", "b", "c"]"#,
            },
        ]);
    }

    #[test]
    fn test_merge_sequence_with_map_at_same_key() {
        run_merge_test_cases(&[MergeTestCase {
            name: "sequence vs map",
            lhs: r#"{"x": ["a", "b"]}"#,
            rhs: r#"{"x": {"k": "v"}}"#,
            out: r#"{"x": {"0": "a", "1": "b", "k": "v"}}"#,
        }]);
    }

    #[test]
    fn test_merge_bare_scalar_right() {
        run_merge_test_cases(&[MergeTestCase {
            name: "scalar into map",
            lhs: r#"{"a": 1}"#,
            rhs: r#"7"#,
            out: r#"{"a": 1, "0": 7}"#,
        }]);
    }
}
