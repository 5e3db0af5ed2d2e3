//! Shared test utilities for slipday.

pub mod fixtures;

/// One row of a table-driven test.
#[derive(Debug, Clone)]
pub struct TestCase<I, E> {
    pub name: &'static str,
    pub input: I,
    pub expected: E,
}

/// Run every case through `test_fn`, reporting all mismatches at once.
pub fn run_table_tests<I, E, F>(cases: Vec<TestCase<I, E>>, test_fn: F) -> Result<(), String>
where
    I: std::fmt::Debug,
    E: std::fmt::Debug + PartialEq,
    F: Fn(I) -> E,
{
    let failures: Vec<String> = cases
        .into_iter()
        .filter_map(|case| {
            let label = format!("{} ({:?})", case.name, case.input);
            let actual = test_fn(case.input);
            (actual != case.expected)
                .then(|| format!("{label}: expected {:?}, got {actual:?}", case.expected))
        })
        .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        Err(failures.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatches_are_all_reported() {
        let cases = vec![
            TestCase {
                name: "ok",
                input: 2,
                expected: 4,
            },
            TestCase {
                name: "off_by_one",
                input: 3,
                expected: 7,
            },
            TestCase {
                name: "also_wrong",
                input: 5,
                expected: 11,
            },
        ];
        let err = run_table_tests(cases, |n: i32| n * 2).unwrap_err();
        assert_eq!(err.lines().count(), 2);
        assert!(err.contains("off_by_one (3): expected 7, got 6"));
        assert!(run_table_tests(vec![], |n: i32| n).is_ok());
    }
}
