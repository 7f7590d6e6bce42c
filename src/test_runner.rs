use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed test case: {0}")]
    MalformedCase(String),
    #[error("Execution error: {0}")]
    Execution(String),
}

/// One golden test case: an argument line and the output it must produce.
#[derive(Debug, Clone)]
pub struct GoldenCase {
    pub name: String,
    pub input_file: PathBuf,
    pub expected_file: PathBuf,
    pub arguments: Vec<String>,
}

/// Expected outcome parsed from the `-out.txt` file. A first line of
/// `! message` marks a case that must fail with that message on stderr.
#[derive(Debug, Clone)]
pub enum Expectation {
    Stdout(Vec<u8>),
    Failure(String),
}

#[derive(Debug)]
pub struct CaseResult {
    pub case: GoldenCase,
    pub passed: bool,
    pub error: Option<String>,
    pub execution_time: Duration,
    pub differences: Vec<ByteDifference>,
}

#[derive(Debug)]
pub struct ByteDifference {
    pub position: usize,
    pub expected: u8,
    pub actual: u8,
    pub context: String,
}

pub struct GoldenRunner {
    pub executable: PathBuf,
}

impl GoldenRunner {
    pub fn new(executable: PathBuf) -> Self {
        Self { executable }
    }

    pub fn find_cases<P: AsRef<Path>>(
        &self,
        case_dir: P,
        filter: Option<&str>,
    ) -> Result<Vec<GoldenCase>, HarnessError> {
        let mut cases = Vec::new();
        self.find_cases_recursive(case_dir.as_ref(), case_dir.as_ref(), &mut cases, filter)?;
        cases.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(cases)
    }

    fn find_cases_recursive(
        &self,
        root: &Path,
        dir: &Path,
        cases: &mut Vec<GoldenCase>,
        filter: Option<&str>,
    ) -> Result<(), HarnessError> {
        if !dir.is_dir() {
            return Ok(());
        }

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.is_dir() {
                self.find_cases_recursive(root, &path, cases, filter)?;
            } else if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
                if !file_name.ends_with("-in.txt") {
                    continue;
                }

                if let Some(filter_str) = filter {
                    if !file_name.contains(filter_str)
                        && !path.to_string_lossy().contains(filter_str)
                    {
                        continue;
                    }
                }

                let expected_file = path.with_file_name(file_name.replace("-in.txt", "-out.txt"));
                if !expected_file.exists() {
                    return Err(HarnessError::MalformedCase(format!(
                        "no matching -out.txt for {}",
                        path.display()
                    )));
                }

                let arguments = parse_argument_line(&path)?;

                cases.push(GoldenCase {
                    name: case_name(root, &path),
                    input_file: path,
                    expected_file,
                    arguments,
                });
            }
        }

        Ok(())
    }

    pub fn run_case(&self, case: &GoldenCase) -> CaseResult {
        let start_time = Instant::now();

        let expectation = match read_expectation(&case.expected_file) {
            Ok(expectation) => expectation,
            Err(e) => {
                return CaseResult {
                    case: case.clone(),
                    passed: false,
                    error: Some(e.to_string()),
                    execution_time: start_time.elapsed(),
                    differences: Vec::new(),
                }
            }
        };

        let output = match Command::new(&self.executable).args(&case.arguments).output() {
            Ok(output) => output,
            Err(e) => {
                return CaseResult {
                    case: case.clone(),
                    passed: false,
                    error: Some(format!("failed to execute binary: {}", e)),
                    execution_time: start_time.elapsed(),
                    differences: Vec::new(),
                }
            }
        };

        match expectation {
            Expectation::Stdout(expected) => {
                if !output.status.success() {
                    return CaseResult {
                        case: case.clone(),
                        passed: false,
                        error: Some(format!(
                            "exited with {:?}: {}",
                            output.status.code(),
                            String::from_utf8_lossy(&output.stderr)
                        )),
                        execution_time: start_time.elapsed(),
                        differences: Vec::new(),
                    };
                }

                let differences = compare_bytes(&expected, &output.stdout);
                CaseResult {
                    case: case.clone(),
                    passed: differences.is_empty(),
                    error: None,
                    execution_time: start_time.elapsed(),
                    differences,
                }
            }
            Expectation::Failure(expected_message) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let actual_message = stderr.trim();

                if output.status.success() {
                    CaseResult {
                        case: case.clone(),
                        passed: false,
                        error: Some("expected a failure but the command succeeded".to_string()),
                        execution_time: start_time.elapsed(),
                        differences: Vec::new(),
                    }
                } else if actual_message != expected_message {
                    CaseResult {
                        case: case.clone(),
                        passed: false,
                        error: Some(format!(
                            "expected error {:?}, got {:?}",
                            expected_message, actual_message
                        )),
                        execution_time: start_time.elapsed(),
                        differences: Vec::new(),
                    }
                } else {
                    CaseResult {
                        case: case.clone(),
                        passed: true,
                        error: None,
                        execution_time: start_time.elapsed(),
                        differences: Vec::new(),
                    }
                }
            }
        }
    }

    pub fn print_case_result(&self, result: &CaseResult) {
        if result.passed {
            println!("✓ {} ({:?})", result.case.name, result.execution_time);
        } else {
            println!("✗ {} ({:?})", result.case.name, result.execution_time);

            if let Some(ref error) = result.error {
                println!("  Error: {}", error);
            }

            if !result.differences.is_empty() {
                println!("  Differences found:");
                for (i, diff) in result.differences.iter().take(5).enumerate() {
                    println!(
                        "    [{}] Position {}: expected 0x{:02X} ('{}'), got 0x{:02X} ('{}')",
                        i + 1,
                        diff.position,
                        diff.expected,
                        if diff.expected.is_ascii_graphic() { diff.expected as char } else { '.' },
                        diff.actual,
                        if diff.actual.is_ascii_graphic() { diff.actual as char } else { '.' }
                    );
                    println!("        Context: {}", diff.context);
                }

                if result.differences.len() > 5 {
                    println!("    ... and {} more differences", result.differences.len() - 5);
                }
            }
        }
    }

    pub fn run_all<P: AsRef<Path>>(
        &self,
        case_dir: P,
        filter: Option<&str>,
    ) -> Result<bool, HarnessError> {
        let cases = self.find_cases(case_dir, filter)?;

        if cases.is_empty() {
            println!("No test cases found");
            return Ok(true);
        }

        println!("Running {} test case(s)...\n", cases.len());

        let mut passed = 0;
        let mut failed = 0;

        for case in &cases {
            let result = self.run_case(case);
            self.print_case_result(&result);

            if result.passed {
                passed += 1;
            } else {
                failed += 1;
            }
        }

        println!("\n{} passed, {} failed", passed, failed);
        Ok(failed == 0)
    }
}

/// First line of the in-file that is neither blank nor a `#` comment,
/// split on whitespace.
fn parse_argument_line(input_file: &Path) -> Result<Vec<String>, HarnessError> {
    let content = fs::read_to_string(input_file)?;

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        return Ok(trimmed.split_whitespace().map(str::to_string).collect());
    }

    Err(HarnessError::MalformedCase(format!(
        "no argument line in {}",
        input_file.display()
    )))
}

fn read_expectation(expected_file: &Path) -> Result<Expectation, HarnessError> {
    let content = fs::read(expected_file)?;

    if let Some(rest) = content.strip_prefix(b"! ") {
        let text = String::from_utf8_lossy(rest);
        let message = text.lines().next().unwrap_or("").to_string();
        return Ok(Expectation::Failure(message));
    }

    Ok(Expectation::Stdout(content))
}

fn case_name(root: &Path, input_file: &Path) -> String {
    let relative = input_file.strip_prefix(root).unwrap_or(input_file);

    relative
        .to_string_lossy()
        .replace('/', "::")
        .replace("-in.txt", "")
}

fn compare_bytes(expected: &[u8], actual: &[u8]) -> Vec<ByteDifference> {
    let mut differences = Vec::new();
    let max_len = expected.len().max(actual.len());

    for i in 0..max_len {
        let expected_byte = expected.get(i).copied().unwrap_or(0);
        let actual_byte = actual.get(i).copied().unwrap_or(0);

        if expected_byte != actual_byte {
            differences.push(ByteDifference {
                position: i,
                expected: expected_byte,
                actual: actual_byte,
                context: context_string(expected, actual, i),
            });
        }
    }

    differences
}

fn context_string(expected: &[u8], actual: &[u8], position: usize) -> String {
    let context_size = 20;
    let start = position.saturating_sub(context_size);

    let expected_end = (position + context_size).min(expected.len());
    let actual_end = (position + context_size).min(actual.len());

    let expected_context = if start < expected.len() {
        String::from_utf8_lossy(&expected[start..expected_end])
    } else {
        "".into()
    };

    let actual_context = if start < actual.len() {
        String::from_utf8_lossy(&actual[start..actual_end])
    } else {
        "".into()
    };

    format!("Expected: {:?} | Actual: {:?}", expected_context, actual_context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_case(dir: &Path, name: &str, args: &str, expected: &str) {
        fs::write(dir.join(format!("{name}-in.txt")), args).unwrap();
        fs::write(dir.join(format!("{name}-out.txt")), expected).unwrap();
    }

    #[test]
    fn discovers_cases_sorted_by_name() {
        let dir = tempfile::tempdir().unwrap();
        write_case(dir.path(), "b-parallel", "My.csproj --parallel all", "-parallel all\n");
        write_case(dir.path(), "a-empty", "My.csproj", "");

        let runner = GoldenRunner::new(PathBuf::from("xunitargs"));
        let cases = runner.find_cases(dir.path(), None).unwrap();

        let names: Vec<&str> = cases.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a-empty", "b-parallel"]);
        assert_eq!(cases[1].arguments, vec!["My.csproj", "--parallel", "all"]);
    }

    #[test]
    fn filter_narrows_discovery() {
        let dir = tempfile::tempdir().unwrap();
        write_case(dir.path(), "traits", "My.csproj --trait a=b", "-trait \"a=b\"\n");
        write_case(dir.path(), "reports", "My.csproj --html", "-html\n");

        let runner = GoldenRunner::new(PathBuf::from("xunitargs"));
        let cases = runner.find_cases(dir.path(), Some("traits")).unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].name, "traits");
    }

    #[test]
    fn missing_out_file_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("orphan-in.txt"), "My.csproj").unwrap();

        let runner = GoldenRunner::new(PathBuf::from("xunitargs"));
        let err = runner.find_cases(dir.path(), None).unwrap_err();
        assert!(matches!(err, HarnessError::MalformedCase(_)));
    }

    #[test]
    fn comments_and_blanks_are_skipped_in_argument_lines() {
        let dir = tempfile::tempdir().unwrap();
        write_case(
            dir.path(),
            "commented",
            "# nunit report into /out\n\nMy/Tests.csproj --nunit --output-dir /out\n",
            "",
        );

        let runner = GoldenRunner::new(PathBuf::from("xunitargs"));
        let cases = runner.find_cases(dir.path(), None).unwrap();
        assert_eq!(
            cases[0].arguments,
            vec!["My/Tests.csproj", "--nunit", "--output-dir", "/out"]
        );
    }

    #[test]
    fn failure_expectations_use_the_bang_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("fail-out.txt");
        fs::write(&out, "! something is not supported\n").unwrap();

        match read_expectation(&out).unwrap() {
            Expectation::Failure(message) => assert_eq!(message, "something is not supported"),
            other => panic!("expected a failure expectation, got {:?}", other),
        }
    }

    #[test]
    fn nested_case_names_use_double_colons() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("reports");
        fs::create_dir(&sub).unwrap();
        write_case(&sub, "nunit", "My/T.csproj --nunit --output-dir /out", "");

        let runner = GoldenRunner::new(PathBuf::from("xunitargs"));
        let cases = runner.find_cases(dir.path(), None).unwrap();
        assert_eq!(cases[0].name, "reports::nunit");
    }
}
