use std::env;
use std::path::{Path, PathBuf};
use std::process;

use xunitargs::test_runner::GoldenRunner;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 || args.len() > 4 {
        eprintln!("Usage: {} <binary_path> <test_directory> [filter]", args[0]);
        process::exit(1);
    }

    let binary_path = Path::new(&args[1]);
    let test_dir = Path::new(&args[2]);
    let filter = args.get(3).map(String::as_str);

    if !binary_path.exists() {
        eprintln!("Binary not found: {}", binary_path.display());
        process::exit(1);
    }

    if !test_dir.exists() {
        eprintln!("Test directory not found: {}", test_dir.display());
        process::exit(1);
    }

    println!("Running tests with binary: {}", binary_path.display());
    println!("Test directory: {}", test_dir.display());
    println!();

    let runner = GoldenRunner::new(PathBuf::from(binary_path));

    match runner.run_all(test_dir, filter) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Test run failed: {}", e);
            process::exit(1);
        }
    }
}
