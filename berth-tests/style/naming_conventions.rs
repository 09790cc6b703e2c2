//! Naming Convention Checker
//!
//! Enforces the critical naming conventions: banned prefixes and suffixes.

use std::fs;
use std::path::{Path, PathBuf};

/// A naming violation found in the code
#[derive(Debug)]
struct NamingViolation {
    file_path: String,
    line_number: usize,
    message: String,
}

/// Simple naming convention checker focused on critical violations
struct NamingChecker {
    violations: Vec<NamingViolation>,
    files_checked: usize,
}

impl NamingChecker {
    fn new() -> Self {
        Self {
            violations: Vec::new(),
            files_checked: 0,
        }
    }

    /// Find all Rust files in the workspace crates
    fn find_rust_files(&self) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
        let mut files = Vec::new();
        Self::find_rust_files_recursive(Path::new(".."), &mut files, 0)?;
        Ok(files)
    }

    fn find_rust_files_recursive(
        dir: &Path,
        files: &mut Vec<PathBuf>,
        depth: usize,
    ) -> Result<(), Box<dyn std::error::Error>> {
        // Safety limits
        if depth > 8 || files.len() > 200 {
            return Ok(());
        }

        // Skip build artifacts and hidden directories
        if let Some(name) = dir.file_name() {
            let name_str = name.to_string_lossy();
            if name_str == "target" || name_str.starts_with('.') {
                return Ok(());
            }
        }

        // Only descend into the workspace's own crates
        let dir_str = dir.to_string_lossy();
        if !dir_str.contains("berth") && depth > 1 {
            return Ok(());
        }

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.is_dir() {
                Self::find_rust_files_recursive(&path, files, depth + 1)?;
            } else if let Some(extension) = path.extension()
                && extension == "rs"
            {
                files.push(path);
            }
        }

        Ok(())
    }

    /// Check for banned function prefixes
    fn check_function_prefixes(&mut self, file_path: &Path, content: &str) {
        let banned_patterns = [
            ("get_", "Use the noun directly: entry.name() not entry.get_name()"),
            (
                "set_",
                "Use descriptive verbs: account.update_role() not account.set_role()",
            ),
            (
                "handle_",
                "Be specific: process_upload() not handle_upload()",
            ),
        ];

        for (line_num, line) in content.lines().enumerate() {
            let trimmed = line.trim();

            if trimmed.starts_with("//") || trimmed.starts_with("/*") {
                continue;
            }

            if trimmed.starts_with("pub fn ")
                || trimmed.starts_with("pub async fn ")
                || trimmed.starts_with("fn ")
                || trimmed.starts_with("async fn ")
            {
                for &(prefix, correction) in &banned_patterns {
                    if trimmed.contains(&format!("fn {prefix}")) {
                        self.violations.push(NamingViolation {
                            file_path: file_path.display().to_string(),
                            line_number: line_num + 1,
                            message: format!(
                                "Function uses banned prefix '{prefix}'. {correction}"
                            ),
                        });
                    }
                }
            }
        }
    }

    /// Check for banned type suffixes and verbose naming
    fn check_type_naming(&mut self, file_path: &Path, content: &str) {
        let banned_suffixes = [
            ("Factory", "Use Builder pattern or simple new() function"),
            (
                "Manager",
                "For structs, name what it IS, not its role",
            ),
            ("Handler", "Be more specific about what you're handling"),
        ];

        for (line_num, line) in content.lines().enumerate() {
            let trimmed = line.trim();

            if trimmed.starts_with("pub struct ")
                || trimmed.starts_with("struct ")
                || trimmed.starts_with("pub enum ")
                || trimmed.starts_with("enum ")
            {
                let words: Vec<&str> = trimmed.split_whitespace().collect();
                let name_index = if words.first() == Some(&"pub") { 2 } else { 1 };
                let Some(name_part) = words.get(name_index) else {
                    continue;
                };
                let type_name = name_part
                    .split('<')
                    .next()
                    .unwrap_or("")
                    .split('{')
                    .next()
                    .unwrap_or("")
                    .trim();

                for &(suffix, message) in &banned_suffixes {
                    if type_name.ends_with(suffix) {
                        self.violations.push(NamingViolation {
                            file_path: file_path.display().to_string(),
                            line_number: line_num + 1,
                            message: format!(
                                "Type '{type_name}' uses banned '{suffix}' suffix. {message}"
                            ),
                        });
                    }
                }
            }
        }
    }

    /// Check for banned module names
    fn check_module_names(&mut self, file_path: &Path) {
        if let Some(file_name) = file_path.file_name() {
            let name = file_name.to_string_lossy();
            let banned_names = [
                ("utils", "Use specific names like 'bencode' or 'metainfo'"),
                ("common", "Use specific names like 'types' or 'constants'"),
                (
                    "helpers",
                    "Use specific names like 'validation' or 'conversion'",
                ),
                ("misc", "Use specific names describing the module's purpose"),
            ];

            for &(pattern, message) in &banned_names {
                if name == format!("{pattern}.rs") {
                    self.violations.push(NamingViolation {
                        file_path: file_path.display().to_string(),
                        line_number: 1,
                        message: format!("Module name '{pattern}' is too generic. {message}"),
                    });
                }
            }
        }
    }

    fn check_all(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        for file in self.find_rust_files()? {
            let content = fs::read_to_string(&file)?;
            self.check_function_prefixes(&file, &content);
            self.check_type_naming(&file, &content);
            self.check_module_names(&file);
            self.files_checked += 1;
        }
        Ok(())
    }
}

#[test]
fn naming_conventions_hold_across_the_workspace() {
    let mut checker = NamingChecker::new();
    checker.check_all().expect("workspace scan failed");

    assert!(
        checker.files_checked > 0,
        "no Rust files found - scan path is wrong"
    );

    if !checker.violations.is_empty() {
        let mut report = String::new();
        for violation in &checker.violations {
            report.push_str(&format!(
                "{}:{} - {}\n",
                violation.file_path, violation.line_number, violation.message
            ));
        }
        panic!(
            "Found {} naming violations:\n{report}",
            checker.violations.len()
        );
    }
}
