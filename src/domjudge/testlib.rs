// src/domjudge/testlib.rs

//! Download and patch testlib.h for DOMjudge.
//!
//! DOMjudge expects validator exit codes 42/43 and a different calling
//! convention for checkers and interactors, so the upstream header is
//! patched before it is shipped inside packages. The patch mirrors
//! github.com/cn-xcpc-tools/testlib-for-domjudge.

use std::path::Path;

use crate::error::{AppError, Result};
use crate::report::Reporter;

const TESTLIB_URL: &str =
    "https://raw.githubusercontent.com/MikeMirzayanov/testlib/master/testlib.h";

const HEADER_COMMENT: &str = "\
// Modified by a script to work with DOMjudge.
// Differences with the standard testlib.h:
// - The values of some exit codes.
// - The functions registerInteraction and registerTestlibCmd.
";

const NEW_EXIT_CODES: [(&str, u32); 5] = [
    ("OK_EXIT_CODE", 42),
    ("WA_EXIT_CODE", 43),
    ("PE_EXIT_CODE", 43),
    ("DIRT_EXIT_CODE", 43),
    ("UNEXPECTED_EOF_EXIT_CODE", 43),
];

const NEW_REGISTER_INTERACTION: &str = r#"void registerInteraction(int argc, char *argv[]) {
    __testlib_ensuresPreconditions();

    testlibMode = _interactor;
    __testlib_set_binary(stdin);

    if (argc > 1 && !strcmp("--help", argv[1]))
        __testlib_help();
    if (argc == 3) {
        resultName = "";
        appesMode = false;
    }

    if (argc == 4) {
        resultName = std::string(argv[3]) + "/judgemessage.txt";
        tout.open(std::string(argv[3]) + "/teammessage.txt",
                  std::ios_base::out);
        if (tout.fail() || !tout.is_open())
            quit(_fail, "Can not write to the test-output-file '" +
                        std::string(argv[2]) + "'");
        appesMode = false;
    }

    inf.init(argv[1], _input);

    ouf.init(stdin, _output);
    if (argc >= 3)
        ans.init(argv[2], _answer);
    else
        ans.name = "unopened answer stream";
}"#;

const NEW_REGISTER_TESTLIB_CMD: &str = r#"void registerTestlibCmd(int argc, char *argv[]) {
    __testlib_ensuresPreconditions();

    testlibMode = _checker;
    __testlib_set_binary(stdin);

    if (argc > 1 && !strcmp("--help", argv[1]))
        __testlib_help();

    appesMode = false;

    if (argc == 3) {
        resultName = "";
        appesMode = false;
    }

    if (argc == 4) {
        resultName = std::string(argv[3]) + "/judgemessage.txt";
        appesMode = false;
    }

    inf.init(argv[1], _input);
    ouf.init(stdin, _output);
    ans.init(argv[2], _answer);
}"#;

fn replace_exit_code(lines: &mut [String], name: &str, value: u32) {
    let re = regex::Regex::new(&format!(r"^(#\s*define\s+{name}\s+)[a-zA-Z0-9]+(\s*)$")).unwrap();
    for line in lines.iter_mut() {
        if let Some(caps) = re.captures(line) {
            *line = format!("{}{}{}", &caps[1], value, &caps[2]);
        }
    }
}

/// Replace a whole function body, matched by its first and last lines.
fn replace_function(lines: Vec<String>, replacement: &str) -> Result<Vec<String>> {
    let begin = replacement.lines().next().unwrap_or_default();
    let end = replacement.lines().last().unwrap_or_default();

    let mut out = Vec::with_capacity(lines.len());
    let mut state = 0u8;
    for line in lines {
        if state == 0 && line == begin {
            state = 1;
        }
        if state != 1 {
            out.push(line);
        } else if line == end {
            state = 2;
            out.push(replacement.to_string());
        }
    }
    if state != 2 {
        return Err(AppError::config(format!(
            "testlib patch failed: function starting with '{begin}' not found"
        )));
    }
    Ok(out)
}

/// Apply the DOMjudge compatibility patch to the upstream testlib.h text.
pub fn patch_testlib(text: &str) -> Result<String> {
    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
    for (name, value) in NEW_EXIT_CODES {
        replace_exit_code(&mut lines, name, value);
    }
    lines = replace_function(lines, NEW_REGISTER_INTERACTION)?;
    lines = replace_function(lines, NEW_REGISTER_TESTLIB_CMD)?;

    let mut patched = HEADER_COMMENT.to_string();
    for line in lines {
        patched.push_str(&line);
        patched.push('\n');
    }
    Ok(patched)
}

/// Download the latest testlib.h, patch it and store it at `dest`.
pub async fn update_testlib(dest: &Path, reporter: &Reporter) -> Result<()> {
    reporter.debug("Downloading testlib.h from github.");
    let text = reqwest::get(TESTLIB_URL)
        .await?
        .error_for_status()?
        .text()
        .await?;

    reporter.debug("Patching testlib.h.");
    let patched = patch_testlib(&text)?;

    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(dest, patched)?;
    reporter.info(&format!(
        "testlib.h downloaded and patched; the local copy is '{}'.",
        dest.display()
    ));
    Ok(())
}
