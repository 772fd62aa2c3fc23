//! Config-driven runs: fixture tree under `tests/fixtures/inventor`.

use std::fs;
use std::path::{Path, PathBuf};

use hdrbind::Error;

fn fixture_config() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/inventor/hdrbind.toml")
}

#[test]
fn run_scaffolds_the_actions_directory() {
    let out = tempfile::tempdir().unwrap();
    let summary = hdrbind::run(&fixture_config(), Some(out.path())).unwrap();

    // SoAction.h, SoSearchAction.h, details/SoPickDetail.h; nodes/ is outside the walk.
    assert_eq!(summary.headers, 3);

    let bindings = out.path().join("_pydef_pybind11/Inventor/actions");
    let stubs = out.path().join("_stubs/Inventor/actions");
    for (rel, bind_fn) in [
        ("SoAction", "BindSoAction"),
        ("SoSearchAction", "BindSoSearchAction"),
        ("details/SoPickDetail", "BindSoPickDetail"),
    ] {
        let cpp = fs::read_to_string(bindings.join(format!("{rel}.cpp"))).unwrap();
        assert!(
            cpp.starts_with(&format!("#include <Inventor/actions/{rel}.h>\n")),
            "{cpp}"
        );
        assert!(cpp.contains(&format!("void {bind_fn}(py::module &m) {{")));
        assert!(stubs.join(format!("{rel}.pyi")).is_file());
    }
    assert!(!bindings.join("SoAction.cpp.cpp").exists());
    assert!(!out.path().join("_pydef_pybind11/Inventor/nodes").exists());
}

#[test]
fn missing_config_is_an_io_error() {
    let err = hdrbind::run(Path::new("/nonexistent/hdrbind.toml"), None).unwrap_err();
    assert!(matches!(err, Error::Io { .. }), "{err}");
}

#[cfg(unix)]
#[test]
fn configured_engine_runs_once_per_header() {
    let tmp = tempfile::tempdir().unwrap();
    let inc = tmp.path().join("include/lib");
    fs::create_dir_all(inc.join("nested")).unwrap();
    fs::write(inc.join("alpha.h"), "").unwrap();
    fs::write(inc.join("nested/beta.h"), "").unwrap();

    // `sh -c SCRIPT engine --source S --stub P HEADER`: $5 is the header.
    let config = tmp.path().join("hdrbind.toml");
    fs::write(
        &config,
        r#"
[paths]
include_base = "include"
include_dir = "lib"
output_dir = "out"

[engine]
program = "sh"
args = ["-c", "cat > /dev/null; echo \"$5\" >> calls.log", "engine"]
"#,
    )
    .unwrap();

    let summary = hdrbind::run(&config, None).unwrap();
    assert_eq!(summary.headers, 2);

    let log = fs::read_to_string(tmp.path().join("calls.log")).unwrap();
    let mut lines: Vec<&str> = log.lines().collect();
    lines.sort();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("alpha.h"), "{log}");
    assert!(lines[1].ends_with("beta.h"), "{log}");
    assert!(tmp.path().join("out/bindings/lib/nested/beta.cpp").is_file());
}

#[cfg(unix)]
#[test]
fn failing_engine_aborts_run() {
    let tmp = tempfile::tempdir().unwrap();
    fs::create_dir_all(tmp.path().join("include/lib")).unwrap();
    fs::write(tmp.path().join("include/lib/alpha.h"), "").unwrap();
    let config = tmp.path().join("hdrbind.toml");
    fs::write(
        &config,
        r#"
[paths]
include_base = "include"
include_dir = "lib"
output_dir = "out"

[engine]
program = "sh"
args = ["-c", "echo parse failure >&2; exit 1"]
"#,
    )
    .unwrap();

    let err = hdrbind::run(&config, None).unwrap_err();
    assert!(matches!(err, Error::Engine(_)), "{err}");
    assert!(err.to_string().contains("parse failure"), "{err}");
}

#[cfg(unix)]
#[test]
fn scaffold_only_skips_the_configured_engine() {
    let tmp = tempfile::tempdir().unwrap();
    fs::create_dir_all(tmp.path().join("include/lib")).unwrap();
    fs::write(tmp.path().join("include/lib/alpha.h"), "").unwrap();
    let config = tmp.path().join("hdrbind.toml");
    fs::write(
        &config,
        r#"
[paths]
include_base = "include"
include_dir = "lib"
output_dir = "out"

[engine]
program = "sh"
args = ["-c", "exit 1"]
"#,
    )
    .unwrap();

    assert!(matches!(hdrbind::run(&config, None), Err(Error::Engine(_))));

    let summary = hdrbind::run_scaffold_only(&config, None).unwrap();
    assert_eq!(summary.headers, 1);
    let cpp = fs::read_to_string(tmp.path().join("out/bindings/lib/alpha.cpp")).unwrap();
    assert!(cpp.contains("void BindAlpha(py::module &m) {"), "{cpp}");
    assert!(tmp.path().join("out/stubs/lib/alpha.pyi").is_file());
}
