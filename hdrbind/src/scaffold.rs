//! Placeholder artifacts written before the engine runs.
//!
//! Each artifact carries marker comment pairs the engine searches for on
//! every run; only the text between a pair is regenerated. The marker lines
//! below are matched byte-for-byte, so they must never change.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::paths::HeaderTask;

/// A pair of sentinel lines bracketing engine-owned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerRegion {
    pub open: &'static str,
    pub close: &'static str,
}

pub const GLUE_CODE_REGION: MarkerRegion = MarkerRegion {
    open: "// <litgen_glue_code>  // Autogenerated code below! Do not edit!",
    close: "// </litgen_glue_code> // Autogenerated code end",
};

pub const PYDEF_REGION: MarkerRegion = MarkerRegion {
    open: "// <litgen_pydef>  // Autogenerated code below! Do not edit!",
    close: "// </litgen_pydef> // Autogenerated code end",
};

pub const STUB_REGION: MarkerRegion = MarkerRegion {
    open: "# <litgen_stub> // Autogenerated code below! Do not edit!",
    close: "# </litgen_stub> // Autogenerated code end!",
};

const CPP_BANNER_BEGIN: &str = "// !!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!  AUTOGENERATED CODE !!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!";
const CPP_BANNER_END: &str = "// !!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!  AUTOGENERATED CODE END !!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!";
const PY_BANNER_BEGIN: &str = "# !!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!  AUTOGENERATED CODE !!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!";
const PY_BANNER_END: &str = "# !!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!  AUTOGENERATED CODE END !!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!";

/// Imports every stub needs, written once at the top of the file.
pub const STUB_PREAMBLE: &str = "import enum\nfrom typing import overload\n\n";

/// How an artifact is written when it already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactWriteMode {
    /// Replace prior content.
    Overwrite,
    /// Keep prior content and add to the end.
    Append,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Registration,
    Stub,
}

impl ArtifactKind {
    /// Registration sources are reset on every run; stub fragments
    /// accumulate, so a clean stub has to be deleted before the run.
    pub fn write_mode(self) -> ArtifactWriteMode {
        match self {
            ArtifactKind::Registration => ArtifactWriteMode::Overwrite,
            ArtifactKind::Stub => ArtifactWriteMode::Append,
        }
    }
}

/// Text of the registration source for `task`.
pub fn render_registration(task: &HeaderTask) -> String {
    let mut out = String::new();
    out.push_str(&format!("#include <{}>\n", task.include_path()));
    out.push('\n');
    out.push_str("#include <pybind11/pybind11.h>\n");
    out.push_str("#include <pybind11/stl.h>\n");
    out.push('\n');
    out.push_str("namespace py = pybind11;\n");
    out.push('\n');
    out.push_str(&format!("void {}(py::module &m) {{\n", task.bind_fn()));
    out.push('\n');
    for region in [GLUE_CODE_REGION, PYDEF_REGION] {
        push_region(&mut out, region, CPP_BANNER_BEGIN, CPP_BANNER_END);
        out.push('\n');
    }
    out.push_str("}\n");
    out
}

fn push_region(out: &mut String, region: MarkerRegion, begin: &str, end: &str) {
    for line in [begin, region.open, region.close, end] {
        out.push_str(line);
        out.push('\n');
    }
}

/// One marker-bracketed stub region, without the preamble.
pub fn render_stub() -> String {
    let mut out = String::new();
    for line in [PY_BANNER_BEGIN, STUB_REGION.open, PY_BANNER_END, STUB_REGION.close] {
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Create the parent directories of both artifacts, then write the
/// registration source (overwrite) and add a region to the stub (append).
pub fn scaffold(task: &HeaderTask) -> Result<()> {
    ensure_parent(&task.registration)?;
    ensure_parent(&task.stub)?;

    write_artifact(
        &task.registration,
        &render_registration(task),
        ArtifactKind::Registration.write_mode(),
    )?;

    let mut stub = String::new();
    if is_missing_or_empty(&task.stub) {
        stub.push_str(STUB_PREAMBLE);
    }
    stub.push_str(&render_stub());
    write_artifact(&task.stub, &stub, ArtifactKind::Stub.write_mode())?;

    debug!(
        registration = %task.registration.display(),
        stub = %task.stub.display(),
        "scaffolded artifacts"
    );
    Ok(())
}

/// Write `contents` to `path` according to `mode`. Parent directories must
/// already exist.
pub fn write_artifact(path: &Path, contents: &str, mode: ArtifactWriteMode) -> Result<()> {
    match mode {
        ArtifactWriteMode::Overwrite => {
            fs::write(path, contents).map_err(|e| Error::io(path, e))
        }
        ArtifactWriteMode::Append => {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| Error::io(path, e))?;
            file.write_all(contents.as_bytes())
                .map_err(|e| Error::io(path, e))
        }
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))
        }
        _ => Ok(()),
    }
}

fn is_missing_or_empty(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true)
}
