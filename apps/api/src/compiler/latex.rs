use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use tempfile::TempDir;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::compiler::PROFILE_PHOTO;

const SOURCE_FILE: &str = "document.tex";
const ARTIFACT_FILE: &str = "document.pdf";
/// Cross-references and page layout settle only on the second run.
const PASSES: u8 = 2;
const DIAGNOSTIC_TAIL_CHARS: usize = 2000;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("workspace I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("no PDF produced after both passes")]
    NoArtifact(Vec<CompilePass>),
}

/// Captured result of one compiler invocation.
#[derive(Debug)]
pub struct CompilePass {
    pub pass: u8,
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CompilePass {
    /// Last characters of the combined output; errors show up at the end of the log.
    fn tail(&self) -> String {
        let combined = format!("{}\n{}", self.stdout, self.stderr);
        let combined = combined.trim();
        let skip = combined.chars().count().saturating_sub(DIAGNOSTIC_TAIL_CHARS);
        combined.chars().skip(skip).collect()
    }
}

/// Runs the configured LaTeX command in a throwaway workspace.
#[derive(Debug, Clone)]
pub struct LatexCompiler {
    command: Vec<String>,
    profile_dir: PathBuf,
    output_dir: PathBuf,
}

impl LatexCompiler {
    /// `command` is the program followed by any leading arguments, e.g. `["pdflatex"]`.
    pub fn new(command: Vec<String>, profile_dir: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            command,
            profile_dir,
            output_dir,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Compiles `source` and copies the PDF to `<output_dir>/<output_name>`.
    ///
    /// Returns `None` on any failure; diagnostics of both passes are logged.
    /// An existing artifact with the same name is overwritten.
    pub async fn compile(&self, source: &str, output_name: &str) -> Option<PathBuf> {
        match self.try_compile(source, output_name).await {
            Ok(path) => {
                info!("Compiled {}", path.display());
                Some(path)
            }
            Err(CompileError::NoArtifact(passes)) => {
                warn!("Compilation of {} produced no PDF", output_name);
                for pass in &passes {
                    warn!(
                        "Pass {} exited with {}; output tail:\n{}",
                        pass.pass,
                        pass.status,
                        pass.tail()
                    );
                }
                None
            }
            Err(e) => {
                warn!("Compilation of {} failed: {}", output_name, e);
                None
            }
        }
    }

    async fn try_compile(&self, source: &str, output_name: &str) -> Result<PathBuf, CompileError> {
        // Removed on drop, whatever the outcome.
        let workspace = TempDir::new()?;
        let work_dir = workspace.path();

        let photo = self.profile_dir.join(PROFILE_PHOTO);
        if tokio::fs::try_exists(&photo).await.unwrap_or(false) {
            tokio::fs::copy(&photo, work_dir.join(PROFILE_PHOTO)).await?;
        }
        tokio::fs::write(work_dir.join(SOURCE_FILE), source).await?;

        let mut passes = Vec::with_capacity(PASSES as usize);
        for pass in 1..=PASSES {
            passes.push(self.run_pass(work_dir, pass).await?);
        }

        let artifact = work_dir.join(ARTIFACT_FILE);
        if !tokio::fs::try_exists(&artifact).await.unwrap_or(false) {
            return Err(CompileError::NoArtifact(passes));
        }

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let destination = self.output_dir.join(output_name);
        tokio::fs::copy(&artifact, &destination).await?;
        Ok(destination)
    }

    async fn run_pass(&self, work_dir: &Path, pass: u8) -> Result<CompilePass, CompileError> {
        let (program, leading_args) = self
            .command
            .split_first()
            .ok_or_else(|| CompileError::Spawn {
                program: String::new(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
            })?;

        let output = Command::new(program)
            .args(leading_args)
            .arg("-interaction=nonstopmode")
            .arg(SOURCE_FILE)
            .current_dir(work_dir)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| CompileError::Spawn {
                program: program.clone(),
                source,
            })?;

        debug!("Pass {} of {} exited with {}", pass, program, output.status);

        Ok(CompilePass {
            pass,
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(all(test, unix))]
pub(crate) mod tests {
    use super::*;

    /// Stand-in for pdflatex: one "pass" line per run, refuses sources containing FAIL-COMPILE.
    pub(crate) const FAKE_LATEX: &str = r#"
grep -q FAIL-COMPILE document.tex && { echo "! Emergency stop."; exit 1; }
[ -f profile_photo.png ] && echo photo >> document.pdf
echo pass >> document.pdf
"#;

    /// Writes the fake compiler script and returns a command that runs it through `sh`.
    pub(crate) fn fake_latex_command(dir: &Path) -> Vec<String> {
        let script = dir.join("fake-latex.sh");
        std::fs::write(&script, FAKE_LATEX).unwrap();
        vec!["sh".to_string(), script.to_string_lossy().into_owned()]
    }

    fn compiler(root: &TempDir) -> LatexCompiler {
        let profile_dir = root.path().join("docs");
        std::fs::create_dir_all(&profile_dir).unwrap();
        LatexCompiler::new(
            fake_latex_command(root.path()),
            profile_dir,
            root.path().join("outputs"),
        )
    }

    #[tokio::test]
    async fn test_compile_runs_two_passes() {
        let root = TempDir::new().unwrap();
        let compiler = compiler(&root);

        let path = compiler
            .compile("\\documentclass{article}", "Resume_Acme.pdf")
            .await
            .unwrap();

        assert_eq!(path, root.path().join("outputs").join("Resume_Acme.pdf"));
        let artifact = std::fs::read_to_string(&path).unwrap();
        assert_eq!(artifact.lines().filter(|l| *l == "pass").count(), 2);
        assert!(!artifact.contains("photo"));
    }

    #[tokio::test]
    async fn test_compile_twice_leaves_one_artifact() {
        let root = TempDir::new().unwrap();
        let compiler = compiler(&root);

        compiler.compile("\\documentclass{article}", "Resume_Acme.pdf").await.unwrap();
        compiler.compile("\\documentclass{article}", "Resume_Acme.pdf").await.unwrap();

        let files: Vec<_> = std::fs::read_dir(root.path().join("outputs"))
            .unwrap()
            .collect();
        assert_eq!(files.len(), 1);
        let artifact = std::fs::read_to_string(root.path().join("outputs/Resume_Acme.pdf")).unwrap();
        assert_eq!(artifact.lines().count(), 2, "second compile overwrites the first");
    }

    #[tokio::test]
    async fn test_failing_source_yields_none_and_no_file() {
        let root = TempDir::new().unwrap();
        let compiler = compiler(&root);

        let result = compiler
            .compile("\\documentclass{article} FAIL-COMPILE", "Broken.pdf")
            .await;

        assert!(result.is_none());
        assert!(!root.path().join("outputs").join("Broken.pdf").exists());
    }

    #[tokio::test]
    async fn test_profile_photo_is_copied_into_workspace() {
        let root = TempDir::new().unwrap();
        let compiler = compiler(&root);
        std::fs::write(root.path().join("docs").join(PROFILE_PHOTO), b"png").unwrap();

        let path = compiler.compile("\\documentclass{article}", "Resume.pdf").await.unwrap();

        assert!(std::fs::read_to_string(path).unwrap().contains("photo"));
    }

    #[tokio::test]
    async fn test_missing_compiler_yields_none() {
        let root = TempDir::new().unwrap();
        let compiler = LatexCompiler::new(
            vec!["definitely-not-a-latex-binary".to_string()],
            root.path().to_path_buf(),
            root.path().join("outputs"),
        );

        assert!(compiler.compile("\\documentclass{article}", "X.pdf").await.is_none());
    }

    #[test]
    fn test_pass_tail_is_bounded() {
        let pass = CompilePass {
            pass: 1,
            status: std::process::Command::new("true").status().unwrap(),
            stdout: "x".repeat(5000),
            stderr: "! Undefined control sequence.".to_string(),
        };
        let tail = pass.tail();
        assert_eq!(tail.chars().count(), DIAGNOSTIC_TAIL_CHARS);
        assert!(tail.ends_with("! Undefined control sequence."));
    }
}
