use std::io::BufReader;
use std::process::{Child, ChildStdout, Command, ExitStatus, Stdio};

use crate::libs::error::ScaffoldError;

pub const DEFAULT_ALIGNER: &str = "ssaha2";
pub const DEFAULT_IDENTITY: u32 = 99;

/// An ssaha2-compatible aligner writing a cigar report to stdout.
#[derive(Debug, Clone)]
pub struct Aligner {
    pub program: String,
    /// Minimum identity (percent) of reported hits
    pub identity: u32,
}

impl Default for Aligner {
    fn default() -> Self {
        Self {
            program: DEFAULT_ALIGNER.to_string(),
            identity: DEFAULT_IDENTITY,
        }
    }
}

impl Aligner {
    pub fn new(program: &str, identity: u32) -> Self {
        Self {
            program: program.to_string(),
            identity,
        }
    }

    /// ```
    /// let aligner = scafalign::libs::aligner::Aligner::default();
    /// assert_eq!(
    ///     aligner.args("ref.fa", "pieces.fa"),
    ///     vec!["-output", "cigar", "-identity", "99", "ref.fa", "pieces.fa"]
    /// );
    /// ```
    pub fn args(&self, reference: &str, queries: &str) -> Vec<String> {
        vec![
            "-output".to_string(),
            "cigar".to_string(),
            "-identity".to_string(),
            self.identity.to_string(),
            reference.to_string(),
            queries.to_string(),
        ]
    }

    /// Starts the aligner with its stdout piped back to us.
    pub fn spawn(&self, reference: &str, queries: &str) -> Result<AlignerRun, ScaffoldError> {
        let path = which::which(&self.program)
            .map_err(|_| ScaffoldError::AlignerNotFound(self.program.clone()))?;

        let args = self.args(reference, queries);
        tracing::info!("Running {} {}", path.display(), args.join(" "));

        let mut child = Command::new(&path)
            .args(&args)
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|source| ScaffoldError::AlignerLaunch {
                program: self.program.clone(),
                source,
            })?;

        let stdout = match child.stdout.take() {
            Some(stdout) => stdout,
            None => {
                let _ = child.kill();
                return Err(ScaffoldError::AlignerLaunch {
                    program: self.program.clone(),
                    source: std::io::Error::other("stdout was not captured"),
                });
            }
        };

        Ok(AlignerRun {
            program: self.program.clone(),
            child,
            report: Some(BufReader::new(stdout)),
        })
    }
}

/// A running aligner. Read the report with [`AlignerRun::take_report`], then
/// call [`AlignerRun::wait`] to check how it exited.
pub struct AlignerRun {
    program: String,
    child: Child,
    report: Option<BufReader<ChildStdout>>,
}

impl AlignerRun {
    /// The aligner's stdout. Only the first call returns `Some`.
    pub fn take_report(&mut self) -> Option<BufReader<ChildStdout>> {
        self.report.take()
    }

    /// Waits for the aligner to exit; a non-zero status is an error.
    pub fn wait(mut self) -> Result<(), ScaffoldError> {
        drop(self.report.take());
        let status = self.child.wait()?;
        if !status.success() {
            return Err(ScaffoldError::AlignerFailed {
                program: self.program,
                status,
            });
        }
        tracing::debug!("{} finished", self.program);
        Ok(())
    }

    /// Kills the aligner and reaps it, when the report could not be consumed.
    pub fn abort(mut self) -> Result<ExitStatus, ScaffoldError> {
        drop(self.report.take());
        if let Err(e) = self.child.kill() {
            tracing::debug!("{} already exited: {}", self.program, e);
        }
        let status = self.child.wait()?;
        tracing::debug!("{} aborted: {}", self.program, status);
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_identity() {
        let aligner = Aligner::new("/opt/ssaha2/ssaha2", 95);
        assert_eq!(
            aligner.args("genome.fa", "pieces.fa").join(" "),
            "-output cigar -identity 95 genome.fa pieces.fa"
        );
    }

    #[test]
    fn test_missing_program() {
        let aligner = Aligner::new("surely-not-an-installed-aligner", 99);
        let err = aligner.spawn("ref.fa", "pieces.fa").err().unwrap();
        assert!(matches!(err, ScaffoldError::AlignerNotFound(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_report_and_exit_status() {
        use std::io::BufRead;
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = |name: &str, body: &str| {
            let path = dir.path().join(name);
            std::fs::write(&path, body).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path.display().to_string()
        };

        let ok = script("ok.sh", "#!/bin/sh\necho \"$@\"\n");
        let mut run = Aligner::new(&ok, 99).spawn("ref.fa", "q.fa").unwrap();
        let lines: Vec<String> = run
            .take_report()
            .unwrap()
            .lines()
            .map(|l| l.unwrap())
            .collect();
        assert!(run.take_report().is_none());
        run.wait().unwrap();
        assert_eq!(lines, vec!["-output cigar -identity 99 ref.fa q.fa"]);

        let failing = script("fail.sh", "#!/bin/sh\nexit 3\n");
        let run = Aligner::new(&failing, 99).spawn("ref.fa", "q.fa").unwrap();
        let err = run.wait().err().unwrap();
        assert!(matches!(err, ScaffoldError::AlignerFailed { .. }));

        let slow = script("slow.sh", "#!/bin/sh\nexec sleep 60\n");
        let start = std::time::Instant::now();
        let run = Aligner::new(&slow, 99).spawn("ref.fa", "q.fa").unwrap();
        let status = run.abort().unwrap();
        assert!(!status.success());
        assert!(start.elapsed() < std::time::Duration::from_secs(30));
    }
}
