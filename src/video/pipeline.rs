use std::path::{Path, PathBuf};
use std::process::Command;

/// Wrapper around the external analysis pipeline executable. The pipeline
/// does all the actual work (tracking, annotation, re-encoding); this side
/// only hands it the two paths and waits.
pub struct AnalysisPipeline {
    command: PathBuf,
}

impl AnalysisPipeline {
    pub fn new(command: PathBuf) -> Self {
        Self { command }
    }

    /// Runs the pipeline synchronously over one input video. Blocks until the
    /// pipeline exits; a non-zero exit becomes an error carrying its stderr.
    pub fn process_video(&self, input_path: &Path, output_path: &Path) -> anyhow::Result<()> {
        log::debug!(
            "Invoking {} {} {}",
            self.command.display(),
            input_path.display(),
            output_path.display()
        );

        let output = Command::new(&self.command)
            .arg(input_path)
            .arg(output_path)
            .output()
            .map_err(|e| {
                anyhow::anyhow!("Failed to launch {}: {}", self.command.display(), e)
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.trim();
            if detail.is_empty() {
                return Err(anyhow::anyhow!(
                    "Analysis pipeline exited with {}",
                    output.status
                ));
            }
            return Err(anyhow::anyhow!("Analysis pipeline failed: {}", detail));
        }

        Ok(())
    }
}

/// Opens a file with the platform's default handler, e.g. the system video
/// player for the finished output.
pub fn open_with_default_app(path: &Path) -> anyhow::Result<()> {
    #[cfg(target_os = "windows")]
    let result = Command::new("cmd")
        .args(["/C", "start", ""])
        .arg(path)
        .spawn();

    #[cfg(target_os = "macos")]
    let result = Command::new("open").arg(path).spawn();

    #[cfg(all(unix, not(target_os = "macos")))]
    let result = Command::new("xdg-open").arg(path).spawn();

    result.map_err(|e| anyhow::anyhow!("Failed to open {}: {}", path.display(), e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_pipeline_executable_is_an_error() {
        let pipeline = AnalysisPipeline::new(PathBuf::from("definitely-not-a-real-pipeline"));
        let result = pipeline.process_video(Path::new("in.mp4"), Path::new("out.avi"));

        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to launch"));
    }
}
