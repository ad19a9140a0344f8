use crate::descriptor::{OutputSink, ProcessSpec};
use crate::error::Result;
use crate::launch::logfile::LogWriter;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::sync::Mutex;
use tracing::warn;

#[derive(Debug, Clone, Copy)]
enum StreamKind {
    Stdout,
    Stderr,
}

/// Attach the spec's output sinks to a freshly spawned child.
///
/// Fire-and-forget: spawns one background task per captured stream. Each
/// task reads lines until the stream closes, so ordering is preserved
/// within a single stream but not across processes. Dropping the tasks'
/// work on shutdown is harmless since the pipes close with the child.
pub async fn attach_sinks(spec: &ProcessSpec, child: &mut Child, log_dir: &Path) -> Result<()> {
    if spec.output.is_empty() {
        return Ok(());
    }

    let console = spec.output.contains(&OutputSink::Console);

    let writer = if spec.output.contains(&OutputSink::LogFile) {
        Some(Arc::new(Mutex::new(
            LogWriter::new(log_dir, &spec.name).await?,
        )))
    } else {
        None
    };

    if let Some(stdout) = child.stdout.take() {
        spawn_relay(
            spec.name.clone(),
            stdout,
            StreamKind::Stdout,
            console,
            writer.clone(),
        );
    }

    if let Some(stderr) = child.stderr.take() {
        spawn_relay(spec.name.clone(), stderr, StreamKind::Stderr, console, writer);
    }

    Ok(())
}

fn spawn_relay<R>(
    name: String,
    stream: R,
    kind: StreamKind,
    console: bool,
    writer: Option<Arc<Mutex<LogWriter>>>,
) where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let reader = BufReader::new(stream);
        let mut lines = reader.lines();

        while let Ok(Some(line)) = lines.next_line().await {
            if console {
                match kind {
                    StreamKind::Stdout => println!("[{}] {}", name, line),
                    StreamKind::Stderr => eprintln!("[{}] {}", name, line),
                }
            }

            if let Some(ref writer) = writer {
                let mut writer = writer.lock().await;
                let result = match kind {
                    StreamKind::Stdout => writer.write_stdout(&line).await,
                    StreamKind::Stderr => writer.write_stderr(&line).await,
                };
                if let Err(e) = result {
                    warn!(process = %name, "failed to write log line: {}", e);
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launch::spawner::spawn_process;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_log_file_sink_captures_output() {
        let temp_dir = TempDir::new().unwrap();

        let spec = ProcessSpec::new(
            "echo-capture",
            vec![
                "/bin/sh".to_string(),
                "-c".to_string(),
                "echo out-line; echo err-line >&2".to_string(),
            ],
        )
        .with_output(OutputSink::LogFile);

        let mut spawned = spawn_process(&spec).await.unwrap();
        attach_sinks(&spec, &mut spawned.child, temp_dir.path())
            .await
            .unwrap();

        let _ = spawned.child.wait().await;
        // Give the relay tasks a moment to drain the pipes
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;

        let out = tokio::fs::read_to_string(temp_dir.path().join("echo-capture-out.log"))
            .await
            .unwrap();
        assert!(out.contains("out-line"));

        let err = tokio::fs::read_to_string(temp_dir.path().join("echo-capture-err.log"))
            .await
            .unwrap();
        assert!(err.contains("err-line"));
    }

    #[tokio::test]
    async fn test_no_sinks_is_a_noop() {
        let temp_dir = TempDir::new().unwrap();

        let spec = ProcessSpec::new("silent", vec!["/bin/echo".to_string(), "hi".to_string()]);
        let mut spawned = spawn_process(&spec).await.unwrap();

        attach_sinks(&spec, &mut spawned.child, temp_dir.path())
            .await
            .unwrap();

        let _ = spawned.child.wait().await;
        assert!(std::fs::read_dir(temp_dir.path()).unwrap().next().is_none());
    }
}
