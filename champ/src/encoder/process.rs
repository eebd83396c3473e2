//! Encoder subprocess channel
//!
//! Request/response over pipes: write the request to stdin, half-close it,
//! then collect everything the encoder printed on stdout. Stdout is drained
//! by a background task from the moment the process starts so a chatty
//! encoder never blocks on a full pipe.

use log::{debug, warn};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};
use tokio::process::{Child, ChildStdin, Command};
use tokio::task::JoinHandle;

use crate::domain::EncoderError;

pub struct EncoderProcess {
    command: String,
    child: Child,
    stdin: BufWriter<ChildStdin>,
    output: JoinHandle<std::io::Result<Vec<u8>>>,
    timeout: Duration,
}

impl EncoderProcess {
    /// Start `command` with `args`
    ///
    /// # Errors
    /// `SpawnFailed` if the process cannot be started.
    pub fn spawn(command: &str, args: &[String], timeout: Duration) -> Result<Self, EncoderError> {
        let spawn_failed =
            |source| EncoderError::SpawnFailed { command: command.to_string(), source };

        let mut child = Command::new(command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(spawn_failed)?;

        let missing = || spawn_failed(std::io::Error::other("stdio pipe not captured"));
        let stdin = child.stdin.take().ok_or_else(missing)?;
        let mut stdout = child.stdout.take().ok_or_else(missing)?;

        let output = tokio::spawn(async move {
            let mut buf = Vec::new();
            stdout.read_to_end(&mut buf).await?;
            Ok(buf)
        });

        debug!("encoder started: {command} {}", args.join(" "));
        Ok(Self {
            command: command.to_string(),
            child,
            stdin: BufWriter::new(stdin),
            output,
            timeout,
        })
    }

    /// Request stream of the encoder
    pub fn input(&mut self) -> &mut BufWriter<ChildStdin> {
        &mut self.stdin
    }

    /// Half-close stdin and wait for the encoded output
    ///
    /// # Errors
    /// `WriteFailed` if flushing the request fails, `Timeout` if the encoder
    /// does not finish in time (it is killed), `ExitStatus` on a non-zero exit.
    pub async fn finish(mut self) -> Result<Vec<u8>, EncoderError> {
        self.stdin.flush().await.map_err(EncoderError::WriteFailed)?;
        self.stdin.shutdown().await.map_err(EncoderError::WriteFailed)?;
        drop(self.stdin);

        let child = &mut self.child;
        let output = &mut self.output;
        let finished = tokio::time::timeout(self.timeout, async {
            let bytes = output.await.map_err(std::io::Error::other)??;
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((bytes, status))
        })
        .await;

        match finished {
            Ok(Ok((bytes, status))) if status.success() => {
                debug!("{} produced {} bytes", self.command, bytes.len());
                Ok(bytes)
            }
            Ok(Ok((_, status))) => Err(EncoderError::ExitStatus(status)),
            Ok(Err(e)) => Err(EncoderError::Io(e)),
            Err(_) => {
                warn!("{} timed out after {:?}, killing it", self.command, self.timeout);
                self.output.abort();
                if let Err(e) = self.child.kill().await {
                    debug!("kill failed: {e}");
                }
                Err(EncoderError::Timeout(self.timeout))
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip_through_cat() {
        let mut encoder = EncoderProcess::spawn("cat", &[], Duration::from_secs(5)).unwrap();
        encoder.input().write_all(b"f\n00\n").await.unwrap();
        assert_eq!(encoder.finish().await.unwrap(), b"f\n00\n");
    }

    #[tokio::test]
    async fn test_missing_command() {
        let result = EncoderProcess::spawn("./no-such-encoder", &[], Duration::from_secs(1));
        assert!(matches!(result, Err(EncoderError::SpawnFailed { .. })));
    }

    #[tokio::test]
    async fn test_non_zero_exit() {
        let encoder = EncoderProcess::spawn("false", &[], Duration::from_secs(5)).unwrap();
        assert!(matches!(encoder.finish().await, Err(EncoderError::ExitStatus(_))));
    }

    #[tokio::test]
    async fn test_timeout_kills_encoder() {
        let args = vec!["5".to_string()];
        let encoder = EncoderProcess::spawn("sleep", &args, Duration::from_millis(100)).unwrap();
        assert!(matches!(encoder.finish().await, Err(EncoderError::Timeout(_))));
    }
}
