//! Emulator subprocess
//!
//! The emulator runs the program image and prints the trace on stdout.
//! Before it starts executing it reads the watch registration on stdin:
//!
//! ```text
//! 3                          number of lines that follow (one per component)
//! 0,0x6000,0,u8,reg,A        index, trigger, post flag, type, location
//! 1,0x6012,1,s16,mem,0x008d
//! 1,0x6012,1,u8,reg,X        second component of watch 1
//! ```

use anyhow::{Context, Result};
use log::info;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdout, Command};

use crate::directive::WatchSpec;
use crate::domain::Address;

/// Registration text for `watches`, indexed by position
#[must_use]
pub fn registration(watches: &[WatchSpec]) -> String {
    let mut lines = Vec::new();
    for (index, watch) in watches.iter().enumerate() {
        for component in &watch.components {
            lines.push(format!(
                "{index},{},{},{},{}",
                watch.trigger,
                watch.phase.flag(),
                component.value_type(),
                component.location()
            ));
        }
    }

    let mut text = format!("{}\n", lines.len());
    for line in lines {
        text.push_str(&line);
        text.push('\n');
    }
    text
}

/// Command-line arguments for the emulator
#[must_use]
pub fn arguments(start_pc: Address, image: &Path) -> Vec<String> {
    vec![
        "--hide-log".to_string(),
        "--start-pc".to_string(),
        start_pc.to_string(),
        image.display().to_string(),
    ]
}

/// A running emulator and its trace stream
pub struct Emulator {
    pub child: Child,
    pub trace: BufReader<ChildStdout>,
}

/// Start `program` on `image` at `start_pc` and register `watches`
///
/// The child is killed when the returned [`Emulator`] is dropped.
///
/// # Errors
/// Spawn failures and failures writing the registration.
pub async fn spawn_emulator(
    program: &str,
    start_pc: Address,
    image: &Path,
    watches: &[WatchSpec],
) -> Result<Emulator> {
    let args = arguments(start_pc, image);
    let mut child = Command::new(program)
        .args(&args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("Failed to start emulator `{program}`"))?;

    let mut stdin = child.stdin.take().context("emulator stdin not captured")?;
    stdin
        .write_all(registration(watches).as_bytes())
        .await
        .context("Failed to register watches with the emulator")?;
    stdin.shutdown().await.context("Failed to close emulator stdin")?;
    drop(stdin);

    let stdout = child.stdout.take().context("emulator stdout not captured")?;
    info!("emulator started: {program} {}", args.join(" "));
    Ok(Emulator { child, trace: BufReader::new(stdout) })
}
