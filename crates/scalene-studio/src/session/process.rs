//! Subprocess supervision: output pumps, cancellation and deadline.

use super::state::ExitOutcome;
use crate::host::OutputLog;
use crate::utils::config::{PUMP_POLL_INTERVAL, STDERR_TAIL_LINES, SUPERVISOR_POLL_INTERVAL};
use log::{debug, warn};
use std::collections::VecDeque;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::process::Child;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Shared flag asking a session to kill its profiler
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Wait for `child` to exit, killing it on cancellation or once `deadline` passes
pub(crate) fn supervise(
    child: &mut Child,
    cancel: &CancellationToken,
    deadline: Option<Instant>,
) -> ExitOutcome {
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return ExitOutcome::Exited(status.code()),
            Ok(None) => {}
            Err(e) => {
                warn!("Failed to poll profiler process {}: {}", child.id(), e);
                kill(child);
                return ExitOutcome::Exited(None);
            }
        }

        if cancel.is_cancelled() {
            debug!("Cancelling profiler process {}", child.id());
            kill(child);
            return ExitOutcome::Cancelled;
        }

        if deadline.is_some_and(|d| Instant::now() >= d) {
            warn!("Profiler process {} hit its deadline", child.id());
            kill(child);
            return ExitOutcome::TimedOut;
        }

        thread::sleep(SUPERVISOR_POLL_INTERVAL);
    }
}

fn kill(child: &mut Child) {
    if let Err(e) = child.kill() {
        warn!("Failed to kill profiler process {}: {}", child.id(), e);
    }
    // Reap so the pid is not left as a zombie
    let _ = child.wait();
}

/// Call `each` with every line of `stream`, decoding invalid UTF-8 lossily.
///
/// Only a read error stops the loop; the pipe is drained to EOF otherwise so
/// the writer never sees a closed pipe.
fn for_each_line<R: Read>(stream: R, mut each: impl FnMut(&str)) {
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                if buf.ends_with(b"\n") {
                    buf.pop();
                    if buf.ends_with(b"\r") {
                        buf.pop();
                    }
                }
                each(&String::from_utf8_lossy(&buf));
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => {
                debug!("Profiler output closed: {}", e);
                break;
            }
        }
    }
}

/// Forward every stdout line to the output log as it arrives
pub(crate) fn pump_stdout<R>(stream: R, log: Arc<dyn OutputLog>) -> JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || for_each_line(stream, |line| log.append_line(line)))
}

/// Drain stderr, keeping only the last lines for failure diagnostics
pub(crate) fn collect_stderr_tail<R>(stream: R) -> JoinHandle<Vec<String>>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);
        for_each_line(stream, |line| {
            debug!("scalene stderr: {}", line);
            if tail.len() == STDERR_TAIL_LINES {
                tail.pop_front();
            }
            tail.push_back(line.to_string());
        });
        tail.into()
    })
}

/// Join `handle` if it finishes within `grace`.
///
/// A pump whose pipe is still held open (e.g. by a grandchild of the killed
/// profiler) is left detached and `None` is returned.
pub(crate) fn join_within<T>(handle: JoinHandle<T>, grace: Duration) -> Option<T> {
    let deadline = Instant::now() + grace;
    while !handle.is_finished() {
        if Instant::now() >= deadline {
            debug!("Output pump still busy after {:?}, detaching it", grace);
            return None;
        }
        thread::sleep(PUMP_POLL_INTERVAL);
    }
    handle.join().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Lines(Mutex<Vec<String>>);

    impl OutputLog for Lines {
        fn append_line(&self, line: &str) {
            self.0.lock().unwrap().push(line.to_string());
        }
    }

    #[test]
    fn test_pump_forwards_each_line() {
        let log = Arc::new(Lines::default());
        let input = std::io::Cursor::new(b"first\nsecond\n".to_vec());

        pump_stdout(input, log.clone()).join().unwrap();
        assert_eq!(*log.0.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_pump_survives_invalid_utf8() {
        let log = Arc::new(Lines::default());
        let input = std::io::Cursor::new(b"caf\xe9\r\nnext\nlast".to_vec());

        pump_stdout(input, log.clone()).join().unwrap();
        assert_eq!(*log.0.lock().unwrap(), vec!["caf\u{fffd}", "next", "last"]);
    }

    #[test]
    fn test_stderr_tail_keeps_lines_after_invalid_utf8() {
        let input = std::io::Cursor::new(b"\xff\xfe\nTraceback\n".to_vec());
        let tail = collect_stderr_tail(input).join().unwrap();

        assert_eq!(tail, vec!["\u{fffd}\u{fffd}", "Traceback"]);
    }

    #[test]
    fn test_join_within_detaches_busy_thread() {
        let (tx, rx) = std::sync::mpsc::channel::<()>();
        let busy = thread::spawn(move || {
            let _ = rx.recv();
        });
        assert_eq!(join_within(busy, Duration::from_millis(50)), None);
        drop(tx);

        let done = thread::spawn(|| 7);
        assert_eq!(join_within(done, Duration::from_secs(5)), Some(7));
    }

    #[test]
    fn test_stderr_tail_is_bounded() {
        let text: String = (0..STDERR_TAIL_LINES + 5)
            .map(|i| format!("line {}\n", i))
            .collect();
        let tail = collect_stderr_tail(std::io::Cursor::new(text.into_bytes()))
            .join()
            .unwrap();

        assert_eq!(tail.len(), STDERR_TAIL_LINES);
        assert_eq!(tail.first().map(String::as_str), Some("line 5"));
    }

    #[test]
    fn test_token_is_shared_between_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }
}
