//! Profiling sessions: building the profiler invocation, supervising the
//! subprocess and handing its report to a display panel.

pub mod artifact;
pub mod invocation;
pub mod process;
pub mod runner;
pub mod state;

// Re-export main types
pub use artifact::ScopedArtifact;
pub use invocation::{build_args, ProfilerOptions};
pub use process::CancellationToken;
pub use runner::{finish_session, SessionHandle, SessionRunner, SessionWatch};
pub use state::{is_python_file, ExitOutcome, ProfilingRequest, ProfilingSession, SessionState};
