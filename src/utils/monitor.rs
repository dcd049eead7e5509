use std::fmt;

/// Steps of a dashboard run that get a resource sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    Fetch,
    Build,
    Write,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Start => "Start",
            Phase::Fetch => "Fetch",
            Phase::Build => "Build",
            Phase::Write => "Write",
        };
        f.write_str(name)
    }
}

#[cfg(feature = "cli")]
pub use self::sampling::{PhaseSample, SystemMonitor};

#[cfg(feature = "cli")]
mod sampling {
    use super::Phase;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};
    use sysinfo::{Pid, ProcessesToUpdate, System};

    const MB: u64 = 1024 * 1024;

    #[derive(Debug, Clone)]
    pub struct PhaseSample {
        pub phase: Phase,
        pub cpu_usage: f32,
        pub rss_mb: u64,
        pub rss_percent: f32,
        pub peak_rss_mb: u64,
        /// Time spent since the previous sample.
        pub step: Duration,
        pub total: Duration,
    }

    struct State {
        system: System,
        peak_rss_mb: u64,
        last_mark: Instant,
    }

    /// Samples this process's CPU and memory between dashboard phases.
    /// A disabled monitor never touches `sysinfo`.
    pub struct SystemMonitor {
        state: Option<Mutex<State>>,
        pid: Option<Pid>,
        started: Instant,
    }

    impl SystemMonitor {
        pub fn new(enabled: bool) -> Self {
            let started = Instant::now();
            let pid = if enabled { sysinfo::get_current_pid().ok() } else { None };
            if enabled && pid.is_none() {
                tracing::warn!("⚠️ Cannot determine current process id, monitoring disabled");
            }

            let state = pid.map(|_| {
                let mut system = System::new();
                system.refresh_memory();
                Mutex::new(State {
                    system,
                    peak_rss_mb: 0,
                    last_mark: started,
                })
            });

            Self { state, pid, started }
        }

        pub fn is_enabled(&self) -> bool {
            self.state.is_some()
        }

        pub fn sample(&self, phase: Phase) -> Option<PhaseSample> {
            let pid = self.pid?;
            let mut state = self.state.as_ref()?.lock().ok()?;

            state.system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
            let total_mb = state.system.total_memory() / MB;
            let (cpu_usage, rss_mb) = {
                let process = state.system.process(pid)?;
                (process.cpu_usage(), process.memory() / MB)
            };

            state.peak_rss_mb = state.peak_rss_mb.max(rss_mb);
            let now = Instant::now();
            let step = now.duration_since(state.last_mark);
            state.last_mark = now;

            Some(PhaseSample {
                phase,
                cpu_usage,
                rss_mb,
                rss_percent: if total_mb > 0 {
                    rss_mb as f32 / total_mb as f32 * 100.0
                } else {
                    0.0
                },
                peak_rss_mb: state.peak_rss_mb,
                step,
                total: self.started.elapsed(),
            })
        }

        pub fn mark(&self, phase: Phase) {
            if let Some(s) = self.sample(phase) {
                tracing::info!(
                    "📊 {} took {:?} - CPU: {:.1}%, RSS: {}MB ({:.1}%), Peak: {}MB",
                    s.phase,
                    s.step,
                    s.cpu_usage,
                    s.rss_mb,
                    s.rss_percent,
                    s.peak_rss_mb
                );
            }
        }

        pub fn finish(&self, pages: usize) {
            if let Some(s) = self.sample(Phase::Write) {
                tracing::info!(
                    "📊 Session done - {} page(s) in {:?}, Peak RSS: {}MB",
                    pages,
                    s.total,
                    s.peak_rss_mb
                );
            }
        }
    }

    impl Default for SystemMonitor {
        fn default() -> Self {
            Self::new(false)
        }
    }
}

// 非 CLI 環境的空實現
#[cfg(not(feature = "cli"))]
#[derive(Default)]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn is_enabled(&self) -> bool {
        false
    }

    pub fn mark(&self, _phase: Phase) {}

    pub fn finish(&self, _pages: usize) {}
}
