use sysinfo::{ProcessesToUpdate, System};
use tracing::{debug, info, warn};

/// Kills leftover engine processes from earlier runs so they cannot hold
/// locks on source or output files.
#[derive(Debug, Clone, Default)]
pub struct ProcessSupervisor {
    process_names: Vec<String>,
}

impl ProcessSupervisor {
    pub fn new(process_names: Vec<String>) -> Self {
        Self { process_names }
    }

    pub fn process_names(&self) -> &[String] {
        &self.process_names
    }

    /// Terminates every process whose image name matches one of the
    /// configured names, case-insensitively. The current process and
    /// individual threads are never touched. Returns the number of processes
    /// killed.
    pub fn terminate_strays(&self) -> usize {
        if self.process_names.is_empty() {
            return 0;
        }

        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::All, true);
        let own_pid = sysinfo::get_current_pid().ok();

        let mut killed = 0;
        for (pid, process) in system.processes() {
            if Some(*pid) == own_pid || process.thread_kind().is_some() {
                continue;
            }
            let name = process.name().to_string_lossy();
            if !self.matches(&name) {
                continue;
            }
            if process.kill() {
                debug!(pid = pid.as_u32(), process = %name, "terminated stray engine process");
                killed += 1;
            } else {
                warn!(pid = pid.as_u32(), process = %name, "could not terminate stray engine process");
            }
        }

        if killed > 0 {
            info!(killed, "stray engine processes terminated");
        }
        killed
    }

    fn matches(&self, name: &str) -> bool {
        self.process_names
            .iter()
            .any(|wanted| wanted.eq_ignore_ascii_case(name))
    }
}
