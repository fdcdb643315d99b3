//! Common helpers for the root-only end-to-end tests.
//!
//! Provides a throwaway dummy interface and a child process sitting in a
//! fresh network namespace, both cleaned up on drop.

use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use std::io;

/// Global counter for unique interface names.
static LINK_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Generate an interface name unique to this test process (< IFNAMSIZ).
pub fn unique_link_name(prefix: &str) -> String {
    let id = LINK_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}{}x{}", prefix, std::process::id() % 10000, id)
}

/// Result type for test bodies.
pub type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

fn run(cmd: &str, args: &[&str]) -> io::Result<()> {
    let status = Command::new(cmd)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;
    if !status.success() {
        return Err(io::Error::other(format!(
            "command failed: {} {:?}",
            cmd, args
        )));
    }
    Ok(())
}

/// A dummy interface in the host namespace, deleted on drop.
///
/// Deleting by name fails harmlessly once the link has been moved away.
pub struct DummyLink {
    name: String,
}

impl DummyLink {
    pub fn new(prefix: &str) -> io::Result<Self> {
        let name = unique_link_name(prefix);
        run("ip", &["link", "add", &name, "type", "dummy"])?;
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for DummyLink {
    fn drop(&mut self) {
        let _ = run("ip", &["link", "del", &self.name]);
    }
}

/// A `sleep` process in its own network namespace, killed on drop.
///
/// Dropping it destroys the namespace and anything moved into it.
pub struct NamespacedChild {
    child: Child,
}

impl NamespacedChild {
    pub fn spawn() -> io::Result<Self> {
        let child = Command::new("unshare")
            .args(["--net", "sleep", "60"])
            .spawn()?;
        let this = Self { child };
        this.wait_for_unshare()?;
        Ok(this)
    }

    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    /// Run `ip` inside the child's namespace.
    pub fn ip(&self, args: &[&str]) -> io::Result<()> {
        let pid = self.pid().to_string();
        let mut full = vec!["-t", pid.as_str(), "-n", "ip"];
        full.extend_from_slice(args);
        run("nsenter", &full)
    }

    // unshare(1) only switches namespaces after fork/exec; poll until the
    // child's namespace link differs from ours.
    fn wait_for_unshare(&self) -> io::Result<()> {
        let ours = std::fs::read_link("/proc/self/ns/net")?;
        let theirs = format!("/proc/{}/ns/net", self.pid());
        let deadline = Instant::now() + Duration::from_secs(5);

        while Instant::now() < deadline {
            if let Ok(link) = std::fs::read_link(&theirs) {
                if link != ours {
                    return Ok(());
                }
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        Err(io::Error::new(
            io::ErrorKind::TimedOut,
            "child never left our network namespace",
        ))
    }
}

impl Drop for NamespacedChild {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Check if running as root.
pub fn is_root() -> bool {
    // SAFETY: geteuid has no preconditions.
    unsafe { libc::geteuid() == 0 }
}

/// Skip the test if not running as root.
#[macro_export]
macro_rules! require_root {
    () => {
        if !crate::common::is_root() {
            eprintln!("Skipping test: requires root");
            return Ok(());
        }
    };
}
