//! The netlink socket must be closed on every exit path.
//!
//! Kept in its own test binary so no other test opens descriptors
//! concurrently.

use nsmove::netlink::NetlinkSocket;
use nsmove::{Connection, InterfaceHandle, MoveConfig, NamespaceTarget, TargetProcess};

fn open_fds() -> usize {
    std::fs::read_dir("/proc/self/fd").unwrap().count()
}

#[tokio::test(flavor = "current_thread")]
async fn test_no_descriptor_leak() {
    // Let the runtime set up its own descriptors first.
    drop(NetlinkSocket::new().unwrap());
    let before = open_fds();

    for _ in 0..32 {
        // Open and close.
        drop(Connection::new().unwrap());

        // Fails before any socket is opened.
        let config = MoveConfig::new(TargetProcess::new(1).unwrap()).interface("nsmove-absent9");
        assert!(config.apply().await.is_err());

        // Fails after the socket is opened: loopback never moves, and
        // unprivileged callers get EPERM first.
        let config = MoveConfig::new(TargetProcess::new(i32::MAX as u32).unwrap()).interface("lo");
        let err = config.apply().await.unwrap_err();
        assert!(err.errno().is_some(), "expected kernel rejection, got {}", err);
    }

    assert_eq!(open_fds(), before);

    // Namespace file targets release their descriptor too.
    let lo = InterfaceHandle::resolve("lo").unwrap();
    assert!(lo.index() > 0);
    drop(NamespaceTarget::path("/proc/self/ns/net").unwrap());
    assert_eq!(open_fds(), before);
}
