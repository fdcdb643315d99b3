//! End-to-end tests against the real kernel.
//!
//! These create dummy interfaces and network namespaces, so they need root
//! and the `integration` feature:
//!
//! ```bash
//! sudo cargo test -p nsmove --test integration --features integration
//! ```

#[macro_use]
#[path = "common/mod.rs"]
mod common;

use nsmove::netlink::namespace::NamespaceTarget;
use nsmove::{Error, InterfaceHandle, MoveConfig, TargetProcess};

use crate::common::{DummyLink, NamespacedChild, TestResult};

#[tokio::test]
async fn test_move_into_process_namespace() -> TestResult {
    require_root!();

    let link = DummyLink::new("nsm")?;
    let child = NamespacedChild::spawn()?;
    let before = InterfaceHandle::resolve(link.name())?;

    let config = MoveConfig::new(TargetProcess::new(child.pid())?).interface(link.name());
    let moved = config.apply().await?;
    assert_eq!(moved.index(), before.index());

    // Gone from the host, present inside the child's namespace.
    let err = InterfaceHandle::resolve(link.name()).unwrap_err();
    assert!(matches!(err, Error::InterfaceNotFound { .. }));
    child.ip(&["link", "show", link.name()])?;

    Ok(())
}

#[tokio::test]
async fn test_missing_interface() -> TestResult {
    require_root!();

    let child = NamespacedChild::spawn()?;
    let config = MoveConfig::new(TargetProcess::new(child.pid())?).interface("nsm-absent0");
    let err = config.apply().await.unwrap_err();
    assert!(matches!(err, Error::InterfaceNotFound { .. }));

    Ok(())
}

#[tokio::test]
async fn test_missing_process_is_esrch() -> TestResult {
    require_root!();

    let link = DummyLink::new("nsm")?;
    // Above any configurable pid_max.
    let config = MoveConfig::new(TargetProcess::new(i32::MAX as u32)?).interface(link.name());
    let err = config.apply().await.unwrap_err();

    assert!(matches!(err, Error::NamespaceMoveRejected { .. }));
    assert!(err.is_no_such_process(), "got {}", err);

    // The interface stayed where it was.
    InterfaceHandle::resolve(link.name())?;
    Ok(())
}

#[tokio::test]
async fn test_move_by_namespace_file() -> TestResult {
    require_root!();

    let link = DummyLink::new("nsm")?;
    let child = NamespacedChild::spawn()?;
    let target = NamespaceTarget::path(format!("/proc/{}/ns/net", child.pid()))?;

    MoveConfig {
        interface: link.name().to_string(),
        target,
        timeout: None,
    }
    .apply()
    .await?;

    assert!(InterfaceHandle::resolve(link.name()).is_err());
    child.ip(&["link", "show", link.name()])?;
    Ok(())
}

#[tokio::test]
async fn test_loopback_cannot_move() -> TestResult {
    require_root!();

    let child = NamespacedChild::spawn()?;
    let config = MoveConfig::new(TargetProcess::new(child.pid())?).interface("lo");
    let err = config.apply().await.unwrap_err();

    // lo is netns-local; the kernel answers EINVAL.
    assert_eq!(err.errno(), Some(libc::EINVAL));
    Ok(())
}
