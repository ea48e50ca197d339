use async_trait::async_trait;

/// Host hook for asking the OS for media/storage access before images are written.
///
/// The answer is advisory: a denial is logged and the sync goes on, letting the
/// individual downloads fail if access really is missing.
#[async_trait]
pub trait MediaPermission: Send + Sync {
    async fn request_access(&self) -> bool;
}

/// For hosts without a permission model.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeGranted;

#[async_trait]
impl MediaPermission for AssumeGranted {
    async fn request_access(&self) -> bool {
        true
    }
}
