use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// A hosted chat-completion model that turns a prompt into free text.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Whether a credential is configured. Explanations are skipped without one.
    fn is_configured(&self) -> bool;

    async fn complete(&self, prompt: &str) -> Result<String>;
}
