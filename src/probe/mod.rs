mod result;
use async_trait::async_trait;
pub use result::*;
mod resource;
pub use resource::*;
mod error;
pub use error::*;
mod config;
pub use config::*;
mod gateway;
pub use gateway::*;

#[async_trait]
pub trait Prober: Send + Sync {
    fn kind(&self) -> &str;
    fn name(&self) -> &str;
    fn container_id(&self) -> &str;
    async fn probe(&self) -> Result<ProbeResult, ProbeError>;
}
