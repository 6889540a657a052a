//! 过渡域名持久化抽象 Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::TransitionDomain;

/// 暂存旧注册商行的存储
///
/// 行以 `(domain_name, username)` 为键；保存已有键会替换该行，
/// 重复执行 load 不会产生重复。
#[async_trait]
pub trait TransitionDomainRepository: Send + Sync {
    /// 获取所有暂存行
    async fn find_all(&self) -> CoreResult<Vec<TransitionDomain>>;

    /// 按自然键获取暂存行
    async fn find_by_key(
        &self,
        domain_name: &str,
        username: &str,
    ) -> CoreResult<Option<TransitionDomain>>;

    /// 保存暂存行（按自然键新建或更新）
    async fn save(&self, row: &TransitionDomain) -> CoreResult<()>;
}
