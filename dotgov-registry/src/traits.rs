use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    CreateDomainRequest, CreatedDomain, DomainAvailability, DomainChanges, DomainName,
    RegistryDomainInfo,
};

/// 注册局客户端 Trait
///
/// 注册局是域名状态的权威：每次变更都必须先通过这些命令回到注册局，
/// 本地记录才能跟着改变；瞬时失败
/// （[`RegistryError::is_retryable`](crate::RegistryError::is_retryable)）
/// 必须保持本地记录不动。
///
/// 实现方包装真实的注册局会话；测试使用录制命令的 mock。
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// 查询域名是否可注册
    ///
    /// 按请求顺序返回每个域名的查询结果。
    async fn check(&self, names: &[DomainName]) -> Result<Vec<DomainAvailability>>;

    /// 注册新域名
    ///
    /// 域名已被注册时返回 [`ObjectExists`](crate::RegistryError::ObjectExists)。
    async fn create_domain(&self, request: &CreateDomainRequest) -> Result<CreatedDomain>;

    /// 对已注册域名应用变更（状态、联系人、委派）
    ///
    /// 域名未注册时返回 [`ObjectNotFound`](crate::RegistryError::ObjectNotFound)。
    async fn update_domain(&self, name: &DomainName, changes: &DomainChanges) -> Result<()>;

    /// 从注册局删除域名
    ///
    /// 域名未注册时返回 [`ObjectNotFound`](crate::RegistryError::ObjectNotFound)。
    async fn delete_domain(&self, name: &DomainName) -> Result<()>;

    /// 获取已注册域名的完整对象状态
    async fn domain_info(&self, name: &DomainName) -> Result<RegistryDomainInfo>;
}
