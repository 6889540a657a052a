//! 访问关系持久化抽象 Trait（邀请与角色）

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CoreResult;
use crate::types::{DomainInvitation, UserDomainRole};

/// 域名管理权的存储
///
/// 访问关系是同一道接缝后的两张表：按邮箱键控的待领取邀请，
/// 和按 (用户, 域名) 键控的已授予角色。两者经常一起写入
/// （登录领取、批准回退），因此共用一个仓储。
#[async_trait]
pub trait AccessRepository: Send + Sync {
    /// 获取所有邀请
    async fn find_all_invitations(&self) -> CoreResult<Vec<DomainInvitation>>;

    /// 获取 (邮箱, 域名) 对应的邀请
    ///
    /// # Arguments
    /// * `email` - 归一化（小写）的邮箱地址
    /// * `domain_name` - 归一化（小写）的域名
    async fn find_invitation(
        &self,
        email: &str,
        domain_name: &str,
    ) -> CoreResult<Option<DomainInvitation>>;

    /// 获取发给某邮箱的全部邀请
    async fn invitations_for_email(&self, email: &str) -> CoreResult<Vec<DomainInvitation>>;

    /// 保存邀请（新建或更新）
    async fn save_invitation(&self, invitation: &DomainInvitation) -> CoreResult<()>;

    /// 获取用户在某域名上持有的角色
    async fn find_role(
        &self,
        user_id: Uuid,
        domain_id: Uuid,
    ) -> CoreResult<Option<UserDomainRole>>;

    /// 保存角色授予（新建或更新）
    async fn save_role(&self, role: &UserDomainRole) -> CoreResult<()>;

    /// 删除某域名上授予的全部角色
    async fn delete_roles_for_domain(&self, domain_id: Uuid) -> CoreResult<()>;
}
