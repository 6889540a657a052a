//! 业务逻辑服务层

mod application_service;
mod domain_service;
mod invitation_service;
mod migration_service;

pub use application_service::ApplicationService;
pub use domain_service::DomainService;
pub use invitation_service::InvitationService;
pub use migration_service::MigrationService;

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::traits::{
    AccessRepository, ApplicationRepository, DomainInformationRepository, DomainRepository,
    Notifier, RegistryClient, TransitionDomainRepository, UserRepository,
};
use crate::types::{Application, Domain, Notification, User};

/// 服务上下文 - 持有所有依赖
///
/// 平台层需要创建此上下文，并注入平台特定的存储实现与注册局客户端。
pub struct ServiceContext {
    /// 注册局客户端
    registry: Arc<dyn RegistryClient>,
    /// 通知分发器
    notifier: Arc<dyn Notifier>,
    /// 域名持久化仓库
    domains: Arc<dyn DomainRepository>,
    /// 域名组织信息仓库
    domain_information: Arc<dyn DomainInformationRepository>,
    /// 申请持久化仓库
    applications: Arc<dyn ApplicationRepository>,
    /// 用户持久化仓库
    users: Arc<dyn UserRepository>,
    /// 迁移暂存行仓库
    transition_domains: Arc<dyn TransitionDomainRepository>,
    /// 邀请与角色仓库
    access: Arc<dyn AccessRepository>,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        registry: Arc<dyn RegistryClient>,
        notifier: Arc<dyn Notifier>,
        domains: Arc<dyn DomainRepository>,
        domain_information: Arc<dyn DomainInformationRepository>,
        applications: Arc<dyn ApplicationRepository>,
        users: Arc<dyn UserRepository>,
        transition_domains: Arc<dyn TransitionDomainRepository>,
        access: Arc<dyn AccessRepository>,
    ) -> Self {
        Self {
            registry,
            notifier,
            domains,
            domain_information,
            applications,
            users,
            transition_domains,
            access,
        }
    }

    /// 注册局客户端
    pub fn registry(&self) -> &Arc<dyn RegistryClient> {
        &self.registry
    }

    /// 通知分发器
    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// 域名仓库
    pub fn domains(&self) -> &Arc<dyn DomainRepository> {
        &self.domains
    }

    /// 域名组织信息仓库
    pub fn domain_information(&self) -> &Arc<dyn DomainInformationRepository> {
        &self.domain_information
    }

    /// 申请仓库
    pub fn applications(&self) -> &Arc<dyn ApplicationRepository> {
        &self.applications
    }

    /// 用户仓库
    pub fn users(&self) -> &Arc<dyn UserRepository> {
        &self.users
    }

    /// 迁移暂存行仓库
    pub fn transition_domains(&self) -> &Arc<dyn TransitionDomainRepository> {
        &self.transition_domains
    }

    /// 邀请与角色仓库
    pub fn access(&self) -> &Arc<dyn AccessRepository> {
        &self.access
    }

    /// 按 ID 取域名，不存在时返回 `DomainNotFound`
    pub async fn find_domain(&self, domain_id: Uuid) -> CoreResult<Domain> {
        self.domains
            .find_by_id(domain_id)
            .await?
            .ok_or_else(|| CoreError::DomainNotFound(domain_id.to_string()))
    }

    /// 按 ID 取申请，不存在时返回 `ApplicationNotFound`
    pub async fn find_application(&self, application_id: Uuid) -> CoreResult<Application> {
        self.applications
            .find_by_id(application_id)
            .await?
            .ok_or_else(|| CoreError::ApplicationNotFound(application_id.to_string()))
    }

    /// 按 ID 取用户，不存在时返回 `UserNotFound`
    pub async fn find_user(&self, user_id: Uuid) -> CoreResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| CoreError::UserNotFound(user_id.to_string()))
    }

    /// 尽力发送通知；失败只记录日志，不影响主流程
    pub async fn notify(&self, notification: Notification) {
        let to = notification.to.clone();
        if let Err(e) = self.notifier.send(&notification).await {
            log::warn!("Failed to send notification to {to}: {e}");
        }
    }
}
