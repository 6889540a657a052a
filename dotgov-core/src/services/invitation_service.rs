//! 登录与邀请领取服务
//!
//! 域名访问权限可以先授予一个邮箱地址，再等对应用户出现。
//! 本服务处理登录：首次见到的邮箱创建用户，随后消费其名下的
//! 待领取邀请，逐条转换为管理员角色。

use std::sync::Arc;

use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::types::{DomainInformation, InvitationStatus, User, UserDomainRole};

/// 登录与邀请领取服务
pub struct InvitationService {
    ctx: Arc<ServiceContext>,
}

impl InvitationService {
    /// 创建邀请服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 按邮箱处理登录，首次见到的邮箱创建用户
    ///
    /// 返回用户与本次登录消费的邀请数量。
    pub async fn login(&self, email: &str, username: &str) -> CoreResult<(User, usize)> {
        let normalized = email.trim().to_lowercase();
        let user = match self.ctx.users().find_by_email(&normalized).await? {
            Some(user) => user,
            None => {
                let user = User::new(username, email);
                self.ctx.users().save(&user).await?;
                log::info!("首次登录，创建用户 {}", user.username);
                user
            }
        };

        let granted = self.process_login(&user).await?;
        Ok((user, granted))
    }

    /// 消费用户名下的待领取邀请
    ///
    /// 每条邀请授予对应域名的管理员角色，域名缺少组织信息记录时补建，
    /// 随后状态置为 `retrieved`。已领取的邀请和指向已不存在域名的邀请
    /// 保持原样。
    pub async fn process_login(&self, user: &User) -> CoreResult<usize> {
        let invitations = self.ctx.access().invitations_for_email(&user.email).await?;

        let mut granted = 0;
        for mut invitation in invitations {
            if invitation.status != InvitationStatus::Invited {
                continue;
            }
            let Some(domain) = self.ctx.domains().find_by_id(invitation.domain_id).await? else {
                log::warn!("邀请指向的域名 {} 已不存在，跳过", invitation.domain_name);
                continue;
            };

            if self
                .ctx
                .access()
                .find_role(user.id, domain.id)
                .await?
                .is_none()
            {
                let role = UserDomainRole::manager(user.id, domain.id);
                self.ctx.access().save_role(&role).await?;
            }
            if self
                .ctx
                .domain_information()
                .find_by_domain(domain.id)
                .await?
                .is_none()
            {
                let info = DomainInformation::new(domain.id, user.id, None);
                self.ctx.domain_information().save(&info).await?;
            }

            invitation.status = InvitationStatus::Retrieved;
            self.ctx.access().save_invitation(&invitation).await?;
            granted += 1;
        }

        if granted > 0 {
            log::info!("登录时为 {} 授予了 {granted} 个域名角色", user.username);
        }
        Ok(granted)
    }
}
