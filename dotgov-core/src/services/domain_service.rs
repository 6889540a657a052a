//! 域名生命周期服务
//!
//! 所有变更操作遵循同一顺序：读取记录 -> 校验当前状态是否允许 ->
//! 向注册局发出命令 -> 提交本地变更。状态校验失败不会触达注册局，
//! 注册局的瞬时失败也不会写入存储。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use dotgov_registry::{
    CreateDomainRequest, ContactKind, DomainChanges, DomainContact, DomainName, Nameserver,
    RegistryError, RegistryStatus,
};

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{DeleteOutcome, Domain, DomainState};

/// 域名生命周期服务
pub struct DomainService {
    ctx: Arc<ServiceContext>,
}

impl DomainService {
    /// 创建域名服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    // ===== 生命周期操作 =====

    /// 在注册局注册域名
    ///
    /// 仅允许从 `unknown` 发起。注册局应答 `ObjectExists` 说明该域名
    /// 已经注册在我们名下，视为成功。完成后进入 `dns_needed`，
    /// 委派配置是后续单独的步骤。
    pub async fn provision(&self, domain_id: Uuid) -> CoreResult<Domain> {
        let mut domain = self.ctx.find_domain(domain_id).await?;
        require_state(&domain, DomainState::DnsNeeded, &[DomainState::Unknown])?;

        // 1. 在注册局注册
        let request = CreateDomainRequest {
            name: domain.name.clone(),
            contacts: security_contacts(&domain),
            nameservers: domain.nameservers.clone(),
        };
        match self.ctx.registry().create_domain(&request).await {
            Ok(created) => {
                domain.registry_created_at = Some(created.created_at);
                domain.registry_synced_at = Some(Utc::now());
            }
            Err(RegistryError::ObjectExists { .. }) => {
                log::info!("Domain {} already registered, adopting it", domain.name);
            }
            Err(e) => return Err(e.into()),
        }

        // 2. 提交新状态
        domain.state = DomainState::DnsNeeded;
        domain.updated_at = Utc::now();
        self.ctx.domains().save(&domain).await?;

        log::info!("Registered domain {}, awaiting delegation", domain.name);
        Ok(domain)
    }

    /// 施加 client hold，将域名停止服务
    ///
    /// 允许从 `ready` 或 `dns_needed` 发起。
    pub async fn place_client_hold(&self, domain_id: Uuid) -> CoreResult<Domain> {
        let mut domain = self.ctx.find_domain(domain_id).await?;
        require_state(
            &domain,
            DomainState::OnHold,
            &[DomainState::Ready, DomainState::DnsNeeded],
        )?;

        let changes = DomainChanges::add_status(RegistryStatus::ClientHold);
        self.ctx
            .registry()
            .update_domain(&domain.name, &changes)
            .await?;

        domain.state = DomainState::OnHold;
        domain.updated_at = Utc::now();
        self.ctx.domains().save(&domain).await?;

        log::info!("Placed client hold on {}", domain.name);
        Ok(domain)
    }

    /// 解除 client hold
    ///
    /// 仅允许从 `on_hold` 发起。按域名当前的委派数量落入
    /// `ready` 或 `dns_needed`。
    pub async fn remove_client_hold(&self, domain_id: Uuid) -> CoreResult<Domain> {
        let mut domain = self.ctx.find_domain(domain_id).await?;
        require_state(&domain, DomainState::Ready, &[DomainState::OnHold])?;

        let changes = DomainChanges::remove_status(RegistryStatus::ClientHold);
        self.ctx
            .registry()
            .update_domain(&domain.name, &changes)
            .await?;

        domain.state = domain.dns_state();
        domain.updated_at = Utc::now();
        self.ctx.domains().save(&domain).await?;

        log::info!(
            "Removed client hold on {}, now {}",
            domain.name,
            domain.state
        );
        Ok(domain)
    }

    /// 从注册局删除域名
    ///
    /// 允许从 `dns_needed` 或 `on_hold` 发起。在线域名必须先置于 hold，
    /// 该校验发生在任何注册局交互之前。删除已删除的域名是成功的空操作；
    /// 注册局应答 `ObjectNotFound`（对象已不存在）同样视为成功。
    pub async fn delete_domain(&self, domain_id: Uuid) -> CoreResult<DeleteOutcome> {
        let mut domain = self.ctx.find_domain(domain_id).await?;

        if domain.state == DomainState::Deleted {
            log::info!("Domain {} is already deleted", domain.name);
            return Ok(DeleteOutcome::AlreadyDeleted);
        }
        require_state(
            &domain,
            DomainState::Deleted,
            &[DomainState::DnsNeeded, DomainState::OnHold],
        )?;

        match self.ctx.registry().delete_domain(&domain.name).await {
            Ok(()) => {}
            Err(RegistryError::ObjectNotFound { .. }) => {
                log::warn!(
                    "Domain {} was not at the registry, marking it deleted",
                    domain.name
                );
            }
            Err(e) => return Err(e.into()),
        }

        domain.state = DomainState::Deleted;
        domain.updated_at = Utc::now();
        self.ctx.domains().save(&domain).await?;

        log::info!("Deleted domain {}", domain.name);
        Ok(DeleteOutcome::Deleted)
    }

    // ===== 注册数据维护 =====

    /// 发布新的安全联系人
    ///
    /// 任何未删除状态都可执行；先经注册局接受，再更新本地记录。
    pub async fn update_security_contact(
        &self,
        domain_id: Uuid,
        email: &str,
    ) -> CoreResult<Domain> {
        let mut domain = self.ctx.find_domain(domain_id).await?;
        require_not_deleted(&domain)?;

        let changes = DomainChanges {
            set_contacts: Some(vec![DomainContact {
                kind: ContactKind::Security,
                email: email.to_string(),
            }]),
            ..DomainChanges::default()
        };
        self.ctx
            .registry()
            .update_domain(&domain.name, &changes)
            .await?;

        domain.security_contact_email = Some(email.to_string());
        domain.updated_at = Utc::now();
        self.ctx.domains().save(&domain).await?;

        log::info!("Updated security contact for {}", domain.name);
        Ok(domain)
    }

    /// 替换域名的委派记录
    ///
    /// 任何未删除状态都可执行。域名已注册且不在 hold 时，
    /// 按新的委派数量在 `ready` 与 `dns_needed` 之间切换。
    pub async fn update_nameservers(
        &self,
        domain_id: Uuid,
        nameservers: Vec<Nameserver>,
    ) -> CoreResult<Domain> {
        let mut domain = self.ctx.find_domain(domain_id).await?;
        require_not_deleted(&domain)?;

        let changes = DomainChanges {
            set_nameservers: Some(nameservers.clone()),
            ..DomainChanges::default()
        };
        self.ctx
            .registry()
            .update_domain(&domain.name, &changes)
            .await?;

        domain.nameservers = nameservers;
        if matches!(domain.state, DomainState::Ready | DomainState::DnsNeeded) {
            domain.state = domain.dns_state();
        }
        domain.updated_at = Utc::now();
        self.ctx.domains().save(&domain).await?;

        log::info!(
            "Updated delegation for {} ({} nameservers), now {}",
            domain.name,
            domain.nameservers.len(),
            domain.state
        );
        Ok(domain)
    }

    // ===== 注册局查询 =====

    /// 查询域名是否仍可注册
    pub async fn is_available(&self, name: &DomainName) -> CoreResult<bool> {
        let answers = self.ctx.registry().check(std::slice::from_ref(name)).await?;
        Ok(answers.first().is_some_and(|a| a.available))
    }

    /// 通过 info 命令刷新本地缓存的注册局日期
    ///
    /// 缓存未过期时跳过，除非指定 `force`。
    pub async fn sync_registry_data(&self, domain_id: Uuid, force: bool) -> CoreResult<Domain> {
        let mut domain = self.ctx.find_domain(domain_id).await?;
        if !force && !domain.registry_data_is_stale(Utc::now()) {
            return Ok(domain);
        }

        let info = self.ctx.registry().domain_info(&domain.name).await?;
        domain.registry_created_at = info.created_at;
        domain.registry_expires_at = info.expires_at;
        domain.registry_synced_at = Some(Utc::now());
        self.ctx.domains().save(&domain).await?;

        Ok(domain)
    }

    /// 域名的到期日期，缓存新鲜时直接取缓存
    pub async fn expiration_date(&self, domain_id: Uuid) -> CoreResult<Option<DateTime<Utc>>> {
        let domain = self.sync_registry_data(domain_id, false).await?;
        Ok(domain.registry_expires_at)
    }
}

/// 将已设置的安全联系人组装为 create 命令的联系人列表
fn security_contacts(domain: &Domain) -> Vec<DomainContact> {
    domain
        .security_contact_email
        .as_ref()
        .map(|email| {
            vec![DomainContact {
                kind: ContactKind::Security,
                email: email.clone(),
            }]
        })
        .unwrap_or_default()
}

/// 域名不在 `allowed` 之列时直接失败，不触达注册局
fn require_state(
    domain: &Domain,
    target: DomainState,
    allowed: &[DomainState],
) -> CoreResult<()> {
    if allowed.contains(&domain.state) {
        return Ok(());
    }
    Err(CoreError::InvalidDomainTransition {
        current: domain.state.to_string(),
        target: target.to_string(),
        allowed: allowed_list(allowed),
    })
}

fn require_not_deleted(domain: &Domain) -> CoreResult<()> {
    if domain.state == DomainState::Deleted {
        return Err(CoreError::DomainDeleted(domain.name.to_string()));
    }
    Ok(())
}

/// 渲染面向操作者的允许状态列表，如 `'dns_needed' or 'on_hold'`
fn allowed_list(allowed: &[DomainState]) -> String {
    let quoted: Vec<String> = allowed.iter().map(|s| format!("'{s}'")).collect();
    match quoted.split_last() {
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
        None => String::new(),
    }
}
