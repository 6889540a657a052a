//! 旧注册商迁移引擎
//!
//! 旧注册商导出的数据分三个阶段处理：`load` 解析平面文件，
//! 按域名联系人暂存 [`TransitionDomain`] 行；`transfer` 从暂存行
//! 物化域名与邀请；`reconcile` 只读审计暂存行与本地状态的差异。
//! `run` 依次串联三个阶段。
//!
//! 迁移域名在上游已经注册过，`transfer` 不与注册局交互，
//! 域名按旧状态映射直接进入生命周期。

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use uuid::Uuid;

use dotgov_registry::DomainName;

use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::types::{
    Domain, DomainInvitation, InvitationSendReport, LoadReport, MigrationFiles, MigrationReport,
    Notification, NotificationKind, TransferReport, TransitionDomain, TransitionStatus,
    UserDomainRole,
};

/// 迁移服务
pub struct MigrationService {
    ctx: Arc<ServiceContext>,
}

impl MigrationService {
    /// 创建迁移服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    // ===== 阶段一：load =====

    /// 解析旧注册商导出文件并暂存其中的行
    ///
    /// 幂等：以 `(domain, email)` 为键已暂存的行会被刷新而不是重复插入，
    /// 因此重新加载修正后的导出是安全的。联系人 ID 查不到邮箱时，
    /// 该行以空 username 暂存，域名仍然保留。
    pub async fn load(&self, files: &MigrationFiles) -> CoreResult<LoadReport> {
        let mut report = LoadReport::default();

        // 1. 联系人 ID -> 邮箱
        let (contact_pairs, bad) = parse_pairs(&files.contacts);
        report.malformed_lines += bad;
        let emails: HashMap<String, String> = contact_pairs
            .into_iter()
            .map(|(id, email)| (id.to_lowercase(), email.to_lowercase()))
            .collect();

        // 2. 域名 -> 旧状态
        let (status_pairs, bad) = parse_pairs(&files.domain_statuses);
        report.malformed_lines += bad;
        let statuses: HashMap<String, TransitionStatus> = status_pairs
            .into_iter()
            .map(|(domain, raw)| (domain.to_lowercase(), TransitionStatus::from_legacy(&raw)))
            .collect();

        // 3. 每个域名联系人暂存一行
        let (rows, bad) = parse_pairs(&files.domain_contacts);
        report.malformed_lines += bad;
        for (domain, contact_id) in rows {
            let domain = domain.to_lowercase();
            let username = match emails.get(&contact_id.to_lowercase()) {
                Some(email) => email.clone(),
                None => {
                    log::warn!("联系人 {contact_id} 没有邮箱记录（{domain}）");
                    report.unresolved_contacts += 1;
                    String::new()
                }
            };
            let status = statuses
                .get(&domain)
                .copied()
                .unwrap_or(TransitionStatus::Ready);

            match self
                .ctx
                .transition_domains()
                .find_by_key(&domain, &username)
                .await?
            {
                Some(mut existing) => {
                    existing.status = status;
                    self.ctx.transition_domains().save(&existing).await?;
                    report.updated += 1;
                }
                None => {
                    let row = TransitionDomain::new(&domain, &username, status);
                    self.ctx.transition_domains().save(&row).await?;
                    report.created += 1;
                }
            }
            report.staged += 1;
        }

        log::info!("{report}");
        Ok(report)
    }

    // ===== 阶段二：transfer =====

    /// 从暂存行物化域名与邀请
    ///
    /// 每个暂存域名按其旧状态映射的生命周期状态建立本地域名。
    /// 行内联系人的邮箱若已对应本地用户则直接授予管理员角色，
    /// 否则创建待领取邀请；没有邮箱的行只建域名，不建访问关系。
    /// 可重复执行。
    pub async fn transfer(&self) -> CoreResult<TransferReport> {
        let rows = self.ctx.transition_domains().find_all().await?;
        let mut report = TransferReport::default();
        let mut materialized: HashMap<String, Uuid> = HashMap::new();

        for row in rows {
            // 1. 校验暂存的域名
            let name = match DomainName::parse(&row.domain_name) {
                Ok(name) => name,
                Err(e) => {
                    log::warn!("跳过无法通过校验的域名 {}: {e}", row.domain_name);
                    report.invalid_names.push(row.domain_name.clone());
                    continue;
                }
            };

            // 2. 查找或创建域名，每个名称只处理一次
            let domain_id = match materialized.get(name.as_str()) {
                Some(id) => *id,
                None => {
                    let domain = match self.ctx.domains().find_by_name(name.as_str()).await? {
                        Some(existing) => {
                            report.domains_existing += 1;
                            existing
                        }
                        None => {
                            let mut domain = Domain::new(name.clone());
                            domain.state = row.status.domain_state();
                            self.ctx.domains().save(&domain).await?;
                            report.domains_created += 1;
                            domain
                        }
                    };
                    materialized.insert(name.as_str().to_string(), domain.id);
                    domain.id
                }
            };

            // 3. 为该行联系人建立访问关系
            if row.username.is_empty() {
                report.rows_without_email += 1;
                continue;
            }
            if let Some(user) = self.ctx.users().find_by_email(&row.username).await? {
                if self
                    .ctx
                    .access()
                    .find_role(user.id, domain_id)
                    .await?
                    .is_none()
                {
                    let role = UserDomainRole::manager(user.id, domain_id);
                    self.ctx.access().save_role(&role).await?;
                    report.roles_granted += 1;
                }
                continue;
            }
            match self
                .ctx
                .access()
                .find_invitation(&row.username, name.as_str())
                .await?
            {
                Some(_) => report.invitations_existing += 1,
                None => {
                    let invitation = DomainInvitation::new(&row.username, domain_id, name.as_str());
                    self.ctx.access().save_invitation(&invitation).await?;
                    report.invitations_created += 1;
                }
            }
        }

        log::info!("{report}");
        Ok(report)
    }

    // ===== 阶段三：reconcile =====

    /// 审计暂存行与本地状态的差异
    ///
    /// 只读操作。计数按暂存行累计：同一域名以三个联系人暂存且未迁移时，
    /// 记三条缺失。行的邀请覆盖判定：`(email, domain)` 存在邀请，
    /// 或该邮箱对应的用户已持有管理员角色；没有邮箱的行永远视为未覆盖。
    pub async fn reconcile(&self) -> CoreResult<MigrationReport> {
        let (rows, domains, infos, invitations) = futures::try_join!(
            self.ctx.transition_domains().find_all(),
            self.ctx.domains().find_all(),
            self.ctx.domain_information().find_all(),
            self.ctx.access().find_all_invitations(),
        )?;

        let mut domains_by_name: HashMap<&str, Vec<&Domain>> = HashMap::new();
        for domain in &domains {
            domains_by_name
                .entry(domain.name.as_str())
                .or_default()
                .push(domain);
        }
        let informed: HashSet<Uuid> = infos.iter().map(|i| i.domain_id).collect();
        let invited: HashSet<(&str, &str)> = invitations
            .iter()
            .map(|i| (i.email.as_str(), i.domain_name.as_str()))
            .collect();

        let mut report = MigrationReport::default();
        let mut seen_keys: HashSet<(&str, &str)> = HashSet::new();
        let mut staged_names: BTreeSet<&str> = BTreeSet::new();
        let mut missing_names: BTreeSet<&str> = BTreeSet::new();
        let mut duplicated_names: BTreeSet<&str> = BTreeSet::new();
        let mut uninformed_names: BTreeSet<&str> = BTreeSet::new();

        for row in &rows {
            report.total_rows += 1;
            staged_names.insert(row.domain_name.as_str());
            let fresh = seen_keys.insert((row.domain_name.as_str(), row.username.as_str()));
            if !fresh {
                report.duplicate_rows += 1;
            }
            if row.username.is_empty() {
                report.rows_without_contact += 1;
            }

            // 按暂存行核对域名与组织信息记录
            let candidates = domains_by_name.get(row.domain_name.as_str());
            if candidates.is_some_and(|c| c.len() > 1) {
                duplicated_names.insert(row.domain_name.as_str());
            }
            let domain = candidates.and_then(|c| c.first().copied());
            match domain {
                Some(domain) => {
                    if !informed.contains(&domain.id) {
                        report.missing_informations += 1;
                        uninformed_names.insert(row.domain_name.as_str());
                    }
                }
                None => {
                    report.missing_domains += 1;
                    report.missing_informations += 1;
                    missing_names.insert(row.domain_name.as_str());
                }
            }

            // 核对该行联系人的邀请覆盖情况
            let covered = if row.username.is_empty() {
                false
            } else if invited.contains(&(row.username.as_str(), row.domain_name.as_str())) {
                true
            } else if let (Some(domain), Some(user)) = (
                domain,
                self.ctx.users().find_by_email(&row.username).await?,
            ) {
                self.ctx
                    .access()
                    .find_role(user.id, domain.id)
                    .await?
                    .is_some()
            } else {
                false
            };
            if !covered {
                report.missing_invitations += 1;
                if fresh {
                    report
                        .unlinked_rows
                        .push((row.username.clone(), row.domain_name.clone()));
                }
            }
        }

        report.unlinked_rows.sort();
        report.unique_domains = staged_names.len();
        report.matched_domains = staged_names.len() - missing_names.len();
        report.duplicate_domains = duplicated_names.len();
        report.missing_domain_names = missing_names.into_iter().map(String::from).collect();
        report.domains_missing_information =
            uninformed_names.into_iter().map(String::from).collect();

        log::info!("{report}");
        Ok(report)
    }

    // ===== 邀请邮件 =====

    /// 向指定联系人对应的暂存行发送邀请邮件
    ///
    /// 发送状态按行记录，重复执行只会触达尚未发出的行。
    /// 发送失败计入报告，下次执行时重试。
    pub async fn send_invitations(&self, emails: &[String]) -> CoreResult<InvitationSendReport> {
        let targets: HashSet<String> = emails
            .iter()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();

        let rows = self.ctx.transition_domains().find_all().await?;
        let mut matched: Vec<TransitionDomain> = rows
            .into_iter()
            .filter(|row| targets.contains(&row.username))
            .collect();
        matched.sort_by(|a, b| a.domain_name.cmp(&b.domain_name));
        log::info!("找到 {} 条过渡域名记录", matched.len());

        let mut report = InvitationSendReport {
            found: matched.len(),
            ..InvitationSendReport::default()
        };
        for mut row in matched {
            if row.email_sent {
                report.already_sent += 1;
                continue;
            }
            let notification =
                Notification::new(NotificationKind::DomainInvitation, &row.username)
                    .with_context(serde_json::json!({ "domain": row.domain_name }));
            match self.ctx.notifier().send(&notification).await {
                Ok(()) => {
                    row.email_sent = true;
                    self.ctx.transition_domains().save(&row).await?;
                    report.sent += 1;
                }
                Err(e) => {
                    log::warn!("向 {} 发送域名邀请失败: {e}", row.username);
                    report.failures.push((row.username.clone(), e.to_string()));
                }
            }
        }

        log::info!("{report}");
        Ok(report)
    }

    /// 依次执行 load、transfer、reconcile，返回最终审计报告
    pub async fn run(&self, files: &MigrationFiles) -> CoreResult<MigrationReport> {
        self.load(files).await?;
        self.transfer().await?;
        self.reconcile().await
    }
}

/// 将 `a|b` 形式的行拆成去除空白的键值对。空行忽略；
/// 字段数不是两个非空字段的行计为格式错误。
fn parse_pairs(contents: &str) -> (Vec<(String, String)>, usize) {
    let mut pairs = Vec::new();
    let mut malformed = 0;
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split('|');
        match (fields.next(), fields.next(), fields.next()) {
            (Some(a), Some(b), None) if !a.trim().is_empty() && !b.trim().is_empty() => {
                pairs.push((a.trim().to_string(), b.trim().to_string()));
            }
            _ => {
                log::warn!("跳过无法解析的行: {line}");
                malformed += 1;
            }
        }
    }
    (pairs, malformed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::InvitationService;
    use crate::test_utils::{create_test_migration_service, test_migration_files, TestHarness};
    use crate::traits::{
        AccessRepository, DomainRepository, TransitionDomainRepository, UserRepository,
    };
    use crate::types::{DomainState, InvitationStatus, User};

    async fn domain_state(h: &TestHarness, name: &str) -> DomainState {
        h.domains
            .find_by_name(name)
            .await
            .unwrap()
            .expect("domain should exist")
            .state
    }

    #[tokio::test]
    async fn load_stages_every_resolved_row() {
        let (service, h) = create_test_migration_service();

        let report = service.load(&test_migration_files()).await.unwrap();

        assert_eq!(report.staged, 8);
        assert_eq!(report.created, 8);
        assert_eq!(report.updated, 0);
        assert_eq!(report.unresolved_contacts, 1);
        assert_eq!(report.malformed_lines, 0);

        let rows = h.transition_domains.find_all().await.unwrap();
        assert_eq!(rows.len(), 8);

        // 查不到邮箱的联系人保留域名，username 为空
        let orphan = h
            .transition_domains
            .find_by_key("anomaly.gov", "")
            .await
            .unwrap()
            .expect("row should be staged");
        assert_eq!(orphan.status, TransitionStatus::Ready);

        let held = h
            .transition_domains
            .find_by_key("parks.gov", "dave@parks.example")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(held.status, TransitionStatus::OnHold);
    }

    #[tokio::test]
    async fn load_refreshes_rows_instead_of_duplicating() {
        let (service, h) = create_test_migration_service();
        service.load(&test_migration_files()).await.unwrap();

        let report = service.load(&test_migration_files()).await.unwrap();

        assert_eq!(report.staged, 8);
        assert_eq!(report.created, 0);
        assert_eq!(report.updated, 8);
        assert_eq!(h.transition_domains.find_all().await.unwrap().len(), 8);
    }

    #[tokio::test]
    async fn malformed_lines_are_skipped_and_counted() {
        let (service, h) = create_test_migration_service();
        let files = MigrationFiles {
            domain_contacts: "dc.gov|C1\nno pipe here\n\n|C2\n".to_string(),
            contacts: "C1|alice@dc.example\nC1|too|many|fields\n".to_string(),
            domain_statuses: "dc.gov|ok\n".to_string(),
        };

        let report = service.load(&files).await.unwrap();

        assert_eq!(report.staged, 1);
        assert_eq!(report.malformed_lines, 3);
        assert_eq!(h.transition_domains.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn audit_counts_every_staged_row_before_transfer() {
        let (service, _h) = create_test_migration_service();
        service.load(&test_migration_files()).await.unwrap();

        let report = service.reconcile().await.unwrap();

        assert_eq!(report.total_rows, 8);
        assert_eq!(report.unique_domains, 4);
        assert_eq!(report.rows_without_contact, 1);
        assert_eq!(report.duplicate_rows, 0);
        assert_eq!(report.matched_domains, 0);
        assert_eq!(report.missing_domains, 8);
        assert_eq!(report.duplicate_domains, 0);
        assert_eq!(report.missing_informations, 8);
        assert_eq!(report.missing_invitations, 8);
        assert_eq!(
            report.missing_domain_names,
            vec!["anomaly.gov", "dc.gov", "parks.gov", "water.gov"]
        );
    }

    #[tokio::test]
    async fn transfer_materializes_trusted_domains() {
        let (service, h) = create_test_migration_service();
        service.load(&test_migration_files()).await.unwrap();

        let report = service.transfer().await.unwrap();

        assert_eq!(report.domains_created, 4);
        assert_eq!(report.domains_existing, 0);
        assert_eq!(report.invitations_created, 7);
        assert_eq!(report.invitations_existing, 0);
        assert_eq!(report.roles_granted, 0);
        assert_eq!(report.rows_without_email, 1);
        assert!(report.invalid_names.is_empty());

        // 旧状态映射决定生命周期状态
        assert_eq!(domain_state(&h, "dc.gov").await, DomainState::Ready);
        assert_eq!(domain_state(&h, "parks.gov").await, DomainState::OnHold);
        assert_eq!(domain_state(&h, "water.gov").await, DomainState::OnHold);
        assert_eq!(domain_state(&h, "anomaly.gov").await, DomainState::Ready);

        // 迁移域名不经过注册局开通
        assert!(h.registry.commands().await.is_empty());

        let audit = service.reconcile().await.unwrap();
        assert_eq!(audit.missing_domains, 0);
        assert_eq!(audit.duplicate_domains, 0);
        assert_eq!(audit.missing_informations, 8);
        assert_eq!(audit.missing_invitations, 1);
        assert_eq!(
            audit.unlinked_rows,
            vec![(String::new(), "anomaly.gov".to_string())]
        );
    }

    #[tokio::test]
    async fn transfer_repeats_without_duplicating() {
        let (service, h) = create_test_migration_service();
        service.load(&test_migration_files()).await.unwrap();
        service.transfer().await.unwrap();

        let report = service.transfer().await.unwrap();

        assert_eq!(report.domains_created, 0);
        assert_eq!(report.domains_existing, 4);
        assert_eq!(report.invitations_created, 0);
        assert_eq!(report.invitations_existing, 7);
        assert_eq!(h.domains.find_all().await.unwrap().len(), 4);
        assert_eq!(h.access.find_all_invitations().await.unwrap().len(), 7);
    }

    #[tokio::test]
    async fn transfer_skips_names_that_fail_validation() {
        let (service, h) = create_test_migration_service();
        let row = TransitionDomain::new("city.com", "mayor@city.example", TransitionStatus::Ready);
        h.transition_domains.save(&row).await.unwrap();

        let report = service.transfer().await.unwrap();

        assert_eq!(report.invalid_names, vec!["city.com".to_string()]);
        assert_eq!(report.domains_created, 0);
        assert!(h.domains.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn transfer_grants_roles_when_the_user_exists() {
        let (service, h) = create_test_migration_service();
        service.load(&test_migration_files()).await.unwrap();
        let dave = User::new("dave", "dave@parks.example");
        h.users.save(&dave).await.unwrap();

        let report = service.transfer().await.unwrap();

        assert_eq!(report.roles_granted, 1);
        assert_eq!(report.invitations_created, 6);

        let parks = h.domains.find_by_name("parks.gov").await.unwrap().unwrap();
        assert!(h
            .access
            .find_role(dave.id, parks.id)
            .await
            .unwrap()
            .is_some());
        // 角色覆盖了 dave 的行，只剩无联系人的行未关联
        let audit = service.reconcile().await.unwrap();
        assert_eq!(audit.missing_invitations, 1);
    }

    #[tokio::test]
    async fn logins_retrieve_invitations_and_close_the_audit() {
        let (service, h) = create_test_migration_service();
        service.load(&test_migration_files()).await.unwrap();
        service.transfer().await.unwrap();

        let logins = InvitationService::new(h.ctx.clone());
        logins.login("Alice@DC.example", "alice").await.unwrap();
        logins.login("dave@parks.example", "dave").await.unwrap();
        logins.login("frank@water.example", "frank").await.unwrap();

        let audit = service.reconcile().await.unwrap();

        // dc、parks、water 在登录时补齐了组织信息记录；
        // anomaly.gov 只剩一条无联系人的未覆盖行
        assert_eq!(audit.missing_domains, 0);
        assert_eq!(audit.missing_informations, 1);
        assert_eq!(audit.missing_invitations, 1);
        assert_eq!(
            audit.domains_missing_information,
            vec!["anomaly.gov".to_string()]
        );

        let invitations = h.access.find_all_invitations().await.unwrap();
        assert_eq!(invitations.len(), 7);
        let retrieved = invitations
            .iter()
            .filter(|i| i.status == InvitationStatus::Retrieved)
            .count();
        assert_eq!(retrieved, 3);
    }

    #[tokio::test]
    async fn invitation_sends_are_tracked_per_row() {
        let (service, h) = create_test_migration_service();
        service.load(&test_migration_files()).await.unwrap();
        service.transfer().await.unwrap();

        let report = service
            .send_invitations(&["Alice@DC.example".to_string()])
            .await
            .unwrap();
        assert_eq!(report.found, 1);
        assert_eq!(report.sent, 1);
        assert_eq!(report.already_sent, 0);

        let sent = h.notifier.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, NotificationKind::DomainInvitation);
        assert_eq!(sent[0].to, "alice@dc.example");

        // 第二次执行跳过已发出的行
        let repeat = service
            .send_invitations(&[
                "alice@dc.example".to_string(),
                "grace@water.example".to_string(),
            ])
            .await
            .unwrap();
        assert_eq!(repeat.found, 2);
        assert_eq!(repeat.sent, 1);
        assert_eq!(repeat.already_sent, 1);

        let row = h
            .transition_domains
            .find_by_key("dc.gov", "alice@dc.example")
            .await
            .unwrap()
            .unwrap();
        assert!(row.email_sent);
    }

    #[tokio::test]
    async fn failed_invitation_sends_stay_pending() {
        let (service, h) = create_test_migration_service();
        service.load(&test_migration_files()).await.unwrap();
        service.transfer().await.unwrap();
        h.notifier
            .set_send_error(Some("smtp unavailable".to_string()))
            .await;

        let report = service
            .send_invitations(&["bob@dc.example".to_string()])
            .await
            .unwrap();

        assert_eq!(report.sent, 0);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, "bob@dc.example");

        let row = h
            .transition_domains
            .find_by_key("dc.gov", "bob@dc.example")
            .await
            .unwrap()
            .unwrap();
        assert!(!row.email_sent);
    }

    #[tokio::test]
    async fn run_chains_the_stages() {
        let (service, h) = create_test_migration_service();

        let audit = service.run(&test_migration_files()).await.unwrap();

        assert_eq!(audit.total_rows, 8);
        assert_eq!(audit.missing_domains, 0);
        assert_eq!(audit.duplicate_domains, 0);
        assert_eq!(audit.missing_informations, 8);
        assert_eq!(audit.missing_invitations, 1);
        assert_eq!(h.domains.find_all().await.unwrap().len(), 4);
    }
}
