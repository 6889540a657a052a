//! 测试辅助模块
//!
//! 提供 mock 实现、内存仓库和迁移测试夹具。

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use dotgov_registry::{
    CreateDomainRequest, CreatedDomain, DomainAvailability, DomainChanges, DomainName,
    RegistryClient, RegistryDomainInfo, RegistryError, RegistryStatus,
};

use crate::error::{CoreError, CoreResult};
use crate::services::{
    ApplicationService, DomainService, InvitationService, MigrationService, ServiceContext,
};
use crate::traits::{
    AccessRepository, ApplicationRepository, DomainInformationRepository, DomainRepository,
    Notifier, TransitionDomainRepository, UserRepository,
};
use crate::types::{
    Application, Domain, DomainInformation, DomainInvitation, MigrationFiles, Notification,
    TransitionDomain, User, UserDomainRole,
};

// ===== MockRegistryClient =====

/// 注册局收到的命令（按调用顺序记录）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryCommand {
    /// check 命令及查询的域名
    Check(Vec<String>),
    /// create 命令及域名
    Create(String),
    /// update 命令及域名
    Update(String),
    /// delete 命令及域名
    Delete(String),
    /// info 命令及域名
    Info(String),
}

pub struct MockRegistryClient {
    commands: RwLock<Vec<RegistryCommand>>,
    /// 如果 Some，`create_domain` 返回此错误
    create_error: RwLock<Option<RegistryError>>,
    update_error: RwLock<Option<RegistryError>>,
    delete_error: RwLock<Option<RegistryError>>,
    info_error: RwLock<Option<RegistryError>>,
    /// check 时视为已被占用的域名
    unavailable: RwLock<HashSet<String>>,
    /// `domain_info` 的自定义应答（默认为一条活跃记录）
    info_response: RwLock<Option<RegistryDomainInfo>>,
}

impl MockRegistryClient {
    pub fn new() -> Self {
        Self {
            commands: RwLock::new(Vec::new()),
            create_error: RwLock::new(None),
            update_error: RwLock::new(None),
            delete_error: RwLock::new(None),
            info_error: RwLock::new(None),
            unavailable: RwLock::new(HashSet::new()),
            info_response: RwLock::new(None),
        }
    }

    /// 已发出的命令快照
    pub async fn commands(&self) -> Vec<RegistryCommand> {
        self.commands.read().await.clone()
    }

    pub async fn set_create_error(&self, err: Option<RegistryError>) {
        *self.create_error.write().await = err;
    }

    pub async fn set_update_error(&self, err: Option<RegistryError>) {
        *self.update_error.write().await = err;
    }

    pub async fn set_delete_error(&self, err: Option<RegistryError>) {
        *self.delete_error.write().await = err;
    }

    pub async fn set_info_error(&self, err: Option<RegistryError>) {
        *self.info_error.write().await = err;
    }

    /// 将域名标记为已被占用
    pub async fn set_unavailable(&self, name: &str) {
        self.unavailable.write().await.insert(name.to_string());
    }

    pub async fn set_info(&self, info: RegistryDomainInfo) {
        *self.info_response.write().await = Some(info);
    }
}

#[async_trait]
impl RegistryClient for MockRegistryClient {
    async fn check(&self, names: &[DomainName]) -> dotgov_registry::Result<Vec<DomainAvailability>> {
        self.commands.write().await.push(RegistryCommand::Check(
            names.iter().map(ToString::to_string).collect(),
        ));
        let unavailable = self.unavailable.read().await;
        Ok(names
            .iter()
            .map(|name| {
                let taken = unavailable.contains(name.as_str());
                DomainAvailability {
                    name: name.clone(),
                    available: !taken,
                    reason: taken.then(|| "In use".to_string()),
                }
            })
            .collect())
    }

    async fn create_domain(
        &self,
        request: &CreateDomainRequest,
    ) -> dotgov_registry::Result<CreatedDomain> {
        self.commands
            .write()
            .await
            .push(RegistryCommand::Create(request.name.to_string()));
        if let Some(err) = self.create_error.read().await.clone() {
            return Err(err);
        }
        Ok(CreatedDomain {
            name: request.name.clone(),
            created_at: Utc::now(),
        })
    }

    async fn update_domain(
        &self,
        name: &DomainName,
        _changes: &DomainChanges,
    ) -> dotgov_registry::Result<()> {
        self.commands
            .write()
            .await
            .push(RegistryCommand::Update(name.to_string()));
        if let Some(err) = self.update_error.read().await.clone() {
            return Err(err);
        }
        Ok(())
    }

    async fn delete_domain(&self, name: &DomainName) -> dotgov_registry::Result<()> {
        self.commands
            .write()
            .await
            .push(RegistryCommand::Delete(name.to_string()));
        if let Some(err) = self.delete_error.read().await.clone() {
            return Err(err);
        }
        Ok(())
    }

    async fn domain_info(&self, name: &DomainName) -> dotgov_registry::Result<RegistryDomainInfo> {
        self.commands
            .write()
            .await
            .push(RegistryCommand::Info(name.to_string()));
        if let Some(err) = self.info_error.read().await.clone() {
            return Err(err);
        }
        if let Some(info) = self.info_response.read().await.clone() {
            return Ok(info);
        }
        Ok(RegistryDomainInfo {
            name: name.clone(),
            statuses: vec![RegistryStatus::Ok],
            created_at: Some(Utc::now() - Duration::days(30)),
            expires_at: Some(Utc::now() + Duration::days(335)),
            nameservers: Vec::new(),
            contacts: Vec::new(),
        })
    }
}

// ===== MockNotifier =====

pub struct MockNotifier {
    sent: RwLock<Vec<Notification>>,
    /// 如果 Some，send 时返回此错误
    send_error: RwLock<Option<String>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            sent: RwLock::new(Vec::new()),
            send_error: RwLock::new(None),
        }
    }

    /// 已发送的通知快照
    pub async fn sent(&self) -> Vec<Notification> {
        self.sent.read().await.clone()
    }

    pub async fn set_send_error(&self, err: Option<String>) {
        *self.send_error.write().await = err;
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(&self, notification: &Notification) -> CoreResult<()> {
        if let Some(ref msg) = *self.send_error.read().await {
            return Err(CoreError::NotificationError(msg.clone()));
        }
        self.sent.write().await.push(notification.clone());
        Ok(())
    }
}

// ===== MockDomainRepository =====

pub struct MockDomainRepository {
    domains: RwLock<HashMap<Uuid, Domain>>,
    /// 如果 Some，save 时返回此错误（用于测试失败路径）
    save_error: RwLock<Option<String>>,
}

impl MockDomainRepository {
    pub fn new() -> Self {
        Self {
            domains: RwLock::new(HashMap::new()),
            save_error: RwLock::new(None),
        }
    }

    pub async fn set_save_error(&self, err: Option<String>) {
        *self.save_error.write().await = err;
    }
}

#[async_trait]
impl DomainRepository for MockDomainRepository {
    async fn find_all(&self) -> CoreResult<Vec<Domain>> {
        Ok(self.domains.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> CoreResult<Option<Domain>> {
        Ok(self.domains.read().await.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> CoreResult<Option<Domain>> {
        Ok(self
            .domains
            .read()
            .await
            .values()
            .find(|d| d.name.as_str() == name)
            .cloned())
    }

    async fn save(&self, domain: &Domain) -> CoreResult<()> {
        if let Some(ref msg) = *self.save_error.read().await {
            return Err(CoreError::StorageError(msg.clone()));
        }
        self.domains
            .write()
            .await
            .insert(domain.id, domain.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> CoreResult<()> {
        self.domains.write().await.remove(&id);
        Ok(())
    }
}

// ===== MockDomainInformationRepository =====

pub struct MockDomainInformationRepository {
    infos: RwLock<HashMap<Uuid, DomainInformation>>,
}

impl MockDomainInformationRepository {
    pub fn new() -> Self {
        Self {
            infos: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl DomainInformationRepository for MockDomainInformationRepository {
    async fn find_all(&self) -> CoreResult<Vec<DomainInformation>> {
        Ok(self.infos.read().await.values().cloned().collect())
    }

    async fn find_by_domain(&self, domain_id: Uuid) -> CoreResult<Option<DomainInformation>> {
        Ok(self
            .infos
            .read()
            .await
            .values()
            .find(|i| i.domain_id == domain_id)
            .cloned())
    }

    async fn save(&self, info: &DomainInformation) -> CoreResult<()> {
        self.infos.write().await.insert(info.id, info.clone());
        Ok(())
    }

    async fn delete_by_domain(&self, domain_id: Uuid) -> CoreResult<()> {
        self.infos
            .write()
            .await
            .retain(|_, i| i.domain_id != domain_id);
        Ok(())
    }
}

// ===== MockApplicationRepository =====

pub struct MockApplicationRepository {
    applications: RwLock<HashMap<Uuid, Application>>,
}

impl MockApplicationRepository {
    pub fn new() -> Self {
        Self {
            applications: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl ApplicationRepository for MockApplicationRepository {
    async fn find_all(&self) -> CoreResult<Vec<Application>> {
        Ok(self.applications.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> CoreResult<Option<Application>> {
        Ok(self.applications.read().await.get(&id).cloned())
    }

    async fn find_by_creator(&self, creator: Uuid) -> CoreResult<Vec<Application>> {
        Ok(self
            .applications
            .read()
            .await
            .values()
            .filter(|a| a.creator == creator)
            .cloned()
            .collect())
    }

    async fn save(&self, application: &Application) -> CoreResult<()> {
        self.applications
            .write()
            .await
            .insert(application.id, application.clone());
        Ok(())
    }
}

// ===== MockUserRepository =====

pub struct MockUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_id(&self, id: Uuid) -> CoreResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> CoreResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn save(&self, user: &User) -> CoreResult<()> {
        self.users.write().await.insert(user.id, user.clone());
        Ok(())
    }
}

// ===== MockTransitionDomainRepository =====

pub struct MockTransitionDomainRepository {
    /// 以 (`domain_name`, `username`) 为自然键
    rows: RwLock<HashMap<(String, String), TransitionDomain>>,
}

impl MockTransitionDomainRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl TransitionDomainRepository for MockTransitionDomainRepository {
    async fn find_all(&self) -> CoreResult<Vec<TransitionDomain>> {
        Ok(self.rows.read().await.values().cloned().collect())
    }

    async fn find_by_key(
        &self,
        domain_name: &str,
        username: &str,
    ) -> CoreResult<Option<TransitionDomain>> {
        Ok(self
            .rows
            .read()
            .await
            .get(&(domain_name.to_string(), username.to_string()))
            .cloned())
    }

    async fn save(&self, row: &TransitionDomain) -> CoreResult<()> {
        self.rows
            .write()
            .await
            .insert((row.domain_name.clone(), row.username.clone()), row.clone());
        Ok(())
    }
}

// ===== MockAccessRepository =====

pub struct MockAccessRepository {
    invitations: RwLock<HashMap<Uuid, DomainInvitation>>,
    /// 以 (`user_id`, `domain_id`) 为键
    roles: RwLock<HashMap<(Uuid, Uuid), UserDomainRole>>,
}

impl MockAccessRepository {
    pub fn new() -> Self {
        Self {
            invitations: RwLock::new(HashMap::new()),
            roles: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl AccessRepository for MockAccessRepository {
    async fn find_all_invitations(&self) -> CoreResult<Vec<DomainInvitation>> {
        Ok(self.invitations.read().await.values().cloned().collect())
    }

    async fn find_invitation(
        &self,
        email: &str,
        domain_name: &str,
    ) -> CoreResult<Option<DomainInvitation>> {
        Ok(self
            .invitations
            .read()
            .await
            .values()
            .find(|i| i.email == email && i.domain_name == domain_name)
            .cloned())
    }

    async fn invitations_for_email(&self, email: &str) -> CoreResult<Vec<DomainInvitation>> {
        Ok(self
            .invitations
            .read()
            .await
            .values()
            .filter(|i| i.email == email)
            .cloned()
            .collect())
    }

    async fn save_invitation(&self, invitation: &DomainInvitation) -> CoreResult<()> {
        self.invitations
            .write()
            .await
            .insert(invitation.id, invitation.clone());
        Ok(())
    }

    async fn find_role(
        &self,
        user_id: Uuid,
        domain_id: Uuid,
    ) -> CoreResult<Option<UserDomainRole>> {
        Ok(self
            .roles
            .read()
            .await
            .get(&(user_id, domain_id))
            .cloned())
    }

    async fn save_role(&self, role: &UserDomainRole) -> CoreResult<()> {
        self.roles
            .write()
            .await
            .insert((role.user_id, role.domain_id), role.clone());
        Ok(())
    }

    async fn delete_roles_for_domain(&self, domain_id: Uuid) -> CoreResult<()> {
        self.roles
            .write()
            .await
            .retain(|(_, d), _| *d != domain_id);
        Ok(())
    }
}

// ===== 工厂方法 =====

/// 测试上下文，持有 `ServiceContext` 及全部 mock，便于注入与断言
pub struct TestHarness {
    pub ctx: Arc<ServiceContext>,
    pub registry: Arc<MockRegistryClient>,
    pub notifier: Arc<MockNotifier>,
    pub domains: Arc<MockDomainRepository>,
    pub domain_information: Arc<MockDomainInformationRepository>,
    pub applications: Arc<MockApplicationRepository>,
    pub users: Arc<MockUserRepository>,
    pub transition_domains: Arc<MockTransitionDomainRepository>,
    pub access: Arc<MockAccessRepository>,
}

/// 创建测试用 `ServiceContext`
pub fn create_test_context() -> TestHarness {
    let registry = Arc::new(MockRegistryClient::new());
    let notifier = Arc::new(MockNotifier::new());
    let domains = Arc::new(MockDomainRepository::new());
    let domain_information = Arc::new(MockDomainInformationRepository::new());
    let applications = Arc::new(MockApplicationRepository::new());
    let users = Arc::new(MockUserRepository::new());
    let transition_domains = Arc::new(MockTransitionDomainRepository::new());
    let access = Arc::new(MockAccessRepository::new());

    let ctx = Arc::new(ServiceContext::new(
        registry.clone(),
        notifier.clone(),
        domains.clone(),
        domain_information.clone(),
        applications.clone(),
        users.clone(),
        transition_domains.clone(),
        access.clone(),
    ));

    TestHarness {
        ctx,
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

/// 创建测试用 `DomainService`
pub fn create_test_domain_service() -> (DomainService, TestHarness) {
    let harness = create_test_context();
    let service = DomainService::new(harness.ctx.clone());
    (service, harness)
}

/// 创建测试用 `ApplicationService`
pub fn create_test_application_service() -> (ApplicationService, TestHarness) {
    let harness = create_test_context();
    let service = ApplicationService::new(harness.ctx.clone());
    (service, harness)
}

/// 创建测试用 `MigrationService`
pub fn create_test_migration_service() -> (MigrationService, TestHarness) {
    let harness = create_test_context();
    let service = MigrationService::new(harness.ctx.clone());
    (service, harness)
}

/// 创建测试用 `InvitationService`
pub fn create_test_invitation_service() -> (InvitationService, TestHarness) {
    let harness = create_test_context();
    let service = InvitationService::new(harness.ctx.clone());
    (service, harness)
}

// ===== 迁移测试夹具 =====

/// 旧注册商导出：`domain|contactId`
pub const TEST_DOMAIN_CONTACTS: &str = "\
dc.gov|C1
dc.gov|C2
dc.gov|C3
parks.gov|C4
parks.gov|C5
water.gov|C6
water.gov|C7
anomaly.gov|C9
";

/// 旧注册商导出：`contactId|email`（C9 故意缺失）
pub const TEST_CONTACTS: &str = "\
C1|Alice@DC.example
C2|bob@dc.example
C3|carol@dc.example
C4|dave@parks.example
C5|erin@parks.example
C6|frank@water.example
C7|grace@water.example
";

/// 旧注册商导出：`domain|status`
pub const TEST_DOMAIN_STATUSES: &str = "\
dc.gov|ok
parks.gov|serverHold
water.gov|clientHold
anomaly.gov|ok
";

/// 组装一套完整的迁移导出文件
#[must_use]
pub fn test_migration_files() -> MigrationFiles {
    MigrationFiles {
        domain_contacts: TEST_DOMAIN_CONTACTS.to_string(),
        contacts: TEST_CONTACTS.to_string(),
        domain_statuses: TEST_DOMAIN_STATUSES.to_string(),
    }
}
