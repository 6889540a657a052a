//! 旧注册商迁移相关类型定义
//!
//! 旧注册商迁出的数据以平面导出文件到达。行先暂存为
//! [`TransitionDomain`] 记录，再物化为真实域名与邀请，
//! 最后与本地状态做审计。此处的报告类型是各批处理阶段的返回值。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::DomainState;

/// 暂存行携带的旧注册商域名状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionStatus {
    /// 域名在旧注册商处为在线状态
    Ready,
    /// 域名在旧注册商处处于保留状态
    OnHold,
}

impl TransitionStatus {
    /// 映射旧导出文件中的原始状态标记。两种来源的保留标记都算保留，
    /// 其余一切（包括 `ok`）视为在线。
    #[must_use]
    pub fn from_legacy(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "serverhold" | "clienthold" => Self::OnHold,
            _ => Self::Ready,
        }
    }

    /// 由该行物化的域名的初始生命周期状态
    #[must_use]
    pub fn domain_state(self) -> DomainState {
        match self {
            Self::Ready => DomainState::Ready,
            Self::OnHold => DomainState::OnHold,
        }
    }
}

/// 旧导出文件的一条暂存行，即 (域名, 联系人邮箱) 对
///
/// 自然键为 `(domain_name, username)`，一个域名带三个联系人暂存三行。
/// 导出引用的联系人 ID 查不到邮箱时 `username` 为空。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionDomain {
    /// 行 ID (UUID)
    pub id: Uuid,
    /// 旧导出中的联系人邮箱，统一小写，可能为空
    pub username: String,
    /// 导出的域名，统一小写
    pub domain_name: String,
    /// 从旧注册商带过来的状态
    pub status: TransitionStatus,
    /// 该行的邀请邮件是否已发出
    pub email_sent: bool,
    /// 记录创建时间
    #[serde(with = "crate::utils::datetime")]
    pub created_at: DateTime<Utc>,
}

impl TransitionDomain {
    /// 暂存一行，两个键字段都做归一化
    #[must_use]
    pub fn new(domain_name: &str, username: &str, status: TransitionStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.trim().to_lowercase(),
            domain_name: domain_name.trim().to_lowercase(),
            status,
            email_sent: false,
            created_at: Utc::now(),
        }
    }
}

/// 旧注册商导出的三个平面文件的原始内容
///
/// 每个文件每行一条竖线分隔的记录：
/// 域名→联系人 ID、联系人 ID→邮箱、域名→状态。
#[derive(Debug, Clone)]
pub struct MigrationFiles {
    /// `domain|contactId` 行
    pub domain_contacts: String,
    /// `contactId|email` 行
    pub contacts: String,
    /// `domain|status` 行
    pub domain_statuses: String,
}

/// load 阶段的结果
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    /// 从导出中处理的行数
    pub staged: usize,
    /// 首次暂存的行数
    pub created: usize,
    /// 已存在并被刷新的行数
    pub updated: usize,
    /// 无法解析被跳过的行数
    pub malformed_lines: usize,
    /// 联系人 ID 查不到邮箱的行数
    pub unresolved_contacts: usize,
}

impl std::fmt::Display for LoadReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Staged {} transition domains ({} new, {} updated, {} unresolved contacts, {} malformed lines)",
            self.staged, self.created, self.updated, self.unresolved_contacts, self.malformed_lines
        )
    }
}

/// transfer 阶段的结果
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferReport {
    /// 本次物化的域名数
    pub domains_created: usize,
    /// 本地已有域名的暂存名数
    pub domains_existing: usize,
    /// 本次创建的邀请数
    pub invitations_created: usize,
    /// 已有邀请的 (邮箱, 域名) 对数
    pub invitations_existing: usize,
    /// 用户已存在而直接授予的角色数
    pub roles_granted: usize,
    /// 没有邮箱而跳过邀请的行数
    pub rows_without_email: usize,
    /// 校验失败被跳过的暂存名
    pub invalid_names: Vec<String>,
}

impl std::fmt::Display for TransferReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Transferred transition domains: {} domains created ({} existing), {} invitations created ({} existing), {} roles granted, {} rows without email",
            self.domains_created,
            self.domains_existing,
            self.invitations_created,
            self.invitations_existing,
            self.roles_granted,
            self.rows_without_email
        )?;
        if !self.invalid_names.is_empty() {
            write!(f, ", {} invalid names skipped", self.invalid_names.len())?;
        }
        Ok(())
    }
}

/// 暂存行与本地状态的只读审计
///
/// 按行计数沿用旧工具的差异上报口径：每条暂存行都检查一次，
/// 同一域名以三个联系人暂存且未迁移时记三条缺失，
/// 没有联系人邮箱的行永远计入邀请覆盖缺失。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    /// 检查的暂存行数
    pub total_rows: usize,
    /// 暂存行中的不同域名数
    pub unique_domains: usize,
    /// 与其他行共享 (域名, 邮箱) 键的行数
    pub duplicate_rows: usize,
    /// 匹配到多个本地域名的暂存名数
    pub duplicate_domains: usize,
    /// 匹配到本地域名的不同暂存名数
    pub matched_domains: usize,
    /// 域名没有本地记录的行数
    pub missing_domains: usize,
    /// 域名缺少组织信息记录的行数
    pub missing_informations: usize,
    /// 没有邀请或现任管理员覆盖的行数
    pub missing_invitations: usize,
    /// 没有联系人邮箱的行数
    pub rows_without_contact: usize,
    /// 没有本地域名的不同名称
    pub missing_domain_names: Vec<String>,
    /// 缺少组织信息记录的不同名称
    pub domains_missing_information: Vec<String>,
    /// 缺少邀请覆盖的 (邮箱, 域名) 对，邮箱可能为空
    pub unlinked_rows: Vec<(String, String)>,
}

impl std::fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Transition domain audit:")?;
        writeln!(
            f,
            "  staged rows: {} ({} unique domains, {} without contact, {} duplicates)",
            self.total_rows, self.unique_domains, self.rows_without_contact, self.duplicate_rows
        )?;
        writeln!(
            f,
            "  domains: {} matched, {} rows missing, {} duplicated",
            self.matched_domains, self.missing_domains, self.duplicate_domains
        )?;
        writeln!(
            f,
            "  invitations: {} rows missing coverage",
            self.missing_invitations
        )?;
        write!(
            f,
            "  domain information: {} rows missing",
            self.missing_informations
        )?;
        if !self.missing_domain_names.is_empty() {
            write!(f, "\n  missing domains: {}", self.missing_domain_names.join(", "))?;
        }
        if !self.domains_missing_information.is_empty() {
            write!(
                f,
                "\n  domains without information: {}",
                self.domains_missing_information.join(", ")
            )?;
        }
        Ok(())
    }
}

/// 邀请邮件发送的结果
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationSendReport {
    /// 匹配到指定邮箱的暂存行数
    pub found: usize,
    /// 发出的邀请邮件数
    pub sent: usize,
    /// 邀请已发出而跳过的行数
    pub already_sent: usize,
    /// 发送失败的 (邮箱, 错误) 对
    pub failures: Vec<(String, String)>,
}

impl std::fmt::Display for InvitationSendReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Sent {} domain invitation emails ({} rows matched, {} already sent, {} failed)",
            self.sent,
            self.found,
            self.already_sent,
            self.failures.len()
        )
    }
}
