//! 域名申请审核类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dotgov_registry::DomainName;

/// 域名申请的审核状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// 申请人填写中的草稿
    Started,
    /// 已交给审核团队
    Submitted,
    /// 审核进行中
    InReview,
    /// 退回申请人补充信息
    ActionNeeded,
    /// 已批准，域名正在物化
    Approved,
    /// 已驳回，附记录的原因
    Rejected,
    /// 已驳回且申请人被禁止后续操作
    Ineligible,
    /// 申请人主动撤回
    Withdrawn,
}

impl ApplicationStatus {
    /// 当前状态允许迁移到的目标状态
    ///
    /// 此表是审核状态迁移的唯一事实来源，服务层只查询此表。
    /// `Ineligible` 没有常规出口，只有特权 override 能离开。
    #[must_use]
    pub fn allowed_targets(self) -> &'static [ApplicationStatus] {
        match self {
            Self::Started => &[Self::Submitted],
            Self::Submitted => &[
                Self::InReview,
                Self::ActionNeeded,
                Self::Approved,
                Self::Rejected,
                Self::Ineligible,
                Self::Withdrawn,
            ],
            Self::InReview => &[
                Self::Submitted,
                Self::ActionNeeded,
                Self::Approved,
                Self::Rejected,
                Self::Ineligible,
                Self::Withdrawn,
            ],
            Self::ActionNeeded => &[
                Self::InReview,
                Self::Approved,
                Self::Rejected,
                Self::Ineligible,
            ],
            Self::Approved => &[
                Self::InReview,
                Self::ActionNeeded,
                Self::Rejected,
                Self::Ineligible,
            ],
            Self::Rejected => &[Self::InReview, Self::ActionNeeded, Self::Approved],
            Self::Ineligible => &[],
            Self::Withdrawn => &[Self::Submitted],
        }
    }

    /// 迁移表是否允许从当前状态移动到 `target`
    #[must_use]
    pub fn can_transition_to(self, target: ApplicationStatus) -> bool {
        self.allowed_targets().contains(&target)
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Started => "started",
            Self::Submitted => "submitted",
            Self::InReview => "in review",
            Self::ActionNeeded => "action needed",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Ineligible => "ineligible",
            Self::Withdrawn => "withdrawn",
        };
        f.write_str(s)
    }
}

/// 申请被驳回的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    PurposeNotMet,
    RequestorNotEligible,
    OrgHasDomain,
    ContactsNotVerified,
    OrgNotEligible,
    NamingNotMet,
    Other,
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::PurposeNotMet => "Purpose requirements not met",
            Self::RequestorNotEligible => "Requestor not eligible to make request",
            Self::OrgHasDomain => "Org already has a .gov domain",
            Self::ContactsNotVerified => "Org contacts couldn't be verified",
            Self::OrgNotEligible => "Org not eligible for a .gov domain",
            Self::NamingNotMet => "Naming requirements not met",
            Self::Other => "Other/Unspecified",
        };
        f.write_str(s)
    }
}

/// 一份 .gov 域名申请
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    /// 申请 ID (UUID)
    pub id: Uuid,
    /// 申请的域名
    pub requested_domain: DomainName,
    /// 创建申请的用户
    pub creator: Uuid,
    /// 审核状态
    pub status: ApplicationStatus,
    /// 申请组织名称
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    /// 域名用途说明
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    /// 驳回后记录的原因
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<RejectionReason>,
    /// 批准时物化的域名（关联期间有值）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_domain: Option<Uuid>,
    /// 最近一次提交审核的时间
    #[serde(default, with = "crate::utils::datetime::option")]
    pub submitted_at: Option<DateTime<Utc>>,
    /// 记录创建时间
    #[serde(with = "crate::utils::datetime")]
    pub created_at: DateTime<Utc>,
    /// 记录更新时间
    #[serde(with = "crate::utils::datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Application {
    /// 创建一份处于 [`ApplicationStatus::Started`] 的草稿申请
    #[must_use]
    pub fn new(creator: Uuid, requested_domain: DomainName) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            requested_domain,
            creator,
            status: ApplicationStatus::Started,
            organization_name: None,
            purpose: None,
            rejection_reason: None,
            approved_domain: None,
            submitted_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}
