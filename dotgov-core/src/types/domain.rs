//! 域名生命周期类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dotgov_registry::{DomainName, Nameserver};

/// 域名可对外解析所需的最少委派数
pub const MIN_NAMESERVERS: usize = 2;

/// 注册局日期缓存的有效期（秒），过期后需要重新发 info 命令
pub const REGISTRY_CACHE_TTL_SECS: i64 = 3600;

/// 本地域名的生命周期状态
///
/// `Deleted` 为终态：记录保留作账目用途，任何操作都不能离开该状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainState {
    /// 本地有记录，注册局尚未注册
    Unknown,
    /// 已注册，委派数不足 [`MIN_NAMESERVERS`]
    DnsNeeded,
    /// 已注册且可对外解析
    Ready,
    /// 客户端保留中，域名不解析
    OnHold,
    /// 已从注册局删除（终态）
    Deleted,
}

impl DomainState {
    /// 该状态是否不再允许任何生命周期操作
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Deleted)
    }
}

impl std::fmt::Display for DomainState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unknown => "unknown",
            Self::DnsNeeded => "dns_needed",
            Self::Ready => "ready",
            Self::OnHold => "on_hold",
            Self::Deleted => "deleted",
        };
        f.write_str(s)
    }
}

/// 删除请求的结果
///
/// 删除一个已删除的域名是无操作的成功，单独区分上报，
/// 调用方据此选择确认文案。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteOutcome {
    /// 本次调用将域名从注册局删除
    Deleted,
    /// 域名此前已删除，本次未做任何事
    AlreadyDeleted,
}

impl DeleteOutcome {
    /// 面向操作员的确认文案
    #[must_use]
    pub fn message(&self, name: &DomainName) -> String {
        match self {
            Self::Deleted => format!("Domain {name} has been deleted. Thanks!"),
            Self::AlreadyDeleted => "This domain is already deleted".to_string(),
        }
    }
}

/// 本地跟踪的域名
///
/// 除生命周期状态外，注册局对其余数据保持权威；
/// `registry_created_at` / `registry_expires_at` 是通过 info 命令刷新的缓存，
/// `registry_synced_at` 记录刷新时间。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    /// 域名 ID (UUID)
    pub id: Uuid,
    /// 注册的域名
    pub name: DomainName,
    /// 生命周期状态
    pub state: DomainState,
    /// 对外公布的安全联系邮箱（可选）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_contact_email: Option<String>,
    /// 当前委派的域名服务器
    #[serde(default)]
    pub nameservers: Vec<Nameserver>,
    /// 注册局上报的创建日期（缓存）
    #[serde(default, with = "crate::utils::datetime::option")]
    pub registry_created_at: Option<DateTime<Utc>>,
    /// 注册局上报的到期日期（缓存）
    #[serde(default, with = "crate::utils::datetime::option")]
    pub registry_expires_at: Option<DateTime<Utc>>,
    /// 缓存日期的最近刷新时间
    #[serde(default, with = "crate::utils::datetime::option")]
    pub registry_synced_at: Option<DateTime<Utc>>,
    /// 本地记录创建时间
    #[serde(with = "crate::utils::datetime")]
    pub created_at: DateTime<Utc>,
    /// 本地记录更新时间
    #[serde(with = "crate::utils::datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Domain {
    /// 创建一条处于 [`DomainState::Unknown`] 的本地记录
    #[must_use]
    pub fn new(name: DomainName) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            state: DomainState::Unknown,
            security_contact_email: None,
            nameservers: Vec::new(),
            registry_created_at: None,
            registry_expires_at: None,
            registry_synced_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 域名是否在线（已注册、已委派、无保留）
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == DomainState::Ready
    }

    /// 按当前委派数推导的已注册状态
    #[must_use]
    pub fn dns_state(&self) -> DomainState {
        if self.nameservers.len() >= MIN_NAMESERVERS {
            DomainState::Ready
        } else {
            DomainState::DnsNeeded
        }
    }

    /// 缓存的注册局日期是否需要刷新
    #[must_use]
    pub fn registry_data_is_stale(&self, now: DateTime<Utc>) -> bool {
        match self.registry_synced_at {
            Some(synced) => (now - synced).num_seconds() >= REGISTRY_CACHE_TTL_SECS,
            None => true,
        }
    }
}
