//! 生命周期钩子与实例初始化阶段

use crate::errors::LifecycleError;

/// 生命周期钩子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LifecycleHook {
    BeforeCreate,
    Created,
    BeforeMount,
    Mounted,
    BeforeUpdate,
    Updated,
    BeforeDestroy,
    Destroyed,
    Activated,
    Deactivated,
    ErrorCaptured,
}

impl LifecycleHook {
    /// 所有钩子，按触发顺序排列
    pub const ALL: [LifecycleHook; 11] = [
        Self::BeforeCreate,
        Self::Created,
        Self::BeforeMount,
        Self::Mounted,
        Self::BeforeUpdate,
        Self::Updated,
        Self::BeforeDestroy,
        Self::Destroyed,
        Self::Activated,
        Self::Deactivated,
        Self::ErrorCaptured,
    ];

    /// 钩子在选项中的名称
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BeforeCreate => "beforeCreate",
            Self::Created => "created",
            Self::BeforeMount => "beforeMount",
            Self::Mounted => "mounted",
            Self::BeforeUpdate => "beforeUpdate",
            Self::Updated => "updated",
            Self::BeforeDestroy => "beforeDestroy",
            Self::Destroyed => "destroyed",
            Self::Activated => "activated",
            Self::Deactivated => "deactivated",
            Self::ErrorCaptured => "errorCaptured",
        }
    }
}

/// 实例初始化阶段
///
/// 阶段只能按声明顺序逐个前进，不可跳过，也不可回退。
/// 唯一的例外是 `Created` 之后的挂载是可选的。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum InitPhase {
    #[default]
    Unconstructed,
    OptionsResolved,
    BeforeCreateFired,
    InjectionsInstalled,
    StateInitialized,
    ProvisionsInstalled,
    Created,
    Mounted,
}

impl InitPhase {
    /// 下一个阶段
    pub fn next(self) -> Option<InitPhase> {
        match self {
            Self::Unconstructed => Some(Self::OptionsResolved),
            Self::OptionsResolved => Some(Self::BeforeCreateFired),
            Self::BeforeCreateFired => Some(Self::InjectionsInstalled),
            Self::InjectionsInstalled => Some(Self::StateInitialized),
            Self::StateInitialized => Some(Self::ProvisionsInstalled),
            Self::ProvisionsInstalled => Some(Self::Created),
            Self::Created => Some(Self::Mounted),
            Self::Mounted => None,
        }
    }

    /// 校验并返回目标阶段
    pub fn advance_to(self, to: InitPhase) -> Result<InitPhase, LifecycleError> {
        if self.next() == Some(to) {
            Ok(to)
        } else {
            Err(LifecycleError::InvalidTransition { from: self, to })
        }
    }

    /// `created` 钩子是否已经触发
    pub fn is_created(self) -> bool {
        self >= Self::Created
    }
}
