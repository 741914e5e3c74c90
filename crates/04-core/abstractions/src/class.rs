//! 组件类
//!
//! 组件类持有静态选项、可选的父类，以及两份缓存：
//! 最近一次观察到的父类选项，和声明时的选项基线。

use crate::options::{ComponentOptions, ModifiedOptions};
use component_common::{next_cid, ClassId};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::fmt;
use std::sync::{Arc, Weak};

/// 组件注册表：名称 -> 组件类
pub type ComponentRegistry = IndexMap<String, ComponentRef>;

/// 注册表中的组件引用
#[derive(Clone)]
pub enum ComponentRef {
    /// 外部注册的组件类
    Class(Arc<ComponentClass>),
    /// 组件类按名称登记自身，弱引用避免选项与类互相持有
    Recursive(Weak<ComponentClass>),
}

impl ComponentRef {
    /// 取得组件类
    pub fn resolve(&self) -> Option<Arc<ComponentClass>> {
        match self {
            Self::Class(class) => Some(Arc::clone(class)),
            Self::Recursive(class) => class.upgrade(),
        }
    }
}

impl fmt::Debug for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(class) => write!(f, "Class(cid={})", class.cid()),
            Self::Recursive(_) => f.write_str("Recursive"),
        }
    }
}

/// 组件类
///
/// 父类只能在声明时指定，因此父类链无环且有限。
pub struct ComponentClass {
    cid: ClassId,
    super_class: Option<Arc<ComponentClass>>,
    options: RwLock<Arc<ComponentOptions>>,
    super_options: RwLock<Option<Arc<ComponentOptions>>>,
    extend_options: RwLock<ComponentOptions>,
    sealed_options: RwLock<Arc<ComponentOptions>>,
}

impl ComponentClass {
    /// 创建没有父类的根类
    pub fn root(options: ComponentOptions) -> Arc<Self> {
        let options = Arc::new(options);
        Arc::new(Self {
            cid: next_cid(),
            super_class: None,
            sealed_options: RwLock::new(Arc::clone(&options)),
            options: RwLock::new(options),
            super_options: RwLock::new(None),
            extend_options: RwLock::new(ComponentOptions::default()),
        })
    }

    /// 创建子类
    ///
    /// `super_options` 是合并时观察到的父类选项，`merged` 是合并结果。
    /// 声明基线在这里记录为 `merged`，若随后还要登记自身，需要再调用 [`ComponentClass::seal`]。
    pub fn derived(
        super_class: Arc<ComponentClass>,
        super_options: Arc<ComponentOptions>,
        extend_options: ComponentOptions,
        merged: ComponentOptions,
    ) -> Arc<Self> {
        let merged = Arc::new(merged);
        Arc::new(Self {
            cid: next_cid(),
            super_class: Some(super_class),
            sealed_options: RwLock::new(Arc::clone(&merged)),
            options: RwLock::new(merged),
            super_options: RwLock::new(Some(super_options)),
            extend_options: RwLock::new(extend_options),
        })
    }

    /// 类标识
    pub fn cid(&self) -> ClassId {
        self.cid
    }

    /// 父类
    pub fn super_class(&self) -> Option<&Arc<ComponentClass>> {
        self.super_class.as_ref()
    }

    /// 当前保存的选项
    pub fn options(&self) -> Arc<ComponentOptions> {
        Arc::clone(&self.options.read())
    }

    /// 替换保存的选项
    pub fn set_options(&self, options: Arc<ComponentOptions>) {
        *self.options.write() = options;
    }

    /// 在声明之后直接修改保存的选项
    ///
    /// 未改动的字段保持原有引用。
    pub fn update_options(&self, update: impl FnOnce(&mut ComponentOptions)) {
        let mut options = self.options.write();
        let mut next = ComponentOptions::clone(&options);
        update(&mut next);
        *options = Arc::new(next);
    }

    /// 组件名称
    pub fn name(&self) -> Option<Arc<str>> {
        self.options.read().name.clone()
    }

    /// 最近一次观察到的父类选项
    pub fn cached_super_options(&self) -> Option<Arc<ComponentOptions>> {
        self.super_options.read().clone()
    }

    /// 记录观察到的父类选项
    pub fn set_cached_super_options(&self, options: Arc<ComponentOptions>) {
        *self.super_options.write() = Some(options);
    }

    /// 声明时传入的选项（可能已叠加过后期修改）
    pub fn extend_options(&self) -> ComponentOptions {
        self.extend_options.read().clone()
    }

    /// 把后期修改的字段叠加到声明时的选项上
    pub fn overlay_extend_options(&self, modified: ModifiedOptions) {
        self.extend_options.write().overlay(modified);
    }

    /// 选项基线
    pub fn sealed_options(&self) -> Arc<ComponentOptions> {
        Arc::clone(&self.sealed_options.read())
    }

    /// 以当前保存的选项作为新的基线
    pub fn seal(&self) {
        let current = self.options();
        *self.sealed_options.write() = current;
    }

    /// 选项中按名称登记类自身
    pub fn register_self(self: &Arc<Self>, options: &mut ComponentOptions) {
        if let Some(name) = options.name.clone() {
            options.register_component(name.as_ref(), ComponentRef::Recursive(Arc::downgrade(self)));
        }
    }

    /// 在当前类的注册表中查找组件
    pub fn lookup_component(&self, name: &str) -> Option<Arc<ComponentClass>> {
        self.options
            .read()
            .components
            .as_ref()?
            .get(name)?
            .resolve()
    }
}

impl fmt::Debug for ComponentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentClass")
            .field("cid", &self.cid)
            .field("name", &self.name())
            .field("super_class", &self.super_class.as_ref().map(|s| s.cid()))
            .finish()
    }
}
