//! VM桥接层：把 UI 发来的编辑指令翻译成对 AppState 的调用
//!
//! 指令以 JSON 描述（见 [`EditCommand`]），目标节点用从根开始的路径表示，
//! 路径的每一段既可以是属性名也可以是节点 id。

use serde::Deserialize;

use crate::model::data_core::{AppError, AppState};
use crate::model::property::{PropertyType, PropertyUpdate, SchemaProperty};

// === 常量定义（消除魔法值） ===
pub const STATUS_IMPORTED: &str = "Schema导入完成";
pub const STATUS_SAMPLE_LOADED: &str = "示例加载完成";
pub const STATUS_COPIED: &str = "已复制到剪贴板";
pub const STATUS_SAVED: &str = "Schema已保存";
pub const STATUS_ERROR_PREFIX: &str = "错误: ";

/// 一条编辑指令
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditCommand {
    /// 在 `parent` 下（为空则在根级）追加属性，可顺带设置名称与类型
    Add {
        #[serde(default)]
        parent: Vec<String>,
        #[serde(default)]
        name: Option<String>,
        #[serde(default, rename = "type")]
        kind: Option<PropertyType>,
    },
    Update {
        target: Vec<String>,
        update: PropertyUpdate,
    },
    Remove {
        target: Vec<String>,
    },
    AddEnumValue {
        target: Vec<String>,
        value: String,
    },
    RemoveEnumValue {
        target: Vec<String>,
        index: usize,
    },
    SetItemType {
        target: Vec<String>,
        #[serde(rename = "type")]
        kind: PropertyType,
    },
    SetTitle {
        value: String,
    },
    SetDescription {
        value: String,
    },
    SetSchemaVersion {
        value: String,
    },
    ToggleCollapse {
        target: Vec<String>,
    },
    CollapseAll,
    ExpandAll,
    Import {
        text: String,
    },
    LoadSample {
        name: String,
    },
    Clear,
}

/// 把名称/id 混合路径解析成纯 id 路径；同名兄弟取第一个
pub fn resolve_target(props: &[SchemaProperty], segments: &[String]) -> Option<Vec<String>> {
    let mut level = props;
    let mut out = Vec::with_capacity(segments.len());
    for seg in segments {
        let node = level
            .iter()
            .find(|p| &p.name == seg)
            .or_else(|| level.iter().find(|p| &p.id == seg))?;
        out.push(node.id.clone());
        level = node.children();
    }
    Some(out)
}

fn resolve(state: &AppState, segments: &[String]) -> Option<Vec<String>> {
    let path = resolve_target(&state.properties, segments);
    if path.is_none() {
        tracing::debug!("指令目标不存在，忽略: {:?}", segments);
    }
    path
}

impl EditCommand {
    /// 应用到状态上；目标不存在时静默忽略，只有导入/示例加载会返回错误
    pub fn apply(self, state: &mut AppState) -> Result<(), AppError> {
        match self {
            EditCommand::Add { parent, name, kind } => {
                let id = if parent.is_empty() {
                    Some(state.add_property())
                } else {
                    resolve(state, &parent).and_then(|p| state.add_nested_property(&p))
                };
                if let Some(id) = id {
                    if let Some(path) = state.path_of(&id) {
                        if let Some(name) = name {
                            state.update_property(&path, PropertyUpdate::Name(name));
                        }
                        if let Some(kind) = kind {
                            state.update_property(&path, PropertyUpdate::Type(kind));
                        }
                    }
                }
            }
            EditCommand::Update { target, update } => {
                if let Some(path) = resolve(state, &target) {
                    state.update_property(&path, update);
                }
            }
            EditCommand::Remove { target } => {
                if let Some(path) = resolve(state, &target) {
                    state.remove_property(&path);
                }
            }
            EditCommand::AddEnumValue { target, value } => {
                if let Some(path) = resolve(state, &target) {
                    state.add_enum_value(&path, &value);
                }
            }
            EditCommand::RemoveEnumValue { target, index } => {
                if let Some(path) = resolve(state, &target) {
                    state.remove_enum_value(&path, index);
                }
            }
            EditCommand::SetItemType { target, kind } => {
                if let Some(path) = resolve(state, &target) {
                    state.set_item_type(&path, kind);
                }
            }
            EditCommand::SetTitle { value } => state.title = value,
            EditCommand::SetDescription { value } => state.description = value,
            EditCommand::SetSchemaVersion { value } => state.schema_version = value,
            EditCommand::ToggleCollapse { target } => {
                if let Some(id) = resolve(state, &target).and_then(|p| p.last().cloned()) {
                    state.toggle_collapse(&id);
                }
            }
            EditCommand::CollapseAll => state.collapse_all(),
            EditCommand::ExpandAll => state.expand_all(),
            EditCommand::Import { text } => state.import_schema_str(&text)?,
            EditCommand::LoadSample { name } => state.load_sample_by_name(&name)?,
            EditCommand::Clear => state.clear(),
        }
        Ok(())
    }
}

/// 解析编辑脚本（JSON 数组）
pub fn parse_commands(text: &str) -> Result<Vec<EditCommand>, AppError> {
    Ok(serde_json::from_str(text)?)
}

/// 依次应用指令，遇到第一个错误即停止（之前的修改保留）
pub fn apply_all(state: &mut AppState, commands: Vec<EditCommand>) -> Result<usize, AppError> {
    let total = commands.len();
    for (index, command) in commands.into_iter().enumerate() {
        command.apply(state).inspect_err(|e| {
            tracing::warn!("第 {} 条指令执行失败: {}", index + 1, e);
        })?;
    }
    tracing::info!("编辑脚本执行完成: {} 条指令", total);
    Ok(total)
}
