//! AppState：单个编辑会话的核心状态（一棵属性树 + 文档元信息 + 折叠状态）
//!
//! 每次编辑都生成一棵新树并整体替换旧树，外部永远观察不到半完成的修改。

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

use crate::model::convert::{convert_json_schema_to_properties, convert_to_schema_properties, generate_json_schema};
use crate::model::mutation;
use crate::model::property::{
    IdGenerator, JsonSchema, JsonSchemaProperty, PropertyType, PropertyUpdate, SampleSchema, SchemaProperty,
    DEFAULT_SCHEMA_VERSION,
};
use crate::model::samples::find_sample;
use crate::model::shadow_tree::{build_shadow_tree, path_to, CollapseState, PropertyRow};
use crate::utils::clipboard::{copy_json_to_clipboard, ClipboardError};
use crate::utils::fs::{read_text_file, write_json_file};

/// 标题为空（或清理后为空）时的下载文件名
const DEFAULT_FILE_NAME: &str = "schema.json";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON解析失败: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("无效的Schema: {0}")]
    InvalidSchema(String),
    #[error("未知示例: {0}")]
    UnknownSample(String),
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}

/// 导入时的宽松根结构：先确认 `type`/`properties` 存在再接受
#[derive(Debug, Deserialize)]
struct ImportedSchema {
    #[serde(rename = "$schema", default)]
    schema: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<serde_json::Value>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    properties: Option<IndexMap<String, JsonSchemaProperty>>,
    #[serde(default)]
    required: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub title: String,
    pub description: String,
    pub schema_version: String,
    pub properties: Vec<SchemaProperty>,
    pub collapsed: CollapseState,
    ids: IdGenerator,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            schema_version: DEFAULT_SCHEMA_VERSION.to_string(),
            properties: Vec::new(),
            collapsed: CollapseState::default(),
            ids: IdGenerator::default(),
        }
    }
}

impl AppState {
    /// 根级追加一个空白属性，返回新 id
    pub fn add_property(&mut self) -> String {
        let (tree, id) = mutation::add_property_at(&self.properties, &[], &mut self.ids);
        self.properties = tree;
        id.unwrap_or_default()
    }

    /// 在 `parent_path` 指向的节点下追加子属性；父节点不存在时返回 `None`
    pub fn add_nested_property(&mut self, parent_path: &[String]) -> Option<String> {
        let (tree, id) = mutation::add_property_at(&self.properties, parent_path, &mut self.ids);
        self.properties = tree;
        id
    }

    pub fn update_property(&mut self, path: &[String], update: PropertyUpdate) {
        self.properties = mutation::update_property_at(&self.properties, path, update);
    }

    /// 删除节点（连同子树），并清掉其中各节点的折叠标记
    pub fn remove_property(&mut self, path: &[String]) {
        self.properties = mutation::remove_property_at(&self.properties, path);
        let pruned = self.collapsed.retain_live(&self.properties);
        if pruned > 0 {
            tracing::debug!("清理已删除节点的折叠标记: {} 条", pruned);
        }
    }

    pub fn add_enum_value(&mut self, path: &[String], value: &str) {
        self.properties = mutation::add_enum_value_at(&self.properties, path, value);
    }

    pub fn remove_enum_value(&mut self, path: &[String], index: usize) {
        self.properties = mutation::remove_enum_value_at(&self.properties, path, index);
    }

    pub fn set_item_type(&mut self, path: &[String], kind: PropertyType) {
        self.properties = mutation::set_item_type_at(&self.properties, path, kind);
    }

    /// 按 id 在整棵树中查找路径
    pub fn path_of(&self, id: &str) -> Option<Vec<String>> {
        path_to(&self.properties, id)
    }

    /// 重新生成 Schema 视图（每次读取都完整重算）
    pub fn generate_schema(&self) -> JsonSchema {
        generate_json_schema(&self.properties, &self.title, &self.description, &self.schema_version)
    }

    /// 2 空格缩进的 Schema 文本
    pub fn schema_pretty(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string_pretty(&self.generate_schema())?)
    }

    /// 导入（粘贴）一份 JSON Schema 文本，整体替换当前树
    ///
    /// 文本不是合法 JSON，或根缺少 `type`/`properties` 时拒绝，状态保持不变。
    pub fn import_schema_str(&mut self, text: &str) -> Result<(), AppError> {
        let imported: ImportedSchema = serde_json::from_str(text).map_err(|e| {
            tracing::warn!("导入Schema失败，JSON解析错误: {}", e);
            AppError::Parse(e)
        })?;

        let (Some(_), Some(props)) = (imported.kind.as_ref(), imported.properties.as_ref()) else {
            tracing::warn!("导入Schema失败：根节点缺少 type 或 properties");
            return Err(AppError::InvalidSchema(
                "根节点必须同时包含 \"type\" 与 \"properties\"".into(),
            ));
        };

        let mut ids = self.ids.clone();
        let required = imported.required.as_deref().unwrap_or(&[]);
        let tree = convert_json_schema_to_properties(props, required, &mut ids);

        tracing::info!("导入Schema成功: {} 个根属性", tree.len());
        self.ids = ids;
        self.properties = tree;
        self.collapsed.expand_all();
        if let Some(title) = imported.title {
            self.title = title;
        }
        if let Some(description) = imported.description {
            self.description = description;
        }
        if let Some(schema) = imported.schema {
            self.schema_version = schema;
        }
        Ok(())
    }

    /// 从文件导入 Schema
    pub fn import_file(&mut self, p: &Path) -> Result<(), AppError> {
        let text = read_text_file(p)?;
        self.import_schema_str(&text)
    }

    /// 加载示例：替换标题、描述与整棵树
    pub fn load_sample(&mut self, sample: &SampleSchema) {
        self.title = sample.title.clone();
        self.description = sample.description.clone();
        self.properties = convert_to_schema_properties(&sample.properties);
        self.collapsed.expand_all();
        tracing::info!("示例已加载: {}，{} 个根属性", sample.title, self.properties.len());
    }

    pub fn load_sample_by_name(&mut self, name: &str) -> Result<(), AppError> {
        let sample = find_sample(name)?.ok_or_else(|| AppError::UnknownSample(name.to_string()))?;
        self.load_sample(&sample.schema);
        Ok(())
    }

    /// 清空树与元信息，保留 id 计数器
    pub fn clear(&mut self) {
        self.title.clear();
        self.description.clear();
        self.properties.clear();
        self.collapsed.expand_all();
    }

    pub fn is_collapsed(&self, id: &str) -> bool {
        self.collapsed.is_collapsed(id)
    }

    pub fn toggle_collapse(&mut self, id: &str) -> bool {
        self.collapsed.toggle(id)
    }

    pub fn collapse_all(&mut self) {
        self.collapsed.collapse_all(&self.properties);
    }

    pub fn expand_all(&mut self) {
        self.collapsed.expand_all();
    }

    /// 当前树的影子行（含折叠后的可见性）
    pub fn shadow_rows(&self) -> Vec<PropertyRow> {
        build_shadow_tree(&self.properties, &self.collapsed)
    }

    /// 下载时的默认文件名：`<title>.json`
    ///
    /// 标题来自导入的文档，不可信。路径分隔符与 `..` 会被替换掉，
    /// 保证结果只是一个普通文件名；清理后为空时退回 `schema.json`。
    pub fn default_file_name(&self) -> String {
        let cleaned = self.title.replace(['/', '\\'], "_").replace("..", "_");
        let stem = Path::new(&cleaned)
            .file_name()
            .and_then(|s| s.to_str())
            .map(str::trim)
            .unwrap_or_default();
        if stem.is_empty() || stem.chars().all(|c| c == '.' || c == '_') {
            DEFAULT_FILE_NAME.to_string()
        } else {
            format!("{stem}.json")
        }
    }

    /// 将生成的 Schema 保存到指定路径
    pub fn save_to_file(&self, path: &Path) -> Result<(), AppError> {
        write_json_file(path, &self.generate_schema())?;
        tracing::info!("Schema已保存到: {}", path.display());
        Ok(())
    }

    /// 以默认文件名保存到目录，返回完整路径
    pub fn download_to(&self, dir: &Path) -> Result<PathBuf, AppError> {
        let path = dir.join(self.default_file_name());
        self.save_to_file(&path)?;
        Ok(path)
    }

    /// 复制 Schema 文本到系统剪贴板
    pub fn copy_schema(&self) -> Result<(), AppError> {
        let len = copy_json_to_clipboard(&self.generate_schema())?;
        tracing::info!("Schema已复制到剪贴板，长度: {} 字符", len);
        Ok(())
    }
}
