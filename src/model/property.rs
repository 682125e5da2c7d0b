//! 属性节点模型：可编辑树节点、JSON Schema 线格式与示例种子格式

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// 默认的 `$schema` 取值
pub const DEFAULT_SCHEMA_VERSION: &str = "http://json-schema.org/draft-07/schema#";

/// 数组元素描述符的固定名称
pub const ITEM_NAME: &str = "item";

/// 属性类型（仅建模 JSON Schema 的七种基本类型）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    #[default]
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
}

impl PropertyType {
    pub const ALL: [PropertyType; 7] = [
        PropertyType::String,
        PropertyType::Number,
        PropertyType::Integer,
        PropertyType::Boolean,
        PropertyType::Array,
        PropertyType::Object,
        PropertyType::Null,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PropertyType::String => "string",
            PropertyType::Number => "number",
            PropertyType::Integer => "integer",
            PropertyType::Boolean => "boolean",
            PropertyType::Array => "array",
            PropertyType::Object => "object",
            PropertyType::Null => "null",
        }
    }

    /// 按 JSON Schema 类型名解析
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    /// 是否为数值类型（可携带 minimum/maximum）
    pub fn is_numeric(self) -> bool {
        matches!(self, PropertyType::Number | PropertyType::Integer)
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 可编辑的属性节点
///
/// `minimum`/`maximum` 以 JSON 数字原样保存，整数边界不会变成浮点。
///
/// 与当前 `type` 不一致的字段（例如切换成 boolean 后残留的 `enum`）会保留在内存里，
/// 只在生成 Schema 时被忽略，这样把类型切回去之后先前的输入还在。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemaProperty {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PropertyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaProperty>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<SchemaProperty>>,
}

impl SchemaProperty {
    /// 新建空白节点：`string` 类型、非必填、名称与描述为空
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: Some(String::new()),
            ..Self::default()
        }
    }

    /// 为 `parent_id` 生成数组元素描述符（只携带类型）
    pub fn item_descriptor(parent_id: &str, kind: PropertyType) -> Self {
        Self {
            id: format!("{parent_id}-item"),
            name: ITEM_NAME.to_string(),
            kind,
            ..Self::default()
        }
    }

    /// 直接子节点（没有时为空切片）
    pub fn children(&self) -> &[SchemaProperty] {
        self.properties.as_deref().unwrap_or(&[])
    }

    /// 可折叠：object 类型且至少有一个子节点
    pub fn is_collapsible(&self) -> bool {
        self.kind == PropertyType::Object && !self.children().is_empty()
    }

    /// 应用单字段更新，其余字段（包括 `id`）保持不变
    pub fn apply(&mut self, update: PropertyUpdate) {
        match update {
            PropertyUpdate::Name(v) => self.name = v,
            PropertyUpdate::Type(v) => self.kind = v,
            PropertyUpdate::Description(v) => self.description = v,
            PropertyUpdate::Required(v) => self.required = v,
            PropertyUpdate::Enum(v) => self.enum_values = v,
            PropertyUpdate::Minimum(v) => self.minimum = v,
            PropertyUpdate::Maximum(v) => self.maximum = v,
            PropertyUpdate::Items(v) => self.items = v,
            PropertyUpdate::Properties(v) => self.properties = v,
        }
    }
}

/// 单字段更新：对应 UI 上一次表单编辑
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum PropertyUpdate {
    Name(String),
    Type(PropertyType),
    Description(Option<String>),
    Required(bool),
    Enum(Option<Vec<Value>>),
    Minimum(Option<Number>),
    Maximum(Option<Number>),
    Items(Option<Box<SchemaProperty>>),
    Properties(Option<Vec<SchemaProperty>>),
}

fn default_object_type() -> String {
    PropertyType::Object.as_str().to_string()
}

/// 线格式中的单个属性
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JsonSchemaProperty {
    #[serde(rename = "type", default)]
    pub kind: PropertyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<JsonSchemaProperty>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, JsonSchemaProperty>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

/// 根 Schema 文档（线格式）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonSchema {
    #[serde(rename = "$schema")]
    pub schema: String,
    #[serde(rename = "type", default = "default_object_type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub properties: IndexMap<String, JsonSchemaProperty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

/// 示例中的数组元素描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleItems {
    #[serde(rename = "type")]
    pub kind: PropertyType,
}

/// 示例种子属性：手写的字面量结构，只在加载时读取一次
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleProperty {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PropertyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<SampleItems>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<SampleProperty>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSchema {
    pub title: String,
    pub description: String,
    pub properties: Vec<SampleProperty>,
}

/// 节点 id 生成器：单调递增计数器，删除后的 id 不会再次分配
#[derive(Debug, Clone)]
pub struct IdGenerator {
    prefix: String,
    next: u64,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::with_prefix("prop")
    }
}

impl IdGenerator {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }

    pub fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
