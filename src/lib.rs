//! JSON Schema 属性树引擎
//!
//! 提供可编辑属性树的增删改、树 → JSON Schema 的正向生成、Schema → 树的反向导入、
//! 示例水合以及折叠状态计算。所有操作都是同步的纯数据变换。

pub mod model;
pub mod utils;
pub mod vm;

// 重新导出主要类型
pub use model::data_core::{AppError, AppState};
pub use model::property::{JsonSchema, JsonSchemaProperty, PropertyType, PropertyUpdate, SchemaProperty};
pub use model::shadow_tree::{build_shadow_tree, get_all_property_ids, PropertyRow};
