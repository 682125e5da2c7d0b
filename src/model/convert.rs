//! 树与 JSON Schema 之间的双向转换，以及示例种子的水合
//!
//! 正向转换（树 → Schema）是纯函数：同一棵树总是得到同一份文档。
//! 反向转换不是它的严格逆：数组元素只保留 `type`，元素内部的对象结构会丢失。

use indexmap::IndexMap;

use crate::model::property::{
    IdGenerator, JsonSchema, JsonSchemaProperty, PropertyType, SampleProperty, SchemaProperty,
};

/// 必填且有名称的直接子节点名称列表
fn required_names(props: &[SchemaProperty]) -> Vec<String> {
    props
        .iter()
        .filter(|p| p.required && !p.name.is_empty())
        .map(|p| p.name.clone())
        .collect()
}

fn non_empty(s: &Option<String>) -> Option<String> {
    s.as_ref().filter(|s| !s.is_empty()).cloned()
}

/// 树 → `properties` 映射
///
/// 名称为空的节点被跳过；与当前类型不符的字段（非数值类型上的 minimum/maximum、
/// 非 object 上的子节点、非 array 上的 items）不会输出。
pub fn build_schema_properties(props: &[SchemaProperty]) -> IndexMap<String, JsonSchemaProperty> {
    let mut out = IndexMap::with_capacity(props.len());

    for prop in props {
        if prop.name.is_empty() {
            continue;
        }

        let mut schema = JsonSchemaProperty {
            kind: prop.kind,
            description: non_empty(&prop.description),
            ..JsonSchemaProperty::default()
        };

        if prop.kind == PropertyType::Array {
            if let Some(items) = &prop.items {
                schema.items = Some(Box::new(JsonSchemaProperty {
                    kind: items.kind,
                    description: non_empty(&items.description),
                    ..JsonSchemaProperty::default()
                }));
            }
        }

        if prop.kind == PropertyType::Object && !prop.children().is_empty() {
            schema.properties = Some(build_schema_properties(prop.children()));
            let nested = required_names(prop.children());
            if !nested.is_empty() {
                schema.required = Some(nested);
            }
        }

        if let Some(values) = prop.enum_values.as_ref().filter(|v| !v.is_empty()) {
            schema.enum_values = Some(values.clone());
        }

        if prop.kind.is_numeric() {
            schema.minimum = prop.minimum.clone();
            schema.maximum = prop.maximum.clone();
        }

        // 重名时保留首次出现的位置，值取最后一个
        out.insert(prop.name.clone(), schema);
    }

    out
}

/// 组装根文档；`title`/`description` 为空字符串时省略，根级 `required` 为空时省略
pub fn generate_json_schema(
    props: &[SchemaProperty],
    title: &str,
    description: &str,
    schema_version: &str,
) -> JsonSchema {
    let required = required_names(props);
    JsonSchema {
        schema: schema_version.to_string(),
        kind: PropertyType::Object.as_str().to_string(),
        title: (!title.is_empty()).then(|| title.to_string()),
        description: (!description.is_empty()).then(|| description.to_string()),
        properties: build_schema_properties(props),
        required: (!required.is_empty()).then_some(required),
    }
}

/// `properties` 映射 → 树，按映射的键顺序生成节点并分配新 id
pub fn convert_json_schema_to_properties(
    schema_props: &IndexMap<String, JsonSchemaProperty>,
    required: &[String],
    ids: &mut IdGenerator,
) -> Vec<SchemaProperty> {
    schema_props
        .iter()
        .map(|(name, prop)| {
            let id = ids.next_id();
            let mut converted = SchemaProperty {
                id,
                name: name.clone(),
                kind: prop.kind,
                description: prop.description.clone(),
                required: required.iter().any(|r| r == name),
                enum_values: prop.enum_values.clone(),
                minimum: prop.minimum.clone(),
                maximum: prop.maximum.clone(),
                ..SchemaProperty::default()
            };

            if prop.kind == PropertyType::Array {
                if let Some(items) = &prop.items {
                    converted.items = Some(Box::new(SchemaProperty::item_descriptor(&converted.id, items.kind)));
                }
            }

            if prop.kind == PropertyType::Object {
                if let Some(children) = &prop.properties {
                    let nested_required = prop.required.as_deref().unwrap_or(&[]);
                    converted.properties = Some(convert_json_schema_to_properties(children, nested_required, ids));
                }
            }

            converted
        })
        .collect()
}

/// 示例种子 → 树；id 原样保留，不做任何校验
pub fn convert_to_schema_properties(props: &[SampleProperty]) -> Vec<SchemaProperty> {
    props
        .iter()
        .map(|prop| SchemaProperty {
            id: prop.id.clone(),
            name: prop.name.clone(),
            kind: prop.kind,
            description: prop.description.clone(),
            required: prop.required,
            enum_values: prop.enum_values.clone(),
            minimum: prop.minimum.clone(),
            maximum: prop.maximum.clone(),
            items: prop
                .items
                .as_ref()
                .map(|items| Box::new(SchemaProperty::item_descriptor(&prop.id, items.kind))),
            properties: prop.properties.as_deref().map(convert_to_schema_properties),
        })
        .collect()
}
