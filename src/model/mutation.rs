//! 树变更原语：按 id 路径增删改节点
//!
//! 所有函数都接收旧树的切片并返回一棵新树，旧树不会被修改。
//! 路径是从根开始的祖先 id 序列；找不到路径上任何一个 id 时返回未改动的副本。

use serde_json::Value;

use crate::model::property::{IdGenerator, PropertyType, PropertyUpdate, SchemaProperty};

/// 在 `parent_path` 指向的子节点列表上执行 `edit`，返回是否命中
fn edit_children_in_place<F>(nodes: &mut Vec<SchemaProperty>, parent_path: &[String], edit: F) -> bool
where
    F: FnOnce(&mut Vec<SchemaProperty>),
{
    let Some((head, rest)) = parent_path.split_first() else {
        edit(nodes);
        return true;
    };
    let Some(parent) = nodes.iter_mut().find(|n| &n.id == head) else {
        tracing::debug!("路径中的节点不存在，忽略本次变更: {}", head);
        return false;
    };
    let had_list = parent.properties.is_some();
    let children = parent.properties.get_or_insert_with(Vec::new);
    let hit = edit_children_in_place(children, rest, edit);
    // 未命中或删空时不凭空创建子列表
    if !had_list && children.is_empty() {
        parent.properties = None;
    }
    hit
}

fn edit_children<F>(nodes: &[SchemaProperty], parent_path: &[String], edit: F) -> Vec<SchemaProperty>
where
    F: FnOnce(&mut Vec<SchemaProperty>),
{
    let mut out = nodes.to_vec();
    edit_children_in_place(&mut out, parent_path, edit);
    out
}

/// 对 `path` 指向的节点执行 `edit`
fn edit_node<F>(nodes: &[SchemaProperty], path: &[String], edit: F) -> Vec<SchemaProperty>
where
    F: FnOnce(&mut SchemaProperty),
{
    let Some((target, parents)) = path.split_last() else {
        return nodes.to_vec();
    };
    edit_children(nodes, parents, |siblings| {
        match siblings.iter_mut().find(|n| &n.id == target) {
            Some(node) => edit(node),
            None => tracing::debug!("目标节点不存在，忽略本次变更: {}", target),
        }
    })
}

/// 在 `parent_path` 下追加一个新节点（空路径表示根级），返回新树与新节点 id
pub fn add_property_at(
    nodes: &[SchemaProperty],
    parent_path: &[String],
    ids: &mut IdGenerator,
) -> (Vec<SchemaProperty>, Option<String>) {
    let id = ids.next_id();
    let mut added = None;
    let out = edit_children(nodes, parent_path, |siblings| {
        siblings.push(SchemaProperty::new(id.clone()));
        added = Some(id);
    });
    (out, added)
}

/// 替换 `path` 指向节点的单个字段
pub fn update_property_at(nodes: &[SchemaProperty], path: &[String], update: PropertyUpdate) -> Vec<SchemaProperty> {
    edit_node(nodes, path, |node| node.apply(update))
}

/// 删除 `path` 指向的节点及其整棵子树
pub fn remove_property_at(nodes: &[SchemaProperty], path: &[String]) -> Vec<SchemaProperty> {
    let Some((target, parents)) = path.split_last() else {
        return nodes.to_vec();
    };
    edit_children(nodes, parents, |siblings| siblings.retain(|n| &n.id != target))
}

/// 追加一个枚举值；去掉首尾空白后为空则忽略
pub fn add_enum_value_at(nodes: &[SchemaProperty], path: &[String], value: &str) -> Vec<SchemaProperty> {
    if value.trim().is_empty() {
        return nodes.to_vec();
    }
    edit_node(nodes, path, |node| {
        node.enum_values
            .get_or_insert_with(Vec::new)
            .push(Value::String(value.to_string()));
    })
}

/// 按下标删除枚举值，越界时不做任何事
pub fn remove_enum_value_at(nodes: &[SchemaProperty], path: &[String], index: usize) -> Vec<SchemaProperty> {
    edit_node(nodes, path, |node| {
        if let Some(values) = node.enum_values.as_mut() {
            if index < values.len() {
                values.remove(index);
            }
        }
    })
}

/// 设置数组元素类型
pub fn set_item_type_at(nodes: &[SchemaProperty], path: &[String], kind: PropertyType) -> Vec<SchemaProperty> {
    edit_node(nodes, path, |node| {
        node.items = Some(Box::new(SchemaProperty::item_descriptor(&node.id, kind)));
    })
}

/// 按路径查找节点
pub fn find_property<'a>(nodes: &'a [SchemaProperty], path: &[String]) -> Option<&'a SchemaProperty> {
    let (head, rest) = path.split_first()?;
    let node = nodes.iter().find(|n| &n.id == head)?;
    if rest.is_empty() {
        Some(node)
    } else {
        find_property(node.children(), rest)
    }
}

// === 根级 / 单层嵌套的便捷变体 ===

pub fn add_root_property(nodes: &[SchemaProperty], ids: &mut IdGenerator) -> Vec<SchemaProperty> {
    add_property_at(nodes, &[], ids).0
}

/// 只在根级查找 `id`，不会深入子树
pub fn update_property(nodes: &[SchemaProperty], id: &str, update: PropertyUpdate) -> Vec<SchemaProperty> {
    update_property_at(nodes, &[id.to_string()], update)
}

pub fn remove_property(nodes: &[SchemaProperty], id: &str) -> Vec<SchemaProperty> {
    remove_property_at(nodes, &[id.to_string()])
}

/// `parent_id` 只在根级解析；更深层由调用方逐级传入路径（见 [`add_property_at`]）
pub fn add_nested_property(nodes: &[SchemaProperty], parent_id: &str, ids: &mut IdGenerator) -> Vec<SchemaProperty> {
    add_property_at(nodes, &[parent_id.to_string()], ids).0
}

pub fn update_nested_property(
    nodes: &[SchemaProperty],
    parent_id: &str,
    child_id: &str,
    update: PropertyUpdate,
) -> Vec<SchemaProperty> {
    update_property_at(nodes, &[parent_id.to_string(), child_id.to_string()], update)
}

pub fn remove_nested_property(nodes: &[SchemaProperty], parent_id: &str, child_id: &str) -> Vec<SchemaProperty> {
    remove_property_at(nodes, &[parent_id.to_string(), child_id.to_string()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn object(id: &str, name: &str, children: Vec<SchemaProperty>) -> SchemaProperty {
        SchemaProperty {
            id: id.into(),
            name: name.into(),
            kind: PropertyType::Object,
            properties: Some(children),
            ..SchemaProperty::default()
        }
    }

    fn leaf(id: &str, name: &str) -> SchemaProperty {
        SchemaProperty {
            id: id.into(),
            name: name.into(),
            ..SchemaProperty::default()
        }
    }

    #[test]
    fn test_add_root_appends_fresh_nodes() {
        let mut ids = IdGenerator::default();
        let tree = add_root_property(&[], &mut ids);
        let tree = add_root_property(&tree, &mut ids);
        assert_eq!(tree.len(), 2);
        assert_ne!(tree[0].id, tree[1].id);
        assert_eq!(tree[1].kind, PropertyType::String);
        assert!(!tree[1].required);
        assert_eq!(tree[1].name, "");
    }

    #[test]
    fn test_update_root_replaces_one_field() {
        let tree = vec![leaf("a", "first"), leaf("b", "second")];
        let out = update_property(&tree, "b", PropertyUpdate::Required(true));
        assert!(out[1].required);
        assert_eq!(out[1].name, "second");
        assert_eq!(out[0], tree[0]);
        // 原树不变
        assert!(!tree[1].required);
    }

    #[test]
    fn test_update_root_does_not_search_nested() {
        let tree = vec![object("p", "profile", vec![leaf("c", "age")])];
        let out = update_property(&tree, "c", PropertyUpdate::Name("changed".into()));
        assert_eq!(out, tree);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let tree = vec![leaf("a", "x")];
        assert_eq!(remove_property(&tree, "missing"), tree);
        assert_eq!(remove_nested_property(&tree, "a", "missing"), tree);
        assert_eq!(remove_nested_property(&tree, "missing", "a"), tree);
    }

    #[test]
    fn test_remove_drops_subtree() {
        let tree = vec![object("p", "profile", vec![leaf("c", "age")]), leaf("b", "b")];
        let out = remove_property(&tree, "p");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "b");
    }

    #[test]
    fn test_nested_add_creates_list() {
        let mut ids = IdGenerator::default();
        let mut parent = leaf("p", "profile");
        parent.kind = PropertyType::Object;
        let out = add_nested_property(&[parent], "p", &mut ids);
        assert_eq!(out[0].children().len(), 1);
        let out = add_nested_property(&out, "p", &mut ids);
        assert_eq!(out[0].children().len(), 2);
        assert_ne!(out[0].children()[0].id, out[0].children()[1].id);
    }

    #[test]
    fn test_nested_update_and_remove() {
        let tree = vec![object("p", "profile", vec![leaf("c1", "age"), leaf("c2", "email")])];
        let out = update_nested_property(&tree, "p", "c1", PropertyUpdate::Required(true));
        assert!(out[0].children()[0].required);
        assert!(!out[0].children()[1].required);
        let out = remove_nested_property(&out, "p", "c1");
        assert_eq!(out[0].children().len(), 1);
        assert_eq!(out[0].children()[0].id, "c2");
    }

    #[test]
    fn test_path_reaches_arbitrary_depth_only() {
        let tree = vec![
            object("a", "a", vec![object("b", "b", vec![object("c", "c", vec![leaf("d", "d")])])]),
            object("x", "x", vec![leaf("d", "d")]),
        ];
        let out = update_property_at(&tree, &path(&["a", "b", "c", "d"]), PropertyUpdate::Required(true));
        let d = find_property(&out, &path(&["a", "b", "c", "d"])).unwrap();
        assert!(d.required);
        // 同 id 的无关分支不受影响
        let other = find_property(&out, &path(&["x", "d"])).unwrap();
        assert!(!other.required);
        assert_eq!(out[1], tree[1]);
    }

    #[test]
    fn test_add_at_deep_path() {
        let mut ids = IdGenerator::with_prefix("n");
        let tree = vec![object("a", "a", vec![object("b", "b", vec![])])];
        let (out, id) = add_property_at(&tree, &path(&["a", "b"]), &mut ids);
        assert_eq!(id.as_deref(), Some("n-1"));
        let b = find_property(&out, &path(&["a", "b"])).unwrap();
        assert_eq!(b.children()[0].id, "n-1");
    }

    #[test]
    fn test_add_at_missing_parent_is_noop() {
        let mut ids = IdGenerator::default();
        let tree = vec![leaf("a", "a")];
        let (out, id) = add_property_at(&tree, &path(&["missing"]), &mut ids);
        assert_eq!(out, tree);
        assert!(id.is_none());
    }

    #[test]
    fn test_missing_child_does_not_create_list() {
        let tree = vec![leaf("a", "a")];
        let out = update_nested_property(&tree, "a", "ghost", PropertyUpdate::Required(true));
        assert!(out[0].properties.is_none());
    }

    #[test]
    fn test_enum_value_editing() {
        let tree = vec![leaf("u", "unit")];
        let p = path(&["u"]);
        let out = add_enum_value_at(&tree, &p, "celsius");
        let out = add_enum_value_at(&out, &p, "   ");
        let out = add_enum_value_at(&out, &p, "fahrenheit");
        assert_eq!(out[0].enum_values, Some(vec![json!("celsius"), json!("fahrenheit")]));
        let out = remove_enum_value_at(&out, &p, 5);
        assert_eq!(out[0].enum_values.as_ref().map(Vec::len), Some(2));
        let out = remove_enum_value_at(&out, &p, 0);
        assert_eq!(out[0].enum_values, Some(vec![json!("fahrenheit")]));
    }

    #[test]
    fn test_set_item_type() {
        let mut list = leaf("l", "tags");
        list.kind = PropertyType::Array;
        let out = set_item_type_at(&[list], &path(&["l"]), PropertyType::Integer);
        let items = out[0].items.as_ref().unwrap();
        assert_eq!(items.id, "l-item");
        assert_eq!(items.name, "item");
        assert_eq!(items.kind, PropertyType::Integer);
    }

    #[test]
    fn test_empty_path_is_noop() {
        let tree = vec![leaf("a", "a")];
        assert_eq!(update_property_at(&tree, &[], PropertyUpdate::Required(true)), tree);
        assert_eq!(remove_property_at(&tree, &[]), tree);
    }
}
