//! 影子树（Shadow Tree）：把属性树压平成带深度的行，供 UI 渲染与折叠控制

use std::collections::{HashMap, HashSet};

use crate::model::property::{PropertyType, SchemaProperty};

/// 扁平化后的一行
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRow {
    pub id: String,
    /// 从根到本节点的 id 路径（用于精确寻址与回写）
    pub path: Vec<String>,
    pub name: String,
    pub kind: PropertyType,
    /// 直接子节点数量
    pub children: u32,
    /// 节点深度（用于UI缩进显示）
    pub depth: u32,
    pub required: bool,
    /// 是否展开（仅对可折叠节点有意义）
    pub expanded: bool,
    /// 是否可见：任一祖先被折叠则不可见
    pub visible: bool,
}

/// 先序收集所有可折叠节点（object 且至少有一个子节点）的 id
pub fn get_all_property_ids(props: &[SchemaProperty]) -> Vec<String> {
    let mut ids = Vec::new();
    fn walk(out: &mut Vec<String>, props: &[SchemaProperty]) {
        for prop in props {
            if prop.is_collapsible() {
                out.push(prop.id.clone());
                walk(out, prop.children());
            }
        }
    }
    walk(&mut ids, props);
    ids
}

/// 先序查找 `id` 的路径（祖先 id + 自身），找不到返回 `None`
pub fn path_to(props: &[SchemaProperty], id: &str) -> Option<Vec<String>> {
    for prop in props {
        if prop.id == id {
            return Some(vec![prop.id.clone()]);
        }
        if let Some(mut rest) = path_to(prop.children(), id) {
            rest.insert(0, prop.id.clone());
            return Some(rest);
        }
    }
    None
}

/// 折叠状态：id → 是否折叠；不在表中的节点视为展开
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollapseState {
    flags: HashMap<String, bool>,
}

impl CollapseState {
    pub fn is_collapsed(&self, id: &str) -> bool {
        self.flags.get(id).copied().unwrap_or(false)
    }

    pub fn set(&mut self, id: impl Into<String>, collapsed: bool) {
        self.flags.insert(id.into(), collapsed);
    }

    /// 切换并返回新的折叠状态
    pub fn toggle(&mut self, id: &str) -> bool {
        let next = !self.is_collapsed(id);
        self.flags.insert(id.to_string(), next);
        next
    }

    /// 折叠全部可折叠节点
    pub fn collapse_all(&mut self, props: &[SchemaProperty]) {
        self.flags = get_all_property_ids(props)
            .into_iter()
            .map(|id| (id, true))
            .collect();
    }

    /// 展开全部：直接清空整张表
    pub fn expand_all(&mut self) {
        self.flags.clear();
    }

    /// 丢弃树中已不存在的节点的标记，返回丢弃的条数
    pub fn retain_live(&mut self, props: &[SchemaProperty]) -> usize {
        fn collect<'a>(out: &mut HashSet<&'a str>, props: &'a [SchemaProperty]) {
            for prop in props {
                out.insert(prop.id.as_str());
                collect(out, prop.children());
            }
        }
        let mut live = HashSet::new();
        collect(&mut live, props);
        let before = self.flags.len();
        self.flags.retain(|id, _| live.contains(id.as_str()));
        before - self.flags.len()
    }
}

/// 从属性树构建全量影子行（先序）
pub fn build_shadow_tree(props: &[SchemaProperty], collapse: &CollapseState) -> Vec<PropertyRow> {
    let mut out = Vec::with_capacity(props.len());
    fn walk(
        out: &mut Vec<PropertyRow>,
        props: &[SchemaProperty],
        collapse: &CollapseState,
        parent_path: &[String],
        depth: u32,
        visible: bool,
    ) {
        for prop in props {
            let mut path = parent_path.to_vec();
            path.push(prop.id.clone());
            let expanded = !collapse.is_collapsed(&prop.id);
            let children: &[SchemaProperty] = if prop.kind == PropertyType::Object { prop.children() } else { &[] };
            out.push(PropertyRow {
                id: prop.id.clone(),
                path: path.clone(),
                name: prop.name.clone(),
                kind: prop.kind,
                children: children.len() as u32,
                depth,
                required: prop.required,
                expanded,
                visible,
            });
            walk(out, children, collapse, &path, depth + 1, visible && expanded);
        }
    }
    walk(&mut out, props, collapse, &[], 0, true);
    out
}

/// 渲染为缩进文本大纲（只含可见行）
pub fn render_outline(rows: &[PropertyRow]) -> String {
    let mut out = String::new();
    for row in rows.iter().filter(|r| r.visible) {
        let marker = match (row.children > 0, row.expanded) {
            (true, true) => "▾ ",
            (true, false) => "▸ ",
            _ => "  ",
        };
        let name = if row.name.is_empty() { "<unnamed>" } else { row.name.as_str() };
        let required = if row.required { " *" } else { "" };
        out.push_str(&format!(
            "{}{}{}: {}{}\n",
            "  ".repeat(row.depth as usize),
            marker,
            name,
            row.kind,
            required
        ));
    }
    out
}
