//! Clipboard helpers for the "copy schema" action

use copypasta::{ClipboardContext, ClipboardProvider};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("clipboard error: {0}")]
    Clip(String),
    #[error("序列化失败: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// 以 2 空格缩进序列化后写入系统剪贴板，返回写入的字符数
pub fn copy_json_to_clipboard<T: Serialize>(value: &T) -> Result<usize, ClipboardError> {
    let text = serde_json::to_string_pretty(value)?;
    let len = text.chars().count();
    let mut ctx = ClipboardContext::new().map_err(|e| ClipboardError::Clip(e.to_string()))?;
    ctx.set_contents(text)
        .map_err(|e| ClipboardError::Clip(e.to_string()))?;
    Ok(len)
}
