//! IO helper: safe file read/write for JSON

use std::{fs::File, io::{BufWriter, Write}, path::Path};

use serde::Serialize;
use crate::model::data_core::AppError;

/// 读取整个文本文件（导入前先拿到原文，解析交给调用方）
pub fn read_text_file(p: &Path) -> Result<String, AppError> {
    Ok(std::fs::read_to_string(p)?)
}

/// 将JSON数据保存到文件（2空格缩进，末尾换行）
pub fn write_json_file<T: Serialize>(p: &Path, value: &T) -> Result<(), AppError> {
    let f = File::create(p)?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, value)?;
    w.write_all(b"\n")?;
    w.flush()?;
    Ok(())
}
