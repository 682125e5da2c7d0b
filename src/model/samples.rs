//! 内置示例 Schema（常见 AI 工具场景的起步模板）

use serde::Deserialize;

use crate::model::property::SampleSchema;

const SAMPLES_JSON: &str = include_str!("samples.json");

#[derive(Debug, Clone, Deserialize)]
pub struct Sample {
    pub name: String,
    pub description: String,
    pub schema: SampleSchema,
}

/// 解析内置示例列表
pub fn sample_schemas() -> Result<Vec<Sample>, serde_json::Error> {
    serde_json::from_str(SAMPLES_JSON)
}

/// 按名称查找示例（忽略大小写）
pub fn find_sample(name: &str) -> Result<Option<Sample>, serde_json::Error> {
    Ok(sample_schemas()?
        .into_iter()
        .find(|s| s.name.eq_ignore_ascii_case(name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::property::PropertyType;

    #[test]
    fn test_samples_parse() {
        let samples = sample_schemas().expect("内置示例应能解析");
        let names: Vec<&str> = samples.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Simple AI Response", "Weather Tool", "Analysis Result", "Advanced AI Tool"]);
    }

    #[test]
    fn test_find_sample_ignores_case() {
        let sample = find_sample("weather tool").unwrap().expect("应找到示例");
        assert_eq!(sample.schema.title, "Weather Information Tool");
        assert_eq!(sample.schema.properties.len(), 3);
        assert!(find_sample("nope").unwrap().is_none());
    }

    #[test]
    fn test_nested_sample_shape() {
        let sample = find_sample("Advanced AI Tool").unwrap().unwrap();
        let params = &sample.schema.properties[1];
        assert_eq!(params.kind, PropertyType::Object);
        let word_count = &params.properties.as_ref().unwrap()[3];
        assert_eq!(word_count.name, "word_count");
        assert_eq!(word_count.properties.as_ref().unwrap().len(), 2);
    }
}
