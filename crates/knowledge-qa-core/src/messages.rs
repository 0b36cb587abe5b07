//! User-facing strings.
//!
//! The service answers in Chinese; every message a client can see is
//! collected here so handlers, the HTTP layer, and tests agree on wording.

pub const EMPTY_BODY: &str = "请求体为空";
pub const INVALID_BODY: &str = "请求体格式无效";
pub const TITLE_REQUIRED: &str = "文档标题不能为空";
pub const CONTENT_REQUIRED: &str = "文档内容不能为空";
pub const QUESTION_REQUIRED: &str = "问题不能为空";
pub const METHOD_NOT_ALLOWED: &str = "请求方法不允许";
pub const NOT_FOUND: &str = "API端点不存在";

pub const UPLOAD_OK: &str = "文档上传成功";
pub const UPLOAD_FAILED: &str = "上传失败";
pub const STORE_WRITE_FAILED: &str = "文档保存失败";
pub const STORE_READ_FAILED: &str = "文档检索失败";
pub const QUERY_FAILED: &str = "处理问题时出错";
pub const RETRY_LATER: &str = "请稍后重试或检查服务状态";

pub const EMPTY_KNOWLEDGE_BASE: &str = "知识库为空，请先上传文档。";

pub const MATCH_SUGGESTIONS: [&str; 3] = [
    "查看完整文档获取更多信息",
    "尝试提出更具体的问题",
    "上传更多相关文档以丰富知识库",
];

pub const NO_MATCH_SUGGESTIONS: [&str; 2] = ["尝试使用不同的关键词", "上传相关文档后再提问"];

pub fn content_too_long(max_chars: usize) -> String {
    format!("文档内容过长（最大{}字符）", max_chars)
}

pub fn matched_answer(title: &str, snippet: &str) -> String {
    format!("根据文档「{}」找到相关信息：\n\n{}", title, snippet)
}

pub fn no_match_answer(search_term: &str, total_documents: u64) -> String {
    format!(
        "抱歉，在知识库现有的 {} 个文档中没有找到与「{}」直接相关的内容。\n\n建议：\n1. 尝试使用其他关键词\n2. 上传更多相关文档",
        total_documents, search_term
    )
}
