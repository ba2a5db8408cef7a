use serde_json::{json, Value};

use super::export_ticket;
use super::knowledge::document_view;
use crate::mock::params::{paginate, Params};
use crate::mock::router::MockContext;
use crate::mock::state::{Document, HotKeyword, MockData};
use crate::mock::{to_payload, HandlerResult};

const DEFAULT_PAGE_SIZE: u64 = 10;
const DEFAULT_KEYWORD_LIMIT: u64 = 10;
const MAX_KEYWORD_LIMIT: u64 = 20;
const ALL: &str = "all";

/// How matching documents are ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortBy {
    Relevance,
    Time,
    Title,
}

impl SortBy {
    fn from_name(name: &str) -> Self {
        match name {
            "time" => SortBy::Time,
            "title" => SortBy::Title,
            _ => SortBy::Relevance,
        }
    }
}

struct Hit<'a> {
    doc: &'a Document,
    kb_name: &'a str,
    score: u32,
}

/// Title matches weigh more than excerpt or knowledge base matches
fn score(doc: &Document, kb_name: &str, keyword: &str) -> u32 {
    let mut score = 0;
    if doc.name.to_lowercase().contains(keyword) {
        score += 3;
    }
    if doc.excerpt.to_lowercase().contains(keyword) {
        score += 2;
    }
    if kb_name.to_lowercase().contains(keyword) {
        score += 1;
    }
    score
}

fn matching<'a>(data: &'a MockData, keyword: &str, kb_filter: &str, type_filter: &str) -> Vec<Hit<'a>> {
    data.documents
        .iter()
        .filter(|d| kb_filter == ALL || d.knowledge_base_id == kb_filter)
        .filter(|d| type_filter == ALL || d.file_type == type_filter)
        .filter_map(|doc| {
            let kb_name = data
                .knowledge_base(&doc.knowledge_base_id)
                .map_or("", |kb| kb.name.as_str());
            let score = score(doc, kb_name, keyword);
            (score > 0).then_some(Hit { doc, kb_name, score })
        })
        .collect()
}

fn record_keyword(keywords: &mut Vec<HotKeyword>, keyword: &str) {
    match keywords.iter_mut().find(|k| k.keyword == keyword) {
        Some(existing) => existing.count += 1,
        None => keywords.push(HotKeyword {
            keyword: keyword.to_string(),
            count: 1,
        }),
    }
}

pub fn documents(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let params = Params::new(params);
    let (page, page_size) = params.page(DEFAULT_PAGE_SIZE);
    let Some(keyword) = params.str("keyword").map(str::to_lowercase) else {
        return Ok(paginate(Vec::new(), page, page_size));
    };
    let kb_filter = params.string_or("knowledgeBaseId", ALL);
    let type_filter = params.string_or("docType", ALL);
    let sort_by = SortBy::from_name(&params.string_or("sortBy", "relevance"));

    ctx.data(|data| -> HandlerResult {
        let mut hits = matching(data, &keyword, &kb_filter, &type_filter);
        match sort_by {
            SortBy::Relevance => hits.sort_by(|a, b| b.score.cmp(&a.score).then(a.doc.id.cmp(&b.doc.id))),
            SortBy::Time => hits.sort_by(|a, b| b.doc.upload_time.cmp(&a.doc.upload_time)),
            SortBy::Title => hits.sort_by(|a, b| a.doc.name.cmp(&b.doc.name)),
        }

        let items = hits
            .iter()
            .map(|hit| -> HandlerResult {
                let mut view = document_view(hit.doc)?;
                if let Some(fields) = view.as_object_mut() {
                    fields.insert("knowledgeBaseName".to_string(), json!(hit.kb_name));
                    fields.insert("excerpt".to_string(), json!(hit.doc.excerpt));
                    fields.insert("score".to_string(), json!(hit.score));
                }
                Ok(view)
            })
            .collect::<Result<Vec<_>, _>>()?;

        record_keyword(&mut data.hot_keywords, &keyword);
        data.searches_today += 1;
        Ok(paginate(items, page, page_size))
    })
}

pub fn hot_keywords(ctx: &MockContext<'_>, params: &Value) -> HandlerResult {
    let limit = Params::new(params)
        .u64_or("limit", DEFAULT_KEYWORD_LIMIT)
        .clamp(1, MAX_KEYWORD_LIMIT) as usize;

    ctx.data(|data| -> HandlerResult {
        let mut keywords = data.hot_keywords.clone();
        keywords.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.keyword.cmp(&b.keyword)));
        keywords.truncate(limit);
        to_payload(&keywords)
    })
}

pub fn doc_types(_ctx: &MockContext<'_>, _params: &Value) -> HandlerResult {
    Ok(json!([
        {"value": "all", "label": "All types"},
        {"value": "pdf", "label": "PDF document"},
        {"value": "docx", "label": "Word document"},
        {"value": "md", "label": "Markdown"},
        {"value": "txt", "label": "Plain text"},
    ]))
}

pub fn export(_ctx: &MockContext<'_>, _params: &Value) -> HandlerResult {
    export_ticket("search-results", "xlsx")
}

#[cfg(test)]
mod tests {
    use crate::mock::MockRouter;
    use serde_json::json;

    fn ids(payload: &serde_json::Value) -> Vec<String> {
        payload["list"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["id"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_empty_keyword_returns_empty_page() {
        let router = MockRouter::with_default_routes().unwrap();
        let payload = router
            .resolve("/api/search/documents", &json!({"keyword": "", "page": 2, "pageSize": 5}))
            .payload;
        assert_eq!(payload, json!({"list": [], "total": 0, "page": 2, "pageSize": 5}));
    }

    #[test]
    fn test_keyword_is_case_insensitive() {
        let router = MockRouter::with_default_routes().unwrap();
        let payload = router
            .resolve("/api/search/documents", &json!({"keyword": "REDIS", "pageSize": 50}))
            .payload;
        assert_eq!(payload["total"], 6);
        let mut found = ids(&payload);
        found.sort();
        assert_eq!(found, ["doc_001", "doc_004", "doc_008", "doc_010", "doc_012", "doc_014"]);
    }

    #[test]
    fn test_filters_and_title_sort() {
        let router = MockRouter::with_default_routes().unwrap();
        let payload = router
            .resolve(
                "/api/search/documents",
                &json!({"keyword": "redis", "knowledgeBaseId": "kb_003", "sortBy": "title"}),
            )
            .payload;
        assert_eq!(ids(&payload), ["doc_012", "doc_010", "doc_014"]);

        let md_only = router
            .resolve("/api/search/documents", &json!({"keyword": "redis", "docType": "md"}))
            .payload;
        assert_eq!(ids(&md_only), ["doc_010"]);
    }

    #[test]
    fn test_search_counts_hot_keyword() {
        let router = MockRouter::with_default_routes().unwrap();
        router.resolve("/api/search/documents", &json!({"keyword": "kubernetes"}));
        router.resolve("/api/search/documents", &json!({"keyword": "Kubernetes"}));

        let keywords = router.resolve("/api/search/hot-keywords", &json!({"limit": 20})).payload;
        let entry = keywords
            .as_array()
            .unwrap()
            .iter()
            .find(|k| k["keyword"] == "kubernetes")
            .cloned()
            .unwrap();
        assert_eq!(entry["count"], 2);

        let top = router.resolve("/api/search/hot-keywords", &json!({"limit": 1})).payload;
        assert_eq!(top, json!([{"keyword": "redis", "count": 128}]));
    }
}
