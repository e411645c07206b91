//! Testing utilities for the statement viewer workspace
//!
//! Shared fixtures and in-process doubles of the external services.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use stmt_cache::{MemoryStore, TypeSchemaCache};
use stmt_model::{Statement, StatementNode, TypeInfo, TypeKey};
use stmt_services::{CodeSource, FetchError, SchemaSource, StatementApi};

pub const STATEMENT_TYPE: &str = "doi:21.T11969/R1";
pub const ANALYSIS_TYPE: &str = "doi:21.T11969/P1004";
pub const DATA_ITEM_TYPE: &str = "doi:21.T11969/P2";

pub fn key(raw: &str) -> TypeKey {
    TypeKey::parse(raw).unwrap()
}

pub fn node(value: Value) -> StatementNode {
    StatementNode::from_value(value).unwrap()
}

/// Minimal node of a type with no properties
pub fn typed_node(type_iri: &str) -> StatementNode {
    node(json!({ "@type": type_iri }))
}

pub fn statement_type_info() -> TypeInfo {
    TypeInfo::from_names("statement", ["label", "has_part"])
}

pub fn analysis_type_info() -> TypeInfo {
    TypeInfo::from_names(
        "data analysis",
        ["label", "has_input", "has_output", "executes", "evaluates"],
    )
}

pub fn data_item_type_info() -> TypeInfo {
    TypeInfo::from_names("data item", ["label", "comment"])
}

/// Schema source answering every fixture type
pub fn fixture_schema_source() -> CountingSchemaSource {
    CountingSchemaSource::new()
        .with_type(STATEMENT_TYPE, statement_type_info())
        .with_type(ANALYSIS_TYPE, analysis_type_info())
        .with_type(DATA_ITEM_TYPE, data_item_type_info())
}

pub fn memory_cache() -> Arc<TypeSchemaCache<MemoryStore>> {
    Arc::new(TypeSchemaCache::new(MemoryStore::new()))
}

/// Statement graph: statement → analysis → two data items
pub fn statement_content() -> Value {
    json!({
        "@id": "_:s1",
        "@type": STATEMENT_TYPE,
        "doi:21.T11969/R1#label": "Glucose lowers with treatment",
        "doi:21.T11969/R1#has_part": {
            "@id": "_:a1",
            "@type": ANALYSIS_TYPE,
            "doi:21.T11969/P1004#label": "Linear regression",
            "doi:21.T11969/P1004#has_input": [
                {
                    "@type": DATA_ITEM_TYPE,
                    "doi:21.T11969/P2#label": "glucose",
                    "doi:21.T11969/P2#comment": "fasting"
                }
            ],
            "doi:21.T11969/P1004#has_output": {
                "@type": DATA_ITEM_TYPE,
                "doi:21.T11969/P2#label": "slope"
            },
            "doi:21.T11969/P1004#is_implemented_by": "https://example.org/code/fit.py"
        }
    })
}

pub fn data_type_records() -> Vec<Value> {
    vec![
        json!({
            "type": analysis_type_info(),
            "has_part": {
                "label": "Linear regression",
                "has_input": [{
                    "label": "glucose",
                    "source_url": "https://example.org/glucose.csv",
                    "has_characteristic": { "number_of_rows": 120, "number_of_columns": 4 }
                }],
                "has_output": { "label": "slope" },
                "executes": [{
                    "label": "lm",
                    "has_support_url": "https://stat.example.org/lm",
                    "part_of": { "label": "stats", "version_info": "4.3.1" }
                }],
                "evaluates": "treatment effect"
            },
            "is_implemented_by": "https://example.org/code/fit.py"
        }),
        json!({ "type": { "name": "broken" } }),
    ]
}

pub fn sample_statement() -> Statement {
    Statement {
        id: "42".to_string(),
        label: Some("Glucose lowers with treatment".to_string()),
        content: Some(statement_content()),
        data_type: data_type_records(),
    }
}

fn not_found(url: impl Into<String>) -> FetchError {
    FetchError::Status {
        url: url.into(),
        status: 404,
    }
}

/// Schema source recording every lookup
///
/// Unknown keys answer 404. Calls are recorded before the optional delay,
/// so lookups cancelled mid-flight still count.
#[derive(Debug, Default)]
pub struct CountingSchemaSource {
    types: HashMap<TypeKey, TypeInfo>,
    delay: Option<Duration>,
    calls: Mutex<Vec<TypeKey>>,
}

impl CountingSchemaSource {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_type(mut self, raw_key: &str, info: TypeInfo) -> Self {
        self.types.insert(key(raw_key), info);
        self
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<TypeKey> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl SchemaSource for CountingSchemaSource {
    async fn fetch_type_info(&self, key: &TypeKey) -> Result<TypeInfo, FetchError> {
        self.calls.lock().push(key.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.types
            .get(key)
            .cloned()
            .ok_or_else(|| not_found(format!("service/type-info?key={key}")))
    }
}

/// Articles API answering from a fixed set of statements
#[derive(Debug, Default)]
pub struct FakeStatementApi {
    statements: HashMap<String, Statement>,
}

impl FakeStatementApi {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_statement(mut self, statement: Statement) -> Self {
        self.statements.insert(statement.id.clone(), statement);
        self
    }

    fn lookup(&self, id: &str) -> Result<Statement, FetchError> {
        self.statements
            .get(id)
            .cloned()
            .ok_or_else(|| not_found(format!("articles/get_statement/?id={id}")))
    }
}

#[async_trait]
impl StatementApi for FakeStatementApi {
    async fn get_statement_by_id(&self, id: &str) -> Result<Statement, FetchError> {
        self.lookup(id)
    }

    async fn get_statement(&self, id: &str) -> Result<Statement, FetchError> {
        self.lookup(id)
    }
}

/// Code source answering from a fixed set of files
#[derive(Debug, Default)]
pub struct FakeCodeSource {
    files: HashMap<String, String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl FakeCodeSource {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_file(mut self, url: &str, contents: &str) -> Self {
        self.files.insert(url.to_string(), contents.to_string());
        self
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CodeSource for FakeCodeSource {
    async fn fetch_source(&self, url: &str) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.files.get(url).cloned().ok_or_else(|| not_found(url))
    }
}
