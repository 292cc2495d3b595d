// content-core/src/schema.rs
//! Tantivy schema for the full-text index.

use tantivy::schema::{
    Field, IndexRecordOption, STORED, STRING, Schema, TextFieldIndexing, TextOptions,
};

/// Route value, the document id; exact match, stored.
pub const FIELD_ROUTE: &str = "route";
/// Item title; stored for result display, never searched directly.
pub const FIELD_TITLE: &str = "title";
/// Searchable text: title, description, route components and content,
/// concatenated. Indexed only, the original lives in the content tree.
pub const FIELD_BODY: &str = "body";

pub fn build_schema() -> Schema {
    let mut schema_builder = Schema::builder();

    let body_options = TextOptions::default().set_indexing_options(
        TextFieldIndexing::default()
            .set_tokenizer("default")
            .set_index_option(IndexRecordOption::WithFreqsAndPositions),
    );

    schema_builder.add_text_field(FIELD_ROUTE, STRING | STORED);
    schema_builder.add_text_field(FIELD_TITLE, STORED);
    schema_builder.add_text_field(FIELD_BODY, body_options);

    schema_builder.build()
}

/// Cached field references, to avoid repeated lookups.
pub struct SchemaFields {
    pub route: Field,
    pub title: Field,
    pub body: Field,
}

impl SchemaFields {
    pub fn from_schema(schema: &Schema) -> Self {
        Self {
            route: schema.get_field(FIELD_ROUTE).expect("missing route field"),
            title: schema.get_field(FIELD_TITLE).expect("missing title field"),
            body: schema.get_field(FIELD_BODY).expect("missing body field"),
        }
    }
}
