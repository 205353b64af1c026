pub mod models;
pub mod repository;
pub mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Module};
use serde_json::json;

use repository::{BookRepository, InMemoryBookRepository};

/// Books module: owns the repository and exposes it over `/books`
pub struct BooksModule {
    repository: Arc<dyn BookRepository>,
}

impl BooksModule {
    /// Module backed by a fresh in-memory repository
    pub fn new() -> Self {
        Self::with_repository(Arc::new(InMemoryBookRepository::new()))
    }

    pub fn with_repository(repository: Arc<dyn BookRepository>) -> Self {
        Self { repository }
    }
}

impl Default for BooksModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.repository.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let fail = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/FailResponse" }
                    }
                }
            })
        };
        let envelope = |description: &str, properties: serde_json::Value| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": {
                            "type": "object",
                            "properties": properties,
                            "required": ["status"]
                        }
                    }
                }
            })
        };
        let ok = |description: &str, data: serde_json::Value| {
            envelope(
                description,
                json!({
                    "status": { "type": "string", "enum": ["success"] },
                    "message": { "type": "string" },
                    "data": data
                }),
            )
        };
        let done = |description: &str| {
            envelope(
                description,
                json!({
                    "status": { "type": "string", "enum": ["success"] },
                    "message": { "type": "string" }
                }),
            )
        };
        let id_param = |name: &str| {
            json!({
                "name": name,
                "in": "path",
                "required": true,
                "schema": { "type": "string" }
            })
        };
        let flag_param = |name: &str| {
            json!({
                "name": name,
                "in": "query",
                "required": false,
                "description": "`1`/`true` or `0`/`false`; other values match no book",
                "schema": { "type": "string" }
            })
        };
        let payload = json!({
            "required": true,
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/BookPayload" }
                }
            }
        });

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "name",
                                "in": "query",
                                "required": false,
                                "schema": { "type": "string" }
                            },
                            flag_param("reading"),
                            flag_param("finished")
                        ],
                        "responses": {
                            "200": ok("Short records of the matching books", json!({
                                "type": "object",
                                "properties": {
                                    "books": {
                                        "type": "array",
                                        "items": { "$ref": "#/components/schemas/BookSummary" }
                                    }
                                }
                            }))
                        }
                    },
                    "post": {
                        "summary": "Add a book",
                        "tags": ["Books"],
                        "requestBody": payload.clone(),
                        "responses": {
                            "201": ok("Book added", json!({
                                "type": "object",
                                "properties": { "bookId": { "type": "string" } }
                            })),
                            "400": fail("Missing name or readPage greater than pageCount"),
                            "500": fail("Book could not be added")
                        }
                    }
                },
                "/health": {
                    "get": {
                        "summary": "Books health check",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "OK",
                                "content": {
                                    "text/plain": { "schema": { "type": "string" } }
                                }
                            }
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Books"],
                        "parameters": [id_param("id")],
                        "responses": {
                            "200": ok("Full book record", json!({
                                "type": "object",
                                "properties": {
                                    "book": { "$ref": "#/components/schemas/Book" }
                                }
                            })),
                            "404": fail("Book not found")
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": [id_param("id")],
                        "responses": {
                            "200": done("Book deleted"),
                            "404": fail("Book not found")
                        }
                    }
                },
                // Same route as `/{id}`; updates name the parameter `bookId`
                "/{bookId}": {
                    "put": {
                        "summary": "Replace a book",
                        "tags": ["Books"],
                        "parameters": [id_param("bookId")],
                        "requestBody": payload,
                        "responses": {
                            "200": done("Book updated"),
                            "400": fail("Missing name or readPage greater than pageCount"),
                            "404": fail("Book not found")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "name": { "type": "string" },
                            "year": { "type": "integer" },
                            "author": { "type": "string" },
                            "summary": { "type": "string" },
                            "publisher": { "type": "string" },
                            "pageCount": { "type": "integer", "minimum": 0 },
                            "readPage": { "type": "integer", "minimum": 0 },
                            "finished": { "type": "boolean" },
                            "reading": { "type": "boolean" },
                            "insertedAt": { "type": "string", "format": "date-time" },
                            "updatedAt": { "type": "string", "format": "date-time" }
                        },
                        "required": [
                            "id", "name", "year", "author", "summary", "publisher",
                            "pageCount", "readPage", "finished", "reading",
                            "insertedAt", "updatedAt"
                        ]
                    },
                    "BookSummary": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "name": { "type": "string" },
                            "publisher": { "type": "string" }
                        },
                        "required": ["id", "name", "publisher"]
                    },
                    "BookPayload": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "year": { "type": "integer" },
                            "author": { "type": "string" },
                            "summary": { "type": "string" },
                            "publisher": { "type": "string" },
                            "pageCount": { "type": "integer", "minimum": 0 },
                            "readPage": { "type": "integer", "minimum": 0 },
                            "reading": { "type": "boolean" }
                        },
                        "required": ["name"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module() -> Arc<dyn Module> {
    Arc::new(BooksModule::new())
}
