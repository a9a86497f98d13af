use serde_json::{json, Value};

/// 文件頁面用到的服務資訊
#[derive(Debug, Clone)]
pub struct ApiInfo {
    pub title: String,
    pub description: String,
}

pub fn request_examples() -> Value {
    json!([
        { "parts_count": 500, "theme": "space" },
        { "parts_count": 1200, "theme": "city" }
    ])
}

pub fn openapi_document(info: &ApiInfo) -> Value {
    let error_body = json!({
        "type": "object",
        "required": ["detail"],
        "properties": { "detail": { "type": "string" } }
    });

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": info.title,
            "description": info.description,
            "version": env!("CARGO_PKG_VERSION")
        },
        "paths": {
            "/predict/": {
                "post": {
                    "summary": "Predict LEGO set category",
                    "description": "Predicts the category of a LEGO set from its number of parts (parts_count) and theme (theme).",
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/LegoInput" },
                                "examples": {
                                    "space": { "value": request_examples()[0] },
                                    "city": { "value": request_examples()[1] }
                                }
                            }
                        }
                    },
                    "responses": {
                        "200": {
                            "description": "Predicted label and class probabilities",
                            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/PredictionResponse" } } }
                        },
                        "400": {
                            "description": "The model could not process the input",
                            "content": { "application/json": { "schema": error_body } }
                        },
                        "422": {
                            "description": "Request body failed validation",
                            "content": { "application/json": { "schema": error_body } }
                        },
                        "500": {
                            "description": "Model not loaded",
                            "content": { "application/json": { "schema": error_body } }
                        }
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Liveness and model state",
                    "responses": { "200": { "description": "Service is running" } }
                }
            }
        },
        "components": {
            "schemas": {
                "LegoInput": {
                    "type": "object",
                    "required": ["parts_count", "theme"],
                    "properties": {
                        "parts_count": { "type": "integer" },
                        "theme": { "type": "string" }
                    },
                    "example": request_examples()[0]
                },
                "PredictionResponse": {
                    "type": "object",
                    "required": ["prediction", "probabilities", "input_data"],
                    "properties": {
                        "prediction": { "type": "string" },
                        "probabilities": {
                            "type": "object",
                            "additionalProperties": { "type": "number" }
                        },
                        "input_data": { "$ref": "#/components/schemas/LegoInput" }
                    }
                }
            }
        }
    })
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}

pub fn docs_page(info: &ApiInfo) -> String {
    let title = escape_html(&info.title);
    let description = escape_html(&info.description);
    let example = escape_html(&request_examples()[0].to_string());

    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{title}</title></head>
<body>
<h1>{title}</h1>
<p>{description}</p>
<h2>POST /predict/</h2>
<p>Body: <code>{example}</code></p>
<p>Returns <code>prediction</code>, <code>probabilities</code> and <code>input_data</code>.</p>
<h2>GET /health</h2>
<p>Reports whether the model is loaded.</p>
<p>Machine-readable description: <a href="/openapi.json">/openapi.json</a></p>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> ApiInfo {
        ApiInfo {
            title: "LEGO <Predictor>".to_string(),
            description: "desc".to_string(),
        }
    }

    #[test]
    fn test_openapi_carries_examples() {
        let doc = openapi_document(&info());
        let examples = &doc["paths"]["/predict/"]["post"]["requestBody"]["content"]
            ["application/json"]["examples"];

        assert_eq!(examples["space"]["value"]["parts_count"], 500);
        assert_eq!(examples["city"]["value"]["theme"], "city");
        assert_eq!(doc["info"]["title"], "LEGO <Predictor>");
    }

    #[test]
    fn test_docs_page_escapes_title() {
        let page = docs_page(&info());
        assert!(page.contains("LEGO &lt;Predictor&gt;"));
        assert!(page.contains("/openapi.json"));
    }
}
