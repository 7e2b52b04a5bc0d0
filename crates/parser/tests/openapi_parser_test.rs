//! Integration test for OpenAPI parser

use apim_graph_common::HttpMethod;
use apim_graph_parser::openapi::{
    DocumentFormat, Extensible, OpenApiParser, Parameter, RefOr, RequestBody, Response,
};
use std::io::Write;
use std::path::Path;

const PETSTORE_JSON: &str = r##"{
    "openapi": "3.0.1",
    "info": {
        "title": "Pet Store",
        "version": "1.0.0",
        "description": "Sample pets API"
    },
    "x-az-apim-inbound-append-policy": "<set-header name=\"X-Api\" exists-action=\"override\"><value>pets</value></set-header>",
    "paths": {
        "/pets/{id}": {
            "parameters": [
                { "$ref": "#/components/parameters/PetId" }
            ],
            "get": {
                "operationId": "getPet",
                "summary": "Get a pet",
                "responses": {
                    "200": {
                        "description": "OK",
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/Pet" }
                            }
                        }
                    },
                    "default": { "$ref": "#/components/responses/Error" }
                }
            },
            "put": {
                "operationId": "updatePet",
                "x-az-apim-inbound-append-policy": "<rate-limit calls=\"10\" renewal-period=\"60\" />",
                "requestBody": { "$ref": "#/components/requestBodies/PetBody" },
                "responses": {
                    "204": { "description": "Updated" }
                }
            }
        }
    },
    "components": {
        "schemas": {
            "Pet": {
                "type": "object",
                "properties": {
                    "id": { "type": "integer", "example": 7 },
                    "name": { "type": "string" }
                }
            },
            "Error": { "type": ["object", "null"] }
        },
        "parameters": {
            "PetId": {
                "name": "id",
                "in": "path",
                "required": true,
                "schema": { "type": "integer" }
            }
        },
        "requestBodies": {
            "PetBody": {
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/Pet" }
                    }
                }
            }
        },
        "responses": {
            "Error": { "description": "Something went wrong" }
        }
    }
}"##;

const PETSTORE_YAML: &str = r#"
openapi: 3.0.0
info:
  title: Pet Store
  version: "1"
paths:
  /pets:
    get:
      operationId: listPets
      responses:
        200:
          description: A list of pets
          content:
            application/json:
              example: [{"id": 1}]
        404:
          description: Not found
    post:
      x-az-apim-inbound-append-policy: "<base />"
      responses:
        "201":
          description: Created
"#;

#[test]
fn test_parse_json_document() {
    let parser = OpenApiParser::from_json(PETSTORE_JSON).expect("Failed to parse JSON");
    let spec = parser.spec();

    assert_eq!(spec.openapi, "3.0.1");
    assert_eq!(spec.info.title, "Pet Store");
    assert_eq!(spec.info.description.as_deref(), Some("Sample pets API"));
    assert_eq!(spec.paths.len(), 1);

    let item = &spec.paths["/pets/{id}"];
    let methods: Vec<HttpMethod> = item.operations().map(|(method, _)| method).collect();
    assert_eq!(methods, vec![HttpMethod::Get, HttpMethod::Put]);

    let get = item.get.as_ref().unwrap();
    assert_eq!(get.operation_id.as_deref(), Some("getPet"));
    let keys: Vec<&str> = get.responses.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["200", "default"]);
}

#[test]
fn test_component_references_resolve() {
    let spec = OpenApiParser::from_json(PETSTORE_JSON).unwrap().into_spec();
    let item = &spec.paths["/pets/{id}"];

    let parameter: &RefOr<Parameter> = &item.parameters[0];
    assert_eq!(parameter.reference_id(), Some("PetId"));
    let resolved = parameter.resolve(&spec).expect("parameter should resolve");
    assert_eq!(resolved.name, "id");
    assert_eq!(resolved.location, "path");
    assert!(resolved.required);

    let put = item.put.as_ref().unwrap();
    let body: &RequestBody = put.request_body.as_ref().unwrap().resolve(&spec).unwrap();
    let schema = body.content["application/json"].schema.as_ref().unwrap();
    assert_eq!(schema.reference_id(), Some("Pet"));
    assert_eq!(
        spec.resolve_schema_ref("#/components/schemas/Pet")
            .and_then(|pet| pet.type_name()),
        Some("object")
    );

    let error: &Response = item.get.as_ref().unwrap().responses["default"]
        .resolve(&spec)
        .unwrap();
    assert_eq!(error.description.as_deref(), Some("Something went wrong"));
}

#[test]
fn test_type_arrays_use_first_non_null_type() {
    let spec = OpenApiParser::from_json(PETSTORE_JSON).unwrap().into_spec();
    let error = spec.resolve_schema_ref("#/components/schemas/Error").unwrap();
    assert_eq!(error.type_name(), Some("object"));
}

#[test]
fn test_unknown_reference_does_not_resolve() {
    let spec = OpenApiParser::from_json(PETSTORE_JSON).unwrap().into_spec();
    assert!(spec.resolve_schema_ref("#/components/schemas/Missing").is_none());
    assert!(spec.resolve_schema_ref("other.json#/components/schemas/Pet").is_none());
}

#[test]
fn test_extensions_are_reachable() {
    let spec = OpenApiParser::from_json(PETSTORE_JSON).unwrap().into_spec();

    assert!(spec
        .extension_str("x-az-apim-inbound-append-policy")
        .unwrap()
        .contains("X-Api"));
    assert!(spec.extension_str("info").is_none());

    let item = &spec.paths["/pets/{id}"];
    assert!(item
        .get
        .as_ref()
        .unwrap()
        .extension_str("x-az-apim-inbound-append-policy")
        .is_none());
    assert_eq!(
        item.put
            .as_ref()
            .unwrap()
            .extension_str("x-az-apim-inbound-append-policy"),
        Some("<rate-limit calls=\"10\" renewal-period=\"60\" />")
    );
}

#[test]
fn test_parse_yaml_with_numeric_status_codes() {
    let parser = OpenApiParser::from_yaml(PETSTORE_YAML).expect("Failed to parse YAML");
    let spec = parser.spec();

    let item = &spec.paths["/pets"];
    let get = item.get.as_ref().unwrap();
    let keys: Vec<&str> = get.responses.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["200", "404"]);

    let ok = get.responses["200"].as_item().unwrap();
    assert!(ok.content["application/json"].example.is_some());

    let post = item.post.as_ref().unwrap();
    assert!(post.operation_id.is_none());
    assert_eq!(
        post.extension_str("x-az-apim-inbound-append-policy"),
        Some("<base />")
    );
}

#[test]
fn test_from_str_detects_format() {
    assert_eq!(DocumentFormat::sniff(PETSTORE_JSON), DocumentFormat::Json);
    assert_eq!(DocumentFormat::sniff(PETSTORE_YAML), DocumentFormat::Yaml);

    let json = OpenApiParser::from_str(PETSTORE_JSON).unwrap();
    let yaml = OpenApiParser::from_str(PETSTORE_YAML).unwrap();
    assert_eq!(json.spec().info.title, yaml.spec().info.title);
}

#[test]
fn test_from_file() {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .unwrap();
    file.write_all(PETSTORE_YAML.as_bytes()).unwrap();

    assert_eq!(
        DocumentFormat::detect(file.path(), PETSTORE_YAML),
        DocumentFormat::Yaml
    );
    let parser = OpenApiParser::from_file(file.path()).unwrap();
    assert_eq!(parser.spec().paths.len(), 1);
}

#[test]
fn test_missing_file_is_a_parse_error() {
    let err = OpenApiParser::from_file(Path::new("/nonexistent/openapi.json")).unwrap_err();
    assert!(err.to_string().contains("Failed to read OpenAPI file"));
}

#[test]
fn test_malformed_document_is_rejected() {
    assert!(OpenApiParser::from_json("{ not json").is_err());
    assert!(OpenApiParser::from_json(r#"{"openapi": "3.0.0"}"#).is_err());
}

#[test]
fn test_swagger_2_is_rejected() {
    let err = OpenApiParser::from_json(
        r#"{"openapi": "2.0", "info": {"title": "Old", "version": "1"}, "paths": {}}"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("Unsupported OpenAPI version"));
}
