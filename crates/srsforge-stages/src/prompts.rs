//! Prompt builders for the generation stages.
//!
//! Each builder produces the full prompt text for one completion call.
//! The requirements context is passed in pre-serialized so per-item loops
//! serialize it once, not once per file.

use srsforge_state::EndpointSpec;

/// Extraction prompt: asks for the four-key JSON object, with the exact
/// shape spelled out so the defensive parser has something to aim at.
#[must_use]
pub fn requirements_prompt(srs_text: &str) -> String {
    format!(
        r#"You are a software engineer analyzing a Software Requirements Specification (SRS) document.
Your task is to extract structured information and return it in valid JSON format.

Format your response exactly like this example:
{{
    "functional_requirements": [
        "User registration",
        "Password reset functionality"
    ],
    "api_endpoints": [
        {{
            "path": "/api/users",
            "method": "POST",
            "description": "Create new user"
        }}
    ],
    "db_schema": {{
        "tables": [
            {{
                "name": "users",
                "fields": ["id", "username", "email"]
            }}
        ]
    }},
    "auth_requirements": {{
        "type": "JWT",
        "features": ["RBAC"]
    }}
}}

Now analyze this SRS document and return the information in the same JSON structure:
{srs_text}

Remember: The response must be valid JSON, use double quotes for strings, and follow the exact structure shown above."#
    )
}

#[must_use]
pub fn api_test_prompt(endpoint: &EndpointSpec, requirements_json: &str) -> String {
    format!(
        r#"Generate pytest test cases for the FastAPI endpoint: {method} {path}

Endpoint description: {description}

Requirements: {requirements_json}

Include tests for:
- Valid requests
- Invalid requests
- Authentication/authorization
- Edge cases

Use FastAPI TestClient for all tests. The test code should be complete and ready to use."#,
        method = endpoint.method,
        path = endpoint.path,
        description = endpoint.description,
    )
}

#[must_use]
pub fn model_test_prompt(model: &str, requirements_json: &str) -> String {
    format!(
        r#"Generate pytest test cases for the SQLAlchemy model: {model}

Requirements: {requirements_json}

Include tests for:
- Model instantiation
- Field validation
- Relationships
- CRUD operations

Use pytest fixtures and a test database. The test code should be complete and ready to use."#
    )
}

#[must_use]
pub fn auth_test_prompt(auth_json: &str) -> String {
    format!(
        r#"Generate pytest test cases for FastAPI authentication and authorization.

Authentication Config: {auth_json}

Include tests for:
1. User registration
2. Login/logout
3. Token handling
4. Protected routes
5. Permission checks

Follow these rules:
- Use FastAPI TestClient
- Test both success and failure cases
- Include token validation
- Test expiry and refresh
- Use secure test credentials

The test code should be complete and ready to use."#
    )
}

#[must_use]
pub fn model_code_prompt(model: &str, requirements_json: &str) -> String {
    format!(
        r#"Generate a SQLAlchemy model class for FastAPI.

Model: {model}
Requirements: {requirements_json}

Include:
1. Model class with proper inheritance
2. All required fields with proper types
3. Relationships to other models
4. Database constraints
5. Field validation
6. Pydantic model for API

Follow these rules:
- Use SQLAlchemy declarative base
- Add proper indices
- Include proper foreign keys
- Handle cascading deletes
- Add __repr__ method

The code should be complete and ready to use."#
    )
}

#[must_use]
pub fn route_code_prompt(endpoint: &EndpointSpec, requirements_json: &str) -> String {
    format!(
        r#"Generate a FastAPI route handler for the endpoint.

Endpoint: {method} {path}
Description: {description}
Requirements: {requirements_json}

Include:
1. All CRUD operations
2. Input validation
3. Error handling
4. Authentication checks
5. Database operations
6. Response models

Follow these rules:
- Use FastAPI dependency injection
- Include proper status codes
- Add OpenAPI documentation
- Handle database sessions
- Include error responses
- Add proper logging

The code should be complete and ready to use."#,
        method = endpoint.method,
        path = endpoint.path,
        description = endpoint.description,
    )
}

#[must_use]
pub fn service_code_prompt(model: &str, requirements_json: &str) -> String {
    format!(
        r#"Generate a service class for business logic.

Model: {model}
Requirements: {requirements_json}

Include:
1. Business logic methods
2. Database operations
3. Data validation
4. Error handling
5. Integration points

Follow these rules:
- Use dependency injection
- Handle transactions
- Add proper error types
- Include logging
- Add docstrings
- Handle edge cases

The code should be complete and ready to use."#
    )
}

/// Repair prompt: the whole failure report plus the current content of one
/// failing test file. The response replaces the file verbatim.
#[must_use]
pub fn repair_prompt(test_output: &str, file_content: &str) -> String {
    format!(
        r#"Analyze the following test failure and suggest fixes.

Test Output:
{test_output}

Current Code:
{file_content}

Please:
1. Identify the root cause of the failure
2. Suggest specific code changes
3. Consider edge cases and error handling
4. Ensure compliance with FastAPI best practices
5. Maintain existing functionality

Provide the corrected code that should fix the test failure."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_prompt_embeds_the_contract_and_the_srs() {
        let prompt = requirements_prompt("The system shall allow login.");
        assert!(prompt.contains("\"functional_requirements\""));
        assert!(prompt.contains("\"auth_requirements\""));
        assert!(prompt.contains("The system shall allow login."));
    }

    #[test]
    fn per_item_prompts_name_their_target() {
        let endpoint = EndpointSpec {
            path: "/api/users".to_string(),
            method: "POST".to_string(),
            description: "Create new user".to_string(),
        };
        assert!(api_test_prompt(&endpoint, "{}").contains("POST /api/users"));
        assert!(model_test_prompt("User", "{}").contains("model: User"));
        assert!(service_code_prompt("User", "{}").contains("Model: User"));
    }
}
