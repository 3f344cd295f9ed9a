//! Prompt templates for MCP server

use log::debug;
use rmcp::{
    model::{
        GetPromptRequestParam, GetPromptResult, ListPromptsResult, Prompt, PromptArgument,
        PromptMessage, PromptMessageContent, PromptMessageRole,
    },
    ErrorData as McpError,
};

/// Argument definition for a prompt template
#[derive(Debug, Clone)]
pub struct PromptTemplateArg {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

/// Definition of a prompt template
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub template: &'static str,
    pub arguments: Vec<PromptTemplateArg>,
}

/// Predefined prompt templates
pub fn get_prompt_templates() -> Vec<PromptTemplate> {
    vec![PromptTemplate {
        name: "generate",
        description: "Turn a user story into a committed Playwright test suite",
        template: r#"You are **testpilot**, guiding a user story through test generation.

# Project
{project_id}

# Feature
{feature}

# Workflow
The run for this project moves through four stages: STORY → PLAN → CODE → DONE.
Call `run_status` at any time to see the stage, the current plan and files,
and the last error.

1. **Story**: Call `set_story` with a short test title (it names the spec file,
   e.g. "Checkout Flow" becomes `checkout-flow.spec.ts`) and the user story,
   including acceptance criteria as a bulleted list when the user gave any.
2. **Plan**: Call `advance` to synthesize a test plan. Review the scenarios
   with the user. Use `edit_plan` to submit a corrected markdown plan; keep
   the numbered scenario format so scenarios are counted correctly.
3. **Code**: Call `advance` again to generate the spec files. Show the primary
   file to the user. Use `go_back` to return to the plan if it needs changes.
4. **Commit**: Call `commit` only when the user approves the code. The test
   case is then stored with the project and the run is DONE.

# Recovery
- A `busy` error means another call is still running; wait and check `run_status`.
- Use `cancel` to abandon a slow generation, or `reset` to start the run over.
- A failed advance leaves the run in its stage; fix the input and retry."#,
        arguments: vec![
            PromptTemplateArg {
                name: "project_id",
                description: "ID of the project the tests are generated for",
                required: true,
            },
            PromptTemplateArg {
                name: "feature",
                description: "Feature or user story to cover",
                required: true,
            },
        ],
    }]
}

/// Lists every prompt template.
pub fn list_prompts() -> ListPromptsResult {
    debug!("list_prompts");

    let prompts = get_prompt_templates()
        .into_iter()
        .map(|template| {
            Prompt::new(
                template.name,
                Some(template.description),
                Some(
                    template
                        .arguments
                        .iter()
                        .map(|arg| PromptArgument {
                            name: arg.name.to_string(),
                            description: Some(arg.description.to_string()),
                            required: Some(arg.required),
                            title: None,
                        })
                        .collect(),
                ),
            )
        })
        .collect();

    ListPromptsResult {
        next_cursor: None,
        prompts,
    }
}

/// Resolves a prompt by name and substitutes its arguments.
pub fn get_prompt(request: &GetPromptRequestParam) -> Result<GetPromptResult, McpError> {
    debug!("get_prompt: {}", request.name);

    let template = get_prompt_templates()
        .into_iter()
        .find(|t| t.name == request.name)
        .ok_or_else(|| McpError::invalid_params("Prompt not found", None))?;

    let mut prompt_text = template.template.to_string();
    for arg in &template.arguments {
        let value = request
            .arguments
            .as_ref()
            .and_then(|args| args.get(arg.name));
        match value.and_then(|v| v.as_str()) {
            Some(text) => {
                prompt_text = prompt_text.replace(&format!("{{{}}}", arg.name), text);
            }
            None if value.is_some() => {
                return Err(McpError::invalid_params(
                    format!("Argument '{}' must be a string", arg.name),
                    None,
                ));
            }
            None if arg.required => {
                return Err(McpError::invalid_params(
                    format!("Required argument '{}' is missing", arg.name),
                    None,
                ));
            }
            None => {}
        }
    }

    Ok(GetPromptResult {
        description: Some(template.description.to_string()),
        messages: vec![PromptMessage {
            role: PromptMessageRole::User,
            content: PromptMessageContent::text(prompt_text),
        }],
    })
}
